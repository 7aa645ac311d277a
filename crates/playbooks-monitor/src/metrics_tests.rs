use super::*;

#[tokio::test]
async fn test_registry_counter() {
    let registry = MetricsRegistry::new();
    registry.register_counter("api_errors_total", "API errors").await;

    registry.inc_counter("api_errors_total").await;
    registry.add_counter("api_errors_total", 2).await;

    assert_eq!(registry.get_counter("api_errors_total").await, Some(3));
}

#[tokio::test]
async fn test_registry_gauge() {
    let registry = MetricsRegistry::new();
    registry.register_gauge("runs_active_total", "Active runs").await;

    registry.set_gauge("runs_active_total", 5).await;
    assert_eq!(registry.get_gauge("runs_active_total").await, Some(5));

    registry.set_gauge("runs_active_total", 3).await;
    assert_eq!(registry.get_gauge("runs_active_total").await, Some(3));
}

#[tokio::test]
async fn test_unknown_metrics_are_ignored() {
    let registry = MetricsRegistry::new();
    registry.inc_counter("nope").await;
    registry.set_gauge("nope", 1).await;
    assert_eq!(registry.get_counter("nope").await, None);
    assert_eq!(registry.get_gauge("nope").await, None);
}

#[tokio::test]
async fn test_export_sorted_with_labels() {
    let registry = MetricsRegistry::new();
    registry.register_counter("b_counter", "A counter").await;
    registry.inc_counter("b_counter").await;
    registry
        .register_labeled_gauge(
            "a_info",
            "Instance info",
            vec![
                ("version".to_string(), "1.2.3".to_string()),
                ("installation_id".to_string(), "".to_string()),
            ],
        )
        .await;
    registry.set_gauge("a_info", 1).await;

    let output = registry.export().await;
    assert!(output.contains("# HELP b_counter A counter"));
    assert!(output.contains("# TYPE b_counter counter"));
    assert!(output.contains("b_counter 1"));
    assert!(output.contains("# TYPE a_info gauge"));
    assert!(output.contains("a_info{version=\"1.2.3\",installation_id=\"\"} 1"));
    assert!(output.find("a_info").unwrap() < output.find("b_counter").unwrap());
}

#[test]
fn test_label_escaping() {
    let labels = vec![("v".to_string(), "a\"b".to_string())];
    assert_eq!(format_labels(&labels), "{v=\"a\\\"b\"}");
    assert_eq!(format_labels(&[]), "");
}
