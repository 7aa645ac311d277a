use super::*;

#[test]
fn test_kernel_state_conversion() {
    assert_eq!(KernelState::from(0), KernelState::Unbound);
    assert_eq!(KernelState::from(3), KernelState::Ready);
    assert_eq!(KernelState::from(99), KernelState::Stopped);
}

#[test]
fn test_forward_path() {
    let lifecycle = Lifecycle::new();
    assert_eq!(lifecycle.state(), KernelState::Unbound);

    lifecycle.transition(KernelState::Unbound, KernelState::Bound).unwrap();
    lifecycle
        .transition(KernelState::Bound, KernelState::MigrationPending)
        .unwrap();
    lifecycle
        .transition(KernelState::MigrationPending, KernelState::Ready)
        .unwrap();
    lifecycle.transition(KernelState::Ready, KernelState::Started).unwrap();
    assert!(lifecycle.is_started());

    lifecycle.transition(KernelState::Started, KernelState::Stopped).unwrap();
    assert_eq!(lifecycle.state(), KernelState::Stopped);
}

#[test]
fn test_no_backward_transition() {
    let lifecycle = Lifecycle::new();
    lifecycle.advance(KernelState::Bound).unwrap();
    lifecycle.advance(KernelState::MigrationPending).unwrap();
    lifecycle.advance(KernelState::Ready).unwrap();

    let err = lifecycle.advance(KernelState::MigrationPending).unwrap_err();
    assert_eq!(
        err,
        LifecycleError::InvalidTransition {
            from: KernelState::Ready,
            to: KernelState::MigrationPending,
        }
    );
    assert_eq!(lifecycle.state(), KernelState::Ready);
}

#[test]
fn test_double_start_rejected() {
    let lifecycle = Lifecycle::new();
    for state in [
        KernelState::Bound,
        KernelState::MigrationPending,
        KernelState::Ready,
        KernelState::Started,
    ] {
        lifecycle.advance(state).unwrap();
    }

    let err = lifecycle
        .transition(KernelState::Ready, KernelState::Started)
        .unwrap_err();
    assert!(err.to_string().contains("from started to started"));
}

#[test]
fn test_stopped_is_terminal() {
    let lifecycle = Lifecycle::new();
    for state in [
        KernelState::Bound,
        KernelState::MigrationPending,
        KernelState::Ready,
        KernelState::Stopped,
    ] {
        lifecycle.advance(state).unwrap();
    }

    for next in [KernelState::Started, KernelState::Ready, KernelState::Stopped] {
        assert!(lifecycle.advance(next).is_err());
    }
}

#[test]
fn test_cannot_skip_migration() {
    let lifecycle = Lifecycle::new();
    lifecycle.advance(KernelState::Bound).unwrap();
    assert!(lifecycle.advance(KernelState::Ready).is_err());
    assert_eq!(lifecycle.state(), KernelState::Bound);
}
