//! The `/playbook` slash command.

use playbooks_protocols::types::{AutocompleteItem, CommandDefinition};

pub const COMMAND_TRIGGER: &str = "playbook";

fn item(trigger: &str, hint: &str, help_text: &str) -> AutocompleteItem {
    AutocompleteItem {
        trigger: trigger.to_string(),
        hint: hint.to_string(),
        help_text: help_text.to_string(),
        sub_commands: Vec::new(),
    }
}

fn autocomplete(testing: bool) -> AutocompleteItem {
    let mut root = item(
        COMMAND_TRIGGER,
        "[command]",
        "Available commands: run, finish, update, check, list, owner, info, todo, settings",
    );
    root.sub_commands = vec![
        item("run", "", "Starts a new playbook run"),
        item("finish", "", "Finishes the playbook run in this channel"),
        item("update", "", "Provide a status update"),
        item("check", "[checklist item]", "Checks or unchecks a checklist item"),
        item("checkadd", "[checklist]", "Add a checklist item"),
        item("checkremove", "[checklist item]", "Remove a checklist item"),
        item("owner", "[@username]", "Show or change the current owner"),
        item("announce", "~[channels]", "Announce the current playbook run in other channels"),
        item("list", "", "Lists all your ongoing playbook runs"),
        item("info", "", "Shows a summary of the current playbook run"),
        item("add", "[checklist]", "Add a checklist item"),
        item("timeline", "", "Show the timeline for the current playbook run"),
        item("todo", "", "Get a list of your assigned tasks"),
        item("settings", "[setting] [value]", "Change personal playbook settings"),
    ];

    if testing {
        let mut test = item("test", "", "Commands for testing and debugging");
        test.sub_commands = vec![
            item("create-playbook", "", "Create a playbook from a template"),
            item("self", "", "Run the self-test against this server"),
            item("bulk-data", "[ongoing] [ended] [days] [seed]", "Generate random test data"),
        ];
        root.sub_commands.push(test);
    }
    root
}

/// Definition registered with the host. Test-only sub-commands are included
/// when the host has testing enabled.
pub fn command_definition(testing: bool) -> CommandDefinition {
    CommandDefinition {
        trigger: COMMAND_TRIGGER.to_string(),
        display_name: "Playbook".to_string(),
        description: "Playbooks".to_string(),
        auto_complete: true,
        auto_complete_desc: "Available commands: run, finish, update, check, list, owner, info, todo, settings".to_string(),
        auto_complete_hint: "[command]".to_string(),
        autocomplete_data: Some(autocomplete(testing)),
    }
}
