//! Default tool catalog
//!
//! Tools every IDE build is expected to expose. They are listed even
//! before an IDE has been found, so clients see a stable surface.

use serde_json::json;

use crate::types::ToolDescriptor;

fn path_schema(description: &str) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "pathInProject": { "type": "string", "description": description }
        },
        "required": ["pathInProject"]
    })
}

pub fn default_tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_open_in_editor_file_text",
            "Retrieves the complete text content of the file currently open in the editor.",
        ),
        ToolDescriptor::new(
            "get_open_in_editor_file_path",
            "Returns the absolute path of the file currently open in the editor.",
        ),
        ToolDescriptor::new(
            "get_selected_in_editor_text",
            "Returns the text currently selected in the editor, or an empty string.",
        ),
        ToolDescriptor::new(
            "replace_selected_text",
            "Replaces the current editor selection with the given text.",
        )
        .with_schema(json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Replacement text" }
            },
            "required": ["text"]
        })),
        ToolDescriptor::new(
            "get_file_text_by_path",
            "Returns the text of a project file addressed relative to the project root.",
        )
        .with_schema(path_schema("Path relative to the project root")),
        ToolDescriptor::new(
            "list_files_in_folder",
            "Lists files and directories in a project folder.",
        )
        .with_schema(path_schema("Folder path relative to the project root")),
        ToolDescriptor::new(
            "get_terminal_text",
            "Returns the visible text of the IDE's active terminal.",
        ),
        ToolDescriptor::new(
            "execute_terminal_command",
            "Runs a shell command in the IDE's integrated terminal and returns its output.",
        )
        .with_schema(json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "Command to run" }
            },
            "required": ["command"]
        })),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let tools = default_tools();
        let names: HashSet<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names.len(), tools.len());
    }

    #[test]
    fn test_schemas_are_objects() {
        for tool in default_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        }
    }
}
