//! The static tool catalog.
//!
//! Pure declarative metadata: assembled once at startup and returned
//! verbatim by `tools/list`. Argument validation lives in the gateway, not
//! here.

use serde_json::{json, Value};

use crate::protocol::{Tool, ToolInputSchema};

fn tool(name: &str, description: &str, properties: Value, required: &[&str]) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: ToolInputSchema {
            r#type: "object".to_string(),
            properties: Some(properties),
            required: if required.is_empty() {
                None
            } else {
                Some(required.iter().map(|s| s.to_string()).collect())
            },
        },
    }
}

/// Build the full catalog, in its stable advertised order.
pub fn tools() -> Vec<Tool> {
    vec![
        tool(
            "get_copilot_cards",
            "Retrieve all cards marked as COPILOT from the specified Trello board/list. \
             Cards are filtered by label or name containing \"COPILOT\".",
            json!({
                "board_id": {
                    "type": "string",
                    "description": "Trello board ID (optional, uses the configured default if not provided)"
                },
                "list_name": {
                    "type": "string",
                    "description": "Name of the list to filter cards from (optional, uses the configured default)"
                }
            }),
            &[],
        ),
        tool(
            "get_card_details",
            "Get detailed information about a specific Trello card including description, \
             comments, and checklists.",
            json!({
                "card_id": {"type": "string", "description": "The ID of the Trello card"}
            }),
            &["card_id"],
        ),
        tool(
            "list_boards",
            "List all available Trello boards for the authenticated user.",
            json!({}),
            &[],
        ),
        tool(
            "list_board_lists",
            "List all lists in a specific Trello board.",
            json!({
                "board_id": {
                    "type": "string",
                    "description": "Trello board ID (optional, uses the configured default if not provided)"
                }
            }),
            &[],
        ),
        tool(
            "update_card_status",
            "Update a card by adding a comment about task completion status.",
            json!({
                "card_id": {"type": "string", "description": "The ID of the Trello card"},
                "comment": {"type": "string", "description": "Comment to add to the card"}
            }),
            &["card_id", "comment"],
        ),
        tool(
            "get_card_labels",
            "Get all labels attached to a specific Trello card.",
            json!({
                "card_id": {"type": "string", "description": "The ID of the Trello card"}
            }),
            &["card_id"],
        ),
        tool(
            "get_board_labels",
            "Get all available labels for a specific Trello board.",
            json!({
                "board_id": {
                    "type": "string",
                    "description": "Trello board ID (optional, uses the configured default if not provided)"
                }
            }),
            &[],
        ),
        tool(
            "add_label_to_card",
            "Add a label to a Trello card. You can specify either an existing label ID or \
             create a new label with a name and color.",
            json!({
                "card_id": {"type": "string", "description": "The ID of the Trello card"},
                "label_id": {
                    "type": "string",
                    "description": "The ID of an existing label to add (optional if label_name is provided)"
                },
                "label_name": {
                    "type": "string",
                    "description": "Name of the label to add or create (optional if label_id is provided)"
                },
                "color": {
                    "type": "string",
                    "description": "Color for the label if creating a new one. Options: yellow, purple, \
                                    blue, red, green, orange, black, sky, pink, lime, null"
                }
            }),
            &["card_id"],
        ),
        tool(
            "remove_label_from_card",
            "Remove a label from a Trello card.",
            json!({
                "card_id": {"type": "string", "description": "The ID of the Trello card"},
                "label_id": {"type": "string", "description": "The ID of the label to remove"}
            }),
            &["card_id", "label_id"],
        ),
    ]
}
