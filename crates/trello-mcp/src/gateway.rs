//! Per-tool orchestration against the Trello API.
//!
//! One method per tool. Each derives its behavior from the invocation's
//! arguments plus the configured defaults; the only externally observable
//! side effects are the remote mutations (label creation/attachment/
//! detachment, comment posting).

use serde_json::{json, Value};
use tracing::debug;

use trello_client::{Card, Credentials, TrelloClient};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::protocol::CallToolResult;

/// Cards whose own name or any label name contains this marker
/// (case-insensitively) are considered copilot-tagged.
pub const COPILOT_MARKER: &str = "COPILOT";

/// Color used when creating a label by name without an explicit color.
pub const DEFAULT_LABEL_COLOR: &str = "blue";

pub struct Gateway {
    client: TrelloClient,
    default_board_id: Option<String>,
    default_list_filter: Option<String>,
}

impl Gateway {
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let credentials =
            Credentials { key: config.api_key.clone(), token: config.api_token.clone() };
        let client = TrelloClient::with_base_url(credentials, &config.base_url)?;
        Ok(Self {
            client,
            default_board_id: config.default_board_id.clone(),
            default_list_filter: config.default_list_filter.clone(),
        })
    }

    /// Route one invocation to its orchestrator.
    pub async fn call(&self, name: &str, arguments: &Value) -> GatewayResult<CallToolResult> {
        match name {
            "get_copilot_cards" => self.get_copilot_cards(arguments).await,
            "get_card_details" => self.get_card_details(arguments).await,
            "list_boards" => self.list_boards().await,
            "list_board_lists" => self.list_board_lists(arguments).await,
            "update_card_status" => self.update_card_status(arguments).await,
            "get_card_labels" => self.get_card_labels(arguments).await,
            "get_board_labels" => self.get_board_labels(arguments).await,
            "add_label_to_card" => self.add_label_to_card(arguments).await,
            "remove_label_from_card" => self.remove_label_from_card(arguments).await,
            other => Err(GatewayError::UnknownTool(other.to_string())),
        }
    }

    fn resolve_board_id(&self, arguments: &Value) -> GatewayResult<String> {
        opt_arg(arguments, "board_id")
            .map(str::to_string)
            .or_else(|| self.default_board_id.clone())
            .ok_or_else(|| {
                GatewayError::MissingArgument(
                    "board_id must be provided or set via TRELLO_BOARD_ID".to_string(),
                )
            })
    }

    async fn get_copilot_cards(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let board_id = self.resolve_board_id(arguments)?;
        let list_filter = opt_arg(arguments, "list_name")
            .map(str::to_string)
            .or_else(|| self.default_list_filter.clone());

        let lists = self.client.lists_for_board(&board_id).await?;
        let target_lists: Vec<_> = match &list_filter {
            Some(filter) => {
                let needle = filter.to_lowercase();
                lists.into_iter().filter(|l| l.name.to_lowercase().contains(&needle)).collect()
            }
            None => lists,
        };

        if target_lists.is_empty() {
            let filter = list_filter.as_deref().unwrap_or_default();
            return Ok(CallToolResult::text(format!(
                "No lists found matching \"{filter}\" in the board."
            )));
        }

        // Concatenate in list-fetch order so output is stable.
        let mut cards = Vec::new();
        for list in &target_lists {
            cards.extend(self.client.cards_for_list(&list.id).await?);
        }

        let copilot_cards: Vec<&Card> =
            cards.iter().filter(|card| is_copilot_card(card)).collect();
        if copilot_cards.is_empty() {
            return Ok(CallToolResult::text(
                "No cards marked as COPILOT found in the specified list(s).",
            ));
        }

        let summary: Vec<Value> = copilot_cards
            .iter()
            .map(|card| {
                json!({
                    "id": card.id,
                    "name": card.name,
                    "description": card.desc,
                    "url": card.url,
                    "labels": label_names(card),
                    "due": card.due,
                })
            })
            .collect();
        Ok(CallToolResult::text(serde_json::to_string_pretty(&summary)?))
    }

    async fn get_card_details(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let card_id = required_arg(arguments, "card_id")?;

        let card = self.client.card(card_id).await?;
        let comments = self.client.card_comments(card_id).await?;
        let checklists = self.client.card_checklists(card_id).await?;

        let details = json!({
            "id": card.id,
            "name": card.name,
            "description": card.desc,
            "url": card.url,
            "labels": label_names(&card),
            "due": card.due,
            "comments": comments.iter().map(|c| json!({
                "date": c.date,
                "text": c.data.text,
                "memberCreator": c.member_creator.as_ref().map(|m| m.full_name.as_str()).unwrap_or(""),
            })).collect::<Vec<_>>(),
            "checklists": checklists.iter().map(|cl| json!({
                "name": cl.name,
                "items": cl.check_items.iter().map(|item| json!({
                    "name": item.name,
                    "state": item.state,
                })).collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
        });
        Ok(CallToolResult::text(serde_json::to_string_pretty(&details)?))
    }

    async fn list_boards(&self) -> GatewayResult<CallToolResult> {
        let boards = self.client.boards_for_member().await?;
        let summary: Vec<Value> =
            boards.iter().map(|b| json!({"id": b.id, "name": b.name})).collect();
        Ok(CallToolResult::text(serde_json::to_string_pretty(&summary)?))
    }

    async fn list_board_lists(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let board_id = self.resolve_board_id(arguments)?;
        let lists = self.client.lists_for_board(&board_id).await?;
        let summary: Vec<Value> =
            lists.iter().map(|l| json!({"id": l.id, "name": l.name})).collect();
        Ok(CallToolResult::text(serde_json::to_string_pretty(&summary)?))
    }

    async fn update_card_status(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let (card_id, comment) = match (opt_arg(arguments, "card_id"), opt_arg(arguments, "comment"))
        {
            (Some(card_id), Some(comment)) => (card_id, comment),
            _ => {
                return Err(GatewayError::MissingArgument(
                    "card_id and comment are required".to_string(),
                ))
            }
        };

        self.client.add_comment(card_id, comment).await?;
        Ok(CallToolResult::text(format!("Comment added to card {card_id}: \"{comment}\"")))
    }

    async fn get_card_labels(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let card_id = required_arg(arguments, "card_id")?;
        let labels = self.client.card_labels(card_id).await?;
        Ok(CallToolResult::text(serde_json::to_string_pretty(&labels)?))
    }

    async fn get_board_labels(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let board_id = self.resolve_board_id(arguments)?;
        let labels = self.client.board_labels(&board_id).await?;
        Ok(CallToolResult::text(serde_json::to_string_pretty(&labels)?))
    }

    /// Attach by id when given one; otherwise find-or-create by name.
    ///
    /// The by-name path never creates a duplicate of an existing label: a
    /// case-insensitive exact name match on the card's board is reused.
    /// The read-then-create window is racy if two invocations target the
    /// same board and name concurrently; the stdio loop dispatches one
    /// invocation at a time, so this is accepted rather than locked.
    async fn add_label_to_card(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let card_id = required_arg(arguments, "card_id")?;

        if let Some(label_id) = opt_arg(arguments, "label_id") {
            self.client.attach_label(card_id, label_id).await?;
            return Ok(CallToolResult::text(format!(
                "Label {label_id} added to card {card_id}"
            )));
        }

        let label_name = opt_arg(arguments, "label_name").ok_or_else(|| {
            GatewayError::MissingArgument(
                "either label_id or label_name must be provided".to_string(),
            )
        })?;

        let card = self.client.card(card_id).await?;
        let board_id = card.id_board.ok_or_else(|| {
            GatewayError::Invalid(format!("card {card_id} response did not include a board id"))
        })?;

        let board_labels = self.client.board_labels(&board_id).await?;
        let needle = label_name.to_lowercase();
        let label = match board_labels.into_iter().find(|l| l.name.to_lowercase() == needle) {
            Some(existing) => {
                debug!(label_id = %existing.id, name = %label_name, "reusing existing label");
                existing
            }
            None => {
                let color = opt_arg(arguments, "color").unwrap_or(DEFAULT_LABEL_COLOR);
                self.client.create_board_label(&board_id, label_name, color).await?
            }
        };

        self.client.attach_label(card_id, &label.id).await?;
        Ok(CallToolResult::text(format!(
            "Label \"{label_name}\" ({label_id}) added to card {card_id}",
            label_id = label.id
        )))
    }

    async fn remove_label_from_card(&self, arguments: &Value) -> GatewayResult<CallToolResult> {
        let (card_id, label_id) =
            match (opt_arg(arguments, "card_id"), opt_arg(arguments, "label_id")) {
                (Some(card_id), Some(label_id)) => (card_id, label_id),
                _ => {
                    return Err(GatewayError::MissingArgument(
                        "card_id and label_id are required".to_string(),
                    ))
                }
            };

        self.client.detach_label(card_id, label_id).await?;
        Ok(CallToolResult::text(format!("Label {label_id} removed from card {card_id}")))
    }
}

fn opt_arg<'a>(arguments: &'a Value, name: &str) -> Option<&'a str> {
    arguments.get(name).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn required_arg<'a>(arguments: &'a Value, name: &str) -> GatewayResult<&'a str> {
    opt_arg(arguments, name)
        .ok_or_else(|| GatewayError::MissingArgument(format!("{name} is required")))
}

fn is_copilot_card(card: &Card) -> bool {
    card.name.to_uppercase().contains(COPILOT_MARKER)
        || card.labels.iter().any(|label| label.name.to_uppercase().contains(COPILOT_MARKER))
}

fn label_names(card: &Card) -> Vec<String> {
    card.labels.iter().map(|label| label.name.clone()).collect()
}
