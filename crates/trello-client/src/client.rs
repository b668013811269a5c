use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::types::{Board, Card, Checklist, CommentAction, Label, List};

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

/// The pre-obtained API key/token pair presented on every call.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub key: String,
    pub token: String,
}

/// Single choke point for outbound calls to the Trello API.
///
/// One method per remote resource. Each call reflects current remote state
/// at call time; there are no retries and no caching.
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl TrelloClient {
    pub fn new(credentials: Credentials) -> ClientResult<Self> {
        Self::with_base_url(credentials, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(credentials: Credentials, base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidConfig(format!("invalid base URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidConfig(format!(
                "base URL {base_url} cannot carry path segments"
            )));
        }
        Ok(Self { http: reqwest::Client::new(), base_url, credentials })
    }

    /// Build an endpoint URL with the credential pair already attached.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            // cannot_be_a_base is rejected at construction
            let mut path = url.path_segments_mut().expect("base URL validated");
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url.query_pairs_mut()
            .append_pair("key", &self.credentials.key)
            .append_pair("token", &self.credentials.token);
        url
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(operation, status = status.as_u16(), "trello call failed");
            return Err(ClientError::Api { operation, status: status.as_u16(), message });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
    ) -> ClientResult<T> {
        let response = self.send(operation, self.http.get(url)).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode { operation, source })
    }

    /// `GET /members/me/boards`
    pub async fn boards_for_member(&self) -> ClientResult<Vec<Board>> {
        let url = self.endpoint(&["members", "me", "boards"]);
        self.get_json("list boards", url).await
    }

    /// `GET /boards/{id}/lists`
    pub async fn lists_for_board(&self, board_id: &str) -> ClientResult<Vec<List>> {
        let url = self.endpoint(&["boards", board_id, "lists"]);
        self.get_json("list board lists", url).await
    }

    /// `GET /lists/{id}/cards`
    pub async fn cards_for_list(&self, list_id: &str) -> ClientResult<Vec<Card>> {
        let url = self.endpoint(&["lists", list_id, "cards"]);
        self.get_json("list cards", url).await
    }

    /// `GET /cards/{id}?fields=all`
    pub async fn card(&self, card_id: &str) -> ClientResult<Card> {
        let mut url = self.endpoint(&["cards", card_id]);
        url.query_pairs_mut().append_pair("fields", "all");
        self.get_json("get card", url).await
    }

    /// `GET /cards/{id}/actions?filter=commentCard`
    pub async fn card_comments(&self, card_id: &str) -> ClientResult<Vec<CommentAction>> {
        let mut url = self.endpoint(&["cards", card_id, "actions"]);
        url.query_pairs_mut().append_pair("filter", "commentCard");
        self.get_json("get card comments", url).await
    }

    /// `GET /cards/{id}/checklists`
    pub async fn card_checklists(&self, card_id: &str) -> ClientResult<Vec<Checklist>> {
        let url = self.endpoint(&["cards", card_id, "checklists"]);
        self.get_json("get card checklists", url).await
    }

    /// `GET /cards/{id}/labels`
    pub async fn card_labels(&self, card_id: &str) -> ClientResult<Vec<Label>> {
        let url = self.endpoint(&["cards", card_id, "labels"]);
        self.get_json("get card labels", url).await
    }

    /// `GET /boards/{id}/labels`
    pub async fn board_labels(&self, board_id: &str) -> ClientResult<Vec<Label>> {
        let url = self.endpoint(&["boards", board_id, "labels"]);
        self.get_json("get board labels", url).await
    }

    /// `POST /boards/{id}/labels?name=&color=`
    pub async fn create_board_label(
        &self,
        board_id: &str,
        name: &str,
        color: &str,
    ) -> ClientResult<Label> {
        let mut url = self.endpoint(&["boards", board_id, "labels"]);
        url.query_pairs_mut().append_pair("name", name).append_pair("color", color);
        let response = self.send("create label", self.http.post(url)).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|source| ClientError::Decode { operation: "create label", source })
    }

    /// `POST /cards/{id}/idLabels?value=`
    pub async fn attach_label(&self, card_id: &str, label_id: &str) -> ClientResult<()> {
        let mut url = self.endpoint(&["cards", card_id, "idLabels"]);
        url.query_pairs_mut().append_pair("value", label_id);
        self.send("attach label", self.http.post(url)).await?;
        Ok(())
    }

    /// `DELETE /cards/{id}/idLabels/{labelId}`
    ///
    /// Any 2xx response counts as success; Trello may answer with an empty
    /// body here and that must not be read as failure.
    pub async fn detach_label(&self, card_id: &str, label_id: &str) -> ClientResult<()> {
        let url = self.endpoint(&["cards", card_id, "idLabels", label_id]);
        self.send("detach label", self.http.delete(url)).await?;
        Ok(())
    }

    /// `POST /cards/{id}/actions/comments?text=`
    pub async fn add_comment(&self, card_id: &str, text: &str) -> ClientResult<()> {
        let mut url = self.endpoint(&["cards", card_id, "actions", "comments"]);
        url.query_pairs_mut().append_pair("text", text);
        self.send("add comment", self.http.post(url)).await?;
        Ok(())
    }
}
