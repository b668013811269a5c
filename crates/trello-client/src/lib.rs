//! Typed client for the Trello REST API.
//!
//! All outbound calls go through [`TrelloClient`], which attaches the
//! configured credential pair to every request and maps non-2xx responses
//! into [`ClientError`]. The model types mirror the remote payloads and
//! tolerate absent fields; Trello owns their lifecycle.

pub mod client;
pub mod error;
pub mod types;

pub use client::{Credentials, TrelloClient, DEFAULT_BASE_URL};
pub use error::{ClientError, ClientResult};
pub use types::{Board, Card, CheckItem, Checklist, CommentAction, Label, List, Member};
