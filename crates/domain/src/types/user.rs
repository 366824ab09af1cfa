//! User types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user. Never carries credentials or private fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub display_name: Option<String>,
    pub website: Option<String>,
}
