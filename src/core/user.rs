//! User query service and profile model

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Authenticated user record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub contact_permission: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Partner {
    pub name: String,
}

/// Partner access granted to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartnerAccess {
    pub partner: Partner,
    #[serde(default)]
    pub feature_therapy: bool,
    #[serde(default)]
    pub feature_live_chat: bool,
    #[serde(default)]
    pub therapy_sessions_remaining: u32,
    #[serde(default)]
    pub therapy_sessions_redeemed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PartnerAdmin {
    pub partner: Partner,
}

/// Response body of the current-user query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user: UserRecord,
    #[serde(default)]
    pub partner_accesses: Vec<PartnerAccess>,
    #[serde(default)]
    pub partner_admin: Option<PartnerAdmin>,
}

/// Query failure as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("User query failed (status {status:?}): {message}")]
pub struct QueryError {
    pub status: Option<u16>,
    pub message: String,
}

impl QueryError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Either shape of a user query response
#[derive(Debug, Clone, PartialEq)]
pub enum UserQueryResponse {
    Data(UserProfile),
    Error(QueryError),
}

impl UserQueryResponse {
    /// Classify an HTTP response from the current-user endpoint
    ///
    /// Non-2xx statuses report the status text; a 2xx body that is not a
    /// profile reports the decode error.
    pub fn from_http(status: u16, status_text: &str, body: &str) -> Self {
        if !(200..300).contains(&status) {
            return UserQueryResponse::Error(QueryError::new(Some(status), status_text));
        }

        match serde_json::from_str::<UserProfile>(body) {
            Ok(profile) => UserQueryResponse::Data(profile),
            Err(e) => UserQueryResponse::Error(QueryError::new(Some(status), e.to_string())),
        }
    }
}

/// Current-user query service
///
/// The service reports failures through [`UserQueryResponse::Error`]
/// rather than rejecting.
#[async_trait(?Send)]
pub trait UserQuery {
    async fn get_user(&self, identifier: &str) -> UserQueryResponse;
}
