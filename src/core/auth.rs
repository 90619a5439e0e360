//! Authentication provider interface
//!
//! The login flow talks to the provider only through [`AuthProvider`] and
//! [`AuthUser`]. Rejections carry a Firebase-style `auth/*` code which the
//! flow maps to a form message.
//!
//! This module also holds the Firebase Identity Toolkit REST wire types and
//! the mapping from its error messages to `auth/*` codes, so the browser
//! adapter stays a thin transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Provider error codes the login flow cares about
pub mod codes {
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    pub const USER_NOT_FOUND: &str = "auth/user-not-found";
    pub const WRONG_PASSWORD: &str = "auth/wrong-password";
    pub const USER_DISABLED: &str = "auth/user-disabled";
    pub const INVALID_CREDENTIAL: &str = "auth/invalid-credential";
    pub const TOO_MANY_REQUESTS: &str = "auth/too-many-requests";
    pub const NETWORK_REQUEST_FAILED: &str = "auth/network-request-failed";
    pub const INTERNAL_ERROR: &str = "auth/internal-error";
}

/// Provider rejection
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({code})")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Build from a Firebase REST `error.message` value
    pub fn from_firebase_message(message: &str) -> Self {
        Self::new(firebase_error_code(message), message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(codes::NETWORK_REQUEST_FAILED, message)
    }
}

/// Signed-in user as returned by the provider
#[async_trait(?Send)]
pub trait AuthUser {
    /// Identity token for the session, `None` if the provider issued none
    async fn get_id_token(&self) -> Result<Option<String>, ProviderError>;
}

/// Result of a successful sign-in
pub struct UserCredential {
    pub user: Option<Box<dyn AuthUser>>,
}

impl UserCredential {
    pub fn new(user: impl AuthUser + 'static) -> Self {
        Self {
            user: Some(Box::new(user)),
        }
    }

    /// Credential without a user object
    pub fn empty() -> Self {
        Self { user: None }
    }
}

/// External authentication provider
#[async_trait(?Send)]
pub trait AuthProvider {
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, ProviderError>;
}

// ============================================================================
// Firebase Identity Toolkit REST
// ============================================================================

/// Base endpoint for `accounts:signInWithPassword`
pub const FIREBASE_SIGN_IN_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:signInWithPassword";

/// `accounts:signInWithPassword` request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseSignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// `accounts:signInWithPassword` success body
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseSignInResponse {
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<String>,
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Firebase REST error envelope: `{"error": {"code": 400, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct FirebaseErrorResponse {
    pub error: FirebaseErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct FirebaseErrorBody {
    #[serde(default)]
    pub code: u16,
    pub message: String,
}

/// Map a Firebase REST error message to the SDK's `auth/*` code
///
/// Some messages carry a suffix (`TOO_MANY_ATTEMPTS_TRY_LATER : Access ...`),
/// so only the leading token is matched.
pub fn firebase_error_code(message: &str) -> &'static str {
    let token = message
        .split(|c: char| c == ':' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match token {
        "INVALID_EMAIL" => codes::INVALID_EMAIL,
        "EMAIL_NOT_FOUND" => codes::USER_NOT_FOUND,
        "INVALID_PASSWORD" => codes::WRONG_PASSWORD,
        "USER_DISABLED" => codes::USER_DISABLED,
        "INVALID_LOGIN_CREDENTIALS" => codes::INVALID_CREDENTIAL,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => codes::TOO_MANY_REQUESTS,
        _ => codes::INTERNAL_ERROR,
    }
}

/// Classify an `accounts:signInWithPassword` HTTP response
///
/// A 2xx body is the signed-in user. Any other status carries the error
/// envelope; a body that is neither becomes `auth/internal-error`.
pub fn firebase_sign_in_result(status: u16, body: &str) -> Result<FirebaseUser, ProviderError> {
    if (200..300).contains(&status) {
        return serde_json::from_str::<FirebaseSignInResponse>(body)
            .map(FirebaseUser::from)
            .map_err(|e| ProviderError::new(codes::INTERNAL_ERROR, e.to_string()));
    }

    match serde_json::from_str::<FirebaseErrorResponse>(body) {
        Ok(err) => Err(ProviderError::from_firebase_message(&err.error.message)),
        Err(_) => Err(ProviderError::new(
            codes::INTERNAL_ERROR,
            format!("Sign-in failed with status {}", status),
        )),
    }
}

/// User returned by the Firebase REST sign-in
#[derive(Debug, Clone)]
pub struct FirebaseUser {
    pub uid: String,
    pub email: Option<String>,
    id_token: String,
}

impl From<FirebaseSignInResponse> for FirebaseUser {
    fn from(resp: FirebaseSignInResponse) -> Self {
        Self {
            uid: resp.local_id,
            email: resp.email,
            id_token: resp.id_token,
        }
    }
}

#[async_trait(?Send)]
impl AuthUser for FirebaseUser {
    async fn get_id_token(&self) -> Result<Option<String>, ProviderError> {
        if self.id_token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(self.id_token.clone()))
        }
    }
}
