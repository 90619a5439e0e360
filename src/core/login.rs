//! Login submission flow
//!
//! Turns an email/password pair into either a session (token persisted, user
//! fetched, success event, redirect) or a form message (error event plus a
//! localized string). Every collaborator is injected, so the flow runs the
//! same against browser adapters and test doubles.
//!
//! The flow has no mutable state of its own. Each submission is an
//! independent `submit` call; nothing prevents overlapping submissions and
//! the token slot is last-writer-wins.

use std::fmt;
use std::rc::Rc;

use crate::core::auth::{AuthProvider, ProviderError, codes};
use crate::core::events::{EventLogger, EventName, event_user_data, partner_fields};
use crate::core::i18n::{MessageKey, Translator};
use crate::core::navigation::Navigator;
use crate::core::storage::{ACCESS_TOKEN_KEY, KeyValueStore};
use crate::core::user::{UserQuery, UserQueryResponse};

/// Partner tag attached to login events
pub const DEFAULT_PARTNER: &str = "bumble";

/// Where a successful login lands
pub const DEFAULT_REDIRECT_PATH: &str = "/therapy-booking";

/// Email/password pair held for one submission
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Message shown beneath the form fields
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub struct FormError(String);

impl FormError {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The form's message area
pub trait FormErrorSink {
    fn set_form_error(&self, error: Option<FormError>);
}

/// How rejection codes other than `auth/invalid-email` are mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCodeMatching {
    /// Every other code shows the generic authentication error
    #[default]
    Lenient,
    /// Only `auth/user-not-found` and `auth/wrong-password` show it; other
    /// codes show nothing
    Strict,
}

/// Map a provider rejection code to a form message
pub fn form_error_for(
    code: &str,
    matching: ErrorCodeMatching,
    translator: &dyn Translator,
) -> Option<FormError> {
    let key = match (code, matching) {
        (codes::INVALID_EMAIL, _) => Some(MessageKey::InvalidEmail),
        (_, ErrorCodeMatching::Lenient) => Some(MessageKey::AuthError),
        (codes::USER_NOT_FOUND | codes::WRONG_PASSWORD, ErrorCodeMatching::Strict) => {
            Some(MessageKey::AuthError)
        }
        (_, ErrorCodeMatching::Strict) => None,
    };

    key.map(|key| FormError(translator.t(key)))
}

/// Flow settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSettings {
    pub partner: String,
    pub redirect_path: String,
    pub error_matching: ErrorCodeMatching,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            partner: DEFAULT_PARTNER.to_string(),
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
            error_matching: ErrorCodeMatching::default(),
        }
    }
}

/// External services the flow drives
#[derive(Clone)]
pub struct LoginCollaborators {
    pub auth: Rc<dyn AuthProvider>,
    pub users: Rc<dyn UserQuery>,
    pub events: Rc<dyn EventLogger>,
    pub translator: Rc<dyn Translator>,
    pub navigator: Rc<dyn Navigator>,
    pub storage: Rc<dyn KeyValueStore>,
    pub form_error: Rc<dyn FormErrorSink>,
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// User fetched, success logged, navigation triggered
    Redirected { path: String },
    /// Signed in but the user query returned its error shape; nothing shown
    UserQueryFailed,
    /// Provider rejected the credentials
    Rejected {
        code: String,
        message: String,
        form_error: Option<FormError>,
    },
}

/// Failures that escape the flow instead of becoming form state
#[derive(Debug, thiserror::Error)]
pub enum LoginFlowError {
    #[error("Failed to retrieve identity token: {0}")]
    IdToken(#[source] ProviderError),
}

/// Orchestrates one sign-in attempt and its side effects
#[derive(Clone)]
pub struct LoginSubmissionFlow {
    collaborators: LoginCollaborators,
    settings: LoginSettings,
}

impl LoginSubmissionFlow {
    pub fn new(collaborators: LoginCollaborators, settings: LoginSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    pub fn settings(&self) -> &LoginSettings {
        &self.settings
    }

    /// Run one submission
    ///
    /// Provider rejections are absorbed into form state and returned as
    /// [`SubmitOutcome::Rejected`]. Only a failing identity-token retrieval
    /// is returned as an error.
    pub async fn submit(&self, credentials: Credentials) -> Result<SubmitOutcome, LoginFlowError> {
        let c = &self.collaborators;

        c.form_error.set_form_error(None);
        c.events
            .log_event(EventName::LoginRequest, partner_fields(&self.settings.partner));

        tracing::debug!("signing in");

        let signed_in = c
            .auth
            .sign_in_with_email_and_password(&credentials.email, &credentials.password)
            .await;

        match signed_in {
            Ok(credential) => {
                let token = match &credential.user {
                    Some(user) => user.get_id_token().await.map_err(LoginFlowError::IdToken)?,
                    None => None,
                };
                self.store_token(token.as_deref());
                self.complete_login().await
            }
            Err(error) => Ok(self.reject(error)),
        }
    }

    fn store_token(&self, token: Option<&str>) {
        let Some(token) = token else {
            tracing::debug!("provider issued no identity token");
            return;
        };

        if let Err(e) = self.collaborators.storage.set_item(ACCESS_TOKEN_KEY, token) {
            tracing::warn!("Failed to persist access token: {}", e);
        }
    }

    async fn complete_login(&self) -> Result<SubmitOutcome, LoginFlowError> {
        let c = &self.collaborators;

        // The query service identifies the user from the stored token.
        match c.users.get_user("").await {
            UserQueryResponse::Data(profile) => {
                c.events
                    .log_event(EventName::LoginSuccess, event_user_data(&profile));
                c.navigator.push(&self.settings.redirect_path);

                tracing::debug!(path = %self.settings.redirect_path, "login complete");
                Ok(SubmitOutcome::Redirected {
                    path: self.settings.redirect_path.clone(),
                })
            }
            UserQueryResponse::Error(e) => {
                tracing::warn!("Signed in but user query failed: {}", e);
                Ok(SubmitOutcome::UserQueryFailed)
            }
        }
    }

    fn reject(&self, error: ProviderError) -> SubmitOutcome {
        let c = &self.collaborators;

        let mut fields = partner_fields(&self.settings.partner);
        fields.insert("message".into(), error.code.clone().into());
        c.events.log_event(EventName::LoginError, fields);

        let form_error = form_error_for(
            &error.code,
            self.settings.error_matching,
            c.translator.as_ref(),
        );
        if form_error.is_some() {
            c.form_error.set_form_error(form_error.clone());
        }

        tracing::debug!(code = %error.code, "sign-in rejected");
        SubmitOutcome::Rejected {
            code: error.code,
            message: error.message,
            form_error,
        }
    }
}
