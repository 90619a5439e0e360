//! Login flow and the interfaces of the services it drives

#[cfg(feature = "ssr")]
pub mod api;
pub mod auth;
pub mod config;
pub mod events;
pub mod i18n;
pub mod login;
pub mod navigation;
pub mod storage;
pub mod user;
#[cfg(all(test, feature = "ssr"))]
mod tests;

pub use auth::{AuthProvider, AuthUser, ProviderError, UserCredential};
pub use events::{EventFields, EventLogger, EventName};
pub use i18n::{Catalogue, Locale, MessageKey, Translator};
pub use login::{
    Credentials, ErrorCodeMatching, FormError, FormErrorSink, LoginCollaborators, LoginFlowError,
    LoginSettings, LoginSubmissionFlow, SubmitOutcome,
};
pub use navigation::Navigator;
pub use storage::{ACCESS_TOKEN_KEY, KeyValueStore, MemoryStore, StorageError};
pub use user::{QueryError, UserProfile, UserQuery, UserQueryResponse};
