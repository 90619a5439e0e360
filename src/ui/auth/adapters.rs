//! Browser implementations of the login flow collaborators
//!
//! - FirebaseAuthProvider: Identity Toolkit REST sign-in via gloo-net
//! - ApiUserQuery: `POST {api_url}/user/me` with the stored bearer token
//! - LocalStorageStore: `window.localStorage`, in-memory when unavailable
//! - RouterNavigator, SignalFormError, ConsoleEventLogger: leptos glue

use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::Request;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use serde_json::Value;

use crate::core::auth::{
    FIREBASE_SIGN_IN_URL, FirebaseSignInRequest, codes, firebase_sign_in_result,
};
use crate::core::config::ClientConfig;
use crate::core::{
    ACCESS_TOKEN_KEY, AuthProvider, EventFields, EventLogger, EventName, FormError, FormErrorSink,
    KeyValueStore, MemoryStore, Navigator, ProviderError, QueryError, StorageError, UserCredential,
    UserQuery, UserQueryResponse,
};

/// Fetch the client configuration served by `GET /api/config`
pub async fn fetch_client_config() -> Result<ClientConfig, gloo_net::Error> {
    Request::get("/api/config").send().await?.json().await
}

/// Firebase email/password sign-in over the REST API
pub struct FirebaseAuthProvider {
    api_key: String,
}

impl FirebaseAuthProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[async_trait(?Send)]
impl AuthProvider for FirebaseAuthProvider {
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserCredential, ProviderError> {
        let url = format!("{}?key={}", FIREBASE_SIGN_IN_URL, self.api_key);
        let body = FirebaseSignInRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = Request::post(&url)
            .json(&body)
            .map_err(|e| ProviderError::new(codes::INTERNAL_ERROR, e.to_string()))?
            .send()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(e.to_string()))?;

        firebase_sign_in_result(status, &body).map(UserCredential::new)
    }
}

/// Current-user query against the backend API
///
/// The endpoint resolves the user from the bearer token, so the identifier
/// argument is not sent.
pub struct ApiUserQuery {
    url: String,
    storage: Rc<dyn KeyValueStore>,
}

impl ApiUserQuery {
    pub fn new(url: impl Into<String>, storage: Rc<dyn KeyValueStore>) -> Self {
        Self {
            url: url.into(),
            storage,
        }
    }
}

#[async_trait(?Send)]
impl UserQuery for ApiUserQuery {
    async fn get_user(&self, _identifier: &str) -> UserQueryResponse {
        let mut request = Request::post(&self.url);
        if let Some(token) = self.storage.get_item(ACCESS_TOKEN_KEY) {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return UserQueryResponse::Error(QueryError::new(None, e.to_string())),
        };

        let status = response.status();
        let status_text = response.status_text();
        match response.text().await {
            Ok(body) => UserQueryResponse::from_http(status, &status_text, &body),
            Err(e) => UserQueryResponse::Error(QueryError::new(Some(status), e.to_string())),
        }
    }
}

/// `window.localStorage`, falling back to memory when storage is blocked
#[cfg(not(feature = "ssr"))]
#[derive(Default)]
pub struct LocalStorageStore {
    fallback: MemoryStore,
}

#[cfg(not(feature = "ssr"))]
impl LocalStorageStore {
    fn storage() -> Option<leptos::web_sys::Storage> {
        leptos::web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(not(feature = "ssr"))]
impl KeyValueStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match Self::storage() {
            Some(storage) => storage.get_item(key).ok().flatten(),
            None => self.fallback.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match Self::storage() {
            Some(storage) => storage
                .set_item(key, value)
                .map_err(|_| StorageError::WriteFailed(key.to_string())),
            None => self.fallback.set_item(key, value),
        }
    }
}

/// Key/value store for the current target
pub fn browser_store() -> Rc<dyn KeyValueStore> {
    #[cfg(not(feature = "ssr"))]
    {
        Rc::new(LocalStorageStore::default())
    }
    #[cfg(feature = "ssr")]
    {
        Rc::new(MemoryStore::new())
    }
}

/// Navigation through leptos_router
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    /// Wrap the function returned by `use_navigate()`
    pub fn new(navigate: impl Fn(&str, NavigateOptions) + 'static) -> Self {
        Self {
            navigate: Rc::new(navigate),
        }
    }
}

impl Navigator for RouterNavigator {
    fn push(&self, path: &str) {
        (self.navigate)(path, NavigateOptions::default());
    }
}

/// Form message area backed by a signal
pub struct SignalFormError(RwSignal<Option<FormError>>);

impl SignalFormError {
    pub fn new(signal: RwSignal<Option<FormError>>) -> Self {
        Self(signal)
    }
}

impl FormErrorSink for SignalFormError {
    fn set_form_error(&self, error: Option<FormError>) {
        self.0.set(error);
    }
}

/// Analytics events written to the browser console
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleEventLogger;

impl EventLogger for ConsoleEventLogger {
    fn log_event(&self, event: EventName, fields: EventFields) {
        leptos::logging::log!("[analytics] {} {}", event, Value::Object(fields));
    }
}
