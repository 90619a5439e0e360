//! Client configuration endpoint
//!
//! - GET /api/config - Settings the browser needs to run the login flow

use axum::{Json, Router, extract::State, routing::get};

use crate::core::config::ClientConfig;

/// Serve the client configuration
pub async fn client_config(State(config): State<ClientConfig>) -> Json<ClientConfig> {
    Json(config)
}

/// Create the config API router
pub fn config_router(config: ClientConfig) -> Router {
    Router::new()
        .route("/api/config", get(client_config))
        .with_state(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_config_handler_returns_state() {
        let config = ClientConfig {
            firebase_api_key: "k".to_string(),
            api_url: "https://api.example.com".to_string(),
            partner: "bumble".to_string(),
            redirect_path: "/therapy-booking".to_string(),
            strict_error_codes: true,
        };

        let Json(body) = client_config(State(config.clone())).await;

        assert_eq!(body, config);
    }
}
