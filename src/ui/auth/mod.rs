//! Authentication UI module
//!
//! The login form and the browser adapters it wires into the login flow.

mod adapters;
mod login_form;

pub use adapters::{
    ApiUserQuery, ConsoleEventLogger, FirebaseAuthProvider, RouterNavigator, SignalFormError,
    browser_store, fetch_client_config,
};
pub use login_form::LoginForm;
