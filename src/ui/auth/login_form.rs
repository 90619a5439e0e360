//! Login form component
//!
//! Email/password form driving [`LoginSubmissionFlow`]. Each submit spawns
//! its own task with a freshly wired flow; the submit button stays disabled
//! while any submission is pending.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use super::adapters::{
    ApiUserQuery, ConsoleEventLogger, FirebaseAuthProvider, RouterNavigator, SignalFormError,
    browser_store,
};
use crate::core::config::ClientConfig;
use crate::core::{
    Catalogue, Credentials, FormError, Locale, LoginCollaborators, LoginSubmissionFlow,
    MessageKey, Translator,
};
use crate::ui::icon::{Icon, icons};

/// Login form component
#[component]
pub fn LoginForm(
    /// Locale for labels and error messages
    #[prop(into)]
    locale: Signal<Locale>,
) -> impl IntoView {
    let navigate = use_navigate();

    // Form state
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let form_error = RwSignal::new(None::<FormError>);
    let pending = RwSignal::new(0usize);
    let client_config = RwSignal::new(None::<ClientConfig>);

    // Load the client configuration after hydration
    #[cfg(not(feature = "ssr"))]
    {
        Effect::new(move |_| {
            spawn_local(async move {
                match super::adapters::fetch_client_config().await {
                    Ok(config) => client_config.set(Some(config)),
                    Err(e) => leptos::logging::error!("Failed to load client config: {}", e),
                }
            });
        });
    }

    let t = move |key: MessageKey| Catalogue::new(locale.get()).t(key);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        let Some(config) = client_config.get_untracked() else {
            leptos::logging::warn!("Login submitted before client config loaded");
            return;
        };

        let credentials = Credentials::new(email.get_untracked(), password.get_untracked());
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return;
        }

        let storage = browser_store();
        let flow = LoginSubmissionFlow::new(
            LoginCollaborators {
                auth: Rc::new(FirebaseAuthProvider::new(config.firebase_api_key.clone())),
                users: Rc::new(ApiUserQuery::new(config.user_url(), storage.clone())),
                events: Rc::new(ConsoleEventLogger),
                translator: Rc::new(Catalogue::new(locale.get_untracked())),
                navigator: Rc::new(RouterNavigator::new(navigate.clone())),
                storage,
                form_error: Rc::new(SignalFormError::new(form_error)),
            },
            config.login_settings(),
        );

        pending.update(|n| *n += 1);
        spawn_local(async move {
            if let Err(e) = flow.submit(credentials).await {
                leptos::logging::error!("Login failed: {}", e);
            }
            pending.update(|n| *n = n.saturating_sub(1));
        });
    };

    view! {
        <form on:submit=on_submit autocomplete="off" class="space-y-6">
            // Email field
            <div>
                <label for="email" class="block text-sm font-medium text-theme-primary mb-1">
                    {move || t(MessageKey::EmailLabel)}
                </label>
                <input
                    type="email"
                    id="email"
                    name="email"
                    required=true
                    class="w-full px-3 py-2 bg-theme-secondary border border-theme rounded-lg
                           text-theme-primary placeholder-theme-tertiary
                           focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                           transition-colors"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
            </div>

            // Password field
            <div>
                <label for="password" class="block text-sm font-medium text-theme-primary mb-1">
                    {move || t(MessageKey::PasswordLabel)}
                </label>
                <div class="relative">
                    <input
                        type=move || if show_password.get() { "text" } else { "password" }
                        id="password"
                        name="password"
                        required=true
                        class="w-full px-3 py-2 pr-10 bg-theme-secondary border border-theme rounded-lg
                               text-theme-primary placeholder-theme-tertiary
                               focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                               transition-colors"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button
                        type="button"
                        class="absolute inset-y-0 right-0 pr-3 flex items-center text-theme-tertiary hover:text-theme-secondary"
                        on:click=move |_| show_password.update(|v| *v = !*v)
                    >
                        {move || {
                            if show_password.get() {
                                view! { <Icon name=icons::EYE_CLOSED class="h-5 w-5" /> }.into_any()
                            } else {
                                view! { <Icon name=icons::EYE class="h-5 w-5" /> }.into_any()
                            }
                        }}
                    </button>
                </div>
            </div>

            // Form error message
            {move || {
                form_error.get().map(|error| {
                    view! {
                        <p class="flex items-center gap-2 text-sm text-red-700 dark:text-red-300">
                            <Icon name=icons::ALERT_CIRCLE class="h-4 w-4" />
                            {error.to_string()}
                        </p>
                    }
                })
            }}

            // Submit button
            <button
                type="submit"
                class="w-full py-2.5 px-4 bg-accent-primary hover:bg-accent-primary-hover
                       text-white font-medium rounded-lg
                       focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-accent-primary
                       disabled:opacity-50 disabled:cursor-not-allowed
                       transition-colors"
                disabled=move || pending.get() > 0 || client_config.get().is_none()
            >
                {move || {
                    if pending.get() > 0 {
                        view! {
                            <span class="flex items-center justify-center">
                                <Icon name=icons::LOADER class="animate-spin -ml-1 mr-2 h-4 w-4 text-white" />
                                {t(MessageKey::LoginSubmit)}
                            </span>
                        }.into_any()
                    } else {
                        view! { <span class="block">{t(MessageKey::LoginSubmit)}</span> }.into_any()
                    }
                }}
            </button>
        </form>
    }
}
