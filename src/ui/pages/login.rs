//! Login page component
//!
//! Standalone page around the login form. The locale comes from the `lang`
//! query parameter so server render and hydration agree.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::core::Locale;
use crate::ui::auth::LoginForm;

/// Login page component
#[component]
pub fn LoginPage() -> impl IntoView {
    let query = use_query_map();
    let locale = Signal::derive(move || {
        query
            .get()
            .get("lang")
            .map(|lang| Locale::from_tag(&lang))
            .unwrap_or_default()
    });

    view! {
        <div class="min-h-screen bg-theme-primary flex flex-col">
            // Main content
            <main class="flex-1 flex items-center justify-center p-4">
                <div class="w-full max-w-md mx-auto bg-theme-primary rounded-xl shadow-lg p-6 border border-theme my-6">
                    <LoginForm locale=locale />
                </div>
            </main>
        </div>
    }
}
