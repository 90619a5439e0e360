//! Therapy booking page
//!
//! Landing point after a successful login. Booking itself lives in the
//! partner's booking service.

use leptos::prelude::*;

use crate::ui::icon::{Icon, icons};

#[component]
pub fn TherapyBookingPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-theme-primary flex flex-col items-center justify-center p-4">
            <div class="text-center">
                <div class="w-24 h-24 mx-auto mb-6 bg-theme-secondary rounded-full flex items-center justify-center">
                    <Icon name=icons::CALENDAR class="w-12 h-12 text-theme-tertiary" />
                </div>
                <h1 class="text-2xl font-semibold text-theme-primary mb-2">"Therapy booking"</h1>
                <p class="text-theme-secondary max-w-md mx-auto">
                    "You're signed in. Choose a time for your next session."
                </p>
            </div>
        </div>
    }
}
