//! Application pages module
//!
//! - Login page (home)
//! - Therapy booking page, the post-login destination
//! - Not found page

mod login;
mod not_found;
mod therapy_booking;

pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use therapy_booking::TherapyBookingPage;
