pub mod auth;
pub mod icon;
pub mod pages;

pub use auth::LoginForm;
pub use icon::{Icon, icons};
pub use pages::{LoginPage, NotFoundPage, TherapyBookingPage};
