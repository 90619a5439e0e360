//! Client-side navigation

/// Imperative route change
pub trait Navigator {
    fn push(&self, path: &str);
}
