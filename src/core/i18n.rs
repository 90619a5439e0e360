//! Localized strings for the login form
//!
//! Provides:
//! - MessageKey, the fixed set of keys the form looks up
//! - Translator, the lookup interface the login flow depends on
//! - Locale and Catalogue, a built-in translator for en/es/fr

/// Keys of the `Auth.form` message namespace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    EmailLabel,
    PasswordLabel,
    LoginSubmit,
    InvalidEmail,
    AuthError,
}

impl MessageKey {
    pub const ALL: [MessageKey; 5] = [
        MessageKey::EmailLabel,
        MessageKey::PasswordLabel,
        MessageKey::LoginSubmit,
        MessageKey::InvalidEmail,
        MessageKey::AuthError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::EmailLabel => "emailLabel",
            MessageKey::PasswordLabel => "passwordLabel",
            MessageKey::LoginSubmit => "loginSubmit",
            MessageKey::InvalidEmail => "firebase.invalidEmail",
            MessageKey::AuthError => "firebase.authError",
        }
    }
}

/// Keyed lookup of displayable strings
pub trait Translator {
    fn t(&self, key: MessageKey) -> String;
}

/// Supported locales
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
    Fr,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::Fr => "fr",
        }
    }

    /// Parse a language tag, ignoring region (`es-MX` -> `Es`)
    ///
    /// Unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or_default();
        match language.to_ascii_lowercase().as_str() {
            "es" => Locale::Es,
            "fr" => Locale::Fr,
            _ => Locale::En,
        }
    }
}

/// Built-in message catalogue for one locale
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Catalogue {
    locale: Locale,
}

impl Catalogue {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    fn lookup(&self, key: MessageKey) -> &'static str {
        use MessageKey::*;

        match (self.locale, key) {
            (Locale::En, EmailLabel) => "Email address",
            (Locale::En, PasswordLabel) => "Password",
            (Locale::En, LoginSubmit) => "Login",
            (Locale::En, InvalidEmail) => "Please enter a valid email address.",
            (Locale::En, AuthError) => "Your email or password is incorrect.",

            (Locale::Es, EmailLabel) => "Correo electrónico",
            (Locale::Es, PasswordLabel) => "Contraseña",
            (Locale::Es, LoginSubmit) => "Iniciar sesión",
            (Locale::Es, InvalidEmail) => "Introduce una dirección de correo electrónico válida.",
            (Locale::Es, AuthError) => "Tu correo electrónico o contraseña son incorrectos.",

            (Locale::Fr, EmailLabel) => "Adresse e-mail",
            (Locale::Fr, PasswordLabel) => "Mot de passe",
            (Locale::Fr, LoginSubmit) => "Se connecter",
            (Locale::Fr, InvalidEmail) => "Veuillez saisir une adresse e-mail valide.",
            (Locale::Fr, AuthError) => "Votre e-mail ou mot de passe est incorrect.",
        }
    }
}

impl Translator for Catalogue {
    fn t(&self, key: MessageKey) -> String {
        self.lookup(key).to_string()
    }
}
