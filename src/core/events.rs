//! Analytics events emitted by the login flow
//!
//! Events are fire-and-forget: [`EventLogger::log_event`] returns nothing and
//! the flow never waits on delivery.

use serde_json::{Map, Value};

use crate::core::user::{PartnerAccess, UserProfile};

/// Login analytics event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum EventName {
    #[display("LOGIN_REQUEST")]
    LoginRequest,
    #[display("LOGIN_SUCCESS")]
    LoginSuccess,
    #[display("LOGIN_ERROR")]
    LoginError,
}

/// Auxiliary event fields
pub type EventFields = Map<String, Value>;

/// Fire-and-forget analytics sink
pub trait EventLogger {
    fn log_event(&self, event: EventName, fields: EventFields);
}

/// Account type reported with user events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    PartnerAdmin,
    PartnerUser,
    PublicUser,
}

impl AccountType {
    pub fn of(profile: &UserProfile) -> Self {
        if profile.partner_admin.is_some() {
            AccountType::PartnerAdmin
        } else if !profile.partner_accesses.is_empty() {
            AccountType::PartnerUser
        } else {
            AccountType::PublicUser
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::PartnerAdmin => "partner_admin",
            AccountType::PartnerUser => "partner_user",
            AccountType::PublicUser => "public_user",
        }
    }
}

/// Fields carrying only a partner tag
pub fn partner_fields(partner: &str) -> EventFields {
    let mut fields = EventFields::new();
    fields.insert("partner".into(), Value::from(partner));
    fields
}

/// Derive analytics fields from the current user profile
///
/// Fields whose source is absent are omitted. Feature flags are true when any
/// partner access grants them; session counts are summed.
pub fn event_user_data(profile: &UserProfile) -> EventFields {
    let mut fields = EventFields::new();

    fields.insert(
        "account_type".into(),
        Value::from(AccountType::of(profile).as_str()),
    );
    if let Some(created_at) = &profile.user.created_at {
        fields.insert("registration_date".into(), Value::from(created_at.as_str()));
    }
    if let Some(language) = &profile.user.language {
        fields.insert("language".into(), Value::from(language.as_str()));
    }

    let partner = match &profile.partner_admin {
        Some(admin) => Some(admin.partner.name.clone()),
        None if !profile.partner_accesses.is_empty() => Some(
            profile
                .partner_accesses
                .iter()
                .map(|access| access.partner.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        None => None,
    };
    if let Some(partner) = partner {
        fields.insert("partner".into(), Value::from(partner));
    }

    let accesses = &profile.partner_accesses;
    if !accesses.is_empty() {
        fields.insert(
            "feature_therapy".into(),
            Value::from(accesses.iter().any(|a| a.feature_therapy)),
        );
        fields.insert(
            "feature_live_chat".into(),
            Value::from(accesses.iter().any(|a| a.feature_live_chat)),
        );
        fields.insert(
            "therapy_sessions_remaining".into(),
            Value::from(session_total(accesses, |a| a.therapy_sessions_remaining)),
        );
        fields.insert(
            "therapy_sessions_redeemed".into(),
            Value::from(session_total(accesses, |a| a.therapy_sessions_redeemed)),
        );
    }

    fields
}

// Counts come from the service unchecked; sum wide.
fn session_total(accesses: &[PartnerAccess], count: impl Fn(&PartnerAccess) -> u32) -> u64 {
    accesses.iter().map(|a| u64::from(count(a))).sum()
}
