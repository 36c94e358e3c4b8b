//! User entity, request draft, rule table and partial-update merge.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::national_id::NationalId;
use super::validation::{validate, Rule, ViolationKind, Violations};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One local part, one domain, at least one dot in the domain.
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern")
    })
}

/// A persisted user record.
///
/// `national_id` always holds the canonical digits-only form; validation
/// canonicalizes the caller's input before the record is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Server-assigned identifier.
    #[schema(example = 42)]
    pub id: i64,
    /// Display name.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    /// National taxpayer identifier, canonical digits-only form, unique.
    #[schema(example = "52998224725")]
    pub national_id: String,
    /// Contact email address.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Contact phone number.
    #[schema(example = "+44 20 7946 0123")]
    pub phone_number: String,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp, absent until the first update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request-shaped user record under the zero-value-as-absence convention.
///
/// Empty strings mean "field not supplied"; the partial-update merge never
/// clears a stored value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct UserDraft {
    /// Display name; empty means not supplied.
    #[serde(default)]
    pub name: String,
    /// National taxpayer identifier, punctuated input accepted.
    #[serde(default)]
    pub national_id: String,
    /// Contact email address; empty means not supplied.
    #[serde(default)]
    pub email: String,
    /// Contact phone number; empty means not supplied.
    #[serde(default)]
    pub phone_number: String,
}

/// Declarative rule table for user business fields.
const USER_RULES: &[Rule<UserDraft>] = &[
    Rule {
        field: "name",
        check: |draft| draft.name.is_empty().then_some(ViolationKind::Required),
    },
    Rule {
        field: "national_id",
        check: |draft| {
            if draft.national_id.is_empty() {
                Some(ViolationKind::Required)
            } else if NationalId::parse(&draft.national_id).is_err() {
                Some(ViolationKind::Format("national id"))
            } else {
                None
            }
        },
    },
    Rule {
        field: "email",
        check: |draft| {
            if draft.email.is_empty() {
                Some(ViolationKind::Required)
            } else if !email_regex().is_match(&draft.email) {
                Some(ViolationKind::Format("email address"))
            } else {
                None
            }
        },
    },
    Rule {
        field: "phone_number",
        check: |draft| draft.phone_number.is_empty().then_some(ViolationKind::Required),
    },
];

impl UserDraft {
    /// Evaluate the user rule table, aggregating every failing field.
    ///
    /// Passing validation guarantees `national_id` parses; callers obtain
    /// the canonical form through [`UserDraft::canonical_national_id`].
    ///
    /// # Errors
    ///
    /// Returns the aggregated [`Violations`] when at least one business
    /// field is missing or malformed.
    pub fn validate(&self) -> Result<(), Violations> {
        validate(self, USER_RULES)
    }

    /// Canonical digits-only form of the draft's national id.
    ///
    /// Returns `None` when the identifier does not validate; callers run
    /// [`UserDraft::validate`] first so the aggregated report covers the
    /// failure.
    pub fn canonical_national_id(&self) -> Option<NationalId> {
        NationalId::parse(&self.national_id).ok()
    }
}

impl From<&User> for UserDraft {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            national_id: user.national_id.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number.clone(),
        }
    }
}

impl User {
    /// Merge a request draft into this record under the zero-value-as-absence
    /// convention. `id`, `created_at` and `updated_at` are never affected.
    pub fn merged_with(&self, draft: &UserDraft) -> Self {
        let mut merged = self.clone();
        if !draft.name.is_empty() {
            merged.name = draft.name.clone();
        }
        if !draft.national_id.is_empty() {
            merged.national_id = draft.national_id.clone();
        }
        if !draft.email.is_empty() {
            merged.email = draft.email.clone();
        }
        if !draft.phone_number.is_empty() {
            merged.phone_number = draft.phone_number.clone();
        }
        merged
    }
}
