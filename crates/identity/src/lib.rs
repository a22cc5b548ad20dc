//! User identity for the wardrobe backend
//!
//! Credentials, sessions and password hashing live in an external identity
//! store; the core only consumes a read-mostly profile. Every core operation
//! takes the caller's profile as an explicit argument; there is no ambient
//! security context to reach into.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Error type
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("invalid value for registration field: {0}")]
    ValidationFailed(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// The caller's identity as supplied by the identity collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique, stable; everything else is mutable display data.
    pub username: String,
    pub email: String,
    pub gender: String,
    pub role: Role,
    /// Reference into durable object storage, if the user uploaded one.
    pub profile_image_url: Option<String>,
}

/// Identity collaborator.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the calling user, failing with
    /// [`IdentityError::Unauthenticated`] when no identity is attached to
    /// the request.
    async fn current_identity(&self) -> Result<UserProfile>;
}

/// A validated registration awaiting the credential store.
///
/// The password is opaque here; hashing happens in the external store.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub gender: String,
    pub role: Role,
}

struct RegistrationField {
    name: &'static str,
    validate: fn(&str) -> bool,
    assign: fn(&mut NewUser, String),
}

/// Enumerated registration fields, applied as ordered key/value assignments
/// against [`NewUser`]. Adding a field means adding an entry here; a name
/// without a matching struct field fails to compile.
const REGISTRATION_FIELDS: &[RegistrationField] = &[
    RegistrationField {
        name: "username",
        validate: not_blank,
        assign: |user, value| user.username = value,
    },
    RegistrationField {
        name: "email",
        validate: looks_like_email,
        assign: |user, value| user.email = value,
    },
    RegistrationField {
        name: "password",
        validate: long_enough,
        assign: |user, value| user.password = value,
    },
    RegistrationField {
        name: "gender",
        validate: known_gender,
        assign: |user, value| user.gender = value,
    },
];

fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

fn looks_like_email(value: &str) -> bool {
    not_blank(value) && value.contains('@')
}

fn long_enough(value: &str) -> bool {
    value.len() >= 8
}

fn known_gender(value: &str) -> bool {
    matches!(value, "male" | "female" | "other" | "unknown")
}

impl NewUser {
    /// Build a registration from form data.
    ///
    /// Fields are validated and assigned in declaration order; the first
    /// missing or invalid one fails. `role` is always forced to
    /// [`Role::User`]; admins are created through a separate path.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self> {
        let mut user = NewUser::default();
        for field in REGISTRATION_FIELDS {
            let value = form.get(field.name).map(String::as_str).unwrap_or("");
            if !(field.validate)(value) {
                log::debug!("registration rejected on field {}", field.name);
                return Err(IdentityError::ValidationFailed(field.name));
            }
            (field.assign)(&mut user, value.to_string());
        }
        user.role = Role::User;
        Ok(user)
    }
}
