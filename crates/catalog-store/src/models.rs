//! Database models for the storage layer.
//!
//! These types map directly to database rows and are used for
//! sqlx queries. Wire-facing request/response types live in the
//! server crate.

use std::fmt;
use std::str::FromStr;

use sqlx::FromRow;
use thiserror::Error;

/// Database row for the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub location: String,
    /// Stored string form of [`Gender`].
    pub gender: String,
}

/// Payload for inserting a new user.
///
/// The password is already hashed by the time it reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub password_hash: String,
    pub location: String,
    pub gender: Gender,
}

/// Database row for the `items` table.
///
/// `name` and `description` are nullable: item creation accepts
/// absent fields and stores NULL.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Payload for inserting or replacing an item.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// The fixed set of accepted gender values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// String form as stored in the `gender` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for gender values outside the accepted set.
#[derive(Debug, Error)]
#[error("invalid gender: {0}")]
pub struct InvalidGender(pub String);

impl FromStr for Gender {
    type Err = InvalidGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            other => Err(InvalidGender(other.to_string())),
        }
    }
}
