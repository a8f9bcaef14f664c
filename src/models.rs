use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::Error;

// --- Core Application Schemas (Mapped to Database) ---

/// Role
///
/// The closed set of access levels recognized by the authorization policy.
/// Stored in Postgres as the `user_role` enum type and serialized to JSON
/// as `regular` / `admin` / `super_admin`.
///
/// The enum is deliberately closed: a value outside the three variants fails
/// to decode (serde and sqlx alike) instead of falling back to a privileged
/// level. Variant order gives the privilege ranking used by the derived
/// `Ord`: `Regular < Admin < SuperAdmin`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    TS,
    ToSchema,
    sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    // Least-privileged level doubles as Default, used by test scaffolding
    // via `User::default()`.
    #[default]
    Regular,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Whether this role may read the full registry (every owner's images).
    pub fn can_view_all_images(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Whether this role may delete registry records. Stricter than the
    /// listing check: only the top level qualifies, admin is insufficient.
    pub fn can_delete_images(self) -> bool {
        self == Role::SuperAdmin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Regular => "regular",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Parses the wire/storage spelling of a role. Anything outside the
    /// closed set is an error, never a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Role::Regular),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(Error::Validation(format!("unknown role '{other}'"))),
        }
    }
}

/// User
///
/// The authenticated principal record stored in the `users` table. This is
/// the minimal identity data the access policy needs: who the caller is and
/// which role they hold. Password material lives with the external auth
/// provider and is never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// ImageRecord
///
/// One row of the image registry (`images` table): the metadata for a single
/// uploaded image. The record references the stored binary through
/// `location_ref` but never contains the bytes themselves.
///
/// Records are immutable once created; the only lifecycle transition after
/// insertion is deletion.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ImageRecord {
    pub id: Uuid,
    // Set from the authenticated identity at creation, never reassignable.
    pub owner_id: Uuid,
    // Opaque reference produced by the storage layer (e.g. "/uploads/<key>").
    pub location_ref: String,
    pub title: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

/// ImageWithOwner
///
/// An `ImageRecord` annotated with a minimal owner summary, produced by the
/// admin listing via a JOIN against `users`. Only name and email are exposed;
/// the rest of the identity record stays internal.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct ImageWithOwner {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub location_ref: String,
    pub title: String,
    pub description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    // Joined owner summary.
    pub owner_name: String,
    pub owner_email: String,
}

// --- Response Payloads (Output Schemas) ---

/// DeleteImageResponse
///
/// Explicit success marker returned by the delete operation.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DeleteImageResponse {
    pub message: String,
}
