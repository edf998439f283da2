//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account status as stored in the `status` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum UserStatus {
    Inactive,
    /// New accounts start active.
    #[default]
    Active,
}

impl From<UserStatus> for i64 {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Inactive => 0,
            UserStatus::Active => 1,
        }
    }
}

impl TryFrom<i64> for UserStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(UserStatus::Inactive),
            1 => Ok(UserStatus::Active),
            other => Err(format!("unknown user status {other}")),
        }
    }
}

/// A user record. The password hash lives only in the credential store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    /// Free-form role name matched against permission grants, e.g. `"Admin"`.
    pub role: String,
    pub status: UserStatus,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a user; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
    pub created_by: String,
    pub updated_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Attach the store-assigned id.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            role: self.role,
            status: self.status,
            created_by: self.created_by,
            updated_by: self.updated_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
