use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as kept in the shared `users` list.
///
/// The password is stored as entered; this service has no credential security model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Classifier string, e.g. `student-ug`, `fresher-pg`, `experienced-ug`.
    pub user_type: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// The fields of a user that may leave the credential store (session `user` key, admin views).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub name: String,
    pub email: String,
    pub user_type: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserRecord> for PublicUser {
    fn from(user: &UserRecord) -> Self {
        PublicUser {
            name: user.name.clone(),
            email: user.email.clone(),
            user_type: user.user_type.clone(),
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}
