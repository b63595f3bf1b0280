use serde::{Deserialize, Serialize};

/// Normalized user record handed to the controller (provider-agnostic).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub id: String,
    pub avatar_url: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// random-data-api.com v2 user resource. Only `id` is required; display
/// fields that are null or absent become empty strings.
#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub id: u64,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl From<RawUser> for UserRecord {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id.to_string(),
            avatar_url: raw.avatar.unwrap_or_default(),
            first_name: raw.first_name.unwrap_or_default(),
            last_name: raw.last_name.unwrap_or_default(),
        }
    }
}

/// The endpoint answers `size=1` with a bare object and anything larger with
/// an array.
#[derive(Debug)]
pub enum UsersResponse {
    Many(Vec<RawUser>),
    One(RawUser),
}

impl UsersResponse {
    /// Picks the shape from the top-level JSON value, so a decode error names
    /// the offending field instead of failing every variant.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if value.is_array() {
            Ok(UsersResponse::Many(serde_json::from_value(value)?))
        } else {
            Ok(UsersResponse::One(serde_json::from_value(value)?))
        }
    }

    pub fn into_records(self) -> Vec<UserRecord> {
        match self {
            UsersResponse::Many(users) => users.into_iter().map(UserRecord::from).collect(),
            UsersResponse::One(user) => vec![user.into()],
        }
    }
}
