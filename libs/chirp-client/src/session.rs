use serde::{Deserialize, Serialize};

/// An authenticated viewer. Obtaining one (sign-in, refresh, second factor)
/// is the platform auth layer's concern; operations here only need the
/// subject id and the bearer token so every mutating request is attributable
/// to a session. The viewer is always passed explicitly as
/// `Option<&Session>`, where `None` is the anonymous viewer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: &str, access_token: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            access_token: access_token.to_string(),
        }
    }
}
