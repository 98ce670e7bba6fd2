use serde::{Deserialize, Serialize};

/// Registration payload. Every field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUserRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    /// Name on the user's identity document.
    #[serde(alias = "Id_name")]
    pub id_name: String,
}
