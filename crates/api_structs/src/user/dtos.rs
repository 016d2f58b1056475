use remindu_domain::{User, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub whatsapp_number: Option<String>,
    pub whatsapp_verified: bool,
    pub prefered_timezone: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            whatsapp_number: user.whatsapp_number,
            whatsapp_verified: user.whatsapp_verified,
            prefered_timezone: user.prefered_timezone,
            created: user.created,
            updated: user.updated,
        }
    }
}
