use crate::shared::entity::{Entity, ID};

/// Owner of `Reminder`s. The WhatsApp number is the delivery address used
/// by the dispatch job, the other fields belong to the profile pages.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub whatsapp_number: Option<String>,
    pub whatsapp_verified: bool,
    pub prefered_timezone: Option<String>,
    /// Unix timestamp in millis for when this user was created
    pub created: i64,
    /// Unix timestamp in millis for when this user was last updated
    pub updated: i64,
}

impl User {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            id: Default::default(),
            name: name.to_string(),
            email: email.to_string(),
            whatsapp_number: None,
            whatsapp_verified: false,
            prefered_timezone: None,
            created: 0,
            updated: 0,
        }
    }

    /// The WhatsApp number reminders can be delivered to, if any.
    pub fn delivery_number(&self) -> Option<&str> {
        match &self.whatsapp_number {
            Some(number) if !number.is_empty() => Some(number),
            _ => None,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_whatsapp_number_is_not_a_delivery_address() {
        let mut user = User::new("Jay", "jay@example.com");
        assert!(user.delivery_number().is_none());

        user.whatsapp_number = Some("".into());
        assert!(user.delivery_number().is_none());

        user.whatsapp_number = Some("+4712345678".into());
        assert_eq!(user.delivery_number(), Some("+4712345678"));
    }
}
