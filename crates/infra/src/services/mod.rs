mod whatsapp_gateway;

pub use whatsapp_gateway::{
    INotificationGateway, InMemoryNotificationGateway, NotificationResult, ReminderNotification,
    WhatsappGateway, GATEWAY_KEY_HEADER,
};
