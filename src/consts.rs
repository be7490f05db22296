pub const WHATSAPP_MESSAGING_PRODUCT: &str = "whatsapp";
pub const WHATSAPP_RECIPIENT_TYPE: &str = "individual";
pub const WHATSAPP_TEXT_TYPE: &str = "text";
pub const WEBHOOK_MESSAGES_FIELD: &str = "messages";
pub const WEBHOOK_SUBSCRIBE_MODE: &str = "subscribe";

pub const LOG_FILE_NAME: &str = "app.log";
pub const SHUTDOWN_TIMEOUT_SECS: u16 = 10;

pub const API_TITLE: &str = "wa-relay API";
pub const SCALAR_CDN_URL: &str = "https://cdn.jsdelivr.net/npm/@scalar/api-reference";
