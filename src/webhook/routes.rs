use ntex::web;

/// Configures the WhatsApp routes.
///
/// These routes are public endpoints, the webhook handshake being the only
/// check made on callers.
///
/// # Routes
/// - `POST /whatsapp/send` - Send a text message
/// - `GET /whatsapp/webhook` - WhatsApp webhook verification
/// - `POST /whatsapp/webhook` - WhatsApp webhook receiver
pub fn whatsapp(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/whatsapp").service((
        super::whatsapp::send,
        super::whatsapp::verify,
        super::whatsapp::receive,
    )));
}
