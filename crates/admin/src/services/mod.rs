//! Admin services: operator auth, push publishing, notification fan-out,
//! WhatsApp, and email.

pub mod auth;
pub mod email;
pub mod notifier;
pub mod push;
pub mod whatsapp;

pub use auth::AdminAuthService;
pub use email::EmailService;
pub use notifier::Notifier;
pub use push::PushClient;
pub use whatsapp::WhatsappClient;
