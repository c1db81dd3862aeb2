//! Storefront services: authentication, push publishing, WhatsApp.

pub mod auth;
pub mod push;
pub mod whatsapp;

pub use auth::AuthService;
pub use push::PushClient;
pub use whatsapp::WhatsappClient;
