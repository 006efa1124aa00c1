//! Domain Services

pub mod access_token;
pub mod mailer;
