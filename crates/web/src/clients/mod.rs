pub mod blob;
pub mod mailer;
