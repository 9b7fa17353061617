//! Media Module
//!
//! Hosted image uploads for profile pictures and message attachments.

/// Asset host client
pub mod upload;

pub use upload::{MediaError, MediaSettings, MediaUploader};
