// Core warnings module - member records, warn operation and punishment events.
// Following the same pattern as the automod module.

pub mod warning_models;
pub mod warning_service;

pub use warning_models::*;
pub use warning_service::*;
