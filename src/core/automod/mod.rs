// Core auto-moderation module - validators, registry and the evaluation engine.

pub mod automod_models;
pub mod automod_service;
pub mod registry;
pub mod validators;

pub use automod_models::*;
pub use automod_service::*;
pub use registry::ValidatorRegistry;
pub use validators::ContentValidator;
