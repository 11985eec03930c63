// Platform-facing types and the actions port.
//
// The core never sees Discord types. The host converts inbound events into
// these plain structs and implements `PlatformActions` for the side effects.

pub mod platform_actions;
pub mod platform_models;

pub use platform_actions::*;
pub use platform_models::*;
