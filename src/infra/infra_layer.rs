// The infra module contains implementations of core traits.
// Each backend goes in its own submodule.

#[path = "automod/mod.rs"]
pub mod automod;
