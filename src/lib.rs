// Library root for the auto-moderation pipeline.
//
// - `core/` = Moderation logic (validators, engine, warnings). No Discord types.
// - `infra/` = Implementations of the core storage traits (in-memory, SQLite).
//
// The Discord host in `main.rs` wires these together and feeds messages in.

#[path = "core/core_layer.rs"]
pub mod core;
#[path = "infra/infra_layer.rs"]
pub mod infra;
