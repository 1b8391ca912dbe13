//! Execution context ids
//!
//! Each Lua state is identified by the map it serves. The master state
//! serves the world and every map that has no state of its own.

/// Identifier of a Lua execution context
pub type StateId = i32;

/// The master (world) state
pub const MASTER_STATE_ID: StateId = -1;
