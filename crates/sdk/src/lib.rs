//! ALE SDK - Host Type Definitions
//!
//! This crate contains the plain data types shared between the Lua engine
//! core and the host game server. It has no dependencies and compiles
//! quickly, allowing parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`events`] - Event families and per-family event enums
//! - [`guid`] - Object identity (`ObjectGuid`, `HighGuid`)
//! - [`state`] - Execution context ids
//! - [`timed`] - Timed event object kinds

pub mod events;
pub mod guid;
pub mod state;
pub mod timed;

pub use events::*;
pub use guid::{HighGuid, ObjectGuid};
pub use state::{StateId, MASTER_STATE_ID};
pub use timed::TimedEventObjectType;
