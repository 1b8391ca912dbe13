//! ALE Core - Lua Engine Logic
//!
//! This crate contains the event dispatch, timed events and script state
//! management of the ALE Lua engine. Everything runs on the host's world
//! thread; nothing here is `Send`.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK crate for convenience:
//! - [`sdk`] - Event enums, object guids and state ids

pub use ale_sdk as sdk;

pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod hooks;
pub mod lua;
pub mod manager;
pub mod state;
pub mod timers;

// Re-export commonly used items
pub use config::{AleConfig, ConfigError, ConfigResult};
pub use error::{AleError, AleResult};
pub use events::{EventHandler, EventManager, HandlerId};
pub use manager::AleManager;
pub use state::{ScriptState, SearchPaths, StateManager};
pub use timers::{TimedEventId, TimedEventManager};

// Re-export entity types
pub use entities::{CreatureRef, GameObjectRef, ObjectHandle, PlayerRef, WorldObject};

// Re-export hook forwarders
pub use hooks::{CreatureHooks, PlayerHooks, WorldHooks, WorldObjectHooks};
