//! Script event system
//!
//! Scripts register Lua callbacks for host events; the host triggers them
//! through the hook forwarders in [`crate::hooks`].
//!
//! # Architecture
//!
//! ```text
//! host hook → EventManager::trigger_* → handler snapshot → Lua callbacks
//! ```
//!
//! Handlers are keyed three ways:
//! - global: family + event id
//! - entry: family + event id + template entry
//! - unique: family + event id + object guid
//!
//! # Example
//!
//! ```ignore
//! use ale_core::events::{EventHandler, EventManager};
//! use ale_sdk::PlayerEvent;
//!
//! let events = EventManager::new();
//! events.register_global_event(PlayerEvent::OnLogin, EventHandler::new(callback));
//! events.trigger_global_event(PlayerEvent::OnLogin, (PlayerEvent::OnLogin as u32, player));
//! ```

mod keys;
mod manager;
mod types;

pub use keys::{EntryEventKey, GlobalEventKey, UniqueEventKey};
pub use manager::EventManager;
pub use types::{EventHandler, HandlerId};
