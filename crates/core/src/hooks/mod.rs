//! Host hook forwarders
//!
//! The host calls these at its extension points. Each hook turns a host
//! callback into the matching event trigger with the script argument shape
//! `(eventId, ...)`, and drives the master state's timed events on update.
//!
//! Every hook is a no-op while the engine is not initialized.
//!
//! # Example
//!
//! ```ignore
//! use ale_core::hooks::{PlayerHooks, WorldHooks};
//!
//! WorldHooks::new(&ale).on_startup();
//! PlayerHooks::new(&ale).on_login(&player);
//!
//! let money = PlayerHooks::new(&ale).on_money_change(&player, 50);
//! ```

mod creature;
mod player;
mod world;
mod world_object;

use std::rc::Rc;

pub use creature::CreatureHooks;
pub use player::PlayerHooks;
pub use world::WorldHooks;
pub use world_object::WorldObjectHooks;

use crate::manager::AleManager;
use crate::timers::TimedEventManager;

/// Master timed events, if the engine is running
///
/// Logs an error when the engine is initialized but the master state is
/// gone, which leaves timed events undriven.
fn master_timers(ale: &AleManager) -> Option<&Rc<TimedEventManager>> {
    if !ale.is_initialized() {
        return None;
    }

    let timers = ale.master_timed_events();
    if timers.is_none() {
        tracing::error!("Master state has no timed event manager");
    }
    timers
}
