//! Script-facing API
//!
//! [`AleApi`] installs the global registration functions into a state.
//! Object handle methods find the state's timed event manager through the
//! Lua app data slot, see [`timed_events`].

mod api;

use std::rc::Rc;

use mlua::Lua;

use crate::timers::TimedEventManager;

pub use api::AleApi;

/// The timed event manager bound to `lua` by [`AleApi::register`]
pub(crate) fn timed_events(lua: &Lua) -> mlua::Result<Rc<TimedEventManager>> {
    lua.app_data_ref::<Rc<TimedEventManager>>()
        .map(|manager| Rc::clone(&manager))
        .ok_or_else(|| {
            mlua::Error::RuntimeError("no timed event manager bound to this state".to_string())
        })
}
