//! Event system types

use std::cell::Cell;

use ale_sdk::{StateId, MASTER_STATE_ID};
use mlua::{FromLua, Function, IntoLuaMulti};

/// Identifier returned by every registration call
///
/// Ids start at 1 and are never reused until the manager is reset.
pub type HandlerId = u64;

/// A script callback registered for an event
///
/// Built with [`EventHandler::new`] and the `with_*` builders, then handed to
/// one of the `register_*` methods of [`EventManager`](super::EventManager).
///
/// # Example
///
/// ```ignore
/// let handler = EventHandler::new(callback).with_shots(1).with_state(state_id);
/// let id = events.register_global_event(PlayerEvent::OnLogin, handler);
/// ```
#[derive(Debug)]
pub struct EventHandler {
    function: Function,
    /// Maximum successful invocations, 0 means unlimited
    shots: u32,
    call_count: Cell<u32>,
    state_id: StateId,
    cancelled: Cell<bool>,
}

impl EventHandler {
    /// Create an unlimited handler owned by the master state
    pub fn new(function: Function) -> Self {
        Self {
            function,
            shots: 0,
            call_count: Cell::new(0),
            state_id: MASTER_STATE_ID,
            cancelled: Cell::new(false),
        }
    }

    /// Limit the handler to `shots` successful invocations (0 = unlimited)
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Tag the handler with the state that registered it
    pub fn with_state(mut self, state_id: StateId) -> Self {
        self.state_id = state_id;
        self
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Number of successful invocations so far
    pub fn call_count(&self) -> u32 {
        self.call_count.get()
    }

    pub fn state_id(&self) -> StateId {
        self.state_id
    }

    /// Whether the handler has used up its shots
    pub fn is_expired(&self) -> bool {
        self.shots > 0 && self.call_count.get() >= self.shots
    }

    /// Whether the handler may run during the current dispatch
    pub fn should_execute(&self) -> bool {
        !self.cancelled.get() && !self.is_expired()
    }

    pub(crate) fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Invoke the callback, discarding whatever it returns
    ///
    /// Only a successful call counts toward the shot limit.
    pub(crate) fn execute<A: IntoLuaMulti>(&self, args: A) -> mlua::Result<()> {
        self.function.call::<()>(args)?;
        self.record_call();
        Ok(())
    }

    /// Invoke the callback and read its first return value as `R`
    ///
    /// A call that succeeds but returns nothing, or a value that does not
    /// convert to `R`, yields `Ok(None)` and still counts as a call.
    pub(crate) fn execute_with_return<R, A>(&self, args: A) -> mlua::Result<Option<R>>
    where
        R: FromLua,
        A: IntoLuaMulti,
    {
        match self.function.call::<Option<R>>(args) {
            Ok(value) => {
                self.record_call();
                Ok(value)
            }
            Err(mlua::Error::FromLuaConversionError { .. }) => {
                self.record_call();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn record_call(&self) {
        self.call_count.set(self.call_count.get().saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlua::Lua;

    fn function(lua: &Lua, source: &str) -> Function {
        lua.load(source).eval().unwrap()
    }

    #[test]
    fn test_handler_defaults() {
        let lua = Lua::new();
        let handler = EventHandler::new(function(&lua, "function() end"));
        assert_eq!(handler.shots(), 0);
        assert_eq!(handler.call_count(), 0);
        assert_eq!(handler.state_id(), MASTER_STATE_ID);
        assert!(handler.should_execute());
    }

    #[test]
    fn test_shots_expire_handler() {
        let lua = Lua::new();
        let handler = EventHandler::new(function(&lua, "function() end")).with_shots(2);

        handler.execute(()).unwrap();
        assert!(!handler.is_expired());
        handler.execute(()).unwrap();
        assert!(handler.is_expired());
        assert!(!handler.should_execute());
    }

    #[test]
    fn test_unlimited_handler_never_expires() {
        let lua = Lua::new();
        let handler = EventHandler::new(function(&lua, "function() end"));
        for _ in 0..10 {
            handler.execute(()).unwrap();
        }
        assert_eq!(handler.call_count(), 10);
        assert!(!handler.is_expired());
    }

    #[test]
    fn test_failed_call_not_counted() {
        let lua = Lua::new();
        let handler =
            EventHandler::new(function(&lua, "function() error('boom') end")).with_shots(1);

        assert!(handler.execute(()).is_err());
        assert_eq!(handler.call_count(), 0);
        assert!(!handler.is_expired());
    }

    #[test]
    fn test_return_value_conversion() {
        let lua = Lua::new();
        let number = EventHandler::new(function(&lua, "function(x) return x * 2 end"));
        let nothing = EventHandler::new(function(&lua, "function() end"));
        let text = EventHandler::new(function(&lua, "function() return 'abc' end"));

        assert_eq!(number.execute_with_return::<u32, _>(21).unwrap(), Some(42));
        assert_eq!(nothing.execute_with_return::<u32, _>(()).unwrap(), None);
        assert_eq!(text.execute_with_return::<u32, _>(()).unwrap(), None);
        assert_eq!(text.call_count(), 1);
    }

    #[test]
    fn test_cancelled_handler_skipped() {
        let lua = Lua::new();
        let handler = EventHandler::new(function(&lua, "function() end"));
        handler.cancel();
        assert!(!handler.should_execute());
    }
}
