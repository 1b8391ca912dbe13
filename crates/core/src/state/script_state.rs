//! A single Lua execution context

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ale_sdk::{StateId, MASTER_STATE_ID};
use mlua::{Lua, Table, Value};

use super::SearchPaths;
use crate::error::AleResult;
use crate::events::EventManager;
use crate::lua::AleApi;
use crate::timers::TimedEventManager;

/// Globals removed from map states
const MAP_STATE_DENYLIST: [&str; 4] = ["os", "io", "loadfile", "dofile"];

/// Lua VM plus the timed events that belong to it
pub struct ScriptState {
    id: StateId,
    lua: Lua,
    timed_events: Rc<TimedEventManager>,
    created: Instant,
    execution_count: Cell<u64>,
}

impl ScriptState {
    pub(crate) fn new(
        id: StateId,
        events: &Rc<EventManager>,
        search_paths: &SearchPaths,
    ) -> AleResult<Self> {
        let lua = Lua::new();
        if id != MASTER_STATE_ID {
            Self::apply_sandbox(&lua)?;
        }
        Self::apply_search_paths(&lua, search_paths)?;

        let timed_events = Rc::new(TimedEventManager::new(id));
        AleApi::new(id, Rc::clone(events), Rc::clone(&timed_events)).register(&lua)?;

        Ok(Self {
            id,
            lua,
            timed_events,
            created: Instant::now(),
            execution_count: Cell::new(0),
        })
    }

    fn apply_sandbox(lua: &Lua) -> mlua::Result<()> {
        let globals = lua.globals();
        for name in MAP_STATE_DENYLIST {
            globals.set(name, Value::Nil)?;
        }
        Ok(())
    }

    /// Prepend the configured module search paths to `package.path`/`cpath`
    fn apply_search_paths(lua: &Lua, search_paths: &SearchPaths) -> mlua::Result<()> {
        let package: Table = lua.globals().get("package")?;
        for (key, prefix) in [("path", &search_paths.path), ("cpath", &search_paths.cpath)] {
            if prefix.is_empty() {
                continue;
            }
            let current: String = package.get(key)?;
            package.set(key, format!("{};{}", prefix, current))?;
        }
        Ok(())
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn is_master(&self) -> bool {
        self.id == MASTER_STATE_ID
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    pub fn timed_events(&self) -> &Rc<TimedEventManager> {
        &self.timed_events
    }

    pub fn created(&self) -> Instant {
        self.created
    }

    pub fn uptime(&self) -> Duration {
        self.created.elapsed()
    }

    /// Number of chunks run through [`execute`](Self::execute)
    pub fn execution_count(&self) -> u64 {
        self.execution_count.get()
    }

    /// Run a script chunk in this state
    ///
    /// # Arguments
    /// * `source` - Lua source text
    /// * `chunk_name` - Name used in error messages and tracebacks
    pub fn execute(&self, source: &str, chunk_name: &str) -> AleResult<()> {
        self.execution_count.set(self.execution_count.get() + 1);
        self.lua.load(source).set_name(chunk_name).exec()?;
        Ok(())
    }
}
