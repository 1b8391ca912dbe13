//! Lua execution contexts
//!
//! The master state (id -1) serves the world and every map without a state
//! of its own. Map states (id = map id) are created on demand and run with
//! `os`, `io`, `loadfile` and `dofile` removed.
//!
//! Each state owns a [`TimedEventManager`]; the [`EventManager`] is shared
//! by all of them, with handlers tagged by the registering state's id.

mod script_state;

use std::collections::HashMap;
use std::rc::Rc;

use ale_sdk::{StateId, MASTER_STATE_ID};

use crate::error::{AleError, AleResult};
use crate::events::EventManager;
use crate::timers::TimedEventManager;

pub use script_state::ScriptState;

/// Extra module search paths prepended to `package.path` / `package.cpath`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    pub path: String,
    pub cpath: String,
}

/// Owner of every script state
pub struct StateManager {
    events: Rc<EventManager>,
    states: HashMap<StateId, ScriptState>,
    search_paths: SearchPaths,
    initialized: bool,
}

impl StateManager {
    pub fn new(events: Rc<EventManager>) -> Self {
        Self {
            events,
            states: HashMap::new(),
            search_paths: SearchPaths::default(),
            initialized: false,
        }
    }

    /// Module search paths applied to states created from now on
    pub fn with_search_paths(mut self, search_paths: SearchPaths) -> Self {
        self.set_search_paths(search_paths);
        self
    }

    pub fn set_search_paths(&mut self, search_paths: SearchPaths) {
        self.search_paths = search_paths;
    }

    /// Create the master state
    pub fn initialize(&mut self) -> AleResult<()> {
        if self.initialized {
            return Ok(());
        }

        self.get_or_create_state(MASTER_STATE_ID)?;
        self.initialized = true;
        Ok(())
    }

    /// Drop every state together with its handlers and timed events
    pub fn shutdown(&mut self) {
        for (id, state) in self.states.drain() {
            self.events.cancel_state_events(id);
            state.timed_events().clear();
        }
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Get the state for `id`, creating it on first use
    pub fn get_or_create_state(&mut self, id: StateId) -> AleResult<&ScriptState> {
        if id < MASTER_STATE_ID {
            return Err(AleError::InvalidStateId(id));
        }

        if !self.states.contains_key(&id) {
            tracing::debug!(
                "Creating {} state {}",
                if id == MASTER_STATE_ID { "master" } else { "map" },
                id
            );
            let state = ScriptState::new(id, &self.events, &self.search_paths)?;
            self.states.insert(id, state);
        }

        self.states.get(&id).ok_or(AleError::StateNotFound(id))
    }

    pub fn get_state(&self, id: StateId) -> Option<&ScriptState> {
        self.states.get(&id)
    }

    pub fn master_state(&self) -> Option<&ScriptState> {
        self.get_state(MASTER_STATE_ID)
    }

    /// Remove a map state
    ///
    /// Cancels the event handlers the state registered and drops its timed
    /// events. The master state cannot be removed.
    ///
    /// # Returns
    /// `true` if a state was removed
    pub fn remove_state(&mut self, id: StateId) -> bool {
        if id == MASTER_STATE_ID {
            tracing::warn!("Cannot remove the master state");
            return false;
        }

        let Some(state) = self.states.remove(&id) else {
            return false;
        };
        let cancelled = self.events.cancel_state_events(id);
        state.timed_events().clear();
        tracing::debug!("Removed state {} ({} handlers cancelled)", id, cancelled);
        true
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Ids of every live state, in ascending order
    pub fn all_state_ids(&self) -> Vec<StateId> {
        let mut ids: Vec<StateId> = self.states.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn for_each_state(&self, mut f: impl FnMut(StateId, &ScriptState)) {
        for id in self.all_state_ids() {
            if let Some(state) = self.states.get(&id) {
                f(id, state);
            }
        }
    }

    pub fn timed_event_manager(&self, id: StateId) -> Option<&Rc<TimedEventManager>> {
        self.states.get(&id).map(ScriptState::timed_events)
    }

    pub fn events(&self) -> &Rc<EventManager> {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ale_sdk::PlayerEvent;

    fn manager() -> StateManager {
        let mut states = StateManager::new(Rc::new(EventManager::new()));
        states.initialize().unwrap();
        states
    }

    #[test]
    fn test_initialize_creates_master_state() {
        let states = manager();
        assert!(states.is_initialized());
        assert_eq!(states.state_count(), 1);
        assert!(states.master_state().is_some_and(ScriptState::is_master));
        assert!(states.timed_event_manager(MASTER_STATE_ID).is_some());
    }

    #[test]
    fn test_map_state_created_once() {
        let mut states = manager();
        states.get_or_create_state(530).unwrap();
        states.get_or_create_state(530).unwrap();
        assert_eq!(states.state_count(), 2);
        assert_eq!(states.all_state_ids(), vec![-1, 530]);
        assert_eq!(
            states.timed_event_manager(530).map(|timers| timers.state_id()),
            Some(530)
        );
    }

    #[test]
    fn test_invalid_state_id() {
        let mut states = manager();
        assert!(matches!(
            states.get_or_create_state(-2),
            Err(AleError::InvalidStateId(-2))
        ));
    }

    #[test]
    fn test_map_state_is_sandboxed() {
        let mut states = manager();
        let map = states.get_or_create_state(0).unwrap();
        let os_missing: bool = map.lua().load("return os == nil and io == nil").eval().unwrap();
        assert!(os_missing);

        let master = states.master_state().unwrap();
        let os_present: bool = master.lua().load("return os ~= nil").eval().unwrap();
        assert!(os_present);
    }

    #[test]
    fn test_master_state_cannot_be_removed() {
        let mut states = manager();
        assert!(!states.remove_state(MASTER_STATE_ID));
        assert!(!states.remove_state(42));
        assert_eq!(states.state_count(), 1);
    }

    #[test]
    fn test_remove_state_cancels_its_handlers() {
        let mut states = manager();
        let events = Rc::clone(states.events());

        states
            .master_state()
            .unwrap()
            .execute("RegisterPlayerEvent(3, function() end)", "master.lua")
            .unwrap();
        let map = states.get_or_create_state(1).unwrap();
        map.execute(
            "RegisterPlayerEvent(3, function() end) CreateLuaEvent(function() end, 100, 0)",
            "map.lua",
        )
        .unwrap();
        let map_timers = Rc::clone(map.timed_events());
        assert_eq!(events.global_handler_count(PlayerEvent::OnLogin), 2);
        assert_eq!(map_timers.active_event_count(), 1);

        assert!(states.remove_state(1));
        assert_eq!(events.global_handler_count(PlayerEvent::OnLogin), 1);
        assert_eq!(map_timers.active_event_count(), 0);
    }

    #[test]
    fn test_execute_reports_errors() {
        let states = manager();
        let master = states.master_state().unwrap();

        assert!(master.execute("x = 1", "ok.lua").is_ok());
        let result = master.execute("this is not lua", "broken.lua");
        assert!(matches!(result, Err(AleError::Lua(_))));
        assert_eq!(master.execution_count(), 2);
    }

    #[test]
    fn test_search_paths_prepended() {
        let mut states = StateManager::new(Rc::new(EventManager::new())).with_search_paths(
            SearchPaths {
                path: "lua_scripts/?.lua".to_string(),
                cpath: String::new(),
            },
        );
        states.initialize().unwrap();

        let path: String = states
            .master_state()
            .unwrap()
            .lua()
            .load("return package.path")
            .eval()
            .unwrap();
        assert!(path.starts_with("lua_scripts/?.lua;"));
    }

    #[test]
    fn test_shutdown_drops_states_and_handlers() {
        let mut states = manager();
        let events = Rc::clone(states.events());
        states
            .master_state()
            .unwrap()
            .execute("RegisterPlayerEvent(3, function() end)", "master.lua")
            .unwrap();

        states.shutdown();
        assert!(!states.is_initialized());
        assert_eq!(states.state_count(), 0);
        assert_eq!(events.handler_count(), 0);
    }

    #[test]
    fn test_for_each_state_in_id_order() {
        let mut states = manager();
        states.get_or_create_state(530).unwrap();
        states.get_or_create_state(0).unwrap();

        let mut seen = Vec::new();
        states.for_each_state(|id, state| {
            assert_eq!(state.id(), id);
            assert!(state.uptime() <= state.created().elapsed());
            seen.push(id);
        });
        assert_eq!(seen, vec![-1, 0, 530]);
    }
}
