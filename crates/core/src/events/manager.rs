//! Event manager - registration, cancellation and dispatch
//!
//! Handlers live in three registries keyed by event family + id, optionally
//! narrowed to a template entry or a single object guid. Dispatch works on a
//! snapshot of the handler list so callbacks may register or cancel handlers
//! (including themselves) while a trigger is in progress.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use ale_sdk::{EventType, ObjectGuid, StateId};
use mlua::{FromLua, IntoLuaMulti};

use super::keys::{EntryEventKey, GlobalEventKey, UniqueEventKey};
use super::types::{EventHandler, HandlerId};

type HandlerList = Vec<(HandlerId, Rc<EventHandler>)>;

/// One handler registry (global, entry or unique)
struct HandlerStore<K> {
    scope: &'static str,
    handlers: RefCell<HashMap<K, HandlerList>>,
}

impl<K> HandlerStore<K>
where
    K: Copy + Eq + Hash + fmt::Display,
{
    fn new(scope: &'static str) -> Self {
        Self {
            scope,
            handlers: RefCell::new(HashMap::new()),
        }
    }

    fn insert(&self, key: K, id: HandlerId, handler: EventHandler) {
        self.handlers
            .borrow_mut()
            .entry(key)
            .or_default()
            .push((id, Rc::new(handler)));
        tracing::debug!("Registered {} handler {} for {}", self.scope, id, key);
    }

    fn remove_id(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();

        let mut emptied = None;
        let mut found = false;
        for (key, list) in handlers.iter_mut() {
            if let Some(pos) = list.iter().position(|(handler_id, _)| *handler_id == id) {
                let (_, handler) = list.remove(pos);
                handler.cancel();
                found = true;
                if list.is_empty() {
                    emptied = Some(*key);
                }
                break;
            }
        }

        if let Some(key) = emptied {
            handlers.remove(&key);
        }
        found
    }

    fn remove_key(&self, key: &K) -> usize {
        let removed = self.handlers.borrow_mut().remove(key);
        match removed {
            Some(list) => {
                for (_, handler) in &list {
                    handler.cancel();
                }
                list.len()
            }
            None => 0,
        }
    }

    /// Drop every handler for which `keep` returns false
    fn retain(&self, mut keep: impl FnMut(&EventHandler) -> bool) -> usize {
        let mut removed = 0;
        self.handlers.borrow_mut().retain(|_, list| {
            list.retain(|(_, handler)| {
                if keep(handler.as_ref()) {
                    true
                } else {
                    handler.cancel();
                    removed += 1;
                    false
                }
            });
            !list.is_empty()
        });
        removed
    }

    fn count(&self, key: &K) -> usize {
        self.handlers.borrow().get(key).map_or(0, Vec::len)
    }

    fn total(&self) -> usize {
        self.handlers.borrow().values().map(Vec::len).sum()
    }

    fn snapshot(&self, key: &K) -> Option<HandlerList> {
        self.handlers.borrow().get(key).cloned()
    }

    fn purge_expired(&self, key: &K) {
        let mut handlers = self.handlers.borrow_mut();
        if let Some(list) = handlers.get_mut(key) {
            list.retain(|(_, handler)| !handler.is_expired());
            if list.is_empty() {
                handlers.remove(key);
            }
        }
    }

    fn trigger<A>(&self, key: K, args: A) -> u32
    where
        A: IntoLuaMulti + Clone,
    {
        let Some(list) = self.snapshot(&key) else {
            return 0;
        };

        let mut executed = 0;
        for (id, handler) in &list {
            if !handler.should_execute() {
                continue;
            }
            match handler.execute(args.clone()) {
                Ok(()) => executed += 1,
                Err(e) => self.report(*id, &key, &e),
            }
        }

        self.purge_expired(&key);
        executed
    }

    fn trigger_with_return<R, A>(&self, key: K, default: R, args: A) -> R
    where
        R: FromLua,
        A: IntoLuaMulti + Clone,
    {
        let Some(list) = self.snapshot(&key) else {
            return default;
        };

        let mut result = default;
        for (id, handler) in &list {
            if !handler.should_execute() {
                continue;
            }
            match handler.execute_with_return::<R, _>(args.clone()) {
                Ok(Some(value)) => result = value,
                Ok(None) => {}
                Err(e) => self.report(*id, &key, &e),
            }
        }

        self.purge_expired(&key);
        result
    }

    fn report(&self, id: HandlerId, key: &K, error: &mlua::Error) {
        tracing::error!(
            "Lua error in {} handler {} for {}: {}",
            self.scope,
            id,
            key,
            error
        );
    }
}

/// Registry and dispatcher for script event handlers
///
/// Shared by every script state of the process. All methods take `&self`
/// so callbacks running inside a trigger can reach the manager again.
///
/// # Example
///
/// ```ignore
/// let events = EventManager::new();
/// let id = events.register_global_event(
///     PlayerEvent::OnLogin,
///     EventHandler::new(callback).with_shots(1),
/// );
///
/// let executed = events.trigger_global_event(PlayerEvent::OnLogin, (3, player));
/// let amount = events.trigger_global_event_with_return(
///     PlayerEvent::OnMoneyChange,
///     amount,
///     (14, player, amount),
/// );
/// events.cancel_event(id);
/// ```
pub struct EventManager {
    global: HandlerStore<GlobalEventKey>,
    entry: HandlerStore<EntryEventKey>,
    unique: HandlerStore<UniqueEventKey>,
    next_handler_id: Cell<HandlerId>,
    initialized: Cell<bool>,
}

impl Default for EventManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EventManager {
    pub fn new() -> Self {
        Self {
            global: HandlerStore::new("global"),
            entry: HandlerStore::new("entry"),
            unique: HandlerStore::new("unique"),
            next_handler_id: Cell::new(1),
            initialized: Cell::new(false),
        }
    }

    /// Mark the manager ready for use
    ///
    /// Idempotent; always succeeds.
    pub fn initialize(&self) -> bool {
        if !self.initialized.get() {
            self.initialized.set(true);
            tracing::debug!("EventManager initialized");
        }
        true
    }

    /// Cancel every handler and mark the manager uninitialized
    pub fn shutdown(&self) {
        self.cancel_all_events();
        self.initialized.set(false);
        tracing::debug!("EventManager shut down");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    fn next_id(&self) -> HandlerId {
        let id = self.next_handler_id.get();
        self.next_handler_id.set(id + 1);
        id
    }

    /// Register a handler that fires for every instance of `event`
    ///
    /// # Returns
    /// The new handler id (never 0)
    pub fn register_global_event(&self, event: impl EventType, handler: EventHandler) -> HandlerId {
        let id = self.next_id();
        self.global.insert(GlobalEventKey::new(event), id, handler);
        id
    }

    /// Register a handler scoped to a template entry
    pub fn register_entry_event(
        &self,
        event: impl EventType,
        entry: u32,
        handler: EventHandler,
    ) -> HandlerId {
        let id = self.next_id();
        self.entry.insert(EntryEventKey::new(event, entry), id, handler);
        id
    }

    /// Register a handler scoped to a single object
    pub fn register_unique_event(
        &self,
        event: impl EventType,
        guid: ObjectGuid,
        handler: EventHandler,
    ) -> HandlerId {
        let id = self.next_id();
        self.unique.insert(UniqueEventKey::new(event, guid), id, handler);
        id
    }

    /// Cancel a single handler by id
    ///
    /// Searches the global, entry and unique registries in that order.
    ///
    /// # Returns
    /// `true` if a handler was found and removed
    pub fn cancel_event(&self, id: HandlerId) -> bool {
        let found =
            self.global.remove_id(id) || self.entry.remove_id(id) || self.unique.remove_id(id);
        if found {
            tracing::debug!("Cancelled event handler {}", id);
        }
        found
    }

    /// Cancel every global handler for `event`
    ///
    /// # Returns
    /// Number of handlers removed
    pub fn cancel_global_event(&self, event: impl EventType) -> usize {
        self.global.remove_key(&GlobalEventKey::new(event))
    }

    /// Cancel every handler for `event` on `entry`
    pub fn cancel_entry_event(&self, event: impl EventType, entry: u32) -> usize {
        self.entry.remove_key(&EntryEventKey::new(event, entry))
    }

    /// Cancel every handler for `event` on the object `guid`
    pub fn cancel_unique_event(&self, event: impl EventType, guid: ObjectGuid) -> usize {
        self.unique.remove_key(&UniqueEventKey::new(event, guid))
    }

    /// Cancel every handler registered by the given state
    pub fn cancel_state_events(&self, state_id: StateId) -> usize {
        let owned_elsewhere = |handler: &EventHandler| handler.state_id() != state_id;
        let removed = self.global.retain(owned_elsewhere)
            + self.entry.retain(owned_elsewhere)
            + self.unique.retain(owned_elsewhere);
        if removed > 0 {
            tracing::debug!("Cancelled {} handlers of state {}", removed, state_id);
        }
        removed
    }

    /// Cancel every handler in every registry
    pub fn cancel_all_events(&self) {
        let removed =
            self.global.retain(|_| false) + self.entry.retain(|_| false) + self.unique.retain(|_| false);
        tracing::debug!("Cancelled all {} event handlers", removed);
    }

    /// Invoke every global handler for `event`
    ///
    /// # Returns
    /// Number of handlers that executed successfully
    pub fn trigger_global_event<A>(&self, event: impl EventType, args: A) -> u32
    where
        A: IntoLuaMulti + Clone,
    {
        self.global.trigger(GlobalEventKey::new(event), args)
    }

    /// Invoke every handler for `event` on `entry`
    pub fn trigger_entry_event<A>(&self, event: impl EventType, entry: u32, args: A) -> u32
    where
        A: IntoLuaMulti + Clone,
    {
        self.entry.trigger(EntryEventKey::new(event, entry), args)
    }

    /// Invoke every handler for `event` on the object `guid`
    pub fn trigger_unique_event<A>(&self, event: impl EventType, guid: ObjectGuid, args: A) -> u32
    where
        A: IntoLuaMulti + Clone,
    {
        self.unique.trigger(UniqueEventKey::new(event, guid), args)
    }

    /// Invoke every global handler for `event` and collect a result
    ///
    /// Every handler receives the same `args`. The last handler that succeeds
    /// and returns a value convertible to `R` decides the result; if none
    /// does, `default` is returned unchanged.
    pub fn trigger_global_event_with_return<R, A>(
        &self,
        event: impl EventType,
        default: R,
        args: A,
    ) -> R
    where
        R: FromLua,
        A: IntoLuaMulti + Clone,
    {
        self.global
            .trigger_with_return(GlobalEventKey::new(event), default, args)
    }

    /// Entry-scoped variant of [`trigger_global_event_with_return`](Self::trigger_global_event_with_return)
    pub fn trigger_entry_event_with_return<R, A>(
        &self,
        event: impl EventType,
        entry: u32,
        default: R,
        args: A,
    ) -> R
    where
        R: FromLua,
        A: IntoLuaMulti + Clone,
    {
        self.entry
            .trigger_with_return(EntryEventKey::new(event, entry), default, args)
    }

    /// Object-scoped variant of [`trigger_global_event_with_return`](Self::trigger_global_event_with_return)
    pub fn trigger_unique_event_with_return<R, A>(
        &self,
        event: impl EventType,
        guid: ObjectGuid,
        default: R,
        args: A,
    ) -> R
    where
        R: FromLua,
        A: IntoLuaMulti + Clone,
    {
        self.unique
            .trigger_with_return(UniqueEventKey::new(event, guid), default, args)
    }

    pub fn global_handler_count(&self, event: impl EventType) -> usize {
        self.global.count(&GlobalEventKey::new(event))
    }

    pub fn entry_handler_count(&self, event: impl EventType, entry: u32) -> usize {
        self.entry.count(&EntryEventKey::new(event, entry))
    }

    pub fn unique_handler_count(&self, event: impl EventType, guid: ObjectGuid) -> usize {
        self.unique.count(&UniqueEventKey::new(event, guid))
    }

    /// Whether any global handler is registered for `event`
    ///
    /// Lets hooks skip building callback arguments for unobserved events.
    pub fn has_global_handlers(&self, event: impl EventType) -> bool {
        self.global_handler_count(event) > 0
    }

    pub fn has_entry_handlers(&self, event: impl EventType, entry: u32) -> bool {
        self.entry_handler_count(event, entry) > 0
    }

    pub fn has_unique_handlers(&self, event: impl EventType, guid: ObjectGuid) -> bool {
        self.unique_handler_count(event, guid) > 0
    }

    /// Total number of registered handlers across all registries
    pub fn handler_count(&self) -> usize {
        self.global.total() + self.entry.total() + self.unique.total()
    }
}
