//! Timed events for scheduling delayed and repeating script callbacks
//!
//! Each script state owns one [`TimedEventManager`]. Time only advances when
//! the host calls [`update`](TimedEventManager::update) (global events) or
//! [`update_object_events`](TimedEventManager::update_object_events) (events
//! bound to one object), passing the milliseconds since the previous tick.
//!
//! An event fires at most once per update call: when its accumulated time
//! reaches the delay it runs, its accumulator resets to zero and, for a
//! finite event, one repeat is consumed. Events with no repeats left are
//! removed after the pass.
//!
//! # Example
//!
//! ```ignore
//! use ale_core::timers::TimedEventManager;
//!
//! let timers = TimedEventManager::new(MASTER_STATE_ID);
//!
//! // Fires three times, once per second
//! let id = timers.register_global_event(callback, 1000, 3);
//!
//! // From the world tick
//! timers.update(diff);
//!
//! // Cancel early
//! timers.remove_event(id);
//! ```

mod timer;

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use ale_sdk::{ObjectGuid, StateId, TimedEventObjectType};
use mlua::Function;

use crate::entities::WorldObject;
use timer::TimedEvent;
pub use timer::TimedEventId;

/// Timed event storage
///
/// Ids are handed out in increasing order, so the ordered id sets keep
/// events in registration order.
struct TimedEventRegistry {
    events: HashMap<TimedEventId, TimedEvent>,
    global_events: BTreeSet<TimedEventId>,
    object_events: HashMap<ObjectGuid, BTreeSet<TimedEventId>>,
    next_event_id: TimedEventId,
    /// Bumped by `clear` so an update pass notices ids being reissued
    generation: u64,
}

impl TimedEventRegistry {
    fn new() -> Self {
        Self {
            events: HashMap::new(),
            global_events: BTreeSet::new(),
            object_events: HashMap::new(),
            next_event_id: 1,
            generation: 0,
        }
    }

    fn allocate_id(&mut self) -> TimedEventId {
        let id = self.next_event_id;
        self.next_event_id += 1;
        id
    }

    fn insert(&mut self, event: TimedEvent) {
        match event.object_guid {
            Some(guid) => {
                self.object_events.entry(guid).or_default().insert(event.id);
            }
            None => {
                self.global_events.insert(event.id);
            }
        }
        self.events.insert(event.id, event);
    }

    fn remove(&mut self, id: TimedEventId) -> bool {
        let Some(event) = self.events.remove(&id) else {
            return false;
        };

        match event.object_guid {
            Some(guid) => {
                if let Some(ids) = self.object_events.get_mut(&guid) {
                    ids.remove(&id);
                    if ids.is_empty() {
                        self.object_events.remove(&guid);
                    }
                }
            }
            None => {
                self.global_events.remove(&id);
            }
        }
        true
    }
}

/// Per-state scheduler of timed script callbacks
///
/// Callbacks receive `(eventId, delay, repeats)` for global events and
/// `(eventId, delay, repeats, object)` for object events. A callback may
/// register or remove timed events, including its own, while it runs.
pub struct TimedEventManager {
    state_id: StateId,
    registry: RefCell<TimedEventRegistry>,
}

impl TimedEventManager {
    pub fn new(state_id: StateId) -> Self {
        Self {
            state_id,
            registry: RefCell::new(TimedEventRegistry::new()),
        }
    }

    /// The state this manager belongs to
    pub fn state_id(&self) -> StateId {
        self.state_id
    }

    /// Schedule a callback that is not bound to any object
    ///
    /// # Arguments
    /// * `callback` - Function called with `(eventId, delay, repeats)`
    /// * `delay` - Milliseconds between executions
    /// * `repeats` - Number of executions, 0 for infinite
    ///
    /// # Returns
    /// The new event id (never 0)
    pub fn register_global_event(&self, callback: Function, delay: u32, repeats: u32) -> TimedEventId {
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate_id();
        registry.insert(TimedEvent::new(
            id,
            callback,
            delay,
            repeats,
            None,
            TimedEventObjectType::Global,
        ));

        tracing::debug!(
            "Registered global timed event {} ({}ms x{}) in state {}",
            id,
            delay,
            repeats,
            self.state_id
        );
        id
    }

    /// Schedule a callback bound to one object
    ///
    /// The event only advances when the host updates that object.
    ///
    /// # Arguments
    /// * `guid` - Object the event is bound to
    /// * `callback` - Function called with `(eventId, delay, repeats, object)`
    /// * `delay` - Milliseconds between executions
    /// * `repeats` - Number of executions, 0 for infinite
    /// * `object_type` - Kind the object must resolve to when the event fires
    pub fn register_object_event(
        &self,
        guid: ObjectGuid,
        callback: Function,
        delay: u32,
        repeats: u32,
        object_type: TimedEventObjectType,
    ) -> TimedEventId {
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate_id();
        registry.insert(TimedEvent::new(
            id,
            callback,
            delay,
            repeats,
            Some(guid),
            object_type,
        ));

        tracing::debug!(
            "Registered {:?} timed event {} ({}ms x{}) for {}",
            object_type,
            id,
            delay,
            repeats,
            guid
        );
        id
    }

    /// Remove a single event
    ///
    /// # Returns
    /// `true` if the event existed
    pub fn remove_event(&self, id: TimedEventId) -> bool {
        self.registry.borrow_mut().remove(id)
    }

    /// Remove every event bound to `guid`
    ///
    /// # Returns
    /// Number of events removed
    pub fn remove_object_events(&self, guid: ObjectGuid) -> usize {
        let mut registry = self.registry.borrow_mut();
        let Some(ids) = registry.object_events.remove(&guid) else {
            return 0;
        };
        for id in &ids {
            registry.events.remove(id);
        }
        ids.len()
    }

    /// Remove every event that is not bound to an object
    pub fn remove_all_global_events(&self) -> usize {
        let mut registry = self.registry.borrow_mut();
        let ids = std::mem::take(&mut registry.global_events);
        for id in &ids {
            registry.events.remove(id);
        }
        ids.len()
    }

    /// Advance every global event by `diff` milliseconds
    pub fn update(&self, diff: u32) {
        let ids: Vec<TimedEventId> = {
            let registry = self.registry.borrow();
            if registry.global_events.is_empty() {
                return;
            }
            registry.global_events.iter().copied().collect()
        };
        self.update_event_list(ids, None, diff);
    }

    /// Advance the events bound to `object` by `diff` milliseconds
    pub fn update_object_events(&self, object: &WorldObject, diff: u32) {
        let ids: Vec<TimedEventId> = {
            let registry = self.registry.borrow();
            match registry.object_events.get(&object.guid()) {
                Some(ids) => ids.iter().copied().collect(),
                None => return,
            }
        };
        self.update_event_list(ids, Some(object), diff);
    }

    /// Advance, fire and retire the events in `ids`
    ///
    /// The registry is not borrowed while a callback runs. Events added
    /// during the pass are not part of `ids` and wait for the next update.
    fn update_event_list(&self, ids: Vec<TimedEventId>, object: Option<&WorldObject>, diff: u32) {
        let generation = self.registry.borrow().generation;
        let mut finished = Vec::new();

        for id in ids {
            let due = {
                let mut registry = self.registry.borrow_mut();
                if registry.generation != generation {
                    break;
                }
                let Some(event) = registry.events.get_mut(&id) else {
                    continue;
                };
                if !event.advance(diff) {
                    continue;
                }
                event.clone()
            };

            self.execute_event(&due, object);

            let mut registry = self.registry.borrow_mut();
            if registry.generation != generation {
                break;
            }
            // The callback may have removed its own event
            if let Some(event) = registry.events.get_mut(&id) {
                if event.complete_firing() {
                    finished.push(id);
                }
            }
        }

        if !finished.is_empty() {
            let mut registry = self.registry.borrow_mut();
            for id in finished {
                registry.remove(id);
            }
        }
    }

    fn execute_event(&self, event: &TimedEvent, object: Option<&WorldObject>) {
        let result = match event.object_type {
            TimedEventObjectType::Global => {
                event
                    .callback
                    .call::<()>((event.id, event.delay, event.repeats))
            }
            kind => match object.filter(|object| object.kind() == kind) {
                Some(object) => event.callback.call::<()>((
                    event.id,
                    event.delay,
                    event.repeats,
                    object.clone(),
                )),
                None => {
                    tracing::debug!(
                        "Skipping timed event {}: bound object is not a {:?}",
                        event.id,
                        kind
                    );
                    return;
                }
            },
        };

        if let Err(e) = result {
            tracing::error!(
                "Lua error in timed event {} (state {}): {}",
                event.id,
                self.state_id,
                e
            );
        }
    }

    /// Number of scheduled events of any kind
    pub fn active_event_count(&self) -> usize {
        self.registry.borrow().events.len()
    }

    pub fn global_event_count(&self) -> usize {
        self.registry.borrow().global_events.len()
    }

    pub fn object_event_count(&self, guid: ObjectGuid) -> usize {
        self.registry
            .borrow()
            .object_events
            .get(&guid)
            .map_or(0, BTreeSet::len)
    }

    /// Remove every event and restart id allocation at 1
    pub fn clear(&self) {
        let mut registry = self.registry.borrow_mut();
        registry.events.clear();
        registry.global_events.clear();
        registry.object_events.clear();
        registry.next_event_id = 1;
        registry.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CreatureRef, PlayerRef};
    use ale_sdk::{HighGuid, MASTER_STATE_ID};
    use mlua::Lua;
    use std::rc::Rc;

    fn function(lua: &Lua, source: &str) -> Function {
        lua.load(source).eval().unwrap()
    }

    fn counter(lua: &Lua, name: &str) -> Function {
        function(lua, &format!("function() {name} = ({name} or 0) + 1 end"))
    }

    fn read(lua: &Lua, name: &str) -> i64 {
        lua.globals().get::<Option<i64>>(name).unwrap().unwrap_or(0)
    }

    fn creature(counter: u32) -> CreatureRef {
        CreatureRef::new(ObjectGuid::new(HighGuid::Unit, 1234, counter), "Hogger")
    }

    #[test]
    fn test_event_ids_start_at_one() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        assert_eq!(timers.register_global_event(counter(&lua, "a"), 100, 1), 1);
        assert_eq!(timers.register_global_event(counter(&lua, "b"), 100, 1), 2);
    }

    #[test]
    fn test_fires_when_delay_reached() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        timers.register_global_event(counter(&lua, "n"), 1000, 3);

        timers.update(999);
        assert_eq!(read(&lua, "n"), 0);
        timers.update(1);
        assert_eq!(read(&lua, "n"), 1);

        timers.update(1000);
        timers.update(1000);
        assert_eq!(read(&lua, "n"), 3);
        assert_eq!(timers.active_event_count(), 0);

        timers.update(1000);
        assert_eq!(read(&lua, "n"), 3);
    }

    #[test]
    fn test_fires_at_most_once_per_update() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        timers.register_global_event(counter(&lua, "n"), 100, 0);

        // Overshoot is discarded, not carried over
        timers.update(1000);
        assert_eq!(read(&lua, "n"), 1);
        timers.update(50);
        assert_eq!(read(&lua, "n"), 1);
        timers.update(50);
        assert_eq!(read(&lua, "n"), 2);
    }

    #[test]
    fn test_infinite_event_stays_registered() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let id = timers.register_global_event(counter(&lua, "n"), 10, 0);

        for _ in 0..25 {
            timers.update(10);
        }
        assert_eq!(read(&lua, "n"), 25);
        assert_eq!(timers.global_event_count(), 1);
        assert!(timers.remove_event(id));
        assert!(!timers.remove_event(id));
    }

    #[test]
    fn test_callback_arguments() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let callback = function(
            &lua,
            "function(id, delay, repeats, extra) seen = id .. ':' .. delay .. ':' .. repeats .. ':' .. tostring(extra) end",
        );
        timers.register_global_event(callback, 250, 2);

        timers.update(250);
        let seen: String = lua.globals().get("seen").unwrap();
        assert_eq!(seen, "1:250:2:nil");
    }

    #[test]
    fn test_fifo_order() {
        let lua = Lua::new();
        lua.load("order = {}").exec().unwrap();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        for tag in ["a", "b", "c"] {
            let callback = function(&lua, &format!("function() table.insert(order, '{tag}') end"));
            timers.register_global_event(callback, 100, 1);
        }

        timers.update(100);
        let order: String = lua.load("table.concat(order)").eval().unwrap();
        assert_eq!(order, "abc");
    }

    #[test]
    fn test_failing_callback_consumes_repeat() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        timers.register_global_event(function(&lua, "function() error('boom') end"), 100, 2);

        timers.update(100);
        assert_eq!(timers.active_event_count(), 1);
        timers.update(100);
        assert_eq!(timers.active_event_count(), 0);
    }

    #[test]
    fn test_callback_removes_itself() {
        let lua = Lua::new();
        let timers = Rc::new(TimedEventManager::new(MASTER_STATE_ID));

        let manager = Rc::clone(&timers);
        let callback = lua
            .create_function(move |_, (id, _delay, _repeats): (TimedEventId, u32, u32)| {
                manager.remove_event(id);
                Ok(())
            })
            .unwrap();
        timers.register_global_event(callback, 100, 0);

        timers.update(100);
        assert_eq!(timers.active_event_count(), 0);
    }

    #[test]
    fn test_callback_registers_event() {
        let lua = Lua::new();
        let timers = Rc::new(TimedEventManager::new(MASTER_STATE_ID));
        let inner = counter(&lua, "inner");

        let manager = Rc::clone(&timers);
        let callback = lua
            .create_function(move |_, ()| {
                manager.register_global_event(inner.clone(), 0, 1);
                Ok(())
            })
            .unwrap();
        timers.register_global_event(callback, 100, 1);

        // The new event is not advanced during the pass that created it
        timers.update(100);
        assert_eq!(read(&lua, "inner"), 0);
        assert_eq!(timers.active_event_count(), 1);

        timers.update(0);
        assert_eq!(read(&lua, "inner"), 1);
        assert_eq!(timers.active_event_count(), 0);
    }

    #[test]
    fn test_clear_during_update() {
        let lua = Lua::new();
        let timers = Rc::new(TimedEventManager::new(MASTER_STATE_ID));

        let manager = Rc::clone(&timers);
        let callback = lua
            .create_function(move |_, ()| {
                manager.clear();
                Ok(())
            })
            .unwrap();
        timers.register_global_event(callback, 100, 0);
        timers.register_global_event(counter(&lua, "n"), 100, 0);

        timers.update(100);
        assert_eq!(read(&lua, "n"), 0);
        assert_eq!(timers.active_event_count(), 0);
    }

    #[test]
    fn test_object_events() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let hogger = creature(1);
        let other = creature(2);
        let callback = function(&lua, "function(id, delay, repeats, creature) name = creature:GetName() end");
        timers.register_object_event(hogger.guid(), callback, 500, 1, TimedEventObjectType::Creature);

        // Global updates and other objects do not advance it
        timers.update(500);
        timers.update_object_events(&WorldObject::from(other), 500);
        assert_eq!(timers.object_event_count(hogger.guid()), 1);

        timers.update_object_events(&WorldObject::from(hogger.clone()), 500);
        let name: String = lua.globals().get("name").unwrap();
        assert_eq!(name, "Hogger");
        assert_eq!(timers.object_event_count(hogger.guid()), 0);
        assert_eq!(timers.active_event_count(), 0);
    }

    #[test]
    fn test_object_kind_mismatch_skips_callback() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let guid = ObjectGuid::new(HighGuid::Player, 0, 9);
        timers.register_object_event(guid, counter(&lua, "n"), 100, 0, TimedEventObjectType::Creature);

        let player = WorldObject::from(PlayerRef::new(guid, "Jaina"));
        timers.update_object_events(&player, 100);
        assert_eq!(read(&lua, "n"), 0);
        assert_eq!(timers.object_event_count(guid), 1);
    }

    #[test]
    fn test_kind_mismatch_still_consumes_repeat() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let guid = ObjectGuid::new(HighGuid::Player, 0, 10);
        timers.register_object_event(guid, counter(&lua, "n"), 100, 1, TimedEventObjectType::Creature);

        timers.update_object_events(&WorldObject::from(PlayerRef::new(guid, "Anduin")), 100);
        assert_eq!(read(&lua, "n"), 0);
        assert_eq!(timers.object_event_count(guid), 0);
        assert_eq!(timers.active_event_count(), 0);
    }

    #[test]
    fn test_remove_object_events() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let hogger = creature(1);
        timers.register_object_event(hogger.guid(), counter(&lua, "a"), 100, 0, TimedEventObjectType::Creature);
        timers.register_object_event(hogger.guid(), counter(&lua, "b"), 100, 0, TimedEventObjectType::Creature);
        timers.register_global_event(counter(&lua, "c"), 100, 0);

        assert_eq!(timers.remove_object_events(hogger.guid()), 2);
        assert_eq!(timers.remove_object_events(hogger.guid()), 0);
        assert_eq!(timers.active_event_count(), 1);
        assert_eq!(timers.global_event_count(), 1);
    }

    #[test]
    fn test_remove_object_events_leaves_other_objects() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let hogger = creature(1);
        let other = creature(2);
        timers.register_object_event(hogger.guid(), counter(&lua, "a"), 100, 0, TimedEventObjectType::Creature);
        timers.register_object_event(hogger.guid(), counter(&lua, "b"), 100, 0, TimedEventObjectType::Creature);
        timers.register_object_event(other.guid(), counter(&lua, "c"), 100, 1, TimedEventObjectType::Creature);
        assert_eq!(timers.active_event_count(), 3);

        assert_eq!(timers.remove_object_events(hogger.guid()), 2);
        assert_eq!(timers.active_event_count(), 1);
        assert_eq!(timers.object_event_count(other.guid()), 1);

        timers.update_object_events(&WorldObject::from(hogger), 100);
        timers.update_object_events(&WorldObject::from(other), 100);
        assert_eq!(read(&lua, "a") + read(&lua, "b"), 0);
        assert_eq!(read(&lua, "c"), 1);
        assert_eq!(timers.active_event_count(), 0);
    }

    #[test]
    fn test_remove_all_global_events_keeps_object_events() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let hogger = creature(1);
        timers.register_global_event(counter(&lua, "a"), 100, 0);
        timers.register_global_event(counter(&lua, "b"), 100, 0);
        timers.register_object_event(hogger.guid(), counter(&lua, "c"), 100, 0, TimedEventObjectType::Creature);

        assert_eq!(timers.remove_all_global_events(), 2);
        assert_eq!(timers.global_event_count(), 0);
        assert_eq!(timers.object_event_count(hogger.guid()), 1);
    }

    #[test]
    fn test_clear_resets_ids() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(530);
        timers.register_global_event(counter(&lua, "a"), 100, 0);
        timers.register_object_event(creature(1).guid(), counter(&lua, "b"), 100, 0, TimedEventObjectType::Creature);

        timers.clear();
        assert_eq!(timers.active_event_count(), 0);
        assert_eq!(timers.state_id(), 530);
        assert_eq!(timers.register_global_event(counter(&lua, "c"), 100, 0), 1);
    }

    #[test]
    fn test_update_after_clear_fires_nothing() {
        let lua = Lua::new();
        let timers = TimedEventManager::new(MASTER_STATE_ID);
        let hogger = creature(1);
        timers.register_global_event(counter(&lua, "a"), 100, 0);
        timers.register_object_event(hogger.guid(), counter(&lua, "b"), 100, 0, TimedEventObjectType::Creature);

        timers.clear();
        timers.update(100);
        timers.update_object_events(&WorldObject::from(hogger.clone()), 100);

        assert_eq!(read(&lua, "a") + read(&lua, "b"), 0);
        assert_eq!(timers.active_event_count(), 0);
        assert_eq!(timers.global_event_count(), 0);
        assert_eq!(timers.object_event_count(hogger.guid()), 0);
    }
}
