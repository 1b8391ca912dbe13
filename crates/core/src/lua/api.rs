//! Global functions available to every script
//!
//! Handlers registered here are tagged with the id of the state that
//! registered them, so tearing down a map state also drops its handlers.

use std::rc::Rc;

use ale_sdk::{EventFamily, RawEvent, StateId};
use mlua::{Function, Lua, Result as LuaResult, Table};

use crate::entities::guid_from_lua;
use crate::events::{EventHandler, EventManager, HandlerId};
use crate::timers::{TimedEventId, TimedEventManager};

/// Registration functions keyed on a single event id
const GLOBAL_REGISTRARS: [(&str, EventFamily); 4] = [
    ("RegisterServerEvent", EventFamily::Server),
    ("RegisterPlayerEvent", EventFamily::Player),
    ("RegisterWorldObjectEvent", EventFamily::WorldObject),
    ("RegisterAllCreatureEvent", EventFamily::AllCreature),
];

const GLOBAL_CANCELLERS: [(&str, EventFamily); 2] = [
    ("CancelServerEvent", EventFamily::Server),
    ("CancelPlayerEvent", EventFamily::Player),
];

/// Builder for the script API of one state
///
/// # Example
///
/// ```ignore
/// let api = AleApi::new(state_id, Rc::clone(&events), Rc::clone(&timed_events));
/// api.register(&lua)?;
///
/// lua.load("RegisterPlayerEvent(3, function(event, player) end)").exec()?;
/// ```
pub struct AleApi {
    state_id: StateId,
    events: Rc<EventManager>,
    timed_events: Rc<TimedEventManager>,
}

impl AleApi {
    pub fn new(
        state_id: StateId,
        events: Rc<EventManager>,
        timed_events: Rc<TimedEventManager>,
    ) -> Self {
        Self {
            state_id,
            events,
            timed_events,
        }
    }

    /// Install the API into `lua` and bind the state's timed event manager
    pub fn register(self, lua: &Lua) -> LuaResult<()> {
        let globals = lua.globals();

        self.register_event_functions(lua, &globals)?;
        self.register_cancel_functions(lua, &globals)?;
        self.register_timed_event_functions(lua, &globals)?;

        tracing::debug!("Registered script API in state {}", self.state_id);
        lua.set_app_data(self.timed_events);
        Ok(())
    }

    /// Register*Event functions
    fn register_event_functions(&self, lua: &Lua, globals: &Table) -> LuaResult<()> {
        for (name, family) in GLOBAL_REGISTRARS {
            let events = Rc::clone(&self.events);
            let state_id = self.state_id;
            let register = lua.create_function(
                move |_, (event, callback, shots): (u32, Function, Option<u32>)| {
                    let handler = EventHandler::new(callback)
                        .with_shots(shots.unwrap_or(0))
                        .with_state(state_id);
                    Ok(events.register_global_event(RawEvent::new(family, event), handler))
                },
            )?;
            globals.set(name, register)?;
        }

        // RegisterCreatureEvent(entry, event, function[, shots])
        let events = Rc::clone(&self.events);
        let state_id = self.state_id;
        let register_creature = lua.create_function(
            move |_, (entry, event, callback, shots): (u32, u32, Function, Option<u32>)| {
                let handler = EventHandler::new(callback)
                    .with_shots(shots.unwrap_or(0))
                    .with_state(state_id);
                Ok(events.register_entry_event(
                    RawEvent::new(EventFamily::Creature, event),
                    entry,
                    handler,
                ))
            },
        )?;
        globals.set("RegisterCreatureEvent", register_creature)?;

        // RegisterUniqueCreatureEvent(guid, event, function[, shots])
        let events = Rc::clone(&self.events);
        let register_unique = lua.create_function(
            move |_, (guid, event, callback, shots): (i64, u32, Function, Option<u32>)| {
                let handler = EventHandler::new(callback)
                    .with_shots(shots.unwrap_or(0))
                    .with_state(state_id);
                Ok(events.register_unique_event(
                    RawEvent::new(EventFamily::Creature, event),
                    guid_from_lua(guid),
                    handler,
                ))
            },
        )?;
        globals.set("RegisterUniqueCreatureEvent", register_unique)?;

        Ok(())
    }

    /// Cancel* functions
    fn register_cancel_functions(&self, lua: &Lua, globals: &Table) -> LuaResult<()> {
        let events = Rc::clone(&self.events);
        let cancel = lua.create_function(move |_, id: HandlerId| Ok(events.cancel_event(id)))?;
        globals.set("CancelEvent", cancel)?;

        for (name, family) in GLOBAL_CANCELLERS {
            let events = Rc::clone(&self.events);
            let cancel = lua.create_function(move |_, event: u32| {
                events.cancel_global_event(RawEvent::new(family, event));
                Ok(())
            })?;
            globals.set(name, cancel)?;
        }

        let events = Rc::clone(&self.events);
        let cancel_creature = lua.create_function(move |_, (entry, event): (u32, u32)| {
            events.cancel_entry_event(RawEvent::new(EventFamily::Creature, event), entry);
            Ok(())
        })?;
        globals.set("CancelCreatureEvent", cancel_creature)?;

        Ok(())
    }

    /// CreateLuaEvent and friends, bound to this state's timed events
    fn register_timed_event_functions(&self, lua: &Lua, globals: &Table) -> LuaResult<()> {
        let timed = Rc::clone(&self.timed_events);
        let create = lua.create_function(
            move |_, (callback, delay, repeats): (Function, u32, Option<u32>)| {
                Ok(timed.register_global_event(callback, delay, repeats.unwrap_or(1)))
            },
        )?;
        globals.set("CreateLuaEvent", create)?;

        let timed = Rc::clone(&self.timed_events);
        let remove = lua.create_function(move |_, id: TimedEventId| Ok(timed.remove_event(id)))?;
        globals.set("RemoveTimedEvent", remove)?;

        let timed = Rc::clone(&self.timed_events);
        let remove_all = lua.create_function(move |_, ()| {
            timed.remove_all_global_events();
            Ok(())
        })?;
        globals.set("RemoveAllTimedEvents", remove_all)?;

        let timed = Rc::clone(&self.timed_events);
        let count = lua.create_function(move |_, ()| Ok(timed.global_event_count()))?;
        globals.set("GetTimedEventCount", count)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{guid_to_lua, CreatureRef, PlayerRef, WorldObject};
    use ale_sdk::{CreatureEvent, HighGuid, ObjectGuid, PlayerEvent, WorldEvent};

    struct Fixture {
        lua: Lua,
        events: Rc<EventManager>,
        timed_events: Rc<TimedEventManager>,
    }

    fn fixture(state_id: StateId) -> Fixture {
        let lua = Lua::new();
        let events = Rc::new(EventManager::new());
        let timed_events = Rc::new(TimedEventManager::new(state_id));
        AleApi::new(state_id, Rc::clone(&events), Rc::clone(&timed_events))
            .register(&lua)
            .unwrap();
        Fixture {
            lua,
            events,
            timed_events,
        }
    }

    fn player() -> PlayerRef {
        PlayerRef::new(ObjectGuid::new(HighGuid::Player, 0, 42), "Thrall")
    }

    #[test]
    fn test_register_player_event_from_script() {
        let f = fixture(-1);
        let id: HandlerId = f
            .lua
            .load("return RegisterPlayerEvent(3, function(event, player) greeted = player:GetName() end)")
            .eval()
            .unwrap();
        assert_eq!(id, 1);

        let executed = f
            .events
            .trigger_global_event(PlayerEvent::OnLogin, (PlayerEvent::OnLogin as u32, player()));
        assert_eq!(executed, 1);
        let greeted: String = f.lua.globals().get("greeted").unwrap();
        assert_eq!(greeted, "Thrall");
    }

    #[test]
    fn test_shots_argument() {
        let f = fixture(-1);
        f.lua
            .load("RegisterServerEvent(14, function() started = (started or 0) + 1 end, 1)")
            .exec()
            .unwrap();

        f.events.trigger_global_event(WorldEvent::OnStartup, (14,));
        f.events.trigger_global_event(WorldEvent::OnStartup, (14,));
        let started: i64 = f.lua.globals().get("started").unwrap();
        assert_eq!(started, 1);
    }

    #[test]
    fn test_cancel_functions() {
        let f = fixture(-1);
        f.lua
            .load(
                r#"
                local id = RegisterPlayerEvent(3, function() end)
                RegisterPlayerEvent(4, function() end)
                RegisterServerEvent(1, function() end)
                RegisterCreatureEvent(1234, 14, function() end)
                cancelled = CancelEvent(id)
                CancelPlayerEvent(4)
                CancelServerEvent(1)
                CancelCreatureEvent(1234, 14)
                "#,
            )
            .exec()
            .unwrap();

        let cancelled: bool = f.lua.globals().get("cancelled").unwrap();
        assert!(cancelled);
        assert_eq!(f.events.handler_count(), 0);
    }

    #[test]
    fn test_handlers_tagged_with_state() {
        let f = fixture(530);
        f.lua
            .load("RegisterPlayerEvent(3, function() end)")
            .exec()
            .unwrap();
        assert_eq!(f.events.cancel_state_events(-1), 0);
        assert_eq!(f.events.cancel_state_events(530), 1);
    }

    #[test]
    fn test_creature_scopes() {
        let f = fixture(-1);
        let creature = CreatureRef::new(ObjectGuid::new(HighGuid::Unit, 1234, 7), "Hogger");
        f.lua.globals().set("hogger_guid", guid_to_lua(creature.guid())).unwrap();
        f.lua
            .load(
                r#"
                RegisterCreatureEvent(1234, 14, function() by_entry = true end)
                RegisterUniqueCreatureEvent(hogger_guid, 14, function() by_guid = true end)
                "#,
            )
            .exec()
            .unwrap();

        assert_eq!(f.events.trigger_entry_event(CreatureEvent::OnDeath, 1234, ()), 1);
        assert_eq!(
            f.events
                .trigger_unique_event(CreatureEvent::OnDeath, creature.guid(), ()),
            1
        );
        assert!(f.lua.globals().get::<bool>("by_entry").unwrap());
        assert!(f.lua.globals().get::<bool>("by_guid").unwrap());
    }

    #[test]
    fn test_create_lua_event_defaults_to_one_repeat() {
        let f = fixture(-1);
        f.lua
            .load("CreateLuaEvent(function() ticks = (ticks or 0) + 1 end, 100)")
            .exec()
            .unwrap();
        assert_eq!(f.timed_events.global_event_count(), 1);

        f.timed_events.update(100);
        f.timed_events.update(100);
        let ticks: i64 = f.lua.globals().get("ticks").unwrap();
        assert_eq!(ticks, 1);

        let count: usize = f.lua.load("return GetTimedEventCount()").eval().unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_remove_timed_events_from_script() {
        let f = fixture(-1);
        f.lua
            .load(
                r#"
                local id = CreateLuaEvent(function() end, 100, 0)
                CreateLuaEvent(function() end, 100, 0)
                CreateLuaEvent(function() end, 100, 0)
                removed = RemoveTimedEvent(id)
                "#,
            )
            .exec()
            .unwrap();
        assert!(f.lua.globals().get::<bool>("removed").unwrap());
        assert_eq!(f.timed_events.global_event_count(), 2);

        f.lua.load("RemoveAllTimedEvents()").exec().unwrap();
        assert_eq!(f.timed_events.global_event_count(), 0);
    }

    #[test]
    fn test_object_register_event() {
        let f = fixture(-1);
        let thrall = player();
        f.lua.globals().set("thrall", thrall.clone()).unwrap();
        f.lua
            .load(
                r#"
                thrall:RegisterEvent(function(id, delay, repeats, p) pinged = p:GetName() end, 1000)
                thrall:RegisterEvent(function() end, 1000, 0)
                count = thrall:GetEventCount()
                "#,
            )
            .exec()
            .unwrap();
        assert_eq!(f.lua.globals().get::<usize>("count").unwrap(), 2);

        f.timed_events
            .update_object_events(&WorldObject::from(thrall.clone()), 1000);
        let pinged: String = f.lua.globals().get("pinged").unwrap();
        assert_eq!(pinged, "Thrall");
        assert_eq!(f.timed_events.object_event_count(thrall.guid()), 1);

        f.lua.load("thrall:RemoveEvents()").exec().unwrap();
        assert_eq!(f.timed_events.object_event_count(thrall.guid()), 0);
    }
}
