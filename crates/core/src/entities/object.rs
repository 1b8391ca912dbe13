//! Shared handle behaviour and the `WorldObject` union

use ale_sdk::{ObjectGuid, TimedEventObjectType};
use mlua::{Function, IntoLua, Lua, MetaMethod, UserData, UserDataMethods, Value};

use super::{CreatureRef, GameObjectRef, PlayerRef};
use crate::lua::timed_events;
use crate::timers::TimedEventId;

/// Common accessors of every host object handle
pub trait ObjectHandle: Clone + 'static {
    /// Kind recorded on timed events registered through this handle
    const KIND: TimedEventObjectType;

    /// Name shown by `tostring()` in scripts
    const TYPE_NAME: &'static str;

    fn guid(&self) -> ObjectGuid;

    /// Template entry, 0 for players
    fn entry(&self) -> u32;

    fn name(&self) -> &str;

    fn map_id(&self) -> u32;
}

/// Lua integers are signed 64-bit, so guids cross as their bit pattern
pub(crate) fn guid_to_lua(guid: ObjectGuid) -> i64 {
    guid.raw() as i64
}

pub(crate) fn guid_from_lua(value: i64) -> ObjectGuid {
    ObjectGuid::from_raw(value as u64)
}

/// Register the script methods shared by all handle types
pub(crate) fn add_object_methods<T, M>(methods: &mut M)
where
    T: ObjectHandle + UserData,
    M: UserDataMethods<T>,
{
    methods.add_method("GetGUID", |_, this, ()| Ok(guid_to_lua(this.guid())));
    methods.add_method("GetGUIDLow", |_, this, ()| Ok(this.guid().counter()));
    methods.add_method("GetEntry", |_, this, ()| Ok(this.entry()));
    methods.add_method("GetName", |_, this, ()| Ok(this.name().to_string()));
    methods.add_method("GetMapId", |_, this, ()| Ok(this.map_id()));

    methods.add_method(
        "RegisterEvent",
        |lua, this, (callback, delay, repeats): (Function, u32, Option<u32>)| {
            let manager = timed_events(lua)?;
            Ok(manager.register_object_event(
                this.guid(),
                callback,
                delay,
                repeats.unwrap_or(1),
                T::KIND,
            ))
        },
    );
    methods.add_method("RemoveEvent", |lua, _, event_id: TimedEventId| {
        Ok(timed_events(lua)?.remove_event(event_id))
    });
    methods.add_method("RemoveEvents", |lua, this, ()| {
        timed_events(lua)?.remove_object_events(this.guid());
        Ok(())
    });
    methods.add_method("GetEventCount", |lua, this, ()| {
        Ok(timed_events(lua)?.object_event_count(this.guid()))
    });

    methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
        Ok(format!("{} ({}): {}", T::TYPE_NAME, this.name(), this.guid()))
    });
}

/// Any object the host can bind timed events to
#[derive(Debug, Clone)]
pub enum WorldObject {
    Player(PlayerRef),
    Creature(CreatureRef),
    GameObject(GameObjectRef),
}

impl WorldObject {
    pub fn guid(&self) -> ObjectGuid {
        match self {
            Self::Player(player) => player.guid(),
            Self::Creature(creature) => creature.guid(),
            Self::GameObject(object) => object.guid(),
        }
    }

    pub fn kind(&self) -> TimedEventObjectType {
        match self {
            Self::Player(_) => PlayerRef::KIND,
            Self::Creature(_) => CreatureRef::KIND,
            Self::GameObject(_) => GameObjectRef::KIND,
        }
    }

    pub fn to_player(&self) -> Option<&PlayerRef> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn to_creature(&self) -> Option<&CreatureRef> {
        match self {
            Self::Creature(creature) => Some(creature),
            _ => None,
        }
    }

    pub fn to_game_object(&self) -> Option<&GameObjectRef> {
        match self {
            Self::GameObject(object) => Some(object),
            _ => None,
        }
    }
}

impl From<PlayerRef> for WorldObject {
    fn from(player: PlayerRef) -> Self {
        Self::Player(player)
    }
}

impl From<CreatureRef> for WorldObject {
    fn from(creature: CreatureRef) -> Self {
        Self::Creature(creature)
    }
}

impl From<GameObjectRef> for WorldObject {
    fn from(object: GameObjectRef) -> Self {
        Self::GameObject(object)
    }
}

impl IntoLua for WorldObject {
    fn into_lua(self, lua: &Lua) -> mlua::Result<Value> {
        match self {
            Self::Player(player) => player.into_lua(lua),
            Self::Creature(creature) => creature.into_lua(lua),
            Self::GameObject(object) => object.into_lua(lua),
        }
    }
}
