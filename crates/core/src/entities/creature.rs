//! Creature handle

use ale_sdk::{ObjectGuid, TimedEventObjectType};
use mlua::{UserData, UserDataMethods};

use super::object::ObjectHandle;
use super::add_object_methods;

/// Identity snapshot of a creature
///
/// The entry is taken from the guid, which encodes it for units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatureRef {
    guid: ObjectGuid,
    entry: u32,
    name: String,
    map_id: u32,
}

impl CreatureRef {
    pub fn new(guid: ObjectGuid, name: impl Into<String>) -> Self {
        Self {
            guid,
            entry: guid.entry(),
            name: name.into(),
            map_id: 0,
        }
    }

    pub fn with_map(mut self, map_id: u32) -> Self {
        self.map_id = map_id;
        self
    }

    pub fn guid(&self) -> ObjectGuid {
        self.guid
    }

    pub fn entry(&self) -> u32 {
        self.entry
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map_id(&self) -> u32 {
        self.map_id
    }
}

impl ObjectHandle for CreatureRef {
    const KIND: TimedEventObjectType = TimedEventObjectType::Creature;
    const TYPE_NAME: &'static str = "Creature";

    fn guid(&self) -> ObjectGuid {
        self.guid
    }

    fn entry(&self) -> u32 {
        self.entry
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn map_id(&self) -> u32 {
        self.map_id
    }
}

impl UserData for CreatureRef {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        add_object_methods::<Self, M>(methods);
    }
}
