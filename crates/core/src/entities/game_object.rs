//! GameObject handle

use ale_sdk::{ObjectGuid, TimedEventObjectType};
use mlua::{UserData, UserDataMethods};

use super::object::ObjectHandle;
use super::add_object_methods;

/// Identity snapshot of a game object (doors, chests, herbs...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameObjectRef {
    guid: ObjectGuid,
    entry: u32,
    name: String,
    map_id: u32,
}

impl GameObjectRef {
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
}

impl ObjectHandle for GameObjectRef {
    const KIND: TimedEventObjectType = TimedEventObjectType::GameObject;
    const TYPE_NAME: &'static str = "GameObject";

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

impl UserData for GameObjectRef {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        add_object_methods::<Self, M>(methods);
    }
}
