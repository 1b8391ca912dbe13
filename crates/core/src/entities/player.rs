//! Player handle

use ale_sdk::{ObjectGuid, TimedEventObjectType};
use mlua::{UserData, UserDataMethods};

use super::object::ObjectHandle;
use super::add_object_methods;

/// Identity snapshot of an online player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    guid: ObjectGuid,
    name: String,
    map_id: u32,
}

impl PlayerRef {
    pub fn new(guid: ObjectGuid, name: impl Into<String>) -> Self {
        Self {
            guid,
            name: name.into(),
            map_id: 0,
        }
    }

    /// Set the map the player is currently on
    pub fn with_map(mut self, map_id: u32) -> Self {
        self.map_id = map_id;
        self
    }

    pub fn guid(&self) -> ObjectGuid {
        self.guid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map_id(&self) -> u32 {
        self.map_id
    }
}

impl ObjectHandle for PlayerRef {
    const KIND: TimedEventObjectType = TimedEventObjectType::Player;
    const TYPE_NAME: &'static str = "Player";

    fn guid(&self) -> ObjectGuid {
        self.guid
    }

    fn entry(&self) -> u32 {
        0
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn map_id(&self) -> u32 {
        self.map_id
    }
}

impl UserData for PlayerRef {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        add_object_methods::<Self, M>(methods);
    }
}
