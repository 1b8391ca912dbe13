//! Registry keys for the three handler scopes
//!
//! Every key carries the event family next to the numeric id, since the
//! same integer means different events in different families.

use std::fmt;

use ale_sdk::{EventFamily, EventType, ObjectGuid};

/// Key for handlers that fire for every instance of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalEventKey {
    pub family: EventFamily,
    pub event_id: u32,
}

impl GlobalEventKey {
    pub fn new(event: impl EventType) -> Self {
        Self {
            family: event.family(),
            event_id: event.id(),
        }
    }
}

impl fmt::Display for GlobalEventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.family, self.event_id)
    }
}

/// Key for handlers scoped to one template entry (e.g. a creature id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryEventKey {
    pub family: EventFamily,
    pub event_id: u32,
    pub entry: u32,
}

impl EntryEventKey {
    pub fn new(event: impl EventType, entry: u32) -> Self {
        Self {
            family: event.family(),
            event_id: event.id(),
            entry,
        }
    }
}

impl fmt::Display for EntryEventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} entry {}", self.family, self.event_id, self.entry)
    }
}

/// Key for handlers scoped to one object instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniqueEventKey {
    pub family: EventFamily,
    pub event_id: u32,
    pub guid: ObjectGuid,
}

impl UniqueEventKey {
    pub fn new(event: impl EventType, guid: ObjectGuid) -> Self {
        Self {
            family: event.family(),
            event_id: event.id(),
            guid,
        }
    }
}

impl fmt::Display for UniqueEventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} guid 0x{:016X}",
            self.family,
            self.event_id,
            self.guid.raw()
        )
    }
}
