//! Timed event record

use ale_sdk::{ObjectGuid, TimedEventObjectType};
use mlua::Function;

/// Identifier of a timed event, unique within one manager
pub type TimedEventId = u64;

/// A scheduled script callback
///
/// `elapsed` accumulates the diffs passed to the update calls and is reset
/// to 0 every time the event fires.
#[derive(Debug, Clone)]
pub(crate) struct TimedEvent {
    pub id: TimedEventId,
    pub callback: Function,
    /// Milliseconds between executions
    pub delay: u32,
    /// Total executions, 0 means infinite
    pub repeats: u32,
    pub remaining_repeats: u32,
    pub elapsed: u32,
    pub object_guid: Option<ObjectGuid>,
    pub object_type: TimedEventObjectType,
}

impl TimedEvent {
    pub fn new(
        id: TimedEventId,
        callback: Function,
        delay: u32,
        repeats: u32,
        object_guid: Option<ObjectGuid>,
        object_type: TimedEventObjectType,
    ) -> Self {
        Self {
            id,
            callback,
            delay,
            repeats,
            remaining_repeats: repeats,
            elapsed: 0,
            object_guid,
            object_type,
        }
    }

    /// Add `diff` milliseconds and report whether the event is due
    pub fn advance(&mut self, diff: u32) -> bool {
        self.elapsed = self.elapsed.saturating_add(diff);
        self.elapsed >= self.delay
    }

    /// Bookkeeping after a firing
    ///
    /// # Returns
    /// `true` if the event has no executions left
    pub fn complete_firing(&mut self) -> bool {
        self.elapsed = 0;
        if self.repeats == 0 {
            return false;
        }
        self.remaining_repeats = self.remaining_repeats.saturating_sub(1);
        self.remaining_repeats == 0
    }
}
