//! WorldObject lifecycle hooks

use ale_sdk::{EventType, WorldObjectEvent};

use super::master_timers;
use crate::entities::WorldObject;
use crate::manager::AleManager;

/// Forwards object lifecycle callbacks to `RegisterWorldObjectEvent`
/// handlers and keeps per-object timed events in step with the object
pub struct WorldObjectHooks<'a> {
    ale: &'a AleManager,
}

impl<'a> WorldObjectHooks<'a> {
    pub fn new(ale: &'a AleManager) -> Self {
        Self { ale }
    }

    fn trigger(&self, event: WorldObjectEvent, object: &WorldObject) {
        let events = self.ale.events();
        if events.has_global_handlers(event) {
            events.trigger_global_event(event, (event.id(), object.clone()));
        }
    }

    pub fn on_create(&self, object: &WorldObject) {
        if self.ale.is_initialized() {
            self.trigger(WorldObjectEvent::OnCreate, object);
        }
    }

    /// Object leaving the world
    ///
    /// Handlers run first, then every timed event bound to the object is
    /// dropped.
    pub fn on_destroy(&self, object: &WorldObject) {
        if !self.ale.is_initialized() {
            return;
        }
        self.trigger(WorldObjectEvent::OnDestroy, object);

        if let Some(timers) = master_timers(self.ale) {
            let removed = timers.remove_object_events(object.guid());
            if removed > 0 {
                tracing::debug!("Dropped {} timed events of {}", removed, object.guid());
            }
        }
    }

    pub fn on_update(&self, object: &WorldObject, diff: u32) {
        if let Some(timers) = master_timers(self.ale) {
            timers.update_object_events(object, diff);
        }
    }
}
