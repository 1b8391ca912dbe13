//! Server-wide hooks

use ale_sdk::{EventType, WorldEvent};

use super::master_timers;
use crate::manager::AleManager;

/// Forwards world callbacks to `RegisterServerEvent` handlers
pub struct WorldHooks<'a> {
    ale: &'a AleManager,
}

impl<'a> WorldHooks<'a> {
    pub fn new(ale: &'a AleManager) -> Self {
        Self { ale }
    }

    fn trigger<A>(&self, event: WorldEvent, args: A)
    where
        A: mlua::IntoLuaMulti + Clone,
    {
        if self.ale.is_initialized() {
            self.ale.events().trigger_global_event(event, args);
        }
    }

    pub fn on_startup(&self) {
        self.trigger(WorldEvent::OnStartup, WorldEvent::OnStartup.id());
    }

    pub fn on_shutdown(&self) {
        self.trigger(WorldEvent::OnShutdown, WorldEvent::OnShutdown.id());
    }

    /// # Arguments
    /// * `code` - Exit code the server will stop with
    /// * `mask` - Shutdown flags
    pub fn on_shutdown_init(&self, code: u32, mask: u32) {
        self.trigger(
            WorldEvent::OnShutdownInit,
            (WorldEvent::OnShutdownInit.id(), code, mask),
        );
    }

    pub fn on_shutdown_cancel(&self) {
        self.trigger(WorldEvent::OnShutdownCancel, WorldEvent::OnShutdownCancel.id());
    }

    pub fn on_config_load(&self, reload: bool) {
        self.trigger(WorldEvent::OnConfigLoad, (WorldEvent::OnConfigLoad.id(), reload));
    }

    /// World tick
    ///
    /// Advances the master state's global timed events, then runs the
    /// `OnUpdate` handlers.
    pub fn on_update(&self, diff: u32) {
        let Some(timers) = master_timers(self.ale) else {
            return;
        };
        timers.update(diff);

        self.trigger(WorldEvent::OnUpdate, (WorldEvent::OnUpdate.id(), diff));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AleConfig;

    fn running() -> (tempfile::TempDir, AleManager) {
        let dir = tempfile::tempdir().unwrap();
        let mut ale = AleManager::new(AleConfig {
            script_path: dir.path().display().to_string(),
            ..AleConfig::default()
        });
        ale.initialize().unwrap();
        (dir, ale)
    }

    fn run(ale: &AleManager, source: &str) {
        ale.master_state().unwrap().execute(source, "test.lua").unwrap();
    }

    fn global<T: mlua::FromLua>(ale: &AleManager, name: &str) -> T {
        ale.master_state().unwrap().lua().globals().get(name).unwrap()
    }

    #[test]
    fn test_hooks_inactive_before_initialize() {
        let ale = AleManager::new(AleConfig::default());
        let hooks = WorldHooks::new(&ale);
        hooks.on_startup();
        hooks.on_update(100);
        assert!(ale.master_state().is_none());
    }

    #[test]
    fn test_update_drives_timers_then_handlers() {
        let (_dir, ale) = running();
        run(
            &ale,
            r#"
            log = ""
            CreateLuaEvent(function() log = log .. "timer;" end, 100, 1)
            RegisterServerEvent(1, function(event, diff) log = log .. "update " .. diff .. ";" end)
            "#,
        );

        let hooks = WorldHooks::new(&ale);
        hooks.on_update(60);
        hooks.on_update(60);

        let log: String = global(&ale, "log");
        assert_eq!(log, "update 60;timer;update 60;");
    }

    #[test]
    fn test_shutdown_init_arguments() {
        let (_dir, ale) = running();
        run(
            &ale,
            "RegisterServerEvent(3, function(event, code, mask) seen = {event, code, mask} end)",
        );

        WorldHooks::new(&ale).on_shutdown_init(2, 4);
        let seen: Vec<u32> = global(&ale, "seen");
        assert_eq!(seen, vec![3, 2, 4]);
    }

    #[test]
    fn test_config_load_passes_reload_flag() {
        let (_dir, ale) = running();
        run(&ale, "RegisterServerEvent(2, function(_, reload) reloaded = reload end)");

        WorldHooks::new(&ale).on_config_load(true);
        let reloaded: bool = global(&ale, "reloaded");
        assert!(reloaded);
    }
}
