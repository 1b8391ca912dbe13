//! Engine lifecycle
//!
//! [`AleManager`] owns the configuration, the shared [`EventManager`] and
//! every script state. The host creates one on its world thread, calls
//! [`initialize`](AleManager::initialize) once the world is up and routes
//! its hook callbacks through [`crate::hooks`].

use std::path::{Path, PathBuf};
use std::rc::Rc;

use ale_sdk::MASTER_STATE_ID;

use crate::config::AleConfig;
use crate::error::{AleError, AleResult};
use crate::events::EventManager;
use crate::state::{ScriptState, StateManager};
use crate::timers::TimedEventManager;

/// The Lua engine
///
/// # Example
///
/// ```ignore
/// let mut ale = AleManager::new(AleConfig::load()?).with_config_path(ale_config_path()?);
/// ale.initialize()?;
///
/// // Every world tick
/// WorldHooks::new(&ale).on_update(diff);
///
/// ale.shutdown();
/// ```
pub struct AleManager {
    config: AleConfig,
    config_path: Option<PathBuf>,
    events: Rc<EventManager>,
    states: StateManager,
    initialized: bool,
}

impl AleManager {
    pub fn new(config: AleConfig) -> Self {
        let events = Rc::new(EventManager::new());
        let states = StateManager::new(Rc::clone(&events)).with_search_paths(config.search_paths());
        Self {
            config,
            config_path: None,
            events,
            states,
            initialized: false,
        }
    }

    /// File re-read by [`reload_config`](Self::reload_config)
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Start the engine: create the master state and load scripts
    ///
    /// Does nothing when the engine is disabled in the configuration; check
    /// [`is_initialized`](Self::is_initialized) afterwards.
    pub fn initialize(&mut self) -> AleResult<()> {
        if self.initialized {
            return Ok(());
        }

        if !self.config.enabled {
            tracing::info!("ALE is disabled in configuration");
            return Ok(());
        }

        self.events.initialize();
        self.initialize_core()?;
        self.load_scripts();

        self.initialized = true;
        tracing::info!("ALE initialized");
        Ok(())
    }

    /// Stop the engine, dropping every handler, timed event and state
    ///
    /// Safe to call when not initialized.
    pub fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        self.events.shutdown();
        self.states.shutdown();
        self.initialized = false;
        tracing::info!("ALE shut down");
    }

    /// Tear down every state and load scripts again
    pub fn reload(&mut self) -> AleResult<()> {
        if !self.initialized {
            tracing::error!("ALE not initialized");
            return Err(AleError::NotInitialized);
        }

        tracing::info!("Reloading ALE...");
        self.states.for_each_state(|id, state| {
            tracing::debug!(
                "Dropping state {} after {:?} ({} chunks run, {} timed events)",
                id,
                state.uptime(),
                state.execution_count(),
                state.timed_events().active_event_count()
            );
        });
        self.events.cancel_all_events();
        self.states.shutdown();

        if let Err(e) = self.initialize_core() {
            self.initialized = false;
            return Err(e);
        }
        self.load_scripts();
        Ok(())
    }

    /// Re-read the configuration file, if one was given
    ///
    /// Module search paths apply to states created after the reload.
    pub fn reload_config(&mut self) -> AleResult<()> {
        if let Some(path) = &self.config_path {
            self.config.reload_from(path)?;
            self.states.set_search_paths(self.config.search_paths());
            tracing::info!("Reloaded ALE config");
        }
        Ok(())
    }

    fn initialize_core(&mut self) -> AleResult<()> {
        if let Err(e) = self.states.initialize() {
            tracing::error!("Failed to initialize StateManager: {}", e);
            self.states.shutdown();
            return Err(e);
        }
        Ok(())
    }

    /// Run every `.lua` file under the configured script path in the master state
    ///
    /// Files run in path order. A failing script is logged and skipped.
    ///
    /// # Returns
    /// Number of scripts that loaded without error
    pub fn load_scripts(&self) -> usize {
        let root = Path::new(&self.config.script_path);
        let mut files = Vec::new();
        collect_scripts(root, &mut files);
        files.sort();

        let Some(master) = self.states.master_state() else {
            tracing::error!("Cannot load scripts: no master state");
            return 0;
        };

        let mut loaded = 0;
        for file in &files {
            let name = file.display().to_string();
            let result = std::fs::read_to_string(file)
                .map_err(|e| e.to_string())
                .and_then(|source| master.execute(&source, &name).map_err(|e| e.to_string()));
            match result {
                Ok(()) => loaded += 1,
                Err(e) => tracing::error!("Failed to load script {}: {}", name, e),
            }
        }

        tracing::info!("Loaded {} of {} scripts from {:?}", loaded, files.len(), root);
        loaded
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &AleConfig {
        &self.config
    }

    pub fn events(&self) -> &Rc<EventManager> {
        &self.events
    }

    pub fn states(&self) -> &StateManager {
        &self.states
    }

    pub fn states_mut(&mut self) -> &mut StateManager {
        &mut self.states
    }

    pub fn master_state(&self) -> Option<&ScriptState> {
        self.states.master_state()
    }

    /// Timed events of the master state
    pub fn master_timed_events(&self) -> Option<&Rc<TimedEventManager>> {
        self.states.timed_event_manager(MASTER_STATE_ID)
    }
}

impl Drop for AleManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn collect_scripts(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot read script directory {:?}: {}", dir, e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_scripts(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "lua") {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ale_sdk::PlayerEvent;

    fn config_with_scripts(dir: &Path) -> AleConfig {
        AleConfig {
            script_path: dir.display().to_string(),
            ..AleConfig::default()
        }
    }

    #[test]
    fn test_disabled_engine_stays_uninitialized() {
        let mut ale = AleManager::new(AleConfig {
            enabled: false,
            ..AleConfig::default()
        });
        ale.initialize().unwrap();
        assert!(!ale.is_enabled());
        assert!(!ale.is_initialized());
        assert!(ale.master_state().is_none());
    }

    #[test]
    fn test_initialize_loads_scripts_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.lua"), "order = 'a'").unwrap();
        std::fs::write(dir.path().join("sub").join("b.lua"), "order = order .. 'b'").unwrap();
        std::fs::write(dir.path().join("broken.lua"), "this is not lua").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut ale = AleManager::new(config_with_scripts(dir.path()));
        ale.initialize().unwrap();
        assert!(ale.is_initialized());

        let order: String = ale.master_state().unwrap().lua().globals().get("order").unwrap();
        assert_eq!(order, "ab");
        assert_eq!(ale.load_scripts(), 2);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut ale = AleManager::new(config_with_scripts(dir.path()));
        ale.shutdown();

        ale.initialize().unwrap();
        ale.shutdown();
        ale.shutdown();
        assert!(!ale.is_initialized());
        assert_eq!(ale.states().state_count(), 0);
    }

    #[test]
    fn test_reload_requires_initialize() {
        let mut ale = AleManager::new(AleConfig::default());
        assert!(matches!(ale.reload(), Err(AleError::NotInitialized)));
    }

    #[test]
    fn test_reload_replaces_handlers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("login.lua"),
            "RegisterPlayerEvent(3, function() end)",
        )
        .unwrap();

        let mut ale = AleManager::new(config_with_scripts(dir.path()));
        ale.initialize().unwrap();
        assert_eq!(ale.events().global_handler_count(PlayerEvent::OnLogin), 1);

        ale.reload().unwrap();
        assert!(ale.is_initialized());
        assert_eq!(ale.events().global_handler_count(PlayerEvent::OnLogin), 1);
        assert_eq!(ale.states().state_count(), 1);
    }

    #[test]
    fn test_reload_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ale.toml");
        AleConfig::default().save_to(&path).unwrap();

        let mut ale = AleManager::new(AleConfig::default()).with_config_path(&path);
        AleConfig {
            debug: true,
            ..AleConfig::default()
        }
        .save_to(&path)
        .unwrap();

        ale.reload_config().unwrap();
        assert!(ale.config().debug);
    }
}
