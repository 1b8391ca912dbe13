//! C-compatible exports called by the world server

use std::ffi::{c_char, CStr};

use tracing::instrument;

use ale_core::config::{ale_config_path, AleConfig};
use ale_core::entities::{CreatureRef, GameObjectRef, PlayerRef, WorldObject};
use ale_core::hooks::{CreatureHooks, PlayerHooks, WorldHooks, WorldObjectHooks};
use ale_core::AleManager;
use ale_sdk::ObjectGuid;

use super::{with_engine, with_engine_mut};
use crate::logging;

static NAME: &[u8] = b"ALE\0";
static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();

/// Called once the world is up
///
/// Loads `configs/modules/ale.toml`, installs logging and starts the engine.
///
/// # Safety
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn ale_load(error: *mut c_char, maxlen: usize) -> bool {
    let config_path = ale_config_path().ok();
    let loaded = match config_path.as_ref() {
        Some(path) => AleConfig::load_from(path).map_err(|e| e.to_string()),
        None => Err("could not resolve config directory".to_string()),
    };
    let config = loaded.as_ref().cloned().unwrap_or_default();

    logging::init(config.debug);
    tracing::info!("ALE loading...");
    if let Err(e) = &loaded {
        tracing::warn!("Using default config: {}", e);
    }

    let mut ale = AleManager::new(config);
    if let Some(path) = config_path {
        ale = ale.with_config_path(path);
    }

    if let Err(e) = ale.initialize() {
        tracing::error!("Failed to initialize ALE: {}", e);
        write_error(error, maxlen, &format!("Initialize error: {}", e));
        return false;
    }

    let installed = with_engine_mut(|slot| {
        if let Some(mut old) = slot.replace(ale) {
            tracing::warn!("ALE was already loaded; replacing");
            old.shutdown();
        }
    });
    if installed.is_none() {
        write_error(error, maxlen, "Engine busy");
        return false;
    }

    tracing::info!("ALE loaded");
    true
}

/// Called when the world shuts down
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn ale_unload() -> bool {
    tracing::info!("ALE unloading...");

    with_engine_mut(|slot| {
        if let Some(mut ale) = slot.take() {
            ale.shutdown();
        }
    })
    .is_some()
}

/// Reload every script
///
/// # Safety
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn ale_reload(error: *mut c_char, maxlen: usize) -> bool {
    let result = with_engine_mut(|slot| match slot.as_mut() {
        Some(ale) => ale.reload().map_err(|e| e.to_string()),
        None => Err("ALE not loaded".to_string()),
    })
    .unwrap_or_else(|| Err("Engine busy".to_string()));

    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Reload failed: {}", e);
            write_error(error, maxlen, &e);
            false
        }
    }
}

/// Re-read the config file
#[no_mangle]
pub extern "C" fn ale_reload_config() -> bool {
    let result = with_engine_mut(|slot| slot.as_mut().map(AleManager::reload_config));
    match result.flatten() {
        Some(Ok(())) => true,
        Some(Err(e)) => {
            tracing::error!("Config reload failed: {}", e);
            false
        }
        None => false,
    }
}

#[no_mangle]
pub extern "C" fn ale_get_name() -> *const c_char {
    NAME.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn ale_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

// === World ===

#[no_mangle]
pub extern "C" fn ale_on_world_startup() {
    with_engine(|ale| WorldHooks::new(ale).on_startup());
}

#[no_mangle]
pub extern "C" fn ale_on_world_shutdown() {
    with_engine(|ale| WorldHooks::new(ale).on_shutdown());
}

#[no_mangle]
pub extern "C" fn ale_on_world_shutdown_init(code: u32, mask: u32) {
    with_engine(|ale| WorldHooks::new(ale).on_shutdown_init(code, mask));
}

#[no_mangle]
pub extern "C" fn ale_on_world_shutdown_cancel() {
    with_engine(|ale| WorldHooks::new(ale).on_shutdown_cancel());
}

#[no_mangle]
pub extern "C" fn ale_on_config_load(reload: bool) {
    with_engine(|ale| WorldHooks::new(ale).on_config_load(reload));
}

/// Called every world tick with the elapsed milliseconds
#[no_mangle]
pub extern "C" fn ale_on_world_update(diff: u32) {
    with_engine(|ale| WorldHooks::new(ale).on_update(diff));
}

// === Players ===

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_player_login(guid: u64, name: *const c_char, map_id: u32) {
    let player = player_ref(guid, name, map_id);
    with_engine(|ale| PlayerHooks::new(ale).on_login(&player));
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_player_first_login(guid: u64, name: *const c_char, map_id: u32) {
    let player = player_ref(guid, name, map_id);
    with_engine(|ale| PlayerHooks::new(ale).on_first_login(&player));
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_player_logout(guid: u64, name: *const c_char, map_id: u32) {
    let player = player_ref(guid, name, map_id);
    with_engine(|ale| PlayerHooks::new(ale).on_logout(&player));
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_player_level_change(
    guid: u64,
    name: *const c_char,
    map_id: u32,
    old_level: u8,
) {
    let player = player_ref(guid, name, map_id);
    with_engine(|ale| PlayerHooks::new(ale).on_level_change(&player, old_level));
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
///
/// # Returns
/// The money change to apply
#[no_mangle]
pub unsafe extern "C" fn ale_on_player_money_change(
    guid: u64,
    name: *const c_char,
    map_id: u32,
    amount: i32,
) -> i32 {
    let player = player_ref(guid, name, map_id);
    with_engine(|ale| PlayerHooks::new(ale).on_money_change(&player, amount)).unwrap_or(amount)
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
///
/// # Returns
/// The XP to grant
#[no_mangle]
pub unsafe extern "C" fn ale_on_player_give_xp(
    guid: u64,
    name: *const c_char,
    map_id: u32,
    amount: u32,
    xp_source: u8,
) -> u32 {
    let player = player_ref(guid, name, map_id);
    with_engine(|ale| PlayerHooks::new(ale).on_give_xp(&player, amount, None, xp_source))
        .unwrap_or(amount)
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_player_update(
    guid: u64,
    name: *const c_char,
    map_id: u32,
    diff: u32,
) {
    let player = player_ref(guid, name, map_id);
    with_engine(|ale| PlayerHooks::new(ale).on_update(&player, diff));
}

// === World objects ===

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_object_create(guid: u64, name: *const c_char, map_id: u32) {
    if let Some(object) = world_object(guid, name, map_id) {
        with_engine(|ale| WorldObjectHooks::new(ale).on_create(&object));
    }
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_object_destroy(guid: u64, name: *const c_char, map_id: u32) {
    if let Some(object) = world_object(guid, name, map_id) {
        with_engine(|ale| WorldObjectHooks::new(ale).on_destroy(&object));
    }
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_object_update(
    guid: u64,
    name: *const c_char,
    map_id: u32,
    diff: u32,
) {
    if let Some(object) = world_object(guid, name, map_id) {
        with_engine(|ale| WorldObjectHooks::new(ale).on_update(&object, diff));
    }
}

// === Creatures ===

/// # Safety
/// - `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn ale_on_creature_death(
    guid: u64,
    name: *const c_char,
    map_id: u32,
    killer_guid: u64,
) {
    let creature = CreatureRef::new(ObjectGuid::from_raw(guid), c_string(name)).with_map(map_id);
    let killer = world_object(killer_guid, std::ptr::null(), map_id);
    with_engine(|ale| CreatureHooks::new(ale).on_death(&creature, killer));
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
///
/// # Returns
/// The damage to apply
#[no_mangle]
pub unsafe extern "C" fn ale_on_creature_damage(
    guid: u64,
    name: *const c_char,
    map_id: u32,
    target_guid: u64,
    damage: u32,
) -> u32 {
    let creature = CreatureRef::new(ObjectGuid::from_raw(guid), c_string(name)).with_map(map_id);
    let Some(target) = world_object(target_guid, std::ptr::null(), map_id) else {
        return damage;
    };
    with_engine(|ale| CreatureHooks::new(ale).on_damage(&creature, &target, damage))
        .unwrap_or(damage)
}

/// Copy a C string, empty when null
///
/// # Safety
/// - `ptr` must be a valid null-terminated C string or null
unsafe fn c_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

/// # Safety
/// - `name` must be a valid null-terminated C string or null
unsafe fn player_ref(guid: u64, name: *const c_char, map_id: u32) -> PlayerRef {
    PlayerRef::new(ObjectGuid::from_raw(guid), c_string(name)).with_map(map_id)
}

/// Build a handle of the kind the guid's high type names
///
/// # Safety
/// - `name` must be a valid null-terminated C string or null
unsafe fn world_object(guid: u64, name: *const c_char, map_id: u32) -> Option<WorldObject> {
    let guid = ObjectGuid::from_raw(guid);
    let name = c_string(name);

    if guid.is_player() {
        Some(PlayerRef::new(guid, name).with_map(map_id).into())
    } else if guid.is_creature() {
        Some(CreatureRef::new(guid, name).with_map(map_id).into())
    } else if guid.is_game_object() {
        Some(GameObjectRef::new(guid, name).with_map(map_id).into())
    } else {
        tracing::debug!("Ignoring object with unsupported guid {}", guid);
        None
    }
}

/// Helper to write an error message to a C buffer
///
/// # Safety
/// - `error` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}
