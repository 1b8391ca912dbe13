//! C ABI surface called by the world server

mod exports;

use std::cell::RefCell;

use ale_core::AleManager;

pub use exports::*;

thread_local! {
    /// Engine owned by the world thread between `ale_load` and `ale_unload`
    static ENGINE: RefCell<Option<AleManager>> = const { RefCell::new(None) };
}

/// Run `f` against the loaded engine
///
/// # Returns
/// `None` if the engine is not loaded, or is busy with a reload on this thread
pub(crate) fn with_engine<R>(f: impl FnOnce(&AleManager) -> R) -> Option<R> {
    ENGINE.with(|slot| {
        let engine = slot.try_borrow().ok()?;
        engine.as_ref().map(f)
    })
}

/// Run `f` with exclusive access to the engine slot
pub(crate) fn with_engine_mut<R>(f: impl FnOnce(&mut Option<AleManager>) -> R) -> Option<R> {
    ENGINE.with(|slot| {
        let mut engine = slot.try_borrow_mut().ok()?;
        Some(f(&mut engine))
    })
}
