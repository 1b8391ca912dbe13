//! ALE Plugin - FFI Layer
//!
//! This crate provides the FFI boundary between the world server and the
//! Rust core logic. It compiles to a cdylib (.so/.dll).
//!
//! The engine lives in a thread-local slot on the thread that called
//! `ale_load`; every other export must be called from that same thread.

pub mod ffi;
pub mod logging;
