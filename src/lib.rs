//! Mouse-driven window moving, resizing and edge snapping for Windows
//!
//! `domain` holds the pure positioning logic, `app` drives it from gesture
//! events, `platform` defines the OS seams and their Win32 adapters.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod ui;
