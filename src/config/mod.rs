//! Configuration for tactile-snap
//!
//! Settings come from a TOML file in the user's config directory. This module
//! turns them into the plain values the positioning core reads each tick.

pub mod settings;
pub mod split;

pub use settings::{ConfigError, Settings};
pub use split::StaticSplitStore;
