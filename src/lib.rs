//! # settings-vault
//!
//! Application wiring for the settings store: configuration, logging, the
//! settings context, and the demo settings types used by the console binary.

pub mod bootstrap;
pub mod demo;

pub use bootstrap::{bootstrap, AppPaths, SettingsContext};
