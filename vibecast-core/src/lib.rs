//! Core library for the `vibecast` CLI.
//!
//! This crate defines:
//! - Weather lookup over Open-Meteo behind a provider trait
//! - The advice engine and the satirical headline generator
//! - The shell state machine with its headline ticker
//! - Themes, persisted preferences and configuration
//!
//! It is used by `vibecast-cli`, but can also drive other front ends.

pub mod advice;
pub mod config;
pub mod model;
pub mod news;
pub mod preferences;
pub mod provider;
pub mod shell;
pub mod theme;

pub use advice::advise;
pub use config::Config;
pub use model::{AdviceResult, Condition, WeatherReading};
pub use news::headline;
pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use provider::{LookupFailed, WeatherProvider, lookup};
pub use shell::{Phase, Shell, ShellOptions, UiState};
pub use theme::Theme;
