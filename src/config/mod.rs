// src/config/mod.rs

//! Settings loading and validation for studyplan.
//!
//! Responsibilities:
//! - Define the TOML-backed settings model (`model.rs`).
//! - Load the optional settings file (`loader.rs`).
//! - Validate value ranges (`validate.rs`).
//!
//! The learning plan itself is JSON and lives in [`crate::plan`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_settings_path, load_and_validate, load_from_path};
pub use model::{RawSettingsFile, Settings, SettingsSection};
