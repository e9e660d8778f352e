//! Configuration system for Terminon.
//!
//! Provides compile-time constants, TOML config file support, the
//! key-value persistence service, and session profiles.

pub mod constants;
pub mod file;
pub mod profile;
pub mod store;

pub use file::{
    config_path, ensure_config_file, load_config, load_config_from, Config, KeybindingEntry,
};
pub use profile::{
    default_local_profiles, resolve, Invocation, LocalProfile, Profile, ProfileFormError,
    RemoteProfile, RemoteProfileForm,
};
pub use store::{get_typed, JsonFileStore, MemoryStore, Store};
