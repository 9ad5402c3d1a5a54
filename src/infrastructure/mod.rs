//! Infrastructure layer.
//!
//! Concrete adapters for the domain ports: SQLite and in-memory key-value
//! stores, TOML configuration, and the terminal theme signal.

pub mod config;
pub mod memory_store;
pub mod sqlite_store;
pub mod system_theme;

pub use config::{ensure_config_exists, load_config, AppConfig};
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;
pub use system_theme::TerminalThemeSignal;
