//! Configuration management.
//!
//! # Data Flow
//! ```text
//! config file (TOML) or in-code literal
//!     → loader.rs (parse & deserialize)
//!     → PrettifyConfig (immutable)
//!     → shared via Arc with every installed interceptor
//! ```
//!
//! # Design Decisions
//! - Config is immutable once installed; all fields have defaults
//! - The query trigger carries its own `enabled` flag so a TOML file can
//!   switch it off without a null-like value

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{FormatMode, FormatOptions, FormatOverride, PrettifyConfig, QueryTrigger};
