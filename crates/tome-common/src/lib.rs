//! Shared infrastructure for the Tome reference browser.
//!
//! - `logging` - tracing subscriber initialisation
//! - `settings` - TOML user settings

mod error;
pub mod logging;
pub mod settings;

pub use error::{CommonError, Result};
pub use logging::{LogConfig, LogFormat, init_logging};
pub use settings::{BookmarkSettings, LoggingSettings, NavigationSettings, SearchSettings, Settings};
