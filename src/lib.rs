//! Time-window toolbar for browsing a log stream.
//!
//! The selected window lives in the log view's query string; see
//! [`toolbar::LogToolbar`] for how the selector, the custom range pickers and
//! that query string are kept in sync.

pub mod config;
pub mod error;
pub mod toolbar;

pub use config::{AppConfig, ToolbarConfig};
pub use error::ToolbarError;
pub use toolbar::LogToolbar;
pub use toolbar::query::{MemoryQueryStore, NavigationQuery, QueryState, QueryStore};
pub use toolbar::range::{RangePreset, RangeSelection};
