//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, load_config)
//! - `mileage` - Mileage log commands (list, add, edit, delete, summary, export)
//! - `serve` - Web server command
//! - `settings` - Settings commands (show, style)
//! - `vehicles` - Vehicle management commands

pub mod core;
pub mod mileage;
pub mod serve;
pub mod settings;
pub mod vehicles;

// Re-export command functions for main.rs
pub use core::*;
pub use mileage::*;
pub use serve::*;
pub use settings::*;
pub use vehicles::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
