//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod mileage;
pub mod settings;
pub mod vehicles;

// Re-export all handlers for use in router
pub use mileage::*;
pub use settings::*;
pub use vehicles::*;
