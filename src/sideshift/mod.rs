//! SideShift Status Provider
//!
//! Implements the external swap provider boundary over the SideShift v2
//! REST API:
//! - Shift (order) status lookup
//! - Optional private-account headers loaded from config or environment
//! - Typed response payloads with the raw JSON preserved for display

pub mod rest;
pub mod types;

pub use rest::*;
pub use types::*;
