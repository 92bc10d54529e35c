//! SwapWatch Library
//!
//! Background status monitor for asynchronous cross-chain swap orders

pub mod backoff;
pub mod config;
pub mod monitor;
pub mod notify;
pub mod persistence;
pub mod registry;
pub mod sideshift;
pub mod types;
