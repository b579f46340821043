//! Clean-energy charging planner for the GB electricity grid.
//!
//! Summarizes the generation mix per day and finds the cleanest window to
//! charge an electric vehicle, from the Carbon Intensity generation feed.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
/// Fuel types and the clean/non-clean partition.
pub mod fuel;
pub mod horizon;
pub mod mix;
pub mod model;
pub mod service;
pub mod source;
pub mod timestamp;
pub mod window;
