//! Terminal choropleth of administrative regions.
//!
//! Click a region to cycle its treatment center count, or switch to a
//! read-only population view. Fills are painted as cell backgrounds and
//! outlines as braille dots.

pub mod app;
pub mod braille;
pub mod choropleth;
pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod ui;

pub use app::App;
pub use error::ChoroplethError;
