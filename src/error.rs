//! Error types for region registration and data loading

use thiserror::Error;

/// Errors raised while building the choropleth from region data
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChoroplethError {
    /// A region's name has no row in the population table
    #[error("region `{id}` is named `{name}`, which has no entry in the population table")]
    UnknownRegionName { id: String, name: String },

    /// Two regions were registered under the same id
    #[error("duplicate region id `{0}`")]
    DuplicateRegionId(String),

    /// A GeoJSON feature lacks an id or name
    #[error("feature #{feature} has no `{property}` property")]
    MissingProperty { feature: usize, property: String },
}
