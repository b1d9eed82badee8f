mod geometry;
mod projection;
mod renderer;
mod spatial;

pub use geometry::{point_in_rings, Bounds, Ring};
pub use projection::Viewport;
pub use renderer::{DisplaySettings, MapLayers, MapRenderer, RegionShape};
pub use spatial::RegionGrid;
