use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::feature::Id;
use geojson::{Feature, GeoJson, Geometry, Value};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::choropleth::RegionDescriptor;
use crate::error::ChoroplethError;
use crate::map::{Ring, RegionShape};

/// A region's identity together with its outline
#[derive(Clone, Debug)]
pub struct RegionFeature {
    pub descriptor: RegionDescriptor,
    pub shape: RegionShape,
}

/// Which GeoJSON properties hold the region id and display name
#[derive(Clone, Debug)]
pub struct PropertyNames {
    pub id: String,
    pub name: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            name: "name".to_string(),
        }
    }
}

/// Name properties tried after the configured one
const NAME_FALLBACKS: [&str; 2] = ["NAME_2", "NAME_1"];

/// Load region polygons from a GeoJSON file
pub fn load_regions(path: &Path, props: &PropertyNames) -> Result<Vec<RegionFeature>> {
    let mut bytes =
        fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let regions = parse_regions(&mut bytes, props)
        .with_context(|| format!("loading regions from {}", path.display()))?;
    info!(path = %path.display(), regions = regions.len(), "loaded regions");
    Ok(regions)
}

/// Parse GeoJSON bytes in place. Features without polygon geometry are
/// skipped; features without an id or name are an error.
pub fn parse_regions(bytes: &mut [u8], props: &PropertyNames) -> Result<Vec<RegionFeature>> {
    let geojson: GeoJson = simd_json::serde::from_slice(bytes)?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(_) => Vec::new(),
    };

    let mut regions = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let rings = match feature.geometry.as_ref() {
            Some(geometry) => polygon_rings(geometry),
            None => Vec::new(),
        };
        if rings.is_empty() {
            warn!(feature = idx, "skipping feature without polygon geometry");
            continue;
        }

        let id = feature_id(feature, &props.id).ok_or_else(|| ChoroplethError::MissingProperty {
            feature: idx,
            property: props.id.clone(),
        })?;
        let name = feature_name(feature, &props.name).ok_or_else(|| {
            ChoroplethError::MissingProperty {
                feature: idx,
                property: props.name.clone(),
            }
        })?;

        regions.push(RegionFeature {
            descriptor: RegionDescriptor { id, name },
            shape: RegionShape::new(rings),
        });
    }

    Ok(regions)
}

fn property<'a>(feature: &'a Feature, key: &str) -> Option<&'a JsonValue> {
    feature.properties.as_ref().and_then(|p| p.get(key))
}

/// Strings as-is, numbers in their JSON form
fn scalar_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Configured id property, else the feature's own `id`
fn feature_id(feature: &Feature, key: &str) -> Option<String> {
    property(feature, key)
        .and_then(scalar_to_string)
        .or_else(|| match feature.id.as_ref()? {
            Id::String(s) => Some(s.clone()),
            Id::Number(n) => Some(n.to_string()),
        })
}

fn feature_name(feature: &Feature, key: &str) -> Option<String> {
    std::iter::once(key)
        .chain(NAME_FALLBACKS)
        .find_map(|k| property(feature, k).and_then(scalar_to_string))
}

/// Every ring of every polygon, outer and inner alike
fn polygon_rings(geometry: &Geometry) -> Vec<Ring> {
    let to_ring = |coords: &Vec<Vec<f64>>| -> Ring {
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| (c[0], c[1]))
            .collect()
    };

    match &geometry.value {
        Value::Polygon(rings) => rings.iter().map(to_ring).collect(),
        Value::MultiPolygon(polygons) => polygons.iter().flatten().map(to_ring).collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(polygon_rings).collect()
        }
        _ => Vec::new(),
    }
}

/// Tile-grid cartogram of the 34 prefectures: (name, column, row), laid out
/// roughly by geography with the coast on the left.
const TILE_GRID: [(&str, u8, u8); 34] = [
    ("Koundara", 1, 0),
    ("Mali", 2, 0),
    ("Koubia", 3, 0),
    ("Tougue", 4, 0),
    ("Dinguiraye", 5, 0),
    ("Siguiri", 6, 0),
    ("Mandiana", 7, 0),
    ("Boke", 0, 1),
    ("Gaoual", 1, 1),
    ("Lelouma", 2, 1),
    ("Labe", 3, 1),
    ("Pita", 4, 1),
    ("Dabola", 5, 1),
    ("Kankan", 6, 1),
    ("Boffa", 0, 2),
    ("Telimele", 1, 2),
    ("Fria", 2, 2),
    ("Dalaba", 3, 2),
    ("Mamou", 4, 2),
    ("Kouroussa", 5, 2),
    ("Kerouane", 6, 2),
    ("Dubreka", 0, 3),
    ("Kindia", 1, 3),
    ("Coyah", 2, 3),
    ("Faranah", 3, 3),
    ("Kissidougou", 4, 3),
    ("Beyla", 5, 3),
    ("Conakry", 0, 4),
    ("Forecariah", 1, 4),
    ("Gueckedou", 3, 4),
    ("Macenta", 4, 4),
    ("Lola", 5, 4),
    ("Yomou", 4, 5),
    ("Nzerekore", 5, 5),
];

/// Degrees per tile, and the gap left between neighbours
const TILE_SIZE: f64 = 1.0;
const TILE_GAP: f64 = 0.08;
/// North-west corner of the grid
const GRID_ORIGIN: (f64, f64) = (-15.0, 12.6);

/// Built-in regions used when no GeoJSON file is given
pub fn generate_tile_grid() -> Vec<RegionFeature> {
    TILE_GRID
        .iter()
        .map(|&(name, col, row)| {
            let west = GRID_ORIGIN.0 + col as f64 * TILE_SIZE;
            let north = GRID_ORIGIN.1 - row as f64 * TILE_SIZE;
            let east = west + TILE_SIZE - TILE_GAP;
            let south = north - TILE_SIZE + TILE_GAP;
            let ring = vec![
                (west, north),
                (east, north),
                (east, south),
                (west, south),
                (west, north),
            ];
            RegionFeature {
                descriptor: RegionDescriptor::new(format!("gn-{}", name.to_lowercase()), name),
                shape: RegionShape::new(vec![ring]),
            }
        })
        .collect()
}
