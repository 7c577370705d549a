//! Geographic features
//!
//! Only polygon and multi-polygon geometries are kept; everything else in a
//! GeoJSON collection is dropped at parse time.

pub mod contains;
pub mod project;
pub mod simplify;

use glam::DVec2;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::MapError;

pub use contains::point_in_feature;
pub use project::{ProjectedFeature, Viewport, project};
pub use simplify::simplify_features;

/// Closed ring of positions
pub type Ring = Vec<DVec2>;

/// Outer ring followed by holes
pub type Polygon = Vec<Ring>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
}

/// A named polygon or multi-polygon
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub kind: GeometryKind,
    pub polygons: Vec<Polygon>,
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn polygon(rings: Vec<Ring>) -> Self {
        Self {
            kind: GeometryKind::Polygon,
            polygons: vec![rings],
            properties: Map::new(),
        }
    }

    pub fn multi_polygon(polygons: Vec<Polygon>) -> Self {
        Self {
            kind: GeometryKind::MultiPolygon,
            polygons,
            properties: Map::new(),
        }
    }

    /// Same feature with a `name`-like property set
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Display name from `property`, empty when missing
    pub fn name(&self, property: &str) -> String {
        match self.properties.get(property) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }

    pub fn coords(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.rings().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rings().all(|r| r.is_empty())
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::of(self.coords())
    }

    /// Apply `f` to every position. Rings and polygons left empty are
    /// dropped; `None` when nothing remains.
    pub fn map_rings<F>(&self, mut f: F) -> Option<Feature>
    where
        F: FnMut(&Ring) -> Ring,
    {
        let polygons: Vec<Polygon> = self
            .polygons
            .iter()
            .map(|polygon| {
                polygon
                    .iter()
                    .map(&mut f)
                    .filter(|ring| !ring.is_empty())
                    .collect::<Polygon>()
            })
            .filter(|polygon| !polygon.is_empty())
            .collect();
        if polygons.is_empty() {
            return None;
        }
        Some(Feature {
            kind: self.kind,
            polygons,
            properties: self.properties.clone(),
        })
    }

    pub fn map_coords<F>(&self, mut f: F) -> Option<Feature>
    where
        F: FnMut(DVec2) -> DVec2,
    {
        self.map_rings(|ring| ring.iter().map(|&c| f(c)).collect())
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BBox {
    /// Bounding box of a point set, `None` when empty
    pub fn of(points: impl IntoIterator<Item = DVec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict interior test
    pub fn contains_strict(&self, p: DVec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// Parsed collection of polygon features
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Parse a GeoJSON `FeatureCollection`
    pub fn from_geojson(json: &str) -> Result<Self, MapError> {
        let raw: RawCollection = serde_json::from_str(json).map_err(MapError::InvalidGeoJson)?;
        let total = raw.features.len();
        let features: Vec<Feature> = raw
            .features
            .into_iter()
            .filter_map(RawFeature::into_feature)
            .collect();
        log::info!("Parsed {} polygon features ({} in collection)", features.len(), total);
        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Other,
}

impl RawFeature {
    fn into_feature(self) -> Option<Feature> {
        let (kind, polygons) = match self.geometry? {
            RawGeometry::Polygon { coordinates } => {
                (GeometryKind::Polygon, vec![raw_polygon(coordinates)])
            }
            RawGeometry::MultiPolygon { coordinates } => (
                GeometryKind::MultiPolygon,
                coordinates.into_iter().map(raw_polygon).collect(),
            ),
            RawGeometry::Other => return None,
        };
        let feature = Feature {
            kind,
            polygons,
            properties: self.properties.unwrap_or_default(),
        };
        // drops positions-free rings and polygons
        feature.map_rings(Ring::clone)
    }
}

fn raw_polygon(rings: Vec<Vec<Vec<f64>>>) -> Polygon {
    rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .filter_map(|p| match p.as_slice() {
                    [x, y, ..] => Some(DVec2::new(*x, *y)),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Axis-aligned square ring
    pub(crate) fn square(x: f64, y: f64, side: f64) -> Ring {
        vec![
            DVec2::new(x, y),
            DVec2::new(x + side, y),
            DVec2::new(x + side, y + side),
            DVec2::new(x, y + side),
            DVec2::new(x, y),
        ]
    }

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "Alpha" },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1,5],[0,1],[0,0]]] } },
            { "type": "Feature", "properties": { "name": "Point" },
              "geometry": { "type": "Point", "coordinates": [3, 3] } },
            { "type": "Feature", "properties": null, "geometry": null },
            { "type": "Feature", "properties": { "name": 42 },
              "geometry": { "type": "MultiPolygon", "coordinates": [
                  [[[2,2],[3,2],[3,3],[2,2]]],
                  [[[4,4],[5,4],[5,5],[4,4]]]
              ] } }
        ]
    }"#;

    #[test]
    fn test_parse_keeps_polygons_only() {
        let fc = FeatureCollection::from_geojson(SAMPLE).unwrap();
        assert_eq!(fc.len(), 2);
        assert_eq!(fc.features[0].kind, GeometryKind::Polygon);
        assert_eq!(fc.features[0].name("name"), "Alpha");
        // third ordinate ignored
        assert_eq!(fc.features[0].polygons[0][0][2], DVec2::new(1.0, 1.0));
        assert_eq!(fc.features[1].kind, GeometryKind::MultiPolygon);
        assert_eq!(fc.features[1].polygons.len(), 2);
        assert_eq!(fc.features[1].name("name"), "42");
        assert_eq!(fc.features[1].name("missing"), "");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            FeatureCollection::from_geojson("{"),
            Err(MapError::InvalidGeoJson(_))
        ));
    }

    #[test]
    fn test_bbox_and_map_rings() {
        let f = Feature::polygon(vec![square(1.0, 2.0, 3.0)]);
        let b = f.bbox().unwrap();
        assert_eq!(b.min, DVec2::new(1.0, 2.0));
        assert_eq!(b.max, DVec2::new(4.0, 5.0));
        assert_eq!(b.center(), DVec2::new(2.5, 3.5));
        assert!(b.contains_strict(DVec2::new(2.0, 3.0)));
        assert!(!b.contains_strict(DVec2::new(1.0, 3.0)));

        assert!(f.map_rings(|_| Vec::new()).is_none());
        assert!(BBox::of(std::iter::empty()).is_none());
    }
}
