//! Features: interpreted geometry tagged with its source entity.

use crate::{Geometry, OsmGeoKey, Tags};

/// A geometry paired with the attributes of the entity it came from.
///
/// `attributes` always holds the tags of exactly one source entity. For
/// multipolygons that is the relation, never its member ways.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::{Feature, Geometry, OsmGeoKey, Tags};
///
/// let feature = Feature::new(
///     OsmGeoKey::node(1),
///     Geometry::point(Coord { x: 0.0, y: 0.0 }),
///     Tags::from([("amenity", "bench")]),
/// );
/// assert!(feature.attributes.contains_key_value("amenity", "bench"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    /// Key of the entity the feature was derived from.
    pub source: OsmGeoKey,
    /// Interpreted geometry.
    pub geometry: Geometry,
    /// Tags copied from the originating entity.
    pub attributes: Tags,
}

impl Feature {
    /// Construct a feature.
    #[must_use]
    pub const fn new(source: OsmGeoKey, geometry: Geometry, attributes: Tags) -> Self {
        Self {
            source,
            geometry,
            attributes,
        }
    }
}
