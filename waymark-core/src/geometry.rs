//! Output geometries.
//!
//! A single tagged enum covers the four shapes the interpreter produces. The
//! constrained kinds (line strings and rings) can only be built through
//! constructors that check their invariants, so a [`LinearRing`] in hand is
//! always closed and has at least four coordinates.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`.

use geo::{Area, Coord, LineString};
use thiserror::Error;

/// Minimum coordinate count of a ring: a triangle plus the repeated start.
pub const MIN_RING_COORDS: usize = 4;

/// Minimum coordinate count of a line string.
pub const MIN_LINE_COORDS: usize = 2;

/// Errors returned when a geometry constructor rejects its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A line string needs at least two coordinates.
    #[error("line string has {count} coordinates; at least 2 are required")]
    TooFewLineCoords {
        /// Number of coordinates supplied.
        count: usize,
    },
    /// A ring needs at least four coordinates.
    #[error("ring has {count} coordinates; at least 4 are required")]
    TooFewRingCoords {
        /// Number of coordinates supplied.
        count: usize,
    },
    /// The first and last ring coordinates differ.
    #[error("ring is not closed")]
    RingNotClosed,
}

/// A closed sequence of coordinates.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::LinearRing;
///
/// # fn main() -> Result<(), waymark_core::GeometryError> {
/// let ring = LinearRing::new(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 0.0 },
///     Coord { x: 0.0, y: 1.0 },
///     Coord { x: 0.0, y: 0.0 },
/// ])?;
/// assert_eq!(ring.len(), 4);
/// assert!((ring.unsigned_area() - 0.5).abs() < 1e-12);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Coord<f64>>", into = "Vec<Coord<f64>>")
)]
pub struct LinearRing(LineString<f64>);

impl LinearRing {
    /// Validate and construct a ring.
    ///
    /// # Errors
    /// Returns [`GeometryError::TooFewRingCoords`] below four coordinates and
    /// [`GeometryError::RingNotClosed`] when the last coordinate differs from
    /// the first.
    pub fn new(coords: Vec<Coord<f64>>) -> Result<Self, GeometryError> {
        if coords.len() < MIN_RING_COORDS {
            return Err(GeometryError::TooFewRingCoords {
                count: coords.len(),
            });
        }
        let line = LineString::new(coords);
        if !line.is_closed() {
            return Err(GeometryError::RingNotClosed);
        }
        Ok(Self(line))
    }

    /// Ring coordinates, first equal to last.
    #[must_use]
    pub fn coords(&self) -> &[Coord<f64>] {
        &self.0.0
    }

    /// Number of coordinates, including the repeated closing vertex.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.0.is_empty()
    }

    /// Planar area enclosed by the ring, in square degrees.
    #[must_use]
    pub fn unsigned_area(&self) -> f64 {
        geo::Polygon::new(self.0.clone(), Vec::new()).unsigned_area()
    }

    /// Borrow the ring as a `geo` line string.
    #[must_use]
    pub const fn as_line_string(&self) -> &LineString<f64> {
        &self.0
    }

    /// Consume the ring, returning the underlying `geo` line string.
    #[must_use]
    pub fn into_line_string(self) -> LineString<f64> {
        self.0
    }
}

impl TryFrom<Vec<Coord<f64>>> for LinearRing {
    type Error = GeometryError;

    fn try_from(coords: Vec<Coord<f64>>) -> Result<Self, Self::Error> {
        Self::new(coords)
    }
}

impl From<LinearRing> for Vec<Coord<f64>> {
    fn from(ring: LinearRing) -> Self {
        ring.0.0
    }
}

/// A shell with zero or more holes.
///
/// Hole containment is established by whoever builds the polygon; the
/// constructor only groups already-valid rings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    shell: LinearRing,
    holes: Vec<LinearRing>,
}

impl Polygon {
    /// Group a shell with its holes.
    #[must_use]
    pub const fn new(shell: LinearRing, holes: Vec<LinearRing>) -> Self {
        Self { shell, holes }
    }

    /// Outer boundary.
    #[must_use]
    pub const fn shell(&self) -> &LinearRing {
        &self.shell
    }

    /// Inner boundaries.
    #[must_use]
    pub fn holes(&self) -> &[LinearRing] {
        &self.holes
    }

    /// Split into shell and holes.
    #[must_use]
    pub fn into_parts(self) -> (LinearRing, Vec<LinearRing>) {
        (self.shell, self.holes)
    }

    /// Shell area minus hole areas, in square degrees.
    #[must_use]
    pub fn unsigned_area(&self) -> f64 {
        geo::Polygon::from(self.clone()).unsigned_area()
    }
}

impl From<Polygon> for geo::Polygon<f64> {
    fn from(polygon: Polygon) -> Self {
        Self::new(
            polygon.shell.into_line_string(),
            polygon
                .holes
                .into_iter()
                .map(LinearRing::into_line_string)
                .collect(),
        )
    }
}

/// Any geometry the interpreter can emit.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::Geometry;
///
/// # fn main() -> Result<(), waymark_core::GeometryError> {
/// let line = Geometry::line_string(vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 1.0, y: 1.0 },
/// ])?;
/// assert_eq!(line.kind_name(), "LineString");
/// assert!(Geometry::line_string(vec![Coord { x: 0.0, y: 0.0 }]).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "coordinates")
)]
pub enum Geometry {
    /// A single position.
    Point(Coord<f64>),
    /// An open or closed path of at least two positions.
    LineString(LineString<f64>),
    /// A closed ring with no holes.
    LinearRing(LinearRing),
    /// A shell with holes.
    Polygon(Polygon),
}

impl Geometry {
    /// Point geometry at `coord`.
    #[must_use]
    pub const fn point(coord: Coord<f64>) -> Self {
        Self::Point(coord)
    }

    /// Validate and construct a line string.
    ///
    /// # Errors
    /// Returns [`GeometryError::TooFewLineCoords`] below two coordinates.
    pub fn line_string(coords: Vec<Coord<f64>>) -> Result<Self, GeometryError> {
        if coords.len() < MIN_LINE_COORDS {
            return Err(GeometryError::TooFewLineCoords {
                count: coords.len(),
            });
        }
        Ok(Self::LineString(LineString::new(coords)))
    }

    /// Validate and construct a ring geometry.
    ///
    /// # Errors
    /// As [`LinearRing::new`].
    pub fn linear_ring(coords: Vec<Coord<f64>>) -> Result<Self, GeometryError> {
        LinearRing::new(coords).map(Self::LinearRing)
    }

    /// Name of the variant, matching common GIS vocabulary.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::LinearRing(_) => "LinearRing",
            Self::Polygon(_) => "Polygon",
        }
    }

    /// The wrapped ring, if this is a [`Geometry::LinearRing`].
    #[must_use]
    pub const fn as_linear_ring(&self) -> Option<&LinearRing> {
        match self {
            Self::LinearRing(ring) => Some(ring),
            _ => None,
        }
    }

    /// The wrapped polygon, if this is a [`Geometry::Polygon`].
    #[must_use]
    pub const fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Self::Polygon(polygon) => Some(polygon),
            _ => None,
        }
    }

    /// Number of holes: zero for every kind except polygons.
    #[must_use]
    pub fn hole_count(&self) -> usize {
        self.as_polygon().map_or(0, |polygon| polygon.holes().len())
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        if polygon.holes.is_empty() {
            Self::LinearRing(polygon.shell)
        } else {
            Self::Polygon(polygon)
        }
    }
}

impl From<Geometry> for geo::Geometry<f64> {
    fn from(geometry: Geometry) -> Self {
        match geometry {
            Geometry::Point(coord) => Self::Point(geo::Point(coord)),
            Geometry::LineString(line) => Self::LineString(line),
            Geometry::LinearRing(ring) => Self::LineString(ring.into_line_string()),
            Geometry::Polygon(polygon) => Self::Polygon(polygon.into()),
        }
    }
}
