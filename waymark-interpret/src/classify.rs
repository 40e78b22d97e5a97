//! Tag-driven geometry classification.
//!
//! OSM tags carry the only signal of whether a way is a line or an area. The
//! classifier evaluates an ordered table of `(predicate, kind)` rules against
//! a tag set and returns the kind of the first rule that matches. Precedence
//! is therefore data, not control flow:
//!
//! 1. `area=no` yields a line, whatever else is present.
//! 2. `area=yes` yields an area.
//! 3. Tags that imply an area by OSM convention yield an area.
//! 4. `type=multipolygon` yields an area.
//!
//! Ways that match nothing are lines; relations that match nothing are
//! unrecognised. Nodes are always points and never consult the table.
//!
//! # Examples
//! ```
//! use waymark_core::{OsmGeoType, Tags};
//! use waymark_interpret::{GeometryKind, TagClassifier};
//!
//! let classifier = TagClassifier::default();
//! let lake = Tags::from([("natural", "water")]);
//! let pier = Tags::from([("building", "yes"), ("area", "no")]);
//! assert_eq!(classifier.classify(OsmGeoType::Way, &lake), GeometryKind::Area);
//! assert_eq!(classifier.classify(OsmGeoType::Way, &pier), GeometryKind::Line);
//! ```

use std::fmt;

use waymark_core::{OsmGeoType, Tags};

/// The geometric intent recovered from a tag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GeometryKind {
    /// A single position.
    Point,
    /// An open or closed path.
    Line,
    /// A closed, filled shape.
    Area,
    /// No geometry can be derived.
    Unrecognized,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Area => "area",
            Self::Unrecognized => "unrecognized",
        })
    }
}

/// A test against a tag set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "match", rename_all = "snake_case")
)]
pub enum TagPredicate {
    /// `key` is present with any value.
    Key {
        /// Tag key.
        key: String,
    },
    /// `key` is present with exactly `value`.
    KeyValue {
        /// Tag key.
        key: String,
        /// Required value.
        value: String,
    },
    /// `key` is present with one of `values`.
    KeyValueIn {
        /// Tag key.
        key: String,
        /// Accepted values.
        values: Vec<String>,
    },
}

impl TagPredicate {
    /// Predicate matching any value of `key`.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key { key: key.into() }
    }

    /// Predicate matching `key=value`.
    #[must_use]
    pub fn key_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Predicate matching `key` with any of `values`.
    #[must_use]
    pub fn key_value_in(key: impl Into<String>, values: &[&str]) -> Self {
        Self::KeyValueIn {
            key: key.into(),
            values: values.iter().map(|value| (*value).to_owned()).collect(),
        }
    }

    /// Whether `tags` satisfies the predicate.
    #[must_use]
    pub fn matches(&self, tags: &Tags) -> bool {
        match self {
            Self::Key { key } => tags.contains_key(key),
            Self::KeyValue { key, value } => tags.contains_key_value(key, value),
            Self::KeyValueIn { key, values } => tags
                .get(key)
                .is_some_and(|found| values.iter().any(|value| value == found)),
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierRule {
    /// Test applied to the tag set.
    pub predicate: TagPredicate,
    /// Kind returned when the predicate matches.
    pub kind: GeometryKind,
}

impl ClassifierRule {
    /// Construct a rule.
    #[must_use]
    pub const fn new(predicate: TagPredicate, kind: GeometryKind) -> Self {
        Self { predicate, kind }
    }
}

/// Keys whose presence alone marks a closed way as an area.
const IMPLIED_AREA_KEYS: &[&str] = &[
    "building",
    "building:part",
    "landuse",
    "leisure",
    "amenity",
    "shop",
    "office",
    "military",
    "area:highway",
];

/// Key/value families that mark a way as an area.
const IMPLIED_AREA_VALUES: &[(&str, &[&str])] = &[
    (
        "natural",
        &[
            "water",
            "wood",
            "scrub",
            "heath",
            "grassland",
            "wetland",
            "beach",
            "sand",
            "bare_rock",
            "scree",
            "glacier",
            "mud",
        ],
    ),
    ("waterway", &["riverbank", "dock", "boatyard"]),
    ("man_made", &["wastewater_plant", "water_works", "works"]),
    ("power", &["plant", "substation", "generator"]),
    ("tourism", &["zoo", "theme_park", "camp_site", "caravan_site"]),
];

/// Ordered first-match-wins classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagClassifier {
    rules: Vec<ClassifierRule>,
}

impl TagClassifier {
    /// Classifier evaluating `rules` in order.
    #[must_use]
    pub const fn new(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// The OSM convention table used by [`TagClassifier::default`].
    #[must_use]
    pub fn default_rules() -> Vec<ClassifierRule> {
        let mut rules = vec![
            ClassifierRule::new(TagPredicate::key_value("area", "no"), GeometryKind::Line),
            ClassifierRule::new(TagPredicate::key_value("area", "yes"), GeometryKind::Area),
        ];
        rules.extend(
            IMPLIED_AREA_KEYS
                .iter()
                .map(|key| ClassifierRule::new(TagPredicate::key(*key), GeometryKind::Area)),
        );
        rules.extend(IMPLIED_AREA_VALUES.iter().map(|(key, values)| {
            ClassifierRule::new(TagPredicate::key_value_in(*key, values), GeometryKind::Area)
        }));
        rules.push(ClassifierRule::new(
            TagPredicate::key_value("type", "multipolygon"),
            GeometryKind::Area,
        ));
        rules
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Classify the tags of a primitive of type `kind`.
    #[must_use]
    pub fn classify(&self, kind: OsmGeoType, tags: &Tags) -> GeometryKind {
        match kind {
            OsmGeoType::Node => GeometryKind::Point,
            OsmGeoType::Way => self.first_match(tags).unwrap_or(GeometryKind::Line),
            OsmGeoType::Relation => self.first_match(tags).unwrap_or(GeometryKind::Unrecognized),
        }
    }

    fn first_match(&self, tags: &Tags) -> Option<GeometryKind> {
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(tags))
            .map(|rule| rule.kind)
    }
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}
