//! Anchor geometry: lead length and compass direction from staking points.
//!
//! Each structure's staking points share one sequence. The point labelled
//! `P1` is the pole base; every guy/anchor point is measured from it in the
//! report's planar easting/northing feet.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{AnchorCandidate, StakePoint};
use crate::sequence::SequenceKey;

/// Stake-description marker of the pole base point.
pub const REFERENCE_MARKER: &str = "P1";

/// Stake-description markers that identify guy/anchor points.
pub const DEFAULT_GUY_MARKERS: [&str; 6] = ["P2", "PG", "SE", "NG", "CM", "FG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    pub fn label(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }

    /// Bucket a bearing in degrees, `(-180, 180]`, counter-clockwise from east.
    pub fn from_bearing(theta: f64, scheme: CompassScheme) -> Self {
        match scheme {
            CompassScheme::Staking => staking_bucket(theta),
            CompassScheme::Octant => octant_bucket(theta),
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which bearing partition to use.
///
/// The two partitions disagree near the diagonals (a bearing of 10° is `NE`
/// under `Staking` but `E` under `Octant`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompassScheme {
    /// Narrow 4° windows around the cardinal axes, diagonals take the rest.
    #[default]
    Staking,
    /// Uniform 45° octants centred on each direction.
    Octant,
}

fn staking_bucket(theta: f64) -> Compass {
    if -2.0 < theta && theta <= 2.0 {
        Compass::E
    } else if 2.0 < theta && theta <= 88.0 {
        Compass::NE
    } else if 88.0 < theta && theta <= 92.0 {
        Compass::N
    } else if 92.0 < theta && theta <= 178.0 {
        Compass::NW
    } else if -88.0 < theta && theta <= -2.0 {
        Compass::SE
    } else if -92.0 < theta && theta <= -88.0 {
        Compass::S
    } else if -178.0 < theta && theta <= -92.0 {
        Compass::SW
    } else {
        Compass::W
    }
}

fn octant_bucket(theta: f64) -> Compass {
    if -22.5 < theta && theta <= 22.5 {
        Compass::E
    } else if 22.5 < theta && theta <= 67.5 {
        Compass::NE
    } else if 67.5 < theta && theta <= 112.5 {
        Compass::N
    } else if 112.5 < theta && theta <= 157.5 {
        Compass::NW
    } else if -67.5 < theta && theta <= -22.5 {
        Compass::SE
    } else if -112.5 < theta && theta <= -67.5 {
        Compass::S
    } else if -157.5 < theta && theta <= -112.5 {
        Compass::SW
    } else {
        Compass::W
    }
}

/// Set of stake-description substrings that mark guy/anchor points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuyMarkers(Vec<String>);

impl GuyMarkers {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(markers.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, stake_description: &str) -> bool {
        self.0.iter().any(|m| stake_description.contains(m.as_str()))
    }
}

impl Default for GuyMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_GUY_MARKERS)
    }
}

/// Anchors for one sequence plus the points that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct AnchorResolution {
    pub anchors: Vec<AnchorCandidate>,
    pub warnings: Vec<ReconError>,
}

/// Planar offset from the pole base to an anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lead {
    pub length: f64,
    /// Degrees, `(-180, 180]`.
    pub bearing: f64,
}

impl Lead {
    pub fn between(origin: (f64, f64), target: (f64, f64)) -> Self {
        let dx = target.0 - origin.0;
        let dy = target.1 - origin.1;
        Self {
            length: dx.hypot(dy),
            bearing: dy.atan2(dx).to_degrees(),
        }
    }
}

/// Resolve the anchors of one structure from its staking points.
///
/// Zero anchors when no point carries the `P1` marker. When a base point
/// exists but nothing could be measured from it, a single `"P1"` anchor with
/// zero lead length stands in so the structure still gets a row.
pub fn resolve_anchors(
    sequence: &SequenceKey,
    points: &[StakePoint],
    markers: &GuyMarkers,
    scheme: CompassScheme,
) -> AnchorResolution {
    let mut resolution = AnchorResolution::default();

    let Some(origin_idx) = points
        .iter()
        .position(|p| p.stake_description.contains(REFERENCE_MARKER))
    else {
        log::debug!("{}", ReconError::NoReferencePoint { sequence: sequence.to_string() });
        return resolution;
    };
    let origin_point = &points[origin_idx];

    match coordinates(sequence, origin_point) {
        Ok(origin) => {
            let mut seen: HashSet<&str> = HashSet::new();

            for (idx, point) in points.iter().enumerate() {
                if idx == origin_idx || !markers.matches(&point.stake_description) {
                    continue;
                }

                let target = match coordinates(sequence, point) {
                    Ok(target) => target,
                    Err(e) => {
                        log::warn!("{e}; point skipped");
                        resolution.warnings.push(e);
                        continue;
                    }
                };

                let lead = Lead::between(origin, target);
                let direction = Compass::from_bearing(lead.bearing, scheme);

                for description in point.stake_description.split(',').map(str::trim) {
                    if !seen.insert(description) {
                        continue;
                    }
                    resolution.anchors.push(AnchorCandidate {
                        sequence: sequence.clone(),
                        anchor_type: format!("{REFERENCE_MARKER} to {description}"),
                        latitude: point.latitude.clone(),
                        longitude: point.longitude.clone(),
                        framing: point.framing.clone(),
                        anchor_direction: Some(direction),
                        lead_length: lead.length,
                    });
                }
            }
        }
        Err(e) => {
            log::warn!("{e}; anchors cannot be measured");
            resolution.warnings.push(e);
        }
    }

    if resolution.anchors.is_empty() {
        resolution.anchors.push(AnchorCandidate {
            sequence: sequence.clone(),
            anchor_type: REFERENCE_MARKER.to_string(),
            latitude: origin_point.latitude.clone(),
            longitude: origin_point.longitude.clone(),
            framing: origin_point.framing.clone(),
            anchor_direction: None,
            lead_length: 0.0,
        });
    }

    resolution
}

fn coordinates(sequence: &SequenceKey, point: &StakePoint) -> Result<(f64, f64), ReconError> {
    let parse = |s: &str| s.trim().parse::<f64>().ok().filter(|v| v.is_finite());
    match (parse(&point.x_easting), parse(&point.y_northing)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(ReconError::MissingCoordinate {
            sequence: sequence.to_string(),
            stake_description: point.stake_description.clone(),
        }),
    }
}
