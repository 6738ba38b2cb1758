use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Architectural classification of a plane edge.
///
/// Drives the render color and the slope-correction multiplier applied by
/// the measurement aggregator. Unrecognized labels read from a snapshot
/// collapse to [`EdgeType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EdgeType {
    Eave,
    Rake,
    Ridge,
    Valley,
    Hip,
    Flashing,
    Parapet,
    Transition,
    Unknown,
}

impl Default for EdgeType {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Preference order when an edge borders two planes.
const INTERIOR_ORDER: [EdgeType; 6] = [
    EdgeType::Ridge,
    EdgeType::Valley,
    EdgeType::Hip,
    EdgeType::Flashing,
    EdgeType::Parapet,
    EdgeType::Transition,
];

impl EdgeType {
    pub const ALL: [EdgeType; 9] = [
        EdgeType::Eave,
        EdgeType::Rake,
        EdgeType::Ridge,
        EdgeType::Valley,
        EdgeType::Hip,
        EdgeType::Flashing,
        EdgeType::Parapet,
        EdgeType::Transition,
        EdgeType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eave => "eave",
            Self::Rake => "rake",
            Self::Ridge => "ridge",
            Self::Valley => "valley",
            Self::Hip => "hip",
            Self::Flashing => "flashing",
            Self::Parapet => "parapet",
            Self::Transition => "transition",
            Self::Unknown => "unknown",
        }
    }

    /// Render color as a CSS hex string.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Eave => "#2dd4bf",
            Self::Rake => "#60a5fa",
            Self::Ridge => "#f97316",
            Self::Valley => "#f43f5e",
            Self::Hip => "#a78bfa",
            Self::Flashing => "#f59e0b",
            Self::Parapet => "#10b981",
            Self::Transition => "#ec4899",
            Self::Unknown => "#9ca3af",
        }
    }

    /// Length multiplier for an edge of this type on a plane with `pitch`
    /// inches of rise per 12 inches of run.
    ///
    /// Rakes run up the slope, hips and valleys run diagonally across it.
    /// Every other type runs along the horizontal and is left uncorrected.
    pub fn correction_factor(&self, pitch: f64) -> f64 {
        let rise = pitch / 12.0;
        match self {
            Self::Rake => (1.0 + rise * rise).sqrt(),
            Self::Hip | Self::Valley => (2.0 + rise * rise).sqrt(),
            _ => 1.0,
        }
    }

    /// Pick the label for an edge shared by two planes.
    ///
    /// Known labels beat `unknown`, interior labels (ridge, valley, hip, ...)
    /// beat perimeter ones, ties go to the interior preference order.
    pub fn resolve_shared(a: EdgeType, b: EdgeType) -> EdgeType {
        if a == b {
            return a;
        }
        let rank = |t: EdgeType| {
            INTERIOR_ORDER
                .iter()
                .position(|candidate| *candidate == t)
                .unwrap_or(INTERIOR_ORDER.len() + usize::from(t == EdgeType::Unknown))
        };
        if rank(a) <= rank(b) {
            a
        } else {
            b
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eave" => Ok(Self::Eave),
            "rake" => Ok(Self::Rake),
            "ridge" => Ok(Self::Ridge),
            "valley" => Ok(Self::Valley),
            "hip" => Ok(Self::Hip),
            "flashing" => Ok(Self::Flashing),
            "parapet" => Ok(Self::Parapet),
            "transition" => Ok(Self::Transition),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown edge type: {}", s)),
        }
    }
}

impl From<String> for EdgeType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!("Unrecognized edge type {:?}, treating as unknown", value);
            EdgeType::Unknown
        })
    }
}
