use super::{AccessoryId, Point};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker kinds that can be placed on a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessoryKind {
    Skylight,
    Vent,
    PipeFlange,
    Other,
}

impl AccessoryKind {
    /// Human-readable name used in breakdowns and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skylight => "Skylight",
            Self::Vent => "Vents",
            Self::PipeFlange => "Pipe flange",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AccessoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccessoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "skylight" => Ok(Self::Skylight),
            "vent" | "vents" => Ok(Self::Vent),
            "pipeflange" => Ok(Self::PipeFlange),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown accessory type: {}", s)),
        }
    }
}

/// Typed payload of an accessory, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AccessoryData {
    Skylight {
        #[serde(default)]
        size: String,
    },
    Vent {
        #[serde(default)]
        styles: Vec<String>,
    },
    PipeFlange {
        #[serde(default)]
        size: String,
    },
    Other {
        #[serde(default)]
        note: String,
    },
}

impl AccessoryData {
    /// Payload a freshly placed marker starts with.
    pub fn default_for(kind: AccessoryKind) -> Self {
        match kind {
            AccessoryKind::Skylight => Self::Skylight {
                size: "M08".to_string(),
            },
            AccessoryKind::Vent => Self::Vent { styles: Vec::new() },
            AccessoryKind::PipeFlange => Self::PipeFlange {
                size: "1\"-2\"".to_string(),
            },
            AccessoryKind::Other => Self::Other {
                note: String::new(),
            },
        }
    }

    pub fn kind(&self) -> AccessoryKind {
        match self {
            Self::Skylight { .. } => AccessoryKind::Skylight,
            Self::Vent { .. } => AccessoryKind::Vent,
            Self::PipeFlange { .. } => AccessoryKind::PipeFlange,
            Self::Other { .. } => AccessoryKind::Other,
        }
    }

    /// Distinct values this payload contributes to the accessory breakdown.
    /// Empty when nothing has been filled in.
    pub fn breakdown_values(&self) -> Vec<String> {
        let non_empty = |s: &str| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };
        match self {
            Self::Skylight { size } => non_empty(size)
                .map(|s| s.to_uppercase())
                .into_iter()
                .collect(),
            Self::Vent { styles } => styles.iter().filter_map(|s| non_empty(s)).collect(),
            Self::PipeFlange { size } => non_empty(size).into_iter().collect(),
            Self::Other { note } => non_empty(note).into_iter().collect(),
        }
    }
}

/// Accessory payload as stored: either a typed record or an unrecognized
/// blob preserved verbatim from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccessoryPayload {
    Typed(AccessoryData),
    Unrecognized(serde_json::Value),
}

/// A point marker owned by a plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Accessory {
    pub id: AccessoryId,
    pub position: Point,
    pub data: AccessoryPayload,
}

impl Accessory {
    pub fn new(kind: AccessoryKind, position: Point) -> Self {
        Self {
            id: AccessoryId::generate(),
            position,
            data: AccessoryPayload::Typed(AccessoryData::default_for(kind)),
        }
    }

    /// Kind of a typed accessory; `None` for unrecognized payloads.
    pub fn kind(&self) -> Option<AccessoryKind> {
        match &self.data {
            AccessoryPayload::Typed(data) => Some(data.kind()),
            AccessoryPayload::Unrecognized(_) => None,
        }
    }

    /// Type name as shown in breakdowns. Unrecognized payloads report the
    /// raw `kind`/`type` field they were stored with.
    pub fn type_name(&self) -> String {
        match &self.data {
            AccessoryPayload::Typed(data) => data.kind().label().to_string(),
            AccessoryPayload::Unrecognized(value) => value
                .get("kind")
                .or_else(|| value.get("type"))
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self.data, AccessoryPayload::Typed(_))
    }
}
