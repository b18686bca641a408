use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of the brake systems covered by the workbook.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemId {
    Disc,
    Drum,
}

impl SystemId {
    /// Every system, in display order.
    pub const ALL: [SystemId; 2] = [SystemId::Disc, SystemId::Drum];

    /// Wire name used in composite keys and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SystemId::Disc => "disc",
            SystemId::Drum => "drum",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            SystemId::Disc => "Disc Brake System",
            SystemId::Drum => "Drum Brake System",
        }
    }
}

/// Identifier of a component within a system (e.g. `brake-disc`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Composite key `{system}-{component}` addressing one record in the store.
///
/// System wire names never contain `-`, so the first dash always separates
/// the two halves even though component ids are dash-separated themselves.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKey {
    system: SystemId,
    component: ComponentId,
}

impl ComponentKey {
    #[must_use]
    pub fn new(system: SystemId, component: ComponentId) -> Self {
        Self { system, component }
    }

    #[must_use]
    pub fn system(&self) -> SystemId {
        self.system
    }

    #[must_use]
    pub fn component(&self) -> &ComponentId {
        &self.component
    }
}

impl fmt::Debug for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SystemId({})", self.as_str())
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

impl fmt::Debug for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKey({self})")
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.system, self.component)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing identifiers from strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to parse {kind} from {raw:?}")]
pub struct ParseIdError {
    kind: &'static str,
    raw: String,
}

impl ParseIdError {
    fn new(kind: &'static str, raw: &str) -> Self {
        Self {
            kind,
            raw: raw.to_string(),
        }
    }
}

impl FromStr for SystemId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disc" => Ok(SystemId::Disc),
            "drum" => Ok(SystemId::Drum),
            _ => Err(ParseIdError::new("SystemId", s)),
        }
    }
}

impl FromStr for ComponentKey {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (system, component) = s
            .split_once('-')
            .ok_or_else(|| ParseIdError::new("ComponentKey", s))?;
        let system = system
            .parse::<SystemId>()
            .map_err(|_| ParseIdError::new("ComponentKey", s))?;
        if component.is_empty() {
            return Err(ParseIdError::new("ComponentKey", s));
        }
        Ok(Self::new(system, ComponentId::new(component)))
    }
}

// ─── Serde (keys travel as plain strings) ──────────────────────────────────────

impl Serialize for ComponentKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ComponentKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
