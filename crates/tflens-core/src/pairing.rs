//! Pairing modes and structured group keys
//!
//! A pairing mode picks the dimension used to cluster log entries. Every
//! entry maps to exactly one [`GroupKey`]; entries missing the grouping value
//! land in a per-mode sentinel group instead of failing.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::LogEntry;

/// Persisted form of the correlation sentinel
pub const NO_CORRELATION: &str = "no-correlation";
/// Persisted form of the resource sentinel
pub const NO_RESOURCE: &str = "no-resource";
/// Persisted form of the phase sentinel
pub const NO_PHASE: &str = "no-phase";

const RESOURCE_SEPARATOR: char = ':';

/// Dimension used to cluster entries into groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PairingMode {
    /// Group by correlation id (`tf_req_id`)
    #[default]
    Correlation,
    /// Group by `resource type : resource name`
    Resource,
    /// Group by provisioning phase
    Phase,
}

impl PairingMode {
    pub const ALL: [PairingMode; 3] = [
        PairingMode::Correlation,
        PairingMode::Resource,
        PairingMode::Phase,
    ];

    /// Value used for `pair_by` / `by` query parameters and scope keys
    pub fn as_wire(&self) -> &'static str {
        match self {
            PairingMode::Correlation => "tf_req_id",
            PairingMode::Resource => "resource",
            PairingMode::Phase => "phase",
        }
    }

    /// Parse a wire value. Unknown values fall back to [`PairingMode::Correlation`].
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "resource" => PairingMode::Resource,
            "phase" => PairingMode::Phase,
            _ => PairingMode::Correlation,
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            PairingMode::Correlation => "correlation id",
            PairingMode::Resource => "resource",
            PairingMode::Phase => "phase",
        }
    }

    /// Next mode in display order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            PairingMode::Correlation => PairingMode::Resource,
            PairingMode::Resource => PairingMode::Phase,
            PairingMode::Phase => PairingMode::Correlation,
        }
    }

    /// Sentinel key of this mode
    pub fn sentinel(&self) -> GroupKey {
        match self {
            PairingMode::Correlation => GroupKey::Correlation(None),
            PairingMode::Resource => GroupKey::Resource(None),
            PairingMode::Phase => GroupKey::Phase(None),
        }
    }
}

impl fmt::Display for PairingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for PairingMode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for PairingMode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = String::deserialize(d)?;
        Ok(PairingMode::from_wire(&value))
    }
}

/// Resource identity: type and name, at least one of them non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub resource_type: String,
    pub name: String,
}

/// Structured group key: pairing mode plus the raw grouping value.
///
/// `None` is the mode's sentinel group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Correlation(Option<String>),
    Resource(Option<ResourceKey>),
    Phase(Option<String>),
}

impl GroupKey {
    /// Map an entry to its group key. Total: never fails.
    pub fn for_entry(mode: PairingMode, entry: &LogEntry) -> Self {
        match mode {
            PairingMode::Correlation => GroupKey::Correlation(present(&entry.correlation_id)),
            PairingMode::Resource => {
                let resource_type = present(&entry.resource_type);
                let name = present(&entry.resource_name);
                if resource_type.is_none() && name.is_none() {
                    GroupKey::Resource(None)
                } else {
                    GroupKey::Resource(Some(ResourceKey {
                        resource_type: resource_type.unwrap_or_default(),
                        name: name.unwrap_or_default(),
                    }))
                }
            }
            PairingMode::Phase => GroupKey::Phase(present(&entry.phase)),
        }
    }

    /// Rebuild a key from its persisted string form
    pub fn parse(mode: PairingMode, stored: &str) -> Self {
        match mode {
            PairingMode::Correlation => {
                GroupKey::Correlation(non_sentinel(stored, NO_CORRELATION))
            }
            PairingMode::Phase => GroupKey::Phase(non_sentinel(stored, NO_PHASE)),
            PairingMode::Resource => {
                if stored == NO_RESOURCE {
                    return GroupKey::Resource(None);
                }
                let (resource_type, name) = stored
                    .split_once(RESOURCE_SEPARATOR)
                    .unwrap_or((stored, ""));
                if resource_type.is_empty() && name.is_empty() {
                    GroupKey::Resource(None)
                } else {
                    GroupKey::Resource(Some(ResourceKey {
                        resource_type: resource_type.to_string(),
                        name: name.to_string(),
                    }))
                }
            }
        }
    }

    pub fn mode(&self) -> PairingMode {
        match self {
            GroupKey::Correlation(_) => PairingMode::Correlation,
            GroupKey::Resource(_) => PairingMode::Resource,
            GroupKey::Phase(_) => PairingMode::Phase,
        }
    }

    /// True for the synthetic group of entries lacking a grouping value
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            GroupKey::Correlation(None) | GroupKey::Resource(None) | GroupKey::Phase(None)
        )
    }

    /// String form used in persisted selection state and export requests
    pub fn storage_key(&self) -> String {
        match self {
            GroupKey::Correlation(Some(id)) => id.clone(),
            GroupKey::Correlation(None) => NO_CORRELATION.to_string(),
            GroupKey::Resource(Some(r)) => {
                format!("{}{}{}", r.resource_type, RESOURCE_SEPARATOR, r.name)
            }
            GroupKey::Resource(None) => NO_RESOURCE.to_string(),
            GroupKey::Phase(Some(phase)) => phase.clone(),
            GroupKey::Phase(None) => NO_PHASE.to_string(),
        }
    }

    /// Presentation form shown in group headers and dialogs
    pub fn label(&self) -> String {
        match self {
            GroupKey::Correlation(Some(id)) => id.clone(),
            GroupKey::Correlation(None) => "(no correlation id)".to_string(),
            GroupKey::Resource(Some(r)) => format!(
                "{} : {}",
                or_placeholder(&r.resource_type, "(no type)"),
                or_placeholder(&r.name, "(no name)")
            ),
            GroupKey::Resource(None) => "(no resource)".to_string(),
            GroupKey::Phase(Some(phase)) => phase.clone(),
            GroupKey::Phase(None) => "(no phase)".to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// KeyExtractor entry point: the persisted key of `entry` under `mode`
pub fn extract_key(mode: PairingMode, entry: &LogEntry) -> String {
    GroupKey::for_entry(mode, entry).storage_key()
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

fn non_sentinel(stored: &str, sentinel: &str) -> Option<String> {
    (!stored.is_empty() && stored != sentinel).then(|| stored.to_string())
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
