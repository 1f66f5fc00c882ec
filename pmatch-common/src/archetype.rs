//! Personality archetypes and per-archetype score accumulation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One of the six fixed personality categories a photo is classified into
///
/// Declaration order is the tie-break order used by winner resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Chaotic,
    Professional,
    Mysterious,
    Anxious,
    Hedonist,
    Duality,
}

impl Archetype {
    /// All archetypes in tie-break order
    pub const ALL: [Archetype; 6] = [
        Archetype::Chaotic,
        Archetype::Professional,
        Archetype::Mysterious,
        Archetype::Anxious,
        Archetype::Hedonist,
        Archetype::Duality,
    ];

    /// Convert to the lower-case tag used in character records and JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::Chaotic => "chaotic",
            Archetype::Professional => "professional",
            Archetype::Mysterious => "mysterious",
            Archetype::Anxious => "anxious",
            Archetype::Hedonist => "hedonist",
            Archetype::Duality => "duality",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Archetype::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown archetype: {}", s)))
    }
}

/// Accumulated integer score per archetype
///
/// Starts at zero for every archetype and only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchetypeScores {
    values: [u32; 6],
}

impl ArchetypeScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule contribution
    pub fn add(&mut self, archetype: Archetype, points: u32) {
        let slot = &mut self.values[archetype.index()];
        *slot = slot.saturating_add(points);
    }

    pub fn get(&self, archetype: Archetype) -> u32 {
        self.values[archetype.index()]
    }

    /// True when no rule contributed anything
    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }

    /// Iterate `(archetype, score)` pairs in tie-break order
    pub fn iter(&self) -> impl Iterator<Item = (Archetype, u32)> + '_ {
        Archetype::ALL.into_iter().map(move |a| (a, self.get(a)))
    }
}

impl Serialize for ArchetypeScores {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(Archetype::ALL.len()))?;
        for (archetype, value) in self.iter() {
            map.serialize_entry(archetype.as_str(), &value)?;
        }
        map.end()
    }
}
