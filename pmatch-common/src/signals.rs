//! Vision signal types consumed by the scoring engine
//!
//! These are provider-neutral: adapters translate whatever their backend returns
//! into `FaceSignal`, `LabelSignal` and `ColorSignal`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordinal confidence level for a facial attribute
///
/// Ordered 0 (UNKNOWN) through 5 (VERY_LIKELY). Comparisons are ordinal.
///
/// Serialized as the provider's upper-snake-case name (`"VERY_LIKELY"`); any name
/// not in the table deserializes as `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Likelihood {
    #[default]
    Unknown = 0,
    VeryUnlikely = 1,
    Unlikely = 2,
    Possible = 3,
    Likely = 4,
    VeryLikely = 5,
}

impl Likelihood {
    /// Raw ordinal code (0-5)
    pub fn ordinal(self) -> u32 {
        self as u32
    }

    /// Inverse of [`Likelihood::ordinal`]; codes above 5 are `Unknown`
    pub fn from_ordinal(code: u8) -> Self {
        match code {
            1 => Likelihood::VeryUnlikely,
            2 => Likelihood::Unlikely,
            3 => Likelihood::Possible,
            4 => Likelihood::Likely,
            5 => Likelihood::VeryLikely,
            _ => Likelihood::Unknown,
        }
    }

    /// Upper-snake-case name
    pub fn as_name(self) -> &'static str {
        match self {
            Likelihood::Unknown => "UNKNOWN",
            Likelihood::VeryUnlikely => "VERY_UNLIKELY",
            Likelihood::Unlikely => "UNLIKELY",
            Likelihood::Possible => "POSSIBLE",
            Likelihood::Likely => "LIKELY",
            Likelihood::VeryLikely => "VERY_LIKELY",
        }
    }

    /// Parse a provider name such as `"VERY_LIKELY"`; anything unrecognized is `Unknown`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "VERY_UNLIKELY" => Likelihood::VeryUnlikely,
            "UNLIKELY" => Likelihood::Unlikely,
            "POSSIBLE" => Likelihood::Possible,
            "LIKELY" => Likelihood::Likely,
            "VERY_LIKELY" => Likelihood::VeryLikely,
            _ => Likelihood::Unknown,
        }
    }
}

impl Serialize for Likelihood {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_name())
    }
}

impl<'de> Deserialize<'de> for Likelihood {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Likelihood::from_name(&name))
    }
}

/// Emotion and headwear likelihoods of the first detected face
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceSignal {
    pub joy: Likelihood,
    pub sorrow: Likelihood,
    pub anger: Likelihood,
    pub surprise: Likelihood,
    pub headwear: Likelihood,
}

impl FaceSignal {
    /// Sum of the four raw emotion codes (headwear excluded)
    pub fn emotion_sum(&self) -> u32 {
        [self.joy, self.sorrow, self.anger, self.surprise]
            .iter()
            .map(|l| l.ordinal())
            .sum()
    }
}

/// Set of lower-case scene/object labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSignal {
    labels: BTreeSet<String>,
}

impl LabelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label, trimming and lower-casing it. Blank labels are ignored.
    pub fn insert(&mut self, label: &str) {
        let normalized = label.trim().to_lowercase();
        if !normalized.is_empty() {
            self.labels.insert(normalized);
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(&label.trim().to_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for LabelSignal {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut signal = LabelSignal::new();
        for label in iter {
            signal.insert(label.as_ref());
        }
        signal
    }
}

/// One dominant color and the share of the image it covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    /// Fraction of image pixels (0.0-1.0), as reported by the provider
    pub pixel_fraction: f32,
}

impl ColorSample {
    pub fn new(red: f32, green: f32, blue: f32, pixel_fraction: f32) -> Self {
        Self { red, green, blue, pixel_fraction }
    }

    /// Red strictly dominates both green and blue
    pub fn is_warm(&self) -> bool {
        self.red > self.blue && self.red > self.green
    }

    /// Blue strictly dominates red
    pub fn is_cool(&self) -> bool {
        self.blue > self.red
    }
}

/// Dominant-color palette in provider order (not re-normalized)
pub type ColorSignal = Vec<ColorSample>;

/// Everything the scoring engine needs from one image analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisionSignals {
    /// Absent when no face was detected
    pub face: Option<FaceSignal>,
    pub labels: LabelSignal,
    pub colors: ColorSignal,
}
