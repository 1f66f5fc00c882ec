//! # PMATCH Common Library
//!
//! Shared code for the PMATCH services including:
//! - Vision signal types (face likelihoods, labels, dominant colors)
//! - Archetype enum and score accumulation
//! - The fixed character catalog
//! - The archetype scoring engine
//! - The `VisionAnalyzer` port consumed by the engine's callers
//! - Bootstrap configuration loading

pub mod archetype;
pub mod characters;
pub mod config;
pub mod error;
pub mod scoring;
pub mod signals;
pub mod vision;

pub use archetype::{Archetype, ArchetypeScores};
pub use characters::{CharacterCatalog, CharacterRecord};
pub use error::{Error, Result};
pub use scoring::{classify, pick, score, select, Classification};
pub use signals::{ColorSample, ColorSignal, FaceSignal, LabelSignal, Likelihood, VisionSignals};
pub use vision::VisionAnalyzer;
