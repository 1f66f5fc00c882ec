//! Archetype scoring engine
//!
//! Turns vision signals into per-archetype scores, resolves a winning archetype and
//! picks a character for it. All weights are fixed constants.
//!
//! Rule groups (each evaluated independently, contributions only ever add):
//! - **Face**: emotion and headwear likelihoods of the first face
//! - **Labels**: presence of specific scene/object labels
//! - **Colors**: warm vs. cool share of the dominant palette

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::archetype::{Archetype, ArchetypeScores};
use crate::characters::{CharacterCatalog, CharacterRecord};
use crate::signals::{ColorSample, FaceSignal, LabelSignal, Likelihood, VisionSignals};

/// Points for each face rule that fires
const FACE_RULE_POINTS: u32 = 15;

/// Emotion code sum at or below which a face counts as neutral
const NEUTRAL_EMOTION_SUM: u32 = 4;
const NEUTRAL_PROFESSIONAL_POINTS: u32 = 10;
const NEUTRAL_MYSTERIOUS_POINTS: u32 = 5;

/// Label groups: every label in a group awards the same archetype the same points
const LABEL_RULES: &[(&[&str], Archetype, u32)] = &[
    (&["glasses", "eyewear", "sunglasses"], Archetype::Professional, 10),
    (&["sky", "crowd", "outdoor"], Archetype::Chaotic, 5),
    (&["room", "office", "building"], Archetype::Professional, 5),
    (&["night", "darkness"], Archetype::Mysterious, 10),
    (&["cafe", "restaurant", "food"], Archetype::Hedonist, 5),
    (&["school", "street", "book"], Archetype::Duality, 5),
];

/// Palette share a bucket must strictly exceed
const COLOR_DOMINANCE_THRESHOLD: f32 = 0.5;
const COLOR_RULE_POINTS: u32 = 10;

/// Result of a full classification pass
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub scores: ArchetypeScores,
    pub archetype: Archetype,
    pub character: &'static CharacterRecord,
}

/// Score all three signal categories
pub fn score(face: Option<&FaceSignal>, labels: &LabelSignal, colors: &[ColorSample]) -> ArchetypeScores {
    let mut scores = ArchetypeScores::new();

    if let Some(face) = face {
        apply_face_rules(face, &mut scores);
    }
    apply_label_rules(labels, &mut scores);
    apply_color_rules(colors, &mut scores);

    scores
}

fn apply_face_rules(face: &FaceSignal, scores: &mut ArchetypeScores) {
    if face.joy >= Likelihood::Likely || face.anger >= Likelihood::Possible {
        scores.add(Archetype::Chaotic, FACE_RULE_POINTS);
    }
    if face.sorrow >= Likelihood::Possible || face.surprise >= Likelihood::Possible {
        scores.add(Archetype::Anxious, FACE_RULE_POINTS);
    }
    if face.joy >= Likelihood::Unlikely && face.sorrow >= Likelihood::Unlikely {
        scores.add(Archetype::Duality, FACE_RULE_POINTS);
    }
    if face.headwear > Likelihood::Possible {
        scores.add(Archetype::Hedonist, FACE_RULE_POINTS);
    }
    if face.emotion_sum() <= NEUTRAL_EMOTION_SUM {
        scores.add(Archetype::Professional, NEUTRAL_PROFESSIONAL_POINTS);
        scores.add(Archetype::Mysterious, NEUTRAL_MYSTERIOUS_POINTS);
    }
}

fn apply_label_rules(labels: &LabelSignal, scores: &mut ArchetypeScores) {
    for label in labels.iter() {
        // Groups are disjoint, so at most one rule matches a label
        if let Some((_, archetype, points)) = LABEL_RULES.iter().find(|(group, _, _)| group.contains(&label)) {
            scores.add(*archetype, *points);
        }
    }
}

fn apply_color_rules(colors: &[ColorSample], scores: &mut ArchetypeScores) {
    let (warm, cool) = colors.iter().fold((0.0_f32, 0.0_f32), |(warm, cool), c| {
        if c.is_warm() {
            (warm + c.pixel_fraction, cool)
        } else if c.is_cool() {
            (warm, cool + c.pixel_fraction)
        } else {
            (warm, cool)
        }
    });

    // Independent checks, not an either/or
    if warm > COLOR_DOMINANCE_THRESHOLD {
        scores.add(Archetype::Chaotic, COLOR_RULE_POINTS);
    }
    if cool > COLOR_DOMINANCE_THRESHOLD {
        scores.add(Archetype::Professional, COLOR_RULE_POINTS);
    }
}

/// Resolve the winning archetype
///
/// All-zero scores select `Mysterious`. Otherwise the highest score wins, and ties go
/// to the archetype declared first in [`Archetype::ALL`].
pub fn select(scores: &ArchetypeScores) -> Archetype {
    if scores.is_all_zero() {
        return Archetype::Mysterious;
    }

    let mut best = (Archetype::ALL[0], scores.get(Archetype::ALL[0]));
    for (archetype, value) in scores.iter() {
        if value > best.1 {
            best = (archetype, value);
        }
    }
    best.0
}

/// Choose a character for `archetype` uniformly at random among its candidates
pub fn pick<R: Rng + ?Sized>(
    catalog: &CharacterCatalog,
    archetype: Archetype,
    rng: &mut R,
) -> &'static CharacterRecord {
    match catalog.candidates(archetype) {
        Ok(candidates) => candidates
            .choose(rng)
            .copied()
            .unwrap_or_else(|| catalog.fallback(archetype)),
        Err(e) => {
            warn!("{}; using fallback character", e);
            catalog.fallback(archetype)
        }
    }
}

/// Score, select and pick in one pass
pub fn classify<R: Rng + ?Sized>(
    signals: &VisionSignals,
    catalog: &CharacterCatalog,
    rng: &mut R,
) -> Classification {
    let scores = score(signals.face.as_ref(), &signals.labels, &signals.colors);
    let archetype = select(&scores);
    debug!(?scores, %archetype, "Archetype scores resolved");

    let character = pick(catalog, archetype, rng);

    Classification { scores, archetype, character }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn face(joy: Likelihood, sorrow: Likelihood, anger: Likelihood, surprise: Likelihood) -> FaceSignal {
        FaceSignal { joy, sorrow, anger, surprise, headwear: Likelihood::Unknown }
    }

    #[test]
    fn test_no_face_no_labels_no_colors_scores_nothing() {
        let scores = score(None, &LabelSignal::new(), &[]);
        assert!(scores.is_all_zero());
    }

    #[test]
    fn test_joyful_face_is_chaotic() {
        let f = face(Likelihood::VeryLikely, Likelihood::Unknown, Likelihood::Unknown, Likelihood::Unknown);
        let scores = score(Some(&f), &LabelSignal::new(), &[]);

        assert_eq!(scores.get(Archetype::Chaotic), 15);
        // joy=5 pushes the emotion sum past the neutral threshold
        assert_eq!(scores.get(Archetype::Professional), 0);
        assert_eq!(scores.get(Archetype::Mysterious), 0);
    }

    #[test]
    fn test_anger_possible_is_chaotic() {
        let f = face(Likelihood::Unknown, Likelihood::Unknown, Likelihood::Possible, Likelihood::Unknown);
        let scores = score(Some(&f), &LabelSignal::new(), &[]);
        assert_eq!(scores.get(Archetype::Chaotic), 15);
        // sum 3 <= 4
        assert_eq!(scores.get(Archetype::Professional), 10);
        assert_eq!(scores.get(Archetype::Mysterious), 5);
    }

    #[test]
    fn test_surprise_is_anxious() {
        let f = face(Likelihood::Unknown, Likelihood::Unknown, Likelihood::Unknown, Likelihood::Likely);
        let scores = score(Some(&f), &LabelSignal::new(), &[]);
        assert_eq!(scores.get(Archetype::Anxious), 15);
    }

    #[test]
    fn test_headwear_threshold_is_strict() {
        let mut f = FaceSignal { headwear: Likelihood::Possible, ..Default::default() };
        assert_eq!(score(Some(&f), &LabelSignal::new(), &[]).get(Archetype::Hedonist), 0);

        f.headwear = Likelihood::Likely;
        assert_eq!(score(Some(&f), &LabelSignal::new(), &[]).get(Archetype::Hedonist), 15);
    }

    #[test]
    fn test_neutral_face_uses_raw_ordinal_sum() {
        // 1 + 1 + 1 + 1 = 4: neutral
        let f = face(
            Likelihood::VeryUnlikely,
            Likelihood::VeryUnlikely,
            Likelihood::VeryUnlikely,
            Likelihood::VeryUnlikely,
        );
        let scores = score(Some(&f), &LabelSignal::new(), &[]);
        assert_eq!(scores.get(Archetype::Professional), 10);
        assert_eq!(scores.get(Archetype::Mysterious), 5);

        // 2 + 1 + 1 + 1 = 5: not neutral
        let f = face(
            Likelihood::Unlikely,
            Likelihood::VeryUnlikely,
            Likelihood::VeryUnlikely,
            Likelihood::VeryUnlikely,
        );
        let scores = score(Some(&f), &LabelSignal::new(), &[]);
        assert_eq!(scores.get(Archetype::Professional), 0);
        assert_eq!(scores.get(Archetype::Mysterious), 0);
    }

    #[test]
    fn test_mixed_joy_and_sorrow_is_duality() {
        let f = face(Likelihood::Possible, Likelihood::Possible, Likelihood::Unknown, Likelihood::Unknown);
        let scores = score(Some(&f), &LabelSignal::new(), &[]);

        assert_eq!(scores.get(Archetype::Duality), 15);
        // sorrow=POSSIBLE also fires the anxious rule
        assert_eq!(scores.get(Archetype::Anxious), 15);
        // sum 3 + 3 = 6 > 4
        assert_eq!(scores.get(Archetype::Professional), 0);
    }

    #[test]
    fn test_each_matching_label_adds_full_increment() {
        let labels: LabelSignal = ["sky", "crowd", "outdoor", "Sky"].into_iter().collect();
        let scores = score(None, &labels, &[]);
        assert_eq!(scores.get(Archetype::Chaotic), 15);
    }

    #[test]
    fn test_label_groups() {
        let labels: LabelSignal = ["Sunglasses", "night", "cafe", "book", "building", "tree"]
            .into_iter()
            .collect();
        let scores = score(None, &labels, &[]);

        assert_eq!(scores.get(Archetype::Professional), 15);
        assert_eq!(scores.get(Archetype::Mysterious), 10);
        assert_eq!(scores.get(Archetype::Hedonist), 5);
        assert_eq!(scores.get(Archetype::Duality), 5);
        assert_eq!(scores.get(Archetype::Chaotic), 0);
        assert_eq!(scores.get(Archetype::Anxious), 0);
    }

    #[test]
    fn test_warm_palette_threshold_is_strict() {
        let half = [ColorSample::new(200.0, 10.0, 10.0, 0.5)];
        assert_eq!(score(None, &LabelSignal::new(), &half).get(Archetype::Chaotic), 0);

        let split = [
            ColorSample::new(200.0, 10.0, 10.0, 0.3),
            ColorSample::new(150.0, 100.0, 20.0, 0.25),
        ];
        assert_eq!(score(None, &LabelSignal::new(), &split).get(Archetype::Chaotic), 10);
    }

    #[test]
    fn test_cool_palette_is_professional() {
        let colors = [
            ColorSample::new(20.0, 40.0, 180.0, 0.4),
            ColorSample::new(60.0, 200.0, 90.0, 0.3),
            ColorSample::new(10.0, 10.0, 30.0, 0.2),
        ];
        let scores = score(None, &LabelSignal::new(), &colors);
        assert_eq!(scores.get(Archetype::Professional), 10);
        assert_eq!(scores.get(Archetype::Chaotic), 0);
    }

    #[test]
    fn test_inconsistent_palette_fires_both_color_rules() {
        // Fractions summing past 1 let both independent checks pass
        let colors = [
            ColorSample::new(200.0, 10.0, 10.0, 0.6),
            ColorSample::new(10.0, 10.0, 200.0, 0.6),
        ];
        let scores = score(None, &LabelSignal::new(), &colors);
        assert_eq!(scores.get(Archetype::Chaotic), 10);
        assert_eq!(scores.get(Archetype::Professional), 10);
    }

    #[test]
    fn test_select_all_zero_is_mysterious() {
        assert_eq!(select(&ArchetypeScores::new()), Archetype::Mysterious);
    }

    #[test]
    fn test_select_strict_maximum() {
        for winner in Archetype::ALL {
            let mut scores = ArchetypeScores::new();
            for other in Archetype::ALL {
                scores.add(other, 5);
            }
            scores.add(winner, 1);
            assert_eq!(select(&scores), winner);
        }
    }

    #[test]
    fn test_select_tie_goes_to_earlier_archetype() {
        let mut scores = ArchetypeScores::new();
        scores.add(Archetype::Duality, 15);
        scores.add(Archetype::Anxious, 15);
        scores.add(Archetype::Hedonist, 15);

        for _ in 0..10 {
            assert_eq!(select(&scores), Archetype::Anxious);
        }

        scores.add(Archetype::Chaotic, 15);
        assert_eq!(select(&scores), Archetype::Chaotic);
    }

    #[test]
    fn test_pick_returns_matching_archetype() {
        let catalog = CharacterCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);

        for archetype in Archetype::ALL {
            for _ in 0..20 {
                assert_eq!(pick(&catalog, archetype, &mut rng).archetype, archetype);
            }
        }
    }

    #[test]
    fn test_pick_reaches_every_candidate() {
        let catalog = CharacterCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(42);

        let mut seen: Vec<&str> = (0..200)
            .map(|_| pick(&catalog, Archetype::Chaotic, &mut rng).id)
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec!["beam", "denji", "pochita", "power"]);
    }

    #[test]
    fn test_pick_is_reproducible_with_same_seed() {
        let catalog = CharacterCatalog::builtin();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| pick(&catalog, Archetype::Professional, &mut rng).id)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }

    #[test]
    fn test_pick_falls_back_without_candidates() {
        let catalog = CharacterCatalog::from_records(&[]);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(pick(&catalog, Archetype::Chaotic, &mut rng).id, "pochita");
        assert_eq!(pick(&catalog, Archetype::Hedonist, &mut rng).id, "makima");
    }

    #[test]
    fn test_classify_chains_all_steps() {
        let signals = VisionSignals {
            face: None,
            labels: ["night"].into_iter().collect(),
            colors: Vec::new(),
        };
        let mut rng = StdRng::seed_from_u64(9);
        let result = classify(&signals, &CharacterCatalog::builtin(), &mut rng);

        assert_eq!(result.scores.get(Archetype::Mysterious), 10);
        assert_eq!(result.archetype, Archetype::Mysterious);
        assert_eq!(result.character.archetype, Archetype::Mysterious);
    }
}
