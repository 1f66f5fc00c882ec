//! Fixed character catalog
//!
//! Fourteen immutable records, each tagged with one archetype. The builtin table is
//! a plain static; nothing mutates it after process start.

use serde::Serialize;

use crate::archetype::Archetype;
use crate::{Error, Result};

/// One selectable character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharacterRecord {
    /// Catalog key, also the image file stem
    #[serde(skip)]
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    pub archetype: Archetype,
    /// Flavor text explaining the match
    pub reason: &'static str,
    pub image_url: &'static str,
}

const fn record(
    id: &'static str,
    name: &'static str,
    archetype: Archetype,
    reason: &'static str,
    image_url: &'static str,
) -> CharacterRecord {
    CharacterRecord { id, name, archetype, reason, image_url }
}

const POCHITA: CharacterRecord = record(
    "pochita",
    "포치타",
    Archetype::Chaotic,
    "세상에서 가장 귀여운 혼돈을 보여줘요!",
    "/static/pochita.jpg",
);

const MAKIMA: CharacterRecord = record(
    "makima",
    "마키마",
    Archetype::Mysterious,
    "속을 알 수 없는 신비로운 분위기가 느껴져요.",
    "/static/makima.jpg",
);

static CHARACTERS: [CharacterRecord; 14] = [
    record("denji", "덴지", Archetype::Chaotic, "밝고 즐거운 에너지가 넘쳐요!", "/static/denji.jpg"),
    record("power", "파워", Archetype::Chaotic, "강렬하고 예측할 수 없는 매력이 있어요!", "/static/power.jpg"),
    record("beam", "빔", Archetype::Chaotic, "맹목적일 정도의 순수한 열정이 느껴져요!", "/static/beam.jpg"),
    POCHITA,
    record("aki", "아키", Archetype::Professional, "차분하고 깊은 감성이 느껴져요.", "/static/aki.jpg"),
    record("kishibe", "키시베", Archetype::Professional, "모든 걸 꿰뚫어 보는 듯한 관록이 있어요.", "/static/kishibe.jpg"),
    record("quanxi", "콴시", Archetype::Professional, "나른함 속에 숨겨진 최강의 실력자 같아요.", "/static/quanxi.jpg"),
    MAKIMA,
    record("yoshida", "요시다", Archetype::Mysterious, "미소 뒤에 무언가 숨기고 있는 것 같아요.", "/static/yoshida.jpg"),
    record("kobeni", "코베니", Archetype::Anxious, "어딘가 모르게 지켜주고 싶은 불안함이 보여요.", "/static/kobeni.jpg"),
    record("himeno", "히메노", Archetype::Hedonist, "체념한 듯한 어른의 매력이 느껴져요.", "/static/himeno.jpg"),
    record("angel", "엔젤", Archetype::Hedonist, "모든 게 귀찮은 듯한 나른함이 매력적이에요.", "/static/angel.jpg"),
    record("reze", "레제", Archetype::Duality, "순수한 모습 뒤에 다른 얼굴이 숨어있을 것 같아요.", "/static/reze.jpg"),
    record("asa", "아사", Archetype::Duality, "평범한 일상 속, 특별한 비밀을 간직하고 있군요.", "/static/asa.jpg"),
];

/// Read-only view over a set of character records
#[derive(Debug, Clone, Copy)]
pub struct CharacterCatalog {
    records: &'static [CharacterRecord],
}

impl CharacterCatalog {
    /// The fixed fourteen-character table
    pub fn builtin() -> Self {
        Self { records: &CHARACTERS }
    }

    /// Catalog over arbitrary static records (used to exercise fallback paths)
    pub fn from_records(records: &'static [CharacterRecord]) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CharacterRecord> {
        self.records.iter()
    }

    /// Look up a record by catalog id
    pub fn get(&self, id: &str) -> Option<&'static CharacterRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// All records tagged with `archetype`, in catalog order
    pub fn candidates(&self, archetype: Archetype) -> Result<Vec<&'static CharacterRecord>> {
        let candidates: Vec<_> = self.records.iter().filter(|r| r.archetype == archetype).collect();
        if candidates.is_empty() {
            return Err(Error::NoCandidatesForArchetype(archetype));
        }
        Ok(candidates)
    }

    /// Fixed pick used when an archetype has no candidates
    ///
    /// Prefers this catalog's own "pochita"/"makima" entry, falling back to the builtin one.
    pub fn fallback(&self, archetype: Archetype) -> &'static CharacterRecord {
        let default = match archetype {
            Archetype::Chaotic => &POCHITA,
            _ => &MAKIMA,
        };
        self.get(default.id).unwrap_or(default)
    }
}

impl Default for CharacterCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_fourteen_unique_ids() {
        let catalog = CharacterCatalog::builtin();
        assert_eq!(catalog.len(), 14);

        let mut ids: Vec<&str> = catalog.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 14);
    }

    #[test]
    fn test_archetype_distribution() {
        let catalog = CharacterCatalog::builtin();
        let count = |a| catalog.candidates(a).map(|c| c.len()).unwrap_or(0);

        assert_eq!(count(Archetype::Chaotic), 4);
        assert_eq!(count(Archetype::Professional), 3);
        assert_eq!(count(Archetype::Mysterious), 2);
        assert_eq!(count(Archetype::Anxious), 1);
        assert_eq!(count(Archetype::Hedonist), 2);
        assert_eq!(count(Archetype::Duality), 2);
    }

    #[test]
    fn test_record_text_is_exact() {
        let catalog = CharacterCatalog::builtin();

        let denji = catalog.get("denji").unwrap();
        assert_eq!(denji.name, "덴지");
        assert_eq!(denji.reason, "밝고 즐거운 에너지가 넘쳐요!");

        let makima = catalog.get("makima").unwrap();
        assert_eq!(makima.name, "마키마");
        assert_eq!(makima.reason, "속을 알 수 없는 신비로운 분위기가 느껴져요.");

        assert_eq!(catalog.get("kobeni").unwrap().name, "코베니");
    }

    #[test]
    fn test_image_url_matches_id() {
        for record in CharacterCatalog::builtin().iter() {
            assert_eq!(record.image_url, format!("/static/{}.jpg", record.id));
        }
    }

    #[test]
    fn test_candidates_empty_is_error() {
        static ONLY_KOBENI: [CharacterRecord; 1] = [record(
            "kobeni",
            "코베니",
            Archetype::Anxious,
            "",
            "/static/kobeni.jpg",
        )];
        let catalog = CharacterCatalog::from_records(&ONLY_KOBENI);

        let err = catalog.candidates(Archetype::Hedonist).unwrap_err();
        assert!(matches!(err, Error::NoCandidatesForArchetype(Archetype::Hedonist)));
    }

    #[test]
    fn test_fallback_ids() {
        let catalog = CharacterCatalog::builtin();
        assert_eq!(catalog.fallback(Archetype::Chaotic).id, "pochita");
        assert_eq!(catalog.fallback(Archetype::Anxious).id, "makima");
        assert_eq!(CharacterCatalog::from_records(&[]).fallback(Archetype::Duality).id, "makima");
    }
}
