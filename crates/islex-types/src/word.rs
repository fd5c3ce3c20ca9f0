use std::fmt;

use crate::{ParseError, PartOfSpeech, Pronunciation};

// Characters that would change how a rendered line splits back apart.
const ORTHOGRAPHY_RESERVED: &[char] = &['(', '#', '\n', '\r'];
const MORPHEME_RESERVED: &[char] = &['+', ',', '#', '(', ')'];

/// Output dataset a word belongs to when a dictionary is split.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EntryClass {
    Core,
    Entity,
    /// Marginal entries with neither tags nor morphemes.
    Periphery,
}

impl EntryClass {
    pub const ALL: [EntryClass; 3] = [EntryClass::Core, EntryClass::Entity, EntryClass::Periphery];
}

impl fmt::Display for EntryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryClass::Core => "core",
            EntryClass::Entity => "entity",
            EntryClass::Periphery => "periphery",
        })
    }
}

/// A parsed dictionary entry.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Word {
    orthography: String,
    parts_of_speech: Vec<PartOfSpeech>,
    morphemes: Vec<String>,
    pronunciations: Vec<Pronunciation>,
}

impl Word {
    /// Assemble a word; at least one pronunciation is required.
    ///
    /// The orthography and every morpheme must be non-empty and free of the
    /// delimiters the line format uses around them, so that [`Word::render`]
    /// parses back to the same word.
    pub fn new(
        orthography: impl Into<String>,
        parts_of_speech: Vec<PartOfSpeech>,
        morphemes: Vec<String>,
        pronunciations: Vec<Pronunciation>,
    ) -> Result<Self, ParseError> {
        let orthography = orthography.into();
        if orthography.is_empty() || orthography.contains(ORTHOGRAPHY_RESERVED) {
            return Err(ParseError::MalformedEntry(format!(
                "invalid orthography {orthography:?}"
            )));
        }
        if let Some(bad) = morphemes
            .iter()
            .find(|m| m.is_empty() || m.contains(MORPHEME_RESERVED))
        {
            return Err(ParseError::MalformedEntry(format!(
                "invalid morpheme {bad:?} in {orthography:?}"
            )));
        }
        if pronunciations.is_empty() {
            return Err(ParseError::MalformedEntry(format!(
                "{orthography:?} has no pronunciation"
            )));
        }
        Ok(Self {
            orthography,
            parts_of_speech,
            morphemes,
            pronunciations,
        })
    }

    pub fn orthography(&self) -> &str {
        &self.orthography
    }

    pub fn parts_of_speech(&self) -> &[PartOfSpeech] {
        &self.parts_of_speech
    }

    pub fn morphemes(&self) -> &[String] {
        &self.morphemes
    }

    pub fn pronunciations(&self) -> &[Pronunciation] {
        &self.pronunciations
    }

    /// Phone texts of the first pronunciation.
    pub fn ipa(&self) -> Vec<&str> {
        self.pronunciations[0].ipa()
    }

    /// Which split dataset this word is written to.
    ///
    /// A word tagged only with morphemes counts as an entity.
    pub fn class(&self) -> EntryClass {
        if self.parts_of_speech.is_empty() && self.morphemes.is_empty() {
            EntryClass::Periphery
        } else if self
            .parts_of_speech
            .iter()
            .all(|pos| pos.category().is_entity_like())
        {
            EntryClass::Entity
        } else {
            EntryClass::Core
        }
    }

    /// Dictionary line for this word, without a trailing newline.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.orthography)?;
        let mut first = true;
        if !self.morphemes.is_empty() {
            write!(f, "+{}", self.morphemes.join("+"))?;
            first = false;
        }
        for pos in &self.parts_of_speech {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{pos}")?;
            first = false;
        }
        f.write_str(")")?;
        for pron in &self.pronunciations {
            write!(f, " # {pron}")?;
        }
        f.write_str(" #")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityCategory, PartOfSpeechCategory, Transcription};

    fn pron(text: &str) -> Pronunciation {
        Pronunciation::parse(text, Transcription::Diacritic, false).unwrap()
    }

    #[test]
    fn requires_a_pronunciation() {
        assert!(matches!(
            Word::new("foo", Vec::new(), Vec::new(), Vec::new()),
            Err(ParseError::MalformedEntry(_))
        ));
    }

    #[test]
    fn rejects_orthography_that_would_not_round_trip() {
        for ortho in ["", "a(b", "a#b", "line\nbreak", "cr\r"] {
            assert!(
                matches!(
                    Word::new(ortho, Vec::new(), Vec::new(), vec![pron("f ˈu")]),
                    Err(ParseError::MalformedEntry(_))
                ),
                "{ortho:?} accepted"
            );
        }
        let spaced = Word::new("New York", Vec::new(), Vec::new(), vec![pron("n ˈu")]).unwrap();
        assert_eq!(spaced.render(), "New York() # n ˈu #");
    }

    #[test]
    fn rejects_morphemes_that_would_not_round_trip() {
        for morpheme in ["", "a+b", "a,b", "a#b", "(a", "a)"] {
            let result = Word::new(
                "foo",
                Vec::new(),
                vec!["foo".into(), morpheme.into()],
                vec![pron("f ˈu")],
            );
            assert!(
                matches!(result, Err(ParseError::MalformedEntry(_))),
                "{morpheme:?} accepted"
            );
        }
    }

    #[test]
    fn classifies_words() {
        let periphery = Word::new("foo", Vec::new(), Vec::new(), vec![pron("f ˈu")]).unwrap();
        assert_eq!(periphery.class(), EntryClass::Periphery);

        let entity = Word::new(
            "007",
            vec![
                PartOfSpeech::new(PartOfSpeechCategory::Abbreviation),
                PartOfSpeech::with_entity(PartOfSpeechCategory::Nnp, EntityCategory::Person)
                    .unwrap(),
            ],
            Vec::new(),
            vec![pron("d ˌʌ")],
        )
        .unwrap();
        assert_eq!(entity.class(), EntryClass::Entity);

        let morph_only = Word::new(
            "fooed",
            Vec::new(),
            vec!["foo".into(), "ed".into()],
            vec![pron("f ˈu d")],
        )
        .unwrap();
        assert_eq!(morph_only.class(), EntryClass::Entity);

        let core = Word::new(
            "paris",
            vec![
                PartOfSpeech::with_entity(PartOfSpeechCategory::Nnp, EntityCategory::City).unwrap(),
                PartOfSpeech::new(PartOfSpeechCategory::Nns),
            ],
            Vec::new(),
            vec![pron("p ˈæ . ɹ ɪ s")],
        )
        .unwrap();
        assert_eq!(core.class(), EntryClass::Core);
    }

    #[test]
    fn renders_line_with_morphemes_first() {
        let word = Word::new(
            "fooed",
            vec![PartOfSpeech::new(PartOfSpeechCategory::Vbd)],
            vec!["foo".into(), "ed".into()],
            vec![pron("f ˈu d"), pron("f ˈu . ə d")],
        )
        .unwrap();
        assert_eq!(word.render(), "fooed(+foo+ed,vbd) # f ˈu d # f ˈu . ə d #");
        assert_eq!(word.ipa(), vec!["f", "ˈu", "d"]);
    }
}
