use std::borrow::Cow;
use std::fmt;

use crate::ParseError;

/// Trailing marker for primary stress in ASCII transcriptions.
pub const PRIMARY_SUFFIX: char = '\'';
/// Trailing marker for secondary stress in ASCII transcriptions.
pub const SECONDARY_SUFFIX: char = ',';
/// IPA primary stress mark, embedded in the phone text.
pub const PRIMARY_DIACRITIC: char = 'ˈ';
/// IPA secondary stress mark, embedded in the phone text.
pub const SECONDARY_DIACRITIC: char = 'ˌ';
/// Separator between syllables inside one pronunciation.
pub const SYLLABLE_DELIMITER: &str = " . ";

const ASCII_SYLLABIC: char = '=';
const ASCII_VOWEL_MARKS: &[char] = &['@', '&', '^'];
const IPA_SYLLABIC: char = '\u{0329}';
const IPA_VOWELS: &[char] = &[
    'a', 'e', 'i', 'o', 'u', 'y', 'æ', 'ø', 'œ', 'ɐ', 'ɑ', 'ɒ', 'ɔ', 'ɘ', 'ə', 'ɚ', 'ɛ', 'ɜ', 'ɝ',
    'ɞ', 'ɤ', 'ɨ', 'ɪ', 'ɯ', 'ɵ', 'ɶ', 'ʉ', 'ʊ', 'ʌ', 'ʏ',
];
// Nasalized ɛ only shows up in loanwords; clean mode folds it to plain ɛ.
const NASALIZED: &str = "\u{025B}\u{0303}";
const DENASALIZED: &str = "\u{025B}";

/// How stress is written in a dictionary source.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Transcription {
    /// IPA with `ˈ`/`ˌ` embedded in the phone text (`ˈu`, `ˌɪ`).
    #[default]
    Diacritic,
    /// ASCII phones with a trailing `'` or `,` (`u'`, `@,`).
    Suffix,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Stress {
    Primary,
    Secondary,
    Unstressed,
}

/// Consonant or vowel, with stress for vowels.
///
/// Vowel detection is a character-membership heuristic, not phonology: an
/// unstressed vowel written with an unusual symbol is reported as a consonant.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PhoneKind {
    Consonant,
    Vowel(Stress),
}

/// A single phonetic symbol.
///
/// `text` is the base symbol used for comparison and indexing. For
/// [`Transcription::Suffix`] sources the stress marker is stripped from it;
/// for [`Transcription::Diacritic`] sources it is kept verbatim.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Phone {
    text: String,
    kind: PhoneKind,
}

impl Phone {
    /// Build a phone; `text` must be non-empty and free of whitespace.
    pub fn new(text: impl Into<String>, kind: PhoneKind) -> Result<Self, ParseError> {
        let text = text.into();
        if text.is_empty() || text.contains(char::is_whitespace) {
            return Err(ParseError::MalformedPhone(text));
        }
        Ok(Self { text, kind })
    }

    /// Classify one whitespace-free phone token.
    ///
    /// A suffix token with nothing before its stress marker is rejected.
    pub fn parse(token: &str, transcription: Transcription) -> Result<Self, ParseError> {
        let (text, kind) = match transcription {
            Transcription::Suffix => {
                if let Some(base) = token.strip_suffix(PRIMARY_SUFFIX) {
                    (base, PhoneKind::Vowel(Stress::Primary))
                } else if let Some(base) = token.strip_suffix(SECONDARY_SUFFIX) {
                    (base, PhoneKind::Vowel(Stress::Secondary))
                } else if token.contains(ASCII_SYLLABIC) || token.contains(ASCII_VOWEL_MARKS) {
                    (token, PhoneKind::Vowel(Stress::Unstressed))
                } else {
                    (token, PhoneKind::Consonant)
                }
            }
            Transcription::Diacritic => {
                let kind = if token.contains(PRIMARY_DIACRITIC) {
                    PhoneKind::Vowel(Stress::Primary)
                } else if token.contains(SECONDARY_DIACRITIC) {
                    PhoneKind::Vowel(Stress::Secondary)
                } else if token.contains(IPA_SYLLABIC) || token.contains(IPA_VOWELS) {
                    PhoneKind::Vowel(Stress::Unstressed)
                } else {
                    PhoneKind::Consonant
                };
                (token, kind)
            }
        };
        if text.is_empty() {
            return Err(ParseError::MalformedPhone(token.to_string()));
        }
        Self::new(text, kind)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> PhoneKind {
        self.kind
    }

    pub fn stress(&self) -> Option<Stress> {
        match self.kind {
            PhoneKind::Vowel(stress) => Some(stress),
            PhoneKind::Consonant => None,
        }
    }

    pub fn is_vowel(&self) -> bool {
        matches!(self.kind, PhoneKind::Vowel(_))
    }

    /// Text form as written in a source using `transcription`.
    pub fn render(&self, transcription: Transcription) -> Cow<'_, str> {
        let marker = match (transcription, self.kind) {
            (Transcription::Suffix, PhoneKind::Vowel(Stress::Primary)) => Some(PRIMARY_SUFFIX),
            (Transcription::Suffix, PhoneKind::Vowel(Stress::Secondary)) => {
                Some(SECONDARY_SUFFIX)
            }
            _ => None,
        };
        match marker {
            Some(m) => Cow::Owned(format!("{}{m}", self.text)),
            None => Cow::Borrowed(&self.text),
        }
    }
}

/// Ordered, non-empty group of phones.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Syllable {
    phones: Vec<Phone>,
}

impl Syllable {
    /// Build from phones; fails if `phones` is empty.
    pub fn new(phones: Vec<Phone>) -> Result<Self, ParseError> {
        if phones.is_empty() {
            return Err(ParseError::MalformedSyllable(String::new()));
        }
        Ok(Self { phones })
    }

    /// Parse whitespace-separated phone tokens.
    pub fn parse(text: &str, transcription: Transcription) -> Result<Self, ParseError> {
        let phones = text
            .split_whitespace()
            .map(|token| Phone::parse(token, transcription))
            .collect::<Result<Vec<_>, _>>()?;
        if phones.is_empty() {
            return Err(ParseError::MalformedSyllable(text.to_string()));
        }
        Ok(Self { phones })
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn render(&self, transcription: Transcription) -> String {
        let rendered: Vec<Cow<'_, str>> = self
            .phones
            .iter()
            .map(|p| p.render(transcription))
            .collect();
        rendered.join(" ")
    }
}

/// One full transcription variant of a word.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pronunciation {
    syllables: Vec<Syllable>,
    transcription: Transcription,
}

impl Pronunciation {
    /// Build from syllables; fails if `syllables` is empty.
    pub fn new(syllables: Vec<Syllable>, transcription: Transcription) -> Result<Self, ParseError> {
        if syllables.is_empty() {
            return Err(ParseError::MalformedSyllable(String::new()));
        }
        Ok(Self {
            syllables,
            transcription,
        })
    }

    /// Parse syllables separated by `" . "`.
    ///
    /// With `clean`, nasalized `ɛ̃` is folded to `ɛ` before splitting.
    pub fn parse(
        text: &str,
        transcription: Transcription,
        clean: bool,
    ) -> Result<Self, ParseError> {
        let text: Cow<'_, str> = if clean && text.contains(NASALIZED) {
            Cow::Owned(text.replace(NASALIZED, DENASALIZED))
        } else {
            Cow::Borrowed(text)
        };
        let syllables = text
            .split(SYLLABLE_DELIMITER)
            .map(|segment| Syllable::parse(segment, transcription))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            syllables,
            transcription,
        })
    }

    pub fn syllables(&self) -> &[Syllable] {
        &self.syllables
    }

    pub fn transcription(&self) -> Transcription {
        self.transcription
    }

    /// Phone base texts across all syllables, in order.
    pub fn ipa(&self) -> Vec<&str> {
        self.phones().map(Phone::text).collect()
    }

    /// Phone base texts grouped by syllable.
    pub fn syllable_ipa(&self) -> Vec<Vec<&str>> {
        self.syllables
            .iter()
            .map(|s| s.phones.iter().map(Phone::text).collect())
            .collect()
    }

    pub fn phones(&self) -> impl Iterator<Item = &Phone> + '_ {
        self.syllables.iter().flat_map(|s| s.phones.iter())
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, syllable) in self.syllables.iter().enumerate() {
            if idx > 0 {
                f.write_str(SYLLABLE_DELIMITER)?;
            }
            f.write_str(&syllable.render(self.transcription))?;
        }
        Ok(())
    }
}
