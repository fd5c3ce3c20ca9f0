//! Value types that mirror the ISLE pronunciation dictionary line format.
//!
//! One dictionary line describes a [`Word`]: its orthography, an ordered list
//! of [`PartOfSpeech`] tags, an optional morpheme decomposition, and one or
//! more [`Pronunciation`]s. A pronunciation is a sequence of [`Syllable`]s, a
//! syllable a sequence of [`Phone`]s. Everything here is an immutable value;
//! construction validates the invariants the file format relies on, and
//! every type renders back to the exact textual form the parser accepts.
//!
//! Stress can be written two ways, selected per dictionary source with
//! [`Transcription`]: embedded IPA diacritics (`ˈa`, `ˌɪ`) or trailing ASCII
//! markers (`a'`, `@,`). Both parse into the same [`PhoneKind`].
//!
//! ```rust
//! use islex_types::{PartOfSpeech, PartOfSpeechCategory, Pronunciation, Transcription};
//!
//! let pron = Pronunciation::parse("d ˌʌ . b ə l", Transcription::Diacritic, false).unwrap();
//! assert_eq!(pron.ipa(), vec!["d", "ˌʌ", "b", "ə", "l"]);
//!
//! let pos = PartOfSpeech::from_tag("nnp_person").unwrap();
//! assert_eq!(pos.category(), PartOfSpeechCategory::Nnp);
//! assert_eq!(pos.to_string(), "nnp_person");
//! ```

mod phonetic;
mod pos;
mod word;

pub use phonetic::{
    PRIMARY_DIACRITIC, PRIMARY_SUFFIX, Phone, PhoneKind, Pronunciation, SECONDARY_DIACRITIC,
    SECONDARY_SUFFIX, SYLLABLE_DELIMITER, Stress, Syllable, Transcription,
};
pub use pos::{EntityCategory, PartOfSpeech, PartOfSpeechCategory};
pub use word::{EntryClass, Word};

use thiserror::Error;

/// Everything that can go wrong turning dictionary text into values.
///
/// All variants are deterministic given the same input and options.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("malformed entry: {0}")]
    MalformedEntry(String),
    #[error("malformed syllable {0:?}")]
    MalformedSyllable(String),
    #[error("malformed phone {0:?}")]
    MalformedPhone(String),
    #[error("unknown part-of-speech tag {0:?}")]
    UnknownPosTag(String),
    #[error("unknown entity type {0:?}")]
    UnknownEntityType(String),
    #[error("entity type {entity} is only valid on nnp/nnps, not {category}")]
    EntityOnNonProperNoun {
        category: PartOfSpeechCategory,
        entity: EntityCategory,
    },
}
