use std::fmt;

use crate::ParseError;

/// Declares a closed tag enumeration whose textual form is a lowercase token.
macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $text:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Look up a member by its token, ignoring ASCII case.
            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag.to_ascii_lowercase().as_str() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Lowercase token as written in dictionary files.
            pub fn as_tag(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_tag())
            }
        }
    };
}

tag_enum! {
    /// Part-of-speech tag classes used by the dictionary.
    pub enum PartOfSpeechCategory {
        Rb => "rb",
        Rbr => "rbr",
        Rbs => "rbs",
        Nn => "nn",
        Nns => "nns",
        Jj => "jj",
        Jjr => "jjr",
        Jjs => "jjs",
        Vb => "vb",
        Vbd => "vbd",
        Vbg => "vbg",
        Vbp => "vbp",
        Vbn => "vbn",
        Vbz => "vbz",
        Nnp => "nnp",
        Nnps => "nnps",
        Ls => "ls",
        Fw => "fw",
        Uh => "uh",
        Dt => "dt",
        Ex => "ex",
        Cd => "cd",
        Md => "md",
        In => "in",
        To => "to",
        Of => "of",
        Prp => "prp",
        Cc => "cc",
        Pdt => "pdt",
        Wrb => "wrb",
        Wdt => "wdt",
        Wp => "wp",
        Rp => "rp",
        Abbreviation => "abbreviation",
        Sym => "sym",
        Punc => "punc",
    }
}

tag_enum! {
    /// Semantic subcategory carried by proper-noun tags (`nnp_person`).
    pub enum EntityCategory {
        Product => "product",
        City => "city",
        Surname => "surname",
        Event => "event",
        Country => "country",
        Continent => "continent",
        Person => "person",
        Organization => "organization",
        Company => "company",
        Place => "place",
        State => "state",
        Month => "month",
        Boyname => "boyname",
        Girlname => "girlname",
    }
}

impl PartOfSpeechCategory {
    /// Proper-noun categories, the only ones allowed an entity type.
    pub fn is_proper_noun(self) -> bool {
        matches!(self, PartOfSpeechCategory::Nnp | PartOfSpeechCategory::Nnps)
    }

    /// Categories that mark a word as a named entity or abbreviation.
    pub fn is_entity_like(self) -> bool {
        self.is_proper_noun() || self == PartOfSpeechCategory::Abbreviation
    }
}

/// One part-of-speech annotation, with an entity type for proper nouns.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PartOfSpeech {
    category: PartOfSpeechCategory,
    entity_type: Option<EntityCategory>,
}

impl PartOfSpeech {
    pub const fn new(category: PartOfSpeechCategory) -> Self {
        Self {
            category,
            entity_type: None,
        }
    }

    /// Build a proper-noun tag carrying an entity type.
    ///
    /// Fails unless `category` is `nnp` or `nnps`.
    pub fn with_entity(
        category: PartOfSpeechCategory,
        entity: EntityCategory,
    ) -> Result<Self, ParseError> {
        if !category.is_proper_noun() {
            return Err(ParseError::EntityOnNonProperNoun { category, entity });
        }
        Ok(Self {
            category,
            entity_type: Some(entity),
        })
    }

    /// Resolve a single tag token such as `vbd`, `nnp` or `nnps_country`.
    pub fn from_tag(tag: &str) -> Result<Self, ParseError> {
        let lowered = tag.to_ascii_lowercase();
        for (prefix, category) in [
            ("nnp_", PartOfSpeechCategory::Nnp),
            ("nnps_", PartOfSpeechCategory::Nnps),
        ] {
            if let Some(entity) = lowered.strip_prefix(prefix) {
                let entity = EntityCategory::from_tag(entity)
                    .ok_or_else(|| ParseError::UnknownEntityType(entity.to_string()))?;
                return Self::with_entity(category, entity);
            }
        }
        PartOfSpeechCategory::from_tag(&lowered)
            .map(Self::new)
            .ok_or_else(|| ParseError::UnknownPosTag(tag.to_string()))
    }

    pub fn category(&self) -> PartOfSpeechCategory {
        self.category
    }

    pub fn entity_type(&self) -> Option<EntityCategory> {
        self.entity_type
    }
}

impl From<PartOfSpeechCategory> for PartOfSpeech {
    fn from(category: PartOfSpeechCategory) -> Self {
        Self::new(category)
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity_type {
            Some(entity) => write!(f, "{}_{}", self.category, entity),
            None => write!(f, "{}", self.category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_plain_and_entity_tags() {
        assert_eq!(
            PartOfSpeech::from_tag("VBD").unwrap(),
            PartOfSpeech::new(PartOfSpeechCategory::Vbd)
        );
        let person = PartOfSpeech::from_tag("nnp_person").unwrap();
        assert_eq!(person.category(), PartOfSpeechCategory::Nnp);
        assert_eq!(person.entity_type(), Some(EntityCategory::Person));
        let countries = PartOfSpeech::from_tag("nnps_country").unwrap();
        assert_eq!(countries.category(), PartOfSpeechCategory::Nnps);
        assert_eq!(countries.entity_type(), Some(EntityCategory::Country));
    }

    #[test]
    fn reports_unknown_tags() {
        assert_eq!(
            PartOfSpeech::from_tag("xyz"),
            Err(ParseError::UnknownPosTag("xyz".into()))
        );
        assert_eq!(
            PartOfSpeech::from_tag("nnp_planet"),
            Err(ParseError::UnknownEntityType("planet".into()))
        );
        assert!(PartOfSpeech::from_tag("nn_0.85").is_err());
    }

    #[test]
    fn entity_only_on_proper_nouns() {
        assert!(PartOfSpeech::with_entity(PartOfSpeechCategory::Nnps, EntityCategory::City).is_ok());
        assert_eq!(
            PartOfSpeech::with_entity(PartOfSpeechCategory::Nn, EntityCategory::City),
            Err(ParseError::EntityOnNonProperNoun {
                category: PartOfSpeechCategory::Nn,
                entity: EntityCategory::City,
            })
        );
    }

    #[test]
    fn renders_tokens() {
        for category in PartOfSpeechCategory::ALL {
            let tag = category.to_string();
            assert_eq!(PartOfSpeechCategory::from_tag(&tag), Some(*category));
        }
        let pos = PartOfSpeech::with_entity(PartOfSpeechCategory::Nnp, EntityCategory::Girlname)
            .unwrap();
        assert_eq!(pos.to_string(), "nnp_girlname");
    }
}
