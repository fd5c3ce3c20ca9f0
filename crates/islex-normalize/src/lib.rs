//! Repair known-bad part-of-speech tag spellings before lookup.
//!
//! The ISLE source vocabulary was tagged by several hands and tools, so the
//! same category shows up under typos, confidence-scored variants and
//! free-text annotations. [`normalize`] rewrites a raw tag token into the
//! canonical token a tag lookup understands. It never fails: tokens no rule
//! covers come back untouched.
//!
//! # How it works
//! Rules run in a fixed order, each on the output of the previous one,
//! comparing against the lowercased token:
//! 1. Strip trailing confidence scores (`nn_0.85` → `nn`).
//! 2. Fold country variants to `nnp_country`.
//! 3. Fix exact typos and mis-rooted tokens (`bvd` → `vbd`, `root_jj` → `jj`).
//! 4. Map `root:` annotations to `uh` (`root:noun` → `nn`).
//! 5. Map abbreviation descriptions and `+abbreviation` to `abbreviation`.
//! 6. Map `misspelling` annotations to `fw`.
//!
//! Every rule's output is a canonical token no rule matches, so normalizing
//! twice gives the same result as normalizing once.
//!
//! # Example
//! ```rust
//! use islex_normalize::{Rule, normalize, normalize_traced};
//!
//! assert_eq!(normalize("+abbreviation"), "abbreviation");
//! assert_eq!(normalize("vbd"), "vbd");
//!
//! let traced = normalize_traced("countries_0.5");
//! assert_eq!(traced.tag, "nnp_country");
//! assert_eq!(traced.applied, vec![Rule::ConfidenceScore, Rule::Country]);
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static CONFIDENCE_SCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:_\d\.\d+)+$").expect("confidence score pattern compiles"));

const COUNTRY_TAG: &str = "nnp_country";
const COUNTRY_VARIANTS: &[&str] = &[
    "country",
    "countries",
    "nnp_countries",
    "nnp_country_name",
    "nnp_nation",
    "nnp_nations",
];

const TYPOS: &[(&str, &str)] = &[
    ("bvd", "vbd"),
    ("nsn", "nns"),
    ("nnss", "nns"),
    ("root_jj", "jj"),
    ("root_vb", "vb"),
];

const ROOT_PREFIX: &str = "root:";
const ROOT_NOUN: &str = "root:noun";
const DISCOURSE_TAG: &str = "uh";
const NOUN_TAG: &str = "nn";

const ABBREVIATION_TAG: &str = "abbreviation";
const ABBREVIATION_ALIASES: &[&str] = &["abbrev", "acronym"];
const ABBREVIATION_MORPH: &str = "+abbreviation";

const MISSPELLING_PREFIX: &str = "misspelling";
const FOREIGN_WORD_TAG: &str = "fw";

/// Which rewrite touched a tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rule {
    ConfidenceScore,
    Country,
    Typo {
        from: &'static str,
        to: &'static str,
    },
    Root,
    Abbreviation,
    Misspelling,
}

/// A normalized tag with the rules that produced it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Normalized<'a> {
    pub tag: Cow<'a, str>,
    pub applied: Vec<Rule>,
}

/// Rewrite `raw` to its canonical tag, or return it unchanged.
pub fn normalize(raw: &str) -> Cow<'_, str> {
    normalize_traced(raw).tag
}

/// Like [`normalize`], also reporting which rules fired, in order.
pub fn normalize_traced(raw: &str) -> Normalized<'_> {
    let mut current = raw.to_ascii_lowercase();
    let mut applied = Vec::new();

    if let Some(found) = CONFIDENCE_SCORE.find(&current) {
        let start = found.start();
        current.truncate(start);
        applied.push(Rule::ConfidenceScore);
    }

    if COUNTRY_VARIANTS.contains(&current.as_str()) {
        current = COUNTRY_TAG.to_string();
        applied.push(Rule::Country);
    }

    if let Some(&(from, to)) = TYPOS.iter().find(|(from, _)| *from == current) {
        current = to.to_string();
        applied.push(Rule::Typo { from, to });
    }

    if current.starts_with(ROOT_PREFIX) {
        current = if current == ROOT_NOUN {
            NOUN_TAG
        } else {
            DISCOURSE_TAG
        }
        .to_string();
        applied.push(Rule::Root);
    }

    if ABBREVIATION_ALIASES.contains(&current.as_str()) || current.starts_with(ABBREVIATION_MORPH)
    {
        current = ABBREVIATION_TAG.to_string();
        applied.push(Rule::Abbreviation);
    }

    if current.starts_with(MISSPELLING_PREFIX) {
        current = FOREIGN_WORD_TAG.to_string();
        applied.push(Rule::Misspelling);
    }

    let tag = if applied.is_empty() {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(current)
    };
    Normalized { tag, applied }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COVERED: &[&str] = &[
        "nn_0.85",
        "NN_0.5_0.75",
        "country",
        "Countries",
        "nnp_country_name",
        "nnp_nation_0.9",
        "bvd",
        "nsn",
        "nnss",
        "root_jj",
        "root_vb",
        "root:noun",
        "root:verb",
        "root:",
        "abbrev",
        "acronym",
        "+abbreviation",
        "+abbreviation+s",
        "misspelling",
        "misspelling_of_their",
    ];

    #[test]
    fn strips_confidence_scores() {
        assert_eq!(normalize("nn_0.85"), "nn");
        assert_eq!(normalize("vbz_1.0"), "vbz");
        assert_eq!(normalize("nn_0.5_0.75"), "nn");
        assert_eq!(normalize("nn_10"), "nn_10");
    }

    #[test]
    fn folds_countries() {
        for raw in COUNTRY_VARIANTS {
            assert_eq!(normalize(raw), COUNTRY_TAG);
        }
        assert_eq!(normalize("nnp_country"), "nnp_country");
    }

    #[test]
    fn fixes_typos() {
        assert_eq!(normalize("bvd"), "vbd");
        assert_eq!(normalize("nsn"), "nns");
        assert_eq!(normalize("nnss"), "nns");
        assert_eq!(normalize("root_jj"), "jj");
        assert_eq!(normalize("root_vb"), "vb");
    }

    #[test]
    fn maps_root_annotations() {
        assert_eq!(normalize("root:noun"), "nn");
        assert_eq!(normalize("root:interjection"), "uh");
        assert_eq!(normalize("ROOT:Noun"), "nn");
    }

    #[test]
    fn maps_abbreviations_and_misspellings() {
        assert_eq!(normalize("abbrev"), "abbreviation");
        assert_eq!(normalize("acronym"), "abbreviation");
        assert_eq!(normalize("+abbreviation"), "abbreviation");
        assert_eq!(normalize("misspelling:teh"), "fw");
    }

    #[test]
    fn leaves_unknown_tags_borrowed() {
        let out = normalize("Vbd");
        assert!(matches!(out, Cow::Borrowed("Vbd")));
        assert!(matches!(normalize("+foo+ed"), Cow::Borrowed(_)));
        assert!(normalize_traced("nnp_person").applied.is_empty());
    }

    #[test]
    fn is_idempotent() {
        for raw in COVERED {
            let once = normalize(raw).into_owned();
            let twice = normalize(&once).into_owned();
            assert_eq!(once, twice, "normalize not idempotent for {raw}");
            assert!(normalize_traced(&once).applied.is_empty(), "{raw} -> {once}");
        }
    }

    #[test]
    fn reports_provenance() {
        let traced = normalize_traced("bvd");
        assert_eq!(
            traced.applied,
            vec![Rule::Typo {
                from: "bvd",
                to: "vbd"
            }]
        );
    }
}
