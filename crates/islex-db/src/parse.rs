use std::borrow::Cow;
use std::sync::LazyLock;

use islex_normalize::normalize_traced;
use islex_types::{ParseError, PartOfSpeech, Pronunciation, Transcription, Word};
use regex::Regex;
use tracing::trace;

static ORTHO_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^(]+?)\((.*)\)\s*$").expect("orthography pattern compiles"));

const SECTION_SEPARATOR: char = '#';
const TAG_SEPARATOR: char = ',';
const MORPHEME_MARKER: char = '+';

/// How a dictionary source should be read.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParseOptions {
    /// Repair known tag and transcription defects (raw ISLE dumps need this).
    pub clean: bool,
    pub transcription: Transcription,
}

impl ParseOptions {
    /// Options for a raw source that needs tag normalization.
    pub fn clean() -> Self {
        Self {
            clean: true,
            ..Self::default()
        }
    }
}

/// Parse one dictionary line using the IPA diacritic transcription.
pub fn parse_line(line: &str, clean: bool) -> Result<Word, ParseError> {
    parse_line_with(
        line,
        &ParseOptions {
            clean,
            ..ParseOptions::default()
        },
    )
}

/// Parse one dictionary line: `ortho(tag,tag,+morph+morph) # pron # pron #`.
pub fn parse_line_with(line: &str, options: &ParseOptions) -> Result<Word, ParseError> {
    let line = line.trim_end();
    let mut sections: Vec<&str> = line.split(SECTION_SEPARATOR).collect();
    while sections.last().is_some_and(|s| s.trim().is_empty()) {
        sections.pop();
    }
    if sections.len() < 2 {
        return Err(ParseError::MalformedEntry(format!(
            "{line:?} needs an orthography and at least one pronunciation"
        )));
    }

    let (orthography, tags) = split_orthography(sections[0])?;
    let (parts_of_speech, morphemes) = parse_tags(tags, options.clean)?;
    let pronunciations = sections[1..]
        .iter()
        .map(|section| Pronunciation::parse(section, options.transcription, options.clean))
        .collect::<Result<Vec<_>, _>>()?;

    Word::new(orthography, parts_of_speech, morphemes, pronunciations)
}

fn split_orthography(section: &str) -> Result<(&str, &str), ParseError> {
    let caps = ORTHO_SECTION.captures(section).ok_or_else(|| {
        ParseError::MalformedEntry(format!("{section:?} is not of the form ortho(tags)"))
    })?;
    let (Some(orthography), Some(tags)) = (caps.get(1), caps.get(2)) else {
        return Err(ParseError::MalformedEntry(format!(
            "{section:?} is not of the form ortho(tags)"
        )));
    };
    if tags.as_str().contains(['(', ')']) {
        return Err(ParseError::MalformedEntry(format!(
            "unbalanced parenthesis in {section:?}"
        )));
    }
    Ok((orthography.as_str(), tags.as_str()))
}

fn parse_tags(tags: &str, clean: bool) -> Result<(Vec<PartOfSpeech>, Vec<String>), ParseError> {
    let mut parts_of_speech = Vec::new();
    let mut morphemes: Option<Vec<String>> = None;

    for raw in tags.split(TAG_SEPARATOR).map(str::trim) {
        if raw.is_empty() {
            continue;
        }
        let tag = if clean {
            let normalized = normalize_traced(raw);
            if !normalized.applied.is_empty() {
                trace!(raw, tag = %normalized.tag, rules = ?normalized.applied, "normalized tag");
            }
            normalized.tag
        } else {
            Cow::Borrowed(raw)
        };

        if let Some(decomposition) = tag.strip_prefix(MORPHEME_MARKER) {
            if morphemes.is_some() {
                return Err(ParseError::MalformedEntry(format!(
                    "more than one morpheme decomposition in ({tags})"
                )));
            }
            morphemes = Some(
                decomposition
                    .split(MORPHEME_MARKER)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        } else {
            parts_of_speech.push(PartOfSpeech::from_tag(&tag)?);
        }
    }

    Ok((parts_of_speech, morphemes.unwrap_or_default()))
}
