use islex_types::{ParseError, Word};
use thiserror::Error;
use tracing::warn;

use crate::parse::{ParseOptions, parse_line_with};

/// A line the stream could not parse and skipped.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("line {line_number}: {error}")]
pub struct LineError {
    /// 1-based position in the underlying line sequence.
    pub line_number: usize,
    pub line: String,
    #[source]
    pub error: ParseError,
}

/// Lazy, single-pass sequence of parsed words.
///
/// Every line is parsed on its own. Lines that fail, blank ones included,
/// are handed to the diagnostic sink and skipped. Output order follows
/// input order.
pub struct EntryStream<I, F> {
    lines: I,
    options: ParseOptions,
    sink: F,
    line_number: usize,
    skipped: usize,
}

impl<I, S, F> EntryStream<I, F>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(LineError),
{
    pub fn new(lines: I, options: ParseOptions, sink: F) -> Self {
        Self {
            lines,
            options,
            sink,
            line_number: 0,
            skipped: 0,
        }
    }

    /// Lines consumed so far, including skipped ones.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Lines that failed to parse so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The underlying lines, e.g. to check a file source for read errors.
    pub fn lines_mut(&mut self) -> &mut I {
        &mut self.lines
    }
}

impl<I, S, F> Iterator for EntryStream<I, F>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(LineError),
{
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;
            let text = line.as_ref();
            match parse_line_with(text, &self.options) {
                Ok(word) => return Some(word),
                Err(error) => {
                    self.skipped += 1;
                    (self.sink)(LineError {
                        line_number: self.line_number,
                        line: text.to_string(),
                        error,
                    });
                }
            }
        }
    }
}

/// Stream words from `lines` with the default transcription.
pub fn parse_stream<L, F>(lines: L, clean: bool, sink: F) -> EntryStream<L::IntoIter, F>
where
    L: IntoIterator,
    L::Item: AsRef<str>,
    F: FnMut(LineError),
{
    EntryStream::new(
        lines.into_iter(),
        ParseOptions {
            clean,
            ..ParseOptions::default()
        },
        sink,
    )
}

/// Diagnostic sink that reports skipped lines through `tracing`.
pub fn log_diagnostic(err: LineError) {
    warn!(
        line = err.line_number,
        error = %err.error,
        "skipping dictionary line: {}",
        err.line
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: &[&str] = &[
        "foo(nn)",
        "foo() # f ˈu #",
        "",
        "bar(zz) # b ˈɑ ɹ #",
        "fooed(+foo+ed,vbd) # f ˈu d #",
        "   ",
        "baz(nn,+a,+b) # b ˈæ z #",
        "Foo(nnp_surname) # f ˈu #",
    ];

    #[test]
    fn skips_and_reports_bad_lines() {
        let mut errors = Vec::new();
        let words: Vec<Word> = parse_stream(LINES, false, |e| errors.push(e)).collect();

        let orthos: Vec<&str> = words.iter().map(Word::orthography).collect();
        assert_eq!(orthos, vec!["foo", "fooed", "Foo"]);

        let reported: Vec<usize> = errors.iter().map(|e| e.line_number).collect();
        assert_eq!(reported, vec![1, 3, 4, 6, 7]);
        assert!(matches!(errors[0].error, ParseError::MalformedEntry(_)));
        assert_eq!(errors[0].line, "foo(nn)");
        assert!(matches!(errors[1].error, ParseError::MalformedEntry(_)));
        assert_eq!(errors[2].error, ParseError::UnknownPosTag("zz".into()));
        assert_eq!(errors[3].line, "   ");
    }

    #[test]
    fn counts_progress() {
        let mut stream = parse_stream(LINES.iter().map(|l| l.to_string()), false, |_| {});
        assert_eq!(stream.next().map(|w| w.orthography().to_string()), Some("foo".into()));
        assert_eq!(stream.lines_read(), 2);
        assert_eq!(stream.skipped(), 1);
        assert_eq!(stream.by_ref().count(), 2);
        assert_eq!(stream.lines_read(), LINES.len());
        assert_eq!(stream.skipped(), 5);
        assert!(stream.next().is_none());
    }

    #[test]
    fn blank_lines_reach_the_sink() {
        let mut errors = Vec::new();
        let words: Vec<Word> =
            parse_stream(["foo() # f ˈu #", "   ", ""], false, |e| errors.push(e)).collect();
        assert_eq!(words.len(), 1);
        let reported: Vec<usize> = errors.iter().map(|e| e.line_number).collect();
        assert_eq!(reported, vec![2, 3]);
        assert!(
            errors
                .iter()
                .all(|e| matches!(e.error, ParseError::MalformedEntry(_)))
        );
    }

    #[test]
    fn line_error_display() {
        let mut errors = Vec::new();
        parse_stream(["x(zz) # k #"], false, |e| errors.push(e)).for_each(drop);
        assert_eq!(
            errors[0].to_string(),
            "line 1: unknown part-of-speech tag \"zz\""
        );
    }
}
