//! Load ISLE pronunciation dictionaries into words and indexes.
//!
//! Each dictionary line looks like
//! `ortho(tag,tag,+morph+morph) # syll . syll # syll . syll #`: an orthography
//! with part-of-speech tags and an optional morpheme decomposition, followed
//! by one or more pronunciations. This crate parses those lines into
//! [`islex_types::Word`] values, streams whole files while skipping and
//! reporting bad lines, and builds lookups by orthography and by phone
//! sequence.
//!
//! # Features
//! - Deterministic line parser with an optional clean mode that repairs the
//!   messy tags of raw ISLE dumps (see `islex-normalize`).
//! - Lazy [`EntryStream`] that never aborts on a bad line; every failure
//!   reaches a caller-supplied sink.
//! - Plain-text or bzip2 [`Source`]s, and [`PackageData`] directories split
//!   into `core`/`entities`/`periphery` files by [`write_package`].
//! - [`index_by_orthography`] / [`index_by_phones`], a borrowing
//!   [`CaseInsensitive`] view, and a caller-owned [`IndexCache`].
//!
//! # Example
//! ```no_run
//! use islex_db::{CaseInsensitive, ParseOptions, Source, index_by_orthography, log_diagnostic};
//!
//! # fn main() -> anyhow::Result<()> {
//! let source = Source::new("/opt/data/ISLEdict.txt");
//! let index = index_by_orthography(source.stream(ParseOptions::clean(), log_diagnostic)?);
//! let view = CaseInsensitive::new(&index);
//! for word in view.get("Read").into_iter().flatten() {
//!     println!("{word}");
//! }
//! # Ok(()) }
//! ```
//!
//! Parsing a single line:
//! ```rust
//! use islex_db::parse_line;
//!
//! let word = parse_line("fooed(+foo+ed,vbd) # f ˈu d #", false).unwrap();
//! assert_eq!(word.morphemes(), ["foo", "ed"]);
//! assert_eq!(word.render(), "fooed(+foo+ed,vbd) # f ˈu d #");
//! ```

pub mod cache;
pub mod index;
pub mod parse;
pub mod source;
pub mod split;
pub mod stream;
pub mod view;

pub use cache::IndexCache;
pub use index::{OrthoIndex, PhoneIndex, index_by_orthography, index_by_phones, phone_key};
pub use parse::{ParseOptions, parse_line, parse_line_with};
pub use source::{Categories, PackageData, PackageLines, Source, SourceLines};
pub use split::{SplitSummary, split_file, write_package};
pub use stream::{EntryStream, LineError, log_diagnostic, parse_stream};
pub use view::CaseInsensitive;
