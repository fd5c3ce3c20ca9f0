use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use islex_types::{EntryClass, Transcription};
use tracing::{error, warn};

use crate::parse::ParseOptions;
use crate::stream::{EntryStream, LineError};

const READ_BUFFER: usize = 256 * 1024;

/// A dictionary file on disk, plain text or bzip2-compressed (`.bz2`).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Source {
    path: PathBuf,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stable identifier for caching: the canonical path when it resolves.
    pub fn id(&self) -> String {
        fs::canonicalize(&self.path)
            .unwrap_or_else(|_| self.path.clone())
            .display()
            .to_string()
    }

    pub fn is_compressed(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bz2"))
    }

    /// Open a buffered reader, decompressing `.bz2` files on the fly.
    pub fn open(&self) -> Result<Box<dyn BufRead>> {
        let file =
            File::open(&self.path).with_context(|| format!("open {}", self.path.display()))?;
        if self.is_compressed() {
            Ok(Box::new(BufReader::with_capacity(
                READ_BUFFER,
                BzDecoder::new(file),
            )))
        } else {
            Ok(Box::new(BufReader::with_capacity(READ_BUFFER, file)))
        }
    }

    pub fn lines(&self) -> Result<SourceLines> {
        Ok(SourceLines {
            reader: self.open()?,
            path: self.path.clone(),
            buf: Vec::new(),
            line_number: 0,
            done: false,
            error: None,
        })
    }

    /// Parse the file lazily, reporting bad lines to `sink`.
    ///
    /// A read failure ends the stream early; call
    /// [`SourceLines::finish`] through [`EntryStream::lines_mut`] once the
    /// stream is drained to turn it into an error.
    pub fn stream<F>(&self, options: ParseOptions, sink: F) -> Result<EntryStream<SourceLines, F>>
    where
        F: FnMut(LineError),
    {
        Ok(EntryStream::new(self.lines()?, options, sink))
    }
}

/// Lines of a [`Source`], without line terminators.
///
/// Invalid UTF-8 is replaced lossily with a warning. A read error is logged,
/// ends the sequence and is kept for [`SourceLines::finish`].
pub struct SourceLines {
    reader: Box<dyn BufRead>,
    path: PathBuf,
    buf: Vec<u8>,
    line_number: usize,
    done: bool,
    error: Option<io::Error>,
}

impl SourceLines {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The read failure that cut the file short, if any.
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Fail if the lines ended on a read error instead of end of file.
    pub fn finish(&mut self) -> Result<()> {
        match self.error.take() {
            Some(err) => Err(err).with_context(|| {
                format!(
                    "read {} after line {}",
                    self.path.display(),
                    self.line_number
                )
            }),
            None => Ok(()),
        }
    }
}

impl Iterator for SourceLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_number += 1;
                let line = strip_newline(&self.buf);
                match std::str::from_utf8(line) {
                    Ok(text) => Some(text.to_string()),
                    Err(_) => {
                        warn!(
                            "{}:{} is not valid utf-8, decoding lossily",
                            self.path.display(),
                            self.line_number
                        );
                        Some(String::from_utf8_lossy(line).into_owned())
                    }
                }
            }
            Err(err) => {
                error!(
                    "{}:{} read failed, stopping: {err}",
                    self.path.display(),
                    self.line_number + 1
                );
                self.error = Some(err);
                self.done = true;
                None
            }
        }
    }
}

fn strip_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

pub const CORE_FILE: &str = "core.bz2";
pub const ENTITIES_FILE: &str = "entities.bz2";
pub const PERIPHERY_FILE: &str = "periphery.bz2";

/// Which category files of a package to read.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Categories {
    pub core: bool,
    pub entities: bool,
    pub periphery: bool,
}

impl Categories {
    pub const ALL: Categories = Categories {
        core: true,
        entities: true,
        periphery: true,
    };

    pub fn includes(&self, class: EntryClass) -> bool {
        match class {
            EntryClass::Core => self.core,
            EntryClass::Entity => self.entities,
            EntryClass::Periphery => self.periphery,
        }
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self::ALL
    }
}

/// Lines of several package files, read back to back.
///
/// A read error in one file stops the whole sequence.
pub struct PackageLines {
    files: Vec<SourceLines>,
    current: usize,
}

impl PackageLines {
    /// Fail if any file ended on a read error.
    pub fn finish(&mut self) -> Result<()> {
        for lines in &mut self.files {
            lines.finish()?;
        }
        Ok(())
    }
}

impl Iterator for PackageLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(lines) = self.files.get_mut(self.current) {
            if let Some(line) = lines.next() {
                return Some(line);
            }
            if lines.error().is_some() {
                self.current = self.files.len();
                return None;
            }
            self.current += 1;
        }
        None
    }
}

/// A directory holding a dictionary already split into category files.
#[derive(Clone, Debug)]
pub struct PackageData {
    dir: PathBuf,
    transcription: Transcription,
}

impl PackageData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            transcription: Transcription::default(),
        }
    }

    /// Read pronunciations written with `transcription` (diacritic by default).
    pub fn with_transcription(mut self, transcription: Transcription) -> Self {
        self.transcription = transcription;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn transcription(&self) -> Transcription {
        self.transcription
    }

    pub fn file_name(class: EntryClass) -> &'static str {
        match class {
            EntryClass::Core => CORE_FILE,
            EntryClass::Entity => ENTITIES_FILE,
            EntryClass::Periphery => PERIPHERY_FILE,
        }
    }

    pub fn path_for(&self, class: EntryClass) -> PathBuf {
        self.dir.join(Self::file_name(class))
    }

    pub fn source(&self, class: EntryClass) -> Source {
        Source::new(self.path_for(class))
    }

    /// Stream the selected categories in core, entity, periphery order.
    ///
    /// Package files were written from parsed entries, so they are read
    /// without cleaning. Every selected file must exist. As with
    /// [`Source::stream`], check [`PackageLines::finish`] once drained.
    pub fn stream_entries<F>(
        &self,
        categories: Categories,
        sink: F,
    ) -> Result<EntryStream<PackageLines, F>>
    where
        F: FnMut(LineError),
    {
        let mut files = Vec::new();
        for class in EntryClass::ALL {
            if !categories.includes(class) {
                continue;
            }
            let source = self.source(class);
            if !source.path().exists() {
                anyhow::bail!("missing package file: {}", source.path().display());
            }
            files.push(source.lines()?);
        }
        let options = ParseOptions {
            clean: false,
            transcription: self.transcription,
        };
        Ok(EntryStream::new(
            PackageLines { files, current: 0 },
            options,
            sink,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_terminators() {
        assert_eq!(strip_newline(b"foo\r\n"), b"foo");
        assert_eq!(strip_newline(b"foo\n"), b"foo");
        assert_eq!(strip_newline(b"foo"), b"foo");
    }

    #[test]
    fn detects_compression_by_extension() {
        assert!(Source::new("data/core.bz2").is_compressed());
        assert!(Source::new("data/CORE.BZ2").is_compressed());
        assert!(!Source::new("data/ISLEdict.txt").is_compressed());
    }

    #[test]
    fn categories_select_classes() {
        let only_core = Categories {
            core: true,
            entities: false,
            periphery: false,
        };
        assert!(only_core.includes(EntryClass::Core));
        assert!(!only_core.includes(EntryClass::Periphery));
        assert_eq!(
            PackageData::new("pkg").path_for(EntryClass::Entity),
            Path::new("pkg").join("entities.bz2")
        );
    }

    // Yields its bytes, then fails instead of reporting end of file.
    struct FailingReader(&'static [u8]);

    impl io::Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stream cut short"));
            }
            let n = self.0.len().min(buf.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    fn failing_lines(data: &'static [u8]) -> SourceLines {
        SourceLines {
            reader: Box::new(BufReader::new(FailingReader(data))),
            path: PathBuf::from("cut.bz2"),
            buf: Vec::new(),
            line_number: 0,
            done: false,
            error: None,
        }
    }

    #[test]
    fn read_error_is_kept_for_finish() {
        let mut lines = failing_lines(b"a(dt) # e #\nb(nn) # b i #\n");
        let read: Vec<String> = lines.by_ref().collect();
        assert_eq!(read.len(), 2);
        assert!(lines.error().is_some());

        let err = lines.finish().unwrap_err();
        assert!(err.to_string().contains("cut.bz2"), "{err}");
        assert!(format!("{err:#}").contains("stream cut short"), "{err:#}");
    }

    #[test]
    fn package_lines_stop_at_first_failure() {
        let mut package = PackageLines {
            files: vec![failing_lines(b"x\n"), failing_lines(b"y\n")],
            current: 0,
        };
        let read: Vec<String> = package.by_ref().collect();
        assert_eq!(read, vec!["x".to_string()]);
        assert!(package.finish().is_err());
    }
}
