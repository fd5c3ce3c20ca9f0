use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bzip2::Compression;
use bzip2::write::BzEncoder;
use islex_types::{EntryClass, Transcription, Word};
use tempfile::NamedTempFile;
use tracing::info;

use crate::parse::ParseOptions;
use crate::source::{PackageData, Source};
use crate::stream::log_diagnostic;

type CategoryWriter = BufWriter<BzEncoder<NamedTempFile>>;

/// How many entries went to each category file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SplitSummary {
    pub core: usize,
    pub entities: usize,
    pub periphery: usize,
    /// Source lines that failed to parse (only set by [`split_file`]).
    pub skipped: usize,
}

impl SplitSummary {
    pub fn count(&self, class: EntryClass) -> usize {
        match class {
            EntryClass::Core => self.core,
            EntryClass::Entity => self.entities,
            EntryClass::Periphery => self.periphery,
        }
    }

    pub fn total(&self) -> usize {
        self.core + self.entities + self.periphery
    }

    fn record(&mut self, class: EntryClass) {
        match class {
            EntryClass::Core => self.core += 1,
            EntryClass::Entity => self.entities += 1,
            EntryClass::Periphery => self.periphery += 1,
        }
    }
}

/// Write `words` into `core.bz2`, `entities.bz2` and `periphery.bz2` under
/// `dir`, one rendered line per word, by [`Word::class`].
///
/// Files are written to temporaries in `dir` and renamed into place only
/// after every word was written.
pub fn write_package<I>(words: I, dir: impl AsRef<Path>) -> Result<SplitSummary>
where
    I: IntoIterator<Item = Word>,
{
    let dir = dir.as_ref();
    let mut staged = StagedPackage::create(dir)?;
    let summary = staged.write_all(words)?;
    staged.commit()?;
    log_written(&summary, dir);
    Ok(summary)
}

/// Parse a raw dictionary with tag cleaning and split it into `dir`.
///
/// Cleaning is always on. If the source cannot be read to the end, the
/// call fails and any package already in `dir` is left as it was.
pub fn split_file(
    source: &Source,
    dir: impl AsRef<Path>,
    transcription: Transcription,
) -> Result<SplitSummary> {
    let dir = dir.as_ref();
    let options = ParseOptions {
        clean: true,
        transcription,
    };
    let mut stream = source.stream(options, log_diagnostic)?;
    let mut staged = StagedPackage::create(dir)?;
    let mut summary = staged.write_all(&mut stream)?;
    stream.lines_mut().finish()?;
    staged.commit()?;

    summary.skipped = stream.skipped();
    log_written(&summary, dir);
    if summary.skipped > 0 {
        info!(
            "skipped {} of {} lines in {}",
            summary.skipped,
            stream.lines_read(),
            source.path().display()
        );
    }
    Ok(summary)
}

/// Category files being written; dropped temporaries are removed.
struct StagedPackage {
    writers: Vec<(CategoryWriter, PathBuf)>,
}

impl StagedPackage {
    fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        let package = PackageData::new(dir);
        let mut writers = Vec::with_capacity(EntryClass::ALL.len());
        for class in EntryClass::ALL {
            let temp = NamedTempFile::new_in(dir)
                .with_context(|| format!("create temporary file in {}", dir.display()))?;
            let writer = BufWriter::new(BzEncoder::new(temp, Compression::best()));
            writers.push((writer, package.path_for(class)));
        }
        Ok(Self { writers })
    }

    fn write_all<I>(&mut self, words: I) -> Result<SplitSummary>
    where
        I: IntoIterator<Item = Word>,
    {
        let mut summary = SplitSummary::default();
        for word in words {
            let class = word.class();
            let (out, path) = &mut self.writers[slot(class)];
            writeln!(out, "{word}").with_context(|| format!("write {}", path.display()))?;
            summary.record(class);
        }
        Ok(summary)
    }

    fn commit(self) -> Result<()> {
        for (writer, path) in self.writers {
            let encoder = writer
                .into_inner()
                .map_err(|e| e.into_error())
                .with_context(|| format!("flush {}", path.display()))?;
            let temp = encoder
                .finish()
                .with_context(|| format!("finish {}", path.display()))?;
            temp.persist(&path)
                .with_context(|| format!("replace {}", path.display()))?;
        }
        Ok(())
    }
}

// Position of `class` in `EntryClass::ALL`.
fn slot(class: EntryClass) -> usize {
    match class {
        EntryClass::Core => 0,
        EntryClass::Entity => 1,
        EntryClass::Periphery => 2,
    }
}

fn log_written(summary: &SplitSummary, dir: &Path) {
    info!(
        "wrote {} core, {} entity, {} periphery entries to {}",
        summary.core,
        summary.entities,
        summary.periphery,
        dir.display()
    );
}
