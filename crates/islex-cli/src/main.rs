use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use islex_db::{
    CaseInsensitive, Categories, IndexCache, PackageData, ParseOptions, Source, index_by_orthography,
    index_by_phones, log_diagnostic, phone_key, split_file,
};
use islex_types::{EntryClass, Phone, Transcription, Word};
use serde::Serialize;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_DICT_PATH: &str = "data/ISLEdict.txt";
const DEFAULT_DICT_IMAGE_PATH: &str = "/opt/data/ISLEdict.txt";

#[derive(Parser, Debug)]
#[command(name = "islex")]
#[command(about = "Split, index and query ISLE pronunciation dictionaries")]
struct Cli {
    /// Dictionary file, plain text or `.bz2`.
    #[arg(long, global = true, env = "ISLEX_DICT")]
    dict: Option<PathBuf>,
    /// Repair messy tags while parsing (needed for raw ISLE dumps).
    #[arg(long, global = true, default_value_t = false)]
    clean: bool,
    #[arg(long, global = true, value_enum, default_value_t = TranscriptionArg::Diacritic)]
    transcription: TranscriptionArg,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write core/entities/periphery files for a raw dictionary.
    ///
    /// Tags are always cleaned, with or without `--clean`. The package keeps
    /// the `--transcription` of the input, so read it back with the same one.
    Split {
        #[arg(long)]
        out: PathBuf,
    },
    /// Print every entry spelled like WORD, ignoring case.
    Lookup {
        #[arg(required = true)]
        words: Vec<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print entries pronounced exactly as the given phone sequence.
    Phones {
        #[arg(required = true)]
        phones: Vec<String>,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Count entries, classes and index keys.
    Stats {
        /// Read a split package directory instead of the dictionary file.
        #[arg(long)]
        package: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TranscriptionArg {
    Diacritic,
    Suffix,
}

impl From<TranscriptionArg> for Transcription {
    fn from(arg: TranscriptionArg) -> Self {
        match arg {
            TranscriptionArg::Diacritic => Transcription::Diacritic,
            TranscriptionArg::Suffix => Transcription::Suffix,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

#[derive(Debug, Clone)]
struct Config {
    dict_path: PathBuf,
    options: ParseOptions,
}

fn load_config(cli: &Cli) -> Config {
    Config {
        dict_path: cli.dict.clone().unwrap_or_else(default_dict_path),
        options: ParseOptions {
            clean: cli.clean,
            transcription: cli.transcription.into(),
        },
    }
}

fn default_dict_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_DICT_PATH);
    if local.exists() {
        return local;
    }
    PathBuf::from(DEFAULT_DICT_IMAGE_PATH)
}

fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = load_config(&cli);
    let source = Source::new(&config.dict_path);

    match cli.command {
        Commands::Split { out: dir } => {
            info!("splitting {} into {}", source.path().display(), dir.display());
            let summary = split_file(&source, &dir, config.options.transcription)?;
            for class in EntryClass::ALL {
                writeln!(
                    out,
                    "{}\t{}\t{}",
                    class,
                    summary.count(class),
                    PackageData::new(&dir).path_for(class).display()
                )?;
            }
            writeln!(out, "skipped\t{}", summary.skipped)?;
        }
        Commands::Lookup { words, json } => {
            let mut cache = IndexCache::new(config.options);
            let index = timed("orthography index", || cache.orthography(&source))?;
            let view = CaseInsensitive::new(&index);
            let mut hits = Vec::new();
            for query in &words {
                let found = view.get(query).map(Vec::as_slice).unwrap_or_default();
                if found.is_empty() && !json {
                    writeln!(out, "{query}: not found")?;
                }
                hits.extend(found.iter().map(|word| Hit::new(query, word)));
            }
            print_hits(out, &hits, json)?;
        }
        Commands::Phones { phones, json } => {
            let transcription = config.options.transcription;
            let texts = phones
                .iter()
                .map(|p| Phone::parse(p, transcription).map(|phone| phone.text().to_string()))
                .collect::<Result<Vec<_>, _>>()
                .context("parse query phones")?;
            let key = phone_key(&texts);
            let query = key.join(" ");
            let mut cache = IndexCache::new(config.options);
            let index = timed("phone index", || cache.phones(&source))?;
            let found = index.get(&key).map(Vec::as_slice).unwrap_or_default();
            if found.is_empty() && !json {
                writeln!(out, "{query}: not found")?;
            }
            let hits: Vec<Hit<'_>> = found.iter().map(|word| Hit::new(&query, word)).collect();
            print_hits(out, &hits, json)?;
        }
        Commands::Stats { package } => {
            let stats = match package {
                Some(dir) => {
                    let mut stream = PackageData::new(dir)
                        .with_transcription(config.options.transcription)
                        .stream_entries(Categories::ALL, log_diagnostic)?;
                    let words: Vec<Word> = stream.by_ref().collect();
                    stream.lines_mut().finish()?;
                    Stats::collect(words, stream.skipped())
                }
                None => {
                    let mut stream = source.stream(config.options, log_diagnostic)?;
                    let words: Vec<Word> = stream.by_ref().collect();
                    stream.lines_mut().finish()?;
                    Stats::collect(words, stream.skipped())
                }
            };
            stats.print(out)?;
        }
    }
    Ok(())
}

fn timed<T>(what: &str, build: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let value = build()?;
    info!("{what} ready in {} ms", start.elapsed().as_millis());
    Ok(value)
}

#[derive(Serialize)]
struct Hit<'a> {
    query: &'a str,
    class: EntryClass,
    entry: String,
    word: &'a Word,
}

impl<'a> Hit<'a> {
    fn new(query: &'a str, word: &'a Word) -> Self {
        Self {
            query,
            class: word.class(),
            entry: word.render(),
            word,
        }
    }
}

fn print_hits(out: &mut impl Write, hits: &[Hit<'_>], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, hits).context("serialize entries")?;
        writeln!(out)?;
    } else {
        for hit in hits {
            writeln!(out, "{}\t{}", hit.class, hit.entry)?;
        }
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Stats {
    entries: usize,
    core: usize,
    entities: usize,
    periphery: usize,
    skipped: usize,
    orthography_keys: usize,
    phone_keys: usize,
}

impl Stats {
    fn collect(words: Vec<Word>, skipped: usize) -> Self {
        let mut stats = Stats {
            entries: words.len(),
            skipped,
            ..Stats::default()
        };
        for word in &words {
            match word.class() {
                EntryClass::Core => stats.core += 1,
                EntryClass::Entity => stats.entities += 1,
                EntryClass::Periphery => stats.periphery += 1,
            }
        }
        stats.orthography_keys = index_by_orthography(words.iter().cloned()).len();
        stats.phone_keys = index_by_phones(words).len();
        stats
    }

    fn print(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "entries\t{}", self.entries)?;
        writeln!(out, "core\t{}", self.core)?;
        writeln!(out, "entity\t{}", self.entities)?;
        writeln!(out, "periphery\t{}", self.periphery)?;
        writeln!(out, "skipped\t{}", self.skipped)?;
        writeln!(out, "orthography keys\t{}", self.orthography_keys)?;
        writeln!(out, "phone keys\t{}", self.phone_keys)?;
        Ok(())
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
