use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::info;

use marky_core::{DeadEndPolicy, Dictionary, GenerationInput};

/// Dead end behaviour, as typed on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum DeadEnd {
    Restart,
    Stop,
}

impl From<DeadEnd> for DeadEndPolicy {
    fn from(value: DeadEnd) -> Self {
        match value {
            DeadEnd::Restart => DeadEndPolicy::Restart,
            DeadEnd::Stop => DeadEndPolicy::Stop,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Word-pair Markov chain text generator", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    /// Persistent dictionary to use, without the `.mmd` extension.
    /// A temporary dictionary is used when omitted.
    #[arg(short, long, value_name = "LOCATOR")]
    dictionary: Option<PathBuf>,

    /// Text files to learn from (every sentence can start a text)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Strings to learn from (each one is a single utterance)
    #[arg(short = 's', long = "string", value_name = "TEXT")]
    strings: Vec<String>,

    /// Number of words per generated text
    #[arg(short = 'n', long, default_value_t = 40, allow_negative_numbers = true)]
    words: i64,

    /// Number of texts to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// What to do when the chain reaches a dead end
    #[arg(long, value_enum, default_value_t = DeadEnd::Restart)]
    dead_end: DeadEnd,

    /// Forget what the dictionary learned before parsing
    #[arg(long)]
    clear: bool,

    /// Save the persistent dictionary after parsing
    #[arg(long, requires = "dictionary")]
    save: bool,

    /// Delete the persistent dictionary and exit
    #[arg(long, requires = "dictionary", conflicts_with_all = ["save", "clear"])]
    delete: bool,
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if cli.delete {
        // Should not be None: clap enforces `requires = "dictionary"`
        let locator = cli.dictionary.as_ref().context("--delete needs --dictionary")?;
        Dictionary::delete(locator)
            .with_context(|| format!("unable to delete dictionary {}", locator.display()))?;
        info!("dictionary {} deleted", locator.display());
        return Ok(());
    }

    // Open the persistent dictionary if any, else a temporary one
    let mut markov = match &cli.dictionary {
        Some(locator) => Dictionary::open(locator)
            .with_context(|| format!("unable to open dictionary {}", locator.display()))?,
        None => Dictionary::temporary(),
    };

    if cli.clear {
        markov.clear();
    }

    for file in &cli.files {
        let stats = markov
            .parse_file(file)
            .with_context(|| format!("unable to parse {}", file.display()))?;
        info!("{}: {} tokens, {} starts", file.display(), stats.tokens, stats.starts);
    }

    for string in &cli.strings {
        markov.parse_string(string);
    }

    info!(
        "dictionary holds {} states and {} starts",
        markov.store().len(),
        markov.store().start_count()
    );

    if cli.save {
        markov.save().context("unable to save dictionary")?;
    }

    let mut input = GenerationInput::new(cli.words);
    input.dead_end = cli.dead_end.into();

    let mut rng = rand::rng();
    for _ in 0..cli.count {
        println!("{}", markov.generate_with(&input, &mut rng)?);
    }

    Ok(())
}
