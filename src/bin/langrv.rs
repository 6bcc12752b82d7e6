use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use langrv::corpus::{self, Corpus, EvalConfig};
use langrv::{Builder, BuilderConfig};

#[derive(Parser, Debug)]
#[command(name = "langrv", about = "Random-indexing language identification")]
struct Cli {
    /// More output (-v: debug logs, -vv: also print misclassified lines)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train on the head of each language file and report accuracy on the lines after it.
    Eval {
        #[command(flatten)]
        harness: HarnessArgs,
    },

    /// Train, then rank the given texts (or stdin lines) against every language.
    Classify {
        #[command(flatten)]
        harness: HarnessArgs,
        /// Texts to classify
        texts: Vec<String>,
    },

    /// Print the similarity of two texts.
    Score {
        #[command(flatten)]
        builder: BuilderArgs,
        a: String,
        b: String,
    },
}

#[derive(Args, Debug)]
struct BuilderArgs {
    /// N-gram length in characters
    #[arg(long)]
    order: Option<usize>,
    /// Vector width
    #[arg(long)]
    dimension: Option<usize>,
    /// Hash seed
    #[arg(long)]
    seed: Option<u64>,
}

impl BuilderArgs {
    fn apply(&self, config: &mut BuilderConfig) {
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(dimension) = self.dimension {
            config.dimension = dimension;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

#[derive(Args, Debug)]
struct HarnessArgs {
    /// Directory containing <Language>.txt files
    #[arg(long)]
    data: PathBuf,
    /// Harness config (JSON); flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Comma-separated languages
    #[arg(long, value_delimiter = ',')]
    languages: Option<Vec<String>>,
    /// Training lines per language
    #[arg(long)]
    train_lines: Option<usize>,
    /// Validation lines per language
    #[arg(long)]
    valid_lines: Option<usize>,
    #[command(flatten)]
    builder: BuilderArgs,
}

impl HarnessArgs {
    fn load(&self) -> anyhow::Result<EvalConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let s = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str::<EvalConfig>(&s)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => EvalConfig::default(),
        };
        if let Some(languages) = &self.languages {
            config.languages = languages.clone();
        }
        if let Some(n) = self.train_lines {
            config.train_lines = n;
        }
        if let Some(n) = self.valid_lines {
            config.valid_lines = n;
        }
        self.builder.apply(&mut config.builder);
        if config.languages.is_empty() {
            bail!("no languages configured");
        }
        config.builder.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose > 0 { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Eval { harness } => cmd_eval(&harness, cli.verbose),
        Commands::Classify { harness, texts } => cmd_classify(&harness, texts),
        Commands::Score { builder, a, b } => cmd_score(&builder, &a, &b),
    }
}

fn cmd_eval(args: &HarnessArgs, verbose: u8) -> anyhow::Result<()> {
    let config = args.load()?;
    let corpus = Corpus::new(&args.data);
    let eval = corpus::run(&config, &corpus)?;

    for t in &eval.training {
        println!(
            "\tbuild.{}: {} chars at {:.1e} chars/s",
            t.language,
            t.chars,
            t.chars_per_sec()
        );
    }
    for r in &eval.reports {
        println!(
            "\tclassify.{}: {} chars at {:.1e} chars/s",
            r.language,
            r.chars,
            r.chars_per_sec()
        );
        if verbose >= 2 {
            for f in &r.failures {
                println!(
                    "   FAIL {}  ({} -> {})",
                    f.text,
                    r.language,
                    f.predicted.as_deref().unwrap_or("?")
                );
            }
        }
        println!("{} accuracy: {:.1} %", r.language, 100.0 * r.accuracy());
    }
    println!("overall accuracy: {:.1} %", 100.0 * eval.overall_accuracy());
    Ok(())
}

fn cmd_classify(args: &HarnessArgs, texts: Vec<String>) -> anyhow::Result<()> {
    let config = args.load()?;
    let corpus = Corpus::new(&args.data);
    let builder = Builder::new(config.builder)?;
    let (profiles, _) =
        corpus::train_profiles(&builder, &corpus, &config.languages, config.train_lines)?;

    let texts = if texts.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<_>>>()
            .context("reading stdin")?
    } else {
        texts
    };

    for text in &texts {
        let ranking = profiles.rank(text)?;
        let best = ranking.first().map(|(l, _)| *l).unwrap_or("?");
        println!("{best}\t{text}");
        for (label, s) in &ranking {
            println!("\t{label}: {s:.4}");
        }
    }
    Ok(())
}

fn cmd_score(args: &BuilderArgs, a: &str, b: &str) -> anyhow::Result<()> {
    let mut config = BuilderConfig::default();
    args.apply(&mut config);
    let builder = Builder::new(config)?;
    let s = langrv::score(&builder.build(a), &builder.build(b))?;
    println!("{s:.6}");
    Ok(())
}
