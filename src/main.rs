use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use topiclump::config::Config;
use topiclump::output::terminal;
use topiclump::pipeline::Analysis;
use topiclump::proximity::comparer::ComparerKind;
use topiclump::proximity::parameterizer::ParameterizerKind;
use topiclump::text::stop_words::StopWords;
use topiclump::text::tokenizer::TokenStream;

/// topiclump: find groups of words that keep showing up near each other.
///
/// Indexes where every frequent word occurs in a text, scores how closely
/// words track each other's positions, and greedily groups them into
/// topic clumps.
#[derive(Parser)]
#[command(name = "topiclump", version, about)]
struct Cli {
    #[command(flatten)]
    analysis: AnalysisArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that analyzes a corpus.
#[derive(Args)]
struct AnalysisArgs {
    /// Frequency threshold numerator (default: 5)
    #[arg(long, global = true)]
    numerator: Option<u64>,

    /// Frequency threshold denominator (default: 100000)
    #[arg(long, global = true)]
    denominator: Option<u64>,

    /// Pairwise proximity strategy
    #[arg(long, global = true, value_enum)]
    comparer: Option<ComparerKind>,

    /// Stop-word list file, one word per line (default: built-in English list)
    #[arg(long, global = true)]
    stop_words: Option<PathBuf>,

    /// Don't filter out any stop words
    #[arg(long, global = true, conflicts_with = "stop_words")]
    no_stop_words: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the run database
    #[cfg(feature = "sqlite")]
    Init,

    /// Summarize the vocabulary and subset vocabulary of a text
    Vocab {
        /// The text file to analyze
        file: PathBuf,
    },

    /// Show how close every subset word sits to one word
    Stack {
        /// The text file to analyze
        file: PathBuf,

        /// The reference word
        word: String,

        /// Only show the closest N words
        #[arg(long)]
        truncate: Option<usize>,
    },

    /// Rank words by how quickly their similarity decays
    Rank {
        /// The text file to analyze
        file: PathBuf,

        /// Stack-ranking strategy
        #[arg(long, value_enum)]
        parameterizer: Option<ParameterizerKind>,

        /// Score a stack entry must reach (default: 1000)
        #[arg(long)]
        threshold: Option<u64>,

        /// Only show the top N words
        #[arg(long)]
        top: Option<usize>,
    },

    /// Group words into topic clumps
    Clump {
        /// The text file to analyze
        file: PathBuf,

        /// Merge threshold; a word joins when its score is below this
        #[arg(long)]
        radius: Option<f64>,

        /// Save the run to the database
        #[cfg(feature = "sqlite")]
        #[arg(long)]
        save: bool,

        /// Label for the saved run (default: the file name)
        #[cfg(feature = "sqlite")]
        #[arg(long, requires = "save")]
        label: Option<String>,

        /// Also write the clump report to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List saved runs
    #[cfg(feature = "sqlite")]
    Runs,

    /// Show a saved run
    #[cfg(feature = "sqlite")]
    Show {
        /// The run id (see `topiclump runs`)
        id: i64,

        /// Also write the clump report to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topiclump=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    apply_overrides(&mut config, &cli.analysis);

    match cli.command {
        #[cfg(feature = "sqlite")]
        Commands::Init => {
            info!("Initializing topiclump database...");
            let conn = topiclump::db::initialize(&config.db_path)?;
            let table_count = topiclump::db::schema::table_count(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext: cargo run -- clump <file> --radius <R> --save");
        }

        Commands::Vocab { file } => {
            let analysis = analyze(&file, &config, &cli.analysis)?;
            terminal::display_vocabulary_summary(&analysis);
        }

        Commands::Stack {
            file,
            word,
            truncate,
        } => {
            let analysis = analyze(&file, &config, &cli.analysis)?;
            let stack = analysis.similarity_stack(word.to_lowercase().as_str(), truncate)?;
            terminal::display_stack(&word, &stack);
        }

        Commands::Rank {
            file,
            parameterizer,
            threshold,
            top,
        } => {
            if let Some(p) = parameterizer {
                config.analysis.parameterizer = p;
            }
            if let Some(t) = threshold {
                config.analysis.rank_threshold = t;
            }
            let analysis = analyze(&file, &config, &cli.analysis)?;

            let pb = ProgressBar::new(analysis.subset.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  Stacks [{bar:30}] {pos}/{len} ({eta})")
                    .unwrap(),
            );
            let ranks = analysis.rank_words(Some(&pb))?;
            pb.finish_and_clear();

            terminal::display_ranks(&ranks, top);
        }

        Commands::Clump {
            file,
            radius,
            #[cfg(feature = "sqlite")]
            save,
            #[cfg(feature = "sqlite")]
            label,
            json,
        } => {
            if radius.is_some() {
                config.analysis.radius = radius;
            }
            let radius = config.require_radius()?;
            let analysis = analyze(&file, &config, &cli.analysis)?;
            let report = analysis.clump_report(radius)?;

            terminal::display_clumps(&report);

            #[cfg(feature = "sqlite")]
            if save {
                let conn = topiclump::db::initialize(&config.db_path)?;
                let label = label.unwrap_or_else(|| default_label(&file));
                let corpus = file.display().to_string();
                let id = topiclump::db::queries::save_run(&conn, &label, Some(&corpus), &report)?;
                println!("{}", format!("Saved as run {id} ({label}).").bold());
            }

            if let Some(path) = json {
                report.save_to_file(&path)?;
                println!("Report written to {}", path.display());
            }
        }

        #[cfg(feature = "sqlite")]
        Commands::Runs => {
            let conn = topiclump::db::open(&config.db_path)?;
            let runs = topiclump::db::queries::list_runs(&conn)?;
            terminal::display_runs(&runs);
        }

        #[cfg(feature = "sqlite")]
        Commands::Show { id, json } => {
            let conn = topiclump::db::open(&config.db_path)?;
            let Some(run) = topiclump::db::queries::get_run(&conn, id)? else {
                anyhow::bail!("No saved run with id {id}. See `topiclump runs`.");
            };

            println!(
                "Run {} \"{}\" ({}{})",
                run.id,
                run.label,
                run.created_at,
                run.corpus
                    .as_deref()
                    .map(|c| format!(", {c}"))
                    .unwrap_or_default()
            );
            terminal::display_clumps(&run.report);

            if let Some(path) = json {
                run.report.save_to_file(&path)?;
                println!("Report written to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Fold CLI flags over the environment configuration.
fn apply_overrides(config: &mut Config, args: &AnalysisArgs) {
    if let Some(n) = args.numerator {
        config.analysis.threshold.numerator = n;
    }
    if let Some(d) = args.denominator {
        config.analysis.threshold.denominator = d;
    }
    if let Some(c) = args.comparer {
        config.analysis.comparer = c;
    }
    if let Some(path) = &args.stop_words {
        config.stop_words_path = Some(path.clone());
    }
}

/// Split the file and run the indexing pipeline over it.
fn analyze(file: &Path, config: &Config, args: &AnalysisArgs) -> Result<Analysis> {
    let stop_words = if args.no_stop_words {
        StopWords::none()
    } else {
        config.stop_words()?
    };

    let stream = TokenStream::from_file(file)?;
    info!(
        file = %file.display(),
        tokens = stream.len(),
        stop_words = stop_words.len(),
        "Loaded corpus"
    );

    if stream.is_empty() {
        println!("{}", "The file contains no usable words.".yellow());
    }

    Ok(Analysis::build(stream, &stop_words, config.analysis.clone())?)
}

#[cfg(feature = "sqlite")]
fn default_label(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "run".to_string())
}
