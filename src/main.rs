//! bow-sentiment
//!
//! Train, evaluate and query bag-of-words tweet sentiment models.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use bow_sentiment::{PipelineConfig, SentimentModel, SentimentPipeline};

#[derive(Parser, Debug)]
#[command(name = "bow-sentiment")]
#[command(author, version, about = "Bag-of-words tweet sentiment classifier", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a model, optionally score it on a test split and save it
    Train {
        /// Training split
        #[arg(long)]
        train: PathBuf,

        /// Test split, scored after training
        #[arg(long)]
        test: Option<PathBuf>,

        /// Pipeline configuration (YAML)
        #[arg(short, long, env = "BOW_SENTIMENT_CONFIG")]
        config: Option<PathBuf>,

        /// Where to write the trained model (CBOR)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Override the number of trees
        #[arg(long)]
        trees: Option<usize>,

        /// Override the forest seed
        #[arg(long)]
        seed: Option<u64>,

        /// Clamp negative counts to 0
        #[arg(long)]
        clamp: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a saved model on a test split
    Evaluate {
        /// Saved model (CBOR)
        #[arg(short, long)]
        model: PathBuf,

        /// Test split
        #[arg(long)]
        test: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify free text with a saved model
    Predict {
        /// Saved model (CBOR)
        #[arg(short, long)]
        model: PathBuf,

        /// Texts to classify, one prediction per argument
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Train {
            train,
            test,
            config,
            save,
            trees,
            seed,
            clamp,
            json,
        } => {
            let mut config = match config {
                Some(path) => PipelineConfig::from_file(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => PipelineConfig::default(),
            };
            if let Some(trees) = trees {
                config.forest.n_trees = trees;
            }
            if let Some(seed) = seed {
                config.forest.seed = seed;
            }
            config.clamp_non_negative |= clamp;

            let pipeline = SentimentPipeline::from_config(config)?;
            let model = pipeline
                .train(&train)
                .with_context(|| format!("training on {} failed", train.display()))?;
            info!(vocabulary = model.vocabulary().len(), trees = model.forest().n_trees(), "model trained");

            if let Some(test) = test {
                let report = model
                    .evaluate(&test)
                    .with_context(|| format!("evaluating on {} failed", test.display()))?;
                print_report(&report, json)?;
            }
            if let Some(path) = save {
                model.save(&path)?;
            }
        }
        Commands::Evaluate { model, test, json } => {
            let model = SentimentModel::load(&model)
                .with_context(|| format!("failed to load model {}", model.display()))?;
            let report = model.evaluate(&test)?;
            print_report(&report, json)?;
        }
        Commands::Predict { model, text } => {
            let model = SentimentModel::load(&model)
                .with_context(|| format!("failed to load model {}", model.display()))?;
            for text in &text {
                let tag = model.predict_text(text)?;
                println!("{tag}\t{text}");
            }
        }
    }
    Ok(())
}

fn print_report(report: &bow_sentiment::ClassificationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("bow_sentiment=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bow_sentiment=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
