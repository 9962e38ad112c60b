use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use docsentiment::core::model::{AnalysisReport, SentimentFilter};
use docsentiment::export::text_export;
use docsentiment::pipeline::{
    export_report, ClassifierKind, ExportFormat, PipelineConfig, SegmenterKind, SentimentPipeline,
};
use docsentiment::source;
use docsentiment::Settings;

#[derive(Parser, Debug)]
#[command(name = "docsentiment")]
#[command(version, about = "Document sentiment verdicts and sentiment-tagged keyword rankings", long_about = None)]
struct Cli {
    /// YAML settings file (default: $DOCSENTIMENT_CONFIG or ./docsentiment.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log progress at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute a document verdict for each input
    Analyze {
        /// Input PDF/text files or directories
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        model: ModelArgs,

        /// Directory to write reports into
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format(s) written to --output
        #[arg(short, long, value_enum, default_values_t = vec![Format::Json])]
        format: Vec<Format>,

        /// Only print the summary line
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show per-unit verdicts and skipped units for one document
    Review {
        /// Input PDF or text file
        input: PathBuf,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Rank sentiment-tagged keywords
    Keywords {
        /// Input PDF/text files or directories
        inputs: Vec<PathBuf>,

        /// Keep only keywords of this polarity (positive, neutral, suggestive, negative, none)
        #[arg(short, long, default_value = "none")]
        sentiment: SentimentFilter,

        /// Number of keywords to return (default from settings)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Tab-separated lexicon replacing the built-in one
        #[arg(long)]
        lexicon: Option<PathBuf>,

        /// Rank over the joined text of all inputs
        #[arg(long)]
        combined: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct ModelArgs {
    /// How document text is split into units
    #[arg(long, value_enum, default_value_t = Segmenter::Lines)]
    segmenter: Segmenter,

    /// Source of per-unit class probabilities
    #[arg(long, value_enum, default_value_t = Classifier::Lexicon)]
    classifier: Classifier,

    /// Script run by the bridge classifier
    #[arg(long)]
    bridge_script: Option<PathBuf>,

    /// Tab-separated lexicon replacing the built-in one
    #[arg(long)]
    lexicon: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Segmenter {
    Lines,
    Sentences,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Classifier {
    Lexicon,
    Bridge,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Json,
    Text,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Text => ExportFormat::Text,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            inputs,
            model,
            output,
            format,
            quiet,
        } => analyze_batch(settings, inputs, model, output, format, quiet),
        Commands::Review { input, model } => review(settings, input, model),
        Commands::Keywords {
            inputs,
            sentiment,
            top_n,
            lexicon,
            combined,
            json,
        } => keywords(settings, inputs, sentiment, top_n, lexicon, combined, json),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_pipeline(mut settings: Settings, model: ModelArgs) -> Result<SentimentPipeline> {
    if let Some(script) = model.bridge_script {
        settings.bridge.script = script;
    }
    let config = PipelineConfig {
        settings,
        segmenter: match model.segmenter {
            Segmenter::Lines => SegmenterKind::Lines,
            Segmenter::Sentences => SegmenterKind::Sentences,
        },
        classifier: match model.classifier {
            Classifier::Lexicon => ClassifierKind::Lexicon,
            Classifier::Bridge => ClassifierKind::Bridge,
        },
        lexicon: model.lexicon,
    };
    SentimentPipeline::from_config(&config)
}

fn analyze_batch(
    settings: Settings,
    inputs: Vec<PathBuf>,
    model: ModelArgs,
    output: Option<PathBuf>,
    formats: Vec<Format>,
    quiet: bool,
) -> Result<()> {
    let inputs = source::expand_inputs(&inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    let pipeline = build_pipeline(settings, model)?;
    let mut report = AnalysisReport::default();
    let mut failed = 0;

    if !quiet {
        println!("[*] Analyzing {} file(s)\n", inputs.len());
    }

    for (i, input) in inputs.iter().enumerate() {
        if !quiet {
            println!("[{}/{}] Processing: {}", i + 1, inputs.len(), input.display());
        }

        if !input.exists() {
            eprintln!("  [!] Skipped: file does not exist");
            failed += 1;
            continue;
        }

        match pipeline.analyze_document(input) {
            Ok(document) => {
                if !quiet {
                    println!(
                        "  [✓] {} (score {:.2}, intensity {})",
                        document.verdict.category(),
                        document.verdict.continuous_score(),
                        document.verdict.intensity()
                    );
                }
                report.documents.push(document);
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {:#}", e);
                failed += 1;
            }
        }
    }

    if !quiet && !report.documents.is_empty() {
        println!();
        print!("{}", text_export::render(&report, false));
    }

    if let Some(output_dir) = output {
        let formats: Vec<ExportFormat> = formats.into_iter().map(ExportFormat::from).collect();
        export_report(&report, &output_dir, &formats)
            .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;
        if !quiet {
            println!("[✓] Reports saved to: {}", output_dir.display());
        }
    }

    println!(
        "[*] Summary: {} succeeded, {} failed",
        report.documents.len(),
        failed
    );

    if failed > 0 {
        anyhow::bail!("{} file(s) failed to process", failed);
    }

    Ok(())
}

fn review(settings: Settings, input: PathBuf, model: ModelArgs) -> Result<()> {
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let pipeline = build_pipeline(settings, model)?;
    let document = pipeline
        .analyze_document(&input)
        .with_context(|| format!("Failed to review: {}", input.display()))?;

    let report = AnalysisReport {
        documents: vec![document],
        keywords: vec![],
    };
    print!("{}", text_export::render(&report, true));
    Ok(())
}

fn keywords(
    settings: Settings,
    inputs: Vec<PathBuf>,
    filter: SentimentFilter,
    top_n: Option<usize>,
    lexicon: Option<PathBuf>,
    combined: bool,
    json: bool,
) -> Result<()> {
    let inputs = source::expand_inputs(&inputs)?;
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }
    if let Some(missing) = inputs.iter().find(|path| !path.exists()) {
        anyhow::bail!("Input file does not exist: {}", missing.display());
    }

    let config = PipelineConfig {
        settings,
        lexicon,
        ..PipelineConfig::default()
    };
    let pipeline = SentimentPipeline::from_config(&config)?;
    let top_n = top_n.unwrap_or_else(|| pipeline.default_top_n());

    let report = AnalysisReport {
        documents: vec![],
        keywords: pipeline.keyword_reports(&inputs, top_n, filter, combined)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report.keywords)?);
    } else {
        print!("{}", text_export::render(&report, false));
    }
    Ok(())
}
