use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use fonprep::{CorpusConfig, DivergencePolicy, ManifestPipeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyChoice {
    Off,
    #[value(name = "duplicate-on-divergence")]
    DuplicateOnDivergence,
}

impl PolicyChoice {
    fn policy(self) -> DivergencePolicy {
        match self {
            Self::Off => DivergencePolicy::Off,
            Self::DuplicateOnDivergence => DivergencePolicy::DuplicateOnDivergence,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "generate_manifest")]
#[command(about = "Generate train/val JSONL manifests and a phoneme dictionary from an aligned speech corpus")]
struct Args {
    /// Corpus root containing txt/, fon/ and wav/ subdirectories.
    #[arg(long, env = "FONPREP_CORPUS_ROOT")]
    corpus_root: PathBuf,
    #[arg(long, env = "FONPREP_OUTPUT_DIR")]
    output_dir: PathBuf,
    #[arg(long, env = "FONPREP_SPEAKER", default_value = CorpusConfig::DEFAULT_SPEAKER_ID)]
    speaker: String,
    /// Filename prefix shared by all companion files.
    #[arg(long, env = "FONPREP_PREFIX", default_value = CorpusConfig::DEFAULT_FILENAME_PREFIX)]
    prefix: String,
    /// Language tag for the phoneme dictionary filename.
    #[arg(long, env = "FONPREP_LANG", default_value = CorpusConfig::DEFAULT_LANG)]
    lang: String,
    #[arg(
        long,
        env = "FONPREP_TRAIN_FRACTION",
        default_value_t = CorpusConfig::DEFAULT_TRAIN_FRACTION
    )]
    train_fraction: f64,
    #[arg(
        long,
        env = "FONPREP_DIVERGENCE_POLICY",
        value_enum,
        default_value_t = PolicyChoice::Off
    )]
    divergence_policy: PolicyChoice,
    /// Seed for the train/val shuffle; omit for a non-reproducible split.
    #[arg(long, env = "FONPREP_SEED")]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = CorpusConfig {
        corpus_root: args.corpus_root,
        output_dir: args.output_dir,
        speaker_id: args.speaker,
        filename_prefix: args.prefix,
        lang: args.lang,
        train_fraction: args.train_fraction,
        divergence_policy: args.divergence_policy.policy(),
        shuffle_seed: args.seed,
        ..CorpusConfig::default()
    };

    let pipeline = match ManifestPipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run() {
        Ok(summary) => {
            println!(
                "discovered {} utterances: {} train entries, {} validation entries, \
                 {} skipped (missing files: {}, transcript errors: {}), \
                 {} alignment read errors, {} inventory symbols",
                summary.discovered,
                summary.train_entries,
                summary.validation_entries,
                summary.skips.skipped_utterances(),
                summary.skips.missing_companion,
                summary.skips.transcript_decode,
                summary.skips.alignment_read,
                summary.inventory_size,
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "manifest generation failed");
            ExitCode::FAILURE
        }
    }
}
