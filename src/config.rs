use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::CorpusError;
use crate::mapper;

/// How train-set utterances containing divergent phonemes are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DivergencePolicy {
    /// Append every entry once, unconditionally.
    #[default]
    Off,
    /// Append an entry twice when it is in the train partition and its
    /// phoneme set intersects the divergent set.
    DuplicateOnDivergence,
}

impl DivergencePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::DuplicateOnDivergence => "duplicate-on-divergence",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorpusConfig {
    /// Corpus root containing `txt/`, `fon/` and `wav/` subdirectories.
    pub corpus_root: PathBuf,
    pub output_dir: PathBuf,
    pub speaker_id: String,
    /// Shared filename prefix; companion files are `<prefix>_<id>.{txt,fon,wav}`.
    pub filename_prefix: String,
    /// Language tag used to name the phoneme dictionary output.
    pub lang: String,
    pub train_fraction: f64,
    pub divergence_policy: DivergencePolicy,
    /// Symbols treated as corpus-specific for the duplication policy.
    pub divergent_phonemes: BTreeSet<String>,
    /// `None` shuffles with entropy from the OS; splits are then not
    /// reproducible across runs.
    pub shuffle_seed: Option<u64>,
}

impl CorpusConfig {
    pub const DEFAULT_TRAIN_FRACTION: f64 = 0.9;
    pub const DEFAULT_SPEAKER_ID: &'static str = "sabela";
    pub const DEFAULT_FILENAME_PREFIX: &'static str = "crpih_uvigo_gl_sabela";
    pub const DEFAULT_LANG: &'static str = "gl";

    pub fn txt_dir(&self) -> PathBuf {
        self.corpus_root.join("txt")
    }

    pub fn fon_dir(&self) -> PathBuf {
        self.corpus_root.join("fon")
    }

    pub fn wav_dir(&self) -> PathBuf {
        self.corpus_root.join("wav")
    }

    pub fn dictionary_filename(&self) -> String {
        format!("phoneme_dict_{}.txt", self.lang)
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(CorpusError::invalid_config(format!(
                "train_fraction must lie in (0, 1), got {}",
                self.train_fraction
            )));
        }
        if self.filename_prefix.is_empty() {
            return Err(CorpusError::invalid_config("filename_prefix is empty"));
        }
        if self.speaker_id.is_empty() {
            return Err(CorpusError::invalid_config("speaker_id is empty"));
        }
        Ok(())
    }
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            corpus_root: PathBuf::new(),
            output_dir: PathBuf::new(),
            speaker_id: Self::DEFAULT_SPEAKER_ID.to_string(),
            filename_prefix: Self::DEFAULT_FILENAME_PREFIX.to_string(),
            lang: Self::DEFAULT_LANG.to_string(),
            train_fraction: Self::DEFAULT_TRAIN_FRACTION,
            divergence_policy: DivergencePolicy::Off,
            divergent_phonemes: mapper::default_divergent_phonemes(),
            shuffle_seed: None,
        }
    }
}
