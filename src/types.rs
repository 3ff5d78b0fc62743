use std::collections::BTreeSet;

use serde::Serialize;

/// One line of a training/validation manifest, serialized as a single JSON
/// object. Field order matches the downstream consumer's expectations.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub audio_filepath: String,
    /// Grapheme transcript, lowercased and trimmed.
    pub text: String,
    /// Space-joined phoneme symbols in temporal order.
    pub phoneme_text: String,
    pub speaker: String,
    /// Always `None`; duration is probed from the audio downstream.
    pub duration: Option<f64>,
}

/// Mapped symbols extracted from one alignment file, in temporal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhonemeSequence {
    pub symbols: Vec<String>,
    /// Distinct pre-mapping source codes seen in the file. Used to detect
    /// substitution-table collisions across the corpus.
    pub source_codes: BTreeSet<String>,
}

impl PhonemeSequence {
    pub fn joined(&self) -> String {
        self.symbols.join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionKind {
    Train,
    Validation,
}

impl PartitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
        }
    }

    pub fn manifest_filename(self) -> &'static str {
        match self {
            Self::Train => "train_manifest.json",
            Self::Validation => "val_manifest.json",
        }
    }
}

/// Per-error-kind skip counters. None of these is fatal to a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    /// Utterances dropped because a txt/fon/wav companion was absent.
    pub missing_companion: u32,
    /// Utterances dropped because the transcript could not be read.
    pub transcript_decode: u32,
    /// Alignment files that failed to read; the entry is still emitted with
    /// an empty phoneme text.
    pub alignment_read: u32,
}

impl SkipCounts {
    pub fn skipped_utterances(&self) -> u32 {
        self.missing_companion + self.transcript_decode
    }

    pub(crate) fn merge(&mut self, other: SkipCounts) {
        self.missing_companion += other.missing_companion;
        self.transcript_decode += other.transcript_decode;
        self.alignment_read += other.alignment_read;
    }
}

/// Final counts reported after a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub discovered: usize,
    pub train_entries: usize,
    pub validation_entries: usize,
    pub skips: SkipCounts,
    pub inventory_size: usize,
}
