use std::fs;

use crate::config::CorpusConfig;
use crate::corpus::{discover_alignment_files, identifier_for, split_identifiers};
use crate::error::CorpusError;
use crate::inventory::{collect_inventory, write_inventory};
use crate::manifest::{build_entries, write_manifest};
use crate::mapper::SymbolMapper;
use crate::types::{PartitionKind, RunSummary, SkipCounts};

/// End-to-end corpus conversion: discovery, split, both manifests, the
/// phoneme dictionary, and the substitution-table validation warnings.
pub struct ManifestPipeline {
    config: CorpusConfig,
    mapper: SymbolMapper,
}

impl ManifestPipeline {
    pub fn new(config: CorpusConfig) -> Result<Self, CorpusError> {
        config.validate()?;
        Ok(Self {
            config,
            mapper: SymbolMapper::default(),
        })
    }

    /// Substitute the default symbol table, e.g. to resolve a known
    /// source-table collision.
    pub fn with_mapper(mut self, mapper: SymbolMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Run the full pipeline. Per-utterance problems are logged and counted;
    /// only configuration and output-write failures are fatal.
    pub fn run(&self) -> Result<RunSummary, CorpusError> {
        let alignment_files = discover_alignment_files(&self.config.fon_dir())?;
        let mut identifiers: Vec<String> = alignment_files
            .iter()
            .filter_map(|p| identifier_for(p))
            .collect();
        identifiers.sort_unstable();
        let discovered = identifiers.len();
        tracing::info!(
            corpus_root = %self.config.corpus_root.display(),
            utterances = discovered,
            "corpus scan complete"
        );

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| CorpusError::io("creating output directory", &self.config.output_dir, e))?;

        let plan = split_identifiers(
            identifiers,
            self.config.train_fraction,
            self.config.shuffle_seed,
        );

        let mut skips = SkipCounts::default();

        let (train_entries, train_skips) = build_entries(
            &self.config,
            &self.mapper,
            &plan.train,
            PartitionKind::Train,
        );
        skips.merge(train_skips);
        let train_path = self
            .config
            .output_dir
            .join(PartitionKind::Train.manifest_filename());
        write_manifest(&train_path, &train_entries)?;

        let (validation_entries, validation_skips) = build_entries(
            &self.config,
            &self.mapper,
            &plan.validation,
            PartitionKind::Validation,
        );
        skips.merge(validation_skips);
        let validation_path = self
            .config
            .output_dir
            .join(PartitionKind::Validation.manifest_filename());
        write_manifest(&validation_path, &validation_entries)?;

        // The inventory scans every discovered alignment file, not the
        // partitions, so symbols from skipped utterances and from files
        // outside the companion naming template still make the dictionary.
        let inventory = collect_inventory(&self.mapper, &alignment_files);
        let dict_path = self.config.output_dir.join(self.config.dictionary_filename());
        write_inventory(&dict_path, &inventory.symbols)?;

        for (target, sources) in self.mapper.collisions_among(&inventory.source_codes) {
            tracing::warn!(
                target = %target,
                sources = ?sources,
                "substitution-table collision: multiple observed source codes map to one symbol"
            );
        }

        let summary = RunSummary {
            discovered,
            train_entries: train_entries.len(),
            validation_entries: validation_entries.len(),
            skips,
            inventory_size: inventory.symbols.len(),
        };
        tracing::info!(
            discovered = summary.discovered,
            train_entries = summary.train_entries,
            validation_entries = summary.validation_entries,
            skipped_missing = summary.skips.missing_companion,
            skipped_transcript = summary.skips.transcript_decode,
            alignment_errors = summary.skips.alignment_read,
            inventory_size = summary.inventory_size,
            "manifest generation complete"
        );
        Ok(summary)
    }
}
