use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::alignment::parse_alignment_file;
use crate::config::{CorpusConfig, DivergencePolicy};
use crate::encoding::read_to_string_latin1;
use crate::error::CorpusError;
use crate::mapper::SymbolMapper;
use crate::types::{ManifestEntry, PartitionKind, PhonemeSequence, SkipCounts};

/// The three per-utterance companion files derived from the naming template.
#[derive(Debug, Clone)]
pub struct CompanionPaths {
    pub txt: PathBuf,
    pub fon: PathBuf,
    pub wav: PathBuf,
}

impl CompanionPaths {
    pub fn for_identifier(config: &CorpusConfig, id: &str) -> Self {
        let name = |ext: &str| format!("{}_{}.{}", config.filename_prefix, id, ext);
        Self {
            txt: config.txt_dir().join(name("txt")),
            fon: config.fon_dir().join(name("fon")),
            wav: config.wav_dir().join(name("wav")),
        }
    }

    pub fn all_exist(&self) -> bool {
        self.txt.exists() && self.fon.exists() && self.wav.exists()
    }
}

/// Build the manifest entries for one partition, in identifier order.
///
/// Per-utterance failures never abort the build: a missing companion or an
/// unreadable transcript drops the utterance, an unreadable alignment file
/// degrades to an empty phoneme text. Each case is logged and counted.
pub fn build_entries(
    config: &CorpusConfig,
    mapper: &SymbolMapper,
    identifiers: &[String],
    kind: PartitionKind,
) -> (Vec<ManifestEntry>, SkipCounts) {
    let mut entries = Vec::with_capacity(identifiers.len());
    let mut skips = SkipCounts::default();

    for id in identifiers {
        let paths = CompanionPaths::for_identifier(config, id);
        if !paths.all_exist() {
            tracing::warn!(
                identifier = %id,
                partition = kind.as_str(),
                "skipping utterance: missing companion file"
            );
            skips.missing_companion += 1;
            continue;
        }

        let text = match read_to_string_latin1(&paths.txt) {
            Ok(raw) => raw.trim().to_lowercase(),
            Err(err) => {
                tracing::warn!(
                    identifier = %id,
                    path = %paths.txt.display(),
                    error = %err,
                    "skipping utterance: transcript unreadable"
                );
                skips.transcript_decode += 1;
                continue;
            }
        };

        let sequence = match parse_alignment_file(&paths.fon, mapper) {
            Ok(sequence) => sequence,
            Err(err) => {
                tracing::warn!(
                    identifier = %id,
                    path = %paths.fon.display(),
                    error = %err,
                    "alignment file unreadable, emitting empty phoneme text"
                );
                skips.alignment_read += 1;
                PhonemeSequence::default()
            }
        };

        let entry = ManifestEntry {
            audio_filepath: paths.wav.to_string_lossy().into_owned(),
            text,
            phoneme_text: sequence.joined(),
            speaker: config.speaker_id.clone(),
            duration: None,
        };

        let copies = entry_copies(config, kind, &sequence);
        for _ in 0..copies {
            entries.push(entry.clone());
        }
    }

    (entries, skips)
}

fn entry_copies(config: &CorpusConfig, kind: PartitionKind, sequence: &PhonemeSequence) -> usize {
    match config.divergence_policy {
        DivergencePolicy::Off => 1,
        DivergencePolicy::DuplicateOnDivergence => {
            let divergent = kind == PartitionKind::Train
                && sequence
                    .symbols
                    .iter()
                    .any(|s| config.divergent_phonemes.contains(s));
            if divergent {
                2
            } else {
                1
            }
        }
    }
}

/// Serialize a partition as newline-delimited JSON, one entry per line.
pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<(), CorpusError> {
    let file = File::create(path).map_err(|e| CorpusError::io("creating manifest", path, e))?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        let line =
            serde_json::to_string(entry).map_err(|e| CorpusError::json("encoding manifest entry", e))?;
        writer
            .write_all(line.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(|e| CorpusError::io("writing manifest", path, e))?;
    }
    writer
        .flush()
        .map_err(|e| CorpusError::io("writing manifest", path, e))?;
    tracing::info!(
        path = %path.display(),
        entries = entries.len(),
        "manifest written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs;

    fn fixture_config(root: &Path) -> CorpusConfig {
        CorpusConfig {
            corpus_root: root.to_path_buf(),
            output_dir: root.to_path_buf(),
            filename_prefix: "spk".to_string(),
            speaker_id: "spk".to_string(),
            ..CorpusConfig::default()
        }
    }

    fn write_utterance(config: &CorpusConfig, id: &str, text: &[u8], fon: &[u8]) {
        for dir in [config.txt_dir(), config.fon_dir(), config.wav_dir()] {
            fs::create_dir_all(dir).unwrap();
        }
        let paths = CompanionPaths::for_identifier(config, id);
        fs::write(paths.txt, text).unwrap();
        fs::write(paths.fon, fon).unwrap();
        fs::write(paths.wav, b"RIFF").unwrap();
    }

    #[test]
    fn builds_entry_with_normalized_text_and_mapped_phonemes() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_utterance(&config, "00001", b"  Bos D\xedas \n", b"0.0 0.1 b\n0.1 0.2 O\n");

        let (entries, skips) = build_entries(
            &config,
            &SymbolMapper::default(),
            &["00001".to_string()],
            PartitionKind::Train,
        );
        assert_eq!(skips, SkipCounts::default());
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.text, "bos días");
        assert_eq!(entry.phoneme_text, "b ɔ");
        assert_eq!(entry.speaker, "spk");
        assert!(entry.duration.is_none());
        assert!(entry.audio_filepath.ends_with("spk_00001.wav"));
    }

    #[test]
    fn missing_companion_skips_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_utterance(&config, "00001", b"ola", b"0 1 a\n");
        fs::remove_file(CompanionPaths::for_identifier(&config, "00001").wav).unwrap();

        let (entries, skips) = build_entries(
            &config,
            &SymbolMapper::default(),
            &["00001".to_string()],
            PartitionKind::Validation,
        );
        assert!(entries.is_empty());
        assert_eq!(skips.missing_companion, 1);
    }

    #[test]
    fn duplication_policy_doubles_divergent_train_entries_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = fixture_config(dir.path());
        config.divergence_policy = DivergencePolicy::DuplicateOnDivergence;
        // "E" maps to divergent ɛ; "a" stays non-divergent.
        write_utterance(&config, "00001", b"un", b"0 1 E\n");
        write_utterance(&config, "00002", b"dous", b"0 1 a\n");

        let ids = ["00001".to_string(), "00002".to_string()];
        let (train, _) = build_entries(&config, &SymbolMapper::default(), &ids, PartitionKind::Train);
        assert_eq!(train.len(), 3);
        assert_eq!(train[0].phoneme_text, "ɛ");
        assert_eq!(train[1].phoneme_text, "ɛ");
        assert_eq!(train[2].phoneme_text, "a");

        let (val, _) = build_entries(
            &config,
            &SymbolMapper::default(),
            &ids,
            PartitionKind::Validation,
        );
        assert_eq!(val.len(), 2);
    }

    #[test]
    fn policy_off_never_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        write_utterance(&config, "00001", b"un", b"0 1 E\n");

        let (train, _) = build_entries(
            &config,
            &SymbolMapper::default(),
            &["00001".to_string()],
            PartitionKind::Train,
        );
        assert_eq!(train.len(), 1);
    }

    #[test]
    fn manifest_lines_are_json_objects_with_null_duration() {
        let dir = tempfile::tempdir().unwrap();
        let entries = vec![ManifestEntry {
            audio_filepath: "/c/wav/spk_1.wav".to_string(),
            text: "ola".to_string(),
            phoneme_text: "o l a".to_string(),
            speaker: "spk".to_string(),
            duration: None,
        }];
        let path = dir.path().join("train_manifest.json");
        write_manifest(&path, &entries).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(written.lines().next().unwrap()).unwrap();
        assert_eq!(value["audio_filepath"], "/c/wav/spk_1.wav");
        assert_eq!(value["text"], "ola");
        assert_eq!(value["phoneme_text"], "o l a");
        assert_eq!(value["speaker"], "spk");
        assert!(value["duration"].is_null());
        let keys: BTreeSet<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 5);
    }

    #[test]
    fn empty_partition_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("val_manifest.json");
        write_manifest(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
