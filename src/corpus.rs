use std::fs;
use std::path::{Path, PathBuf};

use rand::prelude::SliceRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::CorpusError;

pub const ALIGNMENT_EXTENSION: &str = "fon";

/// Utterance identifiers partitioned for training and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub train: Vec<String>,
    pub validation: Vec<String>,
}

/// Scan the alignment directory and return every `.fon` file, sorted by
/// path. Subdirectories and other extensions are ignored. These are the
/// files the inventory scan consumes; identifier extraction is layered on
/// top and may not round-trip for filenames outside the naming template.
pub fn discover_alignment_files(fon_dir: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    let entries = fs::read_dir(fon_dir)
        .map_err(|e| CorpusError::io("scanning alignment directory", fon_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| CorpusError::io("scanning alignment directory", fon_dir, e))?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some(ALIGNMENT_EXTENSION) {
            files.push(path);
        }
    }
    files.sort_unstable();
    Ok(files)
}

/// Utterance identifier for an alignment file: the final underscore-delimited
/// component of the file stem, so `crpih_uvigo_gl_sabela_00001.fon` yields
/// `00001`. A stem without underscores is its own identifier. `None` only for
/// paths without a UTF-8 stem.
pub fn identifier_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let id = stem.rsplit('_').next().unwrap_or(stem);
    Some(id.to_string())
}

/// Sorted utterance identifiers derived from the alignment directory.
pub fn discover_identifiers(fon_dir: &Path) -> Result<Vec<String>, CorpusError> {
    let mut identifiers: Vec<String> = discover_alignment_files(fon_dir)?
        .iter()
        .filter_map(|p| identifier_for(p))
        .collect();
    identifiers.sort_unstable();
    Ok(identifiers)
}

/// Uniformly shuffle the identifiers and split at `floor(train_fraction × N)`.
///
/// With fewer than a handful of identifiers either side may come out empty;
/// that is acceptable, not an error. An unseeded split is not reproducible
/// across runs.
pub fn split_identifiers(
    mut identifiers: Vec<String>,
    train_fraction: f64,
    seed: Option<u64>,
) -> SplitPlan {
    match seed {
        Some(seed) => identifiers.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => identifiers.shuffle(&mut rand::thread_rng()),
    }
    let split_idx = (train_fraction * identifiers.len() as f64).floor() as usize;
    let validation = identifiers.split_off(split_idx);
    SplitPlan {
        train: identifiers,
        validation,
    }
}
