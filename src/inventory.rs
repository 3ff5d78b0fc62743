use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::alignment::parse_alignment_file;
use crate::error::CorpusError;
use crate::mapper::SymbolMapper;

/// Distinct symbols observed across the whole corpus, independent of the
/// train/validation split, together with the raw codes they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonemeInventory {
    pub symbols: BTreeSet<String>,
    pub source_codes: BTreeSet<String>,
}

/// Re-parse every discovered alignment file and union the resulting symbols.
///
/// The scan works on the files themselves, not on identifiers, so alignment
/// files outside the companion naming template still contribute. Unreadable
/// files contribute nothing; they are logged and the scan continues, matching
/// the soft-failure rule of the manifest build.
pub fn collect_inventory(mapper: &SymbolMapper, alignment_files: &[PathBuf]) -> PhonemeInventory {
    let mut inventory = PhonemeInventory::default();
    for fon_path in alignment_files {
        match parse_alignment_file(fon_path, mapper) {
            Ok(sequence) => {
                inventory.symbols.extend(sequence.symbols);
                inventory.source_codes.extend(sequence.source_codes);
            }
            Err(err) => {
                tracing::warn!(
                    path = %fon_path.display(),
                    error = %err,
                    "alignment file skipped during inventory scan"
                );
            }
        }
    }
    inventory
}

/// Write the inventory as a two-column self-mapped dictionary, one
/// `<symbol> <symbol>` line per distinct symbol, UTF-8, sorted.
pub fn write_inventory(path: &Path, symbols: &BTreeSet<String>) -> Result<(), CorpusError> {
    let file = File::create(path).map_err(|e| CorpusError::io("creating phoneme dictionary", path, e))?;
    let mut writer = BufWriter::new(file);
    for symbol in symbols {
        writeln!(writer, "{symbol} {symbol}")
            .map_err(|e| CorpusError::io("writing phoneme dictionary", path, e))?;
    }
    writer
        .flush()
        .map_err(|e| CorpusError::io("writing phoneme dictionary", path, e))?;
    tracing::info!(
        path = %path.display(),
        symbols = symbols.len(),
        "phoneme dictionary written"
    );
    Ok(())
}
