use std::path::Path;

use crate::encoding::read_to_string_latin1;
use crate::error::CorpusError;
use crate::mapper::SymbolMapper;
use crate::types::PhonemeSequence;

/// Trailing-field value marking silence or an utterance boundary. Discarded
/// during extraction, never mapped or emitted.
pub const SILENCE_MARKER: &str = "#";

/// Extract the mapped phoneme sequence from one alignment file.
///
/// A line is a data line only if it splits into at least two whitespace
/// fields and its first field, with decimal points and boundary markers
/// stripped, is entirely digits. Anything else (headers, comments) is
/// skipped without logging. The last field of a data line is the symbol;
/// silence markers are dropped, all other symbols pass through the mapper
/// in file order.
///
/// Errors are returned, not swallowed: callers decide whether a failed file
/// is fatal (it never is in the standard pipeline, which logs and substitutes
/// an empty sequence).
pub fn parse_alignment_file(
    path: &Path,
    mapper: &SymbolMapper,
) -> Result<PhonemeSequence, CorpusError> {
    let text = read_to_string_latin1(path)
        .map_err(|e| CorpusError::io("reading alignment file", path, e))?;

    let mut sequence = PhonemeSequence::default();
    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if !is_data_line(&fields) {
            continue;
        }
        let symbol = fields[fields.len() - 1];
        if symbol == SILENCE_MARKER {
            continue;
        }
        sequence.source_codes.insert(symbol.to_string());
        sequence.symbols.push(mapper.map(symbol).to_string());
    }
    Ok(sequence)
}

fn is_data_line(fields: &[&str]) -> bool {
    if fields.len() < 2 {
        return false;
    }
    let lead: String = fields[0].chars().filter(|c| *c != '.' && *c != '#').collect();
    !lead.is_empty() && lead.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_fon(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn preserves_temporal_order_and_maps_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fon(
            &dir,
            "u.fon",
            b"0.00 0.10 a\n0.10 0.20 E\n0.20 0.30 rr\n0.30 0.40 n\n",
        );
        let seq = parse_alignment_file(&path, &SymbolMapper::default()).unwrap();
        assert_eq!(seq.symbols, ["a", "ɛ", "r", "n"]);
        assert_eq!(seq.joined(), "a ɛ r n");
    }

    #[test]
    fn silence_only_file_yields_empty_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fon(&dir, "u.fon", b"0.00 0.50 #\n0.50 1.00 #\n");
        let seq = parse_alignment_file(&path, &SymbolMapper::default()).unwrap();
        assert!(seq.symbols.is_empty());
        assert!(seq.source_codes.is_empty());
    }

    #[test]
    fn skips_header_comment_and_short_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fon(
            &dir,
            "u.fon",
            b"; generated by aligner\nHEADER v2\n0.00\n0.00 0.10 a\nend of file\n",
        );
        let seq = parse_alignment_file(&path, &SymbolMapper::default()).unwrap();
        assert_eq!(seq.symbols, ["a"]);
    }

    #[test]
    fn accepts_fractional_and_marker_decorated_boundaries() {
        // Leading fields keep qualifying after '.' and '#' are stripped.
        let dir = tempfile::tempdir().unwrap();
        let path = write_fon(&dir, "u.fon", b"#0.10 0.20 O\n12.5 13 s\n");
        let seq = parse_alignment_file(&path, &SymbolMapper::default()).unwrap();
        assert_eq!(seq.symbols, ["ɔ", "s"]);
    }

    #[test]
    fn rejects_lines_whose_lead_is_only_markers() {
        // "#." strips to nothing, "." strips to nothing: neither qualifies.
        let dir = tempfile::tempdir().unwrap();
        let path = write_fon(&dir, "u.fon", b"#. 0.10 a\n. again b\n0.0 0.1 b\n");
        let seq = parse_alignment_file(&path, &SymbolMapper::default()).unwrap();
        assert_eq!(seq.symbols, ["b"]);
    }

    #[test]
    fn records_distinct_source_codes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fon(&dir, "u.fon", b"0 1 T\n1 2 Z\n2 3 T\n3 4 a\n");
        let seq = parse_alignment_file(&path, &SymbolMapper::default()).unwrap();
        assert_eq!(seq.symbols, ["θ", "θ", "θ", "a"]);
        let codes: Vec<&str> = seq.source_codes.iter().map(String::as_str).collect();
        assert_eq!(codes, ["T", "Z", "a"]);
    }

    #[test]
    fn latin1_bytes_do_not_abort_the_parse() {
        let dir = tempfile::tempdir().unwrap();
        // 0xE9 is 'é' in Latin-1 and invalid UTF-8 on its own.
        let path = write_fon(&dir, "u.fon", b"0.00 0.10 \xe9\n0.10 0.20 a\n");
        let seq = parse_alignment_file(&path, &SymbolMapper::default()).unwrap();
        assert_eq!(seq.symbols, ["é", "a"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_alignment_file(&dir.path().join("absent.fon"), &SymbolMapper::default());
        assert!(err.is_err());
    }
}
