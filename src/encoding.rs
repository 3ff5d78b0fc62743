use std::fs;
use std::io;
use std::path::Path;

/// Read a file as ISO 8859-1 text. Every byte maps to the Unicode code point
/// of the same value, so the conversion itself cannot fail; the corpus mixes
/// encodings and this is the one read that never raises a decode fault.
pub fn read_to_string_latin1(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(bytes.iter().map(|&b| char::from(b)).collect())
}
