use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Default SAMPA-like to IPA substitution table for the corpus.
///
/// `T` and `Z` both map to `θ`; the collision comes from the source table and
/// is kept as-is rather than silently corrected. [`SymbolMapper::collisions_among`]
/// lets a caller surface it when both codes actually occur.
const DEFAULT_SAMPA_TO_IPA: &[(&str, &str)] = &[
    ("E", "ɛ"),
    ("O", "ɔ"),
    ("x", "ʃ"),
    ("N", "ŋ"),
    ("tS", "tʃ"),
    ("rr", "r"),
    ("r", "ɾ"),
    ("J", "ɲ"),
    ("T", "θ"),
    ("B", "β"),
    ("D", "ð"),
    ("G", "ɣ"),
    ("S", "s"),
    ("Z", "θ"),
];

/// Phonemes considered distinctive for this corpus versus a baseline dialect.
/// Only consulted by the train-set duplication policy.
const DEFAULT_DIVERGENT_PHONEMES: &[&str] = &["ɛ", "ɔ", "ʃ", "ɰ", "ħ", "ŋ", "ʒ", "ɟ"];

pub fn default_divergent_phonemes() -> BTreeSet<String> {
    DEFAULT_DIVERGENT_PHONEMES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Translates source phonetic codes to target symbols. Codes absent from the
/// table pass through unchanged, so mapping is total over arbitrary strings.
/// The table is fixed at construction.
#[derive(Debug, Clone)]
pub struct SymbolMapper {
    table: HashMap<String, String>,
}

impl SymbolMapper {
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn map<'a>(&'a self, code: &'a str) -> &'a str {
        self.table.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Targets reached by more than one of the observed source codes.
    /// Returns `(target, sorted colliding sources)` pairs; a target is
    /// reported only when at least two of its sources were observed.
    pub fn collisions_among(&self, observed: &BTreeSet<String>) -> Vec<(String, Vec<String>)> {
        let mut by_target: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (source, target) in &self.table {
            if observed.contains(source) {
                by_target
                    .entry(target.as_str())
                    .or_default()
                    .push(source.as_str());
            }
        }
        by_target
            .into_iter()
            .filter(|(_, sources)| sources.len() > 1)
            .map(|(target, mut sources)| {
                sources.sort_unstable();
                (
                    target.to_string(),
                    sources.into_iter().map(str::to_string).collect(),
                )
            })
            .collect()
    }
}

impl Default for SymbolMapper {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_SAMPA_TO_IPA.iter().copied())
    }
}
