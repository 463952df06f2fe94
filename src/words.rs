use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// Trending-words screens never show more than this many entries.
pub const TRENDING_WORD_LIMIT: usize = 10;

/// Collapses inflectional variants to a single representative by reducing
/// each word to its lowercase Snowball (Porter-family) stem. Output holds one
/// word per distinct stem, ordered by the first appearance of each stem, and
/// the representative is always the first word in the input whose stem
/// matches.
pub fn dedupe_by_stem(words: &[String]) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    let stems: Vec<String> = words
        .iter()
        .map(|word| stemmer.stem(&word.to_lowercase()).into_owned())
        .collect();

    let mut seen = HashSet::new();
    let mut ordered_stems = Vec::new();
    for stem in &stems {
        if seen.insert(stem.clone()) {
            ordered_stems.push(stem.clone());
        }
    }

    ordered_stems
        .iter()
        .filter_map(|stem| {
            // First word matching the stem wins.
            words
                .iter()
                .zip(&stems)
                .find(|(_, candidate)| *candidate == stem)
                .map(|(word, _)| word.clone())
        })
        .collect()
}
