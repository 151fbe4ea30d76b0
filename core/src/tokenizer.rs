use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // "non dairy" / "non-dairy" -> "not_dairy"
    static ref NON_PREFIX: Regex = Regex::new(r"\bnon[\s-]([a-z0-9]+)\b").expect("valid regex");
    // "dairy free" / "dairy-free" -> "not_dairy"
    static ref FREE_SUFFIX: Regex = Regex::new(r"\b([a-z0-9]+)[\s-]free\b").expect("valid regex");
    // Underscore stays in the class so fused not_x tokens survive the split.
    static ref WORD: Regex = Regex::new(r"(?u)[\p{L}\p{N}_]+").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref SYNONYMS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("milk", "dairy"),
            ("cream", "dairy"),
            ("creamy", "dairy"),
            ("butter", "dairy"),
            ("buttermilk", "dairy"),
            ("cheese", "dairy"),
            ("cheesecake", "dairy"),
            ("custard", "dairy"),
            ("yogurt", "dairy"),
            ("yoghurt", "dairy"),
            ("whey", "dairy"),
            ("ghee", "dairy"),
            ("curd", "dairy"),
        ];
        pairs.iter().copied().collect()
    };
}

const NEGATION_WORDS: &[&str] = &["not", "no", "never", "none", "without"];

/// Maps a token onto a canonical representative of its semantic category.
/// Tokens outside every category pass through unchanged.
pub trait TermNormalizer: Send + Sync {
    fn normalize(&self, token: &str) -> String;
}

/// Static synonym table collapsing dairy-derived terms onto "dairy".
pub struct SynonymNormalizer;

impl TermNormalizer for SynonymNormalizer {
    fn normalize(&self, token: &str) -> String {
        match SYNONYMS.get(token) {
            Some(canonical) => (*canonical).to_string(),
            None => token.to_string(),
        }
    }
}

/// English suffix stemming as the normalization step.
pub struct StemNormalizer;

impl TermNormalizer for StemNormalizer {
    fn normalize(&self, token: &str) -> String {
        STEMMER.stem(token).to_string()
    }
}

/// Identity normalization.
pub struct NullNormalizer;

impl TermNormalizer for NullNormalizer {
    fn normalize(&self, token: &str) -> String {
        token.to_string()
    }
}

/// Tokenize text into normalized terms: NFKC fold and lowercase, fuse
/// negative-polarity markers ("non-dairy", "nut free") into `not_x` tokens,
/// split on non-alphanumeric boundaries, normalize each token, then propagate
/// standalone negation words onto the single following token.
///
/// "no sugar" yields `["no", "sugar", "not_sugar"]`: the negation word and
/// the negated token are both kept alongside the fused form.
pub fn tokenize(text: &str, normalizer: &dyn TermNormalizer) -> Vec<String> {
    let folded = text.nfkc().collect::<String>().to_lowercase();
    let fused = NON_PREFIX.replace_all(folded.trim(), "not_$1");
    let fused = FREE_SUFFIX.replace_all(&fused, "not_$1");

    let raw: Vec<String> = WORD
        .find_iter(&fused)
        .map(|m| normalizer.normalize(m.as_str()))
        .collect();

    let mut tokens = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if NEGATION_WORDS.contains(&raw[i].as_str()) && i + 1 < raw.len() {
            tokens.push(raw[i].clone());
            tokens.push(raw[i + 1].clone());
            tokens.push(format!("not_{}", raw[i + 1]));
            i += 2;
        } else {
            tokens.push(raw[i].clone());
            i += 1;
        }
    }
    tokens
}
