use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashSet;

use crate::space::FieldSpace;

/// Default number of latent dimensions surfaced per field.
pub const TOP_DIMS: usize = 3;
/// Default number of terms surfaced per field.
pub const TERMS_PER_DIM: usize = 5;

lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for",
            "of", "with", "by", "is", "it", "as", "be", "this", "that", "from",
            "was", "are", "were", "been", "has", "have", "had", "not", "no",
            "do", "does", "did", "will", "would", "can", "could", "should",
            "i", "we", "you", "he", "she", "they", "my", "your", "its", "their",
            "our", "so", "if", "about", "up", "out", "just", "also", "more",
            "some", "any", "all", "very", "into", "over", "when", "while",
            "there", "here", "these", "those", "them", "than", "then", "too",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(term: &str) -> bool {
    STOPWORDS.contains(term)
}

/// One explanation term with its accumulated latent weight.
#[derive(Debug, Clone, Serialize)]
pub struct ThemeTerm {
    pub term: String,
    pub weight: f64,
}

/// Per-field explanation payload; a field's list is empty when the field is
/// not latent-reduced or contributed nothing to the match.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Themes {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<ThemeTerm>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subhead: Vec<ThemeTerm>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<ThemeTerm>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<ThemeTerm>,
}

impl Themes {
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.subhead.is_empty()
            && self.ingredients.is_empty()
            && self.reviews.is_empty()
    }
}

/// Terms explaining why `doc` matched the query in one field's latent space:
/// the dimensions with the largest |query x document| product (ties: lower
/// dimension), then the heaviest component terms across those dimensions
/// (ties: vocabulary order), stopwords discarded. Presentation only; never
/// affects ranking.
pub fn field_themes(
    space: &FieldSpace,
    doc: usize,
    query_tokens: &[String],
    top_dims: usize,
    terms_per_dim: usize,
) -> Vec<ThemeTerm> {
    let (Some(query), Some(doc_vec), Some(components)) = (
        space.latent_query(query_tokens),
        space.latent_doc(doc),
        space.components(),
    ) else {
        return Vec::new();
    };

    let mut contributions: Vec<(usize, f64)> = query
        .iter()
        .zip(doc_vec.iter())
        .map(|(q, d)| (q * d).abs())
        .enumerate()
        .collect();
    // Stable sort: equal products keep the lower dimension first.
    contributions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let terms = space.terms();
    let mut accumulated = vec![0.0f64; terms.len()];
    for &(dim, _) in contributions.iter().take(top_dims) {
        for (col, weight) in components[dim].iter().enumerate() {
            accumulated[col] += weight.abs();
        }
    }

    let mut ranked: Vec<(usize, f64)> = accumulated
        .into_iter()
        .enumerate()
        .filter(|&(col, weight)| weight > 0.0 && !is_stopword(&terms[col]))
        .collect();
    // Stable sort again: weight ties fall back to vocabulary order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    ranked
        .into_iter()
        .take(terms_per_dim)
        .map(|(col, weight)| ThemeTerm {
            term: terms[col].clone(),
            weight,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{FieldSpace, SpaceOptions};
    use crate::tokenizer::{tokenize, NullNormalizer};

    fn latent_space(texts: &[&str]) -> FieldSpace {
        let corpus: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let opts = SpaceOptions {
            latent_rank: Some(50),
            ..SpaceOptions::default()
        };
        FieldSpace::fit(&corpus, &NullNormalizer, &opts)
    }

    #[test]
    fn themes_surface_matching_terms() {
        let space = latent_space(&[
            "roasted pistachio brittle pieces",
            "dark chocolate fudge chunks swirled",
            "tart lemon curd ribbons layered",
        ]);
        let query = tokenize("dark chocolate fudge", &NullNormalizer);
        let themes = field_themes(&space, 1, &query, TOP_DIMS, TERMS_PER_DIM);
        assert!(!themes.is_empty());
        assert!(themes.len() <= TERMS_PER_DIM);
        let terms: Vec<&str> = themes.iter().map(|t| t.term.as_str()).collect();
        assert!(terms.contains(&"chocolate") || terms.contains(&"fudge") || terms.contains(&"dark"));
        for pair in themes.windows(2) {
            assert!(pair[0].weight >= pair[1].weight);
        }
    }

    #[test]
    fn themes_drop_stopwords() {
        let space = latent_space(&[
            "the and of caramel",
            "the and of toffee",
            "strawberry the and of",
        ]);
        let query = tokenize("caramel", &NullNormalizer);
        let themes = field_themes(&space, 0, &query, TOP_DIMS, TERMS_PER_DIM);
        for theme in &themes {
            assert!(!is_stopword(&theme.term), "stopword {} surfaced", theme.term);
        }
    }

    #[test]
    fn non_latent_space_has_no_themes() {
        let corpus = vec!["vanilla bean".to_string(), "rocky road".to_string()];
        let space = FieldSpace::fit(&corpus, &NullNormalizer, &SpaceOptions::default());
        let query = tokenize("vanilla", &NullNormalizer);
        assert!(field_themes(&space, 0, &query, TOP_DIMS, TERMS_PER_DIM).is_empty());
    }
}
