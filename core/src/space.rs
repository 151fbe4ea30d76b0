use std::collections::HashMap;

use crate::index::{build_postings, compute_doc_norms, compute_idf, Postings};
use crate::svd::TruncatedSvd;
use crate::tokenizer::{tokenize, TermNormalizer};

/// How a field's vector space is fitted.
#[derive(Debug, Clone, Copy)]
pub struct SpaceOptions {
    /// Target rank of the latent projection; `None` keeps plain TF-IDF.
    pub latent_rank: Option<usize>,
    pub min_df: usize,
    pub max_df_ratio: f64,
}

impl Default for SpaceOptions {
    fn default() -> Self {
        Self {
            latent_rank: None,
            min_df: 1,
            max_df_ratio: 1.0,
        }
    }
}

struct Latent {
    svd: TruncatedSvd,
    doc_vectors: Vec<Vec<f64>>,
}

/// One field's fitted vector space: vocabulary, IDF weighting, posting
/// lists, and (when enabled) the reduced-rank projection of the document
/// matrix. Immutable once fitted; fields are statistically independent of
/// each other.
pub struct FieldSpace {
    vocab: HashMap<String, usize>,
    terms: Vec<String>,
    idf: HashMap<String, f64>,
    postings: Postings,
    doc_norms: Vec<f64>,
    n_docs: usize,
    latent: Option<Latent>,
}

impl FieldSpace {
    /// Fit the space over one field's corpus, one entry per document.
    pub fn fit(corpus: &[String], normalizer: &dyn TermNormalizer, opts: &SpaceOptions) -> Self {
        let docs_tokens: Vec<Vec<String>> = corpus
            .iter()
            .map(|text| tokenize(text, normalizer))
            .collect();
        let n_docs = docs_tokens.len();

        // Vocabulary in first-seen order; explanation ties depend on it.
        let mut vocab: HashMap<String, usize> = HashMap::new();
        let mut terms: Vec<String> = Vec::new();
        for tokens in &docs_tokens {
            for token in tokens {
                if !vocab.contains_key(token.as_str()) {
                    vocab.insert(token.clone(), terms.len());
                    terms.push(token.clone());
                }
            }
        }

        let postings = build_postings(&docs_tokens);
        let idf = compute_idf(&postings, n_docs, opts.min_df, opts.max_df_ratio);
        let doc_norms = compute_doc_norms(&postings, &idf, n_docs);

        let latent = opts.latent_rank.map(|rank| {
            let rows: Vec<Vec<(usize, f64)>> = docs_tokens
                .iter()
                .map(|tokens| weigh(tokens, &vocab, &idf))
                .collect();
            // Rank clamp: at most vocabulary size - 1, never below 1.
            let k = if terms.len() <= 1 {
                1
            } else {
                rank.min(terms.len() - 1)
            };
            let svd = TruncatedSvd::fit(&rows, terms.len(), k);
            let doc_vectors = rows.iter().map(|row| svd.transform(row)).collect();
            Latent { svd, doc_vectors }
        });

        tracing::debug!(
            num_docs = n_docs,
            vocab = terms.len(),
            latent_rank = ?latent.as_ref().map(|l| l.svd.rank()),
            "fitted field space"
        );

        Self {
            vocab,
            terms,
            idf,
            postings,
            doc_norms,
            n_docs,
            latent,
        }
    }

    /// Cosine similarity of the query against every document, in document
    /// order. Zero-norm query or document vectors score 0.
    pub fn similarities(&self, query_tokens: &[String]) -> Vec<f64> {
        match &self.latent {
            Some(latent) => {
                let query = latent.svd.transform(&weigh(query_tokens, &self.vocab, &self.idf));
                latent
                    .doc_vectors
                    .iter()
                    .map(|doc| cosine(&query, doc))
                    .collect()
            }
            None => self.raw_similarities(query_tokens),
        }
    }

    /// Term-at-a-time accumulation through the posting lists, divided by the
    /// precomputed document norms and the query norm.
    fn raw_similarities(&self, query_tokens: &[String]) -> Vec<f64> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for token in query_tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        let mut query_terms: Vec<(&str, u32)> = counts.into_iter().collect();
        query_terms.sort_by_key(|&(term, _)| term);

        let mut dots = vec![0.0f64; self.n_docs];
        let mut query_norm_sq = 0.0f64;
        for (term, count) in query_terms {
            let Some(&weight) = self.idf.get(term) else {
                continue;
            };
            let query_weight = count as f64 * weight;
            query_norm_sq += query_weight * query_weight;
            if let Some(list) = self.postings.get(term) {
                for &(doc_id, tf) in list {
                    dots[doc_id as usize] += query_weight * (tf as f64 * weight);
                }
            }
        }

        let query_norm = query_norm_sq.sqrt();
        dots.iter()
            .enumerate()
            .map(|(doc, &dot)| {
                let doc_norm = self.doc_norms[doc];
                if query_norm == 0.0 || doc_norm == 0.0 {
                    0.0
                } else {
                    dot / (query_norm * doc_norm)
                }
            })
            .collect()
    }

    /// The query's latent vector, when this field is reduced.
    pub fn latent_query(&self, query_tokens: &[String]) -> Option<Vec<f64>> {
        self.latent
            .as_ref()
            .map(|l| l.svd.transform(&weigh(query_tokens, &self.vocab, &self.idf)))
    }

    /// A document's latent vector, when this field is reduced.
    pub fn latent_doc(&self, doc: usize) -> Option<&[f64]> {
        self.latent.as_ref().map(|l| l.doc_vectors[doc].as_slice())
    }

    /// Latent-dimension rows over the vocabulary, when this field is reduced.
    pub fn components(&self) -> Option<&[Vec<f64>]> {
        self.latent.as_ref().map(|l| l.svd.components.as_slice())
    }

    /// Fitted vocabulary in first-seen order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn vocab_size(&self) -> usize {
        self.terms.len()
    }

    pub fn num_docs(&self) -> usize {
        self.n_docs
    }
}

/// Sparse count x idf vector over the fitted vocabulary, sorted by column.
/// Unseen terms and terms without an IDF entry contribute nothing.
fn weigh(
    tokens: &[String],
    vocab: &HashMap<String, usize>,
    idf: &HashMap<String, f64>,
) -> Vec<(usize, f64)> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    let mut row: Vec<(usize, f64)> = counts
        .into_iter()
        .filter_map(|(term, count)| match (vocab.get(term), idf.get(term)) {
            (Some(&col), Some(&weight)) => Some((col, count as f64 * weight)),
            _ => None,
        })
        .collect();
    row.sort_by_key(|&(col, _)| col);
    row
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

/// Cosine similarity; 0 whenever either vector has zero norm.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let (na, nb) = (norm(a), norm(b));
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot(a, b) / (na * nb)
}
