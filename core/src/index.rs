use std::collections::HashMap;

use crate::DocId;

/// Per-token posting lists: token -> (doc id, raw term count), ordered by
/// ascending doc id with at most one entry per document.
pub type Postings = HashMap<String, Vec<(DocId, u32)>>;

/// Build posting lists from pre-tokenized documents.
pub fn build_postings(docs_tokens: &[Vec<String>]) -> Postings {
    let mut postings: Postings = HashMap::new();
    for (doc_id, tokens) in docs_tokens.iter().enumerate() {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for token in tokens {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
        for (term, count) in counts {
            postings
                .entry(term.to_string())
                .or_default()
                .push((doc_id as DocId, count));
        }
    }
    // Documents are ingested in order, but counts drain from a map.
    for list in postings.values_mut() {
        list.sort_by_key(|&(doc_id, _)| doc_id);
    }
    postings
}

/// IDF = log2(N / df) for tokens whose document frequency lies within
/// [min_df, max_df_ratio * N]. Tokens outside the bounds carry no entry and
/// are excluded from scoring.
pub fn compute_idf(
    postings: &Postings,
    n: usize,
    min_df: usize,
    max_df_ratio: f64,
) -> HashMap<String, f64> {
    let mut idf = HashMap::new();
    for (term, list) in postings {
        let df = list.len();
        if df < min_df || df as f64 > max_df_ratio * n as f64 {
            continue;
        }
        idf.insert(term.clone(), (n as f64 / df as f64).log2());
    }
    idf
}

/// Euclidean norm of each document's count x idf vector, restricted to
/// tokens carrying an IDF entry. Only the non-latent scoring path reads
/// these. Terms are visited in sorted order so rebuilds are bit-identical.
pub fn compute_doc_norms(postings: &Postings, idf: &HashMap<String, f64>, n: usize) -> Vec<f64> {
    let mut terms: Vec<&String> = postings.keys().collect();
    terms.sort();

    let mut norms = vec![0.0f64; n];
    for term in terms {
        let Some(&weight) = idf.get(term) else {
            continue;
        };
        for &(doc_id, count) in &postings[term] {
            let v = count as f64 * weight;
            norms[doc_id as usize] += v * v;
        }
    }
    for norm in norms.iter_mut() {
        *norm = norm.sqrt();
    }
    norms
}
