use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{normalize_records, Document, RawRecord};
use crate::explain::{self, Themes};
use crate::filter;
use crate::space::{FieldSpace, SpaceOptions};
use crate::tokenizer::{tokenize, SynonymNormalizer, TermNormalizer};

/// Fixed result-set cap of the query operation.
pub const TOP_K: usize = 10;

/// The scored text fields of a flavor document. Adding a field is a
/// compile-time change: every match below is exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Description,
    Subhead,
    Ingredients,
    Reviews,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Description,
        Field::Subhead,
        Field::Ingredients,
        Field::Reviews,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::Subhead => "subhead",
            Field::Ingredients => "ingredients",
            Field::Reviews => "reviews",
        }
    }

    fn text(self, doc: &Document) -> &str {
        match self {
            Field::Description => &doc.description,
            Field::Subhead => &doc.subhead,
            Field::Ingredients => &doc.ingredients,
            Field::Reviews => &doc.reviews,
        }
    }
}

/// Per-field weights of the composite score. They need not sum to 1; a
/// zero-weight field is skipped entirely.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub description: f64,
    pub subhead: f64,
    pub ingredients: f64,
    pub reviews: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            description: 0.4,
            subhead: 0.3,
            ingredients: 0.1,
            reviews: 0.2,
        }
    }
}

impl FieldWeights {
    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Description => self.description,
            Field::Subhead => self.subhead,
            Field::Ingredients => self.ingredients,
            Field::Reviews => self.reviews,
        }
    }
}

/// Deployment configuration of the ranking model. Every knob has the
/// serving defaults, so an empty JSON object is a valid config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub weights: FieldWeights,
    /// Reduced-rank latent projection on every field; plain TF-IDF when off.
    pub latent: bool,
    /// Target rank before the per-field vocabulary clamp.
    pub latent_rank: usize,
    pub min_df: usize,
    pub max_df_ratio: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            latent: true,
            latent_rank: 100,
            min_df: 1,
            max_df_ratio: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot build a ranking model over an empty corpus")]
    EmptyCorpus,
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Per-query parameters of the search operation.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Documents rated strictly below this are dropped.
    pub min_rating: f64,
    /// Excluded ingredient categories, e.g. "nuts".
    pub exclude: Vec<String>,
}

/// One ranked result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub brand: String,
    pub description: String,
    pub subhead: String,
    pub ingredients: String,
    pub rating: f64,
    pub score: f64,
    pub reviews: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Themes>,
}

struct FieldSpaces {
    description: FieldSpace,
    subhead: FieldSpace,
    ingredients: FieldSpace,
    reviews: FieldSpace,
}

impl FieldSpaces {
    fn get(&self, field: Field) -> &FieldSpace {
        match field {
            Field::Description => &self.description,
            Field::Subhead => &self.subhead,
            Field::Ingredients => &self.ingredients,
            Field::Reviews => &self.reviews,
        }
    }
}

/// The fitted ranking model. Built once from the full corpus, immutable
/// afterwards; queries are pure reads and may run concurrently.
pub struct Engine {
    docs: Vec<Document>,
    spaces: FieldSpaces,
    weights: FieldWeights,
    normalizer: Box<dyn TermNormalizer>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("docs", &self.docs)
            .field("spaces", &"<FieldSpaces>")
            .field("weights", &self.weights)
            .field("normalizer", &"<dyn TermNormalizer>")
            .finish()
    }
}

impl Engine {
    /// Build with the default dairy synonym normalizer.
    pub fn build(records: Vec<RawRecord>, config: &EngineConfig) -> Result<Self, EngineError> {
        Self::build_with_normalizer(records, config, Box::new(SynonymNormalizer))
    }

    pub fn build_with_normalizer(
        records: Vec<RawRecord>,
        config: &EngineConfig,
        normalizer: Box<dyn TermNormalizer>,
    ) -> Result<Self, EngineError> {
        if config.latent && config.latent_rank == 0 {
            return Err(EngineError::InvalidConfig("latent_rank must be at least 1"));
        }
        if config.max_df_ratio <= 0.0 {
            return Err(EngineError::InvalidConfig("max_df_ratio must be positive"));
        }

        let docs = normalize_records(records);
        if docs.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        let opts = SpaceOptions {
            latent_rank: config.latent.then_some(config.latent_rank),
            min_df: config.min_df,
            max_df_ratio: config.max_df_ratio,
        };
        let fit = |field: Field| {
            let corpus: Vec<String> = docs
                .iter()
                .map(|doc| field.text(doc).to_string())
                .collect();
            FieldSpace::fit(&corpus, normalizer.as_ref(), &opts)
        };
        let spaces = FieldSpaces {
            description: fit(Field::Description),
            subhead: fit(Field::Subhead),
            ingredients: fit(Field::Ingredients),
            reviews: fit(Field::Reviews),
        };

        tracing::info!(
            num_docs = docs.len(),
            latent = config.latent,
            "ranking model built"
        );
        Ok(Self {
            docs,
            spaces,
            weights: config.weights,
            normalizer,
        })
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    /// Rank the corpus against a query: weighted sum of per-field cosine
    /// similarities, descending, post-filtered, capped at [`TOP_K`].
    /// An empty or whitespace-only query returns no results at all.
    pub fn search(&self, query: &str, opts: &SearchOptions) -> Vec<SearchHit> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let query_tokens = tokenize(query, self.normalizer.as_ref());

        let mut scores = vec![0.0f64; self.docs.len()];
        for field in Field::ALL {
            let weight = self.weights.get(field);
            if weight == 0.0 {
                continue;
            }
            let sims = self.spaces.get(field).similarities(&query_tokens);
            for (score, sim) in scores.iter_mut().zip(sims) {
                *score += weight * sim;
            }
        }

        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|&(_, score)| score > 0.0)
            .collect();
        // Stable sort keeps first-encountered documents ahead on exact ties.
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        ranked
            .into_iter()
            .filter(|&(doc, _)| filter::retain(&self.docs[doc], opts))
            .take(TOP_K)
            .map(|(doc, score)| self.hit(doc, score, &query_tokens))
            .collect()
    }

    fn hit(&self, doc: usize, score: f64, query_tokens: &[String]) -> SearchHit {
        let themes_for = |space| {
            explain::field_themes(space, doc, query_tokens, explain::TOP_DIMS, explain::TERMS_PER_DIM)
        };
        let themes = Themes {
            description: themes_for(&self.spaces.description),
            subhead: themes_for(&self.spaces.subhead),
            ingredients: themes_for(&self.spaces.ingredients),
            reviews: themes_for(&self.spaces.reviews),
        };
        let record = &self.docs[doc];
        SearchHit {
            title: record.title.clone(),
            brand: record.brand.clone(),
            description: record.description.clone(),
            subhead: record.subhead.clone(),
            ingredients: record.ingredients.clone(),
            rating: record.rating,
            score,
            reviews: record.reviews.clone(),
            themes: if themes.is_empty() { None } else { Some(themes) },
        }
    }
}
