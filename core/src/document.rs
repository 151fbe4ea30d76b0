use serde::Deserialize;
use std::collections::HashMap;

/// One raw flavor record as it appears in the corpus file. Several records
/// may describe the same flavor (one per review). Missing keys default to
/// empty text / zero rating.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subhead: String,
    /// The source data set calls this column `ingredients_y`.
    #[serde(default, alias = "ingredients_y")]
    pub ingredients: String,
    #[serde(default)]
    pub rating: f64,
    /// Review body; called `text` in the source data set.
    #[serde(default, alias = "text")]
    pub reviews: String,
}

/// One deduplicated flavor: all raw records sharing a normalized title,
/// merged. Reviews accumulate by append; every other field keeps its
/// first-seen value.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub title: String,
    pub brand: String,
    pub description: String,
    pub subhead: String,
    pub ingredients: String,
    pub rating: f64,
    pub reviews: String,
}

/// Identity key for deduplication: case-folded, whitespace-collapsed title.
pub fn identity_key(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Collapse raw records into one document per identity key, preserving the
/// first-seen order of distinct keys. Later duplicates only contribute their
/// review text, space-joined onto the existing reviews.
pub fn normalize_records(records: Vec<RawRecord>) -> Vec<Document> {
    let mut order: Vec<String> = Vec::new();
    let mut by_key: HashMap<String, Document> = HashMap::new();

    for rec in records {
        let key = identity_key(&rec.title);
        match by_key.get_mut(&key) {
            Some(doc) => {
                if !rec.reviews.is_empty() {
                    if !doc.reviews.is_empty() {
                        doc.reviews.push(' ');
                    }
                    doc.reviews.push_str(&rec.reviews);
                }
            }
            None => {
                order.push(key.clone());
                by_key.insert(
                    key,
                    Document {
                        title: rec.title.trim().to_string(),
                        brand: rec.brand.trim().to_string(),
                        description: rec.description,
                        subhead: rec.subhead,
                        ingredients: rec.ingredients,
                        rating: rec.rating,
                        reviews: rec.reviews,
                    },
                );
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| by_key.remove(&key))
        .collect()
}
