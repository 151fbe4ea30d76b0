use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::document::Document;
use crate::engine::SearchOptions;

lazy_static! {
    /// Excluded-category keyword table. A document is dropped when its
    /// ingredients text contains any keyword of an excluded category,
    /// case-insensitively, as a substring.
    static ref CATEGORY_KEYWORDS: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert(
            "nuts",
            &[
                "almond", "peanut", "cashew", "pecan", "hazelnut", "pistachio",
                "walnut", "macadamia", "praline", "nut",
            ][..],
        );
        m.insert(
            "dairy",
            &[
                "milk", "cream", "butter", "lactose", "whey", "casein", "yogurt",
                "custard", "dairy",
            ][..],
        );
        m.insert("eggs", &["egg", "yolk", "albumen", "meringue"][..]);
        m.insert("gluten", &["wheat", "flour", "barley", "malt", "rye", "gluten"][..]);
        m.insert("soy", &["soy", "soybean", "lecithin", "tofu"][..]);
        m
    };
}

/// Whether a scored document survives the post-filter. Ratings strictly
/// below the threshold are dropped; both predicates are independent, so
/// evaluation order never changes the surviving set. Unknown categories
/// match nothing.
pub fn retain(doc: &Document, opts: &SearchOptions) -> bool {
    if doc.rating < opts.min_rating {
        return false;
    }
    if opts.exclude.is_empty() {
        return true;
    }
    let ingredients = doc.ingredients.to_lowercase();
    for category in &opts.exclude {
        if let Some(keywords) = CATEGORY_KEYWORDS.get(category.to_lowercase().as_str()) {
            if keywords.iter().any(|kw| ingredients.contains(kw)) {
                return false;
            }
        }
    }
    true
}
