//! Ranking core for the scoop flavor search engine.
//!
//! Raw flavor records are deduplicated into one document per title, then four
//! per-field vector spaces (description, subhead, ingredients, reviews) are
//! fitted once at startup. A query is tokenized, projected into each field's
//! space, and scored as a weighted sum of per-field cosine similarities;
//! matches can be explained through the latent dimensions that drove them.
//! All model state is immutable after `Engine::build` and safe to share
//! across threads.

pub mod document;
pub mod engine;
pub mod explain;
pub mod filter;
pub mod index;
pub mod space;
pub mod svd;
pub mod tokenizer;

pub type DocId = u32;

pub use document::{normalize_records, Document, RawRecord};
pub use engine::{
    Engine, EngineConfig, EngineError, Field, FieldWeights, SearchHit, SearchOptions, TOP_K,
};
pub use explain::{ThemeTerm, Themes};
pub use space::{FieldSpace, SpaceOptions};
pub use tokenizer::{tokenize, NullNormalizer, StemNormalizer, SynonymNormalizer, TermNormalizer};
