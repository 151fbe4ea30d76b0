use scoop_core::{
    tokenize, Engine, EngineConfig, EngineError, FieldSpace, FieldWeights, NullNormalizer,
    RawRecord, SearchOptions, SpaceOptions, TOP_K,
};

fn record(title: &str, description: &str, rating: f64) -> RawRecord {
    RawRecord {
        title: title.to_string(),
        brand: "bj".to_string(),
        description: description.to_string(),
        subhead: format!("{title} subhead"),
        ingredients: "cream, sugar".to_string(),
        rating,
        reviews: format!("people love {title}"),
    }
}

fn sample_records() -> Vec<RawRecord> {
    vec![
        record("Phish Food", "marshmallow caramel and fudge fish", 4.5),
        record("Cherry Garcia", "cherries and fudge flakes in cherry ice cream", 4.6),
        record("Chunky Monkey", "banana ice cream with walnuts and fudge chunks", 4.7),
    ]
}

fn description_only(latent: bool) -> EngineConfig {
    EngineConfig {
        weights: FieldWeights {
            description: 1.0,
            subhead: 0.0,
            ingredients: 0.0,
            reviews: 0.0,
        },
        latent,
        ..EngineConfig::default()
    }
}

#[test]
fn empty_corpus_fails_fast() {
    let err = Engine::build(Vec::new(), &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, EngineError::EmptyCorpus));
}

#[test]
fn empty_query_returns_nothing() {
    let engine = Engine::build(sample_records(), &EngineConfig::default()).unwrap();
    assert!(engine.search("", &SearchOptions::default()).is_empty());
    assert!(engine.search("   ", &SearchOptions::default()).is_empty());
}

#[test]
fn exact_description_match_ranks_first() {
    for latent in [false, true] {
        let engine = Engine::build(sample_records(), &description_only(latent)).unwrap();
        let hits = engine.search(
            "cherries and fudge flakes in cherry ice cream",
            &SearchOptions::default(),
        );
        assert!(!hits.is_empty());
        assert_eq!(hits[0].title, "Cherry Garcia");
        assert!((hits[0].score - 1.0).abs() < 1e-6, "score {}", hits[0].score);
        for hit in &hits[1..] {
            assert!(hit.score <= hits[0].score);
        }
    }
}

#[test]
fn composite_score_is_weighted_field_similarity() {
    // With a single nonzero weight the composite score must equal the raw
    // per-field similarity.
    let records = sample_records();
    let engine = Engine::build_with_normalizer(
        records.clone(),
        &description_only(false),
        Box::new(NullNormalizer),
    )
    .unwrap();

    let corpus: Vec<String> = records.iter().map(|r| r.description.clone()).collect();
    let space = FieldSpace::fit(&corpus, &NullNormalizer, &SpaceOptions::default());
    let query = "banana walnuts";
    let sims = space.similarities(&tokenize(query, &NullNormalizer));

    let hits = engine.search(query, &SearchOptions::default());
    assert_eq!(hits[0].title, "Chunky Monkey");
    assert!((hits[0].score - sims[2]).abs() < 1e-12);
}

#[test]
fn results_cap_at_top_k_descending() {
    // 15 of 25 descriptions match the query, so the matching set overflows
    // the cap; the tail keeps "fudge" below the max-df bound.
    let records: Vec<RawRecord> = (0..25)
        .map(|i| {
            let description = if i < 15 {
                format!("fudge swirl ribbon number {i}")
            } else {
                format!("plain vanilla base number {i}")
            };
            record(&format!("Variant {i}"), &description, 4.0)
        })
        .collect();
    let engine = Engine::build(records, &EngineConfig::default()).unwrap();
    let hits = engine.search("fudge swirl", &SearchOptions::default());
    assert!(hits.len() <= TOP_K);
    assert_eq!(hits.len(), TOP_K);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn rebuild_is_deterministic() {
    let a = Engine::build(sample_records(), &EngineConfig::default()).unwrap();
    let b = Engine::build(sample_records(), &EngineConfig::default()).unwrap();
    let hits_a = a.search("fudge cherry", &SearchOptions::default());
    let hits_b = b.search("fudge cherry", &SearchOptions::default());
    assert_eq!(hits_a.len(), hits_b.len());
    for (x, y) in hits_a.iter().zip(&hits_b) {
        assert_eq!(x.title, y.title);
        assert_eq!(x.score.to_bits(), y.score.to_bits());
    }
}

#[test]
fn min_rating_excludes_top_scorer() {
    let mut records = sample_records();
    records[2].rating = 4.0; // Chunky Monkey, the only banana flavor
    let engine = Engine::build(records, &description_only(true)).unwrap();

    let unfiltered = engine.search("banana walnuts", &SearchOptions::default());
    assert_eq!(unfiltered[0].title, "Chunky Monkey");

    let opts = SearchOptions {
        min_rating: 4.5,
        exclude: Vec::new(),
    };
    let filtered = engine.search("banana walnuts", &opts);
    assert!(filtered.iter().all(|h| h.title != "Chunky Monkey"));
    assert!(filtered.iter().all(|h| h.rating >= 4.5));
}

#[test]
fn excluded_category_drops_almond_ingredients() {
    let mut records = sample_records();
    records[0].ingredients = "cream, sugar, Almonds".to_string();
    let engine = Engine::build(records, &EngineConfig::default()).unwrap();

    let opts = SearchOptions {
        min_rating: 0.0,
        exclude: vec!["nuts".to_string()],
    };
    let hits = engine.search("marshmallow caramel fudge", &opts);
    assert!(hits.iter().all(|h| h.title != "Phish Food"));
}

#[test]
fn duplicate_titles_merge_reviews() {
    let mut records = sample_records();
    records.push(RawRecord {
        title: "PHISH  FOOD".to_string(),
        reviews: "tastes like a concert".to_string(),
        description: "ignored duplicate description".to_string(),
        ..Default::default()
    });
    let engine = Engine::build(records, &EngineConfig::default()).unwrap();
    assert_eq!(engine.num_docs(), 3);

    let hits = engine.search("marshmallow caramel fudge", &SearchOptions::default());
    let phish = hits.iter().find(|h| h.title == "Phish Food").unwrap();
    assert_eq!(phish.reviews, "people love Phish Food tastes like a concert");
    assert_eq!(phish.description, "marshmallow caramel and fudge fish");
}

#[test]
fn themes_only_on_latent_deployments() {
    let latent = Engine::build(sample_records(), &description_only(true)).unwrap();
    let hits = latent.search("cherry fudge", &SearchOptions::default());
    assert!(!hits.is_empty());
    assert!(hits[0].themes.is_some());
    let themes = hits[0].themes.as_ref().unwrap();
    assert!(themes.description.len() <= 5);

    let plain = Engine::build(sample_records(), &description_only(false)).unwrap();
    let hits = plain.search("cherry fudge", &SearchOptions::default());
    assert!(!hits.is_empty());
    assert!(hits[0].themes.is_none());
}

#[test]
fn synonym_normalizer_bridges_dairy_terms() {
    let mut records = sample_records();
    // Only one description carries a dairy-category word.
    records[0].description = "sweet cream base with marshmallow".to_string();
    records[1].description = "cherries and fudge flakes".to_string();
    records[2].description = "banana with walnuts and fudge chunks".to_string();
    let engine = Engine::build(records, &description_only(true)).unwrap();
    // "milk" appears in no description; it matches "cream" through the
    // dairy category.
    let hits = engine.search("milk", &SearchOptions::default());
    assert!(!hits.is_empty());
    assert_eq!(hits[0].title, "Phish Food");
}

#[test]
fn invalid_config_is_rejected() {
    let config = EngineConfig {
        latent_rank: 0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        Engine::build(sample_records(), &config),
        Err(EngineError::InvalidConfig(_))
    ));

    let config = EngineConfig {
        max_df_ratio: 0.0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        Engine::build(sample_records(), &config),
        Err(EngineError::InvalidConfig(_))
    ));
}
