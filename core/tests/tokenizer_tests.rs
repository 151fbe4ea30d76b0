use scoop_core::{tokenize, NullNormalizer, StemNormalizer, SynonymNormalizer};

#[test]
fn it_lowercases_and_splits() {
    let toks = tokenize("Chunky MONKEY: banana & walnuts!", &NullNormalizer);
    assert_eq!(toks, vec!["chunky", "monkey", "banana", "walnuts"]);
}

#[test]
fn it_fuses_negative_markers() {
    assert!(tokenize("non-dairy frozen dessert", &NullNormalizer)
        .contains(&"not_dairy".to_string()));
    assert!(tokenize("non dairy frozen dessert", &NullNormalizer)
        .contains(&"not_dairy".to_string()));
    assert!(tokenize("gluten-free cone", &NullNormalizer).contains(&"not_gluten".to_string()));
    assert!(tokenize("nut free base", &NullNormalizer).contains(&"not_nut".to_string()));
}

#[test]
fn it_propagates_negation_one_token() {
    let toks = tokenize("no sugar added", &NullNormalizer);
    assert_eq!(toks, vec!["no", "sugar", "not_sugar", "added"]);

    let toks = tokenize("without artificial flavors", &NullNormalizer);
    assert_eq!(toks, vec!["without", "artificial", "not_artificial", "flavors"]);
}

#[test]
fn trailing_negation_word_stays_bare() {
    assert_eq!(tokenize("sugar no", &NullNormalizer), vec!["sugar", "no"]);
    assert_eq!(tokenize("no", &NullNormalizer), vec!["no"]);
}

#[test]
fn it_collapses_dairy_synonyms() {
    let toks = tokenize("sweet cream and milk base", &SynonymNormalizer);
    assert!(toks.contains(&"dairy".to_string()));
    assert!(!toks.contains(&"milk".to_string()));
    assert!(!toks.contains(&"cream".to_string()));
}

#[test]
fn negation_applies_after_normalization() {
    // "no milk" negates the canonical form, not the surface form.
    let toks = tokenize("no milk", &SynonymNormalizer);
    assert_eq!(toks, vec!["no", "dairy", "not_dairy"]);
}

#[test]
fn it_is_deterministic() {
    let a = tokenize("Non-Dairy, no nuts, café crème!", &SynonymNormalizer);
    let b = tokenize("Non-Dairy, no nuts, café crème!", &SynonymNormalizer);
    assert_eq!(a, b);
}

#[test]
fn stem_normalizer_stems() {
    let toks = tokenize("swirled swirls swirling", &StemNormalizer);
    assert!(toks.iter().all(|t| t == "swirl"));
}

#[test]
fn empty_text_yields_no_tokens() {
    assert!(tokenize("", &NullNormalizer).is_empty());
    assert!(tokenize("   \t\n", &NullNormalizer).is_empty());
}
