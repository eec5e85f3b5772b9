use marktree::common::slug::{slugify_with, IdGenerator, SlugOptions};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    #[test]
    fn slugs_are_lowercase_ascii_with_separators(text in "\\PC{0,40}") {
        let slug = slugify_with(&text, &SlugOptions::default());
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
    }

    #[test]
    fn slugs_respect_max_length(text in "\\PC{0,60}", max in 0usize..30) {
        let slug = slugify_with(&text, &SlugOptions::default().with_max_length(max));
        prop_assert!(slug.len() <= max);
    }

    #[test]
    fn generated_ids_are_pairwise_distinct(labels in prop::collection::vec("[a-zA-Z0-9 -]{0,12}", 0..30)) {
        let mut generator = IdGenerator::new();
        let ids: Vec<String> = labels.iter().map(|label| generator.generate(label)).collect();
        let distinct: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(distinct.len(), ids.len());
    }

    #[test]
    fn repeated_labels_count_up(label in "[a-z]{1,10}", repeats in 1usize..6) {
        let mut generator = IdGenerator::new();
        for n in 0..repeats {
            let expected = if n == 0 { label.clone() } else { format!("{label}-{n}") };
            prop_assert_eq!(generator.generate(&label), expected);
        }
    }
}

#[test]
fn reset_forgets_issued_ids() {
    let mut generator = IdGenerator::new();
    assert_eq!(generator.generate("Intro"), "intro");
    assert_eq!(generator.generate("Intro"), "intro-1");
    generator.reset();
    assert_eq!(generator.generate("Intro"), "intro");
}
