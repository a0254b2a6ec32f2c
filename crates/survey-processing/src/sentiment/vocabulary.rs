//! Static keyword tables for the sentiment scorer.
//!
//! All tables are immutable process-wide constants, initialized once on
//! first use. Weights for positive/negative keywords are integers in 1..=3;
//! intensifier multipliers are fractional amplification factors.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Positive keywords and their weights.
pub static POSITIVE_KEYWORDS: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    HashMap::from([
        ("excellent", 3),
        ("amazing", 3),
        ("great", 2),
        ("good", 2),
        ("wonderful", 3),
        ("fantastic", 3),
        ("outstanding", 3),
        ("perfect", 3),
        ("love", 2),
        ("like", 1),
        ("enjoy", 2),
        ("happy", 2),
        ("satisfied", 2),
        ("pleased", 2),
        ("impressed", 2),
        ("recommend", 2),
        ("helpful", 2),
        ("useful", 1),
        ("effective", 2),
        ("quality", 1),
        ("best", 2),
        ("awesome", 3),
        ("brilliant", 3),
        ("superb", 3),
        ("terrific", 3),
        ("delighted", 3),
        ("thrilled", 3),
        ("excited", 2),
        ("positive", 1),
        ("successful", 2),
        ("improved", 1),
        ("better", 1),
        ("exceeded", 2),
        ("surpassed", 2),
    ])
});

/// Negative keywords and their weights.
pub static NEGATIVE_KEYWORDS: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    HashMap::from([
        ("terrible", 3),
        ("awful", 3),
        ("horrible", 3),
        ("bad", 2),
        ("poor", 2),
        ("disappointing", 2),
        ("frustrated", 2),
        ("angry", 2),
        ("upset", 2),
        ("annoyed", 2),
        ("hate", 3),
        ("dislike", 2),
        ("worst", 3),
        ("useless", 2),
        ("waste", 2),
        ("problem", 1),
        ("issue", 1),
        ("difficult", 1),
        ("confusing", 1),
        ("complicated", 1),
        ("broken", 2),
        ("failed", 2),
        ("error", 1),
        ("bug", 1),
        ("crash", 2),
        ("slow", 1),
        ("expensive", 1),
        ("overpriced", 2),
        ("cheap", 1),
        ("unreliable", 2),
        ("unstable", 2),
        ("inconsistent", 1),
        ("disorganized", 1),
        ("messy", 1),
        ("chaotic", 2),
        ("stressful", 2),
        ("overwhelming", 2),
    ])
});

/// Neutral keywords. Kept for vocabulary documentation; matching a neutral
/// word never changes a score.
pub static NEUTRAL_KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "okay",
        "fine",
        "average",
        "normal",
        "standard",
        "usual",
        "typical",
        "regular",
        "common",
        "basic",
        "simple",
        "straightforward",
        "clear",
        "understandable",
        "adequate",
        "sufficient",
        "acceptable",
        "reasonable",
    ])
});

/// Negation words that flip the sentiment of the next few words.
/// Contractions appear with and without apostrophes since punctuation
/// stripping keeps apostrophes but user input may not.
pub static NEGATION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "not",
        "no",
        "never",
        "none",
        "neither",
        "nor",
        "nobody",
        "nothing",
        "nowhere",
        "hardly",
        "barely",
        "scarcely",
        "doesn't",
        "don't",
        "didn't",
        "won't",
        "can't",
        "couldn't",
        "wouldn't",
        "shouldn't",
        "isn't",
        "aren't",
        "wasn't",
        "weren't",
        "hasn't",
        "haven't",
        "hadn't",
        "doesnt",
        "dont",
        "didnt",
        "wont",
        "cant",
        "couldnt",
        "wouldnt",
        "shouldnt",
        "isnt",
        "arent",
        "wasnt",
        "werent",
        "hasnt",
        "havent",
        "hadnt",
    ])
});

/// Intensifier words and their amplification factors.
pub static INTENSIFIER_WORDS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("very", 1.5),
        ("really", 1.5),
        ("extremely", 2.0),
        ("absolutely", 2.0),
        ("completely", 2.0),
        ("totally", 2.0),
        ("entirely", 2.0),
        ("thoroughly", 1.5),
        ("highly", 1.5),
        ("incredibly", 2.0),
        ("amazingly", 2.0),
        ("exceptionally", 2.0),
        ("particularly", 1.2),
        ("especially", 1.2),
        ("notably", 1.2),
        ("remarkably", 1.5),
    ])
});
