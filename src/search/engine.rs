//! Layered product-name ranking.
//!
//! Five tiers are tried in order against the whole candidate set; the first
//! tier with at least one match decides the result:
//!
//! 1. exact normalized name,
//! 2. single-word query equal to a name word,
//! 3. all query words contained in the name (scored),
//! 4. any query word contained in the name (scored),
//! 5. query-word prefixes contained in the name (scored).

use super::normalize::{NormalizedText, normalize_for_search};
use super::types::{Candidate, MatchLayer, ScoredCandidate, SearchOutcome};
use std::collections::HashSet;

const WHOLE_TOKEN_BONUS: f64 = 10.0;
const FIRST_TOKEN_BONUS: f64 = 2.0;
const CONTAINS_BONUS: f64 = 5.0;
const LEADING_BONUS: f64 = 2.0;
const KEYWORD_HIT_BONUS: f64 = 0.5;
const LENGTH_BOOST_PER_CHAR: f64 = 0.1;

struct PrefixWeights {
    contains: f64,
    leading: f64,
    whole_word: f64,
}

const STRIPPED_PREFIX: PrefixWeights = PrefixWeights {
    contains: 0.3,
    leading: 0.3,
    whole_word: 0.2,
};

const DIACRITIC_PREFIX: PrefixWeights = PrefixWeights {
    contains: 0.5,
    leading: 0.5,
    whole_word: 0.3,
};

/// Ranks `candidates` against `term` and returns the `[skip, skip + limit)` window
/// of the first tier that matched anything.
///
/// The function is pure: every call normalizes the query and all candidate
/// names from scratch.
pub fn search(candidates: &[Candidate], term: &str, skip: usize, limit: usize) -> SearchOutcome {
    let query = PreparedQuery::new(term);
    let names: Vec<Named<'_>> = candidates
        .iter()
        .map(|candidate| Named {
            candidate,
            name: normalize_for_search(Some(&candidate.name)),
        })
        .collect();

    let exact = exact_matches(&query, &names);
    if !exact.is_empty() {
        return finish(exact, MatchLayer::Exact, skip, limit);
    }

    let exact_word = exact_word_matches(&query, &names);
    if !exact_word.is_empty() {
        return finish(exact_word, MatchLayer::ExactWord, skip, limit);
    }

    let all_words = all_word_matches(&query, &names);
    if !all_words.is_empty() {
        return finish(rank(all_words), MatchLayer::AllWords, skip, limit);
    }

    let any_word = any_word_matches(&query, &names);
    if !any_word.is_empty() {
        return finish(rank(any_word), MatchLayer::AnyWord, skip, limit);
    }

    let fuzzy = fuzzy_prefix_matches(&query, &names);
    if !fuzzy.is_empty() {
        return finish(rank(fuzzy), MatchLayer::FuzzyPrefix, skip, limit);
    }

    SearchOutcome {
        data: Vec::new(),
        total: 0,
        layer: MatchLayer::None,
    }
}

struct Named<'a> {
    candidate: &'a Candidate,
    name: NormalizedText,
}

/// The query normalized once, with its two independently tokenized word lists.
pub(crate) struct PreparedQuery {
    term: NormalizedText,
    words: Vec<String>,
    diacritic_words: Vec<String>,
    distinct_words: Vec<String>,
    distinct_diacritic_words: Vec<String>,
    /// Multiplier applied to fuzzy prefix scores.
    boost: f64,
}

impl PreparedQuery {
    pub(crate) fn new(term: &str) -> Self {
        let term = normalize_for_search(Some(term));
        let words = owned(term.normalized_words());
        let diacritic_words = owned(term.diacritic_words());

        let longest = words
            .iter()
            .chain(diacritic_words.iter())
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(0);
        let boost = if longest >= 2 {
            1.0 + LENGTH_BOOST_PER_CHAR * longest as f64
        } else {
            1.0
        };

        Self {
            distinct_words: distinct(&words),
            distinct_diacritic_words: distinct(&diacritic_words),
            term,
            words,
            diacritic_words,
            boost,
        }
    }
}

fn owned(words: Vec<&str>) -> Vec<String> {
    words.into_iter().map(str::to_string).collect()
}

fn distinct(words: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    words
        .iter()
        .filter(|word| seen.insert(word.as_str()))
        .cloned()
        .collect()
}

fn contained_in(name: &NormalizedText, word: &str) -> bool {
    name.normalized.contains(word) || name.with_diacritics.contains(word)
}

fn exact_matches(query: &PreparedQuery, names: &[Named<'_>]) -> Vec<Candidate> {
    names
        .iter()
        .filter(|named| {
            named.name.normalized == query.term.normalized
                || named.name.with_diacritics == query.term.with_diacritics
        })
        .map(|named| named.candidate.clone())
        .collect()
}

fn exact_word_matches(query: &PreparedQuery, names: &[Named<'_>]) -> Vec<Candidate> {
    let (word, diacritic_word) = match (&query.words[..], &query.diacritic_words[..]) {
        ([word], [diacritic_word]) => (word.as_str(), diacritic_word.as_str()),
        _ => return Vec::new(),
    };

    names
        .iter()
        .filter(|named| {
            named.name.normalized_words().contains(&word)
                || named.name.diacritic_words().contains(&diacritic_word)
        })
        .map(|named| named.candidate.clone())
        .collect()
}

fn all_word_matches(query: &PreparedQuery, names: &[Named<'_>]) -> Vec<ScoredCandidate> {
    if query.words.is_empty() {
        return Vec::new();
    }

    names
        .iter()
        .filter(|named| {
            query
                .words
                .iter()
                .all(|word| contained_in(&named.name, word))
        })
        .map(|named| ScoredCandidate {
            candidate: named.candidate.clone(),
            score: all_words_score(query, &named.name),
        })
        .collect()
}

/// Whole-token and first-token bonuses, stripped words against stripped tokens
/// and diacritic words against diacritic tokens.
pub(crate) fn all_words_score(query: &PreparedQuery, name: &NormalizedText) -> f64 {
    token_score(&query.words, &name.normalized_words())
        + token_score(&query.diacritic_words, &name.diacritic_words())
}

fn token_score(words: &[String], tokens: &[&str]) -> f64 {
    words.iter().fold(0.0, |mut score, word| {
        if tokens.contains(&word.as_str()) {
            score += WHOLE_TOKEN_BONUS;
        }
        if tokens.first() == Some(&word.as_str()) {
            score += FIRST_TOKEN_BONUS;
        }
        score
    })
}

fn any_word_matches(query: &PreparedQuery, names: &[Named<'_>]) -> Vec<ScoredCandidate> {
    names
        .iter()
        .filter(|named| {
            query
                .words
                .iter()
                .any(|word| contained_in(&named.name, word))
        })
        .map(|named| ScoredCandidate {
            candidate: named.candidate.clone(),
            score: containment_score(query, &named.name),
        })
        .collect()
}

/// Every word of both lists earns a bonus per name form containing it, plus one
/// leading bonus if either form starts with it.
pub(crate) fn containment_score(query: &PreparedQuery, name: &NormalizedText) -> f64 {
    let mut score = 0.0;

    for word in query.words.iter().chain(query.diacritic_words.iter()) {
        if name.normalized.contains(word.as_str()) {
            score += CONTAINS_BONUS;
        }
        if name.with_diacritics.contains(word.as_str()) {
            score += CONTAINS_BONUS;
        }
        if name.normalized.starts_with(word.as_str())
            || name.with_diacritics.starts_with(word.as_str())
        {
            score += LEADING_BONUS;
        }
    }

    score
}

/// Scores the leading slices of each word against `name`.
///
/// A prefix is a whole word when it equals one of the name's tokens. Prefixes
/// are tried shortest first and the scan stops at the first one missing from
/// `name`, since no longer prefix can then occur.
fn prefix_score(words: &[String], name: &str, tokens: &[&str], weights: &PrefixWeights) -> f64 {
    let mut score = 0.0;

    for word in words {
        for (start, c) in word.char_indices() {
            let prefix = &word[..start + c.len_utf8()];
            if !name.contains(prefix) {
                break;
            }

            score += weights.contains;
            if name.starts_with(prefix) {
                score += weights.leading;
            }
            if tokens.contains(&prefix) {
                score += weights.whole_word;
            }
        }
    }

    score
}

pub(crate) fn fuzzy_score(query: &PreparedQuery, name: &NormalizedText) -> f64 {
    let mut score = prefix_score(
        &query.words,
        &name.normalized,
        &name.normalized_words(),
        &STRIPPED_PREFIX,
    );
    score += prefix_score(
        &query.diacritic_words,
        &name.with_diacritics,
        &name.diacritic_words(),
        &DIACRITIC_PREFIX,
    );

    let keyword_hits = query
        .distinct_words
        .iter()
        .chain(query.distinct_diacritic_words.iter())
        .filter(|word| contained_in(name, word))
        .count();
    score += KEYWORD_HIT_BONUS * keyword_hits as f64;

    score * query.boost
}

fn fuzzy_prefix_matches(query: &PreparedQuery, names: &[Named<'_>]) -> Vec<ScoredCandidate> {
    names
        .iter()
        .filter_map(|named| {
            let score = fuzzy_score(query, &named.name);
            (score > 0.0).then(|| ScoredCandidate {
                candidate: named.candidate.clone(),
                score,
            })
        })
        .collect()
}

/// Orders by descending score; ties keep catalog order.
fn rank(mut scored: Vec<ScoredCandidate>) -> Vec<Candidate> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.into_iter().map(|scored| scored.candidate).collect()
}

fn finish(matches: Vec<Candidate>, layer: MatchLayer, skip: usize, limit: usize) -> SearchOutcome {
    let total = matches.len();
    let data = matches.into_iter().skip(skip).take(limit).collect();

    SearchOutcome { data, total, layer }
}
