use super::{Candidate, MatchStage, Query};
use crate::normalizer::tokens;
use strsim::normalized_levenshtein;
use tracing::debug;

/// One stage of the resolver cascade. Returns the index of the winning candidate.
pub trait MatchStrategy {
    fn stage(&self) -> MatchStage;
    fn find(&self, query: &Query, candidates: &[Candidate<'_>]) -> Option<usize>;
}

fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

/// Longest normalized name found inside the query; failing that, the longest
/// name that contains the query. An exact name therefore always beats a longer
/// name that merely extends it.
pub struct SubstringMatch;

impl MatchStrategy for SubstringMatch {
    fn stage(&self) -> MatchStage {
        MatchStage::Substring
    }

    fn find(&self, query: &Query, candidates: &[Candidate<'_>]) -> Option<usize> {
        let q = query.normalized.as_str();
        if q.is_empty() {
            return None;
        }
        let mut order: Vec<usize> = (0..candidates.len())
            .filter(|&i| !candidates[i].normalized.is_empty())
            .collect();
        // stable: equal lengths keep catalog order
        order.sort_by_key(|&i| std::cmp::Reverse(candidates[i].normalized.len()));

        let inside_query = order
            .iter()
            .copied()
            .find(|&i| q.contains(candidates[i].normalized.as_str()));
        inside_query.or_else(|| {
            order
                .into_iter()
                .find(|&i| candidates[i].normalized.contains(q))
        })
    }
}

/// Share of a candidate's words that appear in the query.
pub struct TokenOverlap {
    pub threshold: f64,
}

impl TokenOverlap {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// (overlap count, overlap / candidate word count)
    pub fn score(query: &str, candidate: &str) -> (usize, f64) {
        let q = tokens(query);
        let c = tokens(candidate);
        if c.is_empty() {
            return (0, 0.0);
        }
        let overlap = c.intersection(&q).count();
        (overlap, overlap as f64 / c.len() as f64)
    }
}

impl MatchStrategy for TokenOverlap {
    fn stage(&self) -> MatchStage {
        MatchStage::TokenOverlap
    }

    fn find(&self, query: &Query, candidates: &[Candidate<'_>]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, cand) in candidates.iter().enumerate() {
            let (overlap, score) = Self::score(&query.normalized, &cand.normalized);
            if overlap == 0 {
                continue;
            }
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((i, score));
            }
        }

        match best {
            Some((i, score)) if score >= self.threshold => Some(i),
            Some((i, score)) => {
                debug!(
                    "Best token overlap {:.2} for {} is under {:.2}",
                    score, candidates[i].normalized, self.threshold
                );
                None
            }
            None => None,
        }
    }
}

/// Closest name by normalized edit distance, above a cutoff.
pub struct FuzzyMatch {
    pub cutoff: f64,
    pub max_candidates: usize,
}

impl FuzzyMatch {
    pub fn new(cutoff: f64, max_candidates: usize) -> Self {
        Self {
            cutoff,
            max_candidates,
        }
    }

    /// Up to `max_candidates` indices whose similarity clears the cutoff, best first.
    pub fn close_matches(&self, query: &str, candidates: &[Candidate<'_>]) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.normalized.is_empty())
            .map(|(i, c)| (i, normalized_levenshtein(query, &c.normalized)))
            .filter(|&(_, ratio)| ratio >= self.cutoff)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.max_candidates);
        scored
    }
}

impl MatchStrategy for FuzzyMatch {
    fn stage(&self) -> MatchStage {
        MatchStage::Fuzzy
    }

    fn find(&self, query: &Query, candidates: &[Candidate<'_>]) -> Option<usize> {
        if self.max_candidates == 0 {
            return None;
        }
        self.close_matches(&query.normalized, candidates)
            .first()
            .map(|&(i, _)| i)
    }
}

/// Normalized query against plain lower-cased names, priority categories first.
pub struct FallbackScan {
    pub priority: Vec<String>,
}

impl FallbackScan {
    pub fn new(priority: Vec<String>) -> Self {
        Self { priority }
    }
}

impl MatchStrategy for FallbackScan {
    fn stage(&self) -> MatchStage {
        MatchStage::FallbackScan
    }

    fn find(&self, query: &Query, candidates: &[Candidate<'_>]) -> Option<usize> {
        let hits = |i: &usize| {
            let name = candidates[*i].record.display_name.to_lowercase();
            contains_either(&name, &query.normalized)
        };

        for category in &self.priority {
            let found = (0..candidates.len())
                .filter(|&i| candidates[i].category == category)
                .find(|i| hits(i));
            if found.is_some() {
                return found;
            }
        }
        (0..candidates.len()).find(|i| hits(i))
    }
}
