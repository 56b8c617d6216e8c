use crate::core::error::{CoverageError, Result};
use crate::models::{ScoredCandidate, ScoringWeights, Site, SiteMetrics};
use std::cmp::Ordering;

/// Score assigned to every candidate when the whole set ties
pub const DEGENERATE_SCORE: f64 = 50.0;

/// Anything the scorer can rank
pub trait Scorable {
    fn metrics(&self) -> SiteMetrics;
}

impl Scorable for SiteMetrics {
    fn metrics(&self) -> SiteMetrics {
        *self
    }
}

impl Scorable for Site {
    fn metrics(&self) -> SiteMetrics {
        self.metrics
    }
}

fn validate_weights(weights: &ScoringWeights) -> Result<()> {
    for (attribute, value) in [
        ("population", weights.population),
        ("traffic", weights.traffic),
        ("income", weights.income),
    ] {
        if !value.is_finite() {
            return Err(CoverageError::InvalidWeight { attribute, value });
        }
    }
    Ok(())
}

/// Weighted sum of a candidate's attributes; absent values contribute 0
pub fn raw_score(metrics: &SiteMetrics, weights: &ScoringWeights, index: usize) -> Result<f64> {
    let mut total = 0.0;
    for (attribute, value, weight) in [
        ("populationCovered", metrics.population_covered, weights.population),
        ("trafficCount", metrics.traffic_count, weights.traffic),
        ("incomePerCapita", metrics.income_per_capita, weights.income),
    ] {
        match value {
            Some(v) if !v.is_finite() => {
                return Err(CoverageError::InvalidAttribute {
                    index,
                    attribute,
                    value: v,
                })
            }
            Some(v) => total += weight * v,
            None => {}
        }
    }
    if !total.is_finite() {
        return Err(CoverageError::InvalidAttribute {
            index,
            attribute: "weightedSum",
            value: total,
        });
    }
    Ok(total)
}

/// Min-max normalise weighted attribute sums into [0, 100]
///
/// Scores are relative to this call's candidate set. Output order matches
/// input order.
pub fn score_candidates<T: Scorable>(
    candidates: Vec<T>,
    weights: &ScoringWeights,
) -> Result<Vec<ScoredCandidate<T>>> {
    validate_weights(weights)?;

    let raw: Vec<f64> = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| raw_score(&c.metrics(), weights, i))
        .collect::<Result<_>>()?;

    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // halved so two finite extremes of opposite sign cannot overflow
    let (half_min, half_span) = (min / 2.0, max / 2.0 - min / 2.0);

    Ok(candidates
        .into_iter()
        .zip(raw)
        .enumerate()
        .map(|(index, (candidate, raw_score))| {
            let score = if half_span > 0.0 {
                (raw_score / 2.0 - half_min) / half_span * 100.0
            } else {
                DEGENERATE_SCORE
            };
            ScoredCandidate {
                candidate,
                index,
                raw_score,
                score,
            }
        })
        .collect())
}

/// Sort by score (descending), ties broken by input position
pub fn rank_candidates<T>(scored: &mut [ScoredCandidate<T>]) {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.index.cmp(&b.index))
    });
}
