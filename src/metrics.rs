//! Metric maps and the small statistics kit the analyzers share.
//!
//! Every helper here is total: empty or zero-spread input returns 0 instead
//! of NaN, so analyzer results stay fully populated.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Metric name → value. Analyzers always fill every key they own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricResult(BTreeMap<String, f64>);

impl MetricResult {
    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(key, value)| (key.to_string(), finite_or_zero(value)))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    #[must_use]
    pub fn contains_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.0.contains_key(*key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[inline]
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[inline]
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, 1.0)
}

#[inline]
#[must_use]
pub fn ratio(numerator: usize, denominator: usize) -> f64 {
    match denominator {
        0 => 0.0,
        d => numerator as f64 / d as f64,
    }
}

#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    match values.len() {
        0 => None,
        n => Some(values.iter().sum::<f64>() / n as f64),
    }
}

/// Population variance (divides by n)
#[must_use]
pub fn population_variance(values: &[f64]) -> f64 {
    mean(values).map_or(0.0, |m| {
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
    })
}

#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Sample standard deviation (divides by n - 1); 0 for fewer than two values
#[must_use]
pub fn sample_std(values: &[f64]) -> f64 {
    match (values.len(), mean(values)) {
        (n, Some(m)) if n > 1 => {
            (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        }
        _ => 0.0,
    }
}

/// Pearson correlation of two equally long series.
///
/// Returns 0 when the series differ in length, have fewer than two points, or
/// either one has zero variance.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let (Some(mx), Some(my)) = (mean(xs), mean(ys)) else {
        return 0.0;
    };

    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mx) * (y - my);
        vx += (x - mx).powi(2);
        vy += (y - my).powi(2);
    }

    if vx <= f64::EPSILON || vy <= f64::EPSILON {
        return 0.0;
    }
    (cov / (vx.sqrt() * vy.sqrt())).clamp(-1.0, 1.0)
}

/// Shannon entropy in bits of a frequency distribution
#[must_use]
pub fn shannon_entropy<'a>(counts: impl IntoIterator<Item = &'a usize>) -> f64 {
    let counts: Vec<usize> = counts.into_iter().copied().filter(|&c| c > 0).collect();
    let total: usize = counts.iter().sum();
    if counts.len() <= 1 {
        return 0.0;
    }

    counts
        .iter()
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0.0)
}

/// Frequency table that remembers first-seen order.
///
/// [`Tally::ranked`] sorts by descending count; equal counts keep the order in
/// which their keys were first seen, so top-N cut-offs are deterministic.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    order: Vec<K>,
    counts: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn add(&mut self, key: K) {
        match self.counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.clone(), 1);
                self.order.push(key);
            }
        }
    }

    #[must_use]
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> impl Iterator<Item = &usize> {
        self.order.iter().map(move |key| &self.counts[key])
    }

    /// `(key, count)` pairs, most frequent first, ties in first-seen order
    #[must_use]
    pub fn ranked(&self) -> Vec<(&K, usize)> {
        let mut ranked: Vec<(&K, usize)> = self.order.iter().map(|key| (key, self.counts[key])).collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Share of all occurrences held by the `n` most frequent keys
    #[must_use]
    pub fn top_share(&self, n: usize) -> f64 {
        let top: usize = self.ranked().iter().take(n).map(|(_, count)| count).sum();
        ratio(top, self.total())
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}
