//! Metric Series: Scalars Keyed by Data Amount or Epoch
//!
//! Ordered (key, value) pairs. Keys keep insertion order, which for a
//! data-amount sweep is the order the runs were loaded in and for an
//! epoch sweep is the 1-based epoch position.

use serde::ser::{Serialize, Serializer};

/// Ordered mapping from a key to a computed metric value
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries<K> {
    points: Vec<(K, f64)>,
}

impl<K> Default for MetricSeries<K> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<K: PartialEq> MetricSeries<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            points: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, key: K, value: f64) {
        self.points.push((key, value));
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.points.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.points.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, v)| *v).collect()
    }

    /// Value at a position, independent of its key
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.points.iter().map(|(k, v)| (k, *v))
    }
}

impl<K> FromIterator<(K, f64)> for MetricSeries<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<K: Serialize> Serialize for MetricSeries<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.points.iter().map(|(k, v)| (k, v)))
    }
}
