//! Persistence Barcodes for a Single Epoch
//!
//! A barcode interval [b, d) records a topological feature that is "born"
//! at filtration value b and "dies" at d. One epoch of one hidden layer
//! produces a `BarcodeSet`: the intervals grouped by homology dimension
//! label ("H0", "H1", ...), in the order the persistence tool emitted them.
//!
//! ## Interpretation
//!
//! - Long-lived bars (large d-b) represent robust structure in the layer's
//!   activation space
//! - Short-lived bars are usually noise

/// A barcode interval [birth, death)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarcodeInterval {
    pub birth: f64,
    pub death: f64,
}

impl BarcodeInterval {
    /// Build an interval, rejecting `death < birth`.
    pub fn new(birth: f64, death: f64) -> Option<Self> {
        if death >= birth {
            Some(Self { birth, death })
        } else {
            None
        }
    }

    /// Lifetime of the feature
    pub fn lifetime(&self) -> f64 {
        self.death - self.birth
    }
}

/// Barcodes of one epoch, keyed by homology dimension label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarcodeSet {
    dimensions: Vec<(String, Vec<BarcodeInterval>)>,
}

impl BarcodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interval under `dimension`, creating the label on first use.
    pub fn add(&mut self, dimension: &str, interval: BarcodeInterval) {
        self.intervals_mut(dimension).push(interval);
    }

    /// Register a dimension label with no intervals yet.
    pub fn insert_dimension(&mut self, dimension: &str) {
        self.intervals_mut(dimension);
    }

    fn intervals_mut(&mut self, dimension: &str) -> &mut Vec<BarcodeInterval> {
        let pos = match self.dimensions.iter().position(|(d, _)| d == dimension) {
            Some(pos) => pos,
            None => {
                self.dimensions.push((dimension.to_string(), Vec::new()));
                self.dimensions.len() - 1
            }
        };
        &mut self.dimensions[pos].1
    }

    /// Intervals of a dimension, in document order
    pub fn dim(&self, dimension: &str) -> Option<&[BarcodeInterval]> {
        self.dimensions
            .iter()
            .find(|(d, _)| d == dimension)
            .map(|(_, intervals)| intervals.as_slice())
    }

    /// Dimension labels in document order
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.dimensions.iter().map(|(d, _)| d.as_str())
    }

    /// Lifetimes d - b of a dimension, in document order
    pub fn lifetimes(&self, dimension: &str) -> Option<Vec<f64>> {
        self.dim(dimension)
            .map(|intervals| intervals.iter().map(|i| i.lifetime()).collect())
    }

    /// Sum of lifetimes in a dimension (0 when absent)
    pub fn total_persistence(&self, dimension: &str) -> f64 {
        self.dim(dimension)
            .map(|intervals| intervals.iter().map(|i| i.lifetime()).sum())
            .unwrap_or(0.0)
    }

    /// Number of intervals in a dimension (0 when absent)
    pub fn n_intervals(&self, dimension: &str) -> usize {
        self.dim(dimension).map_or(0, <[BarcodeInterval]>::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(b: f64, d: f64) -> BarcodeInterval {
        BarcodeInterval::new(b, d).unwrap()
    }

    #[test]
    fn test_interval_rejects_inverted_pair() {
        assert!(BarcodeInterval::new(2.0, 1.0).is_none());
        assert_eq!(BarcodeInterval::new(1.0, 1.0).unwrap().lifetime(), 0.0);
    }

    #[test]
    fn test_dimensions_keep_insertion_order() {
        let mut set = BarcodeSet::new();
        set.add("H1", interval(0.5, 0.7));
        set.add("H0", interval(0.0, 1.0));
        set.add("H0", interval(0.0, 3.0));

        let dims: Vec<_> = set.dimensions().collect();
        assert_eq!(dims, vec!["H1", "H0"]);
        assert_eq!(set.n_intervals("H0"), 2);
        assert_eq!(set.lifetimes("H0").unwrap(), vec![1.0, 3.0]);
        assert_eq!(set.total_persistence("H0"), 4.0);
    }

    #[test]
    fn test_absent_dimension() {
        let mut set = BarcodeSet::new();
        set.insert_dimension("H0");
        assert_eq!(set.dim("H0").unwrap().len(), 0);
        assert!(set.dim("H2").is_none());
        assert_eq!(set.total_persistence("H2"), 0.0);
    }
}
