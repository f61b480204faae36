//! Build result accumulator

/// Ordered validity flags, one per unit of work observed during a session
///
/// Owned by the caller for the whole polling session. The poller only passes
/// it through; the event batch processor appends to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResults {
    results: Vec<bool>,
}

impl BuildResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one unit of work
    pub fn push(&mut self, valid: bool) {
        self.results.push(valid);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when no recorded unit failed (vacuously true when empty)
    pub fn all_valid(&self) -> bool {
        self.results.iter().all(|valid| *valid)
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_valid() {
        let results = BuildResults::new();
        assert!(results.is_empty());
        assert!(results.all_valid());
    }

    #[test]
    fn test_single_failure_invalidates() {
        let mut results = BuildResults::new();
        results.push(true);
        results.push(false);
        results.push(true);

        assert_eq!(results.len(), 3);
        assert_eq!(results.as_slice(), &[true, false, true]);
        assert!(!results.all_valid());
    }
}
