//! Failure classification.
//!
//! # Responsibilities
//! - Hold the ordered list of "ignored failure" classifiers
//! - Match a failure by type (the error or anything in its `source()` chain)
//! - Match a failure by arbitrary predicate
//!
//! # Design Decisions
//! - Works on `&(dyn Error + 'static)` so one config serves every error type
//! - First match wins; its label is reported for logging

use std::error::Error;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync;

#[derive(Clone)]
struct Classifier {
    label: String,
    predicate: Arc<Predicate>,
}

/// Ordered set of classifiers for failures that must not count.
#[derive(Clone, Default)]
pub struct IgnoredFailures {
    classifiers: Vec<Classifier>,
}

impl IgnoredFailures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore failures of type `T`, wherever it appears in the source chain.
    pub fn push_type<T>(&mut self)
    where
        T: Error + 'static,
    {
        self.classifiers.push(Classifier {
            label: std::any::type_name::<T>().to_string(),
            predicate: Arc::new(|failure: &(dyn Error + 'static)| {
                causes(failure).any(|e| e.is::<T>())
            }),
        });
    }

    /// Ignore failures accepted by `predicate`.
    pub fn push_predicate<F>(&mut self, label: impl Into<String>, predicate: F)
    where
        F: Fn(&(dyn Error + 'static)) -> bool + Send + Sync + 'static,
    {
        self.classifiers.push(Classifier {
            label: label.into(),
            predicate: Arc::new(predicate),
        });
    }

    /// Label of the first classifier matching `failure`, if any.
    pub fn matching(&self, failure: &(dyn Error + 'static)) -> Option<&str> {
        self.classifiers
            .iter()
            .find(|c| (c.predicate)(failure))
            .map(|c| c.label.as_str())
    }

    pub fn is_ignored(&self, failure: &(dyn Error + 'static)) -> bool {
        self.matching(failure).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.classifiers.iter().map(|c| c.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}

impl fmt::Debug for IgnoredFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

fn causes<'a>(failure: &'a (dyn Error + 'static)) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(failure), |&e| e.source())
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("not found")]
    struct NotFound;

    #[derive(Debug, Error)]
    #[error("timed out")]
    struct TimedOut;

    #[derive(Debug, Error)]
    #[error("lookup failed")]
    struct LookupFailed(#[source] NotFound);

    #[test]
    fn test_empty_matches_nothing() {
        let ignored = IgnoredFailures::new();
        assert!(ignored.is_empty());
        assert!(!ignored.is_ignored(&NotFound));
    }

    #[test]
    fn test_type_match_and_source_chain() {
        let mut ignored = IgnoredFailures::new();
        ignored.push_type::<NotFound>();

        assert!(ignored.is_ignored(&NotFound));
        assert!(ignored.is_ignored(&LookupFailed(NotFound)));
        assert!(!ignored.is_ignored(&TimedOut));
    }

    #[test]
    fn test_first_match_wins() {
        let mut ignored = IgnoredFailures::new();
        ignored.push_predicate("anything", |_| true);
        ignored.push_type::<NotFound>();

        assert_eq!(ignored.matching(&NotFound), Some("anything"));
        assert_eq!(ignored.len(), 2);
    }

    #[test]
    fn test_predicate_on_message() {
        let mut ignored = IgnoredFailures::new();
        ignored.push_predicate("timeouts", |e| e.to_string().contains("timed out"));

        assert!(ignored.is_ignored(&TimedOut));
        assert!(!ignored.is_ignored(&NotFound));
    }
}
