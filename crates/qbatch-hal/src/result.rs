//! Execution results.

use qbatch_params::ParamResolver;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// Measurement histogram: bitstring → number of occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Outcomes sorted by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut v: Vec<_> = self.counts.iter().collect();
        v.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        v
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.sorted().into_iter().next()
    }

    /// Iterate over raw entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }
}

/// Result of executing one circuit at one parameter point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// The parameter point this result was taken at.
    pub params: ParamResolver,
    /// Repetitions executed.
    pub repetitions: u32,
    /// Measurement histogram.
    pub counts: Counts,
    /// Job that produced this result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    /// Wall-clock execution time on the processor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ExecutionResult {
    /// Create a result for `params`.
    pub fn new(params: ParamResolver, counts: Counts, repetitions: u32) -> Self {
        Self {
            params,
            repetitions,
            counts,
            job_id: None,
            execution_time_ms: None,
        }
    }

    /// Attach the producing job.
    pub fn with_job_id(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }

    /// Attach the execution time.
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut c = Counts::new();
        c.insert("00", 3);
        c.insert("11", 5);
        c.insert("00", 4);
        assert_eq!(c.get("00"), 7);
        assert_eq!(c.get("01"), 0);
        assert_eq!(c.total_shots(), 12);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_most_frequent_tie_breaks_on_bitstring() {
        let mut c = Counts::new();
        c.insert("10", 2);
        c.insert("01", 2);
        let (bits, n) = c.most_frequent().unwrap();
        assert_eq!(bits, "01");
        assert_eq!(*n, 2);
    }

    #[test]
    fn test_result_builders() {
        let r = ExecutionResult::new(ParamResolver::new().with("t", 1.0), Counts::new(), 10)
            .with_job_id(JobId::new("j1"))
            .with_execution_time(4);
        assert_eq!(r.job_id, Some(JobId::new("j1")));
        assert_eq!(r.execution_time_ms, Some(4));
        assert_eq!(r.params.get("t"), Some(1.0));
    }
}
