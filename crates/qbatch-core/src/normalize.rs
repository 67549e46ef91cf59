//! Aligning per-circuit sweeps and repetition counts.

use qbatch_params::Sweep;

use crate::error::{SamplerError, SamplerResult};

/// Repetitions requested for a batch: one shared count or one per circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repetitions {
    /// The same count for every circuit.
    Uniform(u32),
    /// `counts[i]` applies to circuit `i`.
    PerCircuit(Vec<u32>),
}

impl Default for Repetitions {
    fn default() -> Self {
        Repetitions::Uniform(1)
    }
}

impl From<u32> for Repetitions {
    fn from(n: u32) -> Self {
        Repetitions::Uniform(n)
    }
}

impl From<Vec<u32>> for Repetitions {
    fn from(counts: Vec<u32>) -> Self {
        Repetitions::PerCircuit(counts)
    }
}

impl From<&[u32]> for Repetitions {
    fn from(counts: &[u32]) -> Self {
        Repetitions::PerCircuit(counts.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for Repetitions {
    fn from(counts: [u32; N]) -> Self {
        Repetitions::PerCircuit(counts.to_vec())
    }
}

/// One circuit together with the sweep and repetitions it runs with.
#[derive(Debug)]
pub struct ExecutionRequest<'a, C> {
    /// The circuit, passed to the processor untouched.
    pub circuit: &'a C,
    /// Parameter points to execute.
    pub sweep: &'a Sweep,
    /// Repetitions per parameter point.
    pub repetitions: u32,
}

impl<C> Clone for ExecutionRequest<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for ExecutionRequest<'_, C> {}

/// Sweeps and repetition counts aligned index-for-index with a circuit list.
///
/// Always holds exactly one entry per circuit and every repetition count is
/// at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedBatch {
    sweeps: Vec<Sweep>,
    repetitions: Vec<u32>,
}

impl NormalizedBatch {
    /// Number of entries (equal to the number of circuits).
    pub fn len(&self) -> usize {
        self.sweeps.len()
    }

    /// True for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.sweeps.is_empty()
    }

    /// Per-circuit sweeps.
    pub fn sweeps(&self) -> &[Sweep] {
        &self.sweeps
    }

    /// Per-circuit repetition counts.
    pub fn repetitions(&self) -> &[u32] {
        &self.repetitions
    }

    /// Distinct repetition counts, ascending.
    pub fn distinct_repetitions(&self) -> Vec<u32> {
        let mut distinct = self.repetitions.clone();
        distinct.sort_unstable();
        distinct.dedup();
        distinct
    }

    /// The shared repetition count, if every circuit uses the same one.
    pub fn uniform_repetitions(&self) -> Option<u32> {
        match self.distinct_repetitions().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Pair each circuit with its entry.
    ///
    /// `circuits` must be the list this batch was normalized against.
    pub fn requests<'a, C>(&'a self, circuits: &'a [C]) -> Vec<ExecutionRequest<'a, C>> {
        debug_assert_eq!(circuits.len(), self.len());
        circuits
            .iter()
            .zip(&self.sweeps)
            .zip(&self.repetitions)
            .map(|((circuit, sweep), &repetitions)| ExecutionRequest {
                circuit,
                sweep,
                repetitions,
            })
            .collect()
    }
}

/// Align `sweeps` and `repetitions` with `circuits`.
///
/// Absent sweeps become the unit sweep for every circuit and a uniform
/// repetition count is broadcast. Explicit lists must have one entry per
/// circuit, and no count may be zero.
pub fn normalize<C>(
    circuits: &[C],
    sweeps: Option<&[Sweep]>,
    repetitions: Repetitions,
) -> SamplerResult<NormalizedBatch> {
    let n = circuits.len();

    let sweeps = match sweeps {
        None => vec![Sweep::unit(); n],
        Some(list) if list.len() == n => list.to_vec(),
        Some(list) => {
            return Err(SamplerError::Shape {
                what: "parameter sweeps",
                expected: n,
                actual: list.len(),
            });
        }
    };

    let repetitions = match repetitions {
        Repetitions::Uniform(count) => vec![count; n],
        Repetitions::PerCircuit(counts) if counts.len() == n => counts,
        Repetitions::PerCircuit(counts) => {
            return Err(SamplerError::Shape {
                what: "repetitions",
                expected: n,
                actual: counts.len(),
            });
        }
    };

    if let Some(index) = repetitions.iter().position(|&r| r == 0) {
        return Err(SamplerError::InvalidRepetitions { index, value: 0 });
    }

    Ok(NormalizedBatch {
        sweeps,
        repetitions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_every_circuit() {
        let batch = normalize(&["a", "b", "c"], None, 10.into()).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch.sweeps().iter().all(Sweep::is_unit));
        assert_eq!(batch.repetitions(), &[10, 10, 10]);
        assert_eq!(batch.uniform_repetitions(), Some(10));
    }

    #[test]
    fn test_per_circuit_repetitions() {
        let batch = normalize(&["a", "b"], None, [2, 5].into()).unwrap();
        assert_eq!(batch.repetitions(), &[2, 5]);
        assert_eq!(batch.distinct_repetitions(), vec![2, 5]);
        assert_eq!(batch.uniform_repetitions(), None);
    }

    #[test]
    fn test_identical_list_counts_as_uniform() {
        let batch = normalize(&["a", "b", "c"], None, vec![3, 3, 3].into()).unwrap();
        assert_eq!(batch.uniform_repetitions(), Some(3));
    }

    #[test]
    fn test_repetitions_length_mismatch() {
        let err = normalize(&["a", "b", "c"], None, [1, 2].into()).unwrap_err();
        assert!(matches!(
            err,
            SamplerError::Shape {
                what: "repetitions",
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_sweeps_length_mismatch() {
        let sweeps = [Sweep::unit()];
        let err = normalize(&["a", "b"], Some(&sweeps), 1.into()).unwrap_err();
        assert!(matches!(
            err,
            SamplerError::Shape {
                what: "parameter sweeps",
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        let err = normalize(&["a", "b"], None, [4, 0].into()).unwrap_err();
        assert!(matches!(
            err,
            SamplerError::InvalidRepetitions { index: 1, value: 0 }
        ));
        assert!(normalize(&["a"], None, 0.into()).is_err());
    }

    #[test]
    fn test_empty_batch() {
        let circuits: [&str; 0] = [];
        let batch = normalize(&circuits, None, 0.into()).unwrap();
        assert!(batch.is_empty());
        assert_eq!(batch.uniform_repetitions(), None);
    }

    #[test]
    fn test_requests_pair_by_index() {
        let sweeps = [
            Sweep::unit(),
            Sweep::values("x", [1.0, 2.0]).unwrap(),
        ];
        let circuits = ["a", "b"];
        let batch = normalize(&circuits, Some(&sweeps), [7, 9].into()).unwrap();
        let requests = batch.requests(&circuits);
        assert_eq!(*requests[1].circuit, "b");
        assert_eq!(requests[1].sweep.len(), 2);
        assert_eq!(requests[1].repetitions, 9);
        assert_eq!(*requests[0].circuit, "a");
    }
}
