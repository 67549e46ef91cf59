//! Circuit type accepted by the simulated processor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Qubit count assumed when a circuit spec omits one.
const DEFAULT_QUBITS: u32 = 2;

/// A named circuit of a given width.
///
/// The simulator only needs the width to shape its histograms; the name
/// identifies the circuit in the submission log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimCircuit {
    /// Circuit name.
    pub name: String,
    /// Number of measured qubits.
    pub num_qubits: u32,
}

impl SimCircuit {
    /// Create a circuit.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
        }
    }
}

impl fmt::Display for SimCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.num_qubits)
    }
}

/// Error parsing a `NAME[:QUBITS]` circuit spec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCircuitError {
    #[error("Circuit name is empty")]
    EmptyName,

    #[error("Invalid qubit count '{0}'")]
    InvalidQubits(String),
}

impl FromStr for SimCircuit {
    type Err = ParseCircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, qubits) = match s.split_once(':') {
            Some((name, qubits)) => {
                let n = qubits
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| ParseCircuitError::InvalidQubits(qubits.to_string()))?;
                (name.trim(), n)
            }
            None => (s.trim(), DEFAULT_QUBITS),
        };
        if name.is_empty() {
            return Err(ParseCircuitError::EmptyName);
        }
        Ok(SimCircuit::new(name, qubits))
    }
}
