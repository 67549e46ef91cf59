//! Parameter sweeps: ordered collections of parameter points.

use serde::{Deserialize, Serialize};

use crate::error::{ParamError, ParamResult};
use crate::resolver::ParamResolver;

/// A structured space of parameter bindings.
///
/// A circuit executed over a sweep produces one result per point, in the
/// order returned by [`Sweep::resolvers`].
///
/// Deserialization goes through the same checks as the constructors, so a
/// zip of unequal lengths or a sweep binding a symbol twice is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", try_from = "RawSweep")]
pub enum Sweep {
    /// A single empty point (no parameters bound).
    #[default]
    Unit,
    /// An explicit list of points.
    Points {
        /// The points, in execution order.
        points: Vec<ParamResolver>,
    },
    /// `length` evenly spaced values of `key` from `start` to `stop` inclusive.
    Linspace {
        /// Swept symbol.
        key: String,
        /// First value.
        start: f64,
        /// Last value.
        stop: f64,
        /// Number of points.
        length: usize,
    },
    /// Explicit values for a single symbol.
    Values {
        /// Swept symbol.
        key: String,
        /// Values, in execution order.
        values: Vec<f64>,
    },
    /// Point-wise combination of equal-length sweeps.
    Zip {
        /// Zipped sweeps.
        sweeps: Vec<Sweep>,
    },
    /// Cartesian product; the first sweep varies slowest.
    Product {
        /// Factor sweeps.
        sweeps: Vec<Sweep>,
    },
}

impl Sweep {
    /// The unparameterized sweep.
    pub fn unit() -> Self {
        Sweep::Unit
    }

    /// A sweep over explicit points.
    pub fn points(points: impl IntoIterator<Item = ParamResolver>) -> Self {
        Sweep::Points {
            points: points.into_iter().collect(),
        }
    }

    /// A linear sweep of `key`.
    pub fn linspace(
        key: impl Into<String>,
        start: f64,
        stop: f64,
        length: usize,
    ) -> ParamResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ParamError::EmptyKey);
        }
        Ok(Sweep::Linspace {
            key,
            start,
            stop,
            length,
        })
    }

    /// A sweep of `key` over explicit values.
    pub fn values(
        key: impl Into<String>,
        values: impl IntoIterator<Item = f64>,
    ) -> ParamResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(ParamError::EmptyKey);
        }
        Ok(Sweep::Values {
            key,
            values: values.into_iter().collect(),
        })
    }

    /// Zip sweeps of equal length over disjoint symbols.
    pub fn zip(sweeps: Vec<Sweep>) -> ParamResult<Self> {
        let lengths: Vec<usize> = sweeps.iter().map(Sweep::len).collect();
        if lengths.windows(2).any(|w| w[0] != w[1]) {
            return Err(ParamError::ZipLengthMismatch(lengths));
        }
        check_disjoint(&sweeps)?;
        Ok(Sweep::Zip { sweeps })
    }

    /// Cartesian product of sweeps over disjoint symbols.
    pub fn product(sweeps: Vec<Sweep>) -> ParamResult<Self> {
        check_disjoint(&sweeps)?;
        Ok(Sweep::Product { sweeps })
    }

    /// Number of points in the sweep.
    pub fn len(&self) -> usize {
        match self {
            Sweep::Unit => 1,
            Sweep::Points { points } => points.len(),
            Sweep::Linspace { length, .. } => *length,
            Sweep::Values { values, .. } => values.len(),
            Sweep::Zip { sweeps } => sweeps.iter().map(Sweep::len).min().unwrap_or(1),
            Sweep::Product { sweeps } => sweeps.iter().map(Sweep::len).product(),
        }
    }

    /// True when the sweep has no points at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True for a sweep whose only point binds nothing.
    pub fn is_unit(&self) -> bool {
        self.len() == 1 && self.keys().is_empty()
    }

    /// Symbols bound by this sweep, in first-seen order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys(&self, keys: &mut Vec<String>) {
        match self {
            Sweep::Unit => {}
            Sweep::Points { points } => {
                for p in points {
                    for (k, _) in p.iter() {
                        push_key(keys, k);
                    }
                }
            }
            Sweep::Linspace { key, .. } | Sweep::Values { key, .. } => push_key(keys, key),
            Sweep::Zip { sweeps } | Sweep::Product { sweeps } => {
                for s in sweeps {
                    s.collect_keys(keys);
                }
            }
        }
    }

    /// Expand the sweep into its parameter points.
    pub fn resolvers(&self) -> Vec<ParamResolver> {
        match self {
            Sweep::Unit => vec![ParamResolver::new()],
            Sweep::Points { points } => points.clone(),
            Sweep::Linspace {
                key,
                start,
                stop,
                length,
            } => (0..*length)
                .map(|i| {
                    let value = if *length == 1 {
                        *start
                    } else {
                        start + (stop - start) * i as f64 / (*length - 1) as f64
                    };
                    ParamResolver::new().with(key.clone(), value)
                })
                .collect(),
            Sweep::Values { key, values } => values
                .iter()
                .map(|v| ParamResolver::new().with(key.clone(), *v))
                .collect(),
            Sweep::Zip { sweeps } => {
                let expanded: Vec<Vec<ParamResolver>> =
                    sweeps.iter().map(Sweep::resolvers).collect();
                (0..self.len())
                    .map(|i| {
                        let mut point = ParamResolver::new();
                        for column in &expanded {
                            point.extend(&column[i]);
                        }
                        point
                    })
                    .collect()
            }
            Sweep::Product { sweeps } => {
                let mut acc = vec![ParamResolver::new()];
                for factor in sweeps {
                    let points = factor.resolvers();
                    acc = acc
                        .iter()
                        .flat_map(|prefix| {
                            points.iter().map(move |p| {
                                let mut point = prefix.clone();
                                point.extend(p);
                                point
                            })
                        })
                        .collect();
                }
                acc
            }
        }
    }
}

/// Unchecked wire form of [`Sweep`].
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RawSweep {
    Unit,
    Points {
        points: Vec<ParamResolver>,
    },
    Linspace {
        key: String,
        start: f64,
        stop: f64,
        length: usize,
    },
    Values {
        key: String,
        values: Vec<f64>,
    },
    Zip { sweeps: Vec<Sweep> },
    Product { sweeps: Vec<Sweep> },
}

impl TryFrom<RawSweep> for Sweep {
    type Error = ParamError;

    fn try_from(raw: RawSweep) -> ParamResult<Self> {
        match raw {
            RawSweep::Unit => Ok(Sweep::Unit),
            RawSweep::Points { points } => Ok(Sweep::Points { points }),
            RawSweep::Linspace {
                key,
                start,
                stop,
                length,
            } => Sweep::linspace(key, start, stop, length),
            RawSweep::Values { key, values } => Sweep::values(key, values),
            RawSweep::Zip { sweeps } => Sweep::zip(sweeps),
            RawSweep::Product { sweeps } => Sweep::product(sweeps),
        }
    }
}

fn push_key(keys: &mut Vec<String>, key: &str) {
    if !keys.iter().any(|k| k == key) {
        keys.push(key.to_string());
    }
}

fn check_disjoint(sweeps: &[Sweep]) -> ParamResult<()> {
    let mut seen: Vec<String> = Vec::new();
    for s in sweeps {
        for key in s.keys() {
            if seen.contains(&key) {
                return Err(ParamError::DuplicateKey(key));
            }
            seen.push(key);
        }
    }
    Ok(())
}

impl From<ParamResolver> for Sweep {
    fn from(resolver: ParamResolver) -> Self {
        if resolver.is_empty() {
            Sweep::Unit
        } else {
            Sweep::points([resolver])
        }
    }
}

impl From<Vec<ParamResolver>> for Sweep {
    fn from(points: Vec<ParamResolver>) -> Self {
        Sweep::Points { points }
    }
}
