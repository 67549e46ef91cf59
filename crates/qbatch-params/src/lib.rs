//! Parameter resolvers and sweeps.
//!
//! A [`ParamResolver`] binds symbol names to concrete values; a [`Sweep`]
//! is an ordered collection of resolvers. Executing a circuit over a sweep
//! produces one result per point.
//!
//! ```
//! use qbatch_params::Sweep;
//!
//! let sweep = Sweep::linspace("theta", 0.0, 1.0, 3)?;
//! assert_eq!(sweep.len(), 3);
//! assert_eq!(sweep.resolvers()[1].get("theta"), Some(0.5));
//! # Ok::<(), qbatch_params::ParamError>(())
//! ```

pub mod error;
pub mod resolver;
pub mod sweep;

pub use error::{ParamError, ParamResult};
pub use resolver::ParamResolver;
pub use sweep::Sweep;
