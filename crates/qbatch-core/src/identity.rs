//! The (run, device configuration) pair a submission targets.

use std::fmt;

use crate::error::{SamplerError, SamplerResult};

/// Selects which processor configuration a job runs against.
///
/// Either both names are set or neither is; with neither set the processor
/// picks its default configuration. The rule is checked once, here, so a
/// half-specified identity never reaches a processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExecutionIdentity {
    run_name: String,
    device_config_name: String,
}

impl ExecutionIdentity {
    /// Validate and build an identity.
    pub fn new(
        run_name: impl Into<String>,
        device_config_name: impl Into<String>,
    ) -> SamplerResult<Self> {
        let run_name = run_name.into();
        let device_config_name = device_config_name.into();
        if run_name.is_empty() != device_config_name.is_empty() {
            return Err(SamplerError::Configuration(
                "Cannot specify only one of `run_name` and `device_config_name`".into(),
            ));
        }
        Ok(Self {
            run_name,
            device_config_name,
        })
    }

    /// The processor's default configuration (both names empty).
    pub fn processor_default() -> Self {
        Self::default()
    }

    /// Automation run name, empty for the default.
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Device configuration name, empty for the default.
    pub fn device_config_name(&self) -> &str {
        &self.device_config_name
    }

    /// True when neither name is set.
    pub fn is_processor_default(&self) -> bool {
        self.run_name.is_empty()
    }
}

impl fmt::Display for ExecutionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_processor_default() {
            write!(f, "<default>")
        } else {
            write!(f, "{}/{}", self.run_name, self.device_config_name)
        }
    }
}
