use std::fmt;
use std::time::Duration;

use super::ResourceKind;

#[derive(Debug, Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub(crate) struct TransientJob {
    pub(crate) name: String,

    /// Resource to create the job from, e.g. "cronjob/nightly"
    pub(crate) from: Option<String>,

    /// Image of the job's container
    pub(crate) image: Option<String>,

    /// Command run in the job's container, only valid together with `image`
    pub(crate) command: Vec<String>,
}

/// Terminal conditions of a job that `kubectl wait` can watch for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JobCondition {
    Complete,
    Failed,
}

impl fmt::Display for JobCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobCondition::Complete => f.write_str("complete"),
            JobCondition::Failed => f.write_str("failed"),
        }
    }
}

impl TransientJob {
    pub(crate) const KIND: ResourceKind = ResourceKind::Job;

    pub(crate) fn create_args(&self) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            Self::KIND.as_str().to_string(),
            self.name.clone(),
        ];
        if let Some(from) = &self.from {
            args.push(format!("--from={from}"));
        }
        if let Some(image) = &self.image {
            args.push(format!("--image={image}"));
        }
        if !self.command.is_empty() {
            args.push("--".to_string());
            args.extend(self.command.iter().cloned());
        }
        args
    }

    pub(crate) fn wait_args(
        &self,
        condition: JobCondition,
        timeout: Option<Duration>,
    ) -> Vec<String> {
        let mut args = vec![
            "wait".to_string(),
            Self::KIND.as_str().to_string(),
            self.name.clone(),
            format!("--for=condition={condition}"),
        ];
        if let Some(timeout) = timeout {
            args.push(format!("--timeout={}ms", timeout.as_millis()));
        }
        args
    }
}
