use thiserror::Error;
use tracing_error::{ExtractSpanTrace, SpanTrace};

use crate::error::SpannedErr;
use crate::kubectl::KubectlError;
use crate::kubernetes_objects::ResourceKind;

#[derive(Error, Debug)]
pub enum TransientRoutineError {
    #[error("failed to create {0} \"{1}\": {2}")]
    Create(ResourceKind, String, SpannedErr<KubectlError>),

    #[error("failed to wait for job \"{0}\": {1}")]
    WaitJob(String, SpannedErr<KubectlError>),

    #[error("job \"{0}\" failed")]
    JobFailed(String, SpanTrace),

    #[error("interrupted by {0}")]
    Interrupted(&'static str, SpanTrace),

    #[error("failed to delete {0} \"{1}\": {2}")]
    Delete(ResourceKind, String, SpannedErr<KubectlError>),
}

impl TransientRoutineError {
    pub(crate) fn interrupted(signal: &'static str) -> Self {
        TransientRoutineError::Interrupted(signal, SpanTrace::capture())
    }
}

impl ExtractSpanTrace for TransientRoutineError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            TransientRoutineError::Create(_, _, e) => e.span_trace(),
            TransientRoutineError::WaitJob(_, e) => e.span_trace(),
            TransientRoutineError::JobFailed(_, s) => Some(s),
            TransientRoutineError::Interrupted(_, s) => Some(s),
            TransientRoutineError::Delete(_, _, e) => e.span_trace(),
        }
    }
}
