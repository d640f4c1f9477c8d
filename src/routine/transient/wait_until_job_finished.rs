use std::time::Duration;

use tokio::select;
use tracing::{debug, info, instrument, warn};

use crate::error::SpannedErr;
use crate::kubectl::{Kubectl, KubectlError};
use crate::kubernetes_objects::job::{JobCondition, TransientJob};
use crate::shutdown::Shutdown;

use super::error::TransientRoutineError;

/// Terminal result of the wait phase.
#[derive(Debug)]
pub(crate) enum JobOutcome {
    Succeeded,
    Failed,
    WaitError(TransientRoutineError),
}

async fn wait_for_condition<K: Kubectl>(
    kubectl: &K,
    job: &TransientJob,
    condition: JobCondition,
    timeout: Option<Duration>,
) -> Result<String, KubectlError> {
    let res = kubectl.run(&job.wait_args(condition, timeout)).await;
    debug!("kubectl wait --for=condition={} returned", condition);
    res
}

/// Races a `complete` wait against a `failed` wait and the shutdown signal.
///
/// `kubectl wait` watches a single condition per call. Whichever branch
/// resolves first decides the outcome and the other futures are dropped,
/// which kills their kubectl processes; a cancelled wait reports nothing.
#[instrument("wait_until_job_finished", skip_all, fields(job_name = %job.name))]
pub(super) async fn wait_until_job_finished<K: Kubectl>(
    kubectl: &K,
    job: &TransientJob,
    timeout: Option<Duration>,
    shutdown: &mut Shutdown,
) -> JobOutcome {
    info!("Waiting for job '{}' to complete or fail...", job.name);

    let complete = wait_for_condition(kubectl, job, JobCondition::Complete, timeout);
    let failed = wait_for_condition(kubectl, job, JobCondition::Failed, timeout);

    select! {
        res = complete => match res {
            Ok(_) => {
                info!("Job '{}' reached condition 'complete'.", job.name);
                JobOutcome::Succeeded
            }
            Err(e) => wait_error(job, e),
        },
        res = failed => match res {
            Ok(_) => {
                info!("Job '{}' reached condition 'failed'.", job.name);
                JobOutcome::Failed
            }
            // Any resolution of the "failed" wait fails the job.
            Err(e) => {
                warn!("Waiting for job '{}' to fail errored: {}", job.name, e);
                JobOutcome::Failed
            }
        },
        signal = shutdown.requested_signal() => {
            warn!("Received {} while waiting for job '{}'.", signal, job.name);
            JobOutcome::WaitError(TransientRoutineError::interrupted(signal))
        }
    }
}

fn wait_error(job: &TransientJob, e: KubectlError) -> JobOutcome {
    warn!("Waiting for job '{}' failed: {}", job.name, e);
    JobOutcome::WaitError(TransientRoutineError::WaitJob(
        job.name.clone(),
        SpannedErr::new(e),
    ))
}
