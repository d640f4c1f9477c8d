pub mod error;
mod finalizer;
mod wait_until_job_finished;


use std::fmt;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use tracing::{error, info, instrument, warn};
use tracing_error::SpanTrace;

use crate::config::Config;
use crate::error::{SpannedExt, print_span_trace};
use crate::kubectl::Kubectl;
use crate::kubernetes_objects::ResourceKind;
use crate::shutdown::Shutdown;

use self::error::TransientRoutineError;
use self::finalizer::CleanupStack;
use self::wait_until_job_finished::{JobOutcome, wait_until_job_finished};

/// One create → wait → delete run of a transient ConfigMap and its Job.
pub(crate) struct TransientRoutineContext<K, W> {
    pub(crate) config: Config,
    kubectl: K,
    out: W,
    shutdown: Shutdown,
}

impl<K: Kubectl, W: Write> TransientRoutineContext<K, W> {
    pub(crate) fn new(config: Config, kubectl: K, out: W, shutdown: Shutdown) -> Self {
        TransientRoutineContext {
            config,
            kubectl,
            out,
            shutdown,
        }
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.out
    }

    /// Runs the whole lifecycle. Every resource created along the way is
    /// deleted before this returns, also when the lifecycle panics.
    #[instrument(
        "transient_routine",
        skip(self),
        fields(
            configmap_name = %self.config.configmap.name,
            job_name = %self.config.job.name
        )
    )]
    pub(crate) async fn run(&mut self) -> Result<(), TransientRoutineError> {
        let mut cleanups = CleanupStack::default();

        let result = AssertUnwindSafe(self.lifecycle(&mut cleanups))
            .catch_unwind()
            .await;

        match result {
            Ok(result) => self.finalizer(cleanups, result).await,
            Err(payload) => {
                warn!("Lifecycle panicked. Deleting created resources before unwinding...");
                if let Err(e) = self.finalizer(cleanups, Ok(())).await {
                    error!("{}", e);
                    print_span_trace(&e);
                }
                panic::resume_unwind(payload)
            }
        }
    }

    async fn lifecycle(
        &mut self,
        cleanups: &mut CleanupStack,
    ) -> Result<(), TransientRoutineError> {
        let configmap = self.config.configmap.clone();
        self.create(ResourceKind::ConfigMap, &configmap.name, configmap.create_args())
            .await?;
        cleanups.register(ResourceKind::ConfigMap, &configmap.name);

        let job = self.config.job.clone();
        self.create(ResourceKind::Job, &job.name, job.create_args()).await?;
        cleanups.register(ResourceKind::Job, &job.name);

        let outcome = wait_until_job_finished(
            &self.kubectl,
            &job,
            self.config.wait_timeout,
            &mut self.shutdown,
        )
        .await;

        match outcome {
            JobOutcome::Succeeded => {
                info!("Job '{}' completed.", job.name);
                self.print(format_args!("job \"{}\" completed\n", job.name));
                Ok(())
            }
            JobOutcome::Failed => {
                Err(TransientRoutineError::JobFailed(job.name, SpanTrace::capture()))
            }
            JobOutcome::WaitError(e) => Err(e),
        }
    }

    #[instrument("create", skip(self, kind, args), fields(kind = %kind))]
    async fn create(
        &mut self,
        kind: ResourceKind,
        name: &str,
        args: Vec<String>,
    ) -> Result<(), TransientRoutineError> {
        if let Some(signal) = self.shutdown.requested() {
            info!("Received {signal} before creating {kind} '{name}'. Skipping.");
            return Err(TransientRoutineError::interrupted(signal));
        }

        self.print(format_args!("creating {kind} {name}...\n"));
        let out = self
            .kubectl
            .run(&args)
            .await
            .with_span_trace()
            .map_err(|e| TransientRoutineError::Create(kind, name.to_string(), e))?;
        info!("Created {} '{}'.", kind, name);
        self.print(format_args!("{out}"));
        Ok(())
    }

    /// Writes progress and kubectl output to the caller's stream.
    fn print(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args) {
            warn!("Failed to write output: {}", e);
        }
    }
}
