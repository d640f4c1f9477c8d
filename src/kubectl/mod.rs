use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum KubectlError {
    #[error("failed to execute {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{0}")]
    Command(String),
}

/// Runs kubectl with the given arguments and returns its stdout.
///
/// Dropping the returned future must stop the underlying call; the
/// wait race relies on it to cancel the losing `kubectl wait`.
pub(crate) trait Kubectl {
    async fn run(&self, args: &[String]) -> Result<String, KubectlError>;
}

/// Executes the real `kubectl` binary.
#[derive(Debug, Clone)]
pub(crate) struct KubectlCommand {
    pub(crate) program: PathBuf,
    pub(crate) namespace: Option<String>,
    pub(crate) context: Option<String>,
    pub(crate) kubeconfig: Option<PathBuf>,
}

impl Default for KubectlCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from("kubectl"),
            namespace: None,
            context: None,
            kubeconfig: None,
        }
    }
}

impl KubectlCommand {
    /// Flags put in front of every call.
    fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push(format!("--kubeconfig={}", kubeconfig.display()));
        }
        if let Some(context) = &self.context {
            args.push(format!("--context={context}"));
        }
        if let Some(namespace) = &self.namespace {
            args.push(format!("--namespace={namespace}"));
        }
        args
    }
}

impl Kubectl for KubectlCommand {
    #[instrument(
        "kubectl",
        skip_all,
        fields(verb = args.first().map(String::as_str).unwrap_or_default())
    )]
    async fn run(&self, args: &[String]) -> Result<String, KubectlError> {
        debug!("Running {} {}", self.program.display(), args.join(" "));

        let output = Command::new(&self.program)
            .args(self.global_args())
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| KubectlError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(KubectlError::Command(error_message(&stderr, output.status)));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// kubectl prefixes its messages with "error:", which is dropped here.
fn error_message(stderr: &str, status: ExitStatus) -> String {
    let message = stderr.trim();
    let message = message.strip_prefix("error:").unwrap_or(message).trim();
    if message.is_empty() {
        format!("kubectl exited with {status}")
    } else {
        message.to_string()
    }
}
