use self::cli::Cli;
use self::config::Config;
use self::routine::transient::TransientRoutineContext;
use self::shutdown::Shutdown;
use clap::Parser;
use clap::error::ErrorKind;
use std::ffi::OsString;
use thiserror::Error;
use tracing::info;
use tracing_error::ExtractSpanTrace;
use tracing_error::SpanTrace;

pub(crate) mod cli;
pub mod config;
pub mod error;
pub mod kubectl;
pub mod kubernetes_objects;
pub mod routine;
pub mod shutdown;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Usage(clap::Error),

    #[error("{0}")]
    Config(#[from] config::ConfigParseError),

    #[error("{0}")]
    TransientRoutine(#[from] routine::transient::error::TransientRoutineError),
}

impl ExtractSpanTrace for AppError {
    fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            AppError::TransientRoutine(e) => e.span_trace(),
            _ => None,
        }
    }
}

/// Parses the command line. Help output exits the process as clap does;
/// every other parse error is returned so it exits like any failed run.
fn parse_cli<I, T>(args: I) -> Result<Cli, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        | ErrorKind::DisplayVersion => e.exit(),
        _ => AppError::Usage(e),
    })
}

pub async fn app() -> Result<(), AppError> {
    let cli = parse_cli(std::env::args_os())?;
    if cli.version {
        println!("kubectl-create-transient_configmap {VERSION}");
        return Ok(());
    }

    let config = Config::try_from(cli)?;

    info!("Config Loaded.");

    let kubectl = config.kubectl.clone();
    let mut context =
        TransientRoutineContext::new(config, kubectl, std::io::stdout(), Shutdown::new());
    context.run().await?;

    println!("create transient_configmap completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_flag_is_a_usage_error() {
        let err = parse_cli(["kubectl-create-transient_configmap", "cfg1", "--bogus"])
            .unwrap_err();
        assert!(matches!(err, AppError::Usage(_)), "{err}");
        assert!(err.to_string().contains("--bogus"), "{err}");
    }

    #[test]
    fn test_invalid_wait_timeout_is_a_usage_error() {
        let err = parse_cli([
            "kubectl-create-transient_configmap",
            "cfg1",
            "--job-name=job1",
            "--wait-timeout=soon",
        ])
        .unwrap_err();
        assert!(matches!(err, AppError::Usage(_)), "{err}");
    }

    #[test]
    fn test_valid_arguments_parse() {
        let cli = parse_cli([
            "kubectl-create-transient_configmap",
            "cfg1",
            "--job-name=job1",
            "--job-from=cronjob/nightly",
        ])
        .unwrap();
        assert_eq!(cli.name.as_deref(), Some("cfg1"));
    }
}
