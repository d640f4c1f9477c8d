use std::time::Duration;

use thiserror::Error;

use crate::cli::Cli;
use crate::kubectl::KubectlCommand;
use crate::kubernetes_objects::configmap::TransientConfigMap;
use crate::kubernetes_objects::job::TransientJob;

/// Resolved configuration of a single run.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) configmap: TransientConfigMap,
    pub(crate) job: TransientJob,

    /// Passed to both `kubectl wait` calls; kubectl's own default applies when unset
    pub(crate) wait_timeout: Option<Duration>,

    pub(crate) kubectl: KubectlCommand,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigParseError {
    #[error("configmap name is required")]
    ConfigMapNameMissing,

    #[error("job name is required")]
    JobNameMissing,

    #[error("a container command requires --job-image")]
    CommandWithoutImage,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl TryFrom<Cli> for Config {
    type Error = ConfigParseError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let name = non_empty(cli.name).ok_or(ConfigParseError::ConfigMapNameMissing)?;
        let job_name = non_empty(cli.job_name).ok_or(ConfigParseError::JobNameMissing)?;
        let image = non_empty(cli.job_image);

        if !cli.command.is_empty() && image.is_none() {
            return Err(ConfigParseError::CommandWithoutImage);
        }

        Ok(Config {
            configmap: TransientConfigMap {
                name,
                file_sources: cli.from_file,
                literal_sources: cli.from_literal,
                env_file_sources: cli.from_env_file,
            },
            job: TransientJob {
                name: job_name,
                from: non_empty(cli.job_from),
                image,
                command: cli.command,
            },
            wait_timeout: cli.wait_timeout,
            kubectl: KubectlCommand {
                program: cli.kubectl,
                namespace: non_empty(cli.namespace),
                context: non_empty(cli.context),
                kubeconfig: cli.kubeconfig,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Result<Config, ConfigParseError> {
        let cli = Cli::try_parse_from(
            std::iter::once("kubectl-create-transient_configmap").chain(args.iter().copied()),
        )
        .unwrap();
        Config::try_from(cli)
    }

    #[test]
    fn test_config_from_cli() {
        let config = parse(&[
            "cfg1",
            "--from-literal=k=v",
            "--job-name=job1",
            "--job-from=cronjob/nightly",
            "-n",
            "batch",
        ])
        .unwrap();

        assert_eq!(
            config.configmap,
            TransientConfigMap {
                name: "cfg1".to_string(),
                literal_sources: vec!["k=v".to_string()],
                ..Default::default()
            }
        );
        assert_eq!(
            config.job,
            TransientJob {
                name: "job1".to_string(),
                from: Some("cronjob/nightly".to_string()),
                ..Default::default()
            }
        );
        assert_eq!(config.wait_timeout, None);
        assert_eq!(config.kubectl.namespace.as_deref(), Some("batch"));
        assert_eq!(config.kubectl.program, std::path::PathBuf::from("kubectl"));
    }

    #[test]
    fn test_configmap_name_required() {
        assert_eq!(
            parse(&["--job-name=job1"]).unwrap_err(),
            ConfigParseError::ConfigMapNameMissing
        );
        assert_eq!(
            parse(&["", "--job-name=job1"]).unwrap_err(),
            ConfigParseError::ConfigMapNameMissing
        );
    }

    #[test]
    fn test_job_name_required() {
        assert_eq!(
            parse(&["cfg1", "--from-literal=k=v"]).unwrap_err(),
            ConfigParseError::JobNameMissing
        );
    }

    #[test]
    fn test_command_requires_image() {
        assert_eq!(
            parse(&["cfg1", "--job-name=job1", "--", "date"]).unwrap_err(),
            ConfigParseError::CommandWithoutImage
        );

        let config = parse(&["cfg1", "--job-name=job1", "--job-image=busybox", "--", "date"])
            .unwrap();
        assert_eq!(config.job.command, vec!["date"]);
    }
}
