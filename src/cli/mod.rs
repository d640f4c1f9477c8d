use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use duration_string::DurationString;

const EXAMPLES: &str = "\
Examples:
  # Create a transient configmap named my-config based on folder bar
  kubectl create transient_configmap my-config --from-file=path/to/bar --job-name=test-job --job-from=cronjob/a-cronjob

  # Use specified keys instead of file basenames on disk
  kubectl create transient_configmap my-config --from-file=key1=/path/to/bar/file1.txt --from-file=key2=/path/to/bar/file2.txt --job-name=test-job --job-from=cronjob/a-cronjob

  # Create a transient configmap with key1=config1 and key2=config2
  kubectl create transient_configmap my-config --from-literal=key1=config1 --from-literal=key2=config2 --job-name=test-job --job-from=cronjob/a-cronjob

  # Create a transient configmap from env files
  kubectl create transient_configmap my-config --from-env-file=path/to/foo.env --from-env-file=path/to/bar.env --job-name=test-job --job-from=cronjob/a-cronjob

  # Run a command in a new image against the configmap
  kubectl create transient_configmap my-config --from-literal=key1=config1 --job-name=test-job --job-image=busybox -- date";

#[derive(Debug, Parser)]
#[command(
    name = "kubectl create transient_configmap",
    about = "Create a ConfigMap and a Job. And after the job is complete, delete them.",
    disable_version_flag = true,
    after_help = EXAMPLES
)]
pub(crate) struct Cli {
    /// Name of the ConfigMap to create
    #[arg(value_name = "CONFIGMAP_NAME")]
    pub(crate) name: Option<String>,

    /// Command to run in the job's container (requires --job-image)
    #[arg(last = true, value_name = "COMMAND")]
    pub(crate) command: Vec<String>,

    /// Print the version of this plugin
    #[arg(long)]
    pub(crate) version: bool,

    /// Key file can be specified using its file path, in which case file basename will be used
    /// as configmap key, or optionally with a key and file path. Specifying a directory will
    /// iterate each named file in the directory whose basename is a valid configmap key.
    #[arg(long, value_name = "[KEY=]SOURCE", value_delimiter = ',')]
    pub(crate) from_file: Vec<String>,

    /// Specify a key and literal value to insert in configmap (i.e. mykey=somevalue)
    #[arg(long, value_name = "KEY=VALUE")]
    pub(crate) from_literal: Vec<String>,

    /// Specify the path to a file to read lines of key=val pairs to create a configmap
    #[arg(long, value_name = "PATH", value_delimiter = ',')]
    pub(crate) from_env_file: Vec<String>,

    /// The name of the job to create
    #[arg(long)]
    pub(crate) job_name: Option<String>,

    /// Image name to run
    #[arg(long)]
    pub(crate) job_image: Option<String>,

    /// The name of the resource to create a Job from (only cronjob is supported)
    #[arg(long, value_name = "cronjob/NAME")]
    pub(crate) job_from: Option<String>,

    /// Namespace to create the resources in
    #[arg(short, long)]
    pub(crate) namespace: Option<String>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub(crate) context: Option<String>,

    /// Path to the kubeconfig file
    #[arg(long)]
    pub(crate) kubeconfig: Option<PathBuf>,

    /// How long to wait for the job to finish, e.g. "10m" (kubectl's default when omitted)
    #[arg(long, value_parser = parse_duration)]
    pub(crate) wait_timeout: Option<Duration>,

    /// kubectl binary to invoke
    #[arg(long, default_value = "kubectl")]
    pub(crate) kubectl: PathBuf,
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    value
        .parse::<DurationString>()
        .map(Duration::from)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_and_comma_separated_sources() {
        let cli = Cli::try_parse_from([
            "kubectl-create-transient_configmap",
            "cfg1",
            "--from-file=a.txt,key=b.txt",
            "--from-file=dir",
            "--from-literal=k=v,w",
            "--from-literal=x=y",
            "--from-env-file=a.env,b.env",
            "--job-name=job1",
        ])
        .unwrap();

        assert_eq!(cli.name.as_deref(), Some("cfg1"));
        assert_eq!(cli.from_file, vec!["a.txt", "key=b.txt", "dir"]);
        assert_eq!(cli.from_literal, vec!["k=v,w", "x=y"]);
        assert_eq!(cli.from_env_file, vec!["a.env", "b.env"]);
        assert_eq!(cli.job_name.as_deref(), Some("job1"));
        assert!(!cli.version);
    }

    #[test]
    fn test_trailing_command() {
        let cli = Cli::try_parse_from([
            "kubectl-create-transient_configmap",
            "cfg1",
            "--job-name=job1",
            "--job-image=busybox",
            "--",
            "sh",
            "-c",
            "cat /config/k",
        ])
        .unwrap();
        assert_eq!(cli.command, vec!["sh", "-c", "cat /config/k"]);
    }

    #[test]
    fn test_version_without_name() {
        let cli =
            Cli::try_parse_from(["kubectl-create-transient_configmap", "--version"]).unwrap();
        assert!(cli.version);
        assert_eq!(cli.name, None);
    }

    #[test]
    fn test_wait_timeout() {
        let cli = Cli::try_parse_from([
            "kubectl-create-transient_configmap",
            "cfg1",
            "--job-name=job1",
            "--wait-timeout=90m",
        ])
        .unwrap();
        assert_eq!(cli.wait_timeout, Some(Duration::from_secs(5400)));

        let res = Cli::try_parse_from([
            "kubectl-create-transient_configmap",
            "cfg1",
            "--wait-timeout=soon",
        ]);
        assert!(res.is_err());
    }
}
