use derive_debug::Dbg;

use super::ResourceKind;

#[derive(Dbg, Clone, Default)]
#[cfg_attr(test, derive(PartialEq))]
pub(crate) struct TransientConfigMap {
    pub(crate) name: String,

    /// `[key=]path` sources, a directory adds every file in it
    pub(crate) file_sources: Vec<String>,

    /// `key=value` pairs
    #[dbg(skip)]
    pub(crate) literal_sources: Vec<String>,

    /// Paths to files of `key=value` lines
    pub(crate) env_file_sources: Vec<String>,
}

impl TransientConfigMap {
    pub(crate) const KIND: ResourceKind = ResourceKind::ConfigMap;

    pub(crate) fn create_args(&self) -> Vec<String> {
        let mut args = vec![
            "create".to_string(),
            Self::KIND.as_str().to_string(),
            self.name.clone(),
        ];
        args.extend(self.file_sources.iter().map(|s| format!("--from-file={s}")));
        args.extend(
            self.literal_sources
                .iter()
                .map(|s| format!("--from-literal={s}")),
        );
        args.extend(
            self.env_file_sources
                .iter()
                .map(|s| format!("--from-env-file={s}")),
        );
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_args_keep_source_order() {
        let configmap = TransientConfigMap {
            name: "cfg1".to_string(),
            file_sources: vec!["key1=/tmp/a.txt".to_string(), "/tmp/dir".to_string()],
            literal_sources: vec!["k=v".to_string()],
            env_file_sources: vec!["/tmp/foo.env".to_string()],
        };

        assert_eq!(
            configmap.create_args(),
            vec![
                "create",
                "configmap",
                "cfg1",
                "--from-file=key1=/tmp/a.txt",
                "--from-file=/tmp/dir",
                "--from-literal=k=v",
                "--from-env-file=/tmp/foo.env",
            ]
        );
    }

    #[test]
    fn test_create_args_without_sources() {
        let configmap = TransientConfigMap {
            name: "empty".to_string(),
            ..Default::default()
        };
        assert_eq!(configmap.create_args(), vec!["create", "configmap", "empty"]);
    }

    #[test]
    fn test_debug_hides_literal_values() {
        let configmap = TransientConfigMap {
            name: "cfg1".to_string(),
            literal_sources: vec!["password=hunter2".to_string()],
            ..Default::default()
        };
        let debug = format!("{configmap:?}");
        assert!(debug.contains("cfg1"));
        assert!(!debug.contains("hunter2"));
    }
}
