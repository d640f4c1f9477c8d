pub(crate) mod configmap;
pub(crate) mod job;

use std::fmt;

/// Kinds of transient resources created by the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ConfigMap,
    Job,
}

impl ResourceKind {
    /// The resource name as understood by kubectl.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ConfigMap => "configmap",
            ResourceKind::Job => "job",
        }
    }

    pub(crate) fn delete_args(&self, name: &str) -> Vec<String> {
        vec![
            "delete".to_string(),
            self.as_str().to_string(),
            name.to_string(),
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
