use std::io::Write;

use tracing::{error, info, instrument};

use crate::error::{SpannedExt, print_span_trace};
use crate::kubectl::Kubectl;
use crate::kubernetes_objects::ResourceKind;

use super::TransientRoutineContext;
use super::error::TransientRoutineError;

/// Resources to delete once the run ends, in creation order.
#[derive(Debug, Default)]
pub(crate) struct CleanupStack {
    registered: Vec<(ResourceKind, String)>,
}

impl CleanupStack {
    pub(crate) fn register(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.registered.push((kind, name.into()));
    }

    pub(crate) fn len(&self) -> usize {
        self.registered.len()
    }

    fn pop(&mut self) -> Option<(ResourceKind, String)> {
        self.registered.pop()
    }
}

impl<K: Kubectl, W: Write> TransientRoutineContext<K, W> {
    /// Deletes every registered resource, newest first.
    ///
    /// A failed delete becomes the result only if `result` is still Ok, so
    /// it never hides the error that ended the run.
    #[instrument("finalizer", skip_all, fields(resources = cleanups.len()))]
    pub(super) async fn finalizer(
        &mut self,
        mut cleanups: CleanupStack,
        mut result: Result<(), TransientRoutineError>,
    ) -> Result<(), TransientRoutineError> {
        while let Some((kind, name)) = cleanups.pop() {
            self.print(format_args!("deleting {kind} {name}...\n"));
            match self.kubectl.run(&kind.delete_args(&name)).await.with_span_trace() {
                Ok(out) => {
                    info!("Deleted {} '{}'.", kind, name);
                    self.print(format_args!("{out}"));
                }
                Err(e) => {
                    let e = TransientRoutineError::Delete(kind, name, e);
                    if result.is_ok() {
                        result = Err(e);
                    } else {
                        error!("{}", e);
                        print_span_trace(&e);
                    }
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_stack_pops_newest_first() {
        let mut cleanups = CleanupStack::default();
        cleanups.register(ResourceKind::ConfigMap, "cfg1");
        cleanups.register(ResourceKind::Job, "job1");
        assert_eq!(cleanups.len(), 2);

        assert_eq!(cleanups.pop(), Some((ResourceKind::Job, "job1".to_string())));
        assert_eq!(
            cleanups.pop(),
            Some((ResourceKind::ConfigMap, "cfg1".to_string()))
        );
        assert_eq!(cleanups.pop(), None);
    }
}
