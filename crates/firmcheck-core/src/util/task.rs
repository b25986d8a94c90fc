use tokio::task::JoinHandle;

/// Owns a spawned background task and aborts it when dropped.
///
/// Timed processes keep their task inside one of these so that tearing down
/// the owner always releases the pending timer, whatever path the teardown
/// takes.
#[derive(Debug)]
pub struct TaskGuard(Option<JoinHandle<()>>);

impl TaskGuard {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self(Some(handle))
    }

    pub fn abort(&mut self) {
        if let Some(handle) = self.0.take() {
            handle.abort();
        }
    }

    /// `true` once the task ended or was aborted.
    pub fn is_finished(&self) -> bool {
        self.0.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.abort();
    }
}
