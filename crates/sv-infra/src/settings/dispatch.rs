use sv_core::ports::{WriteDispatcherPort, WriteJob};
use tokio::runtime::Handle;

/// Runs file writes on the tokio blocking pool of the runtime it was created on.
#[derive(Debug, Clone)]
pub struct BlockingPoolDispatcher {
    handle: Handle,
}

impl BlockingPoolDispatcher {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Dispatcher bound to the runtime of the calling task.
    ///
    /// Panics outside a tokio runtime, like [`Handle::current`].
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl WriteDispatcherPort for BlockingPoolDispatcher {
    fn dispatch(&self, job: WriteJob) {
        // The JoinHandle is dropped on purpose: completion is reported by the job.
        let _ = self.handle.spawn_blocking(job);
    }
}
