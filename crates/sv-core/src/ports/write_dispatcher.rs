/// A unit of blocking file work produced by a save.
pub type WriteJob = Box<dyn FnOnce() + Send + 'static>;

/// Execution-context affinity hook for file writes.
///
/// Hosts that require file I/O on a designated thread (a UI thread, a
/// single-threaded executor) provide an implementation that runs the job there.
/// The job must be run exactly once; dropping it unrun is treated as a failed save.
pub trait WriteDispatcherPort: Send + Sync {
    fn dispatch(&self, job: WriteJob);
}
