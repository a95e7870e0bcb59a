use tokio::task::JoinHandle;

/// Manages background tasks with proper lifecycle handling
pub struct TaskManager {
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl TaskManager {
    /// Create a new empty task manager
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Spawn a named task and track it
    pub fn spawn<F>(&mut self, name: &'static str, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        self.handles.retain(|(_, handle)| !handle.is_finished());
        tracing::debug!("Spawning task {}", name);
        self.handles.push((name, tokio::spawn(future)));
    }

    /// Whether any tracked task is still running
    pub fn is_running(&self) -> bool {
        self.handles.iter().any(|(_, handle)| !handle.is_finished())
    }

    /// Abort all tasks without waiting
    pub fn abort_all(&mut self) {
        for (name, handle) in self.handles.drain(..) {
            if !handle.is_finished() {
                tracing::debug!("Aborting task {}", name);
            }
            handle.abort();
        }
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}
