use super::connection::ConnectionState;
use crate::infrastructure::TaskManager;

/// Consolidated mutable state for RealtimeClient
pub struct ClientState {
    /// Last reported state; `None` until the first `start`
    pub connection: Option<ConnectionState>,

    /// Set by `stop`, suppresses reconnection and callbacks
    pub stopped: bool,

    /// Incremented by every `start` and `stop`; a run only reports while its
    /// generation is current
    pub generation: u64,

    /// Owns the supervisor task
    pub task_manager: TaskManager,
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            connection: None,
            stopped: true,
            generation: 0,
            task_manager: TaskManager::new(),
        }
    }

    /// Whether a run with this generation may still report
    pub fn is_current(&self, generation: u64) -> bool {
        !self.stopped && self.generation == generation
    }

    /// Starts a new run and returns its generation
    pub fn begin_run(&mut self) -> u64 {
        self.stopped = false;
        self.generation += 1;
        self.generation
    }

    /// Ends the current run; nothing it scheduled may report afterwards
    pub fn end_run(&mut self) {
        self.stopped = true;
        self.generation += 1;
        self.task_manager.abort_all();
        if self.connection.is_some() {
            self.connection = Some(ConnectionState::Disconnected);
        }
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations() {
        let mut state = ClientState::new();
        assert!(!state.is_current(0));

        let first = state.begin_run();
        assert!(state.is_current(first));

        state.end_run();
        assert!(!state.is_current(first));

        let second = state.begin_run();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }

    #[test]
    fn test_end_run_records_disconnected() {
        let mut state = ClientState::new();
        state.end_run();
        assert_eq!(state.connection, None);

        state.begin_run();
        state.connection = Some(ConnectionState::ConnectedSocket);
        state.end_run();
        assert_eq!(state.connection, Some(ConnectionState::Disconnected));
    }
}
