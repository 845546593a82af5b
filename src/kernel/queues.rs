use std::collections::VecDeque;

use super::ProcessControlBlock;

/// Every admitted process lives in exactly one of these places.
/// The NEW queue belongs to the long-term scheduler.
#[derive(Debug, Default)]
pub(crate) struct ProcessQueues {
    pub ready: VecDeque<ProcessControlBlock>,
    pub blocked: VecDeque<ProcessControlBlock>,
    pub suspended_ready: VecDeque<ProcessControlBlock>,
    pub suspended_blocked: VecDeque<ProcessControlBlock>,
    pub terminated: VecDeque<ProcessControlBlock>,
    pub running: Option<ProcessControlBlock>,
}

impl ProcessQueues {
    pub fn new() -> ProcessQueues {
        ProcessQueues::default()
    }

    /// Processes occupying a RAM slot: ready, blocked and running.
    pub fn resident_count(&self) -> usize {
        self.ready.len() + self.blocked.len() + usize::from(self.running.is_some())
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// All process blocks in a fixed location order, running first.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.running
            .iter()
            .chain(self.ready.iter())
            .chain(self.blocked.iter())
            .chain(self.suspended_ready.iter())
            .chain(self.suspended_blocked.iter())
            .chain(self.terminated.iter())
    }
}
