use std::cmp::Reverse;

use super::short_term_scheduler::position_of_min;
use super::{ProcessQueues, ProcessState};

/// A swap decision taken by the medium-term scheduler, by pid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwapEvent {
    SuspendedReady(u32),
    SuspendedBlocked(u32),
    Restored(u32),
}

/// Main memory modelled as a number of process slots. Ready, blocked and
/// running processes hold a slot; suspended ones are swapped out.
pub(crate) struct Memory {
    ram_limit: usize,
}

impl Memory {
    pub fn new(ram_limit: usize) -> Memory {
        Memory { ram_limit }
    }

    pub fn get_ram_limit(&self) -> usize {
        self.ram_limit
    }

    pub fn set_ram_limit(&mut self, ram_limit: usize) {
        self.ram_limit = ram_limit;
    }

    pub fn has_capacity(&self, resident_count: usize) -> bool {
        resident_count < self.ram_limit
    }

    /// Swaps out the lowest-priority ready (then blocked) processes while
    /// over the limit, and swaps in the highest-priority suspended-ready
    /// processes while under it. The running process is never touched.
    pub fn rebalance(&self, queues: &mut ProcessQueues) -> Vec<SwapEvent> {
        let mut events = Vec::new();
        let mut resident = queues.resident_count();

        while resident > self.ram_limit {
            let Some(idx) = position_of_min(&queues.ready, |pcb| pcb.get_priority()) else {
                break;
            };
            let Some(mut pcb) = queues.ready.remove(idx) else {
                break;
            };
            pcb.state = ProcessState::SuspendedReady;
            events.push(SwapEvent::SuspendedReady(pcb.get_pid()));
            queues.suspended_ready.push_back(pcb);
            resident -= 1;
        }

        while resident > self.ram_limit {
            let Some(idx) = position_of_min(&queues.blocked, |pcb| pcb.get_priority()) else {
                break;
            };
            let Some(mut pcb) = queues.blocked.remove(idx) else {
                break;
            };
            pcb.state = ProcessState::SuspendedBlocked;
            events.push(SwapEvent::SuspendedBlocked(pcb.get_pid()));
            queues.suspended_blocked.push_back(pcb);
            resident -= 1;
        }

        while resident < self.ram_limit {
            let Some(idx) = position_of_min(&queues.suspended_ready, |pcb| Reverse(pcb.get_priority())) else {
                break;
            };
            let Some(mut pcb) = queues.suspended_ready.remove(idx) else {
                break;
            };
            pcb.state = ProcessState::Ready;
            events.push(SwapEvent::Restored(pcb.get_pid()));
            queues.ready.push_back(pcb);
            resident += 1;
        }

        events
    }
}
