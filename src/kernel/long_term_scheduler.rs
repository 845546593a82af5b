use std::collections::VecDeque;

use super::{Memory, ProcessControlBlock, ProcessQueues, ProcessState};

/// Why admission stopped for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AdmissionStall {
    NoProcesses,
    NotArrived,
    NotEnoughMemory,
}

/// Holds submitted processes in the NEW state and admits them into RAM
/// once they have arrived and a slot is free.
pub(crate) struct LongTermScheduler {
    new_queue: VecDeque<ProcessControlBlock>,
}

impl LongTermScheduler {
    pub fn new() -> LongTermScheduler {
        LongTermScheduler {
            new_queue: VecDeque::new(),
        }
    }

    /// Inserts in arrival order, after any process arriving on the same tick.
    pub fn enqueue_process(&mut self, mut pcb: ProcessControlBlock) {
        pcb.state = ProcessState::New;
        let idx = self
            .new_queue
            .iter()
            .position(|queued| queued.get_arrival_tick() > pcb.get_arrival_tick())
            .unwrap_or(self.new_queue.len());
        self.new_queue.insert(idx, pcb);
    }

    pub fn has_processes(&self) -> bool {
        !self.new_queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.new_queue.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessControlBlock> {
        self.new_queue.iter()
    }

    pub fn step(
        &mut self,
        current_tick: u64,
        memory: &Memory,
        queues: &ProcessQueues,
    ) -> Result<ProcessControlBlock, AdmissionStall> {
        let pcb = self.new_queue.front().ok_or(AdmissionStall::NoProcesses)?;

        if !memory.has_capacity(queues.resident_count()) {
            return Err(AdmissionStall::NotEnoughMemory);
        }

        if pcb.get_arrival_tick() > current_tick {
            return Err(AdmissionStall::NotArrived);
        }

        let mut pcb = self.new_queue.pop_front().ok_or(AdmissionStall::NoProcesses)?;
        pcb.state = ProcessState::Ready;

        Ok(pcb)
    }

    /// Admits every arrived process that fits, in arrival order, onto the
    /// back of the ready queue. Returns the admitted pids.
    pub fn batch_step(&mut self, current_tick: u64, memory: &Memory, queues: &mut ProcessQueues) -> Vec<u32> {
        let mut process_ids = Vec::new();

        while self.has_processes() {
            match self.step(current_tick, memory, queues) {
                Ok(pcb) => {
                    process_ids.push(pcb.get_pid());
                    queues.ready.push_back(pcb);
                }
                Err(_) => break,
            }
        }

        process_ids
    }
}
