use super::ProcessControlBlock;

/// What happened to the running process during one CPU cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CycleOutcome {
    /// One instruction ran and more remain.
    Executed,
    /// The last instruction ran.
    Terminated,
    /// A pending I/O request stopped the process before it could run.
    Blocked,
}

impl CycleOutcome {
    pub fn executed_instruction(self) -> bool {
        !matches!(self, CycleOutcome::Blocked)
    }
}

pub(crate) struct Cpu {
    instructions_executed: u64,
}

impl Cpu {
    pub fn new() -> Cpu {
        Cpu {
            instructions_executed: 0,
        }
    }

    /// Runs at most one instruction of `pcb`. A process whose I/O request was
    /// generated on an earlier cycle traps here instead of continuing.
    pub fn cycle(&mut self, pcb: &mut ProcessControlBlock) -> CycleOutcome {
        if pcb.needs_io() {
            return CycleOutcome::Blocked;
        }

        let finished = pcb.execute_instruction();
        self.instructions_executed += 1;

        if finished {
            CycleOutcome::Terminated
        } else {
            CycleOutcome::Executed
        }
    }

    pub fn get_instructions_executed(&self) -> u64 {
        self.instructions_executed
    }
}
