use std::fmt;

use serde::Serialize;

use super::IoBehavior;

/// Sentinel pid shared by every interrupt service routine.
pub const ISR_PID: u32 = 9999;
/// Instructions an interrupt service routine executes before terminating.
pub const ISR_INSTRUCTIONS: u32 = 5;
const ISR_PRIORITY: i32 = 9999;
const ISR_RELATIVE_DEADLINE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Blocked,
    SuspendedReady,
    SuspendedBlocked,
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::New => "NEW",
            ProcessState::Ready => "READY",
            ProcessState::Running => "RUNNING",
            ProcessState::Blocked => "BLOCKED",
            ProcessState::SuspendedReady => "SUSPENDED_READY",
            ProcessState::SuspendedBlocked => "SUSPENDED_BLOCKED",
            ProcessState::Terminated => "TERMINATED",
        };
        f.write_str(name)
    }
}

/// The process control block. Holds everything the kernel knows about one
/// simulated task. The kernel moves it between queues by value, so a block
/// lives in exactly one place at a time.
#[derive(Debug, Clone)]
pub struct ProcessControlBlock {
    pub program_counter: usize,
    pub memory_address_register: usize,
    pub state: ProcessState,

    pid: u32,
    name: String,
    is_isr: bool,

    total_instructions: u32,
    instructions_remaining: u32,

    priority: i32,
    arrival_tick: u64,
    relative_deadline: u64,
    absolute_deadline: u64,
    missed_deadline: bool,

    io_behavior: Option<IoBehavior>,

    wait_time: u64,
    turnaround_time: u64,
    completion_tick: Option<u64>,
}

impl ProcessControlBlock {
    pub fn new(
        pid: u32,
        name: &str,
        total_instructions: u32,
        priority: i32,
        arrival_tick: u64,
        relative_deadline: u64,
    ) -> ProcessControlBlock {
        ProcessControlBlock {
            program_counter: 0,
            memory_address_register: 0,
            state: ProcessState::New,
            pid,
            name: name.to_string(),
            is_isr: false,
            total_instructions,
            instructions_remaining: total_instructions,
            priority,
            arrival_tick,
            relative_deadline,
            absolute_deadline: arrival_tick + relative_deadline,
            missed_deadline: false,
            io_behavior: None,
            wait_time: 0,
            turnaround_time: 0,
            completion_tick: None,
        }
    }

    /// Builds the synthetic routine dispatched for an interrupt at `current_tick`.
    pub fn new_isr(name: &str, current_tick: u64) -> ProcessControlBlock {
        let mut isr = ProcessControlBlock::new(
            ISR_PID,
            name,
            ISR_INSTRUCTIONS,
            ISR_PRIORITY,
            current_tick,
            ISR_RELATIVE_DEADLINE,
        );
        isr.is_isr = true;
        isr
    }

    pub fn with_io(mut self, io_behavior: IoBehavior) -> ProcessControlBlock {
        self.io_behavior = Some(io_behavior);
        self
    }

    /// Runs one instruction. Returns true once no instructions remain.
    pub fn execute_instruction(&mut self) -> bool {
        if self.instructions_remaining == 0 {
            return true;
        }

        self.program_counter += 1;
        self.memory_address_register += 1;
        self.instructions_remaining -= 1;

        if let Some(io) = self.io_behavior.as_mut() {
            io.count_instruction();
        }

        self.instructions_remaining == 0
    }

    /// An I/O request was generated and has not been serviced yet.
    pub fn needs_io(&self) -> bool {
        self.io_behavior.as_ref().is_some_and(IoBehavior::is_pending)
    }

    /// Services one blocked tick of the pending I/O request.
    /// Returns true on the tick the request is satisfied.
    pub fn service_io(&mut self) -> bool {
        match self.io_behavior.as_mut() {
            Some(io) => io.service(),
            None => false,
        }
    }

    pub fn get_deadline_remaining(&self, current_tick: u64) -> i64 {
        self.absolute_deadline as i64 - current_tick as i64
    }

    pub fn has_missed_deadline(&self, current_tick: u64) -> bool {
        current_tick > self.absolute_deadline && self.state != ProcessState::Terminated
    }

    pub fn mark_missed_deadline(&mut self) {
        self.missed_deadline = true;
    }

    pub fn terminate(&mut self, completion_tick: u64) {
        self.state = ProcessState::Terminated;
        self.completion_tick = Some(completion_tick);
        self.turnaround_time = completion_tick.saturating_sub(self.arrival_tick);
    }

    pub fn increment_wait_time(&mut self) {
        self.wait_time += 1;
    }

    pub fn get_pid(&self) -> u32 {
        self.pid
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn is_isr(&self) -> bool {
        self.is_isr
    }

    pub fn get_total_instructions(&self) -> u32 {
        self.total_instructions
    }

    pub fn get_instructions_remaining(&self) -> u32 {
        self.instructions_remaining
    }

    pub fn get_priority(&self) -> i32 {
        self.priority
    }

    pub fn get_arrival_tick(&self) -> u64 {
        self.arrival_tick
    }

    pub fn get_relative_deadline(&self) -> u64 {
        self.relative_deadline
    }

    pub fn get_absolute_deadline(&self) -> u64 {
        self.absolute_deadline
    }

    pub fn is_missed_deadline(&self) -> bool {
        self.missed_deadline
    }

    pub fn get_io_behavior(&self) -> Option<&IoBehavior> {
        self.io_behavior.as_ref()
    }

    pub fn get_wait_time(&self) -> u64 {
        self.wait_time
    }

    pub fn get_turnaround_time(&self) -> u64 {
        self.turnaround_time
    }

    pub fn get_completion_tick(&self) -> Option<u64> {
        self.completion_tick
    }
}

impl fmt::Display for ProcessControlBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{}[{}, state={}, pc={}, remaining={}, deadline={}, priority={}]",
            self.pid,
            self.name,
            self.state,
            self.program_counter,
            self.instructions_remaining,
            self.absolute_deadline,
            self.priority
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcb_new_computes_absolute_deadline() {
        let pcb = ProcessControlBlock::new(1, "telemetry", 10, 2, 4, 20);

        assert_eq!(pcb.get_absolute_deadline(), 24);
        assert_eq!(pcb.get_instructions_remaining(), 10);
        assert_eq!(pcb.state, ProcessState::New);
        assert!(!pcb.is_isr());
    }

    #[test]
    fn test_pcb_execute_instruction_advances_pc_and_mar() {
        let mut pcb = ProcessControlBlock::new(1, "telemetry", 3, 1, 0, 10);

        assert!(!pcb.execute_instruction());
        assert_eq!(pcb.program_counter, 1);
        assert_eq!(pcb.memory_address_register, 1);
        assert_eq!(pcb.get_instructions_remaining(), 2);
    }

    #[test]
    fn test_pcb_execute_instruction_reports_completion() {
        let mut pcb = ProcessControlBlock::new(1, "telemetry", 2, 1, 0, 10);

        assert!(!pcb.execute_instruction());
        assert!(pcb.execute_instruction());
        assert_eq!(pcb.get_instructions_remaining(), 0);

        // Exhausted blocks stay exhausted.
        assert!(pcb.execute_instruction());
        assert_eq!(pcb.program_counter, 2);
    }

    #[test]
    fn test_pcb_execute_instruction_counts_toward_io() {
        let mut pcb = ProcessControlBlock::new(1, "camera", 5, 1, 0, 10).with_io(IoBehavior::new(2, 3));

        pcb.execute_instruction();
        assert!(!pcb.needs_io());
        pcb.execute_instruction();
        assert!(pcb.needs_io());
    }

    #[test]
    fn test_pcb_deadline_remaining_goes_negative() {
        let pcb = ProcessControlBlock::new(1, "telemetry", 2, 1, 0, 3);

        assert_eq!(pcb.get_deadline_remaining(1), 2);
        assert_eq!(pcb.get_deadline_remaining(5), -2);
    }

    #[test]
    fn test_pcb_has_missed_deadline_ignores_terminated() {
        let mut pcb = ProcessControlBlock::new(1, "telemetry", 2, 1, 0, 3);

        assert!(!pcb.has_missed_deadline(3));
        assert!(pcb.has_missed_deadline(4));

        pcb.terminate(4);
        assert!(!pcb.has_missed_deadline(10));
    }

    #[test]
    fn test_pcb_terminate_records_turnaround() {
        let mut pcb = ProcessControlBlock::new(1, "telemetry", 2, 1, 3, 10);
        pcb.terminate(9);

        assert_eq!(pcb.state, ProcessState::Terminated);
        assert_eq!(pcb.get_completion_tick(), Some(9));
        assert_eq!(pcb.get_turnaround_time(), 6);
    }

    #[test]
    fn test_pcb_new_isr() {
        let isr = ProcessControlBlock::new_isr("ISR_TIMER_TICK", 7);

        assert!(isr.is_isr());
        assert_eq!(isr.get_pid(), ISR_PID);
        assert_eq!(isr.get_instructions_remaining(), ISR_INSTRUCTIONS);
        assert_eq!(isr.get_absolute_deadline(), 17);
        assert!(isr.get_io_behavior().is_none());
    }
}
