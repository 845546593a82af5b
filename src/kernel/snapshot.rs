use serde::Serialize;

use super::{MetricsSummary, Policy, ProcessControlBlock, ProcessState};

/// Read-only view of one process as of a published tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessSummary {
    pub pid: u32,
    pub name: String,
    pub state: ProcessState,
    pub pc: usize,
    pub mar: usize,
    pub priority: i32,
    pub instructions_remaining: u32,
    pub deadline_remaining: i64,
    pub missed_deadline: bool,
    pub is_isr: bool,
    pub wait_time: u64,
    pub turnaround_time: u64,
}

impl ProcessSummary {
    pub fn from_pcb(pcb: &ProcessControlBlock, current_tick: u64) -> ProcessSummary {
        ProcessSummary {
            pid: pcb.get_pid(),
            name: pcb.get_name().to_string(),
            state: pcb.state,
            pc: pcb.program_counter,
            mar: pcb.memory_address_register,
            priority: pcb.get_priority(),
            instructions_remaining: pcb.get_instructions_remaining(),
            deadline_remaining: pcb.get_deadline_remaining(current_tick),
            missed_deadline: pcb.is_missed_deadline(),
            is_isr: pcb.is_isr(),
            wait_time: pcb.get_wait_time(),
            turnaround_time: pcb.get_turnaround_time(),
        }
    }

    pub(crate) fn from_queue<'a>(
        pcbs: impl IntoIterator<Item = &'a ProcessControlBlock>,
        current_tick: u64,
    ) -> Vec<ProcessSummary> {
        pcbs.into_iter()
            .map(|pcb| ProcessSummary::from_pcb(pcb, current_tick))
            .collect()
    }
}

/// Immutable projection of the kernel published at the end of every tick.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub current_tick: u64,
    pub policy: Policy,
    pub quantum: u32,
    pub ram_limit: usize,
    pub resident_count: usize,
    pub pending_interrupts: usize,
    pub total_processes: usize,

    pub running: Option<ProcessSummary>,
    pub new: Vec<ProcessSummary>,
    pub ready: Vec<ProcessSummary>,
    pub blocked: Vec<ProcessSummary>,
    pub suspended_ready: Vec<ProcessSummary>,
    pub suspended_blocked: Vec<ProcessSummary>,
    pub terminated: Vec<ProcessSummary>,

    pub logs: Vec<String>,
    pub metrics: MetricsSummary,
}

impl Snapshot {
    /// What readers see before the first tick has been published.
    pub fn empty(policy: Policy, quantum: u32, ram_limit: usize) -> Snapshot {
        Snapshot {
            current_tick: 0,
            policy,
            quantum,
            ram_limit,
            resident_count: 0,
            pending_interrupts: 0,
            total_processes: 0,
            running: None,
            new: Vec::new(),
            ready: Vec::new(),
            blocked: Vec::new(),
            suspended_ready: Vec::new(),
            suspended_blocked: Vec::new(),
            terminated: Vec::new(),
            logs: Vec::new(),
            metrics: MetricsSummary::default(),
        }
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Every summary in the snapshot, running first.
    pub fn all_processes(&self) -> impl Iterator<Item = &ProcessSummary> {
        self.running
            .iter()
            .chain(self.new.iter())
            .chain(self.ready.iter())
            .chain(self.blocked.iter())
            .chain(self.suspended_ready.iter())
            .chain(self.suspended_blocked.iter())
            .chain(self.terminated.iter())
    }

    pub fn find(&self, pid: u32) -> Option<&ProcessSummary> {
        self.all_processes().find(|summary| summary.pid == pid)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_process_summary_from_pcb() {
        let mut pcb = ProcessControlBlock::new(4, "attitude", 8, 3, 2, 10);
        pcb.state = ProcessState::Ready;
        pcb.execute_instruction();

        let summary = ProcessSummary::from_pcb(&pcb, 5);

        assert_eq!(summary.pid, 4);
        assert_eq!(summary.pc, 1);
        assert_eq!(summary.instructions_remaining, 7);
        assert_eq!(summary.deadline_remaining, 7);
        assert_eq!(summary.state, ProcessState::Ready);
    }

    #[test]
    fn test_snapshot_find_and_json() {
        let mut snapshot = Snapshot::empty(Policy::EarliestDeadlineFirst, 3, 10);
        let pcb = ProcessControlBlock::new(1, "beacon", 2, 1, 0, 10);
        snapshot.new = ProcessSummary::from_queue([&pcb], 0);

        assert_eq!(snapshot.find(1).map(|summary| summary.name.as_str()), Some("beacon"));
        assert!(snapshot.find(2).is_none());

        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"policy\": \"EDF\""));
        assert!(json.contains("\"state\": \"NEW\""));
    }
}
