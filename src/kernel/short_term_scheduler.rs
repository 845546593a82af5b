use std::cmp::Reverse;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ProcessControlBlock;

use crate::error::SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    #[serde(rename = "FCFS")]
    Fcfs,
    #[serde(rename = "RR")]
    RoundRobin,
    #[serde(rename = "SRT")]
    ShortestRemainingTime,
    #[serde(rename = "PRIO")]
    Priority,
    #[serde(rename = "EDF")]
    EarliestDeadlineFirst,
}

impl Policy {
    pub fn name(self) -> &'static str {
        match self {
            Policy::Fcfs => "FCFS",
            Policy::RoundRobin => "RR",
            Policy::ShortestRemainingTime => "SRT",
            Policy::Priority => "PRIO",
            Policy::EarliestDeadlineFirst => "EDF",
        }
    }

    /// Index of the process this policy would run next.
    /// Among equals the first one in queue order wins.
    pub fn select_index(self, ready: &VecDeque<ProcessControlBlock>, current_tick: u64) -> Option<usize> {
        if ready.is_empty() {
            return None;
        }

        match self {
            Policy::Fcfs | Policy::RoundRobin => Some(0),
            Policy::ShortestRemainingTime => position_of_min(ready, |pcb| pcb.get_instructions_remaining() as i64),
            Policy::Priority => position_of_min(ready, |pcb| Reverse(pcb.get_priority())),
            Policy::EarliestDeadlineFirst => position_of_min(ready, |pcb| pcb.get_deadline_remaining(current_tick)),
        }
    }

    /// Whether some ready process is strictly more urgent than `running`
    /// under this policy. Round-robin expiry is handled by the scheduler,
    /// FCFS never preempts on its own.
    pub fn is_preempted_by_ready(
        self,
        running: &ProcessControlBlock,
        ready: &VecDeque<ProcessControlBlock>,
        current_tick: u64,
    ) -> bool {
        let Some(best) = self.select_index(ready, current_tick).map(|idx| &ready[idx]) else {
            return false;
        };

        match self {
            Policy::Fcfs | Policy::RoundRobin => false,
            Policy::ShortestRemainingTime => best.get_instructions_remaining() < running.get_instructions_remaining(),
            Policy::Priority => best.get_priority() > running.get_priority(),
            Policy::EarliestDeadlineFirst => {
                best.get_deadline_remaining(current_tick) < running.get_deadline_remaining(current_tick)
            }
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Policy, SimError> {
        match s.to_ascii_uppercase().as_str() {
            "FCFS" => Ok(Policy::Fcfs),
            "RR" => Ok(Policy::RoundRobin),
            "SRT" => Ok(Policy::ShortestRemainingTime),
            "PRIO" => Ok(Policy::Priority),
            "EDF" => Ok(Policy::EarliestDeadlineFirst),
            _ => Err(SimError::Configuration(format!("unknown scheduling policy `{}`", s))),
        }
    }
}

/// Linear scan for the first element with the smallest key.
pub(crate) fn position_of_min<K: Ord>(
    queue: &VecDeque<ProcessControlBlock>,
    key: impl Fn(&ProcessControlBlock) -> K,
) -> Option<usize> {
    queue
        .iter()
        .enumerate()
        .min_by_key(|(_, pcb)| key(pcb))
        .map(|(idx, _)| idx)
}

/// Why the running process lost the CPU during step 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreemptReason {
    QuantumExpired,
    ShorterJob,
    HigherPriority,
    EarlierDeadline,
}

impl fmt::Display for PreemptReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            PreemptReason::QuantumExpired => "quantum expired",
            PreemptReason::ShorterJob => "SRT preemption, shorter job ready",
            PreemptReason::HigherPriority => "PRIO preemption, higher priority ready",
            PreemptReason::EarlierDeadline => "EDF preemption, earlier deadline ready",
        };
        f.write_str(text)
    }
}

/// Picks the next process to run and decides when the running one must yield.
pub(crate) struct ShortTermScheduler {
    policy: Policy,
    quantum: u32,
    quantum_counter: u32,
}

impl ShortTermScheduler {
    pub fn new(policy: Policy, quantum: u32) -> ShortTermScheduler {
        ShortTermScheduler {
            policy,
            quantum,
            quantum_counter: 0,
        }
    }

    pub fn get_policy(&self) -> Policy {
        self.policy
    }

    pub fn get_quantum(&self) -> u32 {
        self.quantum
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.policy = policy;
        self.quantum_counter = 0;
    }

    pub fn set_quantum(&mut self, quantum: u32) {
        self.quantum = quantum;
    }

    pub fn should_preempt(
        &self,
        running: &ProcessControlBlock,
        ready: &VecDeque<ProcessControlBlock>,
        current_tick: u64,
    ) -> Option<PreemptReason> {
        if ready.is_empty() {
            return None;
        }

        match self.policy {
            Policy::Fcfs => None,
            Policy::RoundRobin => (self.quantum_counter >= self.quantum).then_some(PreemptReason::QuantumExpired),
            Policy::ShortestRemainingTime => self
                .policy
                .is_preempted_by_ready(running, ready, current_tick)
                .then_some(PreemptReason::ShorterJob),
            Policy::Priority => self
                .policy
                .is_preempted_by_ready(running, ready, current_tick)
                .then_some(PreemptReason::HigherPriority),
            Policy::EarliestDeadlineFirst => self
                .policy
                .is_preempted_by_ready(running, ready, current_tick)
                .then_some(PreemptReason::EarlierDeadline),
        }
    }

    /// Removes the next process to run from `ready`.
    pub fn schedule_next(
        &mut self,
        ready: &mut VecDeque<ProcessControlBlock>,
        current_tick: u64,
    ) -> Option<ProcessControlBlock> {
        let idx = self.policy.select_index(ready, current_tick)?;
        let pcb = ready.remove(idx)?;
        self.quantum_counter = 0;
        Some(pcb)
    }

    /// Restarts the slice for a process that took the CPU outside `schedule_next`.
    pub fn reset_quantum(&mut self) {
        self.quantum_counter = 0;
    }

    /// Charges one tick of the current slice when running under round-robin.
    pub fn charge_quantum(&mut self) {
        if self.policy == Policy::RoundRobin {
            self.quantum_counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcb(pid: u32, instructions: u32, priority: i32, deadline: u64) -> ProcessControlBlock {
        ProcessControlBlock::new(pid, &format!("p{}", pid), instructions, priority, 0, deadline)
    }

    fn queue(pcbs: Vec<ProcessControlBlock>) -> VecDeque<ProcessControlBlock> {
        pcbs.into_iter().collect()
    }

    #[test]
    fn test_short_term_scheduler_fcfs_takes_front() {
        let mut sts = ShortTermScheduler::new(Policy::Fcfs, 3);
        let mut ready = queue(vec![pcb(1, 9, 1, 50), pcb(2, 1, 9, 5)]);

        let next = sts.schedule_next(&mut ready, 0).unwrap();
        assert_eq!(next.get_pid(), 1);
        assert_eq!(ready.len(), 1);
    }

    #[test]
    fn test_short_term_scheduler_srt_picks_fewest_remaining() {
        let mut sts = ShortTermScheduler::new(Policy::ShortestRemainingTime, 3);
        let mut ready = queue(vec![pcb(1, 9, 1, 50), pcb(2, 4, 1, 50), pcb(3, 6, 1, 50)]);

        assert_eq!(sts.schedule_next(&mut ready, 0).unwrap().get_pid(), 2);
    }

    #[test]
    fn test_short_term_scheduler_prio_ties_go_to_first_enqueued() {
        let mut sts = ShortTermScheduler::new(Policy::Priority, 3);
        let mut ready = queue(vec![pcb(1, 9, 2, 50), pcb(2, 9, 7, 50), pcb(3, 9, 7, 50)]);

        assert_eq!(sts.schedule_next(&mut ready, 0).unwrap().get_pid(), 2);
        assert_eq!(sts.schedule_next(&mut ready, 0).unwrap().get_pid(), 3);
    }

    #[test]
    fn test_short_term_scheduler_edf_picks_soonest_deadline() {
        let mut sts = ShortTermScheduler::new(Policy::EarliestDeadlineFirst, 3);
        let mut ready = queue(vec![pcb(1, 9, 1, 30), pcb(2, 9, 1, 12), pcb(3, 9, 1, 12)]);

        assert_eq!(sts.schedule_next(&mut ready, 10).unwrap().get_pid(), 2);
    }

    #[test]
    fn test_short_term_scheduler_edf_preempts_for_earlier_deadline() {
        let sts = ShortTermScheduler::new(Policy::EarliestDeadlineFirst, 3);
        let running = pcb(1, 9, 1, 10);
        let ready = queue(vec![pcb(2, 9, 1, 5), pcb(3, 9, 1, 2)]);

        assert_eq!(sts.should_preempt(&running, &ready, 0), Some(PreemptReason::EarlierDeadline));
        assert_eq!(Policy::EarliestDeadlineFirst.select_index(&ready, 0), Some(1));
    }

    #[test]
    fn test_short_term_scheduler_prio_requires_strictly_higher() {
        let sts = ShortTermScheduler::new(Policy::Priority, 3);
        let running = pcb(1, 9, 5, 10);

        assert_eq!(sts.should_preempt(&running, &queue(vec![pcb(2, 9, 5, 10)]), 0), None);
        assert_eq!(
            sts.should_preempt(&running, &queue(vec![pcb(2, 9, 6, 10)]), 0),
            Some(PreemptReason::HigherPriority)
        );
    }

    #[test]
    fn test_short_term_scheduler_srt_requires_strictly_shorter() {
        let sts = ShortTermScheduler::new(Policy::ShortestRemainingTime, 3);
        let running = pcb(1, 4, 1, 10);

        assert_eq!(sts.should_preempt(&running, &queue(vec![pcb(2, 4, 1, 10)]), 0), None);
        assert_eq!(
            sts.should_preempt(&running, &queue(vec![pcb(2, 3, 1, 10)]), 0),
            Some(PreemptReason::ShorterJob)
        );
    }

    #[test]
    fn test_short_term_scheduler_fcfs_never_preempts() {
        let sts = ShortTermScheduler::new(Policy::Fcfs, 3);
        let running = pcb(1, 100, 1, 1000);
        let ready = queue(vec![pcb(2, 1, 99, 1)]);

        assert_eq!(sts.should_preempt(&running, &ready, 0), None);
    }

    #[test]
    fn test_short_term_scheduler_rr_quantum_expiry() {
        let mut sts = ShortTermScheduler::new(Policy::RoundRobin, 2);
        let running = pcb(1, 9, 1, 50);
        let ready = queue(vec![pcb(2, 9, 1, 50)]);

        sts.charge_quantum();
        assert_eq!(sts.should_preempt(&running, &ready, 0), None);
        sts.charge_quantum();
        assert_eq!(sts.should_preempt(&running, &ready, 0), Some(PreemptReason::QuantumExpired));

        // Nothing to hand the CPU to.
        assert_eq!(sts.should_preempt(&running, &VecDeque::new(), 0), None);
    }

    #[test]
    fn test_short_term_scheduler_set_policy_resets_quantum_counter() {
        let mut sts = ShortTermScheduler::new(Policy::RoundRobin, 3);
        sts.charge_quantum();
        sts.charge_quantum();

        sts.set_policy(Policy::Priority);
        assert_eq!(sts.quantum_counter, 0);

        // Only round-robin charges the slice.
        sts.charge_quantum();
        assert_eq!(sts.quantum_counter, 0);
    }

    #[test]
    fn test_short_term_scheduler_schedule_next_empty() {
        let mut sts = ShortTermScheduler::new(Policy::EarliestDeadlineFirst, 3);
        assert!(sts.schedule_next(&mut VecDeque::new(), 0).is_none());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("rr".parse::<Policy>().unwrap(), Policy::RoundRobin);
        assert_eq!("EDF".parse::<Policy>().unwrap(), Policy::EarliestDeadlineFirst);
        assert!("lottery".parse::<Policy>().is_err());
    }
}
