use std::collections::HashMap;

use proptest::prelude::*;

use super::pipeline::KernelCore;
use super::{InterruptEvent, InterruptKind, IoBehavior, Policy, ProcessControlBlock, ProcessState, Snapshot};
use crate::config::KernelConfig;

#[derive(Debug, Clone)]
struct Job {
    instructions: u32,
    priority: i32,
    arrival: u64,
    deadline: u64,
    io: Option<(u32, u32)>,
}

fn job() -> impl Strategy<Value = Job> {
    (
        1u32..8,
        0i32..10,
        0u64..12,
        1u64..30,
        proptest::option::of((1u32..6, 1u32..5)),
    )
        .prop_map(|(instructions, priority, arrival, deadline, io)| Job {
            instructions,
            priority,
            arrival,
            deadline,
            io,
        })
}

fn policy() -> impl Strategy<Value = Policy> {
    prop_oneof![
        Just(Policy::Fcfs),
        Just(Policy::RoundRobin),
        Just(Policy::ShortestRemainingTime),
        Just(Policy::Priority),
        Just(Policy::EarliestDeadlineFirst),
    ]
}

fn build(jobs: &[Job], policy: Policy, quantum: u32, ram_limit: usize) -> KernelCore {
    let mut core = KernelCore::new(&KernelConfig {
        policy,
        quantum,
        ram_limit,
    });
    for (idx, job) in jobs.iter().enumerate() {
        let mut pcb = ProcessControlBlock::new(
            idx as u32 + 1,
            &format!("job{}", idx + 1),
            job.instructions,
            job.priority,
            job.arrival,
            job.deadline,
        );
        if let Some((generation, service)) = job.io {
            pcb = pcb.with_io(IoBehavior::new(generation, service));
        }
        core.add_process(pcb);
    }
    core
}

fn user_processes(snapshot: &Snapshot) -> impl Iterator<Item = &super::ProcessSummary> {
    snapshot.all_processes().filter(|summary| !summary.is_isr)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_process_lives_in_exactly_one_place(
        jobs in proptest::collection::vec(job(), 1..10),
        policy in policy(),
        quantum in 1u32..4,
        ram_limit in 1usize..5,
        interrupt_ticks in proptest::collection::vec(0u64..40, 0..4),
    ) {
        let mut core = build(&jobs, policy, quantum, ram_limit);

        for tick in 0..60u64 {
            for _ in interrupt_ticks.iter().filter(|&&at| at == tick) {
                core.add_interrupt(InterruptEvent::new(InterruptKind::SensorData, tick));
            }
            let snapshot = core.tick();

            let mut seen: HashMap<u32, usize> = HashMap::new();
            for summary in user_processes(&snapshot) {
                *seen.entry(summary.pid).or_default() += 1;
            }
            prop_assert_eq!(seen.len(), jobs.len());
            prop_assert!(seen.values().all(|&count| count == 1));
            prop_assert!(snapshot.resident_count <= ram_limit);

            let running = snapshot.all_processes().filter(|summary| summary.state == ProcessState::Running).count();
            prop_assert!(running <= 1);
            prop_assert_eq!(running, usize::from(snapshot.running.is_some()));
        }
    }

    #[test]
    fn prop_progress_is_monotonic_and_termination_is_final(
        jobs in proptest::collection::vec(job(), 1..8),
        policy in policy(),
        quantum in 1u32..4,
        ram_limit in 1usize..5,
    ) {
        let mut core = build(&jobs, policy, quantum, ram_limit);
        let mut previous: HashMap<u32, (u32, bool, bool)> = HashMap::new();

        for _ in 0..60 {
            let snapshot = core.tick();
            for summary in user_processes(&snapshot) {
                let terminated = summary.state == ProcessState::Terminated;
                if let Some(&(remaining, was_terminated, was_missed)) = previous.get(&summary.pid) {
                    prop_assert!(summary.instructions_remaining <= remaining);
                    prop_assert!(!was_terminated || terminated);
                    prop_assert!(!was_missed || summary.missed_deadline);
                }
                previous.insert(summary.pid, (summary.instructions_remaining, terminated, summary.missed_deadline));
            }
        }
    }

    #[test]
    fn prop_terminated_deadline_flags_match_completion(
        jobs in proptest::collection::vec(job(), 1..8),
        policy in policy(),
        quantum in 1u32..4,
    ) {
        let mut core = build(&jobs, policy, quantum, 10);

        let mut snapshot = core.tick();
        for _ in 0..120 {
            snapshot = core.tick();
        }

        // Everything fits in RAM and no job can stall forever, so all finish.
        prop_assert_eq!(snapshot.terminated.len(), jobs.len());
        prop_assert_eq!(snapshot.metrics.completed_processes as usize, jobs.len());

        let mut missed = 0;
        for summary in &snapshot.terminated {
            let job = &jobs[summary.pid as usize - 1];
            // Completion is one past the last executed tick.
            let last_tick = job.arrival + summary.turnaround_time - 1;
            prop_assert_eq!(summary.missed_deadline, last_tick > job.arrival + job.deadline);
            prop_assert_eq!(summary.instructions_remaining, 0);
            if summary.missed_deadline {
                missed += 1;
            }
        }
        prop_assert_eq!(snapshot.metrics.missed_deadlines, missed);
    }
}
