use std::collections::VecDeque;

use log::Level;

use super::cpu::{Cpu, CycleOutcome};
use super::event_log::{EventLog, DEFAULT_LOG_CAPACITY};
use super::long_term_scheduler::LongTermScheduler;
use super::memory::{Memory, SwapEvent};
use super::metrics::MetricsCollector;
use super::short_term_scheduler::ShortTermScheduler;
use super::{InterruptEvent, Policy, ProcessControlBlock, ProcessQueues, ProcessState, ProcessSummary, Snapshot};

use crate::config::KernelConfig;

/// The unsynchronised kernel: every queue, the clock, and the tick pipeline.
/// `Kernel` wraps this in the lock that serialises ticks and submissions.
pub(crate) struct KernelCore {
    clock: u64,
    lts: LongTermScheduler,
    memory: Memory,
    sts: ShortTermScheduler,
    cpu: Cpu,
    queues: ProcessQueues,
    interrupts: VecDeque<InterruptEvent>,
    metrics: MetricsCollector,
    event_log: EventLog,
}

impl KernelCore {
    pub fn new(config: &KernelConfig) -> KernelCore {
        KernelCore {
            clock: 0,
            lts: LongTermScheduler::new(),
            memory: Memory::new(config.ram_limit),
            sts: ShortTermScheduler::new(config.policy, config.quantum),
            cpu: Cpu::new(),
            queues: ProcessQueues::new(),
            interrupts: VecDeque::new(),
            metrics: MetricsCollector::new(),
            event_log: EventLog::new(DEFAULT_LOG_CAPACITY),
        }
    }

    pub fn get_clock(&self) -> u64 {
        self.clock
    }

    pub fn get_instructions_executed(&self) -> u64 {
        self.cpu.get_instructions_executed()
    }

    pub fn add_process(&mut self, pcb: ProcessControlBlock) {
        let message = format!("Process {} ({}) added to NEW", pcb.get_pid(), pcb.get_name());
        self.lts.enqueue_process(pcb);
        self.event(Level::Debug, message);
    }

    pub fn add_interrupt(&mut self, event: InterruptEvent) {
        self.interrupts.push_back(event);
    }

    pub fn set_policy(&mut self, policy: Policy) {
        self.sts.set_policy(policy);
        self.event(Level::Info, format!("Policy changed to {}", policy));
    }

    pub fn set_quantum(&mut self, quantum: u32) {
        self.sts.set_quantum(quantum);
        self.event(Level::Info, format!("Quantum changed to {}", quantum));
    }

    pub fn set_ram_limit(&mut self, ram_limit: usize) {
        self.memory.set_ram_limit(ram_limit);
        self.event(Level::Info, format!("RAM limit changed to {}", ram_limit));
    }

    /// Runs the eight pipeline steps once, in their fixed order, and returns
    /// the snapshot for the tick that just ran.
    pub fn tick(&mut self) -> Snapshot {
        self.handle_interrupt();
        self.update_io();
        self.admit_new_processes();
        self.apply_medium_term_swap();
        self.schedule_or_preempt();
        let cpu_busy = self.execute_one_instruction();
        self.update_metrics(cpu_busy);

        let snapshot = self.build_snapshot();
        self.clock += 1;

        snapshot
    }

    // 1. At most one interrupt per tick displaces whatever is running.
    fn handle_interrupt(&mut self) {
        let Some(event) = self.interrupts.pop_front() else {
            return;
        };
        self.event(
            Level::Info,
            format!("Interrupt: {} (priority {})", event.get_kind(), event.get_priority()),
        );

        if let Some(mut displaced) = self.queues.running.take() {
            displaced.state = ProcessState::Ready;
            self.event(
                Level::Debug,
                format!("Process {} preempted by interrupt", displaced.get_pid()),
            );
            self.queues.ready.push_front(displaced);
        }

        let mut isr = ProcessControlBlock::new_isr(&format!("ISR_{}", event.get_kind()), self.clock);
        isr.state = ProcessState::Running;
        self.sts.reset_quantum();
        self.event(Level::Info, format!("ISR started: {}", isr.get_name()));
        self.queues.running = Some(isr);
    }

    // 2. Blocked processes wait out their I/O whether resident or swapped out.
    fn update_io(&mut self) {
        let blocked = std::mem::take(&mut self.queues.blocked);
        for mut pcb in blocked {
            if pcb.service_io() {
                pcb.state = ProcessState::Ready;
                self.event(
                    Level::Debug,
                    format!("Process {} unblocked (I/O complete)", pcb.get_pid()),
                );
                self.queues.ready.push_back(pcb);
            } else {
                self.queues.blocked.push_back(pcb);
            }
        }

        let suspended_blocked = std::mem::take(&mut self.queues.suspended_blocked);
        for mut pcb in suspended_blocked {
            if pcb.service_io() {
                pcb.state = ProcessState::SuspendedReady;
                self.event(
                    Level::Debug,
                    format!("Process {} unblocked in swap (I/O complete)", pcb.get_pid()),
                );
                self.queues.suspended_ready.push_back(pcb);
            } else {
                self.queues.suspended_blocked.push_back(pcb);
            }
        }
    }

    // 3. NEW -> READY while arrived and RAM has a free slot.
    fn admit_new_processes(&mut self) {
        let admitted = self.lts.batch_step(self.clock, &self.memory, &mut self.queues);
        for pid in admitted {
            self.event(Level::Debug, format!("Process {} admitted to READY", pid));
        }
    }

    // 4. Swap out over the limit, swap in under it.
    fn apply_medium_term_swap(&mut self) {
        for swap in self.memory.rebalance(&mut self.queues) {
            let message = match swap {
                SwapEvent::SuspendedReady(pid) => format!("Process {} suspended (RAM limit)", pid),
                SwapEvent::SuspendedBlocked(pid) => format!("Blocked process {} suspended (RAM limit)", pid),
                SwapEvent::Restored(pid) => format!("Process {} restored to RAM", pid),
            };
            self.event(Level::Debug, message);
        }
    }

    // 5. Policy preemption, then selection if the CPU is free.
    fn schedule_or_preempt(&mut self) {
        let reason = self
            .queues
            .running
            .as_ref()
            .and_then(|running| self.sts.should_preempt(running, &self.queues.ready, self.clock));

        if let Some(reason) = reason {
            if let Some(mut preempted) = self.queues.running.take() {
                preempted.state = ProcessState::Ready;
                self.event(
                    Level::Debug,
                    format!("Process {} preempted: {}", preempted.get_pid(), reason),
                );
                self.queues.ready.push_back(preempted);
                self.sts.reset_quantum();
            }
        }

        if self.queues.running.is_none() {
            if let Some(mut next) = self.sts.schedule_next(&mut self.queues.ready, self.clock) {
                next.state = ProcessState::Running;
                self.event(
                    Level::Debug,
                    format!("Process {} selected for execution", next.get_pid()),
                );
                self.queues.running = Some(next);
            }
        }

        if self.queues.running.is_some() {
            self.sts.charge_quantum();
        }
    }

    // 6. One instruction for the running process. Returns whether one ran.
    fn execute_one_instruction(&mut self) -> bool {
        let Some(mut pcb) = self.queues.running.take() else {
            return false;
        };

        let outcome = self.cpu.cycle(&mut pcb);
        match outcome {
            CycleOutcome::Blocked => {
                pcb.state = ProcessState::Blocked;
                self.event(Level::Debug, format!("Process {} blocked on I/O", pcb.get_pid()));
                self.queues.blocked.push_back(pcb);
            }
            CycleOutcome::Terminated => {
                self.check_deadline(&mut pcb);
                pcb.terminate(self.clock + 1);
                self.metrics.record_completed_process(
                    pcb.get_wait_time(),
                    pcb.get_turnaround_time(),
                    u64::from(pcb.get_total_instructions()),
                    pcb.is_missed_deadline(),
                );
                self.event(Level::Info, format!("Process {} terminated", pcb.get_pid()));
                self.queues.terminated.push_back(pcb);
            }
            CycleOutcome::Executed => {
                self.check_deadline(&mut pcb);
                self.queues.running = Some(pcb);
            }
        }

        outcome.executed_instruction()
    }

    fn check_deadline(&mut self, pcb: &mut ProcessControlBlock) {
        if pcb.has_missed_deadline(self.clock) && !pcb.is_missed_deadline() {
            pcb.mark_missed_deadline();
            self.event(Level::Warn, format!("DEADLINE MISS: process {}", pcb.get_pid()));
        }
    }

    // 7.
    fn update_metrics(&mut self, cpu_busy: bool) {
        for pcb in self.queues.ready.iter_mut() {
            pcb.increment_wait_time();
        }
        self.metrics.record_tick(cpu_busy);
    }

    // 8.
    fn build_snapshot(&self) -> Snapshot {
        let tick = self.clock;

        Snapshot {
            current_tick: tick,
            policy: self.sts.get_policy(),
            quantum: self.sts.get_quantum(),
            ram_limit: self.memory.get_ram_limit(),
            resident_count: self.queues.resident_count(),
            pending_interrupts: self.interrupts.len(),
            total_processes: self.lts.len() + self.queues.len(),
            running: self.queues.running.as_ref().map(|pcb| ProcessSummary::from_pcb(pcb, tick)),
            new: ProcessSummary::from_queue(self.lts.iter(), tick),
            ready: ProcessSummary::from_queue(&self.queues.ready, tick),
            blocked: ProcessSummary::from_queue(&self.queues.blocked, tick),
            suspended_ready: ProcessSummary::from_queue(&self.queues.suspended_ready, tick),
            suspended_blocked: ProcessSummary::from_queue(&self.queues.suspended_blocked, tick),
            terminated: ProcessSummary::from_queue(&self.queues.terminated, tick),
            logs: self.event_log.lines(),
            metrics: self.metrics.summary(),
        }
    }

    fn event(&mut self, level: Level, message: String) {
        log::log!(level, "[t={}] {}", self.clock, message);
        self.event_log.push(self.clock, &message);
    }
}
