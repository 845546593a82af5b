use std::collections::VecDeque;
use std::fmt::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::*;

use crate::config::RunConfig;
use crate::error::SimError;
use crate::io::{core_dump, ScriptedInterrupt, Workload};

/// Runs one workload against a kernel: submits its processes, feeds
/// scripted and background interrupts, ticks, and reports.
pub struct Driver {
    kernel: Arc<Kernel>,
    run: RunConfig,
    scripted: VecDeque<ScriptedInterrupt>,
    source: Option<InterruptSource>,
    process_count: usize,
}

impl Driver {
    pub fn new(workload: &Workload) -> Result<Driver, SimError> {
        let kernel = Arc::new(Kernel::new(&workload.kernel)?);

        let pcbs = workload.build_processes()?;
        let process_count = pcbs.len();
        for pcb in pcbs {
            kernel.add_process(pcb);
        }

        let source = if workload.interrupts.enabled {
            Some(InterruptSource::new(Arc::clone(&kernel), workload.interrupts.clone())?)
        } else {
            None
        };

        Ok(Driver {
            kernel,
            run: workload.run.clone(),
            scripted: workload.scripted_interrupts().into(),
            source,
            process_count,
        })
    }

    pub fn get_kernel(&self) -> Arc<Kernel> {
        Arc::clone(&self.kernel)
    }

    /// Ticks until the tick budget is spent or, with `stop_when_idle`,
    /// until there is nothing left to do. Returns the last snapshot.
    pub fn run(&mut self) -> Arc<Snapshot> {
        if let Some(source) = self.source.as_mut() {
            source.start();
        }

        let mut snapshot = self.kernel.get_snapshot();
        for _ in 0..self.run.ticks {
            self.inject_scripted_interrupts();
            snapshot = self.kernel.tick();

            if self.run.stop_when_idle && self.is_idle(&snapshot) {
                log::info!("All processes finished at tick {}", snapshot.current_tick);
                break;
            }
            if self.run.tick_interval_ms > 0 {
                thread::sleep(Duration::from_millis(self.run.tick_interval_ms));
            }
        }

        if let Some(source) = self.source.as_mut() {
            source.stop();
        }

        snapshot
    }

    /// Runs the workload, prints the per-process report and writes the core
    /// dump if one was configured.
    pub fn start(&mut self) -> Result<Arc<Snapshot>, SimError> {
        log::info!(
            "Starting the driver: {} processes, policy {}",
            self.process_count,
            self.kernel.get_snapshot().policy
        );

        let snapshot = self.run();
        print!("{}", report(&snapshot));

        if let Some(path) = &self.run.snapshot_path {
            core_dump::write_snapshot(path, &snapshot)?;
        }

        Ok(snapshot)
    }

    fn inject_scripted_interrupts(&mut self) {
        let current_tick = self.kernel.current_tick();
        while self
            .scripted
            .front()
            .is_some_and(|interrupt| interrupt.at_tick <= current_tick)
        {
            if let Some(interrupt) = self.scripted.pop_front() {
                self.kernel.add_interrupt(interrupt.to_event());
            }
        }
    }

    fn is_idle(&self, snapshot: &Snapshot) -> bool {
        let finished = snapshot.terminated.iter().filter(|summary| !summary.is_isr).count();

        finished == self.process_count
            && snapshot.running.is_none()
            && snapshot.pending_interrupts == 0
            && self.scripted.is_empty()
    }
}

/// Per-process table followed by the aggregate metrics.
pub fn report(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Stats for executed processes ({} scheduling, {} ticks):",
        snapshot.policy,
        snapshot.current_tick + 1
    );
    let _ = writeln!(out, "...  PID | Name                 | Priority | Turnaround | Wait  | Missed");
    let _ = writeln!(out, "...------|----------------------|----------|------------|-------|-------");
    for summary in snapshot.terminated.iter().filter(|summary| !summary.is_isr) {
        let _ = writeln!(
            out,
            "... {:04} | {:<20} | {:>8} | {:>10} | {:>5} | {}",
            summary.pid,
            summary.name,
            summary.priority,
            summary.turnaround_time,
            summary.wait_time,
            if summary.missed_deadline { "yes" } else { "no" }
        );
    }

    let metrics = &snapshot.metrics;
    let _ = writeln!(out, "Completed processes:     {}", metrics.completed_processes);
    let _ = writeln!(out, "Missed deadlines:        {}", metrics.missed_deadlines);
    let _ = writeln!(out, "Success rate:            {:.2}%", metrics.success_rate);
    let _ = writeln!(out, "Throughput:              {:.3} processes/tick", metrics.throughput);
    let _ = writeln!(out, "CPU utilization:         {:.2}%", metrics.cpu_utilization);
    let _ = writeln!(out, "Average wait time:       {:.2} ticks", metrics.average_wait_time);
    let _ = writeln!(out, "Average turnaround time: {:.2} ticks", metrics.average_turnaround_time);
    let _ = writeln!(out, "Average CPU time:        {:.2} ticks", metrics.average_cpu_time);

    let unfinished = snapshot.all_processes().filter(|summary| summary.state != ProcessState::Terminated).count();
    if unfinished > 0 {
        let _ = writeln!(out, "Unfinished processes:    {}", unfinished);
    }

    out
}
