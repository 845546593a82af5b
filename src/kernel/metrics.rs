use serde::Serialize;

/// Running totals for deadline compliance and throughput.
#[derive(Debug, Default)]
pub(crate) struct MetricsCollector {
    completed_processes: u64,
    missed_deadlines: u64,
    total_wait_time: u64,
    total_turnaround_time: u64,
    total_cpu_time: u64,
    total_ticks: u64,
    busy_ticks: u64,
    idle_ticks: u64,
}

impl MetricsCollector {
    pub fn new() -> MetricsCollector {
        MetricsCollector::default()
    }

    pub fn record_completed_process(&mut self, wait_time: u64, turnaround_time: u64, cpu_time: u64, missed_deadline: bool) {
        self.completed_processes += 1;
        self.total_wait_time += wait_time;
        self.total_turnaround_time += turnaround_time;
        self.total_cpu_time += cpu_time;
        if missed_deadline {
            self.missed_deadlines += 1;
        }
    }

    pub fn record_tick(&mut self, cpu_busy: bool) {
        self.total_ticks += 1;
        if cpu_busy {
            self.busy_ticks += 1;
        } else {
            self.idle_ticks += 1;
        }
    }

    /// Percentage of completed processes that met their deadline.
    pub fn success_rate(&self) -> f64 {
        if self.completed_processes == 0 {
            return 0.0;
        }
        (self.completed_processes - self.missed_deadlines) as f64 * 100.0 / self.completed_processes as f64
    }

    /// Completed processes per tick.
    pub fn throughput(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.completed_processes as f64 / self.total_ticks as f64
    }

    pub fn cpu_utilization(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.busy_ticks as f64 * 100.0 / self.total_ticks as f64
    }

    pub fn average_wait_time(&self) -> f64 {
        self.per_completed(self.total_wait_time)
    }

    pub fn average_turnaround_time(&self) -> f64 {
        self.per_completed(self.total_turnaround_time)
    }

    pub fn average_cpu_time(&self) -> f64 {
        self.per_completed(self.total_cpu_time)
    }

    fn per_completed(&self, total: u64) -> f64 {
        if self.completed_processes == 0 {
            return 0.0;
        }
        total as f64 / self.completed_processes as f64
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            completed_processes: self.completed_processes,
            missed_deadlines: self.missed_deadlines,
            success_rate: self.success_rate(),
            throughput: self.throughput(),
            cpu_utilization: self.cpu_utilization(),
            average_wait_time: self.average_wait_time(),
            average_turnaround_time: self.average_turnaround_time(),
            average_cpu_time: self.average_cpu_time(),
            total_ticks: self.total_ticks,
            cpu_idle_ticks: self.idle_ticks,
        }
    }
}

/// Aggregate metrics as published in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub completed_processes: u64,
    pub missed_deadlines: u64,
    pub success_rate: f64,
    pub throughput: f64,
    pub cpu_utilization: f64,
    pub average_wait_time: f64,
    pub average_turnaround_time: f64,
    pub average_cpu_time: f64,
    pub total_ticks: u64,
    pub cpu_idle_ticks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_empty_ratios_are_zero() {
        let metrics = MetricsCollector::new();

        assert_eq!(metrics.success_rate(), 0.0);
        assert_eq!(metrics.throughput(), 0.0);
        assert_eq!(metrics.cpu_utilization(), 0.0);
        assert_eq!(metrics.average_wait_time(), 0.0);
    }

    #[test]
    fn test_metrics_success_rate_counts_missed_deadlines() {
        let mut metrics = MetricsCollector::new();
        metrics.record_completed_process(2, 10, 5, false);
        metrics.record_completed_process(4, 20, 5, true);
        metrics.record_completed_process(0, 6, 5, false);
        metrics.record_completed_process(2, 4, 5, false);

        assert_eq!(metrics.success_rate(), 75.0);
        assert_eq!(metrics.average_wait_time(), 2.0);
        assert_eq!(metrics.average_turnaround_time(), 10.0);
    }

    #[test]
    fn test_metrics_utilization_and_throughput() {
        let mut metrics = MetricsCollector::new();
        metrics.record_tick(true);
        metrics.record_tick(true);
        metrics.record_tick(true);
        metrics.record_tick(false);
        metrics.record_completed_process(0, 3, 3, false);

        assert_eq!(metrics.cpu_utilization(), 75.0);
        assert_eq!(metrics.throughput(), 0.25);

        let summary = metrics.summary();
        assert_eq!(summary.total_ticks, 4);
        assert_eq!(summary.cpu_idle_ticks, 1);
    }
}
