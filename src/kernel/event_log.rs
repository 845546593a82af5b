use std::collections::VecDeque;

pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Bounded ring of kernel event lines. The oldest line is dropped first.
pub(crate) struct EventLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> EventLog {
        EventLog {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, tick: u64, message: &str) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(format!("[t={}] {}", tick, message));
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_formats_tick_prefix() {
        let mut log = EventLog::new(4);
        log.push(3, "Process 1 admitted to READY");

        assert_eq!(log.lines(), vec!["[t=3] Process 1 admitted to READY".to_string()]);
    }

    #[test]
    fn test_event_log_evicts_oldest() {
        let mut log = EventLog::new(2);
        log.push(0, "a");
        log.push(1, "b");
        log.push(2, "c");

        assert_eq!(log.lines().len(), 2);
        assert_eq!(log.lines(), vec!["[t=1] b".to_string(), "[t=2] c".to_string()]);
    }

    #[test]
    fn test_event_log_zero_capacity_keeps_nothing() {
        let mut log = EventLog::new(0);
        log.push(0, "a");

        assert!(log.lines().is_empty());
    }
}
