//! Queue wait progress lines.
//!
//! Pure presentation: one line per poll attempt with elapsed time and rank
//! movement. The only retained state is the previous rank, used to show
//! directional movement between consecutive polls when both are known.

use std::time::Instant;

use queuechat_core::queue::QueueStatus;

pub struct QueueWaitDisplay {
    start: Instant,
    last_rank: Option<u64>,
}

impl QueueWaitDisplay {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_rank: None,
        }
    }

    /// Print one attempt line and remember the rank. Never fails; an
    /// unknown rank renders as `unknown`.
    pub fn emit(&mut self, status: &QueueStatus, attempt: u32, max_attempts: u32) {
        println!("{}", self.compose(status, attempt, max_attempts));
        self.last_rank = status.rank;
    }

    fn compose(&self, status: &QueueStatus, attempt: u32, max_attempts: u32) -> String {
        let elapsed = self.start.elapsed().as_secs();
        let rank = status
            .rank
            .map_or_else(|| "unknown".to_string(), |r| r.to_string());
        let movement = self.movement(status.rank);
        let ticket = status
            .ticket_id
            .as_deref()
            .map_or_else(String::new, |t| format!(", ticketId={t}"));
        format!(
            "[queue] t+{elapsed:02}s / attempt {attempt}/{max_attempts} => status={} rank={rank}{movement}{ticket}",
            status.status
        )
    }

    fn movement(&self, current: Option<u64>) -> String {
        let (Some(last), Some(current)) = (self.last_rank, current) else {
            return String::new();
        };
        if current < last {
            format!(" (moved up {})", last - current)
        } else if current > last {
            format!(" (moved back {})", current - last)
        } else {
            String::new()
        }
    }
}

impl Default for QueueWaitDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn waiting(rank: Option<u64>) -> QueueStatus {
        QueueStatus {
            status: "WAITING".to_string(),
            rank,
            ticket_id: None,
        }
    }

    #[test]
    fn rank_decrease_reports_forward_movement() {
        let mut display = QueueWaitDisplay::new();
        display.emit(&waiting(Some(10)), 1, 3);
        let line = display.compose(&waiting(Some(7)), 2, 3);
        assert!(line.contains("rank=7"), "{line}");
        assert!(line.contains("(moved up 3)"), "{line}");
    }

    #[test]
    fn rank_increase_reports_backward_movement() {
        let mut display = QueueWaitDisplay::new();
        display.emit(&waiting(Some(5)), 1, 3);
        let line = display.compose(&waiting(Some(8)), 2, 3);
        assert!(line.contains("(moved back 3)"), "{line}");
    }

    #[test]
    fn movement_needs_two_known_ranks() {
        let mut display = QueueWaitDisplay::new();
        let first = display.compose(&waiting(Some(10)), 1, 3);
        assert!(!first.contains("moved"), "{first}");

        display.emit(&waiting(Some(10)), 1, 3);
        let unknown = display.compose(&waiting(None), 2, 3);
        assert!(unknown.contains("rank=unknown"), "{unknown}");
        assert!(!unknown.contains("moved"), "{unknown}");
    }

    #[test]
    fn rank_zero_renders_as_zero_and_moves() {
        let mut display = QueueWaitDisplay::new();
        display.emit(&waiting(Some(2)), 1, 3);
        let line = display.compose(&waiting(Some(0)), 2, 3);
        assert!(line.contains("rank=0"), "{line}");
        assert!(line.contains("(moved up 2)"), "{line}");
    }

    #[test]
    fn granted_ticket_appears_in_the_line() {
        let display = QueueWaitDisplay::new();
        let status = QueueStatus {
            status: "PROMOTED".to_string(),
            rank: Some(0),
            ticket_id: Some("t-9".to_string()),
        };
        let line = display.compose(&status, 3, 3);
        assert!(line.contains("attempt 3/3"), "{line}");
        assert!(line.contains("ticketId=t-9"), "{line}");
    }
}
