use serde::{Deserialize, Serialize};

/// Elapsed time for the round in play. Timestamps are unix seconds supplied
/// by the caller's clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoundTimer {
    pub elapsed_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_since: Option<i64>,
}

impl RoundTimer {
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn start(&mut self, now: i64) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    pub fn pause(&mut self, now: i64) {
        if let Some(since) = self.running_since.take() {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(span(since, now));
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn restart(&mut self, now: i64) {
        self.reset();
        self.start(now);
    }

    pub fn elapsed(&self, now: i64) -> u64 {
        let running = self.running_since.map(|since| span(since, now)).unwrap_or(0);
        self.elapsed_seconds.saturating_add(running)
    }
}

fn span(since: i64, now: i64) -> u64 {
    u64::try_from(now.saturating_sub(since)).unwrap_or(0)
}

/// Short label stored with each round: `1h05m`, `3m07s` or `42s`.
pub fn duration_label(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h{minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m{secs:02}s")
    } else {
        format!("{secs}s")
    }
}

/// Stopwatch display, `HH:MM:SS`.
pub fn clock_label(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_accumulates_across_pauses() {
        let mut timer = RoundTimer::default();
        timer.start(100);
        timer.start(150);
        assert_eq!(timer.elapsed(130), 30);
        timer.pause(160);
        assert_eq!(timer.elapsed(10_000), 60);
        timer.start(200);
        timer.pause(205);
        assert_eq!(timer.elapsed_seconds, 65);
        assert!(!timer.is_running());
    }

    #[test]
    fn clock_going_backwards_counts_as_zero() {
        let mut timer = RoundTimer::default();
        timer.start(500);
        assert_eq!(timer.elapsed(400), 0);
    }

    #[test]
    fn duration_labels() {
        assert_eq!(duration_label(42), "42s");
        assert_eq!(duration_label(187), "3m07s");
        assert_eq!(duration_label(3900), "1h05m");
        assert_eq!(clock_label(3725), "01:02:05");
    }
}
