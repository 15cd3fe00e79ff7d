//! Upload progress bar

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ProgressBar {
    total: u64,
    current: u64,
    width: u16,
    message: String,
    started: Instant,
}

impl ProgressBar {
    pub fn new(total: u64, message: impl Into<String>) -> Self {
        Self {
            total,
            current: 0,
            width: 24,
            message: message.into(),
            started: Instant::now(),
        }
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width.max(1);
    }

    pub fn set(&mut self, value: u64) {
        self.current = value.min(self.total);
    }

    pub fn is_done(&self) -> bool {
        self.current >= self.total
    }

    pub fn eta(&self) -> Option<Duration> {
        if self.total == 0 || self.current == 0 {
            return None;
        }
        if self.current >= self.total {
            return Some(Duration::ZERO);
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }
        let rate = self.current as f64 / elapsed;
        let secs = (self.total - self.current) as f64 / rate;
        (secs.is_finite() && secs >= 0.0).then(|| Duration::from_secs_f64(secs))
    }

    pub fn render(&self, unicode: bool) -> String {
        let (filled, empty) = self.bar_segments();
        let bar = if unicode {
            format!("{}{}", "━".repeat(filled), "─".repeat(empty))
        } else {
            format!("{}{}", "=".repeat(filled), "-".repeat(empty))
        };
        let pct = if self.total == 0 {
            100
        } else {
            self.current.saturating_mul(100) / self.total
        };

        let mut out = format!(
            "{} {}  {}/{} ({}%)",
            self.message,
            bar,
            human_bytes(self.current),
            human_bytes(self.total),
            pct
        );
        if let Some(eta) = self.eta().filter(|_| !self.is_done()) {
            out.push_str(&format!("  ETA: {}", format_duration_compact(eta)));
        }
        out
    }

    fn bar_segments(&self) -> (usize, usize) {
        let width = self.width.max(1) as usize;
        if self.total == 0 {
            return (width, 0);
        }
        let ratio = self.current as f64 / self.total as f64;
        let filled = (ratio * width as f64).round().clamp(0.0, width as f64) as usize;
        (filled, width - filled)
    }
}

pub fn human_bytes(n: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = n as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", n)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

fn format_duration_compact(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    format!("{}h", mins / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_shows_sizes_and_percentage() {
        let mut bar = ProgressBar::new(2048, "tool.pkg.tar.zst");
        bar.set_width(10);
        bar.set(1024);
        let rendered = bar.render(true);
        assert!(rendered.starts_with("tool.pkg.tar.zst ━━━━━─────"));
        assert!(rendered.contains("1.0 KiB/2.0 KiB (50%)"));
    }

    #[test]
    fn ascii_bar() {
        let mut bar = ProgressBar::new(10, "x");
        bar.set_width(4);
        bar.set(10);
        assert_eq!(bar.render(false), "x ====  10 B/10 B (100%)");
    }

    #[test]
    fn progress_is_clamped_and_eta_needs_progress() {
        let mut bar = ProgressBar::new(10, "x");
        assert!(bar.eta().is_none());
        bar.set(50);
        assert!(bar.is_done());
        assert_eq!(bar.eta(), Some(Duration::ZERO));
    }

    #[test]
    fn empty_upload_renders_full() {
        let bar = ProgressBar::new(0, "x");
        assert!(bar.render(false).contains("(100%)"));
    }

    #[test]
    fn byte_units() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(64 * 1024), "64.0 KiB");
        assert_eq!(human_bytes(3 * 1024 * 1024 / 2), "1.5 MiB");
    }
}
