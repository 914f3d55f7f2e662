//! # Frame Timing
//!
//! ```text
//! Display frame N:
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. LOGIC TICK                                                │
//! │    ├─ fire due pulse releases                                │
//! │    ├─ read controller input                                  │
//! │    ├─ sample poses ──> update velocities                     │
//! │    ├─ classify gestures ──> input sink                       │
//! │    └─ synchronize camera rig ──> locomotion to input sink    │
//! │                                                              │
//! │ 2. LATE TICK                                                 │
//! │    ├─ refresh head pose                                      │
//! │    ├─ refresh projections, poll recommended size             │
//! │    └─ submit both eyes to the compositor                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

/// Timing and activity of one display frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Whole frame in microseconds.
    pub total_us: u64,
    /// Logic tick in microseconds.
    pub logic_us: u64,
    /// Late tick (including submission) in microseconds.
    pub late_us: u64,
    /// Gesture events produced this frame.
    pub gesture_events: u32,
    /// Both eyes reached the compositor.
    pub submitted: bool,
}

/// Running totals over many frames.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Frame budget in microseconds.
    pub budget_us: u64,
    /// Frames recorded.
    pub frames_recorded: u64,
    /// Sum of frame times.
    pub total_us_sum: u64,
    /// Sum of logic tick times.
    pub logic_us_sum: u64,
    /// Sum of late tick times.
    pub late_us_sum: u64,
    /// Fastest frame.
    pub min_frame_us: u64,
    /// Slowest frame.
    pub max_frame_us: u64,
    /// Frames slower than the budget.
    pub frames_over_budget: u64,
    /// Frames where both eyes were submitted.
    pub frames_submitted: u64,
    /// Gesture events over all frames.
    pub gesture_events: u64,
}

impl FrameStatsAccumulator {
    /// Creates an accumulator for the given refresh rate.
    #[must_use]
    pub fn new(refresh_hz: u32) -> Self {
        let budget = Duration::from_secs(1) / refresh_hz.max(1);
        Self {
            budget_us: u64::try_from(budget.as_micros()).unwrap_or(u64::MAX),
            frames_recorded: 0,
            total_us_sum: 0,
            logic_us_sum: 0,
            late_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
            frames_submitted: 0,
            gesture_events: 0,
        }
    }

    /// Records one frame.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum += stats.total_us;
        self.logic_us_sum += stats.logic_us;
        self.late_us_sum += stats.late_us;
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.gesture_events += u64::from(stats.gesture_events);
        if stats.submitted {
            self.frames_submitted += 1;
        }
        if stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
    }

    /// Average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Fraction of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }

    /// Prints a summary table to stdout.
    #[allow(clippy::cast_precision_loss)]
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════════════════════╗");
        println!("║                    FRAME STATISTICS SUMMARY                      ║");
        println!("╚══════════════════════════════════════════════════════════════════╝");
        println!();
        println!("┌─ TIMING ─────────────────────────────────────────────────────────┐");
        println!("│ Frames Recorded:    {}", self.frames_recorded);
        println!("│ Average Frame:      {:.3} ms", self.avg_frame_ms());
        if self.frames_recorded > 0 {
            println!("│ Min Frame:          {:.3} ms", self.min_frame_us as f64 / 1000.0);
            println!("│ Max Frame:          {:.3} ms", self.max_frame_us as f64 / 1000.0);
        }
        println!("│ Budget:             {:.3} ms", self.budget_us as f64 / 1000.0);
        println!(
            "│ Over Budget:        {} frames ({:.1}%)",
            self.frames_over_budget,
            self.over_budget_ratio() * 100.0
        );
        println!("└──────────────────────────────────────────────────────────────────┘");

        if self.frames_recorded > 0 {
            let n = self.frames_recorded as f64;
            println!();
            println!("┌─ BREAKDOWN ──────────────────────────────────────────────────────┐");
            println!("│ Logic tick:         {:.3} ms", self.logic_us_sum as f64 / n / 1000.0);
            println!("│ Late tick:          {:.3} ms", self.late_us_sum as f64 / n / 1000.0);
            println!("│ Frames submitted:   {}", self.frames_submitted);
            println!("│ Gesture events:     {}", self.gesture_events);
            println!("└──────────────────────────────────────────────────────────────────┘");
        }
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new(vrbridge_shared::constants::DISPLAY_REFRESH_HZ)
    }
}
