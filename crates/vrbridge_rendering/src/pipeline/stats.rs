//! Submission statistics.

use vrbridge_core::Eye;

/// Counters accumulated since the pipeline was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Eye images accepted by the compositor, per eye.
    pub submitted: [u64; 2],
    /// Eye images the compositor rejected, per eye.
    pub dropped: [u64; 2],
    /// Late ticks where submission was skipped (disabled or no targets).
    pub skipped: u64,
    /// Times both targets were (re)allocated.
    pub reallocations: u32,
    /// Failed allocation attempts.
    pub allocation_failures: u32,
    /// Projection queries that fell back to the previous matrix.
    pub projection_failures: u64,
}

impl RenderStats {
    /// Accepted images for one eye.
    #[must_use]
    pub const fn submitted(&self, eye: Eye) -> u64 {
        self.submitted[eye.index()]
    }

    /// Rejected images for one eye.
    #[must_use]
    pub const fn dropped(&self, eye: Eye) -> u64 {
        self.dropped[eye.index()]
    }

    /// Fraction of attempted eye images that were rejected.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn drop_rate(&self) -> f32 {
        let dropped = self.dropped[0] + self.dropped[1];
        let attempted = dropped + self.submitted[0] + self.submitted[1];
        if attempted == 0 {
            0.0
        } else {
            dropped as f32 / attempted as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_rate_counts_both_eyes() {
        assert!(RenderStats::default().drop_rate().abs() < f32::EPSILON);

        let stats = RenderStats { submitted: [3, 4], dropped: [2, 1], ..RenderStats::default() };
        assert!((stats.drop_rate() - 0.3).abs() < 1e-6);
        assert_eq!(stats.dropped(Eye::Left), 2);
        assert_eq!(stats.submitted(Eye::Right), 4);
    }
}
