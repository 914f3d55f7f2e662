//! Projection matrix conversion.
//!
//! The runtime reports row-major `m[row][col]`; the engine stores
//! column-major `cols[col][row]`. Converting is a transpose of storage, so
//! every element keeps its exact bit pattern.

use vrbridge_core::HmdMatrix44;
use vrbridge_shared::Mat4;

use crate::config::RenderConfig;

/// Runtime projection to engine matrix.
#[must_use]
pub fn to_engine(m: &HmdMatrix44) -> Mat4 {
    let mut cols = [[0.0_f32; 4]; 4];
    for (r, row) in m.m.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            cols[c][r] = *value;
        }
    }
    Mat4 { cols }
}

/// Engine matrix back to runtime layout.
#[must_use]
pub fn to_runtime(m: &Mat4) -> HmdMatrix44 {
    let mut out = [[0.0_f32; 4]; 4];
    for (c, col) in m.cols.iter().enumerate() {
        for (r, value) in col.iter().enumerate() {
            out[r][c] = *value;
        }
    }
    HmdMatrix44 { m: out }
}

/// Symmetric projection used until the runtime answers.
#[must_use]
pub fn fallback_projection(config: &RenderConfig) -> Mat4 {
    Mat4::perspective_lh(
        config.field_of_view_deg.to_radians(),
        1.0,
        config.near_clip_m,
        config.far_clip_m,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(m: &HmdMatrix44) -> [[u32; 4]; 4] {
        m.m.map(|row| row.map(f32::to_bits))
    }

    #[test]
    fn test_round_trip_is_bit_exact() {
        let awkward = HmdMatrix44 {
            m: [
                [0.757_894_7, -0.0, f32::MIN_POSITIVE / 4.0, 1.0e-38],
                [f32::NAN, 0.682_379_9, -0.056_123_4, f32::INFINITY],
                [0.0, 0.1, -1.000_010_1, -0.010_000_1],
                [f32::MAX, -f32::MIN_POSITIVE, -1.0, 3.0],
            ],
        };
        let back = to_runtime(&to_engine(&awkward));
        assert_eq!(bits(&back), bits(&awkward));
    }

    #[test]
    fn test_each_element_lands_in_its_slot() {
        let mut m = HmdMatrix44 { m: [[0.0; 4]; 4] };
        for r in 0..4 {
            for c in 0..4 {
                m.m[r][c] = (r * 4 + c) as f32;
            }
        }
        let engine = to_engine(&m);
        for r in 0..4 {
            for c in 0..4 {
                assert_eq!(engine.get(r, c).to_bits(), m.m[r][c].to_bits());
            }
        }
    }

    #[test]
    fn test_fallback_maps_near_to_zero_depth() {
        let config = RenderConfig::default();
        let p = fallback_projection(&config);
        // z' / w for a point on the near plane
        let z = config.near_clip_m;
        let depth = (p.get(2, 2) * z + p.get(2, 3)) / (p.get(3, 2) * z);
        assert!(depth.abs() < 1e-5);
    }
}
