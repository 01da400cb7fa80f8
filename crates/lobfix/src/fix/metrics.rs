//! Accuracy-improvement ratios.
//!
//! Relative reduction in uncertainty area from combining sensors. Values are
//! returned as computed; near-degenerate geometry can leave [0, 1). A zero or
//! non-finite denominator is reported, never swallowed.

use crate::error::{LobError, LobResult};

fn ratio(numerator: f64, denominator: f64) -> LobResult<f64> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return Err(LobError::DegenerateRatio {
            numerator,
            denominator,
        });
    }
    Ok(1.0 - numerator / denominator)
}

/// `1 − cut / (lob1 + lob2 − cut)` for a two-LOB cut.
pub fn accuracy_improvement_of_cut(lob1_area: f64, lob2_area: f64, cut_area: f64) -> LobResult<f64> {
    ratio(cut_area, lob1_area + lob2_area - cut_area)
}

/// `1 − fix / (cut1 + cut2 + cut3 − 2·fix)` for a three-LOB fix.
pub fn accuracy_improvement_of_fix(fix_area: f64, cut_areas: [f64; 3]) -> LobResult<f64> {
    let [c1, c2, c3] = cut_areas;
    ratio(fix_area, c1 + c2 + c3 - 2.0 * fix_area)
}
