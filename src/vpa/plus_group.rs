//! Plus-group resolution for non-terminal years.
//!
//! The oldest age class aggregates every fish at or above that age, so next
//! year's plus group is fed by two cohorts: this year's plus group and this
//! year's second-oldest age. Their contributions cannot be separated from
//! stock numbers alone; the convention used here gives each class its catch
//! share of the back-calculated abundance, survivors and catch term alike.
//!
//! For plus group `p` in year `y`, with `S = N_{p,y+1}`:
//!
//! - `N_{p,y}   = C_p / (C_p + C_{p−1}) · (S e^{M_p} + C_p e^{M_p/2})`
//! - `N_{p−1,y} = C_{p−1} / (C_p + C_{p−1}) · (S e^{M_{p−1}} + C_{p−1} e^{M_{p−1}/2})`
//!
//! After the split, the plus group's F is set equal to the second-oldest
//! age's F; it is not estimated independently.
use crate::vpa::pope::cohort_back_step;

/// Stock numbers of the two oldest age classes for one year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlusGroupSplit {
    pub plus: f64,
    pub second_oldest: f64,
    /// True when both catches were zero and survivors were split evenly.
    pub even_split: bool,
}

/// Split next year's plus group back over this year's two oldest ages.
///
/// Parameters
/// ----------
/// - `next_plus`: plus-group stock numbers in year `y + 1`.
/// - `catch_plus`, `catch_second`: catches of the plus group and the
///   second-oldest age in year `y`.
/// - `m_plus`, `m_second`: natural mortality of the two classes.
///
/// When both catches are zero the catch proportions are undefined and the
/// survivors are split evenly; `even_split` is set so callers can report it.
pub fn resolve_plus_group(
    next_plus: f64, catch_plus: f64, catch_second: f64, m_plus: f64, m_second: f64,
) -> PlusGroupSplit {
    let total_catch = catch_plus + catch_second;
    let (share_plus, share_second, even_split) = if total_catch > 0.0 {
        (catch_plus / total_catch, catch_second / total_catch, false)
    } else {
        (0.5, 0.5, true)
    };
    PlusGroupSplit {
        plus: share_plus * cohort_back_step(next_plus, catch_plus, m_plus),
        second_oldest: share_second * cohort_back_step(next_plus, catch_second, m_second),
        even_split,
    }
}
