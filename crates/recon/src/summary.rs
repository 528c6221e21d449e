use crate::model::{Reconciliation, ReconSummary};

/// Compute summary statistics from one reconciliation pass.
pub fn compute_summary(performances: usize, r: &Reconciliation) -> ReconSummary {
    ReconSummary {
        performances,
        unique_composers: r.unique_composers.len(),
        matched: r.matched.len(),
        unmatched: r.unmatched.len(),
        ambiguous: r.ambiguous.len(),
        countries: r.country_counts.len(),
        located: r.locations.len(),
        unlocated: r.unlocated.len(),
        problematic: r.problematic.len(),
    }
}
