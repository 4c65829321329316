//! Exclusion of the structurally incomplete year.

use std::collections::BTreeSet;

use tracing::info;

use crate::models::Observation;

/// Year whose source data is known to be incomplete. Always excluded.
pub const EXCLUDED_YEAR: i32 = 2018;

/// Observations left after the exclusion rule.
#[derive(Debug, Clone, Default)]
pub struct CleanedObservations {
    /// Observations with `year != EXCLUDED_YEAR`, in source order
    pub retained: Vec<Observation>,
    /// Number of rows removed
    pub excluded: usize,
    /// Every province present before exclusion
    pub provinces_seen: BTreeSet<String>,
}

/// Remove every observation from [`EXCLUDED_YEAR`].
///
/// Provinces are recorded before filtering so a province that only had
/// excluded rows can still be reported as lacking data.
pub fn exclude_incomplete_year(observations: Vec<Observation>) -> CleanedObservations {
    let mut cleaned = CleanedObservations::default();

    for obs in observations {
        cleaned.provinces_seen.insert(obs.province.clone());
        if obs.year == EXCLUDED_YEAR {
            cleaned.excluded += 1;
        } else {
            cleaned.retained.push(obs);
        }
    }

    info!(
        retained = cleaned.retained.len(),
        excluded = cleaned.excluded,
        year = EXCLUDED_YEAR,
        "applied year exclusion"
    );
    cleaned
}
