//! Weighted outcome selection

use crate::catalog::{GameMode, OutcomeCatalog, OutcomeDefinition};
use crate::rng::RandomSource;

/// Draw one outcome for `mode`, weighted by `probability_weight`
///
/// Outcomes of other modes are ignored unless the catalog has none for
/// `mode`, in which case the whole catalog is eligible. Consumes exactly one
/// unit draw.
pub fn select<'a, R: RandomSource + ?Sized>(
    catalog: &'a OutcomeCatalog,
    mode: GameMode,
    rng: &mut R,
) -> &'a OutcomeDefinition {
    let outcomes = catalog.outcomes();
    let eligible: Vec<&OutcomeDefinition> = if catalog.has_mode(mode) {
        outcomes.iter().filter(|o| o.mode == mode).collect()
    } else {
        outcomes.iter().collect()
    };

    let total: f64 = eligible.iter().map(|o| o.probability_weight).sum();
    let r = rng.next_unit() * total;

    let mut running = 0.0;
    for &outcome in &eligible {
        running += outcome.probability_weight;
        if running >= r {
            return outcome;
        }
    }

    // Float drift; a validated catalog is never empty
    eligible.last().copied().unwrap_or(&outcomes[0])
}
