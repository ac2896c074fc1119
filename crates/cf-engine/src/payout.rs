//! Cluster payout and the cascade multiplier schedule

use crate::catalog::OutcomeDefinition;
use crate::cluster::Cluster;
use crate::paytable::PayTable;

/// Multiplier for a cascade index
///
/// Index 0 uses the outcome's base multiplier; index k > 0 uses
/// `cascade_multiplier_base + k`.
pub fn applied_multiplier(outcome: &OutcomeDefinition, cascade_index: u32) -> f64 {
    if cascade_index == 0 {
        outcome.base_multiplier
    } else {
        outcome.cascade_multiplier_base + f64::from(cascade_index)
    }
}

/// Paytable sum over clusters, before any multiplier
pub fn cluster_win(clusters: &[Cluster], pay_table: &PayTable) -> f64 {
    clusters
        .iter()
        .map(|c| pay_table.pay(c.symbol, c.size))
        .sum()
}

/// Win for one cascade step
pub fn payout(
    clusters: &[Cluster],
    pay_table: &PayTable,
    cascade_index: u32,
    outcome: &OutcomeDefinition,
) -> f64 {
    cluster_win(clusters, pay_table) * applied_multiplier(outcome, cascade_index)
}
