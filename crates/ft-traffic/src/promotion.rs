//! Promotion of part of the connection matrix to long-lived flows.
//!
//! In a mixed run (`SHORT_FLOW` traffic matrix) `floor(|matrix| * percent /
//! 100)` distinct connections carry a long-lived flow next to the short-flow
//! arrivals; an incast short-flow matrix promotes none.  Any other traffic
//! matrix is a long-flow-only run and promotes every connection.

use rustc_hash::FxHashSet;
use tracing::info;

use ft_core::{FlowKind, SimRng, SimTime, TrafficPattern};
use ft_fabric::AddressBook;

use crate::connection::Connection;
use crate::install::{FlowInstaller, FlowLauncher};
use crate::TrafficResult;

/// Number of connections to promote.
pub fn promotion_count(
    matrix_len: usize,
    traffic_matrix: TrafficPattern,
    short_flow_matrix: TrafficPattern,
    large_flow_percent: u32,
) -> usize {
    if traffic_matrix != TrafficPattern::ShortFlow {
        return matrix_len;
    }
    if short_flow_matrix == TrafficPattern::Incast {
        return 0;
    }
    matrix_len * large_flow_percent as usize / 100
}

/// Promote `count` distinct connections chosen uniformly at random and
/// install a long-lived flow on each.
///
/// Each flow carries `flow_bytes` (0 = unlimited), starts at 0 and stops at
/// `horizon`.  Returns the promoted matrix positions in selection order.
#[allow(clippy::too_many_arguments)]
pub fn promote_large_flows<I, A>(
    matrix: &mut [Connection],
    count: usize,
    flow_bytes: u64,
    horizon: SimTime,
    rng: &mut SimRng,
    launcher: &mut FlowLauncher,
    installer: &mut I,
    addrs: &A,
) -> TrafficResult<Vec<usize>>
where
    I: FlowInstaller,
    A: AddressBook,
{
    let count = count.min(matrix.len());
    let mut taken = FxHashSet::default();
    let mut order = Vec::with_capacity(count);

    while order.len() < count {
        let pos = rng.index(matrix.len());
        if !taken.insert(pos) {
            continue;
        }
        order.push(pos);

        let conn = &mut matrix[pos];
        conn.promote()?;
        launcher.launch(installer, addrs, conn, FlowKind::Large, flow_bytes, SimTime::ZERO, horizon)?;
    }

    info!(matrix = matrix.len(), promoted = order.len(), "large flows installed");
    Ok(order)
}
