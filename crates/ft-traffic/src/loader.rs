//! CSV connection-matrix loader.
//!
//! # CSV format
//!
//! One row per connection; host indices are zero-based and pod-major.
//!
//! ```csv
//! source,destination
//! 0,5
//! 1,12
//! 2,0
//! ```
//!
//! Every row becomes a short connection; promotion to long-lived flows
//! happens afterwards.  A row referencing a host at or beyond `total_host`
//! is rejected.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use ft_core::HostIndex;

use crate::connection::Connection;
use crate::{TrafficError, TrafficResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ConnectionRecord {
    source:      u32,
    destination: u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a connection matrix from a CSV file.
pub fn load_connections_csv(path: &Path, total_host: u32) -> TrafficResult<Vec<Connection>> {
    let file = std::fs::File::open(path).map_err(TrafficError::Io)?;
    load_connections_reader(file, total_host)
}

/// Like [`load_connections_csv`] but accepts any `Read` source.
pub fn load_connections_reader<R: Read>(reader: R, total_host: u32) -> TrafficResult<Vec<Connection>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut out = Vec::new();

    for (index, result) in csv_reader.deserialize::<ConnectionRecord>().enumerate() {
        let row = result.map_err(|e| TrafficError::Parse(e.to_string()))?;
        for host in [row.source, row.destination] {
            if host >= total_host {
                return Err(TrafficError::HostOutOfRange { index, host: HostIndex(host), total: total_host });
            }
        }
        out.push(Connection::new(HostIndex(row.source), HostIndex(row.destination)));
    }

    Ok(out)
}
