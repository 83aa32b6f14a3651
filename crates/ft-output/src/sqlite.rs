//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! four tables: `link_samples`, `layer_means`, `runs` and `locality`.
//!
//! Opening a writer claims a fresh `runs.run_id`; every row the writer adds
//! carries it, so several runs can share one database.

use std::path::Path;

use rusqlite::Connection;

use ft_traffic::FlowCounters;

use crate::writer::ReportWriter;
use crate::{LayerReport, OutputResult, OverallRecord};

/// Writes reports to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    run_id:   i64,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS runs (
                 run_id         INTEGER PRIMARY KEY AUTOINCREMENT,
                 sim_name       TEXT,
                 instance       TEXT,
                 started        TEXT,
                 ended          TEXT,
                 total_host     INTEGER,
                 socket         TEXT,
                 traffic_matrix TEXT,
                 seed           INTEGER,
                 all_flows      INTEGER,
                 large_flows    INTEGER,
                 short_flows    INTEGER
             );
             CREATE TABLE IF NOT EXISTS link_samples (
                 run_id      INTEGER NOT NULL REFERENCES runs(run_id),
                 layer       TEXT    NOT NULL,
                 bucket      INTEGER NOT NULL,
                 node        INTEGER NOT NULL,
                 device      INTEGER NOT NULL,
                 utilization REAL    NOT NULL,
                 loss        REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS layer_means (
                 run_id           INTEGER NOT NULL REFERENCES runs(run_id),
                 layer            TEXT    NOT NULL,
                 mean_utilization REAL    NOT NULL,
                 mean_loss        REAL    NOT NULL,
                 PRIMARY KEY (run_id, layer)
             );
             CREATE TABLE IF NOT EXISTS locality (
                 run_id    INTEGER NOT NULL REFERENCES runs(run_id),
                 kind      TEXT    NOT NULL,
                 same_rack INTEGER NOT NULL,
                 same_pod  INTEGER NOT NULL,
                 cross_pod INTEGER NOT NULL,
                 PRIMARY KEY (run_id, kind)
             );",
        )?;

        conn.execute("INSERT INTO runs DEFAULT VALUES", [])?;
        let run_id = conn.last_insert_rowid();

        Ok(Self { conn, run_id, finished: false })
    }

    /// Key of this writer's rows.
    pub fn run_id(&self) -> i64 {
        self.run_id
    }
}

impl ReportWriter for SqliteWriter {
    fn write_layer(&mut self, report: &LayerReport) -> OutputResult<()> {
        let layer = report.layer.name();
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO link_samples \
                 (run_id, layer, bucket, node, device, utilization, loss) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in &report.rows {
                for (i, (util, loss)) in row.utilization.iter().zip(&row.loss).enumerate() {
                    let i = i as u32;
                    stmt.execute(rusqlite::params![
                        self.run_id,
                        layer,
                        row.bucket,
                        i / report.devices,
                        i % report.devices + 1,
                        util,
                        loss,
                    ])?;
                }
            }
            tx.execute(
                "INSERT OR REPLACE INTO layer_means (run_id, layer, mean_utilization, mean_loss) \
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![self.run_id, layer, report.summary.mean_utilization, report.summary.mean_loss],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn write_overall(&mut self, record: &OverallRecord<'_>) -> OutputResult<()> {
        let c = record.config;
        self.conn.execute(
            "UPDATE runs SET \
             sim_name = ?2, instance = ?3, started = ?4, ended = ?5, total_host = ?6, socket = ?7, \
             traffic_matrix = ?8, seed = ?9, all_flows = ?10, large_flows = ?11, short_flows = ?12 \
             WHERE run_id = ?1",
            rusqlite::params![
                self.run_id,
                c.sim_name,
                c.instance,
                humantime::format_rfc3339_seconds(record.started).to_string(),
                humantime::format_rfc3339_seconds(record.ended).to_string(),
                record.dims.total_host(),
                c.socket.name(),
                c.traffic_matrix.name(),
                c.seed as i64,
                record.all_flows() as i64,
                record.large_flows as i64,
                record.short_flows as i64,
            ],
        )?;
        Ok(())
    }

    fn write_locality(&mut self, counters: &FlowCounters) -> OutputResult<()> {
        for (kind, row) in [("Large", counters.large()), ("Short", counters.short()), ("All", counters.all())] {
            self.conn.execute(
                "INSERT OR REPLACE INTO locality (run_id, kind, same_rack, same_pod, cross_pod) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![self.run_id, kind, row[0] as i64, row[1] as i64, row[2] as i64],
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
