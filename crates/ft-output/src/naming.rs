//! Report file naming.
//!
//! `<simName>_<topology>_<totalHost>_<socket>_<trafficMatrix>_<SUFFIX>_<instance>.data`

use std::fmt;

use ft_core::{ExperimentConfig, FatTreeDims, Layer};

/// One of the five report files of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReportFile {
    Layer(Layer),
    Overall,
}

impl ReportFile {
    pub const ALL: [ReportFile; 5] = [
        ReportFile::Layer(Layer::Core),
        ReportFile::Layer(Layer::Aggr),
        ReportFile::Layer(Layer::Tor),
        ReportFile::Layer(Layer::Host),
        ReportFile::Overall,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            ReportFile::Layer(layer) => layer.file_tag(),
            ReportFile::Overall => "OVERALL",
        }
    }
}

impl fmt::Display for ReportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// File name of `file` for the run described by `config`.
pub fn report_file_name(config: &ExperimentConfig, dims: &FatTreeDims, file: ReportFile) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}_{}.data",
        config.sim_name,
        config.topology,
        dims.total_host(),
        config.socket.name(),
        config.traffic_matrix.name(),
        file.suffix(),
        config.instance,
    )
}
