/// Command-line options for the trace decoder
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "gltrace")]
#[command(about = "Decode a Khronos API call trace into readable lines")]
pub struct TraceOptions {
    /// Khronos API header the enumeration names are read from
    pub header: PathBuf,

    /// Trace to decode; standard input when absent
    pub trace: Option<PathBuf>,

    /// Log map with command parameter formats and bitmask groups
    #[arg(long = "map", value_name = "LOG_MAP")]
    pub log_map: Option<PathBuf>,

    /// Disable colored command names
    #[arg(long)]
    pub no_color: bool,
}

impl TraceOptions {
    /// Whether command names are highlighted
    pub fn color(&self) -> bool {
        !self.no_color
    }
}
