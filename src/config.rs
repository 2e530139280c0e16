use clap::Parser;
use tracing::Level;

use crate::codec::DEFAULT_MAX_LINE_LENGTH;

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Serve clients over TCP on this address instead of reading commands from stdin
    #[arg(short, long, env = "STACKDB_LISTEN")]
    pub listen: Option<String>,

    /// The longest command line accepted, in bytes
    #[arg(long, env = "STACKDB_MAX_LINE_LENGTH", default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    pub max_line_length: usize,

    /// Most verbose level written to stderr
    #[arg(long, env = "STACKDB_LOG", default_value_t = Level::WARN)]
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            log_level: Level::WARN,
        }
    }
}
