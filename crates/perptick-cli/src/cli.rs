//! CLI argument definitions.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `snapshot` | Fetch a merged snapshot across all venues |
//! | `arb` | Per-pair arbitrage rows from a fresh snapshot |
//! | `history` | Bucketed historical spread series for one pair |
//! | `sources` | List registered venues and interval configuration |

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use perptick_core::MetricKind;

/// Cross-exchange perp funding and price aggregator.
#[derive(Debug, Parser)]
#[command(
    name = "perptick",
    version,
    about = "Cross-exchange perpetuals funding and price aggregator"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-venue fetch deadline in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Disable the snapshot cache and force a fresh fan-out.
    #[arg(long, global = true, default_value_t = false)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a merged snapshot across all venues.
    Snapshot {
        /// Only include records for this pair.
        #[arg(long)]
        pair: Option<String>,
        /// Also persist the snapshot to this warehouse file.
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Derive per-pair arbitrage rows from a fresh snapshot.
    Arb {
        #[arg(long, value_enum, default_value_t = MetricArg::Apr)]
        metric: MetricArg,
        /// Venues to include in the strategy (default: all).
        #[arg(long, value_delimiter = ',')]
        visible: Vec<String>,
    },
    /// Bucketed historical spread series for one pair.
    History {
        pair: String,
        #[arg(long, value_enum, default_value_t = MetricArg::Apr)]
        metric: MetricArg,
        /// Window: 24H, 7D, 30D, or ALL.
        #[arg(long, default_value = "24H")]
        period: String,
        /// Warehouse file to read samples from.
        #[arg(long)]
        db: PathBuf,
    },
    /// List registered venues and funding-interval configuration.
    Sources,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Apr,
    Price,
}

impl From<MetricArg> for MetricKind {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Apr => MetricKind::Apr,
            MetricArg::Price => MetricKind::Price,
        }
    }
}

impl std::fmt::Display for MetricArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Apr => "apr",
            Self::Price => "price",
        })
    }
}
