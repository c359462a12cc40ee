use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vda")]
#[command(
    version,
    about = "Visual Design Audit - Check UI captures against baselines and design rules",
    long_about = "Visual Design Audit (VDA)\n\nModes:\n- audit: compare current captures against approved baselines and evaluate design rules; failing surfaces get diff heatmaps under --artifacts-dir.\n- accept: store current captures as the approved baselines (explicit; never implied by audit).\n- baselines: list stored baselines and flag orphans no longer in the configured matrix.\n\nUse --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) declaring routes/viewports/tolerances/design checks; CLI flags override config"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit current captures against baselines and design rules
    Audit {
        #[arg(
            long,
            value_name = "DIR",
            help = "Directory holding <slug>.png + <slug>.json capture pairs (default from config)"
        )]
        captures: Option<PathBuf>,

        #[arg(
            long,
            value_name = "DIR",
            help = "Directory holding approved baseline images and metadata (default from config)"
        )]
        baseline_dir: Option<PathBuf>,

        #[arg(
            long,
            value_name = "FILE",
            help = "YAML design specification; replaces the config's design_checks for this run"
        )]
        design_spec: Option<PathBuf>,

        #[arg(
            long,
            value_name = "NAME",
            help = "Audit only this route (repeatable; default all configured routes)"
        )]
        route: Vec<String>,

        #[arg(
            long,
            value_name = "NAME",
            help = "Audit only this viewport (repeatable; default all configured viewports)"
        )]
        viewport: Vec<String>,

        #[arg(
            long,
            default_value = "0.01",
            help = "Maximum fraction of differing pixels before a surface fails (0-1)"
        )]
        max_diff_ratio: f64,

        #[arg(
            long,
            default_value = "0.2",
            help = "Per-pixel perceptual distance above which a pixel counts as different (0-1)"
        )]
        diff_threshold: f64,

        #[arg(
            long,
            value_name = "DIR",
            help = "Directory for per-surface diff heatmaps of failing surfaces; created if missing"
        )]
        artifacts_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// Accept current captures as the approved baselines
    Accept {
        #[arg(
            long,
            value_name = "DIR",
            help = "Directory holding <slug>.png + <slug>.json capture pairs (default from config)"
        )]
        captures: Option<PathBuf>,

        #[arg(
            long,
            value_name = "DIR",
            help = "Directory holding approved baseline images and metadata (default from config)"
        )]
        baseline_dir: Option<PathBuf>,

        #[arg(
            long,
            value_name = "SLUG",
            help = "Accept only this surface, e.g. home--desktop (repeatable)"
        )]
        surface: Vec<String>,

        #[arg(long, help = "Accept every surface in the configured matrix")]
        all: bool,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },

    /// List stored baselines and orphans
    Baselines {
        #[arg(
            long,
            value_name = "DIR",
            help = "Directory holding approved baseline images and metadata (default from config)"
        )]
        baseline_dir: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "json", help = "Output format")]
        format: OutputFormat,

        #[arg(long, short, help = "Output file path (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
