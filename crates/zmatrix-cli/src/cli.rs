use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "zmat - Convert molecular structures between Cartesian and Z-matrix internal coordinates, and displace them along internal coordinates.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a TOML file with engine settings in an `[engine]` table.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Engine settings that override the configuration file.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct EngineArgs {
    /// Tolerance for detecting collinear reference atoms.
    #[arg(long, global = true, value_name = "FLOAT")]
    pub linearity_tolerance: Option<f64>,

    /// Minimum angle (degrees) between a second-angle reference and the I-J axis.
    #[arg(long, global = true, value_name = "DEGREES")]
    pub min_reference_angle: Option<f64>,

    /// Displacements smaller than this are ignored.
    #[arg(long, global = true, value_name = "FLOAT")]
    pub delta_threshold: Option<f64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconstruct Cartesian coordinates for every Z-matrix in a file.
    Convert(ConvertArgs),
    /// Apply a delta Z-matrix to a base Z-matrix at one or more scale factors.
    Displace(DisplaceArgs),
    /// Compute the difference A - B of two Z-matrix files, block by block.
    Subtract(SubtractArgs),
    /// Reconstruct each Z-matrix and derive a fresh one from the result.
    Rederive(RederiveArgs),
}

/// Arguments for the `convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input Z-matrix file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output XYZ file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `displace` subcommand.
#[derive(Args, Debug)]
pub struct DisplaceArgs {
    /// Z-matrix file holding the structure to displace (first block is used).
    #[arg(value_name = "BASE")]
    pub base: PathBuf,

    /// Z-matrix file holding the displacement (first block is used).
    #[arg(value_name = "DELTA")]
    pub delta: PathBuf,

    /// Scale factor applied to the delta. Can be used multiple times.
    #[arg(
        short,
        long = "scale",
        value_name = "FLOAT",
        required = true,
        allow_negative_numbers = true
    )]
    pub scales: Vec<f64>,

    /// Output file; `.xyz` writes Cartesian structures, anything else Z-matrices.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `subtract` subcommand.
#[derive(Args, Debug)]
pub struct SubtractArgs {
    /// Minuend Z-matrix file.
    #[arg(value_name = "A")]
    pub a: PathBuf,

    /// Subtrahend Z-matrix file.
    #[arg(value_name = "B")]
    pub b: PathBuf,

    /// Output Z-matrix file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `rederive` subcommand.
#[derive(Args, Debug)]
pub struct RederiveArgs {
    /// Input Z-matrix file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Use proper torsions for every third coordinate.
    #[arg(long)]
    pub torsion_only: bool,

    /// Output Z-matrix file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}
