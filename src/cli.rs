use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
    pub verbose: bool,  // global --verbose
}

#[derive(Parser)]
#[command(name = "lotscout")]
#[command(
    about = "Rank wholesale auction listings for a buyer's budget, usage and brand preference"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Log pipeline decisions to stderr (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn context(&self) -> AppContext {
        AppContext {
            quiet: self.quiet,
            no_color: self.no_color,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend up to three listings for a budget and usage
    Recommend(RecommendArgs),

    /// Find the inventory record that best matches free text
    Match(MatchArgs),

    /// Compare a seller's asking price against the matched cost floor
    Appraise(AppraiseArgs),

    /// Show the brand each model name classifies to
    Classify(ClassifyArgs),

    /// Initialize a lotscout.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Table,
}

#[derive(Debug, Clone, Args)]
pub struct InventoryArgs {
    /// Inventory CSV (defaults to inventory.path from config)
    #[arg(short, long, value_name = "CSV")]
    pub inventory: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct RecommendArgs {
    /// Budget ceiling in 萬 (10,000-unit blocks)
    #[arg(short, long)]
    pub budget: f64,

    /// Usage category (fuel-economy, family-space, business, prestige, driving-enjoyment, learner)
    #[arg(short, long)]
    pub usage: String,

    /// Preferred brand, or `none`
    #[arg(long, default_value = "none")]
    pub brand: String,

    #[command(flatten)]
    pub inventory: InventoryArgs,

    /// Only admit positively scored listings
    #[arg(long)]
    pub strict: bool,

    /// Lower edge of the budget window as a fraction of the budget
    #[arg(long, value_name = "RATIO")]
    pub floor_ratio: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct MatchArgs {
    /// Free text containing a model name (e.g. "2012 BMW 320i")
    #[arg(required = true)]
    pub text: Vec<String>,

    #[command(flatten)]
    pub inventory: InventoryArgs,

    /// List every record with at least one token hit
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct AppraiseArgs {
    /// Free text naming the car being offered
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Seller's asking price in 萬
    #[arg(short, long)]
    pub price: f64,

    #[command(flatten)]
    pub inventory: InventoryArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct ClassifyArgs {
    /// Model names to classify
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,

    /// Also write the built-in scoring weights to policy.toml
    #[arg(long)]
    pub with_policy: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
