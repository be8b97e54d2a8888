pub mod toml_config;

pub use toml_config::{BatchConfig, FareConfig};

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "taxi-fare")]
#[command(about = "Taxi fare calculator: single quotes, tariff table and CSV batches")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Price a single ride
    Quote(QuoteArgs),
    /// Show per-kilometre rates and the minimum fare
    Tariffs {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Price every trip of a CSV file
    Batch(BatchArgs),
    /// Print a few worked examples
    Demo,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    /// Trip distance in kilometres
    #[arg(short, long, allow_negative_numbers = true)]
    pub distance: f64,

    /// Tariff: economy, comfort, comfort_plus or business
    #[arg(short, long)]
    pub tariff: String,

    /// Traffic level, 1-5
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub traffic: i64,

    /// Weather level, 1-5
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub weather: i64,

    /// Demand level, 1-5
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub demand: i64,

    /// Print the full breakdown as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// CSV file with id,distance,tariff[,traffic,weather,demand] columns
    #[arg(short, long)]
    pub input: Option<String>,

    /// Directory for fares.csv and summary.json
    #[arg(short, long)]
    pub output_path: Option<String>,

    /// Output formats to write
    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    /// Abort on the first invalid trip instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Validate the input and show what would be written
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl BatchArgs {
    /// Command-line values win over the file's `[batch]` section.
    pub fn apply_to(&self, batch: &mut BatchConfig) {
        if let Some(input) = &self.input {
            batch.input_path = Some(input.clone());
        }
        if let Some(output) = &self.output_path {
            batch.output_path = output.clone();
        }
        if !self.formats.is_empty() {
            batch.output_formats = self.formats.clone();
        }
        if self.strict {
            batch.skip_invalid = false;
        }
    }
}
