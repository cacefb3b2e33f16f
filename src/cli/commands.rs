use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vigil", version, about = "Security scanner for A2A agent cards and endpoints")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP REST API server
    Serve(ServeArgs),
    /// Scan an agent card by URL or local file
    Card(CardArgs),
    /// Probe a live agent endpoint
    Endpoint(EndpointArgs),
    /// Show recent scan history
    History(HistoryArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// SQLite database path
    #[arg(long, default_value = "./data/vigil.db")]
    pub db: String,

    /// YAML engine configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct CardArgs {
    /// Agent card URL
    pub url: Option<String>,

    /// Read the agent card from a local JSON file instead
    #[arg(short, long)]
    pub file: Option<String>,

    /// YAML engine configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// SQLite database path for history
    #[arg(long, default_value = "./data/vigil.db")]
    pub db: String,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct EndpointArgs {
    /// Agent endpoint base URL
    pub url: String,

    /// YAML engine configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// SQLite database path for history
    #[arg(long, default_value = "./data/vigil.db")]
    pub db: String,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct HistoryArgs {
    /// SQLite database path
    #[arg(long, default_value = "./data/vigil.db")]
    pub db: String,

    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Output raw JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}
