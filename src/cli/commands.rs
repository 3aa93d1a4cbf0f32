use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "snare", version, about = "Vulnerability benchmark harness")]
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
    /// Start the HTTP trigger surface
    Serve(ServeArgs),
    /// List the hosted case catalogue
    List(ListArgs),
    /// Fire a single case once and print the verdict
    Trigger(TriggerArgs),
    /// Validate a configuration file and case catalogue
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// YAML harness configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Listen address, overriding the configured one
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Case catalogue file (builtin catalogue when omitted)
    #[arg(long)]
    pub cases: Option<String>,
}

#[derive(Args, Clone)]
pub struct ListArgs {
    /// Case catalogue file (builtin catalogue when omitted)
    #[arg(long)]
    pub cases: Option<String>,

    /// Emit the catalogue as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct TriggerArgs {
    /// Case id to fire
    #[arg(short = 'C', long)]
    pub case: String,

    /// Attacker payload for the run
    #[arg(short, long, default_value = "")]
    pub input: String,

    /// YAML harness configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Case catalogue file (builtin catalogue when omitted)
    #[arg(long)]
    pub cases: Option<String>,

    /// Emit the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// YAML harness configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Case catalogue file (builtin catalogue when omitted)
    #[arg(long)]
    pub cases: Option<String>,
}
