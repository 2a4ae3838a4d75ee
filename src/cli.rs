use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use closet::types::PricingOption;

/// Browse the content catalog from the terminal
#[derive(Parser)]
#[command(name = "closet")]
#[command(about = "Filter, search, sort and page through the content catalog", long_about = None)]
pub struct Cli {
    /// Config file (defaults to closet.toml in the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the catalog endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// More log output (repeat for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the catalog and print matching items
    Browse {
        /// Starting filter state as a query string, e.g. `pricing=paid&sort=lowerPrice`
        #[arg(short, long, default_value = "")]
        query: String,
        /// Toggle a pricing option (paid, free, viewOnly); repeatable
        #[arg(long, value_name = "OPTION")]
        pricing: Vec<PricingOption>,
        /// Match title or creator, case-insensitive
        #[arg(short, long)]
        keyword: Option<String>,
        /// itemName, higherPrice or lowerPrice
        #[arg(short, long)]
        sort: Option<String>,
        /// Lower price bound for paid items
        #[arg(long)]
        min: Option<i64>,
        /// Upper price bound for paid items
        #[arg(long)]
        max: Option<i64>,
        /// How many pages to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Keep loading until the last page
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,
        /// Print JSON instead of a listing
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Apply a filter change to a query string and print the result
    Params {
        /// Current query string
        #[arg(short, long, default_value = "")]
        query: String,
        #[command(subcommand)]
        action: ParamsAction,
    },
    /// Manage the stored bearer token
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
pub enum ParamsAction {
    /// Print the decoded parameters
    Show,
    /// Add or remove a pricing option
    Toggle { option: PricingOption },
    /// Set the keyword; omit to clear it
    Keyword { value: Option<String> },
    /// Set the sort key
    Sort { key: String },
    /// Set the price range
    Range { min: i64, max: i64 },
    /// Clear every filter
    Reset,
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Store a token
    Set { token: String },
    /// Forget the stored token
    Clear,
    /// Say whether a token is stored
    Show,
}
