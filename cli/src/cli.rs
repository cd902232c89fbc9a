use clap::{Parser, Subcommand};

/// CLI for the improc operation registry and query language
#[derive(Debug, Parser)]
#[command(name = "improc", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse an operation query string into operations and leftover
    Parse {
        /// Query string, e.g. "resize=100,200&png&foo=bar"
        query: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether an operation/argument combination is accepted
    Validate {
        /// Operation name
        name: String,

        /// Arguments in wire form (digits, true/false, anything else)
        args: Vec<String>,

        /// Restrict the check to one engine
        #[arg(long, short = 'e')]
        engine: Option<String>,
    },

    /// List registered engines and their capabilities
    Engines {
        /// Print the matrix as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a pipeline from a query and print its ordered operations
    Plan {
        /// Query string
        query: String,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}
