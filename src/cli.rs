//! CLI argument parsing using clap v4

use clap::{Args, Parser, Subcommand};

/// LinkUp - mentor/mentee skill-swap matching
///
/// Registers students as mentors or mentees, scores every pairing and forms
/// small mentor-led groups.
#[derive(Parser, Debug)]
#[command(name = "linkup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the participant population comes from
#[derive(Args, Debug, Clone, Default)]
pub struct PopulationArgs {
    /// JSON population file (array of participants with a "role" field)
    #[arg(short, long)]
    pub population: Option<String>,

    /// Load the built-in sample population (3 mentors, 15 mentees)
    #[arg(short, long)]
    pub sample: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Form mentor groups from a population and print them
    Match {
        #[command(flatten)]
        source: PopulationArgs,

        /// Path to configuration file
        #[arg(short, long, env = "LINKUP_CONFIG")]
        config: Option<String>,

        /// Print groups as JSON
        #[arg(long)]
        json: bool,

        /// Show the planned groups without committing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the compatibility score of one mentee/mentor pair
    Score {
        /// Mentee email
        #[arg(long)]
        mentee: String,

        /// Mentor email
        #[arg(long)]
        mentor: String,

        #[command(flatten)]
        source: PopulationArgs,

        /// Path to configuration file
        #[arg(short, long, env = "LINKUP_CONFIG")]
        config: Option<String>,
    },

    /// Interactive registration, login and dashboards
    Console {
        #[command(flatten)]
        source: PopulationArgs,

        /// Path to configuration file
        #[arg(short, long, env = "LINKUP_CONFIG")]
        config: Option<String>,
    },

    /// Write the sample population as JSON
    Sample {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
