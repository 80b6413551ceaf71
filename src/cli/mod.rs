//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::OutputFormat;

/// Employee Directory - list and add employees through a GraphQL API.
#[derive(Parser, Debug)]
#[command(name = "employee-directory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format: table or json.
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// GraphQL endpoint URL (overrides config file and EMPLOYEE_API_URL).
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Use this config file instead of the default location.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and show all employees.
    List,

    /// Add one employee, then show the refreshed list.
    Add {
        /// Full name.
        #[arg(short, long)]
        name: String,

        /// Email address.
        #[arg(long)]
        email: String,

        /// Job title.
        #[arg(short, long)]
        position: String,
    },

    /// Prompt for employees to add until an empty name is entered.
    Interactive,

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,

    /// Write a default config file if none exists.
    Init,

    /// Print the config file path.
    Path,

    /// Persist a new API endpoint to the config file.
    SetEndpoint {
        /// GraphQL endpoint URL.
        url: String,
    },
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "employee-directory",
            "--endpoint",
            "http://localhost:4000/query",
            "add",
            "--name",
            "Ada",
            "--email",
            "ada@x.com",
            "--position",
            "Engineer",
        ])
        .unwrap();

        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:4000/query"));
        assert!(matches!(cli.command, Commands::Add { ref name, .. } if name == "Ada"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["employee-directory", "list", "-vv", "-f", "json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output_format(), Ok(OutputFormat::Json));
    }

    #[test]
    fn test_add_requires_all_fields() {
        assert!(Cli::try_parse_from(["employee-directory", "add", "--name", "Ada"]).is_err());
    }
}
