use clap::{Args, Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::io;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "redmine-mcp")]
#[command(version)]
#[command(about = "An MCP server exposing the Redmine REST API as tools")]
#[command(long_about = "
redmine-mcp is an MCP (Model Context Protocol) server that lets an AI
assistant work with a Redmine issue tracker: issues, projects, users,
time entries, wiki pages and more, each exposed as a tool.

Connection settings are read from the environment or a .env file:
  REDMINE_BASE_URL    Base URL of the tracker, e.g. https://redmine.example.com
  REDMINE_API_KEY     API key of the account the tools act as
  REDMINE_TLS_VERIFY  Set to false to accept self-signed certificates

Example usage:
  redmine-mcp serve                 # Run as MCP server over stdio
  redmine-mcp tools                 # List the available tools
  redmine-mcp completion bash > ~/.bashrc.d/redmine-mcp  # Generate bash completions
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Connection overrides for the `serve` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Base URL of the tracker, overriding REDMINE_BASE_URL
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// API key, overriding REDMINE_API_KEY
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Accept invalid TLS certificates, overriding REDMINE_TLS_VERIFY
    #[arg(long)]
    pub insecure: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs redmine-mcp as an MCP server on stdin/stdout. The server will:

- Read connection settings from the environment, a .env file, or flags
- Refuse to start when the base URL or API key is missing or malformed
- Expose every tracker operation as a tool with a JSON Schema input contract

Logs are written to ~/.redmine-mcp/mcp.log while serving, since stdout
carries the protocol.

Example:
  redmine-mcp serve
  redmine-mcp serve --url https://redmine.example.com --api-key abc123
")]
    Serve {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
    /// List the tools the server offers
    #[command(long_about = "
Lists every registered tool with its description and required arguments.
No connection to the tracker is made.

Output formats:
  table  - Formatted table (default)
  json   - JSON including each tool's input schema

Examples:
  redmine-mcp tools
  redmine-mcp tools --format json
")]
    Tools {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Generate shell completion scripts
    #[command(long_about = "
Generates shell completion scripts for various shells.

Examples:
  redmine-mcp completion bash > ~/.bashrc.d/redmine-mcp
  redmine-mcp completion zsh > ~/.zfunc/_redmine-mcp
  redmine-mcp completion fish > ~/.config/fish/completions/redmine-mcp.fish
")]
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    pub fn is_tty() -> bool {
        io::stdout().is_terminal()
    }

    pub fn should_use_color() -> bool {
        Self::is_tty() && std::env::var("NO_COLOR").is_err()
    }
}
