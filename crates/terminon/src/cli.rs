//! Command line definitions.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "terminon")]
#[command(about = "Multi-session terminal host for local shells and SSH targets")]
#[command(version)]
pub struct Cli {
    /// Profile to open in the first tab (overrides `startup-profile`)
    #[arg(long, short)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, add or remove session profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },

    /// List or select color themes
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// List local and saved SSH profiles
    List,
    /// Save an SSH profile
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        host: String,
        /// Port (falls back to 22 if unparsable)
        #[arg(long, default_value = "22")]
        port: String,
        #[arg(long = "user", short = 'u')]
        username: String,
        /// Private key passed to `ssh -i`
        #[arg(long, short = 'i')]
        identity_file: Option<String>,
    },
    /// Delete a saved SSH profile
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// List themes, marking the selected one
    List,
    /// Select a theme by id
    Set { id: String },
}
