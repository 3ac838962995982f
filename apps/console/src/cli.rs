//! Command-line surface.
//!
//! This module defines the argument grammar only; execution lives in
//! [`crate::commands`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "console", version, about = "Cloud admin console from the terminal")]
pub struct Cli {
    /// Directory holding client.toml, credentials and logs
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Override the API base url for this invocation
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and store the session token
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage compute instances
    #[command(subcommand)]
    Instances(InstanceCommand),

    /// Manage storage volumes
    #[command(subcommand)]
    Volumes(VolumeCommand),

    /// Upload a file as multipart form data
    Upload {
        path: PathBuf,
        /// Endpoint to post to
        #[arg(long, default_value = "/upload")]
        url: String,
        /// Extra form field, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Download a file into the download directory
    Download {
        url: String,
        /// File name to save as
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum InstanceCommand {
    List(ListArgs),
    Start { id: String },
    Stop { id: String },
    Reboot { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum VolumeCommand {
    List(ListArgs),
    Attach {
        id: String,
        /// Instance to attach to
        #[arg(long)]
        instance: String,
    },
    Detach { id: String },
    Delete { id: String },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = 10)]
    pub page_size: u32,
    #[arg(long)]
    pub keyword: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub region: Option<String>,
}

/// `key=value` into a pair.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
