use crate::interface::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "go2type")]
#[command(about = "Generate TypeScript models and API bindings from annotated Go handlers")]
pub struct Go2TypeCli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Generate bindings for every package in the configuration file
    Generate {
        /// Configuration file path
        #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
        config_file: PathBuf,

        /// Verbose output
        #[arg(long, action = clap::ArgAction::SetTrue)]
        verbose: bool,

        /// Debug output
        #[arg(long, action = clap::ArgAction::SetTrue)]
        debug: bool,
    },
    /// Print the version
    Version,
}
