use std::path::PathBuf;

use crate::{
    consts::{DEFAULT_MAX_REPLICAS, DEFAULT_MIN_REPLICAS, GATEWAY_ENV_VAR, TOKEN_ENV_VAR},
    deploy::FailurePolicy,
};
use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pushes the function images and deploys the functions described in a stack file
    #[clap(visible_alias = "d")]
    Deploy {
        #[command(flatten)]
        stack: StackArgs,
        /// Docker private registry url, overrides the registry of every function
        #[clap(long)]
        registry: Option<String>,
        /// Perform rolling update on existing function(s)
        #[clap(long, action = ArgAction::Set, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
        update: bool,
        /// Remove and re-create existing function(s)
        #[clap(long, action = ArgAction::Set, default_value_t = false, num_args = 0..=1, default_missing_value = "true")]
        replace: bool,
        /// Print the image push log
        #[clap(short, long)]
        verbose: bool,
        /// Minimum replicas for every function
        #[clap(long = "min", default_value_t = DEFAULT_MIN_REPLICAS)]
        min_replicas: u32,
        /// Maximum replicas for every function
        #[clap(long = "max", default_value_t = DEFAULT_MAX_REPLICAS)]
        max_replicas: u32,
        /// Access token for the gateway
        #[clap(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
        token: Option<String>,
        /// The path to a file containing the access token
        /// If this is set, the token argument is ignored
        #[clap(long)]
        token_file: Option<PathBuf>,
        /// What to do with the remaining functions when one fails
        #[clap(long, value_enum, default_value_t = FailurePolicy::default())]
        on_failure: FailurePolicy,
    },
    /// Checks a stack file and the deploy options without pushing or deploying anything
    #[clap(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        stack: StackArgs,
        /// Perform rolling update on existing function(s)
        #[clap(long, action = ArgAction::Set, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
        update: bool,
        /// Remove and re-create existing function(s)
        #[clap(long, action = ArgAction::Set, default_value_t = false, num_args = 0..=1, default_missing_value = "true")]
        replace: bool,
        #[clap(long = "min", default_value_t = DEFAULT_MIN_REPLICAS)]
        min_replicas: u32,
        #[clap(long = "max", default_value_t = DEFAULT_MAX_REPLICAS)]
        max_replicas: u32,
    },
}

#[derive(Args, Debug)]
pub struct StackArgs {
    /// Path to YAML config file describing function(s)
    #[clap(short = 'f', long = "config")]
    pub config_file: PathBuf,
    /// Address of the gateway, overrides the one in the config file
    #[clap(short, long, env = GATEWAY_ENV_VAR)]
    pub gateway: Option<String>,
}
