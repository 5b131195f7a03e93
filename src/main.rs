use clap::Parser;
use openfx_deploy::{
    cli::{Cli, Commands},
    consts::DEFAULT_LOG_FILTER,
    deploy::DeployMode,
    main_actions::{self, DeployOptions},
};
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", DEFAULT_LOG_FILTER);
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_level(true)
        .with_ansi(true)
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Deploy {
            stack,
            registry,
            update,
            replace,
            verbose,
            min_replicas,
            max_replicas,
            token,
            token_file,
            on_failure,
        } => {
            main_actions::deploy(DeployOptions {
                config_file: stack.config_file,
                gateway: stack.gateway,
                registry,
                mode: DeployMode { update, replace },
                verbose,
                min_replicas,
                max_replicas,
                token,
                token_file,
                failure_policy: on_failure,
            })
            .await
        }
        Commands::Validate {
            stack,
            update,
            replace,
            min_replicas,
            max_replicas,
        } => {
            main_actions::validate(
                stack.config_file,
                stack.gateway,
                DeployMode { update, replace },
                min_replicas,
                max_replicas,
            )
            .await
        }
    };

    if let Err(error) = result {
        eprintln!("Error: {}", main_actions::error_message(&error));
        std::process::exit(1);
    }
}
