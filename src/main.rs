use clap::Parser;
use walletwatch::cli::{
    handle_completions, handle_config_init, replay, status, watch, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Watch(args) => watch::run_watch(&args).await,
        Commands::Status(args) => status::run_status(&args).await,
        Commands::Replay(args) => replay::run_replay(&args),
        Commands::Config(command) => match command {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
