use clap::Parser;
use passvault::cli::{commands, output, store_path, Cli, Commands};
use passvault::errors::PassVaultError;
use passvault::logging;

fn main() {
    let cli = Cli::parse();

    // Only log into a store that exists (or is being created).
    let log_guard = match store_path(&cli) {
        Ok(root) if root.is_dir() || matches!(cli.command, Commands::Init) => {
            match logging::init(&root) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    output::warning(&format!("logging disabled: {e}"));
                    None
                }
            }
        }
        _ => None,
    };

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli),
        Commands::Master { yes } => commands::master::execute(&cli, yes),
        Commands::Ls { ref filter, all } => commands::ls::execute(&cli, filter.as_deref(), all),
        Commands::Add {
            ref account,
            ref input,
            ref clip,
        } => commands::add::execute(&cli, account, input, clip),
        Commands::Edit {
            ref filter,
            ref input,
            ref clip,
        } => commands::edit::execute(&cli, filter.as_deref(), input, clip),
        Commands::Copy {
            ref filter,
            ref clip,
        } => commands::copy::execute(&cli, filter.as_deref(), clip),
        Commands::Print { ref filter } => commands::print::execute(&cli, filter.as_deref()),
        Commands::Mv { ref filter, ref to } => commands::mv::execute(&cli, filter, to),
        Commands::Rm { ref filter, yes } => commands::rm::execute(&cli, filter.as_deref(), yes),
        Commands::Load { ref file } => commands::load::execute(&cli, file),
        Commands::Generate { length, no_symbols } => {
            commands::generate::execute(&cli, length, no_symbols)
        }
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    match result {
        Ok(()) => {}
        Err(PassVaultError::Cancelled) => output::info("Cancelled."),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            output::error(&e.to_string());
            let code = if e.is_domain() { 1 } else { 2 };
            drop(log_guard);
            std::process::exit(code);
        }
    }
}
