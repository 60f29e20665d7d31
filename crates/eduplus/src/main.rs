mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::{Context, Overrides};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let overrides = Overrides {
        config: cli.config,
        bin_dir: cli.bin_dir,
        disable: cli.disable,
        timeout: cli.timeout,
    };

    let result = Context::new(overrides).and_then(|ctx| match cli.command {
        Commands::Generate {
            text,
            output,
            barcode_type,
            width,
            height,
            base64,
        } => commands::generate::run(
            &ctx,
            commands::generate::GenerateArgs {
                text,
                output,
                barcode_type,
                width,
                height,
                base64,
            },
        ),
        Commands::Resolve { json } => commands::resolve::run(&ctx, json),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
