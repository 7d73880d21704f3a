mod cli;

use anyhow::{Error, Result};
use clap::Parser;
use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Match(args) => match command::matching(args).await {
            Ok(Some(filename)) => println!("File saved to `{}`", filename),
            Ok(None) => println!("No overlapping records found; nothing was written"),
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        },
        Commands::Summary { input, columns } => {
            match command::summary(input, &columns.mapping()).await {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
