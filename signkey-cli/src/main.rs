//! Generation, use and export of signature key pairs.

use std::process::ExitCode;

use clap::Parser;
use signkey::{KeyPair, SoftwareEngine, text};
use signkey_cli::{
    cli::{Cli, Command},
    config::Config,
    logging::setup_logging,
    output::{render_keys, render_roundtrip},
};

/// An error that may occur when running `signkey`.
#[derive(Debug, thiserror::Error)]
enum Error {
    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] signkey_cli::config::Error),

    /// A key pair error.
    #[error("Key pair error: {0}")]
    KeyPair(#[from] signkey::Error),

    /// An I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs `command` using `config` as base.
async fn run(command: Command, config: Config) -> Result<(), Error> {
    match command {
        Command::Generate(command) => {
            let setup = command.key_pair.apply(&config.key_pair);
            let key_pair = KeyPair::generate(SoftwareEngine::default(), &setup).await?;
            let keys = key_pair
                .export(command.format.unwrap_or(config.export_format))
                .await?;

            println!("{}", render_keys(&keys));
        }
        Command::Roundtrip(command) => {
            let setup = command.key_pair.apply(&config.key_pair);
            let key_pair = KeyPair::generate(SoftwareEngine::default(), &setup).await?;

            let signature = key_pair.sign(&command.message).await?;
            let verified = key_pair.verify(&command.message, &signature).await?;
            let pem = key_pair.export_pem().await?;

            println!(
                "{}",
                render_roundtrip(&text::encode(&signature)?, verified, pem.public_key())
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(error) = setup_logging(cli.verbosity) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    let result = Config::load(cli.config.as_deref())
        .map_err(Error::from)
        .and_then(|config| {
            tokio::runtime::Builder::new_current_thread()
                .build()?
                .block_on(run(cli.command, config))
        });

    if let Err(error) = result {
        log::error!(error:err; "Running signkey failed: {error}");
        eprintln!("{error}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
