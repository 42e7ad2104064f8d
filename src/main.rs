use std::process::ExitCode;

use clap::Parser;

use book_seeder::interface::cli::{self, CliArgs};

#[tokio::main]
async fn main() -> ExitCode {
    cli::init_logging();
    let args = CliArgs::parse();

    match cli::run(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Seeding failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}
