// themekit CLI entry point

use anyhow::Context;
use clap::Parser;
use themekit::{
    cli::{self, Cli},
    http::shared_client,
    logging, ThemesModule,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let config = cli.config_manager();
    let client = shared_client(cli.http_config()).context("building HTTP client")?;

    let module = match ThemesModule::setup(&config, client).await {
        Ok(module) => module,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    let output = cli::execute(&cli.command, &module).await?;
    print!("{}", output);
    Ok(())
}
