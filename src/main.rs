use clap::Parser;
use store_locator_etl::utils::logger;
use store_locator_etl::CliConfig;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose, config.log_format);

    tracing::info!("Starting store-locator-etl");
    tracing::debug!("CLI config: {:?}", config);

    let dry_run = config.dry_run;
    let exit_code = store_locator_etl::app::execute(config, dry_run).await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}
