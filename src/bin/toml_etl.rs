use clap::Parser;
use store_locator_etl::config::toml_config::TomlConfig;
use store_locator_etl::core::ConfigProvider;
use store_locator_etl::utils::logger::{self, LogFormat};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Store locator export driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "store-locator.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Override the output path from the config
    #[arg(long)]
    output_path: Option<String>,

    /// Dry run - fetch and decode without writing the output file
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose, args.log_format);

    tracing::info!("🚀 Starting TOML-based store locator export");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    if let Some(output_path) = args.output_path {
        tracing::info!("🔧 Output path overridden to: {}", output_path);
        config.load.output_path = output_path;
    }

    display_config_summary(&config, args.dry_run);

    let exit_code = store_locator_etl::app::execute(config, args.dry_run).await;
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn display_config_summary(config: &TomlConfig, dry_run: bool) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.name());
    println!("  Stores: {}", config.stores_endpoint());
    println!("  Attributes: {}", config.attributes_endpoint());
    println!("  Output: {}", config.output_path());
    match config.selection_rule() {
        Some(rule) => println!("  Filter: {:?}", rule),
        None => println!("  Filter: SC services pattern"),
    }

    let options = config.request_options();
    println!(
        "  Timeout: {:?}, Retries: {} (delay {:?})",
        options.timeout, options.retry_attempts, options.retry_delay
    );

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
