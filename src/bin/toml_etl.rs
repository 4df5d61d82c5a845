use clap::Parser;
use order_etl::config::toml_config::TomlConfig;
use order_etl::utils::error::EtlError;
use order_etl::utils::{logger, validation::Validate};
use order_etl::{EtlEngine, LocalStorage, OrderPipeline};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Order extraction driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "order-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override strict mode from config
    #[arg(long)]
    strict: Option<bool>,

    /// Dry run - extract and print the record without writing it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 先載入配置，日誌格式由配置決定
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(if args.verbose {
            "debug"
        } else {
            config.log_level().unwrap_or("info")
        });
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));
    }

    tracing::info!("🚀 Starting TOML-based order extraction");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Some(strict) = args.strict {
        config.transform.strict = strict;
        tracing::info!("🔧 Strict mode overridden to: {}", strict);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let pipeline = match OrderPipeline::new(LocalStorage::default(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };
    let engine = EtlEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        match engine.preview().await {
            Ok(record) => {
                println!("{}", serde_json::to_string_pretty(&record)?);
                println!();
                println!("✅ Dry run complete. Output would be saved to: {}", engine.pipeline().config().load.output_path);
            }
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Extraction completed successfully!");
            println!("✅ Extraction completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code());
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("0")
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.source.input_path);
    println!("  Output: {}", config.load.output_path);
    println!("  Pretty JSON: {}", config.load.pretty);
    println!("  Strict: {}", config.transform.strict);
    println!(
        "  Passengers on last leg: {}",
        config.transform.attach_passengers_to_last_leg
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
