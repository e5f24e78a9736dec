use clap::Parser;
use docwise_match::app::report::MatchReport;
use docwise_match::config::toml_config::LogFormat;
use docwise_match::config::OutputFormat;
use docwise_match::core::text::redacted;
use docwise_match::core::Storage;
use docwise_match::utils::error::{ErrorSeverity, MatchError};
use docwise_match::utils::{logger, validation::Validate};
use docwise_match::{CliConfig, LocalStorage, MatchEngine};

fn exit_code(e: &MatchError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(context: &str, e: &MatchError) -> ! {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(exit_code(e));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e.user_friendly_message());
            std::process::exit(exit_code(&e));
        }
    };

    match config.log_format() {
        LogFormat::Json => logger::init_json_logger(cli.verbose),
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
    }

    tracing::info!("Starting docwise-match");
    tracing::debug!(
        "CLI options: symptoms {}, location set: {}, format: {:?}, explain: {}",
        redacted(&cli.symptoms),
        cli.location.is_some(),
        cli.format,
        cli.explain
    );

    if let Err(e) = cli.validate().and_then(|_| config.validate()) {
        fail("Configuration validation failed", &e);
    }

    // Registry and taxonomy load is all-or-nothing.
    let storage = LocalStorage::new(".");
    let engine = match MatchEngine::from_config(&storage, &config).await {
        Ok((engine, report)) => {
            if !report.rejected.is_empty() {
                tracing::warn!(
                    "⚠️ {} of {} registry rows were rejected",
                    report.rejected.len(),
                    report.rows_read
                );
            }
            engine
        }
        Err(e) => fail("Startup failed", &e),
    };

    let query = cli.query(&config);
    let (result, detail) = match engine.run_detailed(&query) {
        Ok(outcome) => outcome,
        Err(e) => fail("Matching failed", &e),
    };

    let mut report = MatchReport::new(&query.raw_text, &result);
    if cli.explain {
        report = report.with_explanation(&detail);
    }

    match cli.format {
        OutputFormat::Table => print!("{}", report.to_table()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail("Rendering failed", &e),
        },
    }

    if let Some(output) = &cli.output {
        let written = match report.to_json() {
            Ok(json) => storage.write_file(output, json.as_bytes()).await,
            Err(e) => Err(e),
        };
        match written {
            Ok(()) => tracing::info!("📁 Report saved to: {}", output),
            Err(e) => fail("Writing report failed", &e),
        }
    }

    Ok(())
}
