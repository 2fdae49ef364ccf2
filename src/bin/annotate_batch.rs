use clap::Parser;
use sheet_etl::app::batch::annotate_folder;
use sheet_etl::app::report::summaries_to_json;
use sheet_etl::config::cli::prompt_path;
use sheet_etl::utils::logger;
use sheet_etl::{AnnotateCliConfig, EtlError, XlsxStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = AnnotateCliConfig::parse();

    logger::init_cli_logger(args.verbose, args.log_format);
    tracing::info!("🚀 Starting batch annotation");

    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let folder = match &args.folder {
        Some(folder) => folder.clone(),
        None => prompt_path("Folder containing Excel files").unwrap_or_else(|e| exit_with(&e)),
    };
    let output_dir = args.output_dir(&config);

    match &output_dir {
        Some(dir) => tracing::info!("📁 Annotated workbooks go to: {}", dir.display()),
        None => tracing::info!("✏️ Overwriting workbooks in place"),
    }

    let storage = XlsxStorage::new();
    let report = match annotate_folder(&storage, &config.annotate, &folder, output_dir.as_deref())
        .await
    {
        Ok(report) => report,
        Err(e) => exit_with(&e),
    };

    if args.json {
        let json = summaries_to_json(&report).unwrap_or_else(|e| exit_with(&e));
        println!("{}", json);
    } else {
        for summary in &report.processed {
            println!(
                "✅ {}: {} counted, {} marked '{}'",
                summary.input_path.display(),
                summary.rows_written,
                summary.status_rows.unwrap_or(0),
                config.annotate.status_text
            );
        }
        for failure in &report.failures {
            eprintln!("❌ {}: {}", failure.path.display(), failure.error);
        }
        println!(
            "Batch finished: {} processed, {} failed",
            report.processed.len(),
            report.failures.len()
        );
    }

    if !report.is_success() {
        std::process::exit(2);
    }

    Ok(())
}

fn exit_with(e: &EtlError) -> ! {
    tracing::error!("❌ Batch annotation failed: {}", e);
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
