use clap::Parser;
use sheet_etl::app::report::{summaries_to_json, write_diagnostics_csv};
use sheet_etl::config::cli::{confirm_continue, prompt_path};
use sheet_etl::utils::{logger, validation::Validate};
use sheet_etl::{
    BirthdayPipeline, BirthdaySettings, CliConfig, EtlEngine, EtlError, RunSummary, XlsxStorage,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_format);

    tracing::info!("Starting sheet-etl birthday extraction");
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    let config = match cli.validate().and_then(|_| cli.resolve()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!(
        "ID column {} -> birthday column {}",
        config.birthday.columns.input,
        config.birthday.columns.output
    );

    let storage = XlsxStorage::new();
    let mut summaries = Vec::new();
    let mut failures: Vec<EtlError> = Vec::new();

    if cli.inputs.is_empty() {
        // 互動模式：逐檔詢問路徑
        loop {
            let input = prompt_path("Excel file path").unwrap_or_else(|e| exit_with(&e));
            match process_file(&storage, &config.birthday, input).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => failures.push(e),
            }

            if !confirm_continue().unwrap_or_else(|e| exit_with(&e)) {
                break;
            }
        }
    } else {
        for input in &cli.inputs {
            match process_file(&storage, &config.birthday, input.clone()).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => failures.push(e),
            }
        }
    }

    if let Some(path) = &config.output.diagnostics_csv {
        match write_diagnostics_csv(path, &summaries) {
            Ok(count) => tracing::info!("📝 {} diagnostic(s) written to {}", count, path.display()),
            Err(e) => exit_with(&e),
        }
    }

    if cli.json {
        let json = summaries_to_json(&summaries).unwrap_or_else(|e| exit_with(&e));
        println!("{}", json);
    }

    // 依最嚴重的錯誤決定退出碼
    if let Some(code) = failures.iter().map(EtlError::exit_code).max() {
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}

fn exit_with(e: &EtlError) -> ! {
    tracing::error!("❌ {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

async fn process_file(
    storage: &XlsxStorage,
    settings: &BirthdaySettings,
    input: PathBuf,
) -> sheet_etl::Result<RunSummary> {
    if !input.is_file() {
        let e = EtlError::ValidationError {
            message: format!("file does not exist: {}", input.display()),
        };
        eprintln!("❌ {}", e.user_friendly_message());
        return Err(e);
    }

    let pipeline = BirthdayPipeline::new(storage.clone(), settings.clone(), input.clone());
    match EtlEngine::new(pipeline).run().await {
        Ok(summary) => {
            println!("✅ {}", input.display());
            println!(
                "   Rows written: {}, blank: {}, skipped with warnings: {}",
                summary.rows_written,
                summary.blank_rows,
                summary.skipped_rows()
            );
            if let Some(output) = &summary.output_path {
                println!("📁 Output saved to: {}", output.display());
            }
            Ok(summary)
        }
        Err(e) => {
            tracing::error!(
                "❌ Processing {} failed: {} (Category: {:?}, Severity: {:?})",
                input.display(),
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            Err(e)
        }
    }
}
