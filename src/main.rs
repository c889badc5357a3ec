use clap::Parser;
use launch_board::core::etl::EtlReport;
use launch_board::core::ConfigProvider;
use launch_board::utils::error::{ErrorSeverity, LaunchError};
use launch_board::utils::{logger, validation::Validate};
use launch_board::{
    CliConfig, EtlEngine, GraphQlLaunchSource, LaunchPipeline, LocalStorage, TomlConfig,
};
use std::fmt::Debug;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            let mut config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            config.apply_cli_overrides(&cli);

            init_logging(
                cli.verbose || config.verbose_logging(),
                cli.json_logs || config.json_logging(),
            );
            tracing::info!("📁 Loaded configuration from: {}", path);
            run(config).await
        }
        None => {
            init_logging(cli.verbose, cli.json_logs);
            run(cli).await
        }
    }
}

fn init_logging(verbose: bool, json: bool) {
    if json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }
}

async fn run<C>(config: C) -> anyhow::Result<()>
where
    C: ConfigProvider + Validate + Debug + 'static,
{
    tracing::info!("🚀 Starting launch-board");
    tracing::debug!("Config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let source = match GraphQlLaunchSource::with_timeout(
        config.endpoint(),
        Duration::from_secs(config.timeout_seconds()),
    ) {
        Ok(source) => source,
        Err(e) => fail(&e),
    };
    let storage = LocalStorage::new(config.output_path());
    let pipeline = match LaunchPipeline::new(source, storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };

    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &LaunchError) -> ! {
    tracing::error!(
        "❌ Launch pipeline failed: {} (Severity: {:?})",
        e,
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 依錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn print_report(report: &EtlReport) {
    if report.launches.is_empty() {
        println!("No launches match the current selection.");
        if !report.available_years.is_empty() {
            let years: Vec<String> = report
                .available_years
                .iter()
                .map(|year| year.to_string())
                .collect();
            println!("Years with launches: {}", years.join(", "));
        }
    } else {
        println!(
            "{:<20} {:<6} {:<32} {:<12} {}",
            "DATE", "YEAR", "MISSION", "ROCKET", "SITE"
        );
        for entry in &report.launches {
            println!(
                "{:<20} {:<6} {:<32} {:<12} {}",
                entry.display_date,
                entry.year,
                entry.launch.mission_name(),
                entry.launch.rocket_name(),
                entry.launch.site_name()
            );
        }
    }

    println!();
    println!(
        "✅ {} of {} launches shown",
        report.launches.len(),
        report.total_records
    );
    if !report.rejected.is_empty() {
        println!(
            "⚠️  {} launches skipped because their date could not be read",
            report.rejected.len()
        );
    }
    for output in &report.outputs {
        println!("📁 Output saved to: {}", output);
    }
}
