use clap::Parser;
use travel_planner::app::{panels, shell};
use travel_planner::config::argument_error;
use travel_planner::render::PDF_MIME_TYPE;
use travel_planner::utils::error::TravelError;
use travel_planner::utils::{logger, validation::Validate};
use travel_planner::{
    AppConfig, Catalog, CliConfig, DocumentRenderer, GeminiPlanGenerator, LocalStorage,
    RecommendationProvider, RenderOptions, TravelEngine, TripPlan,
};

fn exit_with(e: &TravelError) -> ! {
    tracing::error!(
        "❌ Travel planning failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn load_config(cli: &CliConfig) -> Result<AppConfig, TravelError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📋 Loading configuration from {}", path);
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(output_path) = &cli.output_path {
        config.output.path = output_path.clone();
    }

    config.validate()?;
    Ok(config)
}

fn load_catalog(cli: &CliConfig) -> Result<Catalog, TravelError> {
    match &cli.catalog_dir {
        Some(dir) => {
            tracing::info!("📦 Loading offer catalog from {}", dir);
            Catalog::from_csv_dir(dir)
        }
        None => Ok(Catalog::demo()),
    }
}

async fn export(
    engine: &TravelEngine<GeminiPlanGenerator>,
    trip: &TripPlan,
    output_path: &str,
) -> Result<String, TravelError> {
    let storage = LocalStorage::new(output_path.to_string());
    let filename = engine.export(trip, &storage).await?;
    Ok(storage.full_path(&filename).to_string_lossy().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 參數格式錯誤與輸入驗證失敗使用同一個退出碼
    let cli = match CliConfig::try_parse() {
        Ok(cli) => cli,
        Err(e) => match argument_error(&e) {
            Some(input) => {
                let _ = e.print();
                std::process::exit(input.exit_code());
            }
            None => e.exit(),
        },
    };
    dotenv::dotenv().ok();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting travel-planner CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證輸入
    if let Err(e) = cli.validate() {
        tracing::error!("❌ Input validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let config = load_config(&cli).unwrap_or_else(|e| exit_with(&e));
    let catalog = load_catalog(&cli).unwrap_or_else(|e| exit_with(&e));

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let generator =
        GeminiPlanGenerator::new(config.llm.clone()).unwrap_or_else(|e| exit_with(&e));
    let renderer = DocumentRenderer::new(RenderOptions::from(&config.document));
    let engine = TravelEngine::new_with_monitoring(
        RecommendationProvider::new(catalog),
        generator,
        renderer,
        cli.monitor,
    );

    let request = cli.travel_request();
    println!("{}\n", shell::format_request_summary(&request));

    let trip = match shell::with_spinner(
        "Generating your personalized travel plan...",
        engine.plan(request, cli.preferences()),
    )
    .await
    {
        Ok(trip) => trip,
        Err(e) => exit_with(&e),
    };

    let destination = trip.request.destination();
    println!("{}\n", shell::format_offer_cards(&trip.recommendations));
    println!(
        "{}\n",
        panels::format_weather_panel(
            destination,
            &panels::mock_forecast(destination, trip.request.dates())
        )
    );
    println!("{}\n", panels::format_tips_panel(destination));
    println!("{}\n", shell::format_plan(&trip.plan_text));

    if cli.export || shell::confirm("Export this travel plan as PDF?") {
        match export(&engine, &trip, &config.output.path).await {
            Ok(path) => {
                tracing::info!("✅ Export completed ({})", PDF_MIME_TYPE);
                println!("✅ Travel plan exported!");
                println!("📁 Saved to: {}", path);
            }
            Err(e) => exit_with(&e),
        }
    }

    Ok(())
}
