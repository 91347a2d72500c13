use clap::Parser;
use thought_shape::config::{load_service_config, Command};
use thought_shape::core::schema;
use thought_shape::core::shape::ValidationSummary;
use thought_shape::domain::ports::DocumentSource;
use thought_shape::utils::{logger, validation::Validate};
use thought_shape::{
    evaluate, parse_document, CliConfig, Listener, LocalSource, Result, ThoughtError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if !matches!(cli.command, Command::Serve { .. }) {
        logger::init_cli_logger(cli.verbose);
    }

    let outcome = match cli.command {
        Command::Validate { file, json } => validate(LocalSource::new(file), json).await,
        Command::Schema { format } => schema::render(format).map(|text| println!("{}", text)),
        Command::Eval { file } => eval(LocalSource::new(file)).await,
        Command::Serve { config, host, port } => {
            serve(config.as_deref(), host, port, cli.verbose).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        if let ThoughtError::Shape(report) = &e {
            for violation in report.iter() {
                eprintln!("   - {}", violation);
            }
        }
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn validate(source: LocalSource, json: bool) -> Result<()> {
    tracing::debug!("reading {}", source.describe());
    let text = source.read_document().await?;

    match parse_document(&text) {
        Ok(records) => {
            tracing::info!("✅ {} record(s) valid in {}", records.len(), source.describe());
            if json {
                println!("{}", serde_json::to_string(&ValidationSummary::passed(records.len()))?);
            } else {
                println!("✅ {} record(s) valid", records.len());
            }
            Ok(())
        }
        Err(ThoughtError::Shape(report)) if json => {
            println!("{}", serde_json::to_string(&ValidationSummary::failed(&report))?);
            Err(ThoughtError::Shape(report))
        }
        Err(e) => Err(e),
    }
}

async fn eval(source: LocalSource) -> Result<()> {
    let text = source.read_document().await?;
    let records = parse_document(&text)?;

    for record in &records {
        let thought = &record.thought;
        let value = evaluate(thought)?;
        println!("{} {} {} = {}", thought.lhs, thought.operator, thought.rhs, value);
    }
    Ok(())
}

async fn serve(
    path: Option<&std::path::Path>,
    host: Option<String>,
    port: Option<u16>,
    verbose: bool,
) -> Result<()> {
    let config = load_service_config(path, host, port)?;

    let level = if verbose { "debug" } else { config.logging.level.as_str() };
    logger::init_service_logger(level, config.logging.json);
    tracing::info!("🚀 Starting thought listener");

    config.validate()?;
    tracing::debug!("service config: {:?}", config);

    let listener = Listener::bind(&config.listener).await?;
    listener
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("cannot listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
}
