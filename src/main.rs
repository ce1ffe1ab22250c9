use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use eitc_engine::api::{AppState, create_router};
use eitc_engine::calculation::{
    AdjustmentStage, CalculationConfig, CalculationRequest, calculate,
};
use eitc_engine::config::{ConfigLoader, TableParseMode, load_schedule_table_file};
use eitc_engine::error::EngineResult;
use eitc_engine::models::CalculationResult;

const DEFAULT_CONFIG_DIR: &str = "./config/eitc_2025";

#[derive(Debug, Parser)]
#[command(
    name = "eitc-engine",
    version,
    about = "Earned income tax credit benefit calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        /// Configuration directory.
        #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
        config: PathBuf,
        /// Port to listen on.
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Calculate one benefit and print the result as JSON.
    Calculate {
        /// Configuration directory.
        #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
        config: PathBuf,
        /// Household type (single, single_earner, dual_earner, 단독, 홑벌이, 맞벌이).
        #[arg(long)]
        household: String,
        /// Annual income in won.
        #[arg(long, allow_negative_numbers = true)]
        income: i64,
        /// Total household assets in won.
        #[arg(long, allow_negative_numbers = true)]
        asset_value: Option<i64>,
        /// The application was filed late.
        #[arg(long)]
        late: bool,
        /// Applicant age.
        #[arg(long)]
        age: Option<u32>,
        /// Interpolate over a CSV schedule table instead of the formula.
        #[arg(long)]
        table: Option<PathBuf>,
        /// Skip malformed table rows instead of failing.
        #[arg(long, requires = "table")]
        lenient_table: bool,
        /// Adjustment stage to apply, repeatable and applied in order.
        #[arg(long = "stage", value_parser = parse_stage)]
        stages: Vec<AdjustmentStage>,
    },
}

fn parse_stage(value: &str) -> Result<AdjustmentStage, String> {
    match value {
        "asset" => Ok(AdjustmentStage::Asset),
        "late_filing" | "late-filing" => Ok(AdjustmentStage::LateFiling),
        "age_bonus" | "age-bonus" => Ok(AdjustmentStage::AgeBonus),
        _ => Err("stage must be one of: asset, late_filing, age_bonus".to_string()),
    }
}

struct CalculateArgs {
    config: PathBuf,
    household: String,
    income: i64,
    asset_value: Option<i64>,
    late: bool,
    age: Option<u32>,
    table: Option<PathBuf>,
    lenient_table: bool,
    stages: Vec<AdjustmentStage>,
}

fn run_calculate(args: CalculateArgs) -> EngineResult<CalculationResult> {
    let loader = ConfigLoader::load(&args.config)?;

    let mut request = CalculationRequest::from_label(&args.household, args.income)?;
    request.asset_value = args.asset_value;
    request.late_filing = Some(args.late);
    request.age = args.age;

    let mut table_warnings = Vec::new();
    let config = match &args.table {
        Some(path) => {
            let mode = if args.lenient_table {
                TableParseMode::Lenient
            } else {
                TableParseMode::Strict
            };
            let report = load_schedule_table_file(path, mode)?;
            table_warnings = report.warnings();
            CalculationConfig::table(report.table).with_rules(*loader.rules())
        }
        None => loader.formula_config(),
    };
    let config = if args.stages.is_empty() {
        config.with_stages(loader.default_stages())
    } else {
        config.with_stages(args.stages)
    };

    let mut result = calculate(&request, &config)?;
    result.audit_trace.warnings.extend(table_warnings);
    Ok(result)
}

async fn run_serve(config: PathBuf, port: u16) -> Result<(), String> {
    let loader = ConfigLoader::load(&config).map_err(|e| e.to_string())?;
    let app = create_router(AppState::new(loader));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {}: {}", addr, e))?;
    info!(%addr, "Benefit engine API listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| format!("server error: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { config, port } => match run_serve(config, port).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(message) => {
                error!(error = %message, "Server stopped");
                eprintln!("{}", message);
                ExitCode::FAILURE
            }
        },
        Commands::Calculate {
            config,
            household,
            income,
            asset_value,
            late,
            age,
            table,
            lenient_table,
            stages,
        } => {
            let args = CalculateArgs {
                config,
                household,
                income,
                asset_value,
                late,
                age,
                table,
                lenient_table,
                stages,
            };
            match run_calculate(args) {
                Ok(result) => match serde_json::to_string_pretty(&result) {
                    Ok(json) => {
                        println!("{}", json);
                        ExitCode::SUCCESS
                    }
                    Err(err) => {
                        eprintln!("Error: failed to render result: {}", err);
                        ExitCode::FAILURE
                    }
                },
                Err(err) => {
                    eprintln!("Error: {}", err);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
