use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use lime_requirement_calculator::{
    io,
    models::{AggregateResult, CropType, LimingMode, Method, MethodParameters},
    visualization::{
        print_field_table, print_products_table, print_requirement_chart, print_summary_table,
        print_texture_table, print_zone_table,
    },
    LimeCalculator, LimeConfig,
};

#[derive(Parser)]
#[command(
    name = "lime-calc",
    about = "Lime Requirement Calculator - VDLUFA and CEC liming recommendations per field zone",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate lime requirements for the zones in a CSV or JSON file
    Calculate {
        /// Path to zone file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Calculation method: VDLUFA or CEC
        #[arg(short, long, default_value = "VDLUFA")]
        method: Method,

        /// Crop group: "Standard crops" or "Other crops"
        #[arg(short, long, default_value = "Standard crops")]
        crop: CropType,

        /// Lime product (see `lime-calc products`)
        #[arg(short, long, default_value = "CaCO3")]
        lime: String,

        /// Liming mode: "pH Improvement" or "pH Maintenance"
        #[arg(long, default_value = "pH Improvement")]
        mode: LimingMode,

        /// Neutralizing value of the product in percent
        #[arg(long)]
        nv: Option<f64>,

        /// Annual rainfall in mm (pH Maintenance)
        #[arg(long)]
        rainfall: Option<f64>,

        /// Maximum application rate in product kg/ha
        #[arg(long)]
        max_rate: Option<f64>,

        /// Target pH override (CEC method)
        #[arg(long)]
        target_ph: Option<f64>,

        /// Fine and dry soil value (CEC method)
        #[arg(long)]
        fine_dry_soil: Option<f64>,

        /// Dose factor (CEC method)
        #[arg(long)]
        dose: Option<f64>,

        /// TOML file overriding the built-in tables
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write results to a file (CSV or JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show a bar chart of the product rate per zone
        #[arg(long)]
        chart: bool,
    },

    /// Run a JSON calculation request (zones plus parameters)
    Request {
        /// Path to request file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Calculation method: VDLUFA or CEC
        #[arg(short, long, default_value = "VDLUFA")]
        method: Method,

        /// TOML file overriding the built-in tables
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write results to a file (CSV or JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show a bar chart of the product rate per zone
        #[arg(long)]
        chart: bool,
    },

    /// List the available lime products and their CaO factors
    Products {
        /// TOML file overriding the built-in tables
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the soil texture classes and their table values
    Textures {
        /// TOML file overriding the built-in tables
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a TOML configuration file
    CheckConfig {
        /// Path to the configuration file
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the built-in configuration as TOML
    DefaultConfig,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_calculator(config: Option<&Path>) -> Result<LimeCalculator> {
    match config {
        Some(path) => {
            let config = LimeConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            Ok(LimeCalculator::new(config)?)
        }
        None => Ok(LimeCalculator::with_defaults()),
    }
}

fn report(result: &AggregateResult, chart: bool) {
    print_summary_table(result);
    if result.fields.len() > 1 {
        print_field_table(result);
    }
    print_zone_table(result);
    if chart {
        print_requirement_chart(result);
    }
    println!();
}

fn write_output(result: &AggregateResult, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        io::writer_for_path(path)?.write(result, path)?;
        println!(
            "{} Results written to {}",
            "Success:".green().bold(),
            path.display()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Calculate {
            input,
            method,
            crop,
            lime,
            mode,
            nv,
            rainfall,
            max_rate,
            target_ph,
            fine_dry_soil,
            dose,
            config,
            output,
            chart,
        } => {
            let calculator = load_calculator(config.as_deref())?;

            println!(
                "\n{}",
                format!("Lime Requirement: {}", input.display())
                    .bold()
                    .cyan()
            );

            let zones = io::reader_for_path(&input)?
                .read(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            println!("  Loaded {} zones", zones.len());

            let mut params = MethodParameters::new(crop, lime, mode);
            params.nv = nv;
            params.rainfall_mm = rainfall;
            params.max_application_rate = max_rate;
            params.target_ph = target_ph;
            params.fine_dry_soil = fine_dry_soil;
            params.dose = dose;

            let result = calculator.aggregate(&zones, &params, method)?;
            report(&result, chart);
            write_output(&result, output.as_deref())?;
        }

        Commands::Request {
            input,
            method,
            config,
            output,
            chart,
        } => {
            let calculator = load_calculator(config.as_deref())?;
            let request = io::read_request_json(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            println!(
                "\n{}",
                format!("Lime Requirement Request: {}", input.display())
                    .bold()
                    .cyan()
            );

            let result = calculator.process_request(&request, method)?;
            report(&result, chart);
            write_output(&result, output.as_deref())?;
        }

        Commands::Products { config } => {
            let calculator = load_calculator(config.as_deref())?;
            print_products_table(&calculator.config().products);
            println!();
        }

        Commands::Textures { config } => {
            let calculator = load_calculator(config.as_deref())?;
            print_texture_table(calculator.config());
            println!();
        }

        Commands::CheckConfig { config } => {
            let loaded = LimeConfig::load(&config)
                .with_context(|| format!("Failed to load configuration {}", config.display()))?;
            loaded.validate()?;
            println!(
                "{} {} is a valid configuration",
                "OK:".green().bold(),
                config.display()
            );
        }

        Commands::DefaultConfig => {
            print!("{}", LimeConfig::default().to_toml_string()?);
        }
    }

    Ok(())
}
