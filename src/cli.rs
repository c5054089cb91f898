//! The command line interface for the program.
use crate::forecast::ForecastEntry;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{create_output_directory, write_forecast};
use crate::recommend::{CropRecommender, SoilSample};
use crate::service::PriceService;
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// The commodity and month to make a prediction for
#[derive(Args)]
pub struct QueryOpts {
    /// The commodity (e.g. Wheat)
    #[arg(short, long)]
    pub commodity: String,
    /// Calendar month (1 to 12)
    #[arg(short, long, allow_negative_numbers = true)]
    pub month: i32,
    /// Year
    #[arg(short, long, allow_negative_numbers = true)]
    pub year: i32,
}

/// Options for the predict command
#[derive(Args)]
pub struct PredictOpts {
    /// The commodity and month
    #[command(flatten)]
    pub query: QueryOpts,
    /// Rainfall in mm. Defaults to the average for the month.
    #[arg(short, long, allow_negative_numbers = true)]
    pub rainfall: Option<f64>,
}

/// Options for the forecast command
#[derive(Args)]
pub struct ForecastOpts {
    /// The commodity and the month before the first forecast month
    #[command(flatten)]
    pub query: QueryOpts,
    /// The number of months to forecast
    #[arg(long, default_value_t = 12)]
    pub horizon: u32,
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Soil and weather measurements for the recommend command
#[derive(Args)]
pub struct SoilOpts {
    /// Nitrogen content of the soil
    #[arg(long)]
    pub nitrogen: f64,
    /// Phosphorus content of the soil
    #[arg(long)]
    pub phosphorus: f64,
    /// Potassium content of the soil
    #[arg(long)]
    pub potassium: f64,
    /// Temperature (degrees C)
    #[arg(long)]
    pub temperature: f64,
    /// Relative humidity (%)
    #[arg(long)]
    pub humidity: f64,
    /// Soil pH
    #[arg(long)]
    pub ph: f64,
    /// Rainfall (mm)
    #[arg(long)]
    pub rainfall: f64,
}

impl From<&SoilOpts> for SoilSample {
    fn from(opts: &SoilOpts) -> Self {
        Self {
            nitrogen: opts.nitrogen,
            phosphorus: opts.phosphorus,
            potassium: opts.potassium,
            temperature: opts.temperature,
            humidity: opts.humidity,
            ph: opts.ph,
            rainfall: opts.rainfall,
        }
    }
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Predict the price of a commodity for a month.
    Predict {
        /// Path to the data directory.
        data_dir: PathBuf,
        /// Prediction options
        #[command(flatten)]
        opts: PredictOpts,
    },
    /// Forecast the price of a commodity for the coming months.
    Forecast {
        /// Path to the data directory.
        data_dir: PathBuf,
        /// Forecast options
        #[command(flatten)]
        opts: ForecastOpts,
    },
    /// Check that every commodity's price model can be fitted.
    Validate {
        /// Path to the data directory.
        data_dir: PathBuf,
    },
    /// Recommend a crop for a field.
    Recommend {
        /// Path to the labelled crop CSV file.
        training_data: PathBuf,
        /// Measurements for the field
        #[command(flatten)]
        soil: SoilOpts,
    },
    /// Manage example data.
    Example {
        /// The available subcommands for managing example data.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Predict { data_dir, opts } => handle_predict_command(&data_dir, &opts, None),
            Self::Forecast { data_dir, opts } => handle_forecast_command(&data_dir, &opts, None),
            Self::Validate { data_dir } => handle_validate_command(&data_dir, None),
            Self::Recommend {
                training_data,
                soil,
            } => handle_recommend_command(&training_data, &soil, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and run the requested command
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ agrinext --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Use the given settings, or load them from the settings file
fn settings_or_load(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `predict` command.
pub fn handle_predict_command(
    data_dir: &Path,
    opts: &PredictOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    let service = PriceService::from_data_dir(data_dir, settings.depth_strategy())
        .context("Failed to load data.")?;
    let QueryOpts {
        commodity,
        month,
        year,
    } = &opts.query;
    let index = service.predict_index(commodity, *month, *year, opts.rainfall)?;
    let price = service.predict_price(commodity, *month, *year, opts.rainfall)?;
    println!(
        "{commodity} {month}/{year}: index {:.2}, price {:.2}",
        index.value(),
        price.value()
    );

    Ok(())
}

/// Handle the `forecast` command.
pub fn handle_forecast_command(
    data_dir: &Path,
    opts: &ForecastOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // This setting can be overridden by command-line argument
    let allow_overwrite = opts.overwrite || settings.overwrite;
    let overwritten = match &opts.output_dir {
        Some(output_dir) => create_output_directory(output_dir, allow_overwrite)
            .with_context(|| {
                format!(
                    "Failed to create output directory: {}",
                    output_dir.display()
                )
            })?,
        None => false,
    };

    log::init(Some(&settings.log_level), opts.output_dir.as_deref())
        .context("Failed to initialise logging.")?;

    // NB: We have to wait until the logger is initialised to display this warning
    if overwritten {
        warn!("Output folder will be overwritten");
    }

    let service = PriceService::from_data_dir(data_dir, settings.depth_strategy())
        .context("Failed to load data.")?;
    let QueryOpts {
        commodity,
        month,
        year,
    } = &opts.query;
    let forecast = service.forecast(commodity, *month, *year, opts.horizon)?;
    print_forecast(commodity, &forecast);

    if let Some(output_dir) = &opts.output_dir {
        let model = service
            .cache()
            .get(commodity)
            .context("No price model was fitted")?;
        write_forecast(output_dir, commodity, &forecast)?;
        write_metadata(output_dir, data_dir, commodity, model.max_depth())?;
        info!("Forecast written to {}", output_dir.display());
    }

    Ok(())
}

fn print_forecast(commodity: &str, forecast: &[ForecastEntry]) {
    println!("Price forecast for {commodity}");
    for entry in forecast {
        println!(
            "{}\t{:>10.2}\t(index {:.2})",
            entry.label,
            entry.price.value(),
            entry.index_value.value()
        );
    }
}

/// Handle the `validate` command.
pub fn handle_validate_command(data_dir: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = settings_or_load(settings)?;

    // We don't save log files when running the validate command
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    let service = PriceService::from_data_dir(data_dir, settings.depth_strategy())
        .context("Failed to load data.")?;
    service.validate().context("Failed to validate data.")?;
    info!("Validated price models for {} commodities", service.commodities().len());

    Ok(())
}

/// Handle the `recommend` command.
pub fn handle_recommend_command(
    training_data: &Path,
    soil: &SoilOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = settings_or_load(settings)?;
    log::init(Some(&settings.log_level), None).context("Failed to initialise logging.")?;

    let recommender =
        CropRecommender::from_path(training_data).context("Failed to train crop recommender.")?;
    let crop = recommender
        .recommend(&soil.into())
        .context("Failed to recommend a crop.")?;
    println!("Recommended crop: {crop}");

    Ok(())
}
