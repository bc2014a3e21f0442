use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use prospectus::config::validate_sensitivity_range;
use prospectus::{AppConfig, commands, init_logging};
use prospectus_core::analysis::{DEFAULT_SWEEP_STEPS, VariableKey};
use prospectus_core::state::ModelState;
use prospectus_core::{DriverKey, ScenarioName};

#[derive(Parser, Debug)]
#[command(name = "prospectus")]
#[command(about = "Annual financial projections and lender analysis for the SBA loan prospectus")]
struct Cli {
    /// Path to the config file (default: ~/.prospectus/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project one driver set into an income statement
    Project {
        /// Start from a preset instead of the configured scenario
        #[arg(short, long)]
        scenario: Option<ScenarioName>,

        #[command(flatten)]
        drivers: DriverArgs,

        #[arg(long)]
        json: bool,
    },
    /// Compare the Conservative, Base and Growth presets
    Scenarios {
        #[arg(long)]
        json: bool,
    },
    /// Sweep one lever around the base case
    Sweep {
        #[arg(short, long)]
        variable: VariableKey,

        /// Half-width of the sweep in percent (default: configured range)
        #[arg(short, long)]
        range: Option<f64>,

        #[arg(long, default_value_t = DEFAULT_SWEEP_STEPS)]
        steps: usize,

        /// Preset to sweep around (default: configured scenario and overrides)
        #[arg(short, long)]
        scenario: Option<ScenarioName>,

        #[arg(long)]
        json: bool,
    },
    /// Rank levers by NOI swing across their full ranges
    Tornado {
        #[arg(short, long)]
        scenario: Option<ScenarioName>,

        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    Config,
    /// Write the scenario comparison CSV report
    Export {
        /// Output file (default: OverIT_Financial_Scenarios_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Per-driver overrides, applied like slider edits
#[derive(Args, Debug, Default)]
struct DriverArgs {
    #[arg(long)]
    training: Option<f64>,
    #[arg(long)]
    retrofit: Option<f64>,
    #[arg(long)]
    retail: Option<f64>,
    #[arg(long)]
    consulting: Option<f64>,
    #[arg(long)]
    maintenance: Option<f64>,
    #[arg(long)]
    affiliate: Option<f64>,
}

impl DriverArgs {
    fn overrides(&self) -> [(DriverKey, Option<f64>); 6] {
        [
            (DriverKey::Training, self.training),
            (DriverKey::Retrofit, self.retrofit),
            (DriverKey::Retail, self.retail),
            (DriverKey::Consulting, self.consulting),
            (DriverKey::Maintenance, self.maintenance),
            (DriverKey::Affiliate, self.affiliate),
        ]
    }

    fn apply(&self, state: &mut ModelState) -> color_eyre::Result<()> {
        for (key, value) in self.overrides() {
            if let Some(value) = value {
                let stored = state
                    .set_driver(key, value)
                    .wrap_err_with(|| format!("Invalid value for --{key}"))?;
                if stored != value {
                    tracing::warn!(%key, requested = value, stored, "Driver clamped to range");
                }
            }
        }
        Ok(())
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config_path = cli.config.unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)
        .wrap_err_with(|| format!("Failed to load config from {}", config_path.display()))?;

    let output = match cli.command {
        Command::Project {
            scenario,
            drivers,
            json,
        } => {
            let mut state = match scenario {
                Some(name) => ModelState::from_scenario(name, config.assumptions),
                None => config.model_state()?,
            };
            drivers.apply(&mut state)?;
            commands::project(&state, json)?
        }
        Command::Scenarios { json } => commands::scenarios(&config.assumptions, json)?,
        Command::Sweep {
            variable,
            range,
            steps,
            scenario,
            json,
        } => {
            let range = range.unwrap_or(config.sensitivity_range);
            validate_sensitivity_range(range)?;
            let base = commands::analysis_base(&config, scenario)?;
            commands::sensitivity(&base, variable, range, steps, json)?
        }
        Command::Tornado { scenario, json } => {
            let base = commands::analysis_base(&config, scenario)?;
            commands::tornado_ranking(&base, json)?
        }
        Command::Config => commands::show_config(&config)?,
        Command::Export { output } => {
            let generated = jiff::Zoned::now().datetime();
            let path = commands::export(&config, output.as_deref(), generated)?;
            format!("Wrote {}", path.display())
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}
