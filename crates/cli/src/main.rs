use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use pump_or_burn_core::{Config, analyze};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uom::si::thermodynamic_temperature::degree_celsius;

/// Find the outdoor temperature above which a heat pump is cheaper to run
/// than a gas furnace.
///
/// Any option left unset falls back to the reference values: gas at 2.40 per
/// therm, electricity at 0.45 per kWh, an 80% AFUE furnace, COP samples
/// 17F=2.44 and 45F=3.62, and a scan from -20F up to 75F in 5 degree steps.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Gas price per therm
    #[arg(long, value_name = "PRICE")]
    gas_cost: Option<f64>,

    /// Electricity price per kWh
    #[arg(long, value_name = "PRICE")]
    electric_cost: Option<f64>,

    /// Furnace AFUE rating, as a percentage
    #[arg(long, value_name = "PERCENT")]
    afue: Option<f64>,

    /// Observed heat pump COP at an outdoor temperature (repeatable)
    #[arg(
        long = "sample",
        value_name = "TEMP=COP",
        value_parser = parse_sample,
        allow_hyphen_values = true
    )]
    samples: Vec<(i32, f64)>,

    /// Degrees Fahrenheit between scanned temperatures
    #[arg(long, value_name = "DEGREES")]
    granularity: Option<u32>,

    /// First temperature to scan, in Fahrenheit
    #[arg(long, value_name = "TEMP", allow_negative_numbers = true)]
    start: Option<i32>,

    /// Scan stops before this temperature, in Fahrenheit
    #[arg(long, value_name = "TEMP", allow_negative_numbers = true)]
    end: Option<i32>,

    /// Print the full analysis as JSON instead of a sentence
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let defaults = Config::default();
        let range = defaults.temperature_range();
        let samples = if self.samples.is_empty() {
            defaults.samples().collect()
        } else {
            self.samples.clone()
        };

        Config::new(
            self.gas_cost.unwrap_or(defaults.gas_cost_per_therm()),
            self.electric_cost.unwrap_or(defaults.electric_cost_per_kwh()),
            self.afue.unwrap_or(defaults.afue()),
            samples,
            self.granularity.unwrap_or(defaults.granularity().get()),
            self.start.unwrap_or(range.start)..self.end.unwrap_or(range.end),
        )
        .context("invalid configuration")
    }
}

fn parse_sample(s: &str) -> Result<(i32, f64), String> {
    let (temperature, cop) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TEMP=COP, got `{s}`"))?;
    let temperature = temperature
        .trim()
        .parse()
        .map_err(|e| format!("invalid temperature `{temperature}`: {e}"))?;
    let cop = cop
        .trim()
        .parse()
        .map_err(|e| format!("invalid COP `{cop}`: {e}"))?;
    Ok((temperature, cop))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the result on stdout stays clean for piping.
    const CRATES: &[&str] = &["pump_or_burn", "pump_or_burn_core"];
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES
        .iter()
        .map(|c| format!("{c}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("warn,{allowlist}")))
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config()?;
    let analysis = analyze(&config).context("comparison failed")?;

    if let Some(temperature) = analysis.crossover_temperature() {
        debug!(
            celsius = temperature.get::<degree_celsius>(),
            "crossover temperature"
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{analysis}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_samples() {
        assert_eq!(parse_sample("17=2.44"), Ok((17, 2.44)));
        assert_eq!(parse_sample("-5 = 1.8"), Ok((-5, 1.8)));
        assert!(parse_sample("17").is_err());
        assert!(parse_sample("warm=2.0").is_err());
        assert!(parse_sample("17=high").is_err());
    }

    #[test]
    fn unset_options_use_reference_values() {
        let cli = Cli::try_parse_from(["pump-or-burn"]).unwrap();
        assert_eq!(cli.config().unwrap(), Config::default());
    }

    #[test]
    fn options_override_reference_values() {
        let cli = Cli::try_parse_from([
            "pump-or-burn",
            "--electric-cost",
            "0.20",
            "--sample",
            "-5=1.9",
            "--sample",
            "47=3.8",
            "--start",
            "-10",
            "--end",
            "60",
            "--granularity",
            "1",
        ])
        .unwrap();

        let config = cli.config().unwrap();
        assert_eq!(config.electric_cost_per_kwh(), 0.20);
        assert_eq!(config.gas_cost_per_therm(), 2.40);
        assert_eq!(config.samples().collect::<Vec<_>>(), vec![(-5, 1.9), (47, 3.8)]);
        assert_eq!(config.temperature_range(), -10..60);
        assert_eq!(config.granularity().get(), 1);
    }

    #[test]
    fn verbosity_flags_raise_log_level() {
        let level = |args: &[&str]| {
            let cli = Cli::try_parse_from(args).unwrap();
            cli.verbose.tracing_level_filter()
        };

        assert_eq!(level(&["pump-or-burn"]), LevelFilter::WARN);
        assert_eq!(level(&["pump-or-burn", "-v"]), LevelFilter::INFO);
        assert_eq!(level(&["pump-or-burn", "-vv"]), LevelFilter::DEBUG);
        assert_eq!(level(&["pump-or-burn", "-vvv"]), LevelFilter::TRACE);
        assert_eq!(level(&["pump-or-burn", "-q"]), LevelFilter::ERROR);
    }

    #[test]
    fn invalid_options_are_reported() {
        let cli = Cli::try_parse_from(["pump-or-burn", "--afue", "120"]).unwrap();
        let err = cli.config().unwrap_err();
        assert!(format!("{err:#}").contains("AFUE"));
    }
}
