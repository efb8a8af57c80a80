//! # Hesab CLI
//!
//! Converts dates between the Jalaali and Gregorian calendars and checks
//! date/amount input the way the finance clients do.
//!
//! ## Usage
//! ```bash
//! # Gregorian to Jalaali
//! hesab convert 2024-12-28
//!
//! # Jalaali (any digits) to Gregorian
//! hesab convert ۱۴۰۳/۱۰/۰۸ --to gregorian
//!
//! # Parse what a Persian-calendar user typed
//! hesab --currency IRR parse "۱۴۰۳/۱۰/۰۸T۱۴:۳۰" --json
//!
//! # This Jalaali month as a Gregorian range
//! hesab --language fa period monthly
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::json;
use tracing::{debug, info};

use hesab_core::prelude::*;
use hesab_i18n::{HesabLocale, Translator};

mod config_loader;

use config_loader::CliConfig;

#[derive(Parser, Debug)]
#[command(name = "hesab")]
#[command(author = "hesab contributors")]
#[command(version)]
#[command(about = "Jalaali/Gregorian date conversion and input checking", long_about = None)]
struct Args {
    /// Profile currency; IRR selects the Persian calendar
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Explicit UI language (fa, en); fa selects the Persian calendar
    #[arg(long, global = true)]
    language: Option<String>,

    /// Output results as JSON
    #[arg(long, global = true, default_value = "false")]
    json: bool,

    /// Enable file logging to logs/ directory
    #[arg(long, global = true, default_value = "false")]
    log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a date between calendars
    Convert {
        /// Date in any digit system (YYYY-MM-DD or YYYY/MM/DD)
        date: String,
        /// Calendar to convert into; the input is read in the other one
        #[arg(long, value_enum, default_value = "persian")]
        to: CalendarArg,
    },
    /// Render an instant the way the profile's users see it
    Format {
        /// RFC 3339 instant, e.g. 2024-12-28T14:30:00Z; defaults to now
        instant: Option<String>,
        /// Include the time of day
        #[arg(long)]
        time: bool,
    },
    /// Parse date input in the profile's calendar
    Parse { text: String },
    /// Gregorian date range of a reporting period in the profile's calendar
    Period {
        #[arg(value_enum, default_value = "monthly")]
        period: PeriodArg,
        /// Reference day (YYYY-MM-DD); defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Normalize digits and optionally group an amount
    Digits {
        text: String,
        #[arg(long, value_enum, default_value = "latin")]
        to: DigitArg,
        /// Insert thousands separators
        #[arg(long)]
        group: bool,
    },
    /// Show which calendar and language the profile resolves to
    Policy,
    /// Write a sample config file to the config directory
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CalendarArg {
    Persian,
    Gregorian,
}

impl From<CalendarArg> for DateSystem {
    fn from(arg: CalendarArg) -> Self {
        match arg {
            CalendarArg::Persian => DateSystem::Persian,
            CalendarArg::Gregorian => DateSystem::Gregorian,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PeriodArg {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Daily => Period::Daily,
            PeriodArg::Weekly => Period::Weekly,
            PeriodArg::Monthly => Period::Monthly,
            PeriodArg::Quarterly => Period::Quarterly,
            PeriodArg::Yearly => Period::Yearly,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DigitArg {
    Latin,
    Persian,
    Arabic,
}

impl From<DigitArg> for DigitSystem {
    fn from(arg: DigitArg) -> Self {
        match arg {
            DigitArg::Latin => DigitSystem::Latin,
            DigitArg::Persian => DigitSystem::Persian,
            DigitArg::Arabic => DigitSystem::Arabic,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let file_config = CliConfig::load();

    let _file_guard = init_tracing(args.log || file_config.enable_logging.unwrap_or(false))?;

    let config = file_config.resolve(
        HesabConfig::from_env(),
        HesabConfig {
            default_currency: args.currency.clone(),
            language: args.language.clone(),
            include_time: None,
        },
    );
    debug!(?config, "Resolved profile");

    let formatter = DateFormatter::new(config.clone());
    let locale = HesabLocale::from_language(formatter.policy().language());
    let translator = Translator::new();

    match run(&args, &config, &formatter) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("{} {}", "✗".red(), translator.error_message(locale, &e));
            Err(e.into())
        }
    }
}

fn init_tracing(
    to_file: bool,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    if to_file {
        std::fs::create_dir_all("logs")?;

        let file_appender = tracing_appender::rolling::daily("logs", "hesab.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let env_filter = tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("hesab_core=debug".parse()?)
            .add_directive("hesab_cli=debug".parse()?);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
            .init();

        info!("--- Hesab session started [{}] ---", Utc::now());
        Ok(Some(guard))
    } else {
        // Stdout carries results; diagnostics go to stderr.
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env().add_directive("hesab_core=warn".parse()?),
            )
            .init();
        Ok(None)
    }
}

fn run(args: &Args, config: &HesabConfig, formatter: &DateFormatter<HesabConfig>) -> Result<(), HesabError> {
    match &args.command {
        Commands::Convert { date, to } => {
            let target = DateSystem::from(*to);
            let source = match target {
                DateSystem::Persian => DateSystem::Gregorian,
                DateSystem::Gregorian => DateSystem::Persian,
            };
            let parsed = parse_from_input(date, source)?;
            let converted = format_for_input(&parsed.instant, false, target);
            let latin = to_latin_digits(&converted);
            let weekday = parsed.instant.date_naive().format("%A").to_string();
            if args.json {
                print_json(&json!({
                    "from": source,
                    "to": target,
                    "input": date,
                    "date": latin,
                    "localized": converted,
                    "weekday": weekday,
                }))?;
            } else {
                println!("{} {} ({})", "→".green(), converted.bold(), weekday);
                if latin != converted {
                    println!("  {}", latin.dimmed());
                }
            }
        }
        Commands::Format { instant, time } => {
            let instant = match instant {
                Some(raw) => DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|_| HesabError::invalid_format(raw.as_str(), DateSystem::Gregorian))?,
                None => Utc::now(),
            };
            let include_time = *time || config.includes_time();
            let display = formatter.display(&instant, include_time);
            let input = formatter.input(&instant, include_time);
            if args.json {
                print_json(&json!({
                    "system": formatter.date_system(),
                    "display": display,
                    "input": input,
                }))?;
            } else {
                println!("{:<8} {}", "display".cyan(), display);
                println!("{:<8} {}", "input".cyan(), input);
            }
        }
        Commands::Parse { text } => {
            let parsed = formatter.parse(text)?;
            if args.json {
                print_json(&json!({
                    "instant": parsed.transaction_date(),
                    "userDate": parsed.user_date,
                    "userTime": parsed.user_time,
                }))?;
            } else {
                println!("{:<16} {}", "transactionDate".cyan(), parsed.transaction_date());
                println!("{:<16} {}", "userDate".cyan(), parsed.user_date);
                println!("{:<16} {}", "userTime".cyan(), parsed.user_time);
            }
        }
        Commands::Period { period, today } => {
            let period = Period::from(*period);
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let system = formatter.date_system();
            let range = period_date_range(period, system, today)?;
            if args.json {
                print_json(&json!({
                    "period": period,
                    "system": system,
                    "start": range.start,
                    "end": range.end,
                    "days": range.num_days(),
                    "timeUnit": period.time_unit(),
                }))?;
            } else {
                let start = format_for_display(&range.start.and_time(chrono::NaiveTime::MIN).and_utc(), false, system);
                let end = format_for_display(&range.end.and_time(chrono::NaiveTime::MIN).and_utc(), false, system);
                println!("{} {} .. {} ({} days)", period.to_string().bold(), start, end, range.num_days());
                println!("  {} .. {}", range.start, range.end);
            }
        }
        Commands::Digits { text, to, group } => {
            if *group && !is_valid_numeric_input(text) {
                return Err(HesabError::invalid_input("amount", format!("'{}' is not a number", text)));
            }
            let target = DigitSystem::from(*to);
            let output = if *group {
                format_with_thousands_separators(text, target)
            } else {
                to_target_digits(text, target)
            };
            if args.json {
                print_json(&json!({ "input": text, "output": output, "digits": target }))?;
            } else {
                println!("{}", output);
            }
        }
        Commands::Policy => {
            let system = formatter.date_system();
            let language = formatter.policy().language();
            if args.json {
                print_json(&json!({
                    "currency": config.default_currency,
                    "language": language,
                    "dateSystem": system,
                    "digits": system.digit_system(),
                }))?;
            } else {
                println!("{:<10} {}", "currency".cyan(), config.default_currency.as_deref().unwrap_or("-"));
                println!("{:<10} {}", "language".cyan(), language);
                println!("{:<10} {}", "calendar".cyan(), system.to_string().bold());
                println!("{:<10} {}", "digits".cyan(), system.digit_system());
            }
        }
        Commands::InitConfig => {
            let path = CliConfig::create_sample()
                .map_err(|e| HesabError::ConfigurationError(format!("Could not write config: {}", e)))?;
            println!("{} Wrote {}", "✓".green(), path.display());
        }
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), HesabError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| HesabError::ConfigurationError(format!("Failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
