#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::alerts;
use crate::application::dashboard;
use crate::application::filings;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::AlertCondition;
use crate::domain::models::AlertType;
use crate::domain::models::ArchivedSession;
use crate::domain::models::FontSize;
use crate::domain::models::NotificationChannel;
use crate::domain::models::SessionKey;
use crate::domain::models::ThemeMode;
use crate::domain::models::WidgetSize;
use crate::domain::services::actions::help_text;
use crate::domain::services::ChatArchive;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn format_session(session: &ArchivedSession) -> String {
    let mut res = format!(
        "- {} {} ({}), {} message(s)",
        session.key.ticker,
        session.key.accession_number,
        session.timestamp,
        session.session.messages.len()
    );

    if let Some(first) = session.session.messages.first() {
        let mut line = first.text().split('\n').next().unwrap_or_default().to_string();
        if line.chars().count() >= 70 {
            line = format!("{}...", line.chars().take(67).collect::<String>());
        }
        res = format!("{res}, {line}");
    }

    return res;
}

async fn print_sessions_list() -> Result<()> {
    let mut sessions = ChatArchive::default()
        .list()
        .await?
        .iter()
        .map(|session| {
            return format_session(session);
        })
        .collect::<Vec<String>>();

    sessions.reverse();

    if sessions.is_empty() {
        println!("There are no archived chats yet. Start one with `filingsdesk chat`.");
    } else {
        println!("{}", sessions.join("\n"));
    }

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn session_key(matches: &ArgMatches) -> Result<SessionKey> {
    let ticker = matches.get_one::<String>("ticker");
    let accession = matches.get_one::<String>("accession");
    match (ticker, accession) {
        (Some(ticker), Some(accession)) => return Ok(SessionKey::new(ticker, accession)),
        _ => bail!("Both --ticker and --accession are required"),
    }
}

fn arg_ticker() -> Arg {
    return Arg::new("ticker")
        .short('t')
        .long("ticker")
        .help("Company ticker symbol, e.g. AAPL.")
        .num_args(1)
        .required(true);
}

fn arg_accession() -> Arg {
    return Arg::new("accession")
        .short('a')
        .long("accession")
        .help("SEC accession number of the filing, e.g. 0000320193-23-000106.")
        .num_args(1)
        .required(true);
}

fn arg_alert_id() -> Arg {
    return Arg::new("id")
        .short('i')
        .long("id")
        .help("Alert ID, as shown by `alerts list`.")
        .num_args(1)
        .required(true);
}

fn alert_definition_args(cmd: Command, required: bool) -> Command {
    return cmd
        .arg(
            Arg::new("symbol")
                .short('s')
                .long("symbol")
                .help("Ticker symbol to watch.")
                .num_args(1)
                .required(required),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .help("What to watch.")
                .num_args(1)
                .value_parser(PossibleValuesParser::new(AlertType::VARIANTS))
                .required(required),
        )
        .arg(
            Arg::new("condition")
                .long("condition")
                .help("above/below for price and volume, positive/negative/any for news, any for earnings.")
                .num_args(1)
                .value_parser(PossibleValuesParser::new(AlertCondition::VARIANTS)),
        )
        .arg(
            Arg::new("value")
                .long("value")
                .help("Threshold for price and volume alerts.")
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("notify")
                .long("notify")
                .help("Comma separated notification channels. [default: push]")
                .num_args(1)
                .value_delimiter(',')
                .action(ArgAction::Append)
                .value_parser(PossibleValuesParser::new(NotificationChannel::VARIANTS)),
        );
}

fn subcommand_alerts() -> Command {
    let create = alert_definition_args(
        Command::new("create").about("Create a new alert."),
        true,
    )
    .arg(
        Arg::new("inactive")
            .long("inactive")
            .help("Create the alert paused.")
            .action(ArgAction::SetTrue),
    );

    let update = alert_definition_args(
        Command::new("update").about("Change fields of an existing alert."),
        false,
    )
    .arg(arg_alert_id())
    .arg(
        Arg::new("active")
            .long("active")
            .help("Resume (true) or pause (false) the alert.")
            .num_args(1)
            .value_parser(value_parser!(bool)),
    );

    return Command::new("alerts")
        .about("Manage price, volume, news and earnings alerts.")
        .arg_required_else_help(true)
        .subcommand(create)
        .subcommand(Command::new("list").about("List all alerts."))
        .subcommand(update)
        .subcommand(
            Command::new("toggle")
                .about("Pause an active alert or resume a paused one.")
                .arg(arg_alert_id()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete an alert.")
                .arg(arg_alert_id()),
        )
        .subcommand(
            Command::new("check")
                .about("Evaluate all active alerts once.")
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Report what would fire without notifying or recording triggers.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("watch").about("Evaluate active alerts every alert-interval seconds until stopped."));
}

fn subcommand_chat() -> Command {
    return Command::new("chat")
        .about("Chat about a filing. Previous conversations about the same filing are restored.")
        .arg(arg_ticker())
        .arg(arg_accession());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    let mut cmd = Command::new("debug");
    cmd = cmd.about("Debug helpers for Filingsdesk")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Filingsdesk with environment variable RUST_LOG=filingsdesk")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );

    return cmd;
}

fn subcommand_filings() -> Command {
    return Command::new("filings")
        .about("Browse SEC filings.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List a company's filings grouped by year, quarter and form type.")
                .arg(arg_ticker()),
        )
        .subcommand(
            Command::new("show")
                .about("Print a filing as text.")
                .arg(arg_ticker())
                .arg(arg_accession())
                .arg(
                    Arg::new("chunk")
                        .long("chunk")
                        .help("HTML chunk to locate. Only the text from that chunk onwards is printed.")
                        .num_args(1),
                ),
        );
}

fn subcommand_grid() -> Command {
    return Command::new("grid")
        .about("Convert widget pixel sizes into dashboard grid units.")
        .arg(
            Arg::new("width")
                .long("width")
                .help("Widget width in pixels.")
                .num_args(1)
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .help("Widget height in pixels.")
                .num_args(1)
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("size")
                .long("size")
                .help("Use the pixel size of a predefined widget size.")
                .num_args(1)
                .value_parser(PossibleValuesParser::new(WidgetSize::VARIANTS)),
        )
        .arg(
            Arg::new("grid-width")
                .long("grid-width")
                .help("Total grid width in pixels. [default: 1200]")
                .num_args(1)
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("round")
                .long("round")
                .help("Snap to whole grid cells.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("layout")
                .long("layout")
                .help("Print the grid layout of the default dashboard as JSON.")
                .action(ArgAction::SetTrue),
        )
        .group(ArgGroup::new("dimensions").args(["width", "size"]).multiple(false));
}

fn subcommand_market() -> Command {
    return Command::new("market")
        .about("Market data and indicator helpers.")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("quote")
                .about("Show current (simulated) quotes.")
                .arg(
                    Arg::new("symbols")
                        .long("symbols")
                        .help("Comma separated ticker symbols.")
                        .num_args(1)
                        .value_delimiter(',')
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Indicators and risk figures for a series of closing prices.")
                .arg(
                    Arg::new("prices")
                        .long("prices")
                        .help("Comma separated closing prices, oldest first.")
                        .num_args(1)
                        .value_delimiter(',')
                        .value_parser(value_parser!(f64))
                        .required(true),
                )
                .arg(
                    Arg::new("benchmark")
                        .long("benchmark")
                        .help("Benchmark closing prices over the same periods, used for beta.")
                        .num_args(1)
                        .value_delimiter(',')
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("period")
                        .long("period")
                        .help("Window for SMA, EMA and RSI. [default: 14]")
                        .num_args(1)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("years")
                        .long("years")
                        .help("Years covered by the series, enables CAGR.")
                        .num_args(1)
                        .value_parser(value_parser!(f64)),
                ),
        );
}

fn subcommand_prefs() -> Command {
    return Command::new("prefs")
        .about("Display preferences shared with the dashboard.")
        .arg_required_else_help(true)
        .subcommand(Command::new("show").about("Print the stored preferences."))
        .subcommand(
            Command::new("set")
                .about("Change one or more preferences.")
                .arg(
                    Arg::new("theme")
                        .long("theme")
                        .num_args(1)
                        .value_parser(PossibleValuesParser::new(ThemeMode::VARIANTS)),
                )
                .arg(
                    Arg::new("font-size")
                        .long("font-size")
                        .num_args(1)
                        .value_parser(PossibleValuesParser::new(FontSize::VARIANTS)),
                )
                .arg(
                    Arg::new("high-contrast")
                        .long("high-contrast")
                        .num_args(1)
                        .value_parser(value_parser!(bool)),
                )
                .group(
                    ArgGroup::new("prefs-args")
                        .args(["theme", "font-size", "high-contrast"])
                        .multiple(true)
                        .required(true),
                ),
        );
}

fn subcommand_sessions_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all archived chats.")
        .arg(
            clap::Arg::new("ticker")
                .short('t')
                .long("ticker")
                .help("Company ticker symbol")
                .num_args(1)
                .requires("accession"),
        )
        .arg(
            clap::Arg::new("accession")
                .short('a')
                .long("accession")
                .help("Accession number of the filing")
                .num_args(1)
                .requires("ticker"),
        )
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all archived chats.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("delete-args")
                .args(["ticker", "all"])
                .required(true),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage archived chats.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the chat archive directory path."))
        .subcommand(Command::new("list").about("List all archived chats."))
        .subcommand(subcommand_sessions_delete());
}

fn global_arg(key: ConfigKey, help: &str) -> Arg {
    let default = Config::default(key);
    let help = if default.is_empty() || key == ConfigKey::DataDir {
        help.to_string()
    } else {
        format!("{help} [default: {default}]")
    };

    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(format!(
            "FILINGSDESK_{}",
            key.to_string().to_uppercase().replace('-', "_")
        ))
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("CITATIONS:") {
                return format!("CHAT {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("filingsdesk")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(true)
        .subcommand(subcommand_alerts())
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_filings())
        .subcommand(subcommand_grid())
        .subcommand(subcommand_market())
        .subcommand(subcommand_prefs())
        .subcommand(subcommand_sessions())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("FILINGSDESK_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(global_arg(ConfigKey::ApiUrl, "Base URL of the filings API."))
        .arg(global_arg(ConfigKey::ApiToken, "Bearer token sent to the filings API."))
        .arg(global_arg(
            ConfigKey::BackendHealthCheckTimeout,
            "Time to wait in milliseconds before timing out when health checking the filings API.",
        ))
        .arg(global_arg(ConfigKey::DataDir, "Directory for alerts, preferences and archived chats."))
        .arg(global_arg(ConfigKey::AlertInterval, "Seconds between alert checks while watching."))
        .arg(global_arg(ConfigKey::AlertCooldown, "Minutes an alert stays quiet after firing."))
        .arg(global_arg(ConfigKey::HighlightDelay, "Milliseconds a cited passage stays highlighted."))
        .arg(global_arg(ConfigKey::EmailUrl, "HTTP endpoint of the mail relay used for email notifications."))
        .arg(global_arg(ConfigKey::EmailToken, "Bearer token sent to the mail relay."))
        .arg(global_arg(ConfigKey::EmailTo, "Recipient address for email notifications."));
}

/// The matches of the chosen subcommand path, outermost first.
fn matches_chain(matches: &ArgMatches) -> Vec<&ArgMatches> {
    let mut chain = vec![matches];
    let mut current = matches;
    while let Some((_, sub)) = current.subcommand() {
        chain.push(sub);
        current = sub;
    }

    return chain;
}

/// Handles every subcommand that finishes on its own. Returns the filing to
/// chat about when the chat REPL should start.
pub async fn parse() -> Result<Option<SessionKey>> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    let log_path = dirs::cache_dir()
                        .unwrap_or_default()
                        .join("filingsdesk/debug.log");
                    println!("{}", log_path.to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(None);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(None);
        }
        Some(("config", subcmd_matches)) => {
            match subcmd_matches.subcommand() {
                Some(("create", _)) => create_config_file().await?,
                Some(("default", _)) => println!("{}", Config::serialize_default(build())),
                Some(("path", _)) => println!("{}", Config::default(ConfigKey::ConfigFile)),
                _ => subcommand_config().print_long_help()?,
            }
            return Ok(None);
        }
        _ => {}
    }

    Config::load(build(), matches_chain(&matches)).await?;

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            return Ok(Some(session_key(subcmd_matches)?));
        }
        Some(("alerts", subcmd_matches)) => {
            if !alerts::run(subcmd_matches).await? {
                subcommand_alerts().print_long_help()?;
            }
        }
        Some(("filings", subcmd_matches)) => {
            if !filings::run(subcmd_matches).await? {
                subcommand_filings().print_long_help()?;
            }
        }
        Some((name @ ("grid" | "market" | "prefs"), subcmd_matches)) => {
            if !dashboard::run(name, subcmd_matches).await? {
                build().print_long_help()?;
            }
        }
        Some(("sessions", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("dir", _)) => {
                println!("{}", ChatArchive::default().dir.to_string_lossy());
            }
            Some(("list", _)) => {
                print_sessions_list().await?;
            }
            Some(("delete", delete_matches)) => {
                if delete_matches.get_flag("all") {
                    ChatArchive::default().delete_all().await?;
                    println!("Deleted all archived chats");
                } else {
                    let key = session_key(delete_matches)?;
                    ChatArchive::default().delete(&key).await?;
                    println!("Deleted chat about {key}");
                }
            }
            _ => {
                subcommand_sessions().print_long_help()?;
            }
        },
        _ => {
            build().print_long_help()?;
        }
    }

    return Ok(None);
}
