use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use tally_cli::cli::{Cli, Command, StatsView, collect_config_overrides};
use tally_cli::{logger, render};
use tally_core::analytics::{AggregationEngine, Window};
use tally_core::config::{self, Config, merge_overrides, palette_for_theme};
use tally_core::error::AppError;
use tally_core::model::Category;
use tally_core::task_api;
use tracing::{debug, warn};

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn print_json(value: &serde_json::Value) {
    println!("{value}");
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, AppError> {
    match raw {
        None => Ok(None),
        Some(value) => Category::parse(value).map(Some).ok_or_else(|| {
            AppError::invalid_input(format!(
                "category must be daily, monthly or yearly: '{}'",
                value.trim()
            ))
        }),
    }
}

fn effective_config(base: &Config, raw_overrides: &[String]) -> Result<Config, AppError> {
    let overrides = collect_config_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    Ok(merge_overrides(base, &overrides))
}

fn run_stats(
    config: &Config,
    window: Option<u32>,
    view: StatsView,
    json: bool,
) -> Result<(), AppError> {
    let window = match window {
        Some(days) => Window::try_from(days)?,
        None => config.window()?,
    };
    let engine = AggregationEngine::new(config.time_zone()?.resolve());
    let report = task_api::analytics_report(&engine, window)?;
    debug!(window = window.days(), offset = %engine.offset(), "rendering stats");

    match (view, json) {
        (StatsView::Summary, true) => print_json(&render::report_json(&report)),
        (StatsView::Summary, false) => {
            let palette = palette_for_theme(config.theme.as_deref());
            println!("{}", render::summary_plain(&report, &palette));
        }
        (StatsView::Daily, true) => print_json(&render::daily_json(&report.daily)),
        (StatsView::Daily, false) => println!("{}", render::daily_table(&report.daily)),
        (StatsView::Weekday, true) => print_json(&render::weekday_json(&report.weekday)),
        (StatsView::Weekday, false) => println!("{}", render::weekday_table(&report.weekday)),
        (StatsView::Status, true) => print_json(&render::status_json(&report.status)),
        (StatsView::Status, false) => println!("{}", render::status_table(&report.status)),
    }

    Ok(())
}

fn run_command(cli: Cli, base_config: &Config) -> Result<(), AppError> {
    let config = effective_config(base_config, &cli.config_override)?;

    match cli.command {
        Command::Add { text, category } => {
            let text = match text {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("text is required")),
            };
            let category = parse_category(category.as_deref())?;

            let task = task_api::add_task(&text, category)?;
            if cli.json {
                print_json(&render::task_json(&task)?);
            } else {
                println!("Added task: {} ({})", task.text, task.id);
            }
        }
        Command::Toggle { id } => {
            let task = task_api::toggle_task(&id)?;
            if cli.json {
                print_json(&render::task_json(&task)?);
            } else {
                println!(
                    "Marked task {}: {} ({})",
                    render::status_label(&task),
                    task.text,
                    task.id
                );
            }
        }
        Command::Delete { id } => {
            let task = task_api::delete_task(&id)?;
            if cli.json {
                print_json(&render::task_json(&task)?);
            } else {
                println!("Deleted task: {} ({})", task.text, task.id);
            }
        }
        Command::Show { id } => {
            let task = task_api::get_task(&id)?;
            if cli.json {
                print_json(&render::task_json(&task)?);
            } else {
                println!("{}", render::task_line(&task)?);
            }
        }
        Command::List => {
            let tasks = task_api::list_tasks()?;
            if cli.json {
                print_json(&render::tasks_json(&tasks)?);
            } else {
                println!("{}", render::tasks_plain(&tasks)?);
            }
        }
        Command::Stats { window, view } => {
            run_stats(
                &config,
                window,
                view.unwrap_or(StatsView::Summary),
                cli.json,
            )?;
        }
    }

    Ok(())
}

fn run_interactive(base_config: &Config) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tally".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, base_config) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn load_base_config() -> Config {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        warn!(error = %err, "using default configuration");
    }
    loaded.config
}

fn main() {
    logger::init_logging("warn");
    let base_config = load_base_config();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&base_config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                err.exit();
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &base_config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
