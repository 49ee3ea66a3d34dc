use clap::{CommandFactory, Parser};
use std::io::{self, BufRead, Write};
use tabled::{Table, Tabled};
use taskmaster_cli::banner::ConsoleBanner;
use taskmaster_cli::cli::{Cli, Command};
use taskmaster_core::config::{self, Palette};
use taskmaster_core::error::TaskError;
use taskmaster_core::manager::TaskListManager;
use taskmaster_core::model::Task;
use taskmaster_core::storage::json_store::JsonStore;

fn status_label(completed: bool) -> &'static str {
    if completed { "completed" } else { "pending" }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn print_tasks_plain(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks yet. Add one to get started!");
        return;
    }

    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| TaskRow {
            id: task.id.clone(),
            text: task.text.clone(),
            status: status_label(task.completed).to_string(),
            created: task.created_at.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

fn task_json(task: &Task) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "text": task.text,
        "completed": task.completed,
        "status": status_label(task.completed),
        "createdAt": task.created_at,
    })
}

fn print_tasks_json(tasks: &[Task]) {
    let payload: Vec<serde_json::Value> = tasks.iter().map(task_json).collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn report_store_warning(warning: &Option<TaskError>) {
    if let Some(err) = warning {
        eprintln!("WARNING: changes may not survive a reload: {err}");
    }
}

fn confirm(prompt: &str, reader: &mut dyn BufRead) -> Result<bool, TaskError> {
    print!("{prompt} [y/N] ");
    io::stdout()
        .flush()
        .map_err(|err| TaskError::store(err.to_string()))?;

    let mut answer = String::new();
    reader
        .read_line(&mut answer)
        .map_err(|err| TaskError::store(err.to_string()))?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

fn normalize_parse_error(err: clap::Error) -> String {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string()
}

fn split_command_line(line: &str) -> Result<Vec<String>, String> {
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
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err("unterminated quote in command".to_string());
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

fn run_command(
    cli: Cli,
    manager: &mut TaskListManager,
    reader: &mut dyn BufRead,
) -> Result<(), TaskError> {
    match cli.command {
        Command::Add { text } => {
            let outcome = manager.add_task(text.as_deref().unwrap_or_default())?;
            report_store_warning(&outcome.store_warning);
            if cli.json {
                println!("{}", task_json(&outcome.value));
            }
        }
        Command::Toggle { id } => {
            let outcome = manager.toggle_completion(&id)?;
            report_store_warning(&outcome.store_warning);
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "id": id, "completed": outcome.value })
                );
            }
        }
        Command::Delete { id } => {
            let outcome = manager.delete_task(&id)?;
            report_store_warning(&outcome.store_warning);
            if cli.json {
                println!("{}", task_json(&outcome.value));
            }
        }
        Command::Clear { yes, all } => {
            if all {
                let total = manager.stats().total;
                if total == 0 {
                    println!("Nothing to clear");
                    return Ok(());
                }
                if !yes && !confirm(&format!("Delete all {total} task(s)?"), reader)? {
                    println!("Aborted");
                    return Ok(());
                }
                let outcome = manager.clear_all();
                if cli.json {
                    println!("{}", serde_json::json!({ "cleared": outcome.value }));
                }
            } else {
                let count = manager.preview_clear_completed();
                if count == 0 {
                    // Soft condition, not a failure.
                    println!("No completed tasks to clear");
                    return Ok(());
                }
                if !yes && !confirm(&format!("Delete {count} completed task(s)?"), reader)? {
                    println!("Aborted");
                    return Ok(());
                }
                let outcome = manager.clear_completed()?;
                report_store_warning(&outcome.store_warning);
                if cli.json {
                    println!("{}", serde_json::json!({ "cleared": outcome.value }));
                }
            }
        }
        Command::List => {
            if cli.json {
                print_tasks_json(manager.tasks());
            } else {
                print_tasks_plain(manager.tasks());
            }
        }
        Command::Stats => {
            let stats = manager.stats();
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string(&stats)
                        .map_err(|err| TaskError::store(err.to_string()))?
                );
            } else {
                println!(
                    "total {} | completed {} | pending {}",
                    stats.total, stats.completed, stats.pending
                );
            }
        }
    }

    Ok(())
}

fn run_interactive(manager: &mut TaskListManager) -> Result<(), TaskError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| TaskError::store(err.to_string()))?;

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
        argv.push("taskmaster".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if err.use_stderr() => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
            Err(err) => {
                let _ = err.print();
                continue;
            }
        };

        if let Err(err) = run_command(cli, manager, &mut stdin_lock) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn report_load_diagnostics(manager: &TaskListManager, palette: &Palette) {
    if manager.load_recovered() {
        println!(
            "{}",
            palette.alertize("Stored tasks were corrupted; storage has been reset.")
        );
    }
    if manager.load_dropped() > 0 {
        println!(
            "{}",
            palette.alertize(&format!(
                "Ignored {} malformed stored task(s).",
                manager.load_dropped()
            ))
        );
    }
}

fn main() {
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.start())
        .ok();

    let mut args = std::env::args_os();
    args.next();
    let interactive = args.next().is_none();

    let cli = if interactive {
        None
    } else {
        match Cli::try_parse() {
            Ok(cli) => Some(cli),
            Err(err) if err.use_stderr() => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                std::process::exit(1);
            }
            Err(err) => {
                // --help and --version render on stdout and exit cleanly.
                let _ = err.print();
                return;
            }
        }
    };

    let config_load = config::load_config_with_fallback();
    if let Some(err) = config_load.error.as_ref() {
        eprintln!("WARNING: {err}");
    }
    let palette = config::palette_for_theme(config_load.config.theme.as_deref());

    let store = match JsonStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };
    log::info!("using task store at {}", store.path().display());
    let mut manager = TaskListManager::open(store);

    let json = cli.as_ref().map(|cli| cli.json).unwrap_or(false);
    if !json {
        report_load_diagnostics(&manager, &palette);
        manager.subscribe(Box::new(ConsoleBanner::new(palette)));
    }

    match cli {
        Some(cli) => {
            let stdin = io::stdin();
            let mut stdin_lock = stdin.lock();
            if let Err(err) = run_command(cli, &mut manager, &mut stdin_lock) {
                eprintln!("ERROR: {}", err);
                std::process::exit(1);
            }
        }
        None => {
            if let Err(err) = run_interactive(&mut manager) {
                eprintln!("ERROR: {}", err);
                std::process::exit(1);
            }
        }
    }
}
