use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use engine_logging::{engine_info, engine_warn};
use grid_core::{coerce_count, ColumnSpec, GridOptions, Row};
use grid_engine::{AsyncSources, FetchCapability, GridController};
use log::LevelFilter;
use serde_json::Value;

use super::config::{self, AppSettings};
use super::logging::{self, LogDestination};
use super::ui::render::TextRenderer;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

const USAGE: &str = "usage:
  grid_app <rows.json>                     local rows from a JSON array
  grid_app --remote <data-url> <count-url> rows and count from URL templates
  grid_app --init-config                   write ./.grid_config.ron with defaults";

const HELP: &str = "commands: search <text> | sort <field> | page <n|first|last|next|prev> \
| limit <n> | rows <file.json> | refresh | recompile [force] | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Launch {
    Local(PathBuf),
    Remote { data: String, count: String },
    InitConfig,
}

impl Launch {
    fn from_args<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let args: Vec<String> = args.into_iter().collect();
        match args.as_slice() {
            [flag] if flag == "--init-config" => Ok(Launch::InitConfig),
            [flag, data, count] if flag == "--remote" => Ok(Launch::Remote {
                data: data.clone(),
                count: count.clone(),
            }),
            [path] if !path.starts_with("--") => Ok(Launch::Local(PathBuf::from(path))),
            _ => bail!("{USAGE}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageTarget {
    Number(u32),
    First,
    Last,
    Next,
    Previous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Search(String),
    Sort(String),
    Page(PageTarget),
    Limit(usize),
    Rows(PathBuf),
    Refresh,
    Recompile { force: bool },
    Help,
    Quit,
}

impl Command {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let command = match word {
            "search" | "s" => Command::Search(rest.to_string()),
            "sort" | "o" if !rest.is_empty() => Command::Sort(rest.to_string()),
            "page" | "p" => Command::Page(match rest {
                "first" => PageTarget::First,
                "last" => PageTarget::Last,
                "next" | "n" => PageTarget::Next,
                "prev" | "previous" => PageTarget::Previous,
                other => {
                    PageTarget::Number(u32::try_from(coerce_count(other)).unwrap_or(u32::MAX))
                }
            }),
            "limit" | "l" => Command::Limit(coerce_count(rest)),
            "rows" if !rest.is_empty() => Command::Rows(PathBuf::from(rest)),
            "refresh" | "r" => Command::Refresh,
            "recompile" => Command::Recompile {
                force: rest == "force",
            },
            "help" | "?" | "" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => bail!("unknown command {line:?}; {HELP}"),
        };
        Ok(command)
    }
}

pub fn run_app() -> anyhow::Result<()> {
    let launch = Launch::from_args(std::env::args().skip(1))?;
    logging::initialize(LogDestination::from_env(), LevelFilter::Info);

    let cwd = std::env::current_dir().context("no working directory")?;
    if launch == Launch::InitConfig {
        let path = config::write_default_config(&cwd)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let settings = config::load_settings(&cwd);
    let mut grid = build_grid(&launch, settings)?;
    engine_info!("grid_app started: {:?}", launch);
    println!("{HELP}");

    let commands = spawn_stdin_reader();
    loop {
        grid.process_pending();
        match commands.try_recv() {
            Ok(line) => match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => {
                    if let Err(err) = apply(&mut grid, command) {
                        engine_warn!("command failed: {:#}", err);
                        eprintln!("{err:#}");
                    }
                }
                Err(err) => eprintln!("{err}"),
            },
            Err(TryRecvError::Empty) => thread::sleep(POLL_INTERVAL),
            Err(TryRecvError::Disconnected) => break,
        }
    }

    engine_info!("grid_app exiting");
    Ok(())
}

fn build_grid(launch: &Launch, settings: AppSettings) -> anyhow::Result<GridController> {
    let AppSettings {
        grid: config,
        columns,
        default_sorting,
        url_params,
        enable_search,
        disable_pagination,
    } = settings;

    let (mut options, sources) = match launch {
        Launch::Local(path) => {
            let rows = read_rows(path)?;
            let columns = if columns.is_empty() {
                infer_columns(&rows)
            } else {
                columns
            };
            (GridOptions::local(columns, rows), None)
        }
        Launch::Remote { data, count } => {
            if columns.is_empty() {
                bail!("remote grids need columns in {:?}", config::config_path(Path::new(".")));
            }
            let sources = AsyncSources::new(
                FetchCapability::url(data.clone()),
                FetchCapability::url(count.clone()),
            );
            (GridOptions::remote(columns), Some(sources))
        }
        Launch::InitConfig => return Err(anyhow!("nothing to display")),
    };
    options.enable_search = enable_search;
    options.disable_pagination = disable_pagination;
    options.default_sorting = default_sorting;
    options.url_params = url_params;

    let mut builder = GridController::builder(options, Box::new(TextRenderer::stdout())).config(config);
    if let Some(sources) = sources {
        builder = builder.sources(sources);
    }
    Ok(builder.build()?)
}

fn apply(grid: &mut GridController, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Search(term) => grid.search(term),
        Command::Sort(field) => {
            if grid.columns().iter().all(|c| c.field != field) {
                bail!("no column {field:?}");
            }
            grid.order(field);
        }
        Command::Page(target) => {
            let current = grid.state().current_page();
            match target {
                PageTarget::Number(page) => grid.select_page(page),
                PageTarget::First => grid.first_page(),
                PageTarget::Last => grid.last_page(),
                PageTarget::Next => grid.select_page(current.saturating_add(1)),
                PageTarget::Previous => grid.select_page(current.saturating_sub(1)),
            }
        }
        Command::Limit(limit) => grid.set_display_limit(limit),
        Command::Rows(path) => {
            if grid.state().is_async() {
                bail!("rows can only be replaced on a local grid");
            }
            grid.set_rows(read_rows(&path)?);
        }
        Command::Refresh => grid.refresh(),
        Command::Recompile { force } => grid.recompile(force),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn read_rows(path: &Path) -> anyhow::Result<Vec<Row>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    match serde_json::from_str::<Value>(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?
    {
        Value::Array(rows) => Ok(rows),
        _ => bail!("{} must contain a JSON array of rows", path.display()),
    }
}

/// One column per key of the first object row.
fn infer_columns(rows: &[Row]) -> Vec<ColumnSpec> {
    match rows.first() {
        Some(Value::Object(first)) => first
            .keys()
            .map(|key| ColumnSpec::new(key.clone(), key.clone()))
            .collect(),
        _ => vec![ColumnSpec::new("value", "Value")],
    }
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
