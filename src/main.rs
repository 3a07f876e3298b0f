use anyhow::{anyhow, bail, Result};
use chrono::{Datelike, Local};
use daypicker::{
    build_grid,
    calendar::{month_name, WEEKDAY_NAMES},
    config::{config_path, data_dir, AppConfig},
    date::{parse_date, parse_month},
    CalendarGrid, DatePicker,
};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "\
usage:
  dp grid [MONTH] [--selected DATE] [--today DATE] [--json]
  dp session
  dp help

MONTH is YYYY-MM or any date; DATE is YYYY-MM-DD or the configured date_format.";

#[derive(Debug, PartialEq)]
enum Command<'a> {
    Grid(&'a [String]),
    Session,
    Help,
}

fn parse_command(args: &[String]) -> Result<Command<'_>> {
    let rest = args.get(2..).unwrap_or(&[]);
    match args.get(1).map(|s| s.as_str()) {
        None | Some("grid") => Ok(Command::Grid(rest)),
        Some("session") => Ok(Command::Session),
        Some("help" | "-h" | "--help") => Ok(Command::Help),
        Some(other) => bail!("unknown command {other:?}\n\n{USAGE}"),
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    match parse_command(&args)? {
        // ── dp help ───────────────────────────────────────────────────────────
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        // ── dp grid ───────────────────────────────────────────────────────────
        Command::Grid(rest) => {
            let cfg = AppConfig::load()?;
            // Logging to stderr so it doesn't mix with the grid on stdout
            tracing_subscriber::registry()
                .with(env_filter(&cfg))
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            log_config_source();
            cmd_grid(&cfg, rest)
        }
        // ── dp session ────────────────────────────────────────────────────────
        Command::Session => {
            let cfg = AppConfig::load()?;
            let log_dir = data_dir();
            std::fs::create_dir_all(&log_dir)?;
            let file_appender = tracing_appender::rolling::daily(&log_dir, "daypicker.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
            tracing_subscriber::registry()
                .with(env_filter(&cfg))
                .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
                .init();
            log_config_source();
            cmd_session(&cfg)
        }
    }
}

fn log_config_source() {
    let path = config_path();
    if path.exists() {
        tracing::debug!("config loaded from {}", path.display());
    } else {
        tracing::debug!("no config at {}, using defaults", path.display());
    }
}

fn env_filter(cfg: &AppConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.filter))
}

// ─── Grid command ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq)]
struct GridArgs {
    month:    Option<String>,
    selected: Option<String>,
    today:    Option<String>,
    json:     bool,
}

fn parse_grid_args(args: &[String]) -> Result<GridArgs> {
    let mut out  = GridArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--selected" => {
                out.selected = Some(iter.next().ok_or_else(|| anyhow!("--selected needs a date"))?.clone());
            }
            "--today" => {
                out.today = Some(iter.next().ok_or_else(|| anyhow!("--today needs a date"))?.clone());
            }
            "--json" => out.json = true,
            s if s.starts_with("--") => bail!("unknown option {s}\n\n{USAGE}"),
            s if out.month.is_none() => out.month = Some(s.to_owned()),
            s => bail!("unexpected argument {s:?}\n\n{USAGE}"),
        }
    }
    Ok(out)
}

fn cmd_grid(cfg: &AppConfig, args: &[String]) -> Result<()> {
    let args   = parse_grid_args(args)?;
    let format = cfg.picker.date_format.as_str();

    let today = match &args.today {
        Some(s) => parse_date(s, format)?,
        None    => Local::now().date_naive(),
    };
    let month = match &args.month {
        Some(s) => parse_month(s, format)?,
        None    => today,
    };
    let selected = match &args.selected {
        Some(s) => parse_date(s, format)?,
        None    => today,
    };

    let grid = build_grid(month, selected, today)?;
    tracing::debug!("built {} cells for {}", grid.len(), grid.month());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        print!("{}", render_text(&grid));
    }
    Ok(())
}

// ─── Session command ──────────────────────────────────────────────────────────

fn cmd_session(cfg: &AppConfig) -> Result<()> {
    tracing::info!("Starting picker session");

    let format     = cfg.picker.date_format.as_str();
    let mut picker = DatePicker::new(Local::now().date_naive(), cfg.picker.policy)?;
    let stdin      = io::stdin();
    let mut out    = io::stdout();

    writeln!(out, "type  help  for commands")?;
    print_state(&mut out, &picker, format, true)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else { continue };

        let show_grid = match cmd {
            "prev" => match picker.prev_month() {
                Ok(())  => true,
                Err(e)  => { writeln!(out, "✗ {e}")?; continue; }
            },
            "next" => match picker.next_month() {
                Ok(true)  => true,
                Ok(false) => { writeln!(out, "next month is in the future")?; continue; }
                Err(e)    => { writeln!(out, "✗ {e}")?; continue; }
            },
            "today"  => { picker.jump_to_today()?; true }
            "open"   => { picker.open(); true }
            "toggle" => { picker.toggle(); picker.is_open() }
            "close"  => { picker.dismiss(); false }
            "show"   => true,
            "select" => {
                let arg = words.collect::<Vec<_>>().join(" ");
                if let Err(e) = select_date(&mut picker, &arg, format) {
                    tracing::warn!("select {arg:?}: {e}");
                    writeln!(out, "✗ {e}")?;
                    continue;
                }
                false
            }
            "quit" | "exit" => break,
            "help" => {
                writeln!(out, "prev | next | today | open | toggle | close | show | select DATE | quit")?;
                continue;
            }
            other => {
                writeln!(out, "unknown command {other:?}")?;
                continue;
            }
        };
        print_state(&mut out, &picker, format, show_grid)?;
    }

    tracing::info!("Picker session ended, selected {}", picker.selected());
    Ok(())
}

fn select_date(picker: &mut DatePicker, arg: &str, format: &str) -> Result<()> {
    let date = parse_date(arg, format)?;
    picker.select(date)?;
    Ok(())
}

fn print_state(out: &mut impl Write, picker: &DatePicker, format: &str, show_grid: bool) -> Result<()> {
    let next = if picker.can_go_next() { "" } else { "  (next disabled)" };
    writeln!(
        out,
        "selected {}  [{}]{next}",
        picker.selected_label(format),
        if picker.is_open() { "open" } else { "closed" },
    )?;
    if show_grid {
        write!(out, "{}", render_text(picker.grid()))?;
    }
    out.flush()?;
    Ok(())
}

// ─── Text output ──────────────────────────────────────────────────────────────

/// `[dd]` selected, `*dd` today, `.dd` outside the displayed month.
fn render_text(grid: &CalendarGrid) -> String {
    let month = grid.month();
    let mut s = format!("{:^28}\n", format!("{} {}", month_name(month.month()), month.year()));

    let header: String = WEEKDAY_NAMES.iter().map(|n| format!(" {} ", &n[..2])).collect();
    s.push_str(header.trim_end());
    s.push('\n');

    for week in grid.weeks() {
        let line: String = week.into_iter().map(|c| {
            let day = c.date.day();
            if c.is_selected {
                format!("[{day:>2}]")
            } else if c.is_today {
                format!("*{day:>2} ")
            } else if !grid.in_month(c.date) {
                format!(".{day:>2} ")
            } else {
                format!(" {day:>2} ")
            }
        }).collect();
        s.push_str(line.trim_end());
        s.push('\n');
    }
    s
}
