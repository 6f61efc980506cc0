use anyhow::Result;
use pico_args::Arguments;
use powerbar::backend::{AlsaBackend, X11Backend};
use powerbar::terminal::{self, TerminalGuard};
use powerbar::*;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

#[derive(Debug)]
struct Args {
    theme: Option<String>,
    width: Option<usize>,
    tick: Option<u64>,
    column_bias: Option<i64>,
    no_mouse: bool,
    once: bool,
    help: bool,
}

impl Args {
    fn from_env() -> Result<Self> {
        let mut args = Arguments::from_env();

        Ok(Self {
            theme: args.opt_value_from_str("--theme")?,
            width: args.opt_value_from_str("--width")?,
            tick: args.opt_value_from_str("--tick")?,
            column_bias: args.opt_value_from_str("--column-bias")?,
            no_mouse: args.contains("--no-mouse"),
            once: args.contains("--once"),
            help: args.contains("--help"),
        })
    }

    fn apply(&self, config: &mut BarConfig) {
        if let Some(theme) = &self.theme {
            config.theme = theme.clone();
        }
        if let Some(width) = self.width {
            config.width = Some(width);
        }
        if let Some(tick) = self.tick {
            config.tick_ms = tick.max(1);
        }
        if let Some(bias) = self.column_bias {
            config.column_bias = bias;
        }
        if self.no_mouse {
            config.mouse = false;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::from_env()?;

    if args.help {
        print_help();
        return Ok(());
    }

    let mut config = load_config();
    args.apply(&mut config);
    if let Ok(json) = serde_json::to_string(&config) {
        debug_with_context("config", &json);
    }

    let width = config.width.unwrap_or_else(terminal::terminal_width);
    debug_with_context("bar", &format!("Bar is {} characters wide", width));

    let theme = themes::get_theme(&config.theme);
    let layout = themes::default_layout(&theme, Rc::new(X11Backend::new()), Rc::new(AlsaBackend::new()));
    let bar = Bar::new(layout, width).with_column_bias(config.column_bias);

    if args.once {
        println!("{}", bar.status().await);
        return Ok(());
    }

    run(&bar, &config).await
}

/// Redraw every tick and after every click until input ends (Ctrl-C).
async fn run(bar: &Bar, config: &BarConfig) -> Result<()> {
    let _terminal = TerminalGuard::enter(config.mouse)?;
    let mut stdout = io::stdout();

    let (tx, mut events) = mpsc::channel(32);
    let input_open = config.mouse;
    if config.mouse {
        tokio::spawn(read_events(tokio::io::stdin(), tx));
    } else {
        drop(tx);
    }

    // A cycle is awaited before the next branch is polled, so renders never
    // overlap; ticks that come due meanwhile are skipped.
    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    terminal::display(&mut stdout, "")?;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let line = bar.status().await;
                terminal::display(&mut stdout, &line)?;
            }
            event = events.recv(), if input_open => match event {
                Some(event) => {
                    if let Some(line) = bar.handle_event(Some(&event)).await {
                        terminal::display(&mut stdout, &line)?;
                    }
                }
                None => break,
            },
        }
    }

    debug("input closed, exiting");
    Ok(())
}

fn print_help() {
    println!("powerbar - single-line terminal status bar");
    println!();
    println!("USAGE:");
    println!("    powerbar [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --theme <THEME>        Theme: dark, light, nord [default: dark]");
    println!("    --width <COLUMNS>      Bar width [default: terminal width at startup]");
    println!("    --tick <MS>            Redraw period in milliseconds [default: 250]");
    println!("    --column-bias <N>      Offset applied to click regions [default: 0]");
    println!("    --no-mouse             Do not enable mouse reporting");
    println!("    --once                 Print a single frame and exit");
    println!("    --help                 Show this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("    POWERBAR_THEME          Override theme");
    println!("    POWERBAR_WIDTH          Override width");
    println!("    POWERBAR_TICK_MS        Override redraw period");
    println!("    POWERBAR_COLUMN_BIAS    Override click region offset");
    println!("    POWERBAR_DEBUG          Enable debug logging");
}
