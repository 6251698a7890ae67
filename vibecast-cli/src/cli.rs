use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Select;
use std::{
    io::{IsTerminal, Write},
    sync::Arc,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use vibecast_core::{
    Config, FilePreferences, LookupFailed, MemoryPreferences, PreferenceStore, Shell,
    ShellOptions, Theme, WeatherProvider, WeatherReading, lookup,
    preferences::{load_theme, save_theme},
    provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "vibecast", version, about = "Weather with opinions")]
pub struct Cli {
    /// Use this theme for this run without saving it.
    #[arg(long, global = true)]
    pub theme: Option<Theme>,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather and advice for a city once.
    Show {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Keep the forecast on screen; type a city to switch, `:theme <name>` or `:quit`.
    Watch {
        /// City name; defaults to the configured city.
        city: Option<String>,
    },

    /// Set the saved theme; without a name, pick one interactively.
    Theme {
        /// One of: sakura, bubblegum, midnight, cotton.
        name: Option<Theme>,
    },

    /// Print the config file location and effective settings.
    Config {
        /// Write the effective settings to the config file.
        #[arg(long)]
        init: bool,
    },
}

/// One line of `watch` input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Quit,
    Theme(String),
    City(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();

    if line.is_empty() {
        Input::Empty
    } else if line == ":quit" || line == ":q" {
        Input::Quit
    } else if let Some(name) = line
        .strip_prefix(":theme")
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        Input::Theme(name.trim().to_string())
    } else {
        Input::City(line.to_string())
    }
}

type LookupDone = (u64, Result<WeatherReading, LookupFailed>);

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let color = !self.no_color && std::io::stdout().is_terminal();

        match self.command {
            Command::Show { city } => {
                let config = Config::load()?;
                let mut shell = build_shell(&config, self.theme)?;

                match city {
                    Some(city) => shell.submit(&city).await,
                    None => shell.start().await,
                }
                let state = shell.state();
                shell.dispose().await;

                if state.is_error() {
                    return Err(LookupFailed.into());
                }
                println!("{}", render::render(&state, color));
            }
            Command::Watch { city } => {
                let config = Config::load()?;
                let shell = build_shell(&config, self.theme)?;
                watch(shell, city.as_deref(), color).await?;
            }
            Command::Theme { name } => {
                let mut prefs = FilePreferences::open_default()?;
                let theme = match name {
                    Some(theme) => theme,
                    None => pick_theme(load_theme(&prefs))?,
                };
                save_theme(&mut prefs, theme)?;
                println!("Theme set to {theme}");
            }
            Command::Config { init } => {
                let path = Config::config_file_path()?;
                let config = Config::load()?;
                if init {
                    config.save()?;
                    println!("Wrote {}", path.display());
                } else {
                    println!("# {}", path.display());
                }
                print!("{}", config.to_toml()?);
            }
        }

        Ok(())
    }
}

fn build_shell(config: &Config, theme: Option<Theme>) -> anyhow::Result<Shell> {
    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(config)?);

    let preferences: Box<dyn PreferenceStore> = match FilePreferences::open_default() {
        Ok(prefs) => Box::new(prefs),
        Err(err) => {
            tracing::warn!("Preferences unavailable, using defaults: {err:#}");
            Box::new(MemoryPreferences::new())
        }
    };

    let mut shell = Shell::new(provider, preferences, ShellOptions::from(config));
    if let Some(theme) = theme {
        shell.preview_theme(theme);
    }

    Ok(shell)
}

fn pick_theme(current: Theme) -> anyhow::Result<Theme> {
    let themes = Theme::all().to_vec();
    let cursor = themes.iter().position(|t| *t == current).unwrap_or(0);

    Select::new("Theme:", themes)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Theme selection cancelled")
}

/// Start a lookup in the background; the result comes back on `done`.
fn spawn_lookup(shell: &mut Shell, query: &str, done: &mpsc::Sender<LookupDone>) {
    let Some(request) = shell.begin_lookup(query) else {
        return;
    };

    let provider = shell.provider();
    let done = done.clone();
    tokio::spawn(async move {
        let result = lookup(provider.as_ref(), &request.query).await;
        // The receiver is gone only when watch is exiting.
        let _ = done.send((request.id, result)).await;
    });
}

async fn watch(mut shell: Shell, city: Option<&str>, color: bool) -> anyhow::Result<()> {
    let mut states = shell.subscribe();
    let (done_tx, mut done_rx) = mpsc::channel::<LookupDone>(8);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    draw(&states.borrow_and_update(), color)?;
    match city {
        Some(city) => spawn_lookup(&mut shell, city, &done_tx),
        None => shell.start().await,
    }

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                draw(&state, color)?;
            }
            Some((id, result)) = done_rx.recv() => {
                shell.finish_lookup(id, result);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Empty => {}
                    Input::Quit => break,
                    Input::Theme(name) => match name.parse::<Theme>() {
                        Ok(theme) => {
                            if let Err(err) = shell.set_theme(theme) {
                                tracing::warn!("Failed to save theme: {err:#}");
                            }
                        }
                        Err(err) => eprintln!("{err}"),
                    },
                    Input::City(query) => spawn_lookup(&mut shell, &query, &done_tx),
                }
            }
        }
    }

    shell.dispose().await;
    Ok(())
}

fn draw(state: &vibecast_core::UiState, color: bool) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();

    if color {
        crossterm::execute!(
            stdout,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
            crossterm::cursor::MoveTo(0, 0)
        )?;
    }

    writeln!(stdout, "{}\n", render::render(state, color))?;
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}
