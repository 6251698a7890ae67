//! Terminal rendering of the shell state.

use chrono::Local;
use crossterm::style::{Color, Stylize};
use vibecast_core::{
    Phase, UiState,
    provider::LOOKUP_FAILED_MESSAGE,
    theme::{Palette, Rgb},
};

const NO_WARNING: &str = "No warnings. The sky is behaving.";
const LOADING: &str = "Fetching cute clouds... ☁";
const IDLE: &str = "Type a city and press Enter.";

/// Styling switch; off for pipes and `--no-color`.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    palette: Palette,
    color: bool,
}

impl Painter {
    pub fn new(palette: Palette, color: bool) -> Self {
        Self { palette, color }
    }

    fn fg(&self, text: &str, rgb: Rgb) -> String {
        if self.color { text.with(color(rgb)).to_string() } else { text.to_string() }
    }

    fn bold(&self, text: &str, rgb: Rgb) -> String {
        if self.color { text.with(color(rgb)).bold().to_string() } else { text.to_string() }
    }

    fn banner(&self, text: &str, fg: Rgb, bg: Rgb) -> String {
        if self.color { text.with(color(fg)).on(color(bg)).to_string() } else { text.to_string() }
    }
}

fn color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Round half up, the way the widget always displayed degrees.
pub fn degrees(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Render the whole screen for `state`.
pub fn render(state: &UiState, color: bool) -> String {
    let palette = state.theme.palette();
    let p = Painter::new(palette, color);
    let mut out = Vec::new();

    out.push(format!(
        "{}  {}  [{}]",
        p.banner(" KAWAII WEATHER ", palette.accent, palette.header),
        p.fg("Your Cute Daily Forecast", palette.icon),
        state.theme.display_name(),
    ));
    out.push(String::new());

    match state.phase {
        Phase::Idle => out.push(format!("  {IDLE}")),
        Phase::Loading => out.push(format!("  {}", p.fg(LOADING, palette.icon))),
        Phase::Error => out.push(format!("  {}", p.bold(LOOKUP_FAILED_MESSAGE, Rgb(0xEF, 0x44, 0x44)))),
        Phase::Ready => render_ready(state, &p, &mut out),
    }

    out.join("\n")
}

fn render_ready(state: &UiState, p: &Painter, out: &mut Vec<String>) {
    let (Some(reading), Some(advice)) = (&state.reading, &state.advice) else {
        return;
    };
    let palette = p.palette;
    let condition = reading.condition();

    out.push(format!(
        "  {} {}, {}   {}",
        p.fg(condition.glyph(reading.is_day), palette.icon),
        p.bold(&reading.city, palette.accent),
        reading.country,
        p.fg("LIVE", palette.icon),
    ));
    out.push(format!(
        "  {}   H: {}°  L: {}°   {}",
        p.bold(&format!("{}°", degrees(reading.temperature_c)), palette.accent),
        degrees(reading.max_c),
        degrees(reading.min_c),
        condition.label(),
    ));
    out.push(String::new());

    let label = |text: &str| p.bold(&format!("{text:<11}"), palette.icon);
    out.push(format!("  {} {}", label("Vibe Check"), advice.vibe));
    out.push(format!("  {} {}", label("Fit Check"), advice.outfit));
    out.push(format!(
        "  {} Recommended nutrient intake: {}",
        label("Menu Rec"),
        advice.food
    ));

    let alert = match &advice.warning {
        Some(warning) => p.bold(&format!("⚠ {warning}"), Rgb(0xEF, 0x44, 0x44)),
        None => NO_WARNING.to_string(),
    };
    out.push(format!("  {} {}", label("Alerts"), alert));
    out.push(format!("  {:<11} Wind: {} km/h", "", reading.wind_kph));
    out.push(String::new());

    if let Some(headline) = &state.headline {
        out.push(format!(
            "  {}",
            p.banner(
                &format!(" BREAKING NEWS: {headline} "),
                palette.ticker_text,
                palette.ticker
            )
        ));
    }

    if let Some(at) = state.updated_at {
        out.push(format!("  updated {}", at.with_timezone(&Local).format("%H:%M")));
    }
}
