//! Satirical headlines for the news ticker.

use rand::Rng;

use crate::advice::{is_raining, pick};

pub const CITY_PLACEHOLDER: &str = "${city}";
pub const TEMP_PLACEHOLDER: &str = "${temp}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsCategory {
    Clear,
    Rain,
    Cold,
    Hot,
    Wind,
}

impl NewsCategory {
    /// First match wins. The cold cut-off here is 6, one degree above the
    /// advice engine's.
    pub fn classify(temperature_c: f64, weather_code: i32, wind_kph: f64) -> Self {
        if is_raining(weather_code) {
            Self::Rain
        } else if temperature_c < 6.0 {
            Self::Cold
        } else if temperature_c > 28.0 {
            Self::Hot
        } else if wind_kph > 20.0 {
            Self::Wind
        } else {
            Self::Clear
        }
    }

    pub const fn all() -> &'static [NewsCategory] {
        &[Self::Clear, Self::Rain, Self::Cold, Self::Hot, Self::Wind]
    }

    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            Self::Clear => &[
                "Sunshine levels in ${city} officially classified as immaculate.",
                "Experts report: blue skies causing unexpected happiness in ${city}.",
                "Local flowers in ${city} are thriving and asking for compliments.",
            ],
            Self::Rain => &[
                "Rainfall in ${city} reaches 'dramatic anime scene' levels.",
                "Umbrellas in ${city} have achieved maximum emotional damage resistance.",
                "Puddles in ${city} now legally qualify as micro-lakes.",
            ],
            Self::Cold => &[
                "Temperature in ${city} has entered 'please stay inside' territory.",
                "Residents seen waddling like penguins across ${city}.",
                "${city} declares emergency sweater weather supremacy.",
            ],
            Self::Hot => &[
                "Heatwave in ${city} has personally offended several citizens.",
                "Locals in ${city} report spontaneous sweating and mild regret.",
                "Officials in ${city} warn: asphalt may now be a lava-type Pokémon.",
            ],
            Self::Wind => &[
                "Wind speeds in ${city} approaching anime cape-flutter levels.",
                "Local hats missing in ${city}; wind is the primary suspect.",
                "${city} residents struggle to look cool while being blown sideways.",
            ],
        }
    }
}

/// Substitute every placeholder in `template`. The city goes in last so a
/// city name is never itself rewritten.
pub fn render(template: &str, city: &str, temperature_c: f64) -> String {
    template
        .replace(TEMP_PLACEHOLDER, &temperature_c.to_string())
        .replace(CITY_PLACEHOLDER, city)
}

pub fn headline<R: Rng + ?Sized>(
    city: &str,
    temperature_c: f64,
    weather_code: i32,
    wind_kph: f64,
    rng: &mut R,
) -> String {
    let category = NewsCategory::classify(temperature_c, weather_code, wind_kph);
    let template = pick(rng, category.templates());
    render(template, city, temperature_c)
}
