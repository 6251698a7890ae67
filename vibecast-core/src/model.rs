/// A complete weather reading for one resolved place.
///
/// Readings are produced whole by a lookup and replaced whole by the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub wind_kph: f64,
    pub weather_code: i32,
    pub is_day: bool,
    pub max_c: f64,
    pub min_c: f64,
}

impl WeatherReading {
    pub fn condition(&self) -> Condition {
        Condition::from_code(self.weather_code)
    }
}

/// Display condition derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    PartlyCloudy,
    Rain,
    Snow,
    Thunderstorm,
    Cloudy,
}

impl Condition {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::PartlyCloudy,
            51..=67 => Self::Rain,
            71..=77 => Self::Snow,
            c if c >= 95 => Self::Thunderstorm,
            _ => Self::Cloudy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Cloudy => "Cloudy",
        }
    }

    /// Terminal glyph; clear skies at night get a moon.
    pub fn glyph(&self, is_day: bool) -> &'static str {
        match self {
            Self::Clear if is_day => "☀",
            Self::Clear => "☾",
            Self::PartlyCloudy => "⛅",
            Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Thunderstorm => "⚡",
            Self::Cloudy => "☁",
        }
    }
}

/// Advice derived from a reading. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceResult {
    pub outfit: String,
    pub vibe: String,
    pub food: String,
    pub warning: Option<String>,
}
