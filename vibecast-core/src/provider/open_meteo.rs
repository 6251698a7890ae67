use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config, WeatherReading,
    provider::{CityNotFound, WeatherProvider},
};

const USER_AGENT: &str = concat!("vibecast/", env!("CARGO_PKG_VERSION"));

/// Open-Meteo geocoding + forecast. No API key needed.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

#[derive(Debug, Clone, PartialEq)]
struct Place {
    name: String,
    country: String,
    latitude: f64,
    longitude: f64,
}

impl OpenMeteoProvider {
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_client(http, &config.geocoding_url, &config.forecast_url))
    }

    pub fn with_client(http: Client, geocoding_url: &str, forecast_url: &str) -> Self {
        Self {
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: forecast_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn resolve_place(&self, city: &str) -> Result<Place> {
        let url = format!("{}/v1/search", self.geocoding_url);
        tracing::debug!(%url, city, "Geocoding request");

        let res = self
            .http
            .get(&url)
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await
            .context("Failed to send request to Open-Meteo geocoding")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: GeoResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo geocoding JSON")?;

        let first = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| CityNotFound(city.to_string()))?;

        Ok(Place {
            name: first.name,
            country: first.country,
            latitude: first.latitude,
            longitude: first.longitude,
        })
    }

    async fn fetch_forecast(&self, place: Place) -> Result<WeatherReading> {
        let url = format!("{}/v1/forecast", self.forecast_url);
        tracing::debug!(%url, lat = place.latitude, lon = place.longitude, "Forecast request");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("current_weather", "true".to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum".to_string(),
                ),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Open-Meteo forecast")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Open-Meteo forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).context("Failed to parse Open-Meteo forecast JSON")?;

        let max_c = first_value(&parsed.daily.temperature_2m_max)
            .ok_or_else(|| anyhow!("Open-Meteo forecast contained no daily maximum"))?;
        let min_c = first_value(&parsed.daily.temperature_2m_min)
            .ok_or_else(|| anyhow!("Open-Meteo forecast contained no daily minimum"))?;

        let current = parsed.current_weather;

        Ok(WeatherReading {
            city: place.name,
            country: place.country,
            temperature_c: current.temperature,
            wind_kph: current.windspeed,
            weather_code: current.weathercode,
            is_day: current.is_day != 0,
            max_c,
            min_c,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: i32,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: OmCurrentWeather,
    daily: OmDaily,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn get_weather(&self, city: &str) -> Result<WeatherReading> {
        let place = self.resolve_place(city).await?;
        self.fetch_forecast(place).await
    }
}

/// Today is the first entry of a daily series.
fn first_value(series: &[Option<f64>]) -> Option<f64> {
    series.first().copied().flatten()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
