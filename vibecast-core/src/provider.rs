use crate::{Config, WeatherReading, provider::open_meteo::OpenMeteoProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Message shown whenever a lookup fails, whatever the cause.
pub const LOOKUP_FAILED_MESSAGE: &str = "Oops! Couldn't find that city. Try \"London\" or \"Tokyo\"!";

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Resolve `city` and fetch its current weather and today's range.
    async fn get_weather(&self, city: &str) -> anyhow::Result<WeatherReading>;
}

/// The geocoder had no match for the query.
#[derive(Debug, thiserror::Error)]
#[error("No place matches '{0}'")]
pub struct CityNotFound(pub String);

/// The only failure callers see. Not-found, transport and parse failures all
/// collapse into it; the cause is logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", LOOKUP_FAILED_MESSAGE)]
pub struct LookupFailed;

/// Single-attempt lookup of `city_query`.
pub async fn lookup(
    provider: &dyn WeatherProvider,
    city_query: &str,
) -> Result<WeatherReading, LookupFailed> {
    let query = city_query.trim();
    if query.is_empty() {
        tracing::warn!("Refusing to look up a blank city");
        return Err(LookupFailed);
    }

    match provider.get_weather(query).await {
        Ok(reading) => {
            tracing::info!(
                query,
                city = %reading.city,
                country = %reading.country,
                "Weather lookup succeeded"
            );
            Ok(reading)
        }
        Err(err) => {
            tracing::warn!(query, "Weather lookup failed: {err:#}");
            Err(LookupFailed)
        }
    }
}

/// Construct the weather provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    Ok(Box::new(OpenMeteoProvider::from_config(config)?))
}
