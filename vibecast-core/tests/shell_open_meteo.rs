//! End-to-end shell scenarios against a mocked Open-Meteo.

use rand::{SeedableRng, rngs::StdRng};
use serde_json::json;
use std::{sync::Arc, time::Duration};
use vibecast_core::{
    MemoryPreferences, Phase, Shell, ShellOptions, advice::RAIN_OUTFIT_SUFFIX,
    provider::open_meteo::OpenMeteoProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn upstream() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Tokyo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "name": "Tokyo", "country": "Japan", "latitude": 35.6895, "longitude": 139.69171 }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Qwxyzabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generationtime_ms": 0.4 })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "35.6895"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "current_weather": { "temperature": 12.0, "windspeed": 24.0, "weathercode": 63, "is_day": 0 },
            "daily": { "temperature_2m_max": [14.1], "temperature_2m_min": [9.8] }
        })))
        .mount(&server)
        .await;

    server
}

fn shell(server: &MockServer) -> Shell {
    let provider = OpenMeteoProvider::with_client(reqwest::Client::new(), &server.uri(), &server.uri());

    Shell::with_rng(
        Arc::new(provider),
        Box::new(MemoryPreferences::new()),
        ShellOptions { default_city: "Tokyo".into(), tick_interval: Duration::from_secs(12) },
        StdRng::seed_from_u64(11),
    )
}

#[tokio::test]
async fn tokyo_then_unknown_city() {
    let server = upstream().await;
    let mut shell = shell(&server);

    shell.start().await;
    let ready = shell.state();
    assert_eq!(ready.phase, Phase::Ready);

    let reading = ready.reading.expect("reading present");
    assert_eq!((reading.city.as_str(), reading.country.as_str()), ("Tokyo", "Japan"));
    assert!(!reading.is_day);

    let advice = ready.advice.expect("advice present");
    assert!(advice.outfit.ends_with(RAIN_OUTFIT_SUFFIX));
    // Wind above 20 km/h beats the rain warning.
    let warning = advice.warning.expect("warning present");
    assert!(warning.contains("wind") || warning.contains("Wind"), "{warning}");
    assert!(ready.headline.expect("headline present").contains("Tokyo"));

    shell.submit("Qwxyzabc").await;
    let failed = shell.state();
    assert_eq!(failed.phase, Phase::Error);
    assert!(failed.reading.is_none());
    assert!(failed.advice.is_none());
    assert!(failed.headline.is_none());

    shell.dispose().await;
}
