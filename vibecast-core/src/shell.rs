//! Orchestration of lookups, advice, headlines and the headline ticker.
//!
//! The shell owns one [`UiState`] published on a watch channel. Every
//! transition replaces the whole value; renderers subscribe and redraw.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    Config,
    advice::advise,
    model::{AdviceResult, WeatherReading},
    news::headline,
    preferences::{PreferenceStore, load_theme, save_theme},
    provider::{LookupFailed, WeatherProvider, lookup},
    theme::Theme,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Everything a renderer needs, as one value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiState {
    pub phase: Phase,
    pub query: String,
    pub reading: Option<WeatherReading>,
    pub advice: Option<AdviceResult>,
    pub headline: Option<String>,
    pub theme: Theme,
    /// When the current reading arrived.
    pub updated_at: Option<DateTime<Utc>>,
    /// Bumped each time a reading is stored; ticks for older readings are ignored.
    pub generation: u64,
}

impl UiState {
    fn initial(query: &str, theme: Theme) -> Self {
        Self { query: query.to_string(), theme, ..Self::default() }
    }

    pub fn is_error(&self) -> bool {
        self.phase == Phase::Error
    }

    fn loading(&self, query: &str) -> Self {
        Self { phase: Phase::Loading, query: query.to_string(), ..self.clone() }
    }

    fn ready(
        &self,
        reading: WeatherReading,
        advice: AdviceResult,
        headline: String,
        generation: u64,
    ) -> Self {
        Self {
            phase: Phase::Ready,
            reading: Some(reading),
            advice: Some(advice),
            headline: Some(headline),
            updated_at: Some(Utc::now()),
            generation,
            ..self.clone()
        }
    }

    fn failed(&self) -> Self {
        Self {
            phase: Phase::Error,
            reading: None,
            advice: None,
            headline: None,
            updated_at: None,
            ..self.clone()
        }
    }

    fn with_headline(&self, headline: String) -> Self {
        Self { headline: Some(headline), ..self.clone() }
    }

    fn with_theme(&self, theme: Theme) -> Self {
        Self { theme, ..self.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOptions {
    /// City fetched by [`Shell::start`].
    pub default_city: String,
    pub tick_interval: Duration,
}

impl From<&Config> for ShellOptions {
    fn from(config: &Config) -> Self {
        Self {
            default_city: config.default_city.clone(),
            tick_interval: config.ticker_interval(),
        }
    }
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// A lookup the shell is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub id: u64,
    pub query: String,
}

#[derive(Debug)]
struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct Shell {
    provider: Arc<dyn WeatherProvider>,
    preferences: Box<dyn PreferenceStore>,
    options: ShellOptions,
    rng: StdRng,
    state: Arc<watch::Sender<UiState>>,
    ticker: Option<Ticker>,
    latest_request: u64,
    generation: u64,
}

impl Shell {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        preferences: Box<dyn PreferenceStore>,
        options: ShellOptions,
    ) -> Self {
        Self::with_rng(provider, preferences, options, StdRng::from_entropy())
    }

    pub fn with_rng(
        provider: Arc<dyn WeatherProvider>,
        preferences: Box<dyn PreferenceStore>,
        options: ShellOptions,
        rng: StdRng,
    ) -> Self {
        let theme = load_theme(preferences.as_ref());
        let (state, _) = watch::channel(UiState::initial(&options.default_city, theme));

        Self {
            provider,
            preferences,
            options,
            rng,
            state: Arc::new(state),
            ticker: None,
            latest_request: 0,
            generation: 0,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn provider(&self) -> Arc<dyn WeatherProvider> {
        Arc::clone(&self.provider)
    }

    pub fn preferences(&self) -> &dyn PreferenceStore {
        self.preferences.as_ref()
    }

    /// Initial fetch of the configured default city.
    pub async fn start(&mut self) {
        let city = self.options.default_city.clone();
        self.submit(&city).await;
    }

    /// Look up `query` and apply the result. Blank queries are ignored.
    pub async fn submit(&mut self, query: &str) {
        let Some(request) = self.begin_lookup(query) else {
            return;
        };

        let result = lookup(self.provider.as_ref(), &request.query).await;
        self.finish_lookup(request.id, result);
    }

    /// Enter `Loading` for `query` and hand back the request to resolve.
    /// Returns `None` for a blank query.
    pub fn begin_lookup(&mut self, query: &str) -> Option<LookupRequest> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.latest_request += 1;
        self.transition(|s| s.loading(query));
        tracing::info!(query, request = self.latest_request, "Lookup started");

        Some(LookupRequest { id: self.latest_request, query: query.to_string() })
    }

    /// Apply a lookup result. Results for anything but the newest request are
    /// dropped; returns whether the result was applied.
    pub fn finish_lookup(
        &mut self,
        request_id: u64,
        result: Result<WeatherReading, LookupFailed>,
    ) -> bool {
        if request_id != self.latest_request {
            tracing::debug!(request_id, latest = self.latest_request, "Dropping stale lookup result");
            return false;
        }

        self.stop_ticker();

        match result {
            Ok(reading) => {
                self.generation += 1;
                let generation = self.generation;

                let advice =
                    advise(reading.temperature_c, reading.weather_code, reading.wind_kph, &mut self.rng);
                let text = headline(
                    &reading.city,
                    reading.temperature_c,
                    reading.weather_code,
                    reading.wind_kph,
                    &mut self.rng,
                );

                self.start_ticker(reading.clone(), generation);
                self.transition(|s| s.ready(reading, advice, text, generation));
                tracing::info!(generation, "Reading stored");
            }
            Err(LookupFailed) => {
                self.transition(UiState::failed);
                tracing::info!("Lookup failed; reading discarded");
            }
        }

        true
    }

    /// Switch theme and write it through to the preference store. The theme
    /// is applied even if persisting it fails.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.preview_theme(theme);
        save_theme(self.preferences.as_mut(), theme)
    }

    /// Switch theme for this session only.
    pub fn preview_theme(&mut self, theme: Theme) {
        self.transition(|s| s.with_theme(theme));
    }

    /// Stop the ticker and wait for it to finish.
    pub async fn dispose(mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel.cancel();
            if let Err(err) = ticker.handle.await {
                tracing::warn!("Headline ticker ended abnormally: {err}");
            }
        }
    }

    fn transition(&self, next: impl FnOnce(&UiState) -> UiState) {
        self.state.send_modify(|s| *s = next(s));
    }

    fn start_ticker(&mut self, reading: WeatherReading, generation: u64) {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let state = Arc::clone(&self.state);
        let period = self.options.tick_interval;
        let mut rng = StdRng::seed_from_u64(self.rng.r#gen());

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        let text = headline(
                            &reading.city,
                            reading.temperature_c,
                            reading.weather_code,
                            reading.wind_kph,
                            &mut rng,
                        );
                        state.send_if_modified(|s| {
                            if s.generation != generation || s.reading.is_none() {
                                return false;
                            }
                            *s = s.with_headline(text);
                            true
                        });
                    }
                }
            }

            tracing::debug!(generation, "Headline ticker stopped");
        });

        self.ticker = Some(Ticker { cancel, handle });
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel.cancel();
        }
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        advice::RAIN_OUTFIT_SUFFIX,
        news::{NewsCategory, render},
        preferences::{MemoryPreferences, THEME_KEY},
        provider::CityNotFound,
    };
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::collections::HashMap;

    const TICK: Duration = Duration::from_secs(12);

    #[derive(Debug, Default)]
    struct FakeProvider {
        readings: HashMap<String, WeatherReading>,
    }

    impl FakeProvider {
        fn with(mut self, reading: WeatherReading) -> Self {
            self.readings.insert(reading.city.clone(), reading);
            self
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn get_weather(&self, city: &str) -> anyhow::Result<WeatherReading> {
            self.readings
                .get(city)
                .cloned()
                .ok_or_else(|| anyhow!(CityNotFound(city.to_string())))
        }
    }

    fn reading(city: &str, temperature_c: f64, weather_code: i32, wind_kph: f64) -> WeatherReading {
        WeatherReading {
            city: city.into(),
            country: "Somewhere".into(),
            temperature_c,
            wind_kph,
            weather_code,
            is_day: true,
            max_c: temperature_c + 3.0,
            min_c: temperature_c - 4.0,
        }
    }

    fn shell() -> Shell {
        let provider = FakeProvider::default()
            .with(reading("Tokyo", 18.0, 1, 0.0))
            .with(reading("Oslo", 2.0, 0, 0.0))
            .with(reading("Bergen", 9.0, 63, 4.0));

        Shell::with_rng(
            Arc::new(provider),
            Box::new(MemoryPreferences::new()),
            ShellOptions { default_city: "Tokyo".into(), tick_interval: TICK },
            StdRng::seed_from_u64(3),
        )
    }

    fn is_headline_for(text: &str, category: NewsCategory, city: &str) -> bool {
        category.templates().iter().any(|tpl| render(tpl, city, 0.0) == text)
    }

    #[tokio::test]
    async fn starts_idle_with_default_theme() {
        let shell = shell();
        let state = shell.state();

        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.query, "Tokyo");
        assert_eq!(state.theme, Theme::Sakura);
        assert!(state.reading.is_none());
    }

    #[tokio::test]
    async fn successful_lookup_is_ready_with_advice_and_headline() {
        let mut shell = shell();
        shell.start().await;

        let state = shell.state();
        assert_eq!(state.phase, Phase::Ready);
        assert_ne!(state.phase, Phase::Loading);
        assert!(!state.is_error());
        assert_eq!(state.reading.as_ref().map(|r| r.city.as_str()), Some("Tokyo"));
        assert!(state.advice.is_some());
        assert!(state.updated_at.is_some());

        let text = state.headline.expect("headline present");
        assert!(is_headline_for(&text, NewsCategory::Clear, "Tokyo"), "{text}");
    }

    #[tokio::test]
    async fn failed_lookup_discards_previous_reading() {
        let mut shell = shell();
        shell.submit("Tokyo").await;
        shell.submit("Qwxyzabc").await;

        let state = shell.state();
        assert_eq!(state.phase, Phase::Error);
        assert_eq!(state.query, "Qwxyzabc");
        assert!(state.reading.is_none());
        assert!(state.advice.is_none());
        assert!(state.headline.is_none());
        assert!(shell.ticker.is_none());
    }

    #[tokio::test]
    async fn error_clears_on_next_lookup() {
        let mut shell = shell();
        shell.submit("Qwxyzabc").await;
        assert!(shell.state().is_error());

        let request = shell.begin_lookup("Oslo").expect("non-blank query");
        assert_eq!(shell.state().phase, Phase::Loading);
        assert!(!shell.state().is_error());

        let result = lookup(shell.provider().as_ref(), &request.query).await;
        assert!(shell.finish_lookup(request.id, result));
        assert_eq!(shell.state().phase, Phase::Ready);
    }

    #[tokio::test]
    async fn blank_query_is_ignored() {
        let mut shell = shell();
        shell.submit("Tokyo").await;
        let before = shell.state();

        assert!(shell.begin_lookup("   ").is_none());
        shell.submit("").await;
        assert_eq!(shell.state(), before);
    }

    #[tokio::test]
    async fn rain_reading_gets_rain_advice() {
        let mut shell = shell();
        shell.submit("Bergen").await;

        let advice = shell.state().advice.expect("advice present");
        assert!(advice.outfit.ends_with(RAIN_OUTFIT_SUFFIX));
        assert!(advice.warning.is_some());
    }

    #[tokio::test]
    async fn stale_results_are_dropped() {
        let mut shell = shell();
        let first = shell.begin_lookup("Qwxyzabc").expect("request");
        let second = shell.begin_lookup("Tokyo").expect("request");

        let tokyo = lookup(shell.provider().as_ref(), &second.query).await;
        assert!(shell.finish_lookup(second.id, tokyo));
        assert!(!shell.finish_lookup(first.id, Err(LookupFailed)));

        let state = shell.state();
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.reading.map(|r| r.city), Some("Tokyo".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_refreshes_headline_from_stored_reading() {
        let mut shell = shell();
        shell.submit("Oslo").await;

        let mut rx = shell.subscribe();
        rx.borrow_and_update();

        tokio::time::sleep(TICK + Duration::from_millis(1)).await;
        tokio::task::yield_now().await;

        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.phase, Phase::Ready);
        let text = state.headline.expect("headline present");
        assert!(is_headline_for(&text, NewsCategory::Cold, "Oslo"), "{text}");
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_before_the_interval() {
        let mut shell = shell();
        shell.submit("Tokyo").await;

        let mut rx = shell.subscribe();
        rx.borrow_and_update();

        tokio::time::sleep(TICK - Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_follows_the_newest_reading() {
        let mut shell = shell();
        shell.submit("Tokyo").await;
        shell.submit("Oslo").await;

        let mut rx = shell.subscribe();
        for _ in 0..3 {
            tokio::time::sleep(TICK).await;
            tokio::task::yield_now().await;
            let text = rx.borrow_and_update().headline.clone().expect("headline present");
            assert!(is_headline_for(&text, NewsCategory::Cold, "Oslo"), "{text}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn new_reading_cancels_previous_ticker() {
        let mut shell = shell();
        shell.submit("Tokyo").await;
        let old = shell.ticker.as_ref().expect("ticker running").cancel.clone();
        assert!(!old.is_cancelled());

        shell.submit("Oslo").await;
        assert!(old.is_cancelled());

        let current = shell.ticker.as_ref().expect("ticker running");
        assert!(!current.cancel.is_cancelled());
        assert!(!current.handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_stops_after_failure() {
        let mut shell = shell();
        shell.submit("Tokyo").await;
        shell.submit("Qwxyzabc").await;

        let mut rx = shell.subscribe();
        rx.borrow_and_update();

        tokio::time::sleep(TICK * 5).await;
        tokio::task::yield_now().await;
        assert!(!rx.has_changed().unwrap());
        assert!(rx.borrow().headline.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_stops_ticker() {
        let mut shell = shell();
        shell.submit("Tokyo").await;

        let mut rx = shell.subscribe();
        let before = rx.borrow_and_update().clone();

        shell.dispose().await;
        tokio::time::sleep(TICK * 5).await;

        // Channel is closed once the ticker is gone; the last value stays put.
        assert!(rx.has_changed().is_err());
        assert_eq!(*rx.borrow(), before);
    }

    #[tokio::test]
    async fn theme_change_writes_through() {
        let mut shell = shell();
        shell.set_theme(Theme::Midnight).unwrap();

        assert_eq!(shell.state().theme, Theme::Midnight);
        assert_eq!(
            shell.preferences().get(THEME_KEY).unwrap().as_deref(),
            Some("midnight")
        );
    }

    #[tokio::test]
    async fn preview_theme_is_not_persisted() {
        let mut shell = shell();
        shell.preview_theme(Theme::Bubblegum);

        assert_eq!(shell.state().theme, Theme::Bubblegum);
        assert_eq!(shell.preferences().get(THEME_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn stored_theme_is_loaded_on_start() {
        let mut prefs = MemoryPreferences::new();
        prefs.set(THEME_KEY, "cotton").unwrap();

        let shell = Shell::new(
            Arc::new(FakeProvider::default()),
            Box::new(prefs),
            ShellOptions::default(),
        );
        assert_eq!(shell.state().theme, Theme::Cotton);
    }
}
