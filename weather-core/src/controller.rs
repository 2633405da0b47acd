//! Fetch controller: turns fetch calls into observable state transitions.
//!
//! Every call bumps a sequence number and publishes `Loading`. When the
//! request resolves, its outcome is applied only if no newer call has been
//! issued in the meantime, so the most recently issued call always wins no
//! matter in which order responses arrive.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::{
    sync::mpsc,
    task::{AbortHandle, JoinHandle},
};

use crate::{CityName, Coordinates, FetchError, WeatherProvider, WeatherQuery, WeatherSnapshot};

const CITY_FALLBACK_MESSAGE: &str = "City not found or network error";
const LOCATION_FALLBACK_MESSAGE: &str = "Location error";

/// What a consumer should currently display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchPhase<'a> {
    Idle,
    Loading,
    Success(&'a WeatherSnapshot),
    Failed(&'a str),
}

/// Observable controller state.
///
/// `is_loading` is orthogonal to the other two fields: while a request is in
/// flight the previous result or error is still present but no longer current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchState {
    pub result: Option<Arc<WeatherSnapshot>>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl FetchState {
    pub fn phase(&self) -> FetchPhase<'_> {
        if self.is_loading {
            return FetchPhase::Loading;
        }
        match (&self.error_message, &self.result) {
            (Some(message), _) => FetchPhase::Failed(message),
            (None, Some(snapshot)) => FetchPhase::Success(snapshot),
            (None, None) => FetchPhase::Idle,
        }
    }
}

/// Ordered stream of state transitions, starting with the state at subscription time.
#[derive(Debug)]
pub struct StateSubscription {
    rx: mpsc::UnboundedReceiver<FetchState>,
}

impl StateSubscription {
    /// Next transition; `None` once the controller is gone.
    pub async fn recv(&mut self) -> Option<FetchState> {
        self.rx.recv().await
    }

    /// Next already-published transition, without waiting.
    pub fn try_recv(&mut self) -> Option<FetchState> {
        self.rx.try_recv().ok()
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: FetchState,
    latest_seq: u64,
    subscribers: Vec<mpsc::UnboundedSender<FetchState>>,
    in_flight: Vec<AbortHandle>,
}

impl Inner {
    fn publish(&mut self) {
        let state = &self.state;
        self.subscribers.retain(|tx| tx.send(state.clone()).is_ok());
    }

    fn begin(&mut self) -> u64 {
        self.latest_seq += 1;
        self.state.is_loading = true;
        self.publish();
        self.latest_seq
    }

    fn resolve(&mut self, seq: u64, query: &WeatherQuery, outcome: Result<WeatherSnapshot, FetchError>) {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, %query, "discarding stale weather response");
            return;
        }

        match outcome {
            Ok(snapshot) => {
                tracing::info!(%query, city = %snapshot.city, temp = snapshot.temperature_c, "weather updated");
                self.state.result = Some(Arc::new(snapshot));
                self.state.error_message = None;
            }
            Err(err) => {
                tracing::warn!(%query, kind = %err.kind(), error = %err, "weather fetch failed");
                self.state.result = None;
                self.state.error_message = Some(failure_message(query, &err.to_string()));
            }
        }
        self.state.is_loading = false;
        self.publish();
    }
}

/// Normalize an underlying error's text into the message shown to consumers.
fn failure_message(query: &WeatherQuery, text: &str) -> String {
    let text = text.trim();
    let text = if text.is_empty() {
        match query {
            WeatherQuery::City(_) => CITY_FALLBACK_MESSAGE,
            WeatherQuery::Coordinates(_) => LOCATION_FALLBACK_MESSAGE,
        }
    } else {
        text
    };
    format!("Error: {text}")
}

/// Owns the fetch state for one session and issues requests through a provider.
///
/// Must be used from within a Tokio runtime. Dropping the controller aborts
/// any request still in flight.
#[derive(Debug)]
pub struct WeatherController {
    provider: Arc<dyn WeatherProvider>,
    inner: Arc<Mutex<Inner>>,
}

impl WeatherController {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> FetchState {
        self.inner.lock().state.clone()
    }

    pub fn subscribe(&self) -> StateSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock();
        // Receiver is alive, so this cannot fail.
        let _ = tx.send(inner.state.clone());
        inner.subscribers.push(tx);
        StateSubscription { rx }
    }

    pub fn fetch_by_city(&self, city: CityName) -> JoinHandle<()> {
        self.fetch(WeatherQuery::City(city))
    }

    /// Validate raw user input, then fetch. Blank input issues no request.
    pub fn fetch_by_city_input(&self, raw: &str) -> Result<JoinHandle<()>, FetchError> {
        let city = CityName::new(raw)?;
        Ok(self.fetch_by_city(city))
    }

    pub fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) -> JoinHandle<()> {
        self.fetch(WeatherQuery::Coordinates(Coordinates::new(latitude, longitude)))
    }

    fn fetch(&self, query: WeatherQuery) -> JoinHandle<()> {
        let mut inner = self.inner.lock();
        let seq = inner.begin();
        tracing::debug!(seq, %query, "issuing weather fetch");

        let provider = Arc::clone(&self.provider);
        let shared = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let outcome = provider.current(&query).await;
            shared.lock().resolve(seq, &query, outcome);
        });

        inner.in_flight.retain(|h| !h.is_finished());
        inner.in_flight.push(handle.abort_handle());
        handle
    }
}

impl Drop for WeatherController {
    fn drop(&mut self) {
        for handle in self.inner.lock().in_flight.drain(..) {
            handle.abort();
        }
    }
}
