use super::*;
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

struct FakeEndpoint {
    stored_responses: Mutex<VecDeque<Result<i128, String>>>,
    refresh_error: Option<String>,
    stored_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

impl FakeEndpoint {
    fn with_stored(responses: Vec<Result<i128, &str>>) -> Self {
        Self {
            stored_responses: Mutex::new(
                responses
                    .into_iter()
                    .map(|r| r.map_err(str::to_string))
                    .collect(),
            ),
            refresh_error: None,
            stored_calls: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
        }
    }

    fn failing_refresh(mut self, message: &str) -> Self {
        self.refresh_error = Some(message.to_string());
        self
    }

    fn stored_calls(&self) -> usize {
        self.stored_calls.load(Ordering::SeqCst)
    }

    fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContractEndpoint for FakeEndpoint {
    async fn stored_price(&self) -> Result<StoredPrice, EndpointError> {
        self.stored_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .stored_responses
            .lock()
            .expect("responses lock")
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response".to_string()));
        next.map(StoredPrice::from_raw)
            .map_err(|message| EndpointError::Rpc {
                code: -32000,
                message,
            })
    }

    async fn refresh_stored_price(&self) -> Result<TxHash, EndpointError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        match &self.refresh_error {
            Some(message) => Err(EndpointError::Rpc {
                code: 4001,
                message: message.clone(),
            }),
            None => Ok(TxHash([0x42; 32])),
        }
    }

    async fn decimals(&self) -> Result<u8, EndpointError> {
        Ok(8)
    }

    async fn latest_price(&self) -> Result<i128, EndpointError> {
        Ok(2_150_000_000)
    }

    async fn price_feed(&self) -> Result<Address, EndpointError> {
        Ok(Address([0x0a; 20]))
    }
}

#[derive(Clone, Default)]
struct RecordingAlerts {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingAlerts {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("alerts lock").clone()
    }
}

impl AlertSink for RecordingAlerts {
    fn alert(&self, message: &str) {
        self.messages
            .lock()
            .expect("alerts lock")
            .push(message.to_string());
    }
}

fn controller(
    endpoint: FakeEndpoint,
) -> (PriceDisplayController<FakeEndpoint, RecordingAlerts>, RecordingAlerts) {
    let alerts = RecordingAlerts::default();
    (PriceDisplayController::new(endpoint, alerts.clone()), alerts)
}

#[test]
fn display_starts_empty() {
    let display = PriceDisplay::new();
    assert_eq!(display.stored_price(), None);
    assert_eq!(display.render_label("AVAX/USD"), "Stored AVAX/USD Price: ");
}

#[tokio::test]
async fn fetched_value_is_scaled_by_ten_to_the_eighth() {
    for raw in [0i128, 1, 99_999_999, 3_512_340_000, -150_000_000, 123_456_789_012_345] {
        let (mut controller, _alerts) = controller(FakeEndpoint::with_stored(vec![Ok(raw)]));
        controller.fetch_stored_value().await.expect("fetch");
        assert_eq!(controller.display().value(), Some(raw as f64 / 1e8));
    }
}

#[tokio::test]
async fn fetched_value_renders_in_label() {
    let (mut controller, _alerts) =
        controller(FakeEndpoint::with_stored(vec![Ok(3_512_340_000)]));
    controller.fetch_stored_value().await;
    assert_eq!(
        controller.display().render_label("AVAX/USD"),
        "Stored AVAX/USD Price: 35.1234"
    );
}

#[tokio::test]
async fn failed_fetch_keeps_previous_value_and_does_not_alert() {
    let (mut controller, alerts) = controller(FakeEndpoint::with_stored(vec![
        Ok(2_000_000_000),
        Err("execution reverted"),
    ]));

    controller.fetch_stored_value().await.expect("first fetch");
    assert!(controller.fetch_stored_value().await.is_none());

    assert_eq!(
        controller.display().stored_price(),
        Some(StoredPrice::from_raw(2_000_000_000))
    );
    assert!(alerts.messages().is_empty());
}

#[tokio::test]
async fn failed_update_alerts_once_and_keeps_display() {
    let endpoint = FakeEndpoint::with_stored(vec![Ok(1_500_000_000)])
        .failing_refresh("User denied transaction signature");
    let (mut controller, alerts) = controller(endpoint);
    controller.fetch_stored_value().await.expect("initial fetch");

    assert!(controller.request_update().await.is_none());

    let messages = alerts.messages();
    assert_eq!(messages.len(), 1);
    assert!(
        messages[0].contains("User denied transaction signature"),
        "unexpected alert: {}",
        messages[0]
    );
    assert_eq!(
        controller.display().stored_price(),
        Some(StoredPrice::from_raw(1_500_000_000))
    );
    assert_eq!(controller.endpoint().stored_calls(), 1);
}

#[tokio::test]
async fn successful_update_is_followed_by_exactly_one_fetch() {
    let endpoint = FakeEndpoint::with_stored(vec![Ok(1_500_000_000), Ok(1_734_000_000)]);
    let (mut controller, alerts) = controller(endpoint);
    controller.fetch_stored_value().await.expect("initial fetch");

    let outcome = controller.request_update().await.expect("update");

    assert_eq!(outcome.tx_hash, TxHash([0x42; 32]));
    assert_eq!(outcome.refreshed, Some(StoredPrice::from_raw(1_734_000_000)));
    assert_eq!(controller.endpoint().refresh_calls(), 1);
    assert_eq!(controller.endpoint().stored_calls(), 2);
    assert_eq!(controller.display().value(), Some(17.34));
    assert!(alerts.messages().is_empty());
}

#[tokio::test]
async fn update_with_failed_follow_up_fetch_is_not_alerted() {
    let endpoint = FakeEndpoint::with_stored(vec![Ok(1_500_000_000), Err("rpc timeout")]);
    let (mut controller, alerts) = controller(endpoint);
    controller.fetch_stored_value().await.expect("initial fetch");

    let outcome = controller.request_update().await.expect("update");

    assert_eq!(outcome.refreshed, None);
    assert!(alerts.messages().is_empty());
    assert_eq!(controller.display().value(), Some(15.0));
}

#[tokio::test]
async fn contract_details_collects_every_read_accessor() {
    let endpoint = FakeEndpoint::with_stored(vec![Ok(2_100_000_000)]);
    let details = contract_details(&endpoint).await.expect("details");

    assert_eq!(details.decimals, 8);
    assert_eq!(details.latest_price, 2_150_000_000);
    assert_eq!(details.stored_price, StoredPrice::from_raw(2_100_000_000));
    assert_eq!(details.price_feed, Address([0x0a; 20]));
}
