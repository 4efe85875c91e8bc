//! S3 failures against an endpoint nothing listens on. Each call must fail
//! and log the SDK error before handing it back.

use std::sync::{Arc, Mutex};
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::Client;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};
use webotron::s3::S3Service;
use webotron_core::contract::BucketAdmin;
use webotron_core::setup::WebsiteConfig;

struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            self.events.lock().unwrap().push(format!("{:?}", event));
        }
    }
}

fn unreachable_service() -> S3Service {
    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("eu-central-1"))
        .endpoint_url("http://127.0.0.1:1")
        .force_path_style(true)
        .credentials_provider(Credentials::new("test", "test", None, None, "static"))
        .retry_config(RetryConfig::disabled())
        .build();
    S3Service::from_client(Client::from_conf(config), Some("eu-central-1".to_string()))
}

fn collect_errors() -> (Arc<Mutex<Vec<String>>>, tracing::subscriber::DefaultGuard) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = Registry::default().with(EventCollector {
        events: events.clone(),
    });
    (events, tracing::subscriber::set_default(subscriber))
}

fn assert_logged(events: &Arc<Mutex<Vec<String>>>, message: &str) {
    let events = events.lock().unwrap();
    assert!(
        events
            .iter()
            .any(|e| e.contains(message) && e.contains("my-site")),
        "Expected an error event '{message}' for my-site, got: {events:?}"
    );
}

#[tokio::test]
async fn put_bucket_policy_failure_is_logged() {
    let (events, _guard) = collect_errors();
    let s3 = unreachable_service();

    let result = s3.put_bucket_policy("my-site", "{}").await;

    assert!(result.is_err());
    assert_logged(&events, "Failed to put bucket policy");
}

#[tokio::test]
async fn put_website_configuration_failure_is_logged() {
    let (events, _guard) = collect_errors();
    let s3 = unreachable_service();

    let result = s3
        .put_website_configuration("my-site", &WebsiteConfig::default())
        .await;

    assert!(result.is_err());
    assert_logged(&events, "Failed to put website configuration");
}

#[tokio::test]
async fn remove_public_access_block_failure_is_logged() {
    let (events, _guard) = collect_errors();
    let s3 = unreachable_service();

    let result = s3.remove_public_access_block("my-site").await;

    assert!(result.is_err());
    assert_logged(&events, "Failed to delete public access block");
}
