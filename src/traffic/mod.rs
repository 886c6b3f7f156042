//! Traffic enrichment driver
//!
//! The second crawl phase: attach a traffic metric to every event's project
//! website. Ordinary lookup failures become `{success: false}` on the event
//! and never stop the pass; only a broken collaborator (the traffic service
//! itself unreachable) is phase-fatal.

use crate::event::{IcoEvent, Traffic};
use crate::page::build_http_client;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that make the whole traffic phase fail
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("traffic service unreachable: {0}")]
    ServiceUnreachable(#[source] reqwest::Error),
}

/// Capability to look up a traffic metric for a website URL.
///
/// Ordinary lookup failures must come back as `Ok(Traffic::failure())`;
/// `Err` is reserved for collaborator-fatal conditions.
#[allow(async_fn_in_trait)]
pub trait TrafficSource {
    async fn fetch_traffic(&self, website_url: &str) -> Result<Traffic, TrafficError>;
}

/// Metric payload returned by the traffic data service
#[derive(Debug, Deserialize)]
struct TrafficMetrics {
    #[serde(default)]
    monthly_visits: Option<f64>,
    #[serde(default)]
    global_rank: Option<u64>,
}

/// Production traffic source querying an HTTP data service
#[derive(Debug, Clone)]
pub struct HttpTrafficSource {
    client: Client,
    endpoint: String,
}

impl HttpTrafficSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TrafficError> {
        Ok(Self {
            client: build_http_client().map_err(TrafficError::Client)?,
            endpoint: endpoint.into(),
        })
    }
}

impl TrafficSource for HttpTrafficSource {
    async fn fetch_traffic(&self, website_url: &str) -> Result<Traffic, TrafficError> {
        let Some(host) = host_of(website_url) else {
            tracing::warn!("Cannot extract host from {:?}", website_url);
            return Ok(Traffic::failure());
        };

        let request_url = format!(
            "{}/api/v1/data?domain={}",
            self.endpoint.trim_end_matches('/'),
            host
        );
        tracing::debug!("Fetching traffic for {}", host);

        let response = match self.client.get(&request_url).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                return Err(TrafficError::ServiceUnreachable(e));
            }
            Err(e) => {
                tracing::warn!("Traffic request for {} failed: {}", host, e);
                return Ok(Traffic::failure());
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Traffic lookup for {} returned status {}",
                host,
                response.status()
            );
            return Ok(Traffic::failure());
        }

        match response.json::<TrafficMetrics>().await {
            Ok(metrics) => Ok(Traffic {
                success: true,
                monthly_visits: metrics.monthly_visits,
                global_rank: metrics.global_rank,
            }),
            Err(e) => {
                tracing::warn!("Traffic payload for {} failed to decode: {}", host, e);
                Ok(Traffic::failure())
            }
        }
    }
}

/// Host part of a website URL (the original keyed traffic lookups by domain).
fn host_of(website_url: &str) -> Option<String> {
    Url::parse(website_url)
        .ok()?
        .host_str()
        .map(str::to_string)
}

/// Runs one enrichment pass over the event list.
///
/// Events that already carry a successful metric are skipped, so a retry
/// pass only touches previous failures. A courtesy delay separates
/// consecutive lookups; it is a politeness sleep, not a rate limiter.
pub async fn enrich_traffic<T: TrafficSource>(
    events: &mut [IcoEvent],
    source: &T,
    interval: Duration,
) -> Result<(), TrafficError> {
    let mut first = true;
    for event in events.iter_mut() {
        if event.traffic_success() {
            tracing::debug!("Skipping {:?}, traffic already fetched", event.name);
            continue;
        }

        if !first && !interval.is_zero() {
            tracing::debug!("Sleeping {}ms before next lookup", interval.as_millis());
            tokio::time::sleep(interval).await;
        }
        first = false;

        let traffic = match event.url.as_deref() {
            Some(url) => source.fetch_traffic(url).await?,
            None => {
                tracing::warn!("Event {:?} has no website url, marking failed", event.name);
                Traffic::failure()
            }
        };
        event.traffic = Some(traffic);
    }
    Ok(())
}

/// Folds `traffic.success` across the whole list.
pub fn all_traffic_success(events: &[IcoEvent]) -> bool {
    events.iter().all(IcoEvent::traffic_success)
}
