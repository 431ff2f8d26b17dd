//! Decorative Lottie animation. Any failure just means "no animation".

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const DEFAULT_TICK: Duration = Duration::from_millis(120);
const MIN_TICK_MS: f64 = 40.0;
const MAX_TICK_MS: f64 = 250.0;

/// The few Lottie header fields the terminal can make use of.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Animation {
    #[serde(rename = "nm", default)]
    pub name: String,
    #[serde(rename = "fr")]
    pub frame_rate: f64,
    #[serde(rename = "ip", default)]
    pub in_point: f64,
    #[serde(rename = "op", default)]
    pub out_point: f64,
    #[serde(rename = "w", default)]
    pub width: u32,
    #[serde(rename = "h", default)]
    pub height: u32,
}

impl Animation {
    /// Spinner tick derived from the frame rate, clamped to a readable range.
    pub fn tick_interval(&self) -> Duration {
        if !(self.frame_rate.is_finite() && self.frame_rate > 0.0) {
            return DEFAULT_TICK;
        }
        let ms = (1000.0 / self.frame_rate).clamp(MIN_TICK_MS, MAX_TICK_MS);
        Duration::from_millis(ms.round() as u64)
    }

    pub fn duration_secs(&self) -> f64 {
        if self.frame_rate > 0.0 { (self.out_point - self.in_point).max(0.0) / self.frame_rate } else { 0.0 }
    }
}

pub fn tick_interval(animation: Option<&Animation>) -> Duration {
    animation.map(Animation::tick_interval).unwrap_or(DEFAULT_TICK)
}

pub async fn fetch_animation(client: &Client, url: &str) -> Option<Animation> {
    if url.is_empty() {
        return None;
    }
    let resp = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            debug!(%url, error = %e, "animation fetch failed");
            return None;
        }
    };
    if !resp.status().is_success() {
        debug!(%url, status = %resp.status(), "animation not available");
        return None;
    }
    match resp.json::<Animation>().await {
        Ok(a) => Some(a),
        Err(e) => {
            debug!(%url, error = %e, "animation is not a Lottie document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn loads_lottie_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trip.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "v": "5.5.7", "nm": "travel", "fr": 30, "ip": 0, "op": 90, "w": 500, "h": 400, "layers": []
            })))
            .mount(&server)
            .await;

        let a = fetch_animation(&Client::new(), &format!("{}/trip.json", server.uri())).await.unwrap();
        assert_eq!(a.name, "travel");
        assert_eq!(a.width, 500);
        assert_eq!(a.duration_secs(), 3.0);
        assert_eq!(a.tick_interval(), Duration::from_millis(40));
    }

    #[tokio::test]
    async fn non_success_status_means_no_animation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        assert!(fetch_animation(&Client::new(), &format!("{}/missing.json", server.uri())).await.is_none());
    }

    #[tokio::test]
    async fn empty_url_skips_fetch() {
        assert!(fetch_animation(&Client::new(), "").await.is_none());
    }

    #[test]
    fn tick_interval_is_clamped() {
        let slow = Animation { name: String::new(), frame_rate: 2.0, in_point: 0.0, out_point: 10.0, width: 0, height: 0 };
        assert_eq!(slow.tick_interval(), Duration::from_millis(250));
        let ten = Animation { frame_rate: 10.0, ..slow.clone() };
        assert_eq!(ten.tick_interval(), Duration::from_millis(100));
        assert_eq!(tick_interval(None), Duration::from_millis(120));
    }
}
