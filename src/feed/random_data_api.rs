//! random-data-api.com user generator.
//!
//! Endpoint: GET {base}/users?size={n}&response_type=json
//! Returns one JSON object when `size=1`, otherwise an array of objects.

use super::error::FetchUnavailable;
use super::types::{UserRecord, UsersResponse};
use super::UserDataSource;
use crate::config::ApiConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::num::NonZeroUsize;
use std::time::Duration;

pub struct RandomDataApi {
    client: Client,
    base_url: String,
}

impl RandomDataApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    /// Fallible fetch. [`UserDataSource::fetch_users`] wraps this and swallows
    /// the error.
    pub async fn try_fetch_users(
        &self,
        count: NonZeroUsize,
    ) -> std::result::Result<Vec<UserRecord>, FetchUnavailable> {
        let size = count.to_string();
        let resp = self
            .client
            .get(self.users_url())
            .query(&[("size", size.as_str()), ("response_type", "json")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchUnavailable::Status { status, body });
        }

        let body = resp.text().await?;
        parse_users_response(&body)
    }
}

/// Normalize a users body (single object or array) into records.
pub fn parse_users_response(body: &str) -> std::result::Result<Vec<UserRecord>, FetchUnavailable> {
    Ok(UsersResponse::from_json(body)?.into_records())
}

#[async_trait]
impl UserDataSource for RandomDataApi {
    async fn fetch_users(&self, count: NonZeroUsize) -> Vec<UserRecord> {
        match self.try_fetch_users(count).await {
            Ok(records) => {
                tracing::debug!(requested = count.get(), received = records.len(), "fetched users");
                records
            }
            Err(e) => {
                tracing::warn!(requested = count.get(), error = %e, "user fetch unavailable");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn n(count: usize) -> NonZeroUsize {
        NonZeroUsize::new(count).unwrap()
    }

    fn api_for(server: &MockServer) -> RandomDataApi {
        RandomDataApi::new(&ApiConfig {
            base_url: format!("{}/api/v2/", server.uri()),
            request_timeout_ms: Some(5000),
        })
        .unwrap()
    }

    fn user_json(id: u64, first: &str) -> serde_json::Value {
        json!({
            "id": id,
            "uid": "b1c9c2f0-0000-4000-8000-000000000000",
            "avatar": format!("https://robohash.org/{}.png", first),
            "first_name": first,
            "last_name": "Tester",
            "username": first.to_lowercase(),
        })
    }

    #[test]
    fn test_users_url_trims_trailing_slash() {
        let api = RandomDataApi::new(&ApiConfig {
            base_url: "https://random-data-api.com/api/v2/".to_string(),
            request_timeout_ms: None,
        })
        .unwrap();
        assert_eq!(api.users_url(), "https://random-data-api.com/api/v2/users");
    }

    #[test]
    fn test_parse_users_response_object() {
        let body = r#"{"id": 99, "avatar": "a", "first_name": "Solo", "last_name": "One"}"#;
        let records = parse_users_response(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "99");
    }

    #[test]
    fn test_parse_users_response_rejects_garbage() {
        assert!(matches!(
            parse_users_response("<html>oops</html>"),
            Err(FetchUnavailable::Malformed(_))
        ));
        assert!(matches!(
            parse_users_response(r#""just a string""#),
            Err(FetchUnavailable::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_users_response_empty_array() {
        assert!(parse_users_response("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_sends_size_and_response_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users"))
            .and(query_param("size", "3"))
            .and(query_param("response_type", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                user_json(1, "Ann"),
                user_json(2, "Ben"),
                user_json(3, "Cal"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let records = api_for(&server).fetch_users(n(3)).await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[2].first_name, "Cal");
        assert_eq!(records[1].avatar_url, "https://robohash.org/Ben.png");
    }

    #[tokio::test]
    async fn test_fetch_normalizes_single_object() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users"))
            .and(query_param("size", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(42, "Dee")))
            .mount(&server)
            .await;

        let records = api_for(&server).fetch_users(n(1)).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "42");
        assert_eq!(records[0].last_name, "Tester");
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let api = api_for(&server);
        match api.try_fetch_users(n(10)).await {
            Err(FetchUnavailable::Status { status, body }) => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert!(api.fetch_users(n(10)).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_invalid_json_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let api = api_for(&server);
        assert!(matches!(
            api.try_fetch_users(n(2)).await,
            Err(FetchUnavailable::Malformed(_))
        ));
        assert!(api.fetch_users(n(2)).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_keeps_items_with_null_or_missing_display_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "avatar": null, "first_name": "Ann", "last_name": "Lee"},
                {"id": 2, "avatar": "x", "first_name": "Ben"},
                user_json(3, "Cal"),
            ])))
            .mount(&server)
            .await;

        let records = api_for(&server).fetch_users(n(3)).await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].avatar_url, "");
        assert_eq!(records[1].last_name, "");
        assert_eq!(records[2].first_name, "Cal");
    }

    #[tokio::test]
    async fn test_fetch_item_missing_id_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v2/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                user_json(1, "Ann"),
                {"avatar": "x", "first_name": "Nobody", "last_name": "Here"},
            ])))
            .mount(&server)
            .await;

        let api = api_for(&server);
        match api.try_fetch_users(n(2)).await {
            Err(FetchUnavailable::Malformed(e)) => {
                assert!(e.to_string().contains("missing field `id`"), "{}", e);
            }
            other => panic!("expected malformed error, got {:?}", other),
        }
        assert!(api.fetch_users(n(2)).await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_transport_error_is_empty() {
        // Nothing listens on port 1.
        let api = RandomDataApi::new(&ApiConfig {
            base_url: "http://127.0.0.1:1/api/v2".to_string(),
            request_timeout_ms: Some(2000),
        })
        .unwrap();
        assert!(matches!(
            api.try_fetch_users(n(1)).await,
            Err(FetchUnavailable::Transport(_))
        ));
        assert!(api.fetch_users(n(1)).await.is_empty());
    }

    /// Integration test: hits the real random-data-api.com.
    /// Run with: cargo test random_data_api_live --ignored -- --nocapture
    #[tokio::test]
    #[ignore]
    async fn random_data_api_live_fetch() {
        let api = RandomDataApi::new(&ApiConfig::default()).unwrap();
        match api.try_fetch_users(n(5)).await {
            Ok(records) => {
                println!("Got {} users", records.len());
                for r in &records {
                    println!("  {} | {} | {}", r.id, r.full_name(), r.avatar_url);
                }
            }
            Err(e) => println!("live fetch error: {:#}", e),
        }
    }
}
