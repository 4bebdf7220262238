//! HTTP access to the transactions history resource

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tradelog_config::ApiConfig;

use crate::error::{CoreError, CoreResult};
use crate::models::Transaction;

/// API reference type
pub type ApiRef = Arc<dyn TransactionsApi>;

/// Read and write access to the transactions history
#[async_trait]
pub trait TransactionsApi: Send + Sync {
    /// GET the full transactions history
    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>>;

    /// POST a caller-built payload and return the backend's JSON response
    async fn post_transaction(&self, payload: serde_json::Value) -> CoreResult<serde_json::Value>;
}

/// `TransactionsApi` backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpTransactionsApi {
    client: Client,
    endpoint: String,
}

impl HttpTransactionsApi {
    /// Build a client from the API configuration
    pub fn new(config: &ApiConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.endpoint_url()))
    }

    /// Use an existing reqwest client against `endpoint`
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Full URL of the transactions history resource
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TransactionsApi for HttpTransactionsApi {
    async fn fetch_transactions(&self) -> CoreResult<Vec<Transaction>> {
        log::debug!("GET {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;
        read_json(response).await
    }

    async fn post_transaction(&self, payload: serde_json::Value) -> CoreResult<serde_json::Value> {
        log::debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&payload)
            .send()
            .await?;
        read_json(response).await
    }
}

/// Reject non-2xx responses, then decode the body as JSON
async fn read_json<T: DeserializeOwned>(response: Response) -> CoreResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.ok().filter(|b| !b.is_empty());
        return Err(CoreError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| CoreError::Parse { message: e.to_string() })
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::net::TcpListener;

    const PATH: &str = "/transactions-history";

    fn localhost_binding_permitted() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn api_for(server: &ServerGuard) -> HttpTransactionsApi {
        let config = ApiConfig {
            base_url: server.url(),
            ..ApiConfig::default()
        };
        HttpTransactionsApi::new(&config).expect("client")
    }

    #[tokio::test]
    async fn fetch_parses_transaction_list() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let body = json!([
            {"stock_id": "A", "stock_name": "Alpha", "stocks_quantity": 3, "timestamp": "2024-01-02T09:00:00Z",
             "transaction_price": 10.0, "type": "buy", "status": "PASSED"},
            {"stock_id": "B", "stock_name": "Beta", "stocks_quantity": "7", "timestamp": "2024-01-02T09:05:00Z",
             "transaction_price": 4.5, "type": "sell", "status": "OPEN"}
        ]);
        let mock = server
            .mock("GET", PATH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let transactions = api_for(&server).fetch_transactions().await.expect("fetch");
        mock.assert_async().await;

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].stock_id, "A");
        assert!(transactions[0].is_passed());
        assert_eq!(transactions[1].kind, "sell");
    }

    #[tokio::test]
    async fn fetch_non_2xx_is_http_error() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", PATH)
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let err = api_for(&server).fetch_transactions().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert!(matches!(err, CoreError::Http { status: 500, body: Some(ref b) } if b == "internal"));
    }

    #[tokio::test]
    async fn fetch_malformed_body_is_parse_error() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", PATH)
            .with_status(200)
            .with_body("[{\"stock_id\":")
            .create_async()
            .await;

        let err = api_for(&server).fetch_transactions().await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ParseError);
    }

    #[tokio::test]
    async fn post_sends_json_and_returns_response() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let payload = json!({"stock_id": "C", "stocks_quantity": 2, "type": "buy"});
        let mock = server
            .mock("POST", PATH)
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(payload.clone()))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 42, "status": "PENDING"}"#)
            .create_async()
            .await;

        let response = api_for(&server).post_transaction(payload).await.expect("post");
        mock.assert_async().await;
        assert_eq!(response["id"], 42);
        assert_eq!(response["status"], "PENDING");
    }

    #[tokio::test]
    async fn post_rejected_is_http_error() {
        if !localhost_binding_permitted() {
            return;
        }
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", PATH)
            .with_status(422)
            .create_async()
            .await;

        let err = api_for(&server).post_transaction(json!({})).await.unwrap_err();
        assert!(matches!(err, CoreError::Http { status: 422, body: None }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let port = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener.local_addr().expect("addr").port(),
            Err(_) => return,
        };
        let api = HttpTransactionsApi::with_client(
            Client::new(),
            format!("http://127.0.0.1:{}{}", port, PATH),
        );

        let err = api.fetch_transactions().await.unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::NetworkError);
    }

    #[test]
    fn endpoint_joins_base_and_path() {
        let config = ApiConfig {
            base_url: "https://trade.example.com/".to_string(),
            ..ApiConfig::default()
        };
        let api = HttpTransactionsApi::new(&config).expect("client");
        assert_eq!(api.endpoint(), "https://trade.example.com/transactions-history");
    }
}
