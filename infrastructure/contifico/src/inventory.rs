use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};

use business::domain::cart::stock::{InventoryService, StockError};

use crate::client::ContificoClient;

#[derive(Deserialize)]
struct ContificoProduct {
    #[serde(deserialize_with = "quantity_from_json")]
    cantidad_stock: f64,
}

/// Contifico sends decimal quantities either as numbers or as strings ("12.00").
fn quantity_from_json<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("quantity out of range")),
        serde_json::Value::String(text) => text.trim().parse::<f64>().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected quantity, found {}",
            other
        ))),
    }
}

pub struct ContificoInventory {
    client: ContificoClient,
}

impl ContificoInventory {
    pub fn new(client: ContificoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InventoryService for ContificoInventory {
    async fn available_quantity(&self, external_id: &str) -> Result<f64, StockError> {
        let url = self
            .client
            .product_url(external_id)
            .ok_or(StockError::Transport)?;

        let mut request = self
            .client
            .client
            .get(url)
            .header("Accept", "application/json");
        if let Some(key) = self.client.auth_header() {
            request = request.header("Authorization", key);
        }

        let response = request.send().await.map_err(|_| StockError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StockError::NotFound);
        }
        if !status.is_success() {
            return Err(StockError::Status(status.as_u16()));
        }

        let product: ContificoProduct = response.json().await.map_err(|_| StockError::Decode)?;

        if !product.cantidad_stock.is_finite() {
            return Err(StockError::Decode);
        }
        Ok(product.cantidad_stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn inventory(base_url: String, api_key: Option<&str>) -> ContificoInventory {
        ContificoInventory::new(ContificoClient::new(
            base_url,
            api_key.map(str::to_string),
            Duration::from_secs(2),
        ))
    }

    #[tokio::test]
    async fn should_read_numeric_stock() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/producto/ext-1/")
                    .header("Authorization", "secret-key");
                then.status(200)
                    .json_body(json!({"id": "ext-1", "nombre": "Queso", "cantidad_stock": 7}));
            })
            .await;

        let result = inventory(server.base_url(), Some("secret-key"))
            .available_quantity("ext-1")
            .await;

        mock.assert_async().await;
        assert_eq!(result, Ok(7.0));
    }

    #[tokio::test]
    async fn should_read_string_stock() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/producto/ext-2/");
                then.status(200)
                    .json_body(json!({"cantidad_stock": "12.50"}));
            })
            .await;

        let result = inventory(server.base_url(), None)
            .available_quantity("ext-2")
            .await;

        assert_eq!(result, Ok(12.5));
    }

    #[tokio::test]
    async fn should_map_missing_product_to_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/producto/ghost/");
                then.status(404);
            })
            .await;

        let result = inventory(server.base_url(), None)
            .available_quantity("ghost")
            .await;

        assert_eq!(result, Err(StockError::NotFound));
    }

    #[tokio::test]
    async fn should_map_server_error_to_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/producto/ext-1/");
                then.status(500);
            })
            .await;

        let result = inventory(server.base_url(), None)
            .available_quantity("ext-1")
            .await;

        assert_eq!(result, Err(StockError::Status(500)));
    }

    #[tokio::test]
    async fn should_map_unexpected_body_to_decode() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/producto/ext-1/");
                then.status(200).json_body(json!({"nombre": "Queso"}));
            })
            .await;

        let result = inventory(server.base_url(), None)
            .available_quantity("ext-1")
            .await;

        assert_eq!(result, Err(StockError::Decode));
    }

    #[tokio::test]
    async fn should_map_unreachable_host_to_transport() {
        let result = inventory("http://127.0.0.1:1".to_string(), None)
            .available_quantity("ext-1")
            .await;

        assert_eq!(result, Err(StockError::Transport));
    }
}
