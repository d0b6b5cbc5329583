// ============================================================================
// API Client : backend des balances
// ============================================================================
// Récupère les prix et balances d'un utilisateur depuis l'API HTTP
//
// GET {base_url}/prices_and_balances?user_id={id}
// Réponse : tableau JSON de { symbol, name, price, amount, value }
//
// CONCEPTS RUST :
// 1. async/await : la requête ne bloque pas le runtime
// 2. Serde : désérialisation JSON automatique vers Vec<Coin>
// 3. Toutes les erreurs deviennent AppError::Network avec un message lisible
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::api::BalanceSource;
use crate::error::{AppError, Result};
use crate::models::{Coin, UserId};

/// Corps d'erreur renvoyé par FastAPI : {"detail": "..."}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Client HTTP de l'API des balances
///
/// CONCEPT : un seul reqwest::Client réutilisé (pool de connexions)
#[derive(Debug, Clone)]
pub struct HttpBalanceClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBalanceClient {
    /// Crée le client avec un timeout global par requête
    ///
    /// Sans timeout, une requête bloquée laisserait la vue en Loading.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("coinlist/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AppError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BalanceSource for HttpBalanceClient {
    #[instrument(skip(self, user_id), fields(user = %user_id))]
    async fn fetch_balances(&self, user_id: &UserId) -> Result<Vec<Coin>> {
        let url = build_balances_url(&self.base_url);
        debug!(url = %url, "Sending balances request");

        let response = self
            .client
            .get(&url)
            .query(&[("user_id", user_id.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Network(describe_transport_error(&e)))?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, "Balances API returned error status");
            return Err(AppError::Network(error_message(status, &body)));
        }

        let coins: Vec<Coin> = response.json().await.map_err(|e| {
            error!(error = %e, "Malformed balances payload");
            AppError::Network(format!("Malformed response: {}", e))
        })?;

        info!(coins = coins.len(), "Successfully fetched balances");
        Ok(coins)
    }
}

/// Construit l'URL de l'endpoint des balances
fn build_balances_url(base_url: &str) -> String {
    format!("{}/prices_and_balances", base_url.trim_end_matches('/'))
}

/// Message d'erreur pour une réponse HTTP non-2xx
///
/// Utilise le champ "detail" de FastAPI quand il est présent.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        match parsed.detail {
            serde_json::Value::String(detail) => {
                if !detail.trim().is_empty() {
                    return detail;
                }
            }
            serde_json::Value::Null => {}
            // Erreurs de validation : liste d'objets
            other => return other.to_string(),
        }
    }

    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out".to_string()
    } else if err.is_connect() {
        "Could not connect to the balances service".to_string()
    } else {
        err.to_string()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_build_balances_url() {
        assert_eq!(
            build_balances_url("http://localhost:8000/"),
            "http://localhost:8000/prices_and_balances"
        );
    }

    #[test]
    fn test_error_message_uses_detail() {
        let body = r#"{"detail":"Service unavailable"}"#;
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, body),
            "Service unavailable"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "HTTP 500 Internal Server Error"
        );
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = HttpBalanceClient::new("http://localhost:8000///", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    // Port 1 sur localhost : connexion refusée, pas besoin de réseau
    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let client = HttpBalanceClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
        let result = client.fetch_balances(&UserId::new("1")).await;

        match result {
            Err(AppError::Network(message)) => assert!(!message.is_empty()),
            other => panic!("expected network error, got {:?}", other),
        }
    }
}
