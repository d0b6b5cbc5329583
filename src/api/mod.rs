// ============================================================================
// Module : api
// ============================================================================
// Collaborateurs de récupération des balances :
// - http : client de l'API backend (reqwest)
// - demo : source en mémoire avec les données de démonstration
// ============================================================================

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Coin, UserId};

pub mod demo; // Source en mémoire
pub mod http; // Client HTTP

pub use demo::DemoBalanceSource;
pub use http::HttpBalanceClient;

/// Récupère les balances d'un utilisateur
///
/// CONCEPT RUST : async-trait
/// - Les méthodes async dans un trait objet (dyn) passent par #[async_trait]
/// - Send + Sync : la source est partagée avec le worker via Arc
///
/// En cas d'échec, retourne `AppError::Network` avec un message lisible.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch_balances(&self, user_id: &UserId) -> Result<Vec<Coin>>;
}
