// ============================================================================
// Contrôleur de chargement des balances
// ============================================================================
// Maintient un FetchState synchronisé avec l'utilisateur sélectionné.
//
// Règles :
// 1. Activation ou changement d'utilisateur : Loading immédiatement
// 2. Succès : Ready(coins), ordre de la source conservé
// 3. Échec : Error(message), "Failed to load" si message vide
// 4. Seul le dernier ticket émis peut modifier l'état
//    (une réponse tardive pour un ancien utilisateur est ignorée)
//
// CONCEPT : "latest requested wins"
// - Chaque requête reçoit un ticket (seq, user)
// - L'ordre d'arrivée des réponses n'a pas d'importance
// ============================================================================

use tracing::{debug, info, warn};

use crate::api::BalanceSource;
use crate::error::Result;
use crate::models::{Coin, FetchState, FetchTicket, UserId};

#[derive(Debug, Default)]
pub struct BalanceController {
    state: FetchState,
    latest: Option<FetchTicket>,
    next_seq: u64,
    in_flight: bool,
}

impl BalanceController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Vrai tant que la requête courante n'est pas terminée
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Utilisateur de la dernière requête émise
    pub fn current_user(&self) -> Option<&UserId> {
        self.latest.as_ref().map(|ticket| &ticket.user_id)
    }

    /// Émet une nouvelle requête pour `user_id`
    ///
    /// L'état passe à Loading avant toute réponse. Le ticket retourné
    /// remplace tous les précédents.
    pub fn activate(&mut self, user_id: UserId) -> FetchTicket {
        self.next_seq += 1;
        let ticket = FetchTicket {
            seq: self.next_seq,
            user_id,
        };

        debug!(seq = ticket.seq, user = %ticket.user_id, "Balance fetch issued");
        self.state = FetchState::Loading;
        self.in_flight = true;
        self.latest = Some(ticket.clone());
        ticket
    }

    /// Applique le résultat d'une requête
    ///
    /// Retourne `false` si le ticket a été remplacé entre-temps.
    pub fn settle(&mut self, ticket: &FetchTicket, result: Result<Vec<Coin>>) -> bool {
        if self.latest.as_ref() != Some(ticket) {
            debug!(
                seq = ticket.seq,
                user = %ticket.user_id,
                "Discarding stale balance response"
            );
            return false;
        }

        self.state = match result {
            Ok(coins) => {
                info!(user = %ticket.user_id, coins = coins.len(), "Balances ready");
                FetchState::Ready(coins)
            }
            Err(err) => {
                warn!(user = %ticket.user_id, error = %err, "Balance fetch failed");
                FetchState::Error(err.display_message())
            }
        };
        self.in_flight = false;
        true
    }

    /// activate + fetch + settle en une seule étape coopérative
    pub async fn fetch(&mut self, source: &dyn BalanceSource, user_id: UserId) -> &FetchState {
        let ticket = self.activate(user_id);
        let result = source.fetch_balances(&ticket.user_id).await;
        self.settle(&ticket, result);
        &self.state
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DemoBalanceSource;
    use crate::error::AppError;

    fn btc() -> Coin {
        Coin::new("BTC", "Bitcoin", 50000.0, 0.0, 0.0)
    }

    #[test]
    fn test_initial_state_is_loading() {
        let controller = BalanceController::new();
        assert!(controller.state().is_loading());
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn test_activate_sets_loading_from_any_state() {
        let mut controller = BalanceController::new();

        let ticket = controller.activate(UserId::new("1"));
        controller.settle(&ticket, Ok(vec![btc()]));
        assert!(matches!(controller.state(), FetchState::Ready(_)));

        controller.activate(UserId::new("2"));
        assert!(controller.state().is_loading());
        assert!(controller.is_in_flight());

        let ticket = controller.activate(UserId::new("1"));
        controller.settle(&ticket, Err(AppError::Network("down".to_string())));
        assert_eq!(controller.state(), &FetchState::Error("down".to_string()));

        controller.activate(UserId::new("2"));
        assert!(controller.state().is_loading());
    }

    #[test]
    fn test_settle_success_keeps_order() {
        let mut controller = BalanceController::new();
        let ticket = controller.activate(UserId::new("1"));
        let coins = vec![
            Coin::new("XLM", "Stellar", 0.12, 0.0, 0.0),
            btc(),
        ];

        assert!(controller.settle(&ticket, Ok(coins.clone())));
        assert_eq!(controller.state(), &FetchState::Ready(coins));
        assert!(!controller.is_in_flight());
    }

    #[test]
    fn test_settle_error_without_message() {
        let mut controller = BalanceController::new();
        let ticket = controller.activate(UserId::new("1"));

        controller.settle(&ticket, Err(AppError::Network(String::new())));
        assert_eq!(
            controller.state(),
            &FetchState::Error("Failed to load".to_string())
        );
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut controller = BalanceController::new();
        let first = controller.activate(UserId::new("1"));
        let second = controller.activate(UserId::new("2"));

        // La réponse pour "2" arrive d'abord, puis celle pour "1"
        assert!(controller.settle(&second, Ok(vec![btc()])));
        assert!(!controller.settle(&first, Err(AppError::Network("late".to_string()))));

        assert_eq!(controller.state(), &FetchState::Ready(vec![btc()]));
        assert_eq!(controller.current_user(), Some(&UserId::new("2")));
    }

    #[test]
    fn test_same_user_reissued_discards_older_ticket() {
        let mut controller = BalanceController::new();
        let first = controller.activate(UserId::new("1"));
        let _second = controller.activate(UserId::new("1"));

        assert!(!controller.settle(&first, Ok(vec![btc()])));
        assert!(controller.state().is_loading());
        assert!(controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_fetch_with_demo_source() {
        let mut controller = BalanceController::new();
        let source = DemoBalanceSource::seeded();

        let state = controller.fetch(&source, UserId::new("2")).await;
        let coins = state.coins().unwrap();
        assert_eq!(coins.len(), 5);
        assert_eq!(coins[0].symbol, "ETH");
        assert_eq!(coins[0].amount, 10.0);
    }
}
