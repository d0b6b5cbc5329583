// ============================================================================
// Structure : Coin
// ============================================================================
// Représente une ligne de balance renvoyée par l'API :
// prix unitaire en USD, quantité détenue, valeur totale
//
// CONCEPTS RUST :
// 1. #[derive(Deserialize)] : parsing JSON automatique avec serde
// 2. f64 : précision suffisante pour l'affichage (pas de calcul comptable)
// 3. La valeur (value) vient du backend, elle n'est jamais recalculée
// ============================================================================

use serde::{Deserialize, Serialize};

/// Balance d'une cryptomonnaie pour un utilisateur
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Symbole court (ex: "BTC")
    pub symbol: String,

    /// Nom affiché (ex: "Bitcoin")
    pub name: String,

    /// Prix en USD par unité
    pub price: f64,

    /// Quantité détenue (peut être 0)
    pub amount: f64,

    /// price × amount, fourni par le backend
    pub value: f64,
}

/// Action proposée sur une ligne
///
/// Le bouton est inerte : aucune passation d'ordre n'est branchée dessus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinAction {
    /// L'utilisateur détient déjà la crypto
    Trade,
    /// Aucune détention
    Buy,
}

impl CoinAction {
    pub fn label(&self) -> &'static str {
        match self {
            CoinAction::Trade => "Trade",
            CoinAction::Buy => "Buy",
        }
    }
}

impl Coin {
    pub fn new(symbol: &str, name: &str, price: f64, amount: f64, value: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            price,
            amount,
            value,
        }
    }

    /// Vrai si la quantité détenue est strictement positive
    pub fn has_holdings(&self) -> bool {
        self.amount > 0.0
    }

    /// "Trade" si on détient la crypto, "Buy" sinon
    pub fn action(&self) -> CoinAction {
        if self.has_holdings() {
            CoinAction::Trade
        } else {
            CoinAction::Buy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_from_json() {
        let json = r#"{"symbol":"BTC","name":"Bitcoin","price":50000.0,"amount":0,"value":0}"#;
        let coin: Coin = serde_json::from_str(json).unwrap();

        assert_eq!(coin.symbol, "BTC");
        assert_eq!(coin.name, "Bitcoin");
        assert_eq!(coin.price, 50000.0);
        assert_eq!(coin.amount, 0.0);
    }

    #[test]
    fn test_action_boundary() {
        let empty = Coin::new("BTC", "Bitcoin", 50000.0, 0.0, 0.0);
        assert_eq!(empty.action(), CoinAction::Buy);
        assert_eq!(empty.action().label(), "Buy");

        let dust = Coin::new("BTC", "Bitcoin", 50000.0, 0.00000001, 0.0005);
        assert_eq!(dust.action(), CoinAction::Trade);
        assert_eq!(dust.action().label(), "Trade");
    }

    #[test]
    fn test_value_is_not_recomputed() {
        // Valeur incohérente volontairement : on garde celle du backend
        let coin = Coin::new("ETH", "Ethereum", 3400.0, 2.0, 1.0);
        assert_eq!(coin.value, 1.0);
    }
}
