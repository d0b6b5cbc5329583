// ============================================================================
// Source de démonstration
// ============================================================================
// Balances en mémoire, identiques aux données d'amorçage du backend :
// - prix : BTC, ETH, BCH, LTC, XLM
// - user "1" : 0.25 BTC, 1.5 ETH
// - user "2" : 1 BTC, 10 ETH
//
// Chaque crypto cotée est listée pour chaque utilisateur, triée comme le
// backend : détentions par quantité décroissante puis symbole, ensuite les
// balances nulles par ordre alphabétique.
// ============================================================================

use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::BalanceSource;
use crate::error::Result;
use crate::models::{Coin, UserId};

/// (symbole, nom, prix USD)
const SEED_PRICES: [(&str, &str, f64); 5] = [
    ("BTC", "Bitcoin", 68000.0),
    ("ETH", "Ethereum", 3400.0),
    ("BCH", "Bitcoin Cash", 420.0),
    ("LTC", "Litecoin", 85.0),
    ("XLM", "Stellar", 0.12),
];

/// (user, symbole, quantité)
const SEED_BALANCES: [(&str, &str, f64); 4] = [
    ("1", "BTC", 0.25),
    ("1", "ETH", 1.5),
    ("2", "BTC", 1.0),
    ("2", "ETH", 10.0),
];

#[derive(Debug, Clone)]
struct PriceEntry {
    name: String,
    price: f64,
}

/// Source en mémoire, utile hors-ligne et dans les tests
#[derive(Debug, Clone)]
pub struct DemoBalanceSource {
    prices: HashMap<String, PriceEntry>,
    balances: HashMap<UserId, HashMap<String, f64>>,
    latency: Duration,
}

impl DemoBalanceSource {
    /// Source amorcée avec les données de démonstration
    pub fn seeded() -> Self {
        let mut source = Self::empty();
        for (symbol, name, price) in SEED_PRICES {
            source.set_price(symbol, name, price);
        }
        for (user, symbol, amount) in SEED_BALANCES {
            source.set_balance(UserId::new(user), symbol, amount);
        }
        source
    }

    pub fn empty() -> Self {
        Self {
            prices: HashMap::new(),
            balances: HashMap::new(),
            latency: Duration::ZERO,
        }
    }

    /// Ajoute un délai artificiel avant chaque réponse
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_price(&mut self, symbol: &str, name: &str, price: f64) {
        self.prices.insert(
            symbol.to_uppercase(),
            PriceEntry {
                name: name.to_string(),
                price,
            },
        );
    }

    pub fn set_balance(&mut self, user_id: UserId, symbol: &str, amount: f64) {
        self.balances
            .entry(user_id)
            .or_default()
            .insert(symbol.to_uppercase(), amount);
    }

    /// Calcule la liste triée des balances d'un utilisateur
    pub fn balances_for(&self, user_id: &UserId) -> Vec<Coin> {
        let empty = HashMap::new();
        let amounts = self.balances.get(user_id).unwrap_or(&empty);

        let mut coins: Vec<Coin> = self
            .prices
            .iter()
            .map(|(symbol, entry)| {
                let amount = amounts.get(symbol).copied().unwrap_or(0.0);
                Coin::new(symbol, &entry.name, entry.price, amount, amount * entry.price)
            })
            .collect();

        coins.sort_by(compare_holdings);
        coins
    }
}

impl Default for DemoBalanceSource {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Détentions d'abord (quantité décroissante), puis symbole croissant
fn compare_holdings(a: &Coin, b: &Coin) -> Ordering {
    let a_held = a.has_holdings();
    let b_held = b.has_holdings();

    b_held
        .cmp(&a_held)
        .then_with(|| {
            if a_held && b_held {
                b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.symbol.cmp(&b.symbol))
}

#[async_trait]
impl BalanceSource for DemoBalanceSource {
    async fn fetch_balances(&self, user_id: &UserId) -> Result<Vec<Coin>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let coins = self.balances_for(user_id);
        debug!(user = %user_id, coins = coins.len(), "Served demo balances");
        Ok(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(coins: &[Coin]) -> Vec<&str> {
        coins.iter().map(|c| c.symbol.as_str()).collect()
    }

    #[test]
    fn test_user_one_ordering() {
        let source = DemoBalanceSource::seeded();
        let coins = source.balances_for(&UserId::new("1"));
        assert_eq!(symbols(&coins), vec!["ETH", "BTC", "BCH", "LTC", "XLM"]);
    }

    #[test]
    fn test_user_two_values() {
        let source = DemoBalanceSource::seeded();
        let coins = source.balances_for(&UserId::new("2"));

        assert_eq!(symbols(&coins), vec!["ETH", "BTC", "BCH", "LTC", "XLM"]);
        assert_eq!(coins[0].value, 34000.0);
        assert_eq!(coins[1].value, 68000.0);
        assert_eq!(coins[2].amount, 0.0);
    }

    #[test]
    fn test_unknown_user_has_no_holdings() {
        let source = DemoBalanceSource::seeded();
        let coins = source.balances_for(&UserId::new("42"));

        assert_eq!(coins.len(), 5);
        assert!(coins.iter().all(|c| !c.has_holdings()));
        assert_eq!(symbols(&coins), vec!["BCH", "BTC", "ETH", "LTC", "XLM"]);
    }

    #[test]
    fn test_equal_amounts_sorted_by_symbol() {
        let mut source = DemoBalanceSource::empty();
        source.set_price("LTC", "Litecoin", 85.0);
        source.set_price("BCH", "Bitcoin Cash", 420.0);
        source.set_balance(UserId::new("1"), "LTC", 2.0);
        source.set_balance(UserId::new("1"), "BCH", 2.0);

        let coins = source.balances_for(&UserId::new("1"));
        assert_eq!(symbols(&coins), vec!["BCH", "LTC"]);
    }

    #[tokio::test]
    async fn test_fetch_balances() {
        let source = DemoBalanceSource::seeded();
        let coins = source.fetch_balances(&UserId::new("1")).await.unwrap();
        assert_eq!(coins[0].symbol, "ETH");
        assert_eq!(coins[0].amount, 1.5);
    }
}
