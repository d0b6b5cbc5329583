// ============================================================================
// Vue : liste des balances
// ============================================================================
// Projection pure de FetchState vers ce qui est affiché.
// Aucun état propre : même entrée, même sortie.
// ============================================================================

use crate::models::{Coin, CoinAction, FetchState};
use crate::ui::format;
use crate::ui::logo::{logo_for, Logo};

/// Texte de l'indicateur de chargement
pub const LOADING_TEXT: &str = "Loading…";

/// Ligne prête à dessiner
#[derive(Debug, Clone, PartialEq)]
pub struct CoinRow {
    pub logo: Logo,
    pub symbol: String,
    pub name: String,
    /// "$50,000.00"
    pub price: String,
    /// "$0.00"
    pub value: String,
    /// "0.00000000 BTC"
    pub amount: String,
    pub action: CoinAction,
}

impl CoinRow {
    pub fn from_coin(coin: &Coin) -> Self {
        Self {
            logo: logo_for(&coin.symbol),
            symbol: coin.symbol.clone(),
            name: coin.name.clone(),
            price: format::usd(coin.price),
            value: format::usd(coin.value),
            amount: format!("{} {}", format::amount(coin.amount), coin.symbol),
            action: coin.action(),
        }
    }
}

/// Ce que la vue doit afficher
#[derive(Debug, Clone, PartialEq)]
pub enum CoinListView {
    /// Un seul indicateur, aucune ligne
    Loading,

    /// Une seule ligne d'erreur, déjà préfixée par "Error: "
    Error(String),

    /// Une ligne par coin, dans l'ordre de la source (peut être vide)
    Rows(Vec<CoinRow>),
}

impl CoinListView {
    /// Nombre de lignes de coins (0 pour Loading et Error)
    pub fn row_count(&self) -> usize {
        match self {
            CoinListView::Rows(rows) => rows.len(),
            _ => 0,
        }
    }
}

/// FetchState -> CoinListView
pub fn project(state: &FetchState) -> CoinListView {
    match state {
        FetchState::Loading => CoinListView::Loading,
        FetchState::Error(message) => CoinListView::Error(format!("Error: {}", message)),
        FetchState::Ready(coins) => CoinListView::Rows(coins.iter().map(CoinRow::from_coin).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::logo::KnownSymbol;

    #[test]
    fn test_loading_has_no_rows() {
        let view = project(&FetchState::Loading);
        assert_eq!(view, CoinListView::Loading);
        assert_eq!(view.row_count(), 0);
    }

    #[test]
    fn test_error_text() {
        let view = project(&FetchState::Error("Service unavailable".to_string()));
        assert_eq!(view, CoinListView::Error("Error: Service unavailable".to_string()));
        assert_eq!(view.row_count(), 0);
    }

    #[test]
    fn test_empty_ready() {
        assert_eq!(project(&FetchState::Ready(vec![])), CoinListView::Rows(vec![]));
    }

    #[test]
    fn test_row_formatting() {
        let coin = Coin::new("ETH", "Ethereum", 3400.0, 1.5, 5100.0);
        let row = CoinRow::from_coin(&coin);

        assert_eq!(row.logo, Logo::Asset(KnownSymbol::Eth));
        assert_eq!(row.name, "Ethereum");
        assert_eq!(row.price, "$3,400.00");
        assert_eq!(row.value, "$5,100.00");
        assert_eq!(row.amount, "1.50000000 ETH");
        assert_eq!(row.action, CoinAction::Trade);
    }

    #[test]
    fn test_rows_keep_source_order() {
        let coins = vec![
            Coin::new("XLM", "Stellar", 0.12, 0.0, 0.0),
            Coin::new("BTC", "Bitcoin", 68000.0, 0.25, 17000.0),
            Coin::new("DOGE", "Dogecoin", 0.1, 0.0, 0.0),
        ];

        let CoinListView::Rows(rows) = project(&FetchState::Ready(coins)) else {
            panic!("expected rows");
        };
        let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["XLM", "BTC", "DOGE"]);
        assert_eq!(rows[2].logo, Logo::Fallback('D'));
    }
}
