// ============================================================================
// Logos des cryptos
// ============================================================================
// CONCEPT RUST : Fonction totale sur une énumération fermée
// - KnownSymbol liste les cryptos qui ont un logo
// - logo_for() couvre tous les cas : asset connu ou glyphe de repli
// - Le match est exhaustif, le compilateur vérifie qu'on n'oublie rien
// ============================================================================

use ratatui::style::Color;

/// Cryptos avec un logo dédié
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownSymbol {
    Btc,
    Bch,
    Eth,
    Ltc,
    Xlm,
}

impl KnownSymbol {
    /// Recherche insensible à la casse
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_ascii_uppercase().as_str() {
            "BTC" => Some(KnownSymbol::Btc),
            "BCH" => Some(KnownSymbol::Bch),
            "ETH" => Some(KnownSymbol::Eth),
            "LTC" => Some(KnownSymbol::Ltc),
            "XLM" => Some(KnownSymbol::Xlm),
            _ => None,
        }
    }

    /// Chemin de l'asset (servi par le frontend web)
    pub fn asset_path(&self) -> &'static str {
        match self {
            KnownSymbol::Btc => "/assets/btc.svg",
            KnownSymbol::Bch => "/assets/bch.svg",
            KnownSymbol::Eth => "/assets/eth.svg",
            KnownSymbol::Ltc => "/assets/ltc.svg",
            KnownSymbol::Xlm => "/assets/xlm.svg",
        }
    }

    /// Équivalent terminal du logo
    pub fn badge(&self) -> &'static str {
        match self {
            KnownSymbol::Btc => "₿",
            KnownSymbol::Bch => "Ƀ",
            KnownSymbol::Eth => "Ξ",
            KnownSymbol::Ltc => "Ł",
            KnownSymbol::Xlm => "✦",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            KnownSymbol::Btc => Color::Rgb(247, 147, 26),
            KnownSymbol::Bch => Color::Rgb(140, 193, 83),
            KnownSymbol::Eth => Color::Rgb(98, 126, 234),
            KnownSymbol::Ltc => Color::Rgb(191, 187, 187),
            KnownSymbol::Xlm => Color::Rgb(20, 182, 231),
        }
    }
}

/// Logo résolu pour une ligne
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logo {
    /// Logo d'un asset connu
    Asset(KnownSymbol),

    /// Première lettre du symbole, telle quelle
    Fallback(char),
}

impl Logo {
    /// Texte affiché dans la colonne logo
    pub fn glyph(&self) -> String {
        match self {
            Logo::Asset(known) => known.badge().to_string(),
            Logo::Fallback(c) => c.to_string(),
        }
    }
}

/// Résout le logo d'un symbole
///
/// Un symbole vide retombe sur "?".
pub fn logo_for(symbol: &str) -> Logo {
    match KnownSymbol::from_symbol(symbol) {
        Some(known) => Logo::Asset(known),
        None => Logo::Fallback(symbol.chars().next().unwrap_or('?')),
    }
}
