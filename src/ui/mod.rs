// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod coin_list; // Projection FetchState -> lignes
pub mod dashboard; // Rendu de l'interface principale
pub mod events;    // Gestion des événements clavier
pub mod format;    // Formatage USD / quantités
pub mod logo;      // Logos des cryptos

// Re-exports pour simplifier les imports
pub use coin_list::{project, CoinListView, CoinRow};
pub use dashboard::render;
pub use events::{Event, EventHandler};
