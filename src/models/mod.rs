// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : balances, utilisateur, état
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod coin;        // Balance d'une crypto (coin.rs)
pub mod fetch_state; // Loading / Error / Ready (fetch_state.rs)
pub mod user;        // Sélection de l'utilisateur (user.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use coinlist::models::coin::Coin;
// On peut faire : use coinlist::models::Coin;
pub use coin::{Coin, CoinAction};
pub use fetch_state::{FetchState, FetchTicket};
pub use user::{UserHandle, UserId, UserProvider};
