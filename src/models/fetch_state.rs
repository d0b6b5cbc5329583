// ============================================================================
// Enum : FetchState
// ============================================================================
// Résultat tri-état d'un chargement de balances
//
// CONCEPT RUST : Enums pour state machines
// - Un seul variant actif à la fois
// - Le compilateur force la vue à gérer les trois cas
// ============================================================================

use crate::models::{Coin, UserId};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    /// Requête en cours pour l'utilisateur courant
    #[default]
    Loading,

    /// Échec de la dernière requête (message destiné à l'utilisateur)
    Error(String),

    /// Balances dans l'ordre renvoyé par la source
    Ready(Vec<Coin>),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// Les coins si l'état est Ready
    pub fn coins(&self) -> Option<&[Coin]> {
        match self {
            FetchState::Ready(coins) => Some(coins),
            _ => None,
        }
    }
}

/// Étiquette d'une requête émise
///
/// Une réponse n'est acceptée que si son ticket est le dernier émis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Numéro de séquence croissant
    pub seq: u64,

    /// Utilisateur pour lequel la requête a été émise
    pub user_id: UserId,
}
