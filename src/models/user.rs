// ============================================================================
// Sélection de l'utilisateur
// ============================================================================
// Source de vérité unique pour l'utilisateur actif.
//
// CONCEPT RUST : Contexte explicite plutôt qu'état global
// - UserProvider : possède la valeur (racine de l'application)
// - UserHandle : accès partagé pour les composants descendants
// - Le handle garde un Weak : si le provider disparaît, l'accès échoue
//   avec une erreur de configuration au lieu d'inventer une valeur
// - Chaque changement incrémente une version : les observateurs (App)
//   comparent la version vue pour relancer le chargement
// ============================================================================

use std::fmt;
use std::sync::{Arc, RwLock, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, Result};

const OUTSIDE_PROVIDER: &str = "user selection used outside provider";

/// Identifiant opaque d'un utilisateur ("1", "2", ...)
///
/// Aucune validation : toute chaîne est acceptée, égalité stricte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new("1")
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Valeur partagée : utilisateur actif et nombre de changements
#[derive(Debug)]
struct Selection {
    user_id: UserId,
    version: u64,
}

/// Racine de la sélection d'utilisateur
///
/// Vit aussi longtemps que l'application ; le drop ferme tous les handles.
#[derive(Debug)]
pub struct UserProvider {
    current: Arc<RwLock<Selection>>,
}

impl UserProvider {
    pub fn new(initial: UserId) -> Self {
        Self {
            current: Arc::new(RwLock::new(Selection {
                user_id: initial,
                version: 0,
            })),
        }
    }

    /// Crée un handle pour un composant descendant
    pub fn handle(&self) -> UserHandle {
        UserHandle {
            current: Arc::downgrade(&self.current),
        }
    }
}

impl Default for UserProvider {
    fn default() -> Self {
        Self::new(UserId::default())
    }
}

/// Accès à la sélection depuis un composant
///
/// `UserHandle::default()` n'est rattaché à aucun provider.
#[derive(Debug, Clone, Default)]
pub struct UserHandle {
    current: Weak<RwLock<Selection>>,
}

impl UserHandle {
    fn scope(&self) -> Result<Arc<RwLock<Selection>>> {
        self.current
            .upgrade()
            .ok_or_else(|| AppError::Configuration(OUTSIDE_PROVIDER.to_string()))
    }

    /// Retourne l'utilisateur actif
    pub fn user_id(&self) -> Result<UserId> {
        self.selection().map(|(user_id, _)| user_id)
    }

    /// Utilisateur actif et version de la sélection, lus ensemble
    pub fn selection(&self) -> Result<(UserId, u64)> {
        let scope = self.scope()?;
        let guard = scope
            .read()
            .map_err(|_| AppError::Configuration("user selection lock poisoned".to_string()))?;
        Ok((guard.user_id.clone(), guard.version))
    }

    /// Remplace l'utilisateur actif
    ///
    /// Retourne `true` si la valeur a réellement changé (la version
    /// n'est incrémentée que dans ce cas).
    pub fn set_user_id(&self, id: UserId) -> Result<bool> {
        let scope = self.scope()?;
        let mut guard = scope
            .write()
            .map_err(|_| AppError::Configuration("user selection lock poisoned".to_string()))?;

        if guard.user_id == id {
            debug!(user = %id, "User already selected");
            return Ok(false);
        }

        guard.version += 1;
        debug!(
            from = %guard.user_id,
            to = %id,
            version = guard.version,
            "User selection changed"
        );
        guard.user_id = id;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_is_one() {
        let provider = UserProvider::default();
        assert_eq!(provider.handle().user_id().unwrap(), UserId::new("1"));
    }

    #[test]
    fn test_set_user_is_shared_between_handles() {
        let provider = UserProvider::default();
        let switcher = provider.handle();
        let list = provider.handle();

        assert!(switcher.set_user_id(UserId::new("2")).unwrap());
        assert_eq!(list.user_id().unwrap().as_str(), "2");
    }

    #[test]
    fn test_reselect_is_noop() {
        let provider = UserProvider::default();
        let handle = provider.handle();
        assert!(!handle.set_user_id(UserId::new("1")).unwrap());
        assert_eq!(handle.selection().unwrap().1, 0);
    }

    #[test]
    fn test_version_counts_changes_from_any_handle() {
        let provider = UserProvider::default();
        let switcher = provider.handle();
        let list = provider.handle();

        switcher.set_user_id(UserId::new("2")).unwrap();
        switcher.set_user_id(UserId::new("1")).unwrap();

        assert_eq!(list.selection().unwrap(), (UserId::new("1"), 2));
    }

    #[test]
    fn test_any_string_is_accepted() {
        let provider = UserProvider::default();
        let handle = provider.handle();
        assert!(handle.set_user_id(UserId::new("not-a-number")).unwrap());
        assert_eq!(handle.user_id().unwrap().as_str(), "not-a-number");
    }

    #[test]
    fn test_detached_handle_fails() {
        let handle = UserHandle::default();
        assert!(matches!(handle.user_id(), Err(AppError::Configuration(_))));
        assert!(matches!(
            handle.set_user_id(UserId::new("2")),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_handle_fails_after_provider_dropped() {
        let provider = UserProvider::default();
        let handle = provider.handle();
        drop(provider);

        let err = handle.user_id().unwrap_err();
        assert!(err.to_string().contains("outside provider"));
    }
}
