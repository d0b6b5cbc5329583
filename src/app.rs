// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Le sélecteur et la liste partagent l'utilisateur via un UserHandle
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Chaque changement d'utilisateur retourne un FetchTicket que
//   l'event loop transmet au worker
// - Un changement fait par un autre UserHandle est détecté via la
//   version de la sélection (sync_selection, appelé à chaque tour)
// ============================================================================

use chrono::{DateTime, Local};
use tracing::{debug, info};

use crate::config::UserOption;
use crate::controller::BalanceController;
use crate::error::Result;
use crate::models::{FetchState, FetchTicket, UserHandle, UserId};
use crate::ui::coin_list::{self, CoinListView};
use crate::worker::WorkerResult;

/// Affiché tant qu'un changement d'utilisateur n'a pas été pris en compte
static LOADING: FetchState = FetchState::Loading;

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Options du sélecteur d'utilisateur, dans l'ordre d'affichage
    pub users: Vec<UserOption>,

    /// Accès partagé à l'utilisateur actif
    user: UserHandle,

    /// Machine à états Loading / Error / Ready
    controller: BalanceController,

    /// Version de la sélection pour laquelle le dernier chargement a été émis
    seen_version: u64,

    /// Two-step quit : première pression de 'q' arme, seconde quitte
    pub confirm_quit: bool,

    /// Heure du dernier chargement réussi
    pub last_updated: Option<DateTime<Local>>,
}

impl App {
    /// Crée l'application
    ///
    /// Échoue si le handle n'est rattaché à aucun provider : une erreur
    /// de câblage doit stopper le démarrage.
    pub fn new(user: UserHandle, users: Vec<UserOption>) -> Result<Self> {
        let (current, version) = user.selection()?;
        debug!(user = %current, options = users.len(), "App created");

        Ok(Self {
            running: true,
            users,
            user,
            controller: BalanceController::new(),
            seen_version: version,
            confirm_quit: false,
            last_updated: None,
        })
    }

    /// Premier chargement pour l'utilisateur initial
    pub fn activate(&mut self) -> Result<FetchTicket> {
        let (current, version) = self.user.selection()?;
        self.seen_version = version;
        Ok(self.controller.activate(current))
    }

    /// Relance le chargement pour l'utilisateur courant
    pub fn refresh(&mut self) -> Result<FetchTicket> {
        let (current, version) = self.user.selection()?;
        info!(user = %current, "Refreshing balances");
        self.seen_version = version;
        Ok(self.controller.activate(current))
    }

    /// Prend en compte un changement d'utilisateur, quel que soit le
    /// handle qui l'a fait
    ///
    /// Retourne le ticket à transmettre au worker, ou None si la
    /// sélection n'a pas bougé depuis le dernier chargement.
    pub fn sync_selection(&mut self) -> Result<Option<FetchTicket>> {
        let (current, version) = self.user.selection()?;
        if version == self.seen_version {
            return Ok(None);
        }

        debug!(user = %current, version, "Selection changed, reloading");
        self.seen_version = version;
        Ok(Some(self.controller.activate(current)))
    }

    /// Vrai si la sélection a changé sans qu'un chargement ait été émis
    fn selection_pending(&self) -> bool {
        self.user
            .selection()
            .map(|(_, version)| version != self.seen_version)
            .unwrap_or(false)
    }

    /// Change l'utilisateur actif
    ///
    /// Retourne le ticket à transmettre au worker, ou None si
    /// l'utilisateur était déjà sélectionné.
    pub fn select_user(&mut self, id: UserId) -> Result<Option<FetchTicket>> {
        if !self.user.set_user_id(id.clone())? {
            return Ok(None);
        }

        info!(user = %id, "User selected");
        self.sync_selection()
    }

    /// Sélectionne l'option à l'index donné (touches 1, 2, ...)
    pub fn select_user_at(&mut self, index: usize) -> Result<Option<FetchTicket>> {
        match self.users.get(index) {
            Some(option) => {
                let id = option.id.clone();
                self.select_user(id)
            }
            None => Ok(None),
        }
    }

    /// Option suivante (cyclique)
    pub fn next_user(&mut self) -> Result<Option<FetchTicket>> {
        if self.users.is_empty() {
            return Ok(None);
        }
        let index = match self.selected_user_index() {
            Some(index) => (index + 1) % self.users.len(),
            None => 0,
        };
        self.select_user_at(index)
    }

    /// Option précédente (cyclique)
    pub fn previous_user(&mut self) -> Result<Option<FetchTicket>> {
        if self.users.is_empty() {
            return Ok(None);
        }
        let index = match self.selected_user_index() {
            Some(0) | None => self.users.len() - 1,
            Some(index) => index - 1,
        };
        self.select_user_at(index)
    }

    /// Utilisateur actif
    pub fn current_user(&self) -> Result<UserId> {
        self.user.user_id()
    }

    /// Index de l'utilisateur actif dans le sélecteur
    ///
    /// None si l'identifiant actif ne figure pas dans les options.
    pub fn selected_user_index(&self) -> Option<usize> {
        let current = self.user.user_id().ok()?;
        self.users.iter().position(|option| option.id == current)
    }

    /// Applique une réponse du worker
    ///
    /// Retourne `false` si la réponse était périmée.
    pub fn apply_result(&mut self, result: WorkerResult) -> bool {
        match result {
            WorkerResult::Balances { ticket, result } => {
                let applied = self.controller.settle(&ticket, result);
                if applied && matches!(self.controller.state(), FetchState::Ready(_)) {
                    self.last_updated = Some(Local::now());
                }
                applied
            }
        }
    }

    /// État affiché : Loading dès que la sélection a changé, même avant
    /// que l'event loop ait émis la requête
    pub fn fetch_state(&self) -> &FetchState {
        if self.selection_pending() {
            &LOADING
        } else {
            self.controller.state()
        }
    }

    /// Vrai tant qu'une requête est en cours (indicateur du header)
    pub fn is_loading_data(&self) -> bool {
        self.controller.is_in_flight() || self.selection_pending()
    }

    /// Projection de l'état pour la vue
    pub fn view(&self) -> CoinListView {
        coin_list::project(self.fetch_state())
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Coin, UserProvider};

    fn users() -> Vec<UserOption> {
        vec![UserOption::new("1", "User 1"), UserOption::new("2", "User 2")]
    }

    fn app_with(provider: &UserProvider) -> App {
        App::new(provider.handle(), users()).unwrap()
    }

    #[test]
    fn test_app_creation() {
        let provider = UserProvider::default();
        let app = app_with(&provider);

        assert!(app.is_running());
        assert_eq!(app.selected_user_index(), Some(0));
        assert!(app.fetch_state().is_loading());
    }

    #[test]
    fn test_detached_handle_aborts() {
        let result = App::new(UserHandle::default(), users());
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_select_user_sets_loading() {
        let provider = UserProvider::default();
        let mut app = app_with(&provider);

        let first = app.activate().unwrap();
        assert!(app.apply_result(WorkerResult::Balances {
            ticket: first,
            result: Ok(vec![]),
        }));
        assert!(!app.fetch_state().is_loading());

        let ticket = app.select_user(UserId::new("2")).unwrap().unwrap();
        assert_eq!(ticket.user_id.as_str(), "2");
        assert!(app.fetch_state().is_loading());
        assert!(app.is_loading_data());
    }

    #[test]
    fn test_change_from_another_handle_reloads() {
        let provider = UserProvider::default();
        let mut app = app_with(&provider);

        let first = app.activate().unwrap();
        app.apply_result(WorkerResult::Balances {
            ticket: first,
            result: Ok(vec![Coin::new("BTC", "Bitcoin", 50000.0, 0.0, 0.0)]),
        });
        assert!(!app.is_loading_data());

        // Un autre composant change l'utilisateur
        provider.handle().set_user_id(UserId::new("2")).unwrap();
        assert!(app.fetch_state().is_loading());
        assert_eq!(app.view(), CoinListView::Loading);
        assert!(app.is_loading_data());
        assert_eq!(app.selected_user_index(), Some(1));

        let ticket = app.sync_selection().unwrap().unwrap();
        assert_eq!(ticket.user_id.as_str(), "2");
        assert!(app.fetch_state().is_loading());
        assert!(app.sync_selection().unwrap().is_none());

        assert!(app.apply_result(WorkerResult::Balances {
            ticket,
            result: Ok(vec![]),
        }));
        assert_eq!(app.fetch_state(), &FetchState::Ready(vec![]));
    }

    #[test]
    fn test_late_result_before_sync_stays_hidden() {
        let provider = UserProvider::default();
        let mut app = app_with(&provider);
        let first = app.activate().unwrap();

        provider.handle().set_user_id(UserId::new("2")).unwrap();
        app.apply_result(WorkerResult::Balances {
            ticket: first,
            result: Ok(vec![]),
        });

        // La réponse pour "1" ne doit pas s'afficher sous "2"
        assert!(app.fetch_state().is_loading());
    }

    #[test]
    fn test_reselect_is_noop() {
        let provider = UserProvider::default();
        let mut app = app_with(&provider);
        app.activate().unwrap();

        assert!(app.select_user(UserId::new("1")).unwrap().is_none());
    }

    #[test]
    fn test_user_cycling() {
        let provider = UserProvider::default();
        let mut app = app_with(&provider);

        app.next_user().unwrap();
        assert_eq!(app.current_user().unwrap().as_str(), "2");

        app.next_user().unwrap();
        assert_eq!(app.current_user().unwrap().as_str(), "1");

        app.previous_user().unwrap();
        assert_eq!(app.current_user().unwrap().as_str(), "2");

        assert!(app.select_user_at(5).unwrap().is_none());
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let provider = UserProvider::default();
        let mut app = app_with(&provider);

        let for_one = app.activate().unwrap();
        let for_two = app.select_user(UserId::new("2")).unwrap().unwrap();

        let coin = Coin::new("BTC", "Bitcoin", 68000.0, 1.0, 68000.0);
        assert!(app.apply_result(WorkerResult::Balances {
            ticket: for_two,
            result: Ok(vec![coin.clone()]),
        }));
        assert!(!app.apply_result(WorkerResult::Balances {
            ticket: for_one,
            result: Ok(vec![]),
        }));

        assert_eq!(app.fetch_state(), &FetchState::Ready(vec![coin]));
        assert!(app.last_updated.is_some());
    }

    #[test]
    fn test_app_quit() {
        let provider = UserProvider::default();
        let mut app = app_with(&provider);

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }
}
