// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Poll avec timeout : la boucle continue même sans touche pressée
// 3. Pattern matching sur KeyCode pour classer les touches
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (permet de traiter les résultats du worker)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - Si pas d'événement avant tick_rate, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                // On ne veut gérer que Press pour éviter les doublons
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),

                // Resize, souris, Release : un tick suffit à redessiner
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

/// 'q' : quitter (avec confirmation)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Échap
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// 'r' : recharger les balances
pub fn is_refresh_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('r') | KeyCode::Char('R'))
    } else {
        false
    }
}

/// Tab, → ou 'l' : utilisateur suivant
pub fn is_next_user_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Tab | KeyCode::Right | KeyCode::Char('l'))
    } else {
        false
    }
}

/// Shift+Tab, ← ou 'h' : utilisateur précédent
pub fn is_previous_user_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h'))
    } else {
        false
    }
}

/// '1'..'9' : index (0-based) de l'option du sélecteur
pub fn get_user_index_from_event(event: &Event) -> Option<usize> {
    if let Event::Key(key) = event {
        if let KeyCode::Char(c) = key.code {
            return c
                .to_digit(10)
                .filter(|digit| *digit > 0)
                .map(|digit| digit as usize - 1);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
