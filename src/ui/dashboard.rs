// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// ┌──────────────── Available Coins ────────────────┐
// │ User:  User 1   User 2              maj 14:02:11 │  <- sélecteur
// ├──────────────────────────────────────────────────┤
// │ ₿ Bitcoin   $68,000.00   $17,000.00  0.25… [Trade]│  <- liste
// ├──────────────────────────────────────────────────┤
// │ [q] Quit  [1-2 / Tab] User  [r] Refresh           │  <- footer
// └──────────────────────────────────────────────────┘
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Line et Span : texte multi-styles sur une ligne
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::CoinAction;
use crate::ui::coin_list::{CoinListView, CoinRow, LOADING_TEXT};
use crate::ui::logo::Logo;

/// Largeur maximale du nom affiché
const NAME_WIDTH: usize = 16;

const FETCHING_TEXT: &str = "⟳ fetching";

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_coin_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : sélecteur d'utilisateur
            Constraint::Min(0),    // Content : la liste
            Constraint::Length(3), // Footer : raccourcis
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : sélecteur d'utilisateur
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Available Coins ")
        .title_alignment(Alignment::Center);

    let selected = app.selected_user_index();
    let mut spans = vec![Span::styled(
        "User: ",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    for (index, option) in app.users.iter().enumerate() {
        let style = if Some(index) == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", option.label), style));
        spans.push(Span::raw(" "));
    }

    // Identifiant hors liste (config modifiée, etc.) : on l'affiche quand même
    if selected.is_none() {
        if let Ok(current) = app.current_user() {
            spans.push(Span::styled(
                format!(" {} ", current),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ));
        }
    }

    // Indicateur de requête en cours, sinon l'heure du dernier chargement
    if app.is_loading_data() {
        spans.push(Span::styled(
            format!("  {}", FETCHING_TEXT),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(updated) = app.last_updated {
        spans.push(Span::styled(
            format!("  updated {}", updated.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Main Content : liste des balances
// ============================================================================

fn render_coin_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Balances ");

    match app.view() {
        CoinListView::Loading => {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(LOADING_TEXT, Style::default().fg(Color::Gray))),
            ])
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }
        CoinListView::Error(text) => {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    text,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
            ])
            .block(block)
            .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }
        CoinListView::Rows(rows) => {
            let items: Vec<ListItem> = rows.iter().map(coin_item).collect();
            let list = List::new(items).block(block);
            frame.render_widget(list, area);
        }
    }
}

/// Une ligne de la liste : logo, nom, prix, valeur, quantité, action
fn coin_item(row: &CoinRow) -> ListItem<'static> {
    let logo = match row.logo {
        Logo::Asset(known) => Span::styled(
            format!(" {} ", known.badge()),
            Style::default().fg(known.color()).add_modifier(Modifier::BOLD),
        ),
        Logo::Fallback(_) => Span::styled(
            format!("[{}]", row.logo.glyph()),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let action_style = match row.action {
        CoinAction::Trade => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        CoinAction::Buy => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    };

    let line = Line::from(vec![
        logo,
        Span::raw(" "),
        Span::styled(
            format!("{:<width$}", truncate_name(&row.name), width = NAME_WIDTH),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {:>14}", row.price), Style::default().fg(Color::Gray)),
        Span::styled(format!(" {:>16}", row.value), Style::default().fg(Color::Cyan)),
        Span::raw(format!(" {:>24}", row.amount)),
        Span::raw("  "),
        Span::styled(format!("[{}]", row.action.label()), action_style),
    ]);

    ListItem::new(line)
}

/// Tronque le nom avec ellipse si nécessaire
fn truncate_name(name: &str) -> String {
    if name.chars().count() <= NAME_WIDTH {
        name.to_string()
    } else {
        let truncated: String = name.chars().take(NAME_WIDTH - 1).collect();
        format!("{}…", truncated)
    }
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        let user_keys = format!("[1-{} / Tab]", app.users.len().max(1));
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled(user_keys, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" User  "),
            Span::styled("[r]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Refresh"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserOption;
    use crate::error::AppError;
    use crate::models::{Coin, UserProvider};
    use crate::worker::WorkerResult;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 16)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app(provider: &UserProvider) -> App {
        App::new(
            provider.handle(),
            vec![UserOption::new("1", "User 1"), UserOption::new("2", "User 2")],
        )
        .unwrap()
    }

    #[test]
    fn test_render_loading() {
        let provider = UserProvider::default();
        let mut app = app(&provider);
        app.activate().unwrap();

        let screen = draw(&app);
        assert!(screen.contains(LOADING_TEXT));
        assert!(screen.contains("User 1"));
        assert!(screen.contains("User 2"));
    }

    #[test]
    fn test_render_rows() {
        let provider = UserProvider::default();
        let mut app = app(&provider);
        let ticket = app.activate().unwrap();
        app.apply_result(WorkerResult::Balances {
            ticket,
            result: Ok(vec![Coin::new("BTC", "Bitcoin", 50000.0, 0.0, 0.0)]),
        });

        let screen = draw(&app);
        assert!(screen.contains("Bitcoin"));
        assert!(screen.contains("$50,000.00"));
        assert!(screen.contains("$0.00"));
        assert!(screen.contains("0.00000000 BTC"));
        assert!(screen.contains("[Buy]"));
    }

    #[test]
    fn test_header_shows_fetch_indicator() {
        let provider = UserProvider::default();
        let mut app = app(&provider);
        let ticket = app.activate().unwrap();
        assert!(draw(&app).contains("fetching"));

        app.apply_result(WorkerResult::Balances {
            ticket,
            result: Ok(vec![]),
        });
        let screen = draw(&app);
        assert!(!screen.contains("fetching"));
        assert!(screen.contains("updated"));

        app.refresh().unwrap();
        assert!(draw(&app).contains("fetching"));
    }

    #[test]
    fn test_render_error() {
        let provider = UserProvider::default();
        let mut app = app(&provider);
        let ticket = app.activate().unwrap();
        app.apply_result(WorkerResult::Balances {
            ticket,
            result: Err(AppError::Network("Service unavailable".to_string())),
        });

        let screen = draw(&app);
        assert!(screen.contains("Error: Service unavailable"));
        assert!(!screen.contains("[Buy]"));
    }

    #[test]
    fn test_render_quit_confirmation() {
        let provider = UserProvider::default();
        let mut app = app(&provider);
        app.request_quit();

        assert!(draw(&app).contains("again to quit"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Bitcoin"), "Bitcoin");
        assert_eq!(truncate_name("A very long coin name"), "A very long coi…");
    }
}
