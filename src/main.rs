// ============================================================================
// Coinlist - Balances crypto par utilisateur
// ============================================================================
// Programme TUI : sélecteur d'utilisateur + liste des balances
// Charge les balances depuis l'API backend (ou la source demo)
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : résultats du worker → sélection → rendu → entrées
// 3. Worker thread : les requêtes async ne bloquent jamais l'UI
// 4. Restauration du terminal même en cas d'erreur
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use coinlist::api::{BalanceSource, DemoBalanceSource, HttpBalanceClient};
use coinlist::app::App;
use coinlist::config::{Config, SourceKind};
use coinlist::models::{FetchTicket, UserProvider};
use coinlist::ui::{events::EventHandler, render};
use coinlist::worker::{spawn_fetch_worker, WorkerCommand, WorkerResult};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à rotation quotidienne
// ============================================================================

/// Répertoire des logs
///
/// - Linux : ~/.local/share/coinlist/logs
/// - macOS : ~/Library/Application Support/coinlist/logs
/// - Sinon : ./logs
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("coinlist").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/coinlist/logs/coinlist.log.*
/// RUST_LOG=coinlist=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "coinlist.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Worker et UI sur des threads différents
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinlist=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

/// Construit la source de balances selon la config
fn build_source(config: &Config) -> Result<Arc<dyn BalanceSource>> {
    match config.source {
        SourceKind::Http => {
            info!(url = %config.api_base_url, "Using HTTP balances source");
            let client = HttpBalanceClient::new(&config.api_base_url, config.request_timeout())
                .context("Échec de la création du client HTTP")?;
            Ok(Arc::new(client))
        }
        SourceKind::Demo => {
            info!(latency_ms = config.demo_latency_ms, "Using demo balances source");
            Ok(Arc::new(
                DemoBalanceSource::seeded().with_latency(config.demo_latency()),
            ))
        }
    }
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("Coinlist starting up");

    let config = Config::load().context("Échec du chargement de la configuration")?;
    let source = build_source(&config)?;

    // Racine de la sélection d'utilisateur : vit jusqu'à la fin de main()
    let provider = UserProvider::new(config.default_user.clone());
    let mut app = App::new(provider.handle(), config.users.clone())
        .context("Échec de l'initialisation de l'application")?;

    // Channels avec le worker
    // - command_tx/rx : tickets à charger
    // - result_tx/rx : réponses étiquetées
    let (command_tx, command_rx) = mpsc::channel::<WorkerCommand>();
    let (result_tx, result_rx) = mpsc::channel::<WorkerResult>();

    info!("Spawning background worker thread");
    let worker = spawn_fetch_worker(source, command_rx, result_tx)
        .context("Échec du démarrage du worker")?;

    // Premier chargement avant même le premier rendu
    let ticket = app.activate()?;
    send_fetch(&command_tx, ticket);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::default();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    // Ferme le channel de commandes : le worker sort de sa boucle
    drop(command_tx);
    if worker.join().is_err() {
        warn!("Worker thread panicked");
    }

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Transmet un ticket au worker
fn send_fetch(command_tx: &mpsc::Sender<WorkerCommand>, ticket: FetchTicket) {
    if command_tx.send(WorkerCommand::FetchBalances(ticket)).is_err() {
        error!("Worker channel closed, fetch not sent");
    }
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Appliquer les réponses du worker
//   1. Relancer le chargement si l'utilisateur a changé ailleurs
//   2. Dessiner l'interface
//   3. Traiter les entrées clavier
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<WorkerCommand>,
    result_rx: &mpsc::Receiver<WorkerResult>,
) -> Result<()> {
    while app.is_running() {
        // 0. RÉSULTATS : on vide tout ce qui est arrivé depuis le dernier tour
        loop {
            match result_rx.try_recv() {
                Ok(result) => {
                    if !app.apply_result(result) {
                        debug!("Stale worker result ignored");
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    error!("Worker thread disconnected!");
                    break;
                }
            }
        }

        // 1. SÉLECTION
        if let Some(ticket) = app.sync_selection()? {
            send_fetch(command_tx, ticket);
        }

        // 2. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 3. INPUT
        let event = events.next()?;
        handle_event(app, event, command_tx)?;
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// Les erreurs de sélection (handle détaché) remontent : c'est un bug
/// de câblage, pas une situation à masquer.
fn handle_event(
    app: &mut App,
    event: coinlist::ui::events::Event,
    command_tx: &mpsc::Sender<WorkerCommand>,
) -> Result<()> {
    use coinlist::ui::events::{
        get_user_index_from_event, is_escape_event, is_next_user_event, is_previous_user_event,
        is_quit_event, is_refresh_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step confirmation pour éviter les quits accidentels
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_escape_event(&event) => {
            app.cancel_quit();
        }

        Event::Key(_) if is_refresh_event(&event) => {
            app.cancel_quit();
            send_fetch(command_tx, app.refresh()?);
        }

        Event::Key(_) if is_next_user_event(&event) => {
            app.cancel_quit();
            if let Some(ticket) = app.next_user()? {
                send_fetch(command_tx, ticket);
            }
        }

        Event::Key(_) if is_previous_user_event(&event) => {
            app.cancel_quit();
            if let Some(ticket) = app.previous_user()? {
                send_fetch(command_tx, ticket);
            }
        }

        Event::Key(_) if get_user_index_from_event(&event).is_some() => {
            app.cancel_quit();
            if let Some(index) = get_user_index_from_event(&event) {
                if let Some(ticket) = app.select_user_at(index)? {
                    send_fetch(command_tx, ticket);
                }
            }
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        Event::Tick => {}
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
