// ============================================================================
// Background Worker
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui possède un runtime tokio
// - Reçoit des WorkerCommand via un channel (command_rx)
// - Envoie des WorkerResult via un autre channel (result_tx)
// - Chaque fetch est une tâche tokio : les réponses peuvent arriver dans
//   le désordre, c'est le contrôleur qui trie avec les tickets
// ============================================================================

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use tracing::{error, info};

use crate::api::BalanceSource;
use crate::error::Result;
use crate::models::{Coin, FetchTicket};

/// Commandes envoyées au worker
#[derive(Debug, Clone)]
pub enum WorkerCommand {
    /// Charger les balances pour le ticket donné
    FetchBalances(FetchTicket),
}

/// Résultats renvoyés par le worker
#[derive(Debug)]
pub enum WorkerResult {
    /// Réponse (succès ou échec) étiquetée avec son ticket
    Balances {
        ticket: FetchTicket,
        result: Result<Vec<Coin>>,
    },
}

/// Lance le worker thread
///
/// Le thread s'arrête quand tous les `Sender<WorkerCommand>` sont fermés ;
/// les requêtes encore en vol sont alors abandonnées avec le runtime.
pub fn spawn_fetch_worker(
    source: Arc<dyn BalanceSource>,
    command_rx: mpsc::Receiver<WorkerCommand>,
    result_tx: mpsc::Sender<WorkerResult>,
) -> std::io::Result<JoinHandle<()>> {
    // Le runtime est créé avant le thread pour propager l'erreur
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("coinlist-fetch")
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("coinlist-worker".to_string())
        .spawn(move || {
            // Boucle de traitement des commandes
            // - recv() bloque ce thread (pas l'UI)
            // - chaque commande devient une tâche sur le runtime
            while let Ok(command) = command_rx.recv() {
                info!(?command, "Worker received command");

                match command {
                    WorkerCommand::FetchBalances(ticket) => {
                        let source = Arc::clone(&source);
                        let result_tx = result_tx.clone();

                        runtime.spawn(async move {
                            let result = source.fetch_balances(&ticket.user_id).await;
                            if result_tx.send(WorkerResult::Balances { ticket, result }).is_err() {
                                error!("Result channel closed, dropping balance response");
                            }
                        });
                    }
                }
            }

            info!("Worker thread exiting (channel closed)");
        })
}
