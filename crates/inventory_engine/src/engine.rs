use std::sync::{mpsc, Arc};
use std::thread;

use inventory_logging::{log_debug, log_warn};

use crate::client::InventoryApi;
use crate::{ApiError, EngineCommand, EngineError, EngineEvent};

/// Receives engine completions. Called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Executes commands on a background tokio runtime.
///
/// Commands are not serialized: each one runs as its own task, so
/// overlapping requests complete in whatever order the server answers.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn InventoryApi>, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("inventory-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let api = api.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        handle_command(api.as_ref(), command, sink.as_ref()).await;
                    });
                }
                log_debug!("engine command channel closed");
            })?;

        Ok(Self { cmd_tx })
    }

    /// Queues a command. Returns `false` if the engine thread is gone.
    pub fn submit(&self, command: EngineCommand) -> bool {
        match self.cmd_tx.send(command) {
            Ok(()) => true,
            Err(mpsc::SendError(command)) => {
                log_warn!("engine stopped; dropping {:?}", command);
                false
            }
        }
    }
}

async fn handle_command(api: &dyn InventoryApi, command: EngineCommand, sink: &dyn EventSink) {
    let event = match command {
        EngineCommand::LoadCategories => {
            EngineEvent::CategoriesLoaded(logged("GET /categories", api.list_categories().await))
        }
        EngineCommand::LoadProducts => {
            EngineEvent::ProductsLoaded(logged("GET /produits", api.list_products().await))
        }
        EngineCommand::Search { query } => {
            let result = logged("GET /recherche", api.search(&query).await);
            EngineEvent::SearchCompleted { query, result }
        }
        EngineCommand::AddProduct(product) => {
            EngineEvent::ProductAdded(logged("POST /produits", api.add_product(&product).await))
        }
        EngineCommand::ApplyDelta { id, delta } => EngineEvent::DeltaApplied {
            id,
            result: logged("PUT /produits/:id", api.apply_delta(id, delta).await),
        },
        EngineCommand::DeleteProduct { id } => EngineEvent::ProductDeleted {
            id,
            result: logged("DELETE /produits/:id", api.delete_product(id).await),
        },
    };
    sink.emit(event);
}

fn logged<T>(operation: &str, result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(err) = &result {
        log_warn!("{} failed: {}", operation, err);
    }
    result
}
