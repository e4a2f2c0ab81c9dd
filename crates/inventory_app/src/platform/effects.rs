use std::sync::{mpsc, Arc};

use inventory_core::{Effect, Failure, Msg};
use inventory_engine::{
    ApiError, EngineCommand, EngineError, EngineEvent, EngineHandle, EventSink, FailureKind,
    InventoryApi,
};
use inventory_logging::{log_error, log_info};

use super::app::AppEvent;

/// Runs core effects on the engine and feeds completions back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    events: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        api: Arc<dyn InventoryApi>,
        events: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let sink = Arc::new(MsgSink { tx: events.clone() });
        let engine = EngineHandle::new(api, sink)?;
        Ok(Self { engine, events })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            log_info!("effect {:?}", effect);
            let fallback = effect.clone();
            if !self.engine.submit(to_command(effect)) {
                // Without an engine no completion will arrive; answer locally.
                let msg = failed(fallback, Failure::network("moteur arrêté"));
                let _ = self.events.send(AppEvent::Engine(msg));
            }
        }
    }
}

struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Engine(map_event(event)));
    }
}

fn to_command(effect: Effect) -> EngineCommand {
    match effect {
        Effect::LoadCategories => EngineCommand::LoadCategories,
        Effect::LoadProducts => EngineCommand::LoadProducts,
        Effect::Search { query } => EngineCommand::Search { query },
        Effect::AddProduct(product) => EngineCommand::AddProduct(product),
        Effect::ApplyDelta { id, delta } => EngineCommand::ApplyDelta { id, delta },
        Effect::DeleteProduct { id } => EngineCommand::DeleteProduct { id },
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CategoriesLoaded(result) => {
            if let Err(err) = &result {
                log_error!("categories unavailable: {}", err);
            }
            Msg::CategoriesLoaded(result.map_err(map_failure))
        }
        EngineEvent::ProductsLoaded(result) => Msg::ProductsLoaded(result.map_err(map_failure)),
        EngineEvent::SearchCompleted { query: _, result } => {
            Msg::SearchLoaded(result.map_err(map_failure))
        }
        EngineEvent::ProductAdded(result) => Msg::ProductAdded(result.map_err(map_failure)),
        EngineEvent::DeltaApplied { id, result } => Msg::DeltaApplied {
            id,
            result: result.map_err(map_failure),
        },
        EngineEvent::ProductDeleted { id, result } => Msg::ProductDeleted {
            id,
            result: result.map_err(map_failure),
        },
    }
}

/// Non-2xx answers are application errors; everything else is reported as
/// a network failure carrying the engine's description.
fn map_failure(err: ApiError) -> Failure {
    match err.kind {
        FailureKind::HttpStatus {
            status,
            server_message,
        } => Failure::rejected(status, server_message),
        kind => Failure::network(format!("{kind} ({})", err.message)),
    }
}

fn failed(effect: Effect, failure: Failure) -> Msg {
    match effect {
        Effect::LoadCategories => Msg::CategoriesLoaded(Err(failure)),
        Effect::LoadProducts => Msg::ProductsLoaded(Err(failure)),
        Effect::Search { .. } => Msg::SearchLoaded(Err(failure)),
        Effect::AddProduct(_) => Msg::ProductAdded(Err(failure)),
        Effect::ApplyDelta { id, .. } => Msg::DeltaApplied {
            id,
            result: Err(failure),
        },
        Effect::DeleteProduct { id } => Msg::ProductDeleted {
            id,
            result: Err(failure),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn http_status_becomes_rejection_with_server_message() {
        let msg = map_event(EngineEvent::DeltaApplied {
            id: 4,
            result: Err(ApiError {
                kind: FailureKind::HttpStatus {
                    status: 400,
                    server_message: Some("stock insuffisant".to_string()),
                },
                message: "400 Bad Request".to_string(),
            }),
        });

        assert_eq!(
            msg,
            Msg::DeltaApplied {
                id: 4,
                result: Err(Failure::rejected(400, Some("stock insuffisant".to_string()))),
            }
        );
    }

    #[test]
    fn transport_errors_become_network_failures() {
        let msg = map_event(EngineEvent::ProductsLoaded(Err(ApiError {
            kind: FailureKind::Timeout,
            message: "operation timed out".to_string(),
        })));

        assert_eq!(
            msg,
            Msg::ProductsLoaded(Err(Failure::network("timeout (operation timed out)")))
        );
    }

    #[test]
    fn search_completion_maps_to_search_loaded() {
        let msg = map_event(EngineEvent::SearchCompleted {
            query: "bolt".to_string(),
            result: Ok(Vec::new()),
        });
        assert_eq!(msg, Msg::SearchLoaded(Ok(Vec::new())));
    }

    #[test]
    fn every_effect_has_a_local_failure_answer() {
        let failure = Failure::network("moteur arrêté");
        assert_eq!(
            failed(Effect::LoadProducts, failure.clone()),
            Msg::ProductsLoaded(Err(failure.clone()))
        );
        assert_eq!(
            failed(Effect::ApplyDelta { id: 2, delta: 1 }, failure.clone()),
            Msg::DeltaApplied {
                id: 2,
                result: Err(failure)
            }
        );
    }
}
