//! Inventory engine: HTTP client for the inventory backend and effect execution.
mod client;
mod engine;
mod types;

pub use client::{ClientSettings, InventoryApi, ReqwestInventoryApi};
pub use engine::{ChannelEventSink, EngineHandle, EventSink};
pub use types::{ApiError, EngineCommand, EngineError, EngineEvent, FailureKind};
