use std::fmt;
use std::io;

use inventory_core::{Category, NewProduct, Product, ProductId};
use thiserror::Error;

/// Work the engine performs; one command maps to one HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    LoadCategories,
    LoadProducts,
    Search { query: String },
    AddProduct(NewProduct),
    ApplyDelta { id: ProductId, delta: i64 },
    DeleteProduct { id: ProductId },
}

/// Completion of an `EngineCommand`. Every command yields exactly one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CategoriesLoaded(Result<Vec<Category>, ApiError>),
    ProductsLoaded(Result<Vec<Product>, ApiError>),
    SearchCompleted {
        query: String,
        result: Result<Vec<Product>, ApiError>,
    },
    ProductAdded(Result<(), ApiError>),
    DeltaApplied {
        id: ProductId,
        result: Result<(), ApiError>,
    },
    ProductDeleted {
        id: ProductId,
        result: Result<(), ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The `error` field of a non-2xx JSON body, if there was one.
    pub fn server_message(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::HttpStatus { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus {
        status: u16,
        server_message: Option<String>,
    },
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Encode,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Encode => write!(f, "request encoding error"),
            FailureKind::Decode => write!(f, "response decoding error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
}
