use serde::{Deserialize, Serialize};

pub type ProductId = i64;
pub type CategoryId = i64;

/// A product row as served by `/produits` and `/recherche`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub nom: String,
    pub quantite: i64,
    #[serde(default)]
    pub categorie_id: Option<CategoryId>,
    /// Denormalized category name joined in by the server.
    #[serde(default)]
    pub categorie: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub nom: String,
}

/// Body of `POST /produits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub nom: String,
    pub quantite: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorie_id: Option<CategoryId>,
}

/// Why a backend call failed, as far as the UI is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The request never produced an HTTP response.
    Network { detail: String },
    /// The server answered with a non-2xx status.
    Rejected {
        status: u16,
        message: Option<String>,
    },
}

impl Failure {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// Server message if one was provided, otherwise `fallback`.
    /// Network failures always report their own detail.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Failure::Network { detail } => format!("Erreur réseau : {detail}"),
            Failure::Rejected { .. } => self.detail_or(fallback),
        }
    }

    /// Like [`Failure::message_or`] but without the network prefix, for
    /// texts that already carry their own `Erreur : ` lead.
    pub fn detail_or(&self, fallback: &str) -> String {
        match self {
            Failure::Network { detail } => detail.clone(),
            Failure::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            Failure::Rejected { .. } => fallback.to_string(),
        }
    }
}
