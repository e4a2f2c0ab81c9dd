use crate::{AddForm, CategoryId, Product, ProductId};

/// Quantities at or below this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;
pub const EMPTY_TABLE_MESSAGE: &str = "Aucun produit trouvé dans l'inventaire.";
pub const NO_CATEGORY_LABEL: &str = "Sans catégorie";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Out,
    Low,
    Healthy,
}

pub fn stock_level(quantite: i64) -> StockLevel {
    if quantite <= 0 {
        StockLevel::Out
    } else if quantite <= LOW_STOCK_THRESHOLD {
        StockLevel::Low
    } else {
        StockLevel::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRowView {
    pub id: ProductId,
    pub id_label: String,
    pub nom: String,
    pub categorie: String,
    pub quantite: i64,
    pub stock_label: String,
    pub level: StockLevel,
    /// Current contents of the row's delta field.
    pub delta_input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<ProductRowView>),
    /// Explicit empty-state row.
    Empty(String),
    /// Inline error row.
    Error(String),
}

/// Maps products to display rows. Never yields an empty body.
pub fn render_products(products: &[Product]) -> TableBody {
    if products.is_empty() {
        return TableBody::Empty(EMPTY_TABLE_MESSAGE.to_string());
    }
    TableBody::Rows(
        products
            .iter()
            .map(|product| ProductRowView {
                id: product.id,
                id_label: format!("#{}", product.id),
                nom: product.nom.clone(),
                categorie: product
                    .categorie
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(NO_CATEGORY_LABEL)
                    .to_string(),
                quantite: product.quantite,
                stock_label: format!("{} en stock", product.quantite),
                level: stock_level(product.quantite),
                delta_input: String::new(),
            })
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: CategoryId,
    pub nom: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub loading: bool,
    pub search_input: String,
    pub active_filter: Option<String>,
    pub categories: Vec<CategoryOption>,
    pub table: TableBody,
    pub form: AddForm,
    pub add_message: Option<String>,
    pub notice: Option<String>,
    pub alert: Option<String>,
    pub pending_delete: Option<ProductId>,
}
