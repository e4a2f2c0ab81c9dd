use crate::{NewProduct, ProductId};

/// Requests the core hands to the IO layer; each one produces exactly one
/// completion message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadCategories,
    LoadProducts,
    Search { query: String },
    AddProduct(NewProduct),
    ApplyDelta { id: ProductId, delta: i64 },
    DeleteProduct { id: ProductId },
}
