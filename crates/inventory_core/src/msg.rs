use crate::{Category, CategoryId, Failure, Product, ProductId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Application start: load categories and the full product list.
    Started,
    /// User edited the search box.
    SearchInputChanged(String),
    /// User submitted the search box.
    SearchSubmitted,
    /// User asked to reload the current (possibly filtered) view.
    RefreshRequested,
    /// User edited the delta field of a product row.
    DeltaInputChanged { id: ProductId, text: String },
    /// User validated the delta field of a product row.
    DeltaSubmitted { id: ProductId },
    AddNameChanged(String),
    AddQuantityChanged(String),
    AddCategoryChanged(Option<CategoryId>),
    /// User submitted the add-product form.
    AddSubmitted,
    /// User clicked delete on a row; waits for confirmation.
    DeleteRequested { id: ProductId },
    DeleteConfirmed,
    DeleteCancelled,
    /// User acknowledged the blocking alert.
    AlertDismissed,
    /// Engine completion for `Effect::LoadCategories`.
    CategoriesLoaded(Result<Vec<Category>, Failure>),
    /// Engine completion for `Effect::LoadProducts`.
    ProductsLoaded(Result<Vec<Product>, Failure>),
    /// Engine completion for `Effect::Search`.
    SearchLoaded(Result<Vec<Product>, Failure>),
    /// Engine completion for `Effect::AddProduct`.
    ProductAdded(Result<(), Failure>),
    /// Engine completion for `Effect::ApplyDelta`.
    DeltaApplied {
        id: ProductId,
        result: Result<(), Failure>,
    },
    /// Engine completion for `Effect::DeleteProduct`.
    ProductDeleted {
        id: ProductId,
        result: Result<(), Failure>,
    },
}
