//! Inventory core: pure state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{Category, CategoryId, Failure, NewProduct, Product, ProductId};
pub use msg::Msg;
pub use state::{AddForm, AppState, TableState};
pub use update::update;
pub use view_model::{
    render_products, stock_level, AppViewModel, CategoryOption, ProductRowView, StockLevel,
    TableBody, EMPTY_TABLE_MESSAGE, LOW_STOCK_THRESHOLD, NO_CATEGORY_LABEL,
};
