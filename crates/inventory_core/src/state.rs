use std::collections::BTreeMap;

use crate::view_model::{render_products, AppViewModel, CategoryOption, TableBody};
use crate::{Category, CategoryId, Product, ProductId};

/// What the product table currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableState {
    Rows(Vec<Product>),
    Error(String),
}

impl Default for TableState {
    fn default() -> Self {
        TableState::Rows(Vec::new())
    }
}

/// Raw contents of the add-product form fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddForm {
    pub nom: String,
    pub quantite: String,
    pub categorie_id: Option<CategoryId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    categories: Vec<Category>,
    table: TableState,
    loading: bool,
    /// Sticky filter; empty means the unfiltered list.
    last_query: String,
    /// The search in flight was re-issued by a refresh, not typed.
    refresh_search: bool,
    search_input: String,
    form: AddForm,
    add_message: Option<String>,
    notice: Option<String>,
    delta_inputs: BTreeMap<ProductId, String>,
    pending_delete: Option<ProductId>,
    alert: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let table = match &self.table {
            TableState::Rows(products) => match render_products(products) {
                TableBody::Rows(mut rows) => {
                    for row in &mut rows {
                        if let Some(text) = self.delta_inputs.get(&row.id) {
                            row.delta_input = text.clone();
                        }
                    }
                    TableBody::Rows(rows)
                }
                other => other,
            },
            TableState::Error(message) => TableBody::Error(message.clone()),
        };

        AppViewModel {
            loading: self.loading,
            search_input: self.search_input.clone(),
            active_filter: (!self.last_query.is_empty()).then(|| self.last_query.clone()),
            categories: self
                .categories
                .iter()
                .map(|category| CategoryOption {
                    id: category.id,
                    nom: category.nom.clone(),
                    selected: self.form.categorie_id == Some(category.id),
                })
                .collect(),
            table,
            form: self.form.clone(),
            add_message: self.add_message.clone(),
            notice: self.notice.clone(),
            alert: self.alert.clone(),
            pending_delete: self.pending_delete,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn form(&self) -> &AddForm {
        &self.form
    }

    pub fn add_message(&self) -> Option<&str> {
        self.add_message.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn pending_delete(&self) -> Option<ProductId> {
        self.pending_delete
    }

    pub fn delta_input(&self, id: ProductId) -> Option<&str> {
        self.delta_inputs.get(&id).map(String::as_str)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_search_input(&mut self, text: String) {
        self.search_input = text;
        self.mark_dirty();
    }

    pub(crate) fn set_last_query(&mut self, query: String) {
        self.last_query = query;
    }

    pub(crate) fn set_refresh_search(&mut self, refresh: bool) {
        self.refresh_search = refresh;
    }

    pub(crate) fn take_refresh_search(&mut self) -> bool {
        std::mem::take(&mut self.refresh_search)
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_categories(&mut self, categories: Vec<Category>) {
        if self.form.categorie_id.is_none() {
            self.form.categorie_id = categories.first().map(|category| category.id);
        }
        self.categories = categories;
        self.mark_dirty();
    }

    pub(crate) fn show_products(&mut self, products: Vec<Product>) {
        // Rows that disappeared take their pending delta input with them.
        self.delta_inputs
            .retain(|id, _| products.iter().any(|product| product.id == *id));
        self.table = TableState::Rows(products);
        self.mark_dirty();
    }

    pub(crate) fn show_table_error(&mut self, message: String) {
        self.table = TableState::Error(message);
        self.mark_dirty();
    }

    pub(crate) fn set_delta_input(&mut self, id: ProductId, text: String) {
        self.delta_inputs.insert(id, text);
        self.mark_dirty();
    }

    pub(crate) fn clear_delta_input(&mut self, id: ProductId) {
        self.delta_inputs.remove(&id);
        self.mark_dirty();
    }

    pub(crate) fn form_mut(&mut self) -> &mut AddForm {
        self.notice = None;
        self.mark_dirty();
        &mut self.form
    }

    /// Empties the name and quantity fields; the category selection stays.
    pub(crate) fn reset_form(&mut self) {
        self.form.nom.clear();
        self.form.quantite.clear();
        self.mark_dirty();
    }

    pub(crate) fn set_add_message(&mut self, message: Option<String>) {
        self.add_message = message;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
        self.mark_dirty();
    }

    pub(crate) fn set_alert(&mut self, alert: Option<String>) {
        self.alert = alert;
        self.mark_dirty();
    }

    pub(crate) fn set_pending_delete(&mut self, id: Option<ProductId>) {
        self.pending_delete = id;
        self.mark_dirty();
    }

    pub(crate) fn take_pending_delete(&mut self) -> Option<ProductId> {
        let pending = self.pending_delete.take();
        if pending.is_some() {
            self.mark_dirty();
        }
        pending
    }
}
