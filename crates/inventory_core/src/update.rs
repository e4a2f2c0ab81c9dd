use crate::{AppState, Effect, Msg, NewProduct};

const LOAD_FAILED_MESSAGE: &str = "Erreur de chargement";
const SEARCH_FAILED_MESSAGE: &str = "Erreur de recherche";
const REFRESH_SEARCH_FAILED_MESSAGE: &str = "Erreur rechargement recherche";
const INVALID_FORM_MESSAGE: &str = "Veuillez remplir tous les champs correctement.";
const ADD_FAILED_MESSAGE: &str = "Erreur lors de l'ajout";
const ADDED_NOTICE: &str = "Ajouté !";
const DELTA_FAILED_MESSAGE: &str = "Erreur lors de la mise à jour";
const DELETE_FAILED_MESSAGE: &str = "Erreur de suppression";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            state.set_loading(true);
            vec![Effect::LoadCategories, Effect::LoadProducts]
        }
        Msg::SearchInputChanged(text) => {
            state.set_search_input(text);
            Vec::new()
        }
        Msg::SearchSubmitted => {
            let query = state.search_input().trim().to_string();
            // Stored before the request goes out: a failed search stays sticky.
            state.set_last_query(query.clone());
            state.set_refresh_search(false);
            state.mark_dirty();
            if query.is_empty() {
                state.set_loading(true);
                vec![Effect::LoadProducts]
            } else {
                vec![Effect::Search { query }]
            }
        }
        Msg::RefreshRequested => vec![refresh(&mut state)],
        Msg::DeltaInputChanged { id, text } => {
            state.set_delta_input(id, text);
            Vec::new()
        }
        Msg::DeltaSubmitted { id } => match state.delta_input(id).and_then(parse_delta) {
            Some(delta) => vec![Effect::ApplyDelta { id, delta }],
            None => Vec::new(),
        },
        Msg::AddNameChanged(nom) => {
            state.form_mut().nom = nom;
            Vec::new()
        }
        Msg::AddQuantityChanged(quantite) => {
            state.form_mut().quantite = quantite;
            Vec::new()
        }
        Msg::AddCategoryChanged(categorie_id) => {
            state.form_mut().categorie_id = categorie_id;
            Vec::new()
        }
        Msg::AddSubmitted => {
            state.set_notice(None);
            match validate_form(&state) {
                Some(product) => vec![Effect::AddProduct(product)],
                None => {
                    state.set_add_message(Some(INVALID_FORM_MESSAGE.to_string()));
                    Vec::new()
                }
            }
        }
        Msg::DeleteRequested { id } => {
            state.set_pending_delete(Some(id));
            Vec::new()
        }
        Msg::DeleteConfirmed => match state.take_pending_delete() {
            Some(id) => vec![Effect::DeleteProduct { id }],
            None => Vec::new(),
        },
        Msg::DeleteCancelled => {
            state.take_pending_delete();
            Vec::new()
        }
        Msg::AlertDismissed => {
            if state.alert().is_some() {
                state.set_alert(None);
            }
            Vec::new()
        }
        Msg::CategoriesLoaded(result) => {
            // Non-fatal: the selector simply stays empty.
            state.set_categories(result.unwrap_or_default());
            Vec::new()
        }
        Msg::ProductsLoaded(result) => {
            state.set_loading(false);
            match result {
                Ok(products) => state.show_products(products),
                Err(failure) => state.show_table_error(format!(
                    "Erreur : {}",
                    failure.detail_or(LOAD_FAILED_MESSAGE)
                )),
            }
            Vec::new()
        }
        Msg::SearchLoaded(result) => {
            let fallback = if state.take_refresh_search() {
                REFRESH_SEARCH_FAILED_MESSAGE
            } else {
                SEARCH_FAILED_MESSAGE
            };
            match result {
                Ok(products) => state.show_products(products),
                Err(failure) => state.show_table_error(failure.message_or(fallback)),
            }
            Vec::new()
        }
        Msg::ProductAdded(result) => match result {
            Ok(()) => {
                state.set_add_message(None);
                state.reset_form();
                state.set_notice(Some(ADDED_NOTICE.to_string()));
                vec![refresh(&mut state)]
            }
            Err(failure) => {
                state.set_add_message(Some(failure.message_or(ADD_FAILED_MESSAGE)));
                Vec::new()
            }
        },
        Msg::DeltaApplied { id, result } => match result {
            Ok(()) => {
                state.clear_delta_input(id);
                vec![refresh(&mut state)]
            }
            Err(failure) => {
                state.set_alert(Some(failure.message_or(DELTA_FAILED_MESSAGE)));
                Vec::new()
            }
        },
        Msg::ProductDeleted { id: _, result } => match result {
            Ok(()) => vec![refresh(&mut state)],
            Err(failure) => {
                state.set_alert(Some(format!(
                    "Erreur : {}",
                    failure.detail_or(DELETE_FAILED_MESSAGE)
                )));
                Vec::new()
            }
        },
    };

    (state, effects)
}

/// Re-fetches the view through the sticky filter, if any.
fn refresh(state: &mut AppState) -> Effect {
    let query = state.last_query().to_string();
    state.set_search_input(query.clone());
    if query.is_empty() {
        state.set_loading(true);
        Effect::LoadProducts
    } else {
        state.set_refresh_search(true);
        Effect::Search { query }
    }
}

fn parse_delta(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|delta| *delta != 0)
}

fn validate_form(state: &AppState) -> Option<NewProduct> {
    let form = state.form();
    let nom = form.nom.trim();
    if nom.is_empty() {
        return None;
    }
    let quantite = form.quantite.trim().parse::<i64>().ok().filter(|q| *q >= 0)?;
    Some(NewProduct {
        nom: nom.to_string(),
        quantite,
        categorie_id: form.categorie_id,
    })
}
