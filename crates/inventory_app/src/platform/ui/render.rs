use chrono::NaiveTime;
use inventory_core::{AppViewModel, CategoryOption, ProductRowView, StockLevel, TableBody};

use super::constants::*;

const HEADERS: [&str; 4] = ["ID", "Nom", "Catégorie", "Stock"];

/// Lays the view model out as terminal lines.
pub fn render(view: &AppViewModel, stamp: NaiveTime) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("── {TITLE} ── {}", stamp.format("%H:%M:%S")));
    lines.push(match &view.active_filter {
        Some(query) => format!("Filtre actif : \"{query}\""),
        None => ALL_PRODUCTS_LABEL.to_string(),
    });
    if view.loading {
        lines.push(LOADING_LABEL.to_string());
    }
    if !view.categories.is_empty() {
        lines.push(format!("Catégories : {}", format_categories(&view.categories)));
    }

    match &view.table {
        TableBody::Rows(rows) => lines.extend(format_table(rows)),
        TableBody::Empty(message) => lines.push(format!("  {message}")),
        TableBody::Error(message) => lines.push(format!("  ⚠ {message}")),
    }

    lines.push(format!(
        "Formulaire : nom=\"{}\" qte=\"{}\" catégorie={}",
        view.form.nom,
        view.form.quantite,
        view.form
            .categorie_id
            .map(|id| format!("#{id}"))
            .unwrap_or_else(|| "aucune".to_string())
    ));
    if let Some(message) = &view.add_message {
        lines.push(format!("  ! {message}"));
    }
    if let Some(notice) = &view.notice {
        lines.push(format!("  ✔ {notice}"));
    }
    if let Some(alert) = &view.alert {
        lines.push(format!("ALERTE : {alert} (tapez « ok »)"));
    }
    if let Some(id) = view.pending_delete {
        lines.push(format!(
            "Voulez-vous vraiment supprimer le produit #{id} de l'inventaire ? [o/N]"
        ));
    }

    lines
}

fn format_categories(categories: &[CategoryOption]) -> String {
    categories
        .iter()
        .map(|category| {
            let marker = if category.selected { "*" } else { "" };
            format!("[{}] {}{}", category.id, category.nom, marker)
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn format_table(rows: &[ProductRowView]) -> Vec<String> {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.id_label.clone(),
                row.nom.clone(),
                row.categorie.clone(),
                format_stock(row),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(format_cells(&HEADERS.map(str::to_string), &widths));
    for (row, view) in cells.iter().zip(rows) {
        let mut line = format_cells(row, &widths);
        if !view.delta_input.is_empty() {
            line.push_str(&format!("  Δ {}", view.delta_input));
        }
        lines.push(line);
    }
    lines
}

fn format_cells(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let joined = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    format!("  {}", joined.trim_end())
}

fn format_stock(row: &ProductRowView) -> String {
    match row.level {
        StockLevel::Out => format!("{} [rupture]", row.stock_label),
        StockLevel::Low => format!("{} [faible]", row.stock_label),
        StockLevel::Healthy => row.stock_label.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_core::{update, AppState, Failure, Msg, Product, EMPTY_TABLE_MESSAGE};
    use pretty_assertions::assert_eq;

    fn stamp() -> NaiveTime {
        NaiveTime::from_hms_opt(14, 3, 22).unwrap()
    }

    fn product(id: i64, nom: &str, quantite: i64, categorie: Option<&str>) -> Product {
        Product {
            id,
            nom: nom.to_string(),
            quantite,
            categorie_id: None,
            categorie: categorie.map(str::to_string),
        }
    }

    #[test]
    fn renders_aligned_table_with_badges() {
        let (state, _) = update(
            AppState::new(),
            Msg::ProductsLoaded(Ok(vec![
                product(1, "Souris", 12, Some("Informatique")),
                product(12, "Bouilloire", 0, None),
                product(3, "Montre", 2, Some("Montres")),
            ])),
        );

        let lines = render(&state.view(), stamp());

        assert_eq!(lines[0], "── Inventaire ── 14:03:22");
        assert_eq!(lines[1], "Tous les produits");
        assert_eq!(
            &lines[2..6],
            &[
                "  ID   Nom         Catégorie       Stock".to_string(),
                "  #1   Souris      Informatique    12 en stock".to_string(),
                "  #12  Bouilloire  Sans catégorie  0 en stock [rupture]".to_string(),
                "  #3   Montre      Montres         2 en stock [faible]".to_string(),
            ]
        );
    }

    #[test]
    fn renders_empty_state_and_loading() {
        let (state, _) = update(AppState::new(), Msg::Started);
        let lines = render(&state.view(), stamp());

        assert!(lines.contains(&LOADING_LABEL.to_string()));
        assert!(lines.contains(&format!("  {EMPTY_TABLE_MESSAGE}")));
    }

    #[test]
    fn renders_filter_error_alert_and_confirmation() {
        let (state, _) = update(AppState::new(), Msg::SearchInputChanged("bolt".to_string()));
        let (state, _) = update(state, Msg::SearchSubmitted);
        let (state, _) = update(
            state,
            Msg::SearchLoaded(Err(Failure::rejected(500, None))),
        );
        let (state, _) = update(
            state,
            Msg::DeltaApplied {
                id: 1,
                result: Err(Failure::rejected(400, Some("stock insuffisant".to_string()))),
            },
        );
        let (state, _) = update(state, Msg::DeleteRequested { id: 1 });

        let lines = render(&state.view(), stamp());

        assert_eq!(lines[1], "Filtre actif : \"bolt\"");
        assert!(lines.contains(&"  ⚠ Erreur de recherche".to_string()));
        assert!(lines.contains(&"ALERTE : stock insuffisant (tapez « ok »)".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "Voulez-vous vraiment supprimer le produit #1 de l'inventaire ? [o/N]"
        );
    }

    #[test]
    fn renders_form_and_selected_category() {
        let (state, _) = update(
            AppState::new(),
            Msg::CategoriesLoaded(Ok(vec![
                inventory_core::Category {
                    id: 1,
                    nom: "Informatique".to_string(),
                },
                inventory_core::Category {
                    id: 3,
                    nom: "Montres".to_string(),
                },
            ])),
        );
        let (state, _) = update(state, Msg::AddNameChanged("Widget".to_string()));
        let (state, _) = update(state, Msg::AddSubmitted);

        let lines = render(&state.view(), stamp());

        assert!(lines.contains(&"Catégories : [1] Informatique*  [3] Montres".to_string()));
        assert!(lines.contains(&"Formulaire : nom=\"Widget\" qte=\"\" catégorie=#1".to_string()));
        assert!(lines.contains(&"  ! Veuillez remplir tous les champs correctement.".to_string()));
    }

    #[test]
    fn pending_delta_input_is_shown_on_its_row() {
        let (state, _) = update(
            AppState::new(),
            Msg::ProductsLoaded(Ok(vec![product(1, "Vis", 3, None)])),
        );
        let (state, _) = update(
            state,
            Msg::DeltaInputChanged {
                id: 1,
                text: "-5".to_string(),
            },
        );

        let lines = render(&state.view(), stamp());
        assert!(lines
            .iter()
            .any(|line| line.starts_with("  #1") && line.ends_with("Δ -5")));
    }
}
