//! Translates typed command lines into core messages.

use inventory_core::{Msg, ProductId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msgs(Vec<Msg>),
    Help,
    Quit,
    Empty,
    Invalid(String),
}

const CONFIRM_ANSWERS: &[&str] = &["o", "oui", "y", "yes"];

/// Parses one input line. While a delete confirmation is pending the line is
/// the answer to it, whatever it contains.
pub fn parse_line(line: &str, awaiting_confirmation: bool) -> Command {
    let line = line.trim();

    if awaiting_confirmation {
        let confirmed = CONFIRM_ANSWERS
            .iter()
            .any(|answer| line.eq_ignore_ascii_case(answer));
        return Command::Msgs(vec![if confirmed {
            Msg::DeleteConfirmed
        } else {
            Msg::DeleteCancelled
        }]);
    }

    if line.is_empty() {
        return Command::Empty;
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "help" | "aide" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "refresh" | "r" => Command::Msgs(vec![Msg::RefreshRequested]),
        "search" | "s" => Command::Msgs(vec![
            Msg::SearchInputChanged(rest.to_string()),
            Msg::SearchSubmitted,
        ]),
        "nom" => Command::Msgs(vec![Msg::AddNameChanged(rest.to_string())]),
        "qte" => Command::Msgs(vec![Msg::AddQuantityChanged(rest.to_string())]),
        "cat" => match rest {
            "" | "-" | "aucune" => Command::Msgs(vec![Msg::AddCategoryChanged(None)]),
            raw => match raw.parse::<i64>() {
                Ok(id) => Command::Msgs(vec![Msg::AddCategoryChanged(Some(id))]),
                Err(_) => Command::Invalid(format!("Catégorie invalide : {raw}")),
            },
        },
        "add" => parse_add(rest),
        "delta" | "d" => {
            let (id, amount) = match rest.split_once(char::is_whitespace) {
                Some((id, amount)) => (id, amount.trim()),
                None => (rest, ""),
            };
            match parse_product_id(id) {
                Ok(id) => Command::Msgs(vec![
                    Msg::DeltaInputChanged {
                        id,
                        text: amount.to_string(),
                    },
                    Msg::DeltaSubmitted { id },
                ]),
                Err(invalid) => invalid,
            }
        }
        "delete" | "del" | "rm" => match parse_product_id(rest) {
            Ok(id) => Command::Msgs(vec![Msg::DeleteRequested { id }]),
            Err(invalid) => invalid,
        },
        "ok" => Command::Msgs(vec![Msg::AlertDismissed]),
        other => Command::Invalid(format!("Commande inconnue : {other} (tapez « help »)")),
    }
}

/// `add` submits the form as filled; `add <qte> <nom…>` fills it first.
fn parse_add(rest: &str) -> Command {
    if rest.is_empty() {
        return Command::Msgs(vec![Msg::AddSubmitted]);
    }
    let (quantite, nom) = match rest.split_once(char::is_whitespace) {
        Some((quantite, nom)) => (quantite, nom.trim()),
        None => (rest, ""),
    };
    Command::Msgs(vec![
        Msg::AddQuantityChanged(quantite.to_string()),
        Msg::AddNameChanged(nom.to_string()),
        Msg::AddSubmitted,
    ])
}

fn parse_product_id(raw: &str) -> Result<ProductId, Command> {
    let raw = raw.trim().trim_start_matches('#');
    raw.parse::<ProductId>()
        .map_err(|_| Command::Invalid(format!("Identifiant de produit invalide : {raw:?}")))
}
