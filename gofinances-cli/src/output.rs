//! Plain-text rendering for the terminal

use gofinances_core::{CategoryInfo, CategoryTotalView, HighlightCard, TransactionType};
use gofinances_store::Snapshot;

use crate::state::User;

fn card_line(title: &str, card: &HighlightCard) -> String {
    format!("{title:<9} {:>16}   {}\n", card.amount, card.last_transaction)
}

pub fn render_dashboard(user: &User, snap: &Snapshot) -> String {
    let mut out = format!("Olá, {}\n\n", user.name);
    out.push_str(&card_line("Entradas", &snap.highlight.entries));
    out.push_str(&card_line("Saídas", &snap.highlight.expenses));
    out.push_str(&card_line("Total", &snap.highlight.total));

    out.push('\n');
    out.push_str(&render_list(snap));
    out
}

pub fn render_list(snap: &Snapshot) -> String {
    let mut out = String::from("Listagem\n");
    if snap.transactions.is_empty() {
        out.push_str("  (empty)\n");
    }
    for row in &snap.transactions {
        let sign = match row.kind {
            TransactionType::Negative => "- ",
            _ => "",
        };
        out.push_str(&format!(
            "  {}  {:<28} {:>18}  {:<14} {}\n",
            row.date,
            row.name,
            format!("{sign}{}", row.amount),
            row.category.name,
            row.id
        ));
    }
    for rejected in &snap.rejected {
        out.push_str(&format!(
            "  ! skipped record #{} ({}): {}\n",
            rejected.index,
            rejected.id.as_deref().unwrap_or("no id"),
            rejected.reason
        ));
    }
    out
}

pub fn render_resume(rows: &[CategoryTotalView]) -> String {
    if rows.is_empty() {
        return "No expenses in this period\n".to_string();
    }
    rows.iter()
        .map(|row| format!("  {:>4}  {:<16} {:>16}\n", row.percent, row.name, row.total))
        .collect()
}

pub fn render_categories(categories: &[CategoryInfo]) -> String {
    categories
        .iter()
        .map(|c| format!("  {:<10} {:<14} ({})\n", c.key, c.name, c.icon))
        .collect()
}
