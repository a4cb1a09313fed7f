//! Text rendering of the user table, filter toolbar and pagination footer.

use crate::config::DisplayConfig;
use crate::list::UserList;
use crate::model::User;
use crate::sort::SortField;

pub const LOADING_MESSAGE: &str = "Loading...";
pub const END_MESSAGE: &str = "No more users to display";

/// Table columns; the sortable ones carry their sort field
const COLUMNS: &[(&str, Option<SortField>)] = &[
    ("ID", Some(SortField::Id)),
    ("Image", None),
    ("Name", Some(SortField::FirstName)),
    ("Demography", Some(SortField::Age)),
    ("Gender", None),
    ("Location", None),
];

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn header_cells(list: &UserList) -> Vec<String> {
    let sort = list.sort();
    COLUMNS
        .iter()
        .map(|(label, field)| match field {
            Some(f) if *f == sort.field => format!("{} {}", label, sort.order.arrow()),
            _ => label.to_string(),
        })
        .collect()
}

fn row_cells(user: &User, display: &DisplayConfig) -> Vec<String> {
    let image = if display.show_images {
        user.image.clone()
    } else {
        "-".to_string()
    };
    vec![
        user.id.to_string(),
        image,
        user.full_name(),
        user.demography(),
        user.gender.to_string(),
        user.location(),
    ]
    .into_iter()
    .map(|c| truncate(&c, display.max_cell_width))
    .collect()
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| {
            let pad = w.saturating_sub(c.chars().count());
            format!("{}{}", c, " ".repeat(pad))
        })
        .collect();
    format!("| {} |", padded.join(" | "))
}

/// Render the whole component: title, toolbar, table, footer
pub fn render(list: &UserList, display: &DisplayConfig) -> String {
    let header = header_cells(list);
    let rows: Vec<Vec<String>> = list
        .users()
        .iter()
        .map(|u| row_cells(u, display))
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let separator = format!(
        "+{}+",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut out = String::new();
    out.push_str("User List\n");
    out.push_str(&list.filters().describe());
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    out.push_str(&format_row(&header, &widths));
    out.push('\n');
    out.push_str(&separator);
    out.push('\n');
    for row in &rows {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }
    out.push_str(&separator);
    out.push('\n');
    out.push_str(footer(list));
    out.push('\n');
    out
}

/// Pagination footer: loader while pages remain, end message once exhausted
pub fn footer(list: &UserList) -> &'static str {
    if list.has_more() {
        LOADING_MESSAGE
    } else {
        END_MESSAGE
    }
}
