//! Plain-text rendering of the orders table and the detail panel.

use std::fmt::Write as _;

use client_core::{
    table::{format_minutes, format_timestamp},
    Column, Navigator, OrdersTableController,
};
use shared::domain::Order;

const SEPARATOR: &str = "  ";

pub fn render_table(columns: &[Column], rows: &[&Order]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|order| columns.iter().map(|column| column.cell_text(order)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            cells
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(column.label().chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let mut out = String::new();
    let header: Vec<&str> = columns.iter().map(|column| column.label()).collect();
    push_line(&mut out, header.as_slice(), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_line(&mut out, rule.as_slice(), &widths);
    for row in &cells {
        push_line(&mut out, row.as_slice(), &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect();
    out.push_str(line.join(SEPARATOR).trim_end());
    out.push('\n');
}

/// Range summary such as `26-50 of 120`.
pub fn render_pager(page_index: usize, page_size: usize, total: usize) -> String {
    if total == 0 {
        return "0 of 0".to_string();
    }
    let start = page_index.saturating_mul(page_size).min(total);
    let end = (start + page_size).min(total);
    format!("{}-{} of {}", start + 1, end, total)
}

pub fn render_details(order: &Order) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Order {}", order.id);
    let _ = writeln!(
        out,
        "  status:    {} [{}]",
        order.status.as_str(),
        order.status.badge_class()
    );
    let _ = writeln!(out, "  priority:  {}", order.priority.as_str());
    let _ = writeln!(out, "  route:     {} -> {}", order.source, order.target);
    let vehicle = order
        .vehicle_id
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unassigned".to_string());
    let _ = writeln!(out, "  vehicle:   {vehicle}");
    let _ = writeln!(out, "  created:   {}", format_timestamp(&order.created_at));
    if let Some(eta) = &order.eta {
        let _ = writeln!(out, "  eta:       {}", format_timestamp(eta));
    }
    match order.duration_minutes() {
        Some(minutes) => {
            let basis = if order.status.is_open() { "expected" } else { "recorded" };
            let _ = writeln!(out, "  duration:  {} min ({basis})", format_minutes(minutes));
        }
        None => {
            let _ = writeln!(out, "  duration:  unknown");
        }
    }
    out
}

pub fn render_view<N: Navigator>(controller: &OrdersTableController<N>) -> String {
    if controller.is_loading() {
        return "Loading orders...\n".to_string();
    }
    if let Some(message) = controller.error_message() {
        return format!("{message}\n");
    }

    let view = controller.view_state();
    let mut out = render_table(&controller.columns().displayed(), &controller.visible_rows());
    let _ = writeln!(
        out,
        "{}",
        render_pager(view.page_index, view.page_size, controller.filtered_len())
    );
    if let Some(order) = controller.selected_order() {
        out.push('\n');
        out.push_str(&render_details(order));
    }
    out
}
