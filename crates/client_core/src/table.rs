//! Client-side filter predicate, comparator and windowing over the order
//! collection.

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};
use shared::domain::Order;

use crate::view_state::{SortDirection, SortState};

const COLUMN_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Status,
    Priority,
    Source,
    Target,
    VehicleId,
    CreatedAt,
    Eta,
    Duration,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Id,
        Column::Status,
        Column::Priority,
        Column::Source,
        Column::Target,
        Column::VehicleId,
        Column::CreatedAt,
        Column::Eta,
        Column::Duration,
    ];

    /// Identifier used in `sortActive` and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Source => "source",
            Self::Target => "target",
            Self::VehicleId => "vehicleId",
            Self::CreatedAt => "createdAt",
            Self::Eta => "eta",
            Self::Duration => "duration",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Status => "Status",
            Self::Priority => "Priority",
            Self::Source => "Source",
            Self::Target => "Target",
            Self::VehicleId => "Vehicle",
            Self::CreatedAt => "Created",
            Self::Eta => "ETA",
            Self::Duration => "Duration (min)",
        }
    }

    /// String representation of the field; empty for absent values.
    pub fn cell_text(self, order: &Order) -> String {
        match self {
            Self::Id => order.id.to_string(),
            Self::Status => order.status.as_str().to_string(),
            Self::Priority => order.priority.as_str().to_string(),
            Self::Source => order.source.clone(),
            Self::Target => order.target.clone(),
            Self::VehicleId => order
                .vehicle_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            Self::CreatedAt => format_timestamp(&order.created_at),
            Self::Eta => order.eta.as_ref().map(format_timestamp).unwrap_or_default(),
            Self::Duration => order
                .duration_minutes()
                .map(format_minutes)
                .unwrap_or_default(),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 {
        format!("{minutes:.0}")
    } else {
        format!("{minutes:.1}")
    }
}

pub fn normalize_filter(text: &str) -> String {
    text.trim().to_lowercase()
}

/// `normalized` must already be trimmed and lowercased.
pub fn matches_filter(order: &Order, normalized: &str) -> bool {
    normalized.is_empty()
        || Column::ALL
            .into_iter()
            .any(|column| column.cell_text(order).to_lowercase().contains(normalized))
}

/// Natural ordering of the column's field. Enums order by their wire name,
/// absent values sort first.
pub fn compare_by(column: Column, a: &Order, b: &Order) -> Ordering {
    match column {
        Column::Id => a.id.cmp(&b.id),
        Column::Status => a.status.as_str().cmp(b.status.as_str()),
        Column::Priority => a.priority.as_str().cmp(b.priority.as_str()),
        Column::Source => a.source.cmp(&b.source),
        Column::Target => a.target.cmp(&b.target),
        Column::VehicleId => a.vehicle_id.cmp(&b.vehicle_id),
        Column::CreatedAt => a.created_at.cmp(&b.created_at),
        Column::Eta => a.eta.cmp(&b.eta),
        Column::Duration => match (a.duration_minutes(), b.duration_minutes()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.total_cmp(&y),
        },
    }
}

/// Maps a URL sort onto a column. Unknown fields leave the rows unsorted.
pub fn resolve_sort(sort: &SortState) -> Option<(Column, SortDirection)> {
    Column::from_id(&sort.field).map(|column| (column, sort.direction))
}

pub fn filter_and_sort<'a>(
    orders: &'a [Order],
    filter: &str,
    sort: Option<(Column, SortDirection)>,
) -> Vec<&'a Order> {
    let normalized = normalize_filter(filter);
    let mut rows: Vec<&Order> = orders
        .iter()
        .filter(|order| matches_filter(order, &normalized))
        .collect();

    if let Some((column, direction)) = sort {
        rows.sort_by(|a, b| {
            let ordering = compare_by(column, a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
    rows
}

pub fn page_window<T>(rows: &[T], page_index: usize, page_size: usize) -> &[T] {
    let start = page_index.saturating_mul(page_size).min(rows.len());
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

pub fn last_page_index(len: usize, page_size: usize) -> usize {
    if len == 0 {
        0
    } else {
        (len - 1) / page_size.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
    visible: [bool; COLUMN_COUNT],
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self {
            visible: [true; COLUMN_COUNT],
        }
    }
}

impl ColumnSet {
    pub fn is_visible(&self, column: Column) -> bool {
        self.visible[column.index()]
    }

    pub fn toggle(&mut self, column: Column) {
        let slot = &mut self.visible[column.index()];
        *slot = !*slot;
    }

    pub fn displayed(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|column| self.is_visible(*column))
            .collect()
    }
}
