//! Order loading and the view-state controller behind the orders table.

pub mod controller;
pub mod debounce;
pub mod source;
pub mod table;
pub mod view_state;

pub use controller::{LoadState, LoadTicket, Location, Navigator, OrdersTableController};
pub use debounce::{SearchDebounce, SEARCH_QUIET_PERIOD};
pub use source::{order_source_for, FileOrderSource, HttpOrderSource, OrderSource};
pub use table::{Column, ColumnSet};
pub use view_state::{SortDirection, SortState, ViewState, DEFAULT_PAGE_SIZE};
