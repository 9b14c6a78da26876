use super::*;
use shared::domain::{OrderStatus, Priority};

#[derive(Default)]
struct RecordingNavigator {
    queries: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn replace_query(&mut self, query: &str) {
        self.queries.push(query.to_string());
    }
}

fn fixture(count: usize) -> Vec<Order> {
    (0..count)
        .map(|i| Order {
            id: OrderId::new(format!("ORD-{i:04}")),
            status: if i % 2 == 0 {
                OrderStatus::Queued
            } else {
                OrderStatus::Completed
            },
            priority: Priority::Medium,
            source: if i % 4 == 0 {
                format!("Rack {i}")
            } else {
                format!("Lift {}", i % 7)
            },
            target: format!("Dock {}", i % 5),
            vehicle_id: None,
            created_at: "2024-01-01T10:00:00Z".parse().expect("timestamp"),
            eta: None,
            duration_minutes: None,
        })
        .collect()
}

fn loaded(query: &str, count: usize) -> OrdersTableController<RecordingNavigator> {
    let mut controller = OrdersTableController::new(query, RecordingNavigator::default());
    controller.attach_grid();
    let ticket = controller.begin_load();
    assert!(controller.finish_load(ticket, Ok(fixture(count))));
    controller
}

fn first_id(controller: &OrdersTableController<RecordingNavigator>) -> String {
    controller.visible_rows()[0].id.to_string()
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn initializes_from_url_without_navigating() {
    let controller = OrdersTableController::new(
        "?search=dock&page=1&pageSize=10&sortActive=id&sortDirection=desc",
        RecordingNavigator::default(),
    );

    let view = controller.view_state();
    assert_eq!(view.search, "dock");
    assert_eq!(view.page_index, 1);
    assert_eq!(view.page_size, 10);
    assert_eq!(view.sort, Some(SortState::new("id", SortDirection::Desc)));
    assert!(controller.is_loading());
    assert!(controller.visible_rows().is_empty());
    assert!(controller.navigator().queries.is_empty());
}

#[test]
fn url_round_trip_reproduces_view_state() {
    let mut controller = loaded("", 160);
    let start = Instant::now();

    controller.on_search_input("lift", start);
    assert!(controller.poll_search(start + SEARCH_QUIET_PERIOD));
    assert!(controller.on_page_change(2, 50));
    assert!(controller.on_sort_header(Column::Id));

    let query = controller
        .navigator()
        .queries
        .last()
        .cloned()
        .expect("projected query");
    assert_eq!(
        query,
        "search=lift&page=2&pageSize=50&sortActive=id&sortDirection=asc"
    );

    let fresh = OrdersTableController::new(&query, RecordingNavigator::default());
    assert_eq!(fresh.view_state(), controller.view_state());
}

#[test]
fn default_view_projects_to_an_empty_query() {
    let mut controller = loaded("page=1", 100);
    assert!(controller.on_page_change(0, 25));
    assert_eq!(controller.navigator().queries, [""]);
}

#[test]
fn repeated_search_input_applies_once() {
    let mut controller = loaded("", 40);
    let start = Instant::now();

    controller.on_search_input("a", start);
    controller.on_search_input("a", start + ms(100));
    assert!(!controller.poll_search(start + ms(200)));
    controller.on_search_input("ab", start + ms(250));
    assert!(!controller.poll_search(start + ms(549)));
    assert_eq!(controller.search_deadline(), Some(start + ms(550)));
    assert!(controller.poll_search(start + ms(550)));

    assert_eq!(controller.view_state().search, "ab");
    assert_eq!(controller.navigator().queries, ["search=ab"]);

    controller.on_search_input("ab", start + ms(600));
    assert!(!controller.poll_search(start + ms(900)));
    assert_eq!(controller.navigator().queries.len(), 1);
}

#[test]
fn url_search_is_not_reapplied_when_typed_again() {
    let mut controller = loaded("search=lift", 40);
    let start = Instant::now();

    controller.on_search_input("lift", start);
    assert!(!controller.poll_search(start + ms(300)));
    assert!(controller.navigator().queries.is_empty());
}

#[test]
fn empty_search_restores_the_full_collection() {
    let mut controller = loaded("search=lift&pageSize=200", 40);
    assert_eq!(controller.filtered_len(), 30);

    let start = Instant::now();
    controller.on_search_input("   ", start);
    assert!(controller.poll_search(start + ms(300)));
    assert_eq!(controller.filtered_len(), 40);
    assert_eq!(first_id(&controller), "ORD-0000");
    assert_eq!(controller.navigator().queries, ["pageSize=200"]);
}

#[test]
fn failed_load_shows_error_and_no_rows() {
    let mut controller = OrdersTableController::new("sortActive=id&sortDirection=asc", RecordingNavigator::default());
    controller.attach_grid();
    let ticket = controller.begin_load();
    assert!(controller.finish_load(ticket, Err(OrdersLoadError)));

    assert_eq!(
        controller.error_message().as_deref(),
        Some("orders could not be loaded")
    );
    assert!(!controller.is_loading());
    assert!(controller.visible_rows().is_empty());
    assert!(!controller.is_grid_wired());
    assert!(!controller.on_sort_header(Column::Status));
    assert!(controller.navigator().queries.is_empty());
}

#[test]
fn superseded_load_is_ignored() {
    let mut controller = OrdersTableController::new("", RecordingNavigator::default());
    let first = controller.begin_load();
    let second = controller.begin_load();

    assert!(!controller.finish_load(first, Ok(fixture(3))));
    assert!(controller.is_loading());

    assert!(controller.finish_load(second, Ok(fixture(5))));
    assert_eq!(controller.filtered_len(), 5);
}

#[test]
fn grid_wiring_waits_for_both_grid_and_data() {
    let mut controller = OrdersTableController::new("", RecordingNavigator::default());
    controller.attach_grid();
    assert!(!controller.is_grid_wired());
    assert!(!controller.on_page_change(1, 25));

    let ticket = controller.begin_load();
    controller.finish_load(ticket, Ok(fixture(60)));
    assert!(controller.is_grid_wired());
    assert!(controller.on_page_change(1, 25));

    let mut late = OrdersTableController::new("", RecordingNavigator::default());
    let ticket = late.begin_load();
    late.finish_load(ticket, Ok(fixture(60)));
    assert!(!late.is_grid_wired());
    assert!(!late.on_sort_header(Column::Id));
    late.attach_grid();
    assert!(late.is_grid_wired());
    assert!(late.on_sort_header(Column::Id));
}

#[test]
fn sort_header_cycles_through_directions() {
    let mut controller = loaded("", 30);

    controller.on_sort_header(Column::Id);
    assert_eq!(first_id(&controller), "ORD-0000");
    controller.on_sort_header(Column::Id);
    assert_eq!(first_id(&controller), "ORD-0029");
    controller.on_sort_header(Column::Id);
    assert_eq!(controller.view_state().sort, None);
    assert_eq!(first_id(&controller), "ORD-0000");

    controller.on_sort_header(Column::Status);
    controller.on_sort_header(Column::Source);
    assert_eq!(
        controller.view_state().sort,
        Some(SortState::new("source", SortDirection::Asc))
    );

    assert_eq!(
        controller.navigator().queries,
        [
            "sortActive=id&sortDirection=asc",
            "sortActive=id&sortDirection=desc",
            "",
            "sortActive=status&sortDirection=asc",
            "sortActive=source&sortDirection=asc",
        ]
    );
}

#[test]
fn unknown_url_sort_keeps_fetch_order() {
    let controller = loaded("sortActive=colour&sortDirection=desc", 10);
    assert_eq!(first_id(&controller), "ORD-0000");
    assert!(controller.view_state().sort.is_some());
}

#[test]
fn pages_are_windows_of_the_filtered_rows() {
    let mut controller = loaded("", 60);
    assert_eq!(controller.visible_rows().len(), 25);

    controller.on_page_change(2, 25);
    let rows = controller.visible_rows();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0].id.to_string(), "ORD-0050");
    assert_eq!(controller.navigator().queries, ["page=2"]);
}

#[test]
fn narrowing_the_filter_clamps_the_page() {
    let mut controller = loaded("", 160);
    controller.on_page_change(3, 25);

    let start = Instant::now();
    controller.on_search_input("lift 3", start);
    assert!(controller.poll_search(start + ms(300)));

    assert_eq!(controller.filtered_len(), 18);
    assert_eq!(controller.view_state().page_index, 0);
    assert_eq!(
        controller.navigator().queries.last().map(String::as_str),
        Some("search=lift+3")
    );
}

#[test]
fn out_of_range_url_page_is_clamped_after_load() {
    let controller = loaded("page=9", 30);
    assert_eq!(controller.view_state().page_index, 1);
    assert_eq!(controller.navigator().queries, ["page=1"]);
}

#[test]
fn page_size_change_keeps_first_row_visible() {
    let mut controller = loaded("page=2", 100);
    assert_eq!(first_id(&controller), "ORD-0050");

    controller.on_page_size_change(10);
    assert_eq!(controller.view_state().page_index, 5);
    assert_eq!(first_id(&controller), "ORD-0050");
    assert_eq!(
        controller.navigator().queries.last().map(String::as_str),
        Some("page=5&pageSize=10")
    );
}

#[test]
fn page_size_change_with_huge_url_page_is_ignored_after_failed_load() {
    let mut controller = OrdersTableController::new("page=18446744073709551615", RecordingNavigator::default());
    assert_eq!(controller.view_state().page_index, usize::MAX);
    controller.attach_grid();
    assert!(!controller.on_page_size_change(10));

    let ticket = controller.begin_load();
    assert!(controller.finish_load(ticket, Err(OrdersLoadError)));
    assert!(!controller.on_page_size_change(10));
    assert_eq!(controller.view_state().page_size, 25);
    assert!(controller.navigator().queries.is_empty());
}

#[test]
fn huge_url_page_is_clamped_before_page_size_change() {
    let mut controller = loaded("page=18446744073709551615", 30);
    assert_eq!(controller.view_state().page_index, 1);

    assert!(controller.on_page_size_change(10));
    assert_eq!(controller.view_state().page_index, 2);
    assert_eq!(first_id(&controller), "ORD-0020");
}

#[test]
fn selection_toggles_and_is_not_persisted() {
    let mut controller = loaded("", 10);
    let a = OrderId::new("ORD-0001");
    let b = OrderId::new("ORD-0002");

    controller.select_order(&a);
    assert_eq!(controller.selected_order().map(|o| &o.id), Some(&a));
    controller.select_order(&a);
    assert!(controller.selected_order().is_none());

    controller.select_order(&a);
    controller.select_order(&b);
    assert_eq!(controller.selected_order().map(|o| &o.id), Some(&b));

    controller.select_order(&OrderId::new("ORD-9999"));
    assert_eq!(controller.selected_order().map(|o| &o.id), Some(&b));

    controller.close_details();
    assert!(controller.selected_order().is_none());
    assert!(controller.navigator().queries.is_empty());
}

#[test]
fn reload_drops_selection_of_vanished_order() {
    let mut controller = loaded("", 10);
    controller.select_order(&OrderId::new("ORD-0008"));

    let ticket = controller.begin_load();
    controller.finish_load(ticket, Ok(fixture(5)));
    assert!(controller.selected_order().is_none());
}

#[test]
fn hidden_columns_do_not_touch_the_url() {
    let mut controller = loaded("", 10);
    controller.toggle_column(Column::Eta);
    assert!(!controller.columns().is_visible(Column::Eta));
    assert!(controller.navigator().queries.is_empty());
}

#[test]
fn location_replaces_the_current_entry() {
    let mut location = Location::parse("http://localhost:4200/orders?page=3").expect("url");
    assert_eq!(location.query(), "page=3");

    location.replace_query("search=lift");
    assert_eq!(location.url().as_str(), "http://localhost:4200/orders?search=lift");

    location.replace_query("");
    assert_eq!(location.url().as_str(), "http://localhost:4200/orders");
    assert_eq!(location.query(), "");
    assert_eq!(location.replacements(), 2);
}

#[tokio::test]
async fn loads_through_an_order_source() {
    struct Failing;

    #[async_trait::async_trait]
    impl OrderSource for Failing {
        async fn fetch_orders(&self) -> Result<Vec<Order>, OrdersLoadError> {
            Err(OrdersLoadError)
        }
    }

    let mut controller = OrdersTableController::new("", RecordingNavigator::default());
    assert!(controller.load_from(&Failing).await);
    assert!(controller.error_message().is_some());
}
