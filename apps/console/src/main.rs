use anyhow::{bail, Result};
use clap::Parser;
use client_core::{order_source_for, Location, OrdersTableController};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod interactive;
mod render;

use config::load_settings;
use render::render_view;

#[derive(Parser, Debug)]
#[command(about = "Browse fleet dispatch orders as a filterable, sortable table")]
struct Args {
    /// Orders endpoint (http(s) URL, file URL or path to a JSON file).
    #[arg(long)]
    endpoint: Option<String>,
    /// View query to start from, e.g. `search=lift&page=2&sortActive=id&sortDirection=asc`.
    #[arg(long)]
    view: Option<String>,
    /// Read table commands from stdin after the first render.
    #[arg(long)]
    interactive: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(endpoint) = args.endpoint {
        settings.orders_endpoint = endpoint;
    }
    let endpoint = settings.endpoint_url()?;
    let location = Location::new(settings.view_url(args.view.as_deref())?);
    info!(%endpoint, view = %location.url(), "starting orders console");

    let query = location.query().to_string();
    let mut controller =
        OrdersTableController::with_search_quiet_period(&query, location, settings.search_quiet_period());
    controller.attach_grid();

    let source = order_source_for(&endpoint)?;
    controller.load_from(source.as_ref()).await;
    if let Some(message) = controller.error_message() {
        bail!(message);
    }
    print!("{}", render_view(&controller));

    if args.interactive {
        interactive::run(&mut controller).await?;
        print!("{}", render_view(&controller));
    }
    println!("{}", controller.navigator().url());
    Ok(())
}
