mod args;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    Action, CatalogEditor, GatewayError, HttpBackend, Notification, OrderEntry, ProductionBoard,
    SubmitError,
};
use composition::OrderField;
use shared::{
    domain::{CoffeeId, CoffeeKind, DeliveryMethod, OrderId},
    protocol::{CatalogEntry, ProductionSummary},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::{ComponentArg, LineArg};

#[derive(Parser, Debug)]
#[command(name = "roaster", about = "Orders, blends and the roasting sheet for a coffee roastery")]
struct Cli {
    /// Backend API prefix; overrides roaster.toml and the environment.
    #[arg(long, global = true)]
    backend_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List single-origin coffees and blends.
    Catalog,
    AddSingle {
        name: String,
    },
    AddBlend {
        name: String,
        #[arg(long = "component", value_name = "NAME=PCT", required = true, value_parser = args::parse_component)]
        components: Vec<ComponentArg>,
    },
    EditCoffee {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "component", value_name = "NAME=PCT", value_parser = args::parse_component)]
        components: Vec<ComponentArg>,
    },
    DeleteCoffee {
        id: String,
    },
    /// Submit one order; each --line becomes its own record.
    Order {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        delivery: DeliveryMethod,
        #[arg(long)]
        custom_labels: bool,
        #[arg(long = "line", value_name = "COFFEE:QTY:BAG[:GRIND]", required = true, value_parser = args::parse_line)]
        lines: Vec<LineArg>,
    },
    /// Print the roasting and packaging sheet.
    Production,
    Dashboard,
    CompleteOrder {
        id: String,
        #[arg(long)]
        undo: bool,
    },
    DeleteOrder {
        id: String,
    },
    /// Mark every roast of one coffee as done.
    RoastDone {
        coffee: String,
        #[arg(long)]
        undo: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = config::load_settings();
    if let Some(url) = &cli.backend_url {
        settings.backend_url = config::normalize_backend_url(url);
    }
    init_tracing(&settings.log_filter);

    let backend = Arc::new(
        HttpBackend::new(&settings.backend_url)
            .with_context(|| format!("invalid backend url '{}'", settings.backend_url))?,
    );
    info!(backend_url = %backend.base_url(), "using backend");

    match cli.command {
        Command::Catalog => {
            let mut editor = CatalogEditor::new(backend);
            editor
                .refresh()
                .await
                .map_err(|err| gateway_failure(Action::LoadCatalog, err))?;
            print_catalog(editor.catalog().entries());
        }
        Command::AddSingle { name } => {
            let mut editor = CatalogEditor::new(backend);
            editor.open_new(CoffeeKind::SingleOrigin).set_name(name);
            let saved = editor
                .submit()
                .await
                .map_err(|err| submit_failure(Action::AddCoffee, err))?;
            announce(Action::AddCoffee, &saved.name);
        }
        Command::AddBlend { name, components } => {
            let mut editor = CatalogEditor::new(backend);
            load_catalog_for_edit(&mut editor).await;
            let draft = editor.open_new(CoffeeKind::Blend);
            draft.set_name(name);
            let clamped = args::apply_components(draft, &components)
                .map_err(|err| submit_failure(Action::AddCoffee, err.into()))?;
            report_clamps(&clamped);
            warn_dangling(&editor);
            let saved = editor
                .submit()
                .await
                .map_err(|err| submit_failure(Action::AddCoffee, err))?;
            announce(Action::AddCoffee, &saved.name);
        }
        Command::EditCoffee {
            id,
            name,
            components,
        } => {
            let mut editor = CatalogEditor::new(backend);
            editor
                .refresh()
                .await
                .map_err(|err| gateway_failure(Action::LoadCatalog, err))?;
            let draft = editor
                .open_edit(&CoffeeId::new(id))
                .map_err(|err| submit_failure(Action::UpdateCoffee, err))?;
            if let Some(name) = name {
                draft.set_name(name);
            }
            if !components.is_empty() {
                let clamped = args::apply_components(draft, &components)
                    .map_err(|err| submit_failure(Action::UpdateCoffee, err.into()))?;
                report_clamps(&clamped);
            }
            warn_dangling(&editor);
            let saved = editor
                .submit()
                .await
                .map_err(|err| submit_failure(Action::UpdateCoffee, err))?;
            announce(Action::UpdateCoffee, &saved.name);
        }
        Command::DeleteCoffee { id } => {
            let mut editor = CatalogEditor::new(backend);
            editor
                .delete(&CoffeeId::new(id.as_str()))
                .await
                .map_err(|err| gateway_failure(Action::DeleteCoffee, err))?;
            announce(Action::DeleteCoffee, &id);
        }
        Command::Order {
            customer,
            delivery,
            custom_labels,
            lines,
        } => {
            let mut entry = OrderEntry::new(backend);
            let draft = entry.draft_mut();
            draft.set_customer_field(OrderField::Customer(customer.clone()));
            draft.set_customer_field(OrderField::DeliveryMethod(Some(delivery)));
            draft.set_customer_field(OrderField::CustomLabels(custom_labels));
            args::apply_lines(draft, &lines)
                .map_err(|err| submit_failure(Action::SubmitOrder, err.into()))?;
            let records = entry
                .submit()
                .await
                .map_err(|err| submit_failure(Action::SubmitOrder, err))?;
            announce(
                Action::SubmitOrder,
                &format!("{customer}, {} line(s)", records.len()),
            );
        }
        Command::Production => {
            let mut board = ProductionBoard::new(backend);
            board
                .refresh()
                .await
                .map_err(|err| gateway_failure(Action::LoadProduction, err))?;
            print_production(board.summary());
            if let Some(loaded_at) = board.loaded_at() {
                println!("\nloaded at {}", loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        Command::Dashboard => {
            let mut board = ProductionBoard::new(backend);
            board
                .refresh()
                .await
                .map_err(|err| gateway_failure(Action::LoadProduction, err))?;
            let stats = board.dashboard();
            println!("Total Orders        {}", stats.total_orders);
            println!("Pounds to Roast     {:.1} lbs", stats.pounds_to_roast);
            println!("Completed Orders    {}", stats.completed_orders);
            println!("Pending Deliveries  {}", stats.pending_deliveries);
        }
        Command::CompleteOrder { id, undo } => {
            let mut board = ProductionBoard::new(backend);
            board
                .set_order_completed(&OrderId::new(id.as_str()), !undo)
                .await
                .map_err(|err| gateway_failure(Action::UpdateOrderStatus, err))?;
            announce(Action::UpdateOrderStatus, &id);
        }
        Command::DeleteOrder { id } => {
            let mut board = ProductionBoard::new(backend);
            board
                .delete_order(&OrderId::new(id.as_str()))
                .await
                .map_err(|err| gateway_failure(Action::DeleteOrder, err))?;
            announce(Action::DeleteOrder, &id);
        }
        Command::RoastDone { coffee, undo } => {
            let mut board = ProductionBoard::new(backend);
            board
                .set_roast_completed(&coffee, !undo)
                .await
                .map_err(|err| gateway_failure(Action::UpdateRoast, err))?;
            announce(Action::UpdateRoast, &coffee);
        }
    }

    Ok(())
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Blend edits still go through without a catalog; component names just cannot be checked.
async fn load_catalog_for_edit(editor: &mut CatalogEditor) {
    if let Err(err) = editor.refresh().await {
        warn!(error = %err, "continuing without the coffee catalog");
    }
}

fn announce(action: Action, subject: &str) {
    if let Some(notification) = Notification::success(action) {
        println!("{} ({subject})", notification.message);
    }
}

fn gateway_failure(action: Action, err: GatewayError) -> anyhow::Error {
    let notification = Notification::failure(action, &err);
    anyhow::Error::new(err).context(notification.message)
}

fn submit_failure(action: Action, err: SubmitError) -> anyhow::Error {
    let notification = Notification::submit_failure(action, &err);
    anyhow::Error::new(err).context(notification.message)
}

fn report_clamps(clamped: &[args::ClampedPercentage]) {
    for clamp in clamped {
        warn!(
            coffee = %clamp.source_name,
            requested = clamp.requested,
            applied = clamp.applied,
            "percentage clamped to keep the blend at 100%"
        );
        eprintln!(
            "warning: {} set to {}% instead of {}% to keep the blend at 100%",
            clamp.source_name, clamp.applied, clamp.requested
        );
    }
}

fn warn_dangling(editor: &CatalogEditor) {
    for name in editor.dangling_components() {
        eprintln!("warning: '{name}' is not a single-origin coffee in the catalog");
    }
}

fn print_catalog<'a>(entries: impl Iterator<Item = &'a CatalogEntry>) {
    for entry in entries {
        let id = entry.id.as_ref().map(CoffeeId::as_str).unwrap_or("-");
        match entry.kind {
            CoffeeKind::SingleOrigin => println!("{id:>6}  single  {}", entry.name),
            CoffeeKind::Blend => {
                let parts: Vec<String> =
                    entry.components.iter().map(ToString::to_string).collect();
                println!("{id:>6}  blend   {}: {}", entry.name, parts.join(", "));
            }
        }
    }
}

fn print_production(summary: &ProductionSummary) {
    println!("Roasting");
    for calc in &summary.roasting_calculations {
        let done = if summary.is_roast_completed(&calc.coffee_type) {
            "done"
        } else {
            ""
        };
        println!(
            "  {:<24} {:>8.1} lbs  {:>3} roast(s) of {:>6.2} lbs  {done}",
            calc.coffee_type, calc.total_pounds, calc.number_of_roasts, calc.batch_size
        );
    }
    println!(
        "  total {:.1} lbs in {} batch(es)",
        summary.total_pounds(),
        summary.total_batches
    );

    let packaging = &summary.packaging_needs;
    println!("\nPackaging");
    println!(
        "  5lb bags: {}  2lb bags: {}  10oz bags: {}",
        packaging.five_lb_bags, packaging.two_lb_bags, packaging.ten_oz_bags
    );
    for name in summary.label_names() {
        let labels = &packaging.labels;
        let count = |sizes: &std::collections::BTreeMap<String, u32>| {
            sizes.get(name).copied().unwrap_or(0)
        };
        println!(
            "  labels {:<20} 5lb {:>3}  2lb {:>3}  10oz {:>3}",
            name,
            count(&labels.five_lb),
            count(&labels.two_lb),
            count(&labels.ten_oz)
        );
    }

    if !summary.ground_coffee.is_empty() {
        println!("\nGround coffee");
        for (grind, entries) in &summary.ground_coffee {
            for entry in entries {
                println!(
                    "  {grind:<14} {} x {} {} for {}",
                    entry.quantity, entry.bag_size, entry.coffee_type, entry.customer
                );
            }
        }
    }

    println!("\nOrders");
    for (method, order) in summary.customer_orders() {
        let status = if order.completed { "x" } else { " " };
        let lines: Vec<String> = order.coffees.iter().map(ToString::to_string).collect();
        println!(
            "  [{status}] {:>6}  {method:<8} {}: {}",
            order.id.as_str(),
            order.customer,
            lines.join("; ")
        );
    }
}
