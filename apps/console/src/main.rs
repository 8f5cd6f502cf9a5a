mod config;
mod terminal;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    render::COLUMN_HEADERS, BrowserConfig, DeleteOutcome, DraftField, EditDraft,
    HttpRecordStore, RecordBrowser, RenderedPage, UpdateOutcome,
};
use shared::{domain::VolunteerId, protocol::HealthCenterRecord};
use tracing_subscriber::EnvFilter;

use crate::{config::load_settings, terminal::TerminalGateway};

#[derive(Parser, Debug)]
#[command(name = "roster-console", about = "Browse and maintain the volunteer roster")]
struct Args {
    /// Record store base URL, e.g. http://localhost:3000/api
    #[arg(long, global = true)]
    store_url: Option<String>,
    #[arg(long, global = true)]
    page_size: Option<usize>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of the roster.
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        query: Option<String>,
    },
    /// Delete a volunteer after confirmation.
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    /// Edit fields of a volunteer and submit them.
    Edit {
        id: i64,
        /// field=value, one of: full_name national_id address email
        /// birth_date department health_center password
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        set: Vec<(DraftField, String)>,
    },
    /// List the health centers a volunteer can be assigned to.
    Centers,
}

fn parse_assignment(raw: &str) -> Result<(DraftField, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{raw}'"))?;
    let field = key.parse::<DraftField>().map_err(|err| err.to_string())?;
    Ok((field, value.to_string()))
}

fn describe_draft(draft: &EditDraft, centers: &[HealthCenterRecord]) -> String {
    let center = draft
        .selected_health_center_name(centers)
        .or_else(|| draft.selected_health_center().map(|id| format!("#{id}")))
        .unwrap_or_else(|| "none".to_string());
    format!("Submitting volunteer {} (health center: {center})", draft.id())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(url) = args.store_url {
        settings.store_url = url;
    }
    if let Some(size) = args.page_size.filter(|size| *size > 0) {
        settings.page_size = size;
    }
    if let Some(secs) = args.timeout_secs.filter(|secs| *secs > 0) {
        settings.request_timeout_secs = secs;
    }

    let store_url = settings.store_url()?;
    let store = HttpRecordStore::new(&store_url, settings.request_timeout())
        .context("failed to build record store client")?;
    let assume_yes = matches!(args.command, Command::Delete { yes: true, .. });
    let browser = RecordBrowser::new(
        BrowserConfig {
            page_size: settings.page_size,
        },
        Arc::new(store),
        Arc::new(TerminalGateway::new(assume_yes)),
    );

    browser
        .load()
        .await
        .with_context(|| format!("failed to load roster from {store_url}"))?;

    match args.command {
        Command::List { page, query } => {
            if !browser.go_to_page(page).await {
                bail!("pages start at 1");
            }
            if let Some(query) = query {
                browser.set_query(query).await;
            }
            print_page(&browser.rendered_page().await);
        }
        Command::Delete { id, .. } => match browser.delete(VolunteerId(id)).await {
            DeleteOutcome::Declined => println!("Nothing deleted."),
            DeleteOutcome::Applied { .. } => println!("Volunteer {id} deleted."),
            DeleteOutcome::Failed { message } => bail!("delete of volunteer {id} failed: {message}"),
        },
        Command::Edit { id, set } => {
            if browser.open_edit(VolunteerId(id)).await.is_none() {
                bail!("volunteer {id} is not in the roster");
            }
            for (field, value) in &set {
                browser
                    .edit_field(*field, value)
                    .await
                    .with_context(|| format!("cannot set {field}"))?;
            }
            if let Some(draft) = browser.edit_session().await.draft() {
                println!(
                    "{}",
                    describe_draft(draft, &browser.health_centers().await)
                );
            }
            match browser.submit_edit().await {
                UpdateOutcome::Applied { .. } => match browser.volunteer(VolunteerId(id)).await {
                    Some(record) => println!("Volunteer {id} updated: {}", record.full_name),
                    None => println!("Volunteer {id} updated."),
                },
                UpdateOutcome::Failed { message } => {
                    bail!("update of volunteer {id} failed: {message}")
                }
                other => bail!("update of volunteer {id} did not complete: {other:?}"),
            }
        }
        Command::Centers => {
            for center in browser.health_centers().await {
                println!("{:>4}  {}", center.id, center.name);
            }
        }
    }

    Ok(())
}

fn print_page(page: &RenderedPage) {
    let mut widths = COLUMN_HEADERS.map(str::len);
    for row in &page.rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 10]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    println!("{}", line(COLUMN_HEADERS));
    match page.placeholder() {
        Some(placeholder) => println!("{placeholder}"),
        None => {
            for row in &page.rows {
                println!("{}", line(row.cells()));
            }
        }
    }

    let links = page
        .page_links
        .iter()
        .map(|link| {
            if *link == page.page {
                format!("[{link}]")
            } else {
                link.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!("Pages: {links}");
}
