mod cli;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, Edits};
use medconsole::dashboard;
use medconsole::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConsoleConfig::load(cli.config.as_deref())?;
    init_tracing(&config);

    let transport = Arc::new(HttpTransport::new(config.api_base.clone()).context("building http client")?);

    match cli.command {
        Commands::List { resource } => {
            let page = open_page(resource, transport).await?;
            print!("{}", page.table());
        }
        Commands::Show { resource, id } => {
            let page = open_page(resource, transport).await?;
            let detail = page.detail(&id).with_context(|| format!("no {} with id {id}", resource.singular()))?;
            print!("{detail}");
        }
        Commands::Create { resource, edits } => {
            let mut page = Page::new(resource, transport);
            page.open_create()?;
            apply(page.form_mut(), &edits)?;
            let record = page.submit().await?;
            println!("created {} {}", resource.singular(), record_id(&record).unwrap_or("?"));
        }
        Commands::Edit { resource, id, edits } => {
            let mut page = open_page(resource, transport).await?;
            page.open_edit(&id).with_context(|| format!("no {} with id {id}", resource.singular()))?;
            apply(page.form_mut(), &edits)?;
            if !page.form().is_dirty() {
                println!("nothing to change");
                return Ok(());
            }
            page.submit().await?;
            println!("updated {} {id}", resource.singular());
        }
        Commands::Delete { resource, id, yes } => {
            let ask = config.confirm_deletes && !yes;
            let mut page = Page::new(resource, transport);
            let mut confirm = |prompt: &str| !ask || prompt_yes(prompt);
            if page.delete(&id, &mut confirm).await? {
                println!("deleted {} {id}", resource.singular());
            } else {
                println!("kept {} {id}", resource.singular());
            }
        }
        Commands::Stats => {
            for stat in dashboard::collect(&transport).await {
                println!("{:<20} {}", stat.label(), stat.display_count());
            }
        }
    }
    Ok(())
}

fn init_tracing(config: &ConsoleConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.as_deref().unwrap_or("info")))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Activate a page and fail if its list could not be fetched.
async fn open_page<T: Transport + Clone>(resource: Resource, transport: T) -> Result<Page<T>> {
    let mut page = Page::new(resource, transport);
    page.activate().await;
    if page.list().state() == LoadState::Failed {
        bail!("{}", page.banner().unwrap_or("fetch failed"));
    }
    if let Some(banner) = page.banner() {
        eprintln!("warning: {banner}");
    }
    Ok(page)
}

fn apply(form: &mut FormController, edits: &Edits) -> Result<()> {
    for a in &edits.set {
        form.set(&a.path, a.value()).with_context(|| format!("setting {}", a.path))?;
    }
    for a in &edits.push {
        let mut field = ListField::new(a.path.clone());
        field.set_input(a.raw.as_str());
        if !form.commit_list(&mut field).with_context(|| format!("adding to {}", a.path))? {
            bail!("refusing to add a blank item to {}", a.path);
        }
    }
    Ok(())
}

fn prompt_yes(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
