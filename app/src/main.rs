//! Shopfront - command-line storefront client
//!
//! Every invocation is one page load: it opens the tab's scope, restores the
//! stored session, and verifies it before any administrator action.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use shopfront_core::{Config, ScopeId, Storefront};

use cli::{CategoryCommand, Cli, Command, ImageCommand, ProductCommand, SettingsCommand, TabCommand};
use commands::{catalog, images, session, settings};

/// Scope used when no --tab is given
const DEFAULT_TAB: &str = "default";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shopfront_core::init_logging();

    let cli = Cli::parse();
    let tab = cli.tab.as_deref();

    match cli.command {
        Command::Image(ImageCommand::Resolve { reference, explain }) => {
            images::resolve(&open_store(tab)?, reference.as_deref(), explain)?
        }
        Command::Image(ImageCommand::Canonical { link }) => {
            images::canonical(&open_store(tab)?, &link)
        }

        Command::Tab(TabCommand::Open) => session::open_tab(),
        Command::Tab(TabCommand::Close) => session::close_tab(open_store(tab)?)?,

        Command::Login(args) => session::login(&open_store(tab)?, &args.email).await?,
        Command::Whoami => session::whoami(&open_store(tab)?).await?,
        Command::Logout => session::logout(&open_store(tab)?).await,

        Command::Products(command) => products(&open_store(tab)?, command).await?,
        Command::Categories(command) => categories(&open_store(tab)?, command).await?,
        Command::Settings(command) => settings_command(&open_store(tab)?, command).await?,
    }

    Ok(())
}

/// Open the store for the scope named by --tab
fn open_store(tab: Option<&str>) -> anyhow::Result<Storefront> {
    let config = Config::from_env();
    let scope: ScopeId = tab
        .unwrap_or(DEFAULT_TAB)
        .parse()
        .context("invalid --tab value")?;

    let store = Storefront::open(config, scope).context("failed to open storefront")?;
    tracing::debug!(store = %store.display_name(), "Ready");
    Ok(store)
}

async fn products(store: &Storefront, command: ProductCommand) -> anyhow::Result<()> {
    match command {
        ProductCommand::List {
            category,
            search,
            all,
        } => {
            if all {
                store.initialize().await;
            }
            catalog::list_products(store, category, search, all).await
        }
        ProductCommand::Show { id } => catalog::show_product(store, &id).await,
        ProductCommand::Create(args) => {
            store.initialize().await;
            catalog::create_product(store, args).await
        }
        ProductCommand::Update { id, fields } => {
            store.initialize().await;
            catalog::update_product(store, &id, fields).await
        }
        ProductCommand::Toggle { id } => {
            store.initialize().await;
            catalog::toggle_product(store, &id).await
        }
        ProductCommand::Delete { id } => {
            store.initialize().await;
            catalog::delete_product(store, &id).await
        }
    }
}

async fn categories(store: &Storefront, command: CategoryCommand) -> anyhow::Result<()> {
    match command {
        CategoryCommand::List => catalog::list_categories(store).await,
        CategoryCommand::Create { name, description } => {
            store.initialize().await;
            catalog::create_category(store, name, description).await
        }
        CategoryCommand::Delete { id } => {
            store.initialize().await;
            catalog::delete_category(store, &id).await
        }
        CategoryCommand::Seed => {
            store.initialize().await;
            catalog::seed_categories(store).await
        }
    }
}

async fn settings_command(store: &Storefront, command: SettingsCommand) -> anyhow::Result<()> {
    match command {
        SettingsCommand::Show => settings::show(store).await,
        SettingsCommand::Watch => settings::watch(store).await,
        SettingsCommand::Update(args) => {
            store.initialize().await;
            settings::update(store, args).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_tab_rejected_before_opening() {
        let err = open_store(Some("not a scope!")).err().expect("bad scope accepted");
        assert!(err.to_string().contains("invalid --tab value"));
    }

    #[test]
    fn test_tab_open_needs_no_scope() {
        let cli = Cli::parse_from(["shopfront", "--tab", "not a scope!", "tab", "open"]);
        assert!(matches!(cli.command, Command::Tab(TabCommand::Open)));
    }
}
