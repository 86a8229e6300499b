//! Sign-in and tab scope commands
use anyhow::Context;
use serde::Serialize;
use shopfront_core::{GateState, Profile, ScopeId, Storefront};
use std::io::BufRead;

use super::print_json;

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub tab: String,
    pub state: GateState,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl SessionInfo {
    fn new(store: &Storefront, state: GateState, profile: Option<Profile>) -> Self {
        Self {
            tab: store.scope().to_string(),
            state,
            email: profile.as_ref().map(|p| p.email.clone()),
            is_admin: profile.map(|p| p.is_privileged).unwrap_or(false),
        }
    }
}

pub fn open_tab() {
    println!("{}", ScopeId::new());
}

pub fn close_tab(store: Storefront) -> anyhow::Result<()> {
    let scope = store.scope().clone();
    store.close()?;
    eprintln!("Closed tab {}", scope);
    Ok(())
}

pub async fn login(store: &Storefront, email: &str) -> anyhow::Result<()> {
    let password = read_password()?;

    let profile = store.sign_in(email, &password).await?;
    let state = store.gate().state();
    print_json(&SessionInfo::new(store, state, Some(profile)))
}

pub async fn whoami(store: &Storefront) -> anyhow::Result<()> {
    let state = store.initialize().await;
    print_json(&SessionInfo::new(store, state, store.gate().profile()))
}

pub async fn logout(store: &Storefront) {
    store.sign_out().await;
    eprintln!("Signed out of tab {}", store.scope());
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
