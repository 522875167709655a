//! Session commands

use anyhow::{Context, Result};
use budget_core::{ApiClient, Session, SessionStore};

use super::ApiContext;

pub async fn cmd_signup(
    client: &ApiClient,
    store: &SessionStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let auth = client
        .signup(name, email, password)
        .await
        .context("Signup failed")?;
    let name = auth.user.name.clone();
    store
        .save(&Session::from(auth))
        .context("Failed to save session")?;

    println!("✅ Account created. Welcome, {}!", name);
    println!("   Default categories have been set up for you.");
    Ok(())
}

pub async fn cmd_login(
    client: &ApiClient,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<()> {
    let auth = client.login(email, password).await.context("Login failed")?;
    let name = auth.user.name.clone();
    store
        .save(&Session::from(auth))
        .context("Failed to save session")?;

    println!("✅ Logged in as {}", name);
    Ok(())
}

pub fn cmd_logout(store: &SessionStore) -> Result<()> {
    if store.clear().context("Failed to remove session")? {
        println!("👋 Logged out");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn cmd_whoami(ctx: &ApiContext) -> Result<()> {
    let user = ctx.client.me().await.context("Failed to fetch current user")?;
    println!("👤 {} <{}>", user.name, user.email);
    Ok(())
}
