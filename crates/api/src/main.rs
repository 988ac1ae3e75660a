use std::sync::Arc;

use anyhow::Context;

use rolegate_api::app::build_app;
use rolegate_api::config::{AppConfig, SeedAdmin};
use rolegate_directory::{Directory, InMemoryDirectory, NewUser};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rolegate_observability::init();

    let config = AppConfig::from_env().context("configuration error")?;

    let directory = Arc::new(InMemoryDirectory::new());
    if let Some(seed) = config.seed_admin.clone() {
        seed_directory(directory.as_ref(), &seed)?;
    }

    let addr = config.bind_addr;
    let app = build_app(config, directory);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "rolegate api listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Bootstrap an empty directory: three modules, the admin role holding all
/// of them, and one admin account. The first role created gets id 1, which
/// is the privileged role id.
fn seed_directory(directory: &InMemoryDirectory, seed: &SeedAdmin) -> anyhow::Result<()> {
    let dashboard = directory.insert_module("Dashboard", "dashboard");
    let users = directory.insert_module("Users", "users");
    let roles = directory.insert_module("Roles", "roles");

    let role_id = directory.create_role("Admin", &[dashboard, users, roles]);

    let password_hash = bcrypt::hash(&seed.password, bcrypt::DEFAULT_COST)
        .context("failed to hash the seed admin password")?;
    directory.create_user(NewUser {
        name: "Admin".to_string(),
        email: seed.email.clone(),
        mobile: "0000000000".to_string(),
        address: None,
        pincode: None,
        role_id,
        password_hash,
    });

    tracing::info!(email = %seed.email, "seeded admin account");
    Ok(())
}
