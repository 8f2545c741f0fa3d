//! Sign-in and sign-out commands.

use std::error::Error;

use tracing::debug;

use crate::api::FormData;
use crate::cli::CliContext;

pub const PASSWORD_ENV: &str = "PALAVER_PASSWORD";

/// Pick the password from the flag, falling back to the environment.
pub(crate) fn resolve_password(
    flag: Option<String>,
    env: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    flag.or_else(|| env(PASSWORD_ENV))
        .filter(|password| !password.is_empty())
}

pub async fn run_login(
    ctx: &CliContext,
    username: &str,
    password: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let Some(password) = resolve_password(password, |key| std::env::var(key).ok()) else {
        eprintln!("❌ No password given. Pass --password or set {PASSWORD_ENV}.");
        std::process::exit(2);
    };

    let form = FormData::new()
        .append("username", username)
        .append("password", password);
    let auth = ctx.client.password_auth(form).await?;
    ctx.tokens.store(&auth.access_token)?;
    debug!(token_type = %auth.token_type, "password login succeeded");

    println!("✅ Signed in to {} as {username}", ctx.endpoints.http);
    Ok(())
}

pub async fn run_header_login(ctx: &CliContext) -> Result<(), Box<dyn Error>> {
    let auth = ctx.client.header_auth().await?;
    ctx.tokens.store(&auth.access_token)?;

    println!("✅ Signed in to {} using proxy headers", ctx.endpoints.http);
    Ok(())
}

pub fn run_logout(ctx: &CliContext) -> Result<(), Box<dyn Error>> {
    ctx.tokens.clear()?;
    println!("✅ Signed out of {}", ctx.endpoints.http);
    Ok(())
}
