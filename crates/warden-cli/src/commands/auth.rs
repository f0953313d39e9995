use anyhow::Result;
use colored::Colorize;
use warden_client::{FileSessionStore, SessionStore, WardenClient};
use warden_core::{LoginRequest, RegisterRequest, ResetPasswordRequest};

use crate::cli::{LoginArgs, OutputFormat, RegisterArgs, ResetArgs};
use crate::output::{print_error, print_json, print_success};

pub async fn login(client: &WardenClient, args: &LoginArgs) -> Result<()> {
    let tokens = client
        .auth()
        .login(LoginRequest {
            email: args.email.clone(),
            password: args.password.clone(),
        })
        .await?;
    print_success(&format!(
        "Signed in as {} ({})",
        tokens.user.username.cyan(),
        tokens.user.email
    ));
    Ok(())
}

pub async fn register(client: &WardenClient, args: &RegisterArgs) -> Result<()> {
    let tokens = client
        .auth()
        .register(RegisterRequest {
            username: args.username.clone(),
            email: args.email.clone(),
            password: args.password.clone(),
        })
        .await?;
    print_success(&format!(
        "Account {} created and signed in",
        tokens.user.username.cyan()
    ));
    Ok(())
}

pub async fn logout(client: &WardenClient) -> Result<()> {
    match client.auth().logout().await {
        Ok(()) => print_success("Signed out"),
        Err(err) => {
            // The local session is cleared regardless of the server call.
            print_error(&format!("Server-side sign-out failed: {err}"));
            println!("Local session cleared.");
        }
    }
    Ok(())
}

/// Reads the stored session without touching the network.
pub async fn whoami(profile: &str) -> Result<()> {
    let store = FileSessionStore::for_profile(profile)?;
    match store.load().await? {
        Some(session) if session.is_authenticated => {
            println!("{}: {}", "Profile".cyan(), profile);
            if let Some(user) = &session.user {
                println!("{}: {} ({})", "User".cyan(), user.username, user.email);
            }
            if let Some(token) = &session.access_token {
                println!("{}: Bearer (token: {})", "Auth".cyan(), preview(token));
            }
        }
        _ => {
            print_error(&format!("Not signed in (profile: \"{profile}\")"));
        }
    }
    Ok(())
}

pub async fn whoami_remote(client: &WardenClient, format: OutputFormat) -> Result<()> {
    let user = client.auth().me().await?;
    match format {
        OutputFormat::Json => print_json(&user),
        OutputFormat::Table => {
            println!("{}: {} ({})", "User".cyan(), user.username, user.email);
            println!("{}: {}", "Active".cyan(), user.is_active);
        }
    }
    Ok(())
}

pub async fn forgot_password(client: &WardenClient, email: &str) -> Result<()> {
    client.auth().forgot_password(email).await?;
    print_success(&format!("Reset link requested for {email}"));
    Ok(())
}

pub async fn reset_password(client: &WardenClient, args: &ResetArgs) -> Result<()> {
    client
        .auth()
        .reset_password(ResetPasswordRequest {
            reset_token: args.token.clone(),
            new_password: args.new_password.clone(),
        })
        .await?;
    print_success("Password updated");
    Ok(())
}

pub async fn check_reset_link(client: &WardenClient, token: &str) -> Result<()> {
    let check = client.auth().check_reset_link(token).await?;
    print_success(check.message.as_deref().unwrap_or("Token is valid"));
    if let Some(url) = check.reset_url {
        println!("{}: {url}", "Reset URL".cyan());
    }
    Ok(())
}

fn preview(token: &str) -> String {
    if token.len() > 20 {
        format!("{}...{}", &token[..8], &token[token.len() - 8..])
    } else {
        token.to_string()
    }
}
