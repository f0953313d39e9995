use anyhow::Result;
use colored::Colorize;
use warden_client::WardenClient;
use warden_core::{CreateUserRequest, UpdateUserRequest, User, timestamp};

use crate::cli::{OutputFormat, UserCreateArgs, UserUpdateArgs};
use crate::output::{print_json, print_success, print_table};

const COLUMNS: [&str; 5] = ["ID", "Username", "Email", "Active", "Created"];

pub async fn list(client: &WardenClient, format: OutputFormat) -> Result<()> {
    let users = client.users().list().await?;
    match format {
        OutputFormat::Json => print_json(&users),
        OutputFormat::Table => print_table(COLUMNS, users.iter().map(row).collect()),
    }
    Ok(())
}

pub async fn get(client: &WardenClient, id: i64, format: OutputFormat) -> Result<()> {
    let user = client.users().get(id).await?;
    match format {
        OutputFormat::Json => print_json(&user),
        OutputFormat::Table => print_table(COLUMNS, vec![row(&user)]),
    }
    Ok(())
}

pub async fn create(
    client: &WardenClient,
    args: &UserCreateArgs,
    format: OutputFormat,
) -> Result<()> {
    let user = client
        .users()
        .create(CreateUserRequest::new(
            &args.username,
            &args.email,
            &args.password,
        ))
        .await?;
    print_success(&format!(
        "Created user {} (id {})",
        user.username.cyan(),
        user.id
    ));
    if matches!(format, OutputFormat::Json) {
        print_json(&user);
    }
    Ok(())
}

pub async fn update(
    client: &WardenClient,
    args: &UserUpdateArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = UpdateUserRequest {
        username: args.username.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
        is_active: args.active,
    };
    if request.is_empty() {
        anyhow::bail!(
            "Nothing to update. Pass at least one of --username, --email, --password, --active"
        );
    }

    let user = client.users().update(args.id, request).await?;
    print_success(&format!(
        "Updated user {} (id {})",
        user.username.cyan(),
        user.id
    ));
    if matches!(format, OutputFormat::Json) {
        print_json(&user);
    }
    Ok(())
}

pub async fn delete(client: &WardenClient, id: i64) -> Result<()> {
    client.users().delete(id).await?;
    print_success(&format!("Deleted user {id}"));
    Ok(())
}

fn row(user: &User) -> [String; 5] {
    [
        user.id.to_string(),
        user.username.clone(),
        user.email.clone(),
        user.is_active.to_string(),
        timestamp::format(user.created_at),
    ]
}
