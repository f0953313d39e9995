use anyhow::Result;
use colored::Colorize;
use warden_client::WardenClient;
use warden_core::{CreatePermissionRequest, Permission, UpdatePermissionRequest, timestamp};

use crate::cli::{NamedCreateArgs, NamedUpdateArgs, OutputFormat};
use crate::output::{print_json, print_success, print_table};

const COLUMNS: [&str; 4] = ["ID", "Name", "Description", "Created"];

pub async fn list(client: &WardenClient, format: OutputFormat) -> Result<()> {
    let permissions = client.permissions().list().await?;
    match format {
        OutputFormat::Json => print_json(&permissions),
        OutputFormat::Table => print_table(COLUMNS, permissions.iter().map(row).collect()),
    }
    Ok(())
}

pub async fn get(client: &WardenClient, id: i64, format: OutputFormat) -> Result<()> {
    let permission = client.permissions().get(id).await?;
    match format {
        OutputFormat::Json => print_json(&permission),
        OutputFormat::Table => print_table(COLUMNS, vec![row(&permission)]),
    }
    Ok(())
}

pub async fn create(
    client: &WardenClient,
    args: &NamedCreateArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut request = CreatePermissionRequest::new(&args.name);
    if let Some(description) = &args.description {
        request = request.with_description(description);
    }

    let permission = client.permissions().create(request).await?;
    print_success(&format!(
        "Created permission {} (id {})",
        permission.name.cyan(),
        permission.id
    ));
    if matches!(format, OutputFormat::Json) {
        print_json(&permission);
    }
    Ok(())
}

pub async fn update(
    client: &WardenClient,
    args: &NamedUpdateArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = UpdatePermissionRequest {
        name: args.name.clone(),
        description: args.description.clone(),
    };
    if request.is_empty() {
        anyhow::bail!("Nothing to update. Pass --name and/or --description");
    }

    let permission = client.permissions().update(args.id, request).await?;
    print_success(&format!(
        "Updated permission {} (id {})",
        permission.name.cyan(),
        permission.id
    ));
    if matches!(format, OutputFormat::Json) {
        print_json(&permission);
    }
    Ok(())
}

pub async fn delete(client: &WardenClient, id: i64) -> Result<()> {
    client.permissions().delete(id).await?;
    print_success(&format!("Deleted permission {id}"));
    Ok(())
}

fn row(permission: &Permission) -> [String; 4] {
    [
        permission.id.to_string(),
        permission.name.clone(),
        permission
            .description
            .clone()
            .unwrap_or_else(|| "-".to_string()),
        timestamp::format(permission.created_at),
    ]
}
