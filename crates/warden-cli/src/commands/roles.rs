use anyhow::Result;
use colored::Colorize;
use warden_client::WardenClient;
use warden_core::{CreateRoleRequest, Role, UpdateRoleRequest, timestamp};

use crate::cli::{NamedCreateArgs, NamedUpdateArgs, OutputFormat};
use crate::output::{print_json, print_success, print_table};

const COLUMNS: [&str; 4] = ["ID", "Name", "Description", "Created"];

pub async fn list(client: &WardenClient, format: OutputFormat) -> Result<()> {
    let roles = client.roles().list().await?;
    match format {
        OutputFormat::Json => print_json(&roles),
        OutputFormat::Table => print_table(COLUMNS, roles.iter().map(row).collect()),
    }
    Ok(())
}

pub async fn create(
    client: &WardenClient,
    args: &NamedCreateArgs,
    format: OutputFormat,
) -> Result<()> {
    let mut request = CreateRoleRequest::new(&args.name);
    if let Some(description) = &args.description {
        request = request.with_description(description);
    }

    let role = client.roles().create(request).await?;
    print_success(&format!("Created role {} (id {})", role.name.cyan(), role.id));
    if matches!(format, OutputFormat::Json) {
        print_json(&role);
    }
    Ok(())
}

pub async fn update(
    client: &WardenClient,
    args: &NamedUpdateArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = UpdateRoleRequest {
        name: args.name.clone(),
        description: args.description.clone(),
    };
    if request.is_empty() {
        anyhow::bail!("Nothing to update. Pass --name and/or --description");
    }

    let role = client.roles().update(args.id, request).await?;
    print_success(&format!("Updated role {} (id {})", role.name.cyan(), role.id));
    if matches!(format, OutputFormat::Json) {
        print_json(&role);
    }
    Ok(())
}

pub async fn delete(client: &WardenClient, id: i64) -> Result<()> {
    client.roles().delete(id).await?;
    print_success(&format!("Deleted role {id}"));
    Ok(())
}

fn row(role: &Role) -> [String; 4] {
    [
        role.id.to_string(),
        role.name.clone(),
        role.description.clone().unwrap_or_else(|| "-".to_string()),
        timestamp::format(role.created_at),
    ]
}
