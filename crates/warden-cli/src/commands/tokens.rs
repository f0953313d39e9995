use anyhow::Result;
use warden_client::WardenClient;
use warden_core::{TokenInfo, timestamp};

use crate::cli::OutputFormat;
use crate::output::{print_json, print_success, print_table};

pub async fn list(client: &WardenClient, format: OutputFormat) -> Result<()> {
    let tokens = client.tokens().active().await?;
    match format {
        OutputFormat::Json => print_json(&tokens),
        OutputFormat::Table => print_table(
            ["ID", "JTI", "Type", "Issued", "Expires", "Device"],
            tokens.iter().map(row).collect(),
        ),
    }
    Ok(())
}

pub async fn revoke(client: &WardenClient, id: i64) -> Result<()> {
    client.tokens().revoke(id).await?;
    print_success(&format!("Revoked token {id}"));
    Ok(())
}

pub async fn revoke_all(client: &WardenClient) -> Result<()> {
    client.tokens().revoke_all().await?;
    print_success("Revoked all active tokens");
    Ok(())
}

fn row(token: &TokenInfo) -> [String; 6] {
    [
        token.id.to_string(),
        token.jti.clone(),
        token.token_type.clone(),
        timestamp::format(token.issued_at),
        timestamp::format(token.expires_at),
        token.device_info.clone().unwrap_or_else(|| "-".to_string()),
    ]
}
