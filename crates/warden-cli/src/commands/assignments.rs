use anyhow::Result;
use warden_client::WardenClient;
use warden_core::{RolePermission, RolePermissionFilter, UserRole, UserRoleFilter, timestamp};

use crate::cli::{OutputFormat, RolePermissionListArgs, UserRoleListArgs};
use crate::output::{print_json, print_success, print_table};

pub async fn list_user_roles(
    client: &WardenClient,
    args: &UserRoleListArgs,
    format: OutputFormat,
) -> Result<()> {
    let filter = UserRoleFilter {
        user_id: args.user,
        role_id: args.role,
    };
    let assignments = client.user_roles().list(filter).await?;
    match format {
        OutputFormat::Json => print_json(&assignments),
        OutputFormat::Table => print_table(
            ["ID", "User", "Role", "Created"],
            assignments.iter().map(user_role_row).collect(),
        ),
    }
    Ok(())
}

pub async fn assign_user_role(client: &WardenClient, user: i64, role: i64) -> Result<()> {
    let assignment = client.user_roles().assign(user, role).await?;
    print_success(&format!(
        "Assigned role {} to user {} (assignment {})",
        role, user, assignment.id
    ));
    Ok(())
}

pub async fn remove_user_role(client: &WardenClient, user: i64, role: i64) -> Result<()> {
    client.user_roles().remove(user, role).await?;
    print_success(&format!("Removed role {role} from user {user}"));
    Ok(())
}

pub async fn list_role_permissions(
    client: &WardenClient,
    args: &RolePermissionListArgs,
    format: OutputFormat,
) -> Result<()> {
    let filter = RolePermissionFilter {
        role_id: args.role,
        permission_id: args.permission,
    };
    let grants = client.role_permissions().list(filter).await?;
    match format {
        OutputFormat::Json => print_json(&grants),
        OutputFormat::Table => print_table(
            ["ID", "Role", "Permission", "Created"],
            grants.iter().map(role_permission_row).collect(),
        ),
    }
    Ok(())
}

pub async fn assign_role_permission(
    client: &WardenClient,
    role: i64,
    permission: i64,
) -> Result<()> {
    let grant = client.role_permissions().assign(role, permission).await?;
    print_success(&format!(
        "Granted permission {} to role {} (grant {})",
        permission, role, grant.id
    ));
    Ok(())
}

pub async fn remove_role_permission(
    client: &WardenClient,
    role: i64,
    permission: i64,
) -> Result<()> {
    client.role_permissions().remove(role, permission).await?;
    print_success(&format!("Revoked permission {permission} from role {role}"));
    Ok(())
}

fn user_role_row(assignment: &UserRole) -> [String; 4] {
    // Show names when the service expanded the link, ids otherwise.
    let user = assignment.user.as_ref().map_or_else(
        || assignment.user_id.to_string(),
        |user| format!("{} ({})", user.username, assignment.user_id),
    );
    let role = assignment.role.as_ref().map_or_else(
        || assignment.role_id.to_string(),
        |role| format!("{} ({})", role.name, assignment.role_id),
    );
    [
        assignment.id.to_string(),
        user,
        role,
        assignment
            .created_at
            .map_or_else(|| "-".to_string(), timestamp::format),
    ]
}

fn role_permission_row(grant: &RolePermission) -> [String; 4] {
    let role = grant.role.as_ref().map_or_else(
        || grant.role_id.to_string(),
        |role| format!("{} ({})", role.name, grant.role_id),
    );
    let permission = grant.permission.as_ref().map_or_else(
        || grant.permission_id.to_string(),
        |permission| format!("{} ({})", permission.name, grant.permission_id),
    );
    [
        grant.id.to_string(),
        role,
        permission,
        grant
            .created_at
            .map_or_else(|| "-".to_string(), timestamp::format),
    ]
}
