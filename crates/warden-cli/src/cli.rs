use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Warden CLI — administer users, roles, and permissions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides config and WARDEN_URL env var)
    #[arg(short, long, global = true, env = "WARDEN_URL")]
    pub server: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "WARDEN_PROFILE", default_value = "default")]
    pub profile: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(LoginArgs),
    /// Create an account and sign in
    Register(RegisterArgs),
    /// Sign out and clear the stored session
    Logout,
    /// Show the signed-in account
    Whoami(WhoamiArgs),
    /// Password reset helpers
    Password(PasswordArgs),
    /// Manage user accounts
    Users(UsersArgs),
    /// Manage roles
    Roles(RolesArgs),
    /// Manage permissions
    Permissions(PermissionsArgs),
    /// Assign roles to users
    UserRoles(UserRolesArgs),
    /// Grant permissions to roles
    RolePermissions(RolePermissionsArgs),
    /// Inspect and revoke issued tokens
    Tokens(TokensArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,
    /// Account password
    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct RegisterArgs {
    /// Login name for the new account
    #[arg(short, long)]
    pub username: String,
    /// Email address for the new account
    #[arg(short, long)]
    pub email: String,
    /// Initial password
    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct WhoamiArgs {
    /// Ask the server instead of reading the stored session
    #[arg(long)]
    pub remote: bool,
}

#[derive(clap::Args)]
pub struct PasswordArgs {
    #[command(subcommand)]
    pub command: PasswordCommands,
}

#[derive(Subcommand)]
pub enum PasswordCommands {
    /// Request a password reset email
    Forgot(ForgotArgs),
    /// Set a new password with a reset token
    Reset(ResetArgs),
    /// Check whether a reset token is still valid
    CheckLink(CheckLinkArgs),
}

#[derive(clap::Args)]
pub struct ForgotArgs {
    /// Email of the account to reset
    pub email: String,
}

#[derive(clap::Args)]
pub struct ResetArgs {
    /// Reset token from the emailed link
    pub token: String,
    /// Replacement password
    #[arg(long)]
    pub new_password: String,
}

#[derive(clap::Args)]
pub struct CheckLinkArgs {
    /// Reset token from the emailed link
    pub token: String,
}

#[derive(clap::Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommands,
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List all user accounts
    List,
    /// Show one user account
    Get(IdArg),
    /// Create a user account
    Create(UserCreateArgs),
    /// Update a user account
    Update(UserUpdateArgs),
    /// Delete a user account
    Delete(IdArg),
}

#[derive(clap::Args)]
pub struct IdArg {
    /// Numeric id
    pub id: i64,
}

#[derive(clap::Args)]
pub struct UserCreateArgs {
    /// Login name for the new account
    #[arg(short, long)]
    pub username: String,
    /// Email address for the new account
    #[arg(short, long)]
    pub email: String,
    /// Initial password
    #[arg(long)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct UserUpdateArgs {
    /// Numeric id of the account to update
    pub id: i64,
    /// New login name
    #[arg(long)]
    pub username: Option<String>,
    /// New email address
    #[arg(long)]
    pub email: Option<String>,
    /// New password
    #[arg(long)]
    pub password: Option<String>,
    /// Activate or deactivate the account
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(clap::Args)]
pub struct RolesArgs {
    #[command(subcommand)]
    pub command: RolesCommands,
}

#[derive(Subcommand)]
pub enum RolesCommands {
    /// List all roles
    List,
    /// Create a role
    Create(NamedCreateArgs),
    /// Update a role
    Update(NamedUpdateArgs),
    /// Delete a role
    Delete(IdArg),
}

#[derive(clap::Args)]
pub struct NamedCreateArgs {
    /// Name of the new entry
    pub name: String,
    /// Free-text description
    #[arg(short, long)]
    pub description: Option<String>,
}

#[derive(clap::Args)]
pub struct NamedUpdateArgs {
    /// Numeric id of the entry to update
    pub id: i64,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(clap::Args)]
pub struct PermissionsArgs {
    #[command(subcommand)]
    pub command: PermissionsCommands,
}

#[derive(Subcommand)]
pub enum PermissionsCommands {
    /// List all permissions
    List,
    /// Show one permission
    Get(IdArg),
    /// Create a permission
    Create(NamedCreateArgs),
    /// Update a permission
    Update(NamedUpdateArgs),
    /// Delete a permission
    Delete(IdArg),
}

#[derive(clap::Args)]
pub struct UserRolesArgs {
    #[command(subcommand)]
    pub command: UserRolesCommands,
}

#[derive(Subcommand)]
pub enum UserRolesCommands {
    /// List role assignments
    List(UserRoleListArgs),
    /// Assign a role to a user
    Assign(UserRolePairArgs),
    /// Remove a role from a user
    Remove(UserRolePairArgs),
}

#[derive(clap::Args)]
pub struct UserRoleListArgs {
    /// Only assignments of this user
    #[arg(long)]
    pub user: Option<i64>,
    /// Only assignments of this role
    #[arg(long)]
    pub role: Option<i64>,
}

#[derive(clap::Args)]
pub struct UserRolePairArgs {
    /// User id
    #[arg(long)]
    pub user: i64,
    /// Role id
    #[arg(long)]
    pub role: i64,
}

#[derive(clap::Args)]
pub struct RolePermissionsArgs {
    #[command(subcommand)]
    pub command: RolePermissionsCommands,
}

#[derive(Subcommand)]
pub enum RolePermissionsCommands {
    /// List permission grants
    List(RolePermissionListArgs),
    /// Grant a permission to a role
    Assign(RolePermissionPairArgs),
    /// Revoke a permission from a role
    Remove(RolePermissionPairArgs),
}

#[derive(clap::Args)]
pub struct RolePermissionListArgs {
    /// Only grants of this role
    #[arg(long)]
    pub role: Option<i64>,
    /// Only grants of this permission
    #[arg(long)]
    pub permission: Option<i64>,
}

#[derive(clap::Args)]
pub struct RolePermissionPairArgs {
    /// Role id
    #[arg(long)]
    pub role: i64,
    /// Permission id
    #[arg(long)]
    pub permission: i64,
}

#[derive(clap::Args)]
pub struct TokensArgs {
    #[command(subcommand)]
    pub command: TokensCommands,
}

#[derive(Subcommand)]
pub enum TokensCommands {
    /// List the account's active tokens
    List,
    /// Revoke one token
    Revoke(IdArg),
    /// Revoke every token except the current one
    RevokeAll,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (server, format)
    pub key: String,
    /// Value
    pub value: String,
}
