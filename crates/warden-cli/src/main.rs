mod cli;
mod commands;
mod config;
mod observe;
mod output;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use warden_client::{FileSessionStore, WardenClient};

use cli::{Cli, Commands, OutputFormat};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    observe::init_tracing(cli.verbose);
    let profile = &cli.profile;
    let format = resolve_format(cli.format, profile)?;

    match &cli.command {
        Commands::Login(args) => {
            let client = make_client(&cli.server, profile).await?;
            commands::auth::login(&client, args).await?;
        }
        Commands::Register(args) => {
            let client = make_client(&cli.server, profile).await?;
            commands::auth::register(&client, args).await?;
        }
        Commands::Logout => {
            let client = make_client(&cli.server, profile).await?;
            commands::auth::logout(&client).await?;
        }
        Commands::Whoami(args) => {
            if args.remote {
                let client = make_client(&cli.server, profile).await?;
                commands::auth::whoami_remote(&client, format).await?;
            } else {
                commands::auth::whoami(profile).await?;
            }
        }
        Commands::Password(args) => {
            let client = make_client(&cli.server, profile).await?;
            match &args.command {
                cli::PasswordCommands::Forgot(forgot) => {
                    commands::auth::forgot_password(&client, &forgot.email).await?;
                }
                cli::PasswordCommands::Reset(reset) => {
                    commands::auth::reset_password(&client, reset).await?;
                }
                cli::PasswordCommands::CheckLink(check) => {
                    commands::auth::check_reset_link(&client, &check.token).await?;
                }
            }
        }
        Commands::Users(args) => {
            let client = make_client(&cli.server, profile).await?;
            match &args.command {
                cli::UsersCommands::List => {
                    commands::users::list(&client, format).await?;
                }
                cli::UsersCommands::Get(arg) => {
                    commands::users::get(&client, arg.id, format).await?;
                }
                cli::UsersCommands::Create(create) => {
                    commands::users::create(&client, create, format).await?;
                }
                cli::UsersCommands::Update(update) => {
                    commands::users::update(&client, update, format).await?;
                }
                cli::UsersCommands::Delete(arg) => {
                    commands::users::delete(&client, arg.id).await?;
                }
            }
        }
        Commands::Roles(args) => {
            let client = make_client(&cli.server, profile).await?;
            match &args.command {
                cli::RolesCommands::List => {
                    commands::roles::list(&client, format).await?;
                }
                cli::RolesCommands::Create(create) => {
                    commands::roles::create(&client, create, format).await?;
                }
                cli::RolesCommands::Update(update) => {
                    commands::roles::update(&client, update, format).await?;
                }
                cli::RolesCommands::Delete(arg) => {
                    commands::roles::delete(&client, arg.id).await?;
                }
            }
        }
        Commands::Permissions(args) => {
            let client = make_client(&cli.server, profile).await?;
            match &args.command {
                cli::PermissionsCommands::List => {
                    commands::permissions::list(&client, format).await?;
                }
                cli::PermissionsCommands::Get(arg) => {
                    commands::permissions::get(&client, arg.id, format).await?;
                }
                cli::PermissionsCommands::Create(create) => {
                    commands::permissions::create(&client, create, format).await?;
                }
                cli::PermissionsCommands::Update(update) => {
                    commands::permissions::update(&client, update, format).await?;
                }
                cli::PermissionsCommands::Delete(arg) => {
                    commands::permissions::delete(&client, arg.id).await?;
                }
            }
        }
        Commands::UserRoles(args) => {
            let client = make_client(&cli.server, profile).await?;
            match &args.command {
                cli::UserRolesCommands::List(list) => {
                    commands::assignments::list_user_roles(&client, list, format).await?;
                }
                cli::UserRolesCommands::Assign(pair) => {
                    commands::assignments::assign_user_role(&client, pair.user, pair.role).await?;
                }
                cli::UserRolesCommands::Remove(pair) => {
                    commands::assignments::remove_user_role(&client, pair.user, pair.role).await?;
                }
            }
        }
        Commands::RolePermissions(args) => {
            let client = make_client(&cli.server, profile).await?;
            match &args.command {
                cli::RolePermissionsCommands::List(list) => {
                    commands::assignments::list_role_permissions(&client, list, format).await?;
                }
                cli::RolePermissionsCommands::Assign(pair) => {
                    commands::assignments::assign_role_permission(&client, pair.role, pair.permission)
                        .await?;
                }
                cli::RolePermissionsCommands::Remove(pair) => {
                    commands::assignments::remove_role_permission(&client, pair.role, pair.permission)
                        .await?;
                }
            }
        }
        Commands::Tokens(args) => {
            let client = make_client(&cli.server, profile).await?;
            match &args.command {
                cli::TokensCommands::List => {
                    commands::tokens::list(&client, format).await?;
                }
                cli::TokensCommands::Revoke(arg) => {
                    commands::tokens::revoke(&client, arg.id).await?;
                }
                cli::TokensCommands::RevokeAll => {
                    commands::tokens::revoke_all(&client).await?;
                }
            }
        }
        Commands::Config(args) => match &args.command {
            cli::ConfigCommands::Show => {
                let cfg = config::load_profile(profile)?;
                println!("{}: {}", "Profile".cyan(), profile);
                println!(
                    "{}: {}",
                    "Server".cyan(),
                    cfg.server.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "{}: {}",
                    "Format".cyan(),
                    cfg.format.as_deref().unwrap_or("json")
                );
            }
            cli::ConfigCommands::Set(set_args) => {
                let mut cfg = config::load_profile(profile)?;
                match set_args.key.as_str() {
                    "server" => cfg.server = Some(set_args.value.clone()),
                    "format" => cfg.format = Some(set_args.value.clone()),
                    other => {
                        anyhow::bail!("Unknown config key: {other}. Valid keys: server, format")
                    }
                }
                config::save_profile(profile, &cfg)?;
                output::print_success(&format!("Set {} = {}", set_args.key, set_args.value));
            }
        },
    }

    Ok(())
}

async fn make_client(cli_server: &Option<String>, profile: &str) -> Result<WardenClient> {
    let server = config::resolve_server(cli_server, profile)?;
    tracing::debug!(server = %server, profile, "connecting");
    let store = FileSessionStore::for_profile(profile)?;
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let client = WardenClient::builder(server)
        .with_store(Arc::new(store))
        .with_http_client(http)
        .build()
        .await?;
    Ok(client)
}

fn resolve_format(cli_format: Option<OutputFormat>, profile: &str) -> Result<OutputFormat> {
    // 1. --format flag
    if let Some(format) = cli_format {
        return Ok(format);
    }
    // 2. config.toml profile
    let cfg = config::load_profile(profile)?;
    match cfg.format.as_deref() {
        None => Ok(OutputFormat::default()),
        Some("json") => Ok(OutputFormat::Json),
        Some("table") => Ok(OutputFormat::Table),
        Some(other) => {
            anyhow::bail!("Unknown output format in config: {other}. Valid formats: json, table")
        }
    }
}
