use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::issue_token;
use crate::cli::config::{load_cli_config, save_cli_config};
use crate::cli::utils::{output_data, output_success};
use crate::cli::{Connection, OutputFormat};
use crate::client::ProjectApi;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a token with the locally configured JWT secret")]
    Issue {
        #[arg(long, help = "User id the token identifies")]
        user: Uuid,
        #[arg(long, default_value = "cli", help = "Display name carried in the token")]
        name: String,
        #[arg(long, help = "Remember the token for later commands")]
        save: bool,
    },
}

pub async fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { user, name, save } => {
            let security = &crate::config::config().security;
            let token = issue_token(security, user, &name)?;

            if save {
                let mut saved = load_cli_config()?;
                saved.token = Some(token.clone());
                saved.touch();
                save_cli_config(&saved)?;
            }

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    "Token issued",
                    Some(json!({
                        "token": token,
                        "user": user,
                        "expires_in_hours": security.jwt_expiry_hours
                    })),
                ),
                OutputFormat::Text => {
                    println!("{}", token);
                    Ok(())
                }
            }
        }
    }
}

pub async fn whoami(connection: &Connection, output_format: OutputFormat) -> anyhow::Result<()> {
    let user = connection.client()?.whoami().await?;
    let text = format!("{} ({})\n", user.name, user.id);
    output_data(&output_format, &user, &text)
}
