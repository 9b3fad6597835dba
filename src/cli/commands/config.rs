use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{get_config_dir, load_cli_config, save_cli_config, CliConfig};
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show saved settings")]
    Show,

    #[command(about = "Save the default API server URL")]
    SetServer {
        #[arg(help = "Server URL")]
        url: String,
    },

    #[command(about = "Save the bearer token")]
    SetToken {
        #[arg(help = "JWT")]
        token: String,
    },

    #[command(about = "Forget all saved settings")]
    Clear,
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let saved = load_cli_config()?;
            let dir = get_config_dir()?;
            let text = format!(
                "Config dir: {}\nServer: {}\nToken: {}\n",
                dir.display(),
                saved.server.as_deref().unwrap_or("(default)"),
                if saved.token.is_some() { "set" } else { "not set" },
            );
            output_data(
                &output_format,
                &json!({
                    "config_dir": dir,
                    "server": saved.server,
                    "token_set": saved.token.is_some(),
                    "updated_at": saved.updated_at,
                }),
                &text,
            )
        }
        ConfigCommands::SetServer { url } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("invalid server URL '{}': {}", url, e))?;
            let mut saved = load_cli_config()?;
            saved.server = Some(url.clone());
            saved.touch();
            save_cli_config(&saved)?;
            output_success(&output_format, &format!("Server set to {}", url), Some(json!({ "server": url })))
        }
        ConfigCommands::SetToken { token } => {
            let mut saved = load_cli_config()?;
            saved.token = Some(token);
            saved.touch();
            save_cli_config(&saved)?;
            output_success(&output_format, "Token saved", None)
        }
        ConfigCommands::Clear => {
            save_cli_config(&CliConfig::default())?;
            output_success(&output_format, "Settings cleared", None)
        }
    }
}
