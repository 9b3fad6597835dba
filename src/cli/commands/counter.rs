use clap::Subcommand;
use serde_json::json;

use crate::cli::config::state_store;
use crate::cli::utils::{output_data, output_success};
use crate::cli::OutputFormat;
use crate::client::PersistentCounter;

const COUNTER_KEY: &str = "counter";

#[derive(Subcommand)]
pub enum CounterCommands {
    #[command(about = "Show the current value")]
    Show,

    #[command(about = "Add one and save")]
    Bump,

    #[command(about = "Reset to zero")]
    Clear,
}

pub async fn handle(cmd: CounterCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let counter = PersistentCounter::new(state_store()?, COUNTER_KEY, 0);

    match cmd {
        CounterCommands::Show => {
            let value = counter.get();
            output_data(&output_format, &json!({ "value": value }), &format!("{}\n", value))
        }
        CounterCommands::Bump => {
            let value = counter.increment()?;
            output_success(&output_format, &format!("Counter is now {}", value), Some(json!({ "value": value })))
        }
        CounterCommands::Clear => {
            let value = counter.reset()?;
            output_success(&output_format, "Counter cleared", Some(json!({ "value": value })))
        }
    }
}
