use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::client::ClientError;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a value as the JSON `data` payload, or as pre-rendered text
pub fn output_data<T: Serialize>(output_format: &OutputFormat, data: &T, text: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": true,
                    "data": data
                }))?
            );
        }
        OutputFormat::Text => {
            print!("{}", text);
        }
    }
    Ok(())
}

/// Machine-readable code for a failed command, matching the API's error codes
pub fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    let client_err = err.downcast_ref::<ClientError>()?;
    Some(match client_err {
        ClientError::NotFound(_) => "NOT_FOUND",
        ClientError::Unauthorized(_) => "UNAUTHORIZED",
        ClientError::Validation { .. } => "VALIDATION_ERROR",
        ClientError::Server { .. } => "SERVER_ERROR",
        ClientError::Transport(_) => "TRANSPORT_ERROR",
        ClientError::InvalidUrl(_) => "INVALID_URL",
        ClientError::Decode(_) => "DECODE_ERROR",
    })
}

/// Report a failed command: a JSON envelope on stdout, or a line on stderr
pub fn output_error(output_format: &OutputFormat, message: &str, code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });
            if let Some(code) = code {
                response["code"] = json!(code);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_keep_their_code_through_anyhow() {
        let err = anyhow::Error::from(ClientError::NotFound("Project 'x' not found".into()));
        assert_eq!(error_code(&err), Some("NOT_FOUND"));

        let err = anyhow::Error::from(ClientError::Unauthorized("owner only".into()));
        assert_eq!(error_code(&err), Some("UNAUTHORIZED"));

        assert_eq!(error_code(&anyhow::anyhow!("nothing to change")), None);
    }
}
