//! Interactive OAuth authorization.
//!
//! Prints the Google consent URL, reads the authorization code the user
//! pastes back, exchanges it for tokens and stores them.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use gdrive_api::auth::OAuthClient;
use owo_colors::OwoColorize;
use uuid::Uuid;

use super::config::load_config;
use super::credentials;
use super::{CommandContext, CommandError, Result};

/// Executes the auth command.
pub async fn execute(ctx: &CommandContext) -> Result<()> {
    if !io::stdin().is_terminal() {
        return Err(CommandError::Config(
            "'gbak auth' must be run in an interactive terminal".to_string(),
        ));
    }

    let config = load_config()?;
    let oauth = OAuthClient::new(config.oauth_config()?);
    let state = Uuid::new_v4().simple().to_string();
    let url = oauth.config().authorize_url(&state);

    // The prompt goes to stderr so --json output stays machine-readable.
    eprintln!("Open this URL in your browser and grant access:");
    eprintln!();
    if ctx.use_colors {
        eprintln!("  {}", url.cyan());
    } else {
        eprintln!("  {}", url);
    }
    eprintln!();

    let code: String = Input::new()
        .with_prompt("Enter verification code")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("Code cannot be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| CommandError::Io(io::Error::other(e.to_string())))?;

    let creds = oauth.exchange_code(&code).await?;
    credentials::save(&config, &creds)?;
    tracing::debug!(keyring = config.uses_keyring(), "stored credentials");

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "authorized",
            "expires_at": creds.expires_at.to_rfc3339(),
            "storage": if config.uses_keyring() { "keyring" } else { "file" },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if ctx.use_colors {
            println!("{}", "Authorization complete!".green().bold());
        } else {
            println!("Authorization complete!");
        }
        if creds.refresh_token.is_none() {
            eprintln!("Warning: no refresh token was issued; you will need to re-run 'gbak auth' when the token expires.");
        }
    }

    Ok(())
}
