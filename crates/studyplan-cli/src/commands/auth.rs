use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;
use studyplan_core::Session;

use super::{print_json, CmdResult, Context};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with a username or email
    Login {
        /// Username or email
        identifier: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "STUDYPLAN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Status,
}

pub async fn run(action: AuthAction) -> CmdResult {
    let ctx = Context::open()?;
    match action {
        AuthAction::Login {
            identifier,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            let response = ctx.client()?.login(&identifier, &password).await?;
            let session = Session::new(response.user, response.token);
            session.save(&ctx.store)?;
            println!("Logged in as {}", session.user.display_name());
        }
        AuthAction::Logout => {
            Session::clear(&ctx.store)?;
            println!("logged out");
        }
        AuthAction::Status => {
            let session = Session::load(&ctx.store)?;
            print_json(&json!({
                "user": session.user,
                "api": ctx.config.api.base_url,
            }))?;
        }
    }
    Ok(())
}

fn prompt_password() -> Result<String, Box<dyn std::error::Error>> {
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err("password required".into());
    }
    Ok(password)
}
