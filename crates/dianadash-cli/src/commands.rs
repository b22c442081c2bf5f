//! CLI commands

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use dianadash_core::api::Method;
use dianadash_core::config::Config;
use dianadash_core::ui::{format_date, format_date_time, format_number, render_table, Column};
use dianadash_core::{Dashboard, GuardOutcome, Page, RequestOptions};
use serde_json::Value;
use tracing::info;

/// Environment variable read instead of prompting for the password
const ENV_PASSWORD: &str = "DIANADASH_PASSWORD";

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the access token
    Login {
        /// Username (defaults to the last one used)
        #[arg(short, long)]
        username: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Run the page-load check for a dashboard path
    Status {
        #[arg(long, default_value = "/dashboard")]
        path: String,
    },

    /// Show the signed-in admin account
    Whoami,

    /// Exchange the current token for a fresh one
    Refresh {
        /// Only refresh when the token is about to expire
        #[arg(long)]
        if_needed: bool,
    },

    /// Send an authenticated request and print the JSON response
    Request {
        /// Endpoint below the API base, e.g. /dashboard/stats
        endpoint: String,

        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Raw request body
        #[arg(short, long)]
        data: Option<String>,

        /// Extra header as `Name: value`
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },

    /// Fetch a JSON array and render it as an HTML table
    Table {
        endpoint: String,

        /// Column as `Header=key`, optionally `Header=key:number|date|datetime`
        #[arg(short, long = "column", required = true)]
        columns: Vec<String>,
    },
}

impl Commands {
    pub async fn execute(self, dashboard: &Dashboard, config: &mut Config) -> Result<()> {
        match self {
            Commands::Login { username } => login(dashboard, config, username).await,
            Commands::Logout => {
                dashboard.logout()?;
                println!("Logged out.");
                Ok(())
            }
            Commands::Status { path } => status(dashboard, &path),
            Commands::Whoami => match dashboard.current_user().await? {
                Some(user) => {
                    println!("{} <{}> ({})", user.username, user.email, user.role);
                    if let Some(last_login) = user.last_login {
                        println!("Last login: {}", format_date_time(&last_login.to_string()));
                    }
                    Ok(())
                }
                None => bail!("Session is no longer valid"),
            },
            Commands::Refresh { if_needed } => {
                let refreshed = if if_needed {
                    dashboard.refresh_if_needed().await?
                } else {
                    dashboard.refresh_token().await?
                };
                println!("{}", if refreshed { "Token refreshed." } else { "Token unchanged." });
                Ok(())
            }
            Commands::Request {
                endpoint,
                method,
                data,
                headers,
            } => {
                let options = build_options(&method, data, &headers)?;
                let value = fetch(dashboard, &endpoint, options).await?;
                println!("{}", serde_json::to_string_pretty(&value)?);
                Ok(())
            }
            Commands::Table { endpoint, columns } => {
                let value = fetch(dashboard, &endpoint, RequestOptions::get()).await?;
                let rows = match value {
                    Value::Array(rows) => rows,
                    other => bail!("Expected a JSON array from {}, got {}", endpoint, kind_of(&other)),
                };
                let columns = columns
                    .iter()
                    .map(|spec| parse_column(spec))
                    .collect::<Result<Vec<_>>>()?;
                println!("{}", render_table(&rows, &columns));
                Ok(())
            }
        }
    }
}

async fn login(dashboard: &Dashboard, config: &mut Config, username: Option<String>) -> Result<()> {
    let username = match username.or_else(|| config.last_username.clone()) {
        Some(name) => name,
        None => prompt_username()?,
    };
    let password = match std::env::var(ENV_PASSWORD) {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Password: ")?,
    };

    println!("Authenticating...");
    if !dashboard.login(&username, &password).await {
        bail!("Login failed for {}", username);
    }

    config.last_username = Some(username);
    config.save().context("Failed to save config")?;
    println!("Login successful!");
    Ok(())
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

fn status(dashboard: &Dashboard, path: &str) -> Result<()> {
    let mut page = Page::dashboard(path);
    match dashboard.check_page(&mut page) {
        GuardOutcome::Skipped => println!("{} does not require a session.", path),
        GuardOutcome::RedirectedToLogin => bail!("Not authenticated"),
        GuardOutcome::Authenticated { username } => {
            println!("Signed in as {}", username.as_deref().unwrap_or("(unknown)"));
            if let Some(minutes) = dashboard.session().minutes_until_expiry()? {
                println!("Token expires in {} min", format_number(minutes as f64));
            }
        }
    }
    Ok(())
}

/// Coordinator request that treats a forced logout as a failure
async fn fetch(dashboard: &Dashboard, endpoint: &str, options: RequestOptions) -> Result<Value> {
    info!(endpoint, "Fetching");
    dashboard
        .request(endpoint, options)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Session is no longer valid"))
}

fn build_options(method: &str, data: Option<String>, headers: &[String]) -> Result<RequestOptions> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("Invalid HTTP method '{}'", method))?;

    let mut options = RequestOptions::with_method(method);
    for header in headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("Header '{}' is not `Name: value`", header))?;
        options = options.try_header(name.trim(), value.trim())?;
    }
    if let Some(body) = data {
        options = options.body(body);
    }
    Ok(options)
}

fn parse_column(spec: &str) -> Result<Column<'static>> {
    let (header, key) = spec
        .split_once('=')
        .with_context(|| format!("Column '{}' is not `Header=key`", spec))?;
    let (key, format) = match key.split_once(':') {
        Some((key, format)) => (key, Some(format)),
        None => (key, None),
    };

    Ok(match format {
        None => Column::key(header, key),
        Some("number") => Column::formatted(header, key, |v| {
            v.as_f64().map(format_number).unwrap_or_default()
        }),
        Some("date") => Column::formatted(header, key, |v| {
            v.as_str().map(format_date).unwrap_or_default()
        }),
        Some("datetime") => Column::formatted(header, key, |v| {
            v.as_str().map(format_date_time).unwrap_or_default()
        }),
        Some(other) => bail!("Unknown column format '{}'", other),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_formatted_columns_escape_server_text() {
        let rows = vec![json!({"joined": "<img src=x onerror=alert(1)>"})];
        let columns = vec![
            parse_column("Alta=joined:date").unwrap(),
            parse_column("Visto=joined:datetime").unwrap(),
        ];
        let html = render_table(&rows, &columns);
        assert_eq!(html.matches(">&lt;img src=x onerror=alert(1)&gt;</td>").count(), 2);
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_build_options() {
        let options = build_options(
            "post",
            Some(r#"{"a":1}"#.to_string()),
            &["X-Trace: abc".to_string()],
        )
        .unwrap();
        assert_eq!(options.method, Method::POST);
        assert_eq!(options.headers["x-trace"], "abc");
        assert_eq!(options.body.as_deref(), Some(r#"{"a":1}"#));

        assert!(build_options("GET", None, &["no-colon".to_string()]).is_err());
    }

    #[test]
    fn test_parse_column_formats() {
        let rows = vec![json!({"name": "diana", "points": 123456, "joined": "2024-03-07"})];
        let columns = vec![
            parse_column("Nombre=name").unwrap(),
            parse_column("Puntos=points:number").unwrap(),
            parse_column("Alta=joined:date").unwrap(),
        ];
        let html = render_table(&rows, &columns);
        assert!(html.contains(">diana</td>"));
        assert!(html.contains(">123.456</td>"));
        assert!(html.contains(">7/3/2024</td>"));

        assert!(parse_column("bad").is_err());
        assert!(parse_column("A=b:currency").is_err());
    }
}
