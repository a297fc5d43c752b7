use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::Path;

use crate::auth::{Environment, DEFAULT_USER_SCOPES};
use crate::client::ClientSettings;

/// eBay REST API command line client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// eBay App ID
    #[arg(long, env = "EBAY_CLIENT_ID", global = true)]
    pub client_id: Option<String>,

    /// eBay Cert ID
    #[arg(long, env = "EBAY_CLIENT_SECRET", hide_env_values = true, global = true)]
    pub client_secret: Option<String>,

    /// Target environment (sandbox, production)
    #[arg(short = 'e', long, env = "EBAY_ENVIRONMENT", default_value = "sandbox", global = true)]
    pub environment: String,

    /// Seller access token for the Sell APIs
    #[arg(long, env = "EBAY_USER_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub user_access_token: Option<String>,

    /// Seller refresh token, used to renew the access token on 401
    #[arg(long, env = "EBAY_USER_REFRESH_TOKEN", hide_env_values = true, global = true)]
    pub user_refresh_token: Option<String>,

    /// Space separated OAuth scopes for the consent flow and token renewal
    #[arg(long, env = "EBAY_OAUTH_SCOPES", global = true)]
    pub scopes: Option<String>,

    /// RuName registered for the application
    #[arg(long, env = "EBAY_REDIRECT_URI", global = true)]
    pub redirect_uri: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Search items with the Browse API
    Search {
        query: String,
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Comma separated category ids
        #[arg(long, value_delimiter = ',')]
        category_ids: Vec<String>,
    },

    /// Show one item
    GetItem { item_id: String },

    /// List seller orders
    ListOrders {
        #[arg(short, long, default_value_t = 50)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// eBay filter expression, e.g. orderfulfillmentstatus:{NOT_STARTED}
        #[arg(long)]
        filter: Option<String>,
        /// Follow pagination and print every order
        #[arg(long)]
        all: bool,
        /// Stop after this many orders (with --all)
        #[arg(long)]
        max_items: Option<usize>,
    },

    /// Seller inventory items
    Inventory {
        #[command(subcommand)]
        action: InventoryCommand,
    },

    /// Seller account profile and business policies
    Account {
        #[command(subcommand)]
        action: AccountCommand,
    },

    /// Print the consent URL for the authorization code flow
    AuthorizeUrl {
        #[arg(long)]
        state: Option<String>,
    },

    /// Exchange an authorization code for user tokens
    ExchangeCode { code: String },

    /// Walk through the consent flow and obtain user tokens
    UserToken,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum InventoryCommand {
    List {
        #[arg(short, long, default_value_t = 25)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u64,
    },
    Get {
        sku: String,
    },
    Delete {
        sku: String,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum AccountCommand {
    Profile,
    ReturnPolicies {
        #[arg(long, default_value = "EBAY_US")]
        marketplace_id: String,
    },
    PaymentPolicies {
        #[arg(long, default_value = "EBAY_US")]
        marketplace_id: String,
    },
    ShippingPolicies {
        #[arg(long, default_value = "EBAY_US")]
        marketplace_id: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Application credentials
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,

    // Seller credentials
    pub user_access_token: Option<String>,
    pub user_refresh_token: Option<String>,
    pub scopes: Vec<String>,
    pub redirect_uri: Option<String>,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration with priority: CLI > ENV (.env included) > defaults
    pub fn load() -> Result<(Self, Command)> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let args = CliArgs::parse();
        let config = Self::from_args(&args)?;

        Ok((config, args.command))
    }

    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let environment: Environment = args
            .environment
            .parse()
            .context("Invalid EBAY_ENVIRONMENT")?;

        Ok(Config {
            client_id: args.client_id.clone().unwrap_or_default(),
            client_secret: args.client_secret.clone().unwrap_or_default(),
            environment,
            user_access_token: non_empty(args.user_access_token.as_deref()),
            user_refresh_token: non_empty(args.user_refresh_token.as_deref()),
            scopes: parse_scopes(args.scopes.as_deref().unwrap_or_default()),
            redirect_uri: non_empty(args.redirect_uri.as_deref()),
            log_level: args.log_level.clone(),
            log_format: parse_log_format(&args.log_format),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            anyhow::bail!("EBAY_CLIENT_ID is required (use --client-id or set EBAY_CLIENT_ID)");
        }
        if self.client_secret.trim().is_empty() {
            anyhow::bail!(
                "EBAY_CLIENT_SECRET is required (use --client-secret or set EBAY_CLIENT_SECRET)"
            );
        }
        Ok(())
    }

    /// RuName, required by the consent flow
    pub fn require_redirect_uri(&self) -> Result<&str> {
        self.redirect_uri.as_deref().context(
            "EBAY_REDIRECT_URI is required; use the RuName from https://developer.ebay.com/my/keys",
        )
    }

    /// Configured scopes, or the read-only Sell scopes
    pub fn consent_scopes(&self) -> Vec<String> {
        if self.scopes.is_empty() {
            DEFAULT_USER_SCOPES.iter().map(|s| s.to_string()).collect()
        } else {
            self.scopes.clone()
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            environment: self.environment,
            user_access_token: self.user_access_token.clone(),
            user_refresh_token: self.user_refresh_token.clone(),
            user_token_scopes: self.scopes.clone(),
            endpoints: None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Split a whitespace separated scope list
fn parse_scopes(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

/// Parse log format from string
fn parse_log_format(s: &str) -> LogFormat {
    match s.to_lowercase().as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

// === Interactive User Token Setup ===

/// Tokens obtained through the consent flow
#[derive(Debug, Clone)]
pub struct UserTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// Prompt for the redirect URL (or bare code) eBay showed after consent
pub fn prompt_authorization_code() -> Result<String> {
    let input: String = dialoguer::Input::new()
        .with_prompt("Paste the redirect URL (or just the code)")
        .interact_text()
        .context("Failed to read authorization code")?;

    crate::auth::oauth::extract_authorization_code(&input)
        .context("Could not find an authorization code in the input")
}

/// Ask whether to write the tokens to `.env`, and do so
pub fn offer_to_save_tokens(tokens: &UserTokens) -> Result<bool> {
    let save = dialoguer::Confirm::new()
        .with_prompt("Save tokens to .env file?")
        .default(false)
        .interact()
        .context("Failed to read save confirmation")?;

    if save {
        save_user_tokens(Path::new(".env"), tokens)?;
    }

    Ok(save)
}

/// Write the user tokens into an env file, keeping every other line
pub fn save_user_tokens(path: &Path, tokens: &UserTokens) -> Result<()> {
    let existing = if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        String::new()
    };

    let mut updates = vec![("EBAY_USER_ACCESS_TOKEN", tokens.access_token.as_str())];
    if let Some(refresh_token) = tokens.refresh_token.as_deref() {
        updates.push(("EBAY_USER_REFRESH_TOKEN", refresh_token));
    }

    std::fs::write(path, upsert_env_lines(&existing, &updates))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}

/// Replace `KEY=...` lines for the given keys, appending the ones not present
fn upsert_env_lines(existing: &str, updates: &[(&str, &str)]) -> String {
    let mut written = vec![false; updates.len()];
    let mut lines: Vec<String> = existing
        .lines()
        .map(|line| {
            let key = line.split('=').next().unwrap_or_default().trim();
            match updates.iter().position(|(name, _)| *name == key) {
                Some(i) if !line.trim_start().starts_with('#') => {
                    written[i] = true;
                    format!("{}={}", updates[i].0, updates[i].1)
                }
                _ => line.to_string(),
            }
        })
        .collect();

    for (i, (name, value)) in updates.iter().enumerate() {
        if !written[i] {
            lines.push(format!("{}={}", name, value));
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}
