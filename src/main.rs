use anyhow::{Context, Result};
use futures::TryStreamExt;
use serde::Serialize;
use std::time::Duration;

use ebay_rest::auth::oauth;
use ebay_rest::config::{self, AccountCommand, Command, Config, InventoryCommand, LogFormat};
use ebay_rest::http_client::REQUEST_TIMEOUT_SECS;
use ebay_rest::models::Decoded;
use ebay_rest::pagination::{paginate, PageRequest, PaginateOptions};
use ebay_rest::resources::{ListOptions, SearchOptions};
use ebay_rest::utils::mask_token;
use ebay_rest::EbayClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let (config, command) = Config::load()?;

    init_logging(&config);

    config.validate()?;

    tracing::debug!(
        environment = %config.environment,
        user_token = config.user_access_token.is_some(),
        "Configuration loaded"
    );

    // No network traffic until a command runs
    let client = EbayClient::new(config.client_settings())?;

    run_command(&config, &client, command).await
}

/// Initialize logging with the configured level and format
fn init_logging(config: &Config) {
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn run_command(config: &Config, client: &EbayClient, command: Command) -> Result<()> {
    match command {
        Command::Search {
            query,
            limit,
            offset,
            category_ids,
        } => {
            let options = SearchOptions {
                limit,
                offset,
                category_ids,
                ..Default::default()
            };
            print_decoded(client.browse().search_items(&query, &options).await?)
        }

        Command::GetItem { item_id } => print_decoded(client.browse().get_item(&item_id).await?),

        Command::ListOrders {
            limit,
            offset,
            filter,
            all,
            max_items,
        } => {
            if !all {
                let options = ListOptions::new(limit, offset);
                return print_decoded(
                    client
                        .orders()
                        .list_orders(&options, filter.as_deref())
                        .await?,
                );
            }

            let orders = client.orders();
            let filter = filter.as_deref();
            let mut options = PaginateOptions::new("orders").page_size(limit);
            if let Some(max_items) = max_items {
                options = options.max_items(max_items);
            }

            let fetch = |page: PageRequest| async move {
                orders
                    .list_orders(&ListOptions::new(page.limit, page.offset), filter)
                    .await
                    .map(Decoded::into_value)
            };
            let items: Vec<serde_json::Value> = paginate(fetch, options).try_collect().await?;

            tracing::info!(count = items.len(), "Fetched orders");
            print_json(&items)
        }

        Command::Inventory { action } => match action {
            InventoryCommand::List { limit, offset } => print_decoded(
                client
                    .inventory()
                    .list_inventory_items(&ListOptions::new(limit, offset))
                    .await?,
            ),
            InventoryCommand::Get { sku } => {
                print_decoded(client.inventory().get_inventory_item(&sku).await?)
            }
            InventoryCommand::Delete { sku } => {
                client.inventory().delete_inventory_item(&sku).await?;
                println!("Deleted inventory item {}", sku.trim());
                Ok(())
            }
        },

        Command::Account { action } => match action {
            AccountCommand::Profile => print_decoded(client.account().get_account_profile().await?),
            AccountCommand::ReturnPolicies { marketplace_id } => print_decoded(
                client
                    .account()
                    .list_return_policies(&marketplace_id)
                    .await?,
            ),
            AccountCommand::PaymentPolicies { marketplace_id } => print_decoded(
                client
                    .account()
                    .list_payment_policies(&marketplace_id)
                    .await?,
            ),
            AccountCommand::ShippingPolicies { marketplace_id } => print_decoded(
                client
                    .account()
                    .list_shipping_policies(&marketplace_id)
                    .await?,
            ),
        },

        Command::AuthorizeUrl { state } => authorize_url(config, state.as_deref()),
        Command::ExchangeCode { code } => exchange_code(config, &code).await,
        Command::UserToken => user_token(config).await,
    }
}

fn authorize_url(config: &Config, state: Option<&str>) -> Result<()> {
    let scopes = config.consent_scopes();
    let url = oauth::build_authorization_url(
        &config.environment.endpoints(),
        &config.client_id,
        config.require_redirect_uri()?,
        scopes.as_slice(),
        state,
    )?;
    println!("{}", url);
    Ok(())
}

async fn exchange_code(config: &Config, code: &str) -> Result<()> {
    let code = oauth::extract_authorization_code(code)
        .context("Authorization code cannot be empty")?;
    let tokens = request_user_tokens(config, &code).await?;
    print_tokens(&tokens);
    Ok(())
}

/// Interactive consent flow: print the URL, read the code back, exchange it
async fn user_token(config: &Config) -> Result<()> {
    let state = uuid::Uuid::new_v4().to_string();
    let scopes = config.consent_scopes();
    if config.scopes.is_empty() {
        println!("Using default Sell API scopes. Set EBAY_OAUTH_SCOPES to customize.");
    }

    let url = oauth::build_authorization_url(
        &config.environment.endpoints(),
        &config.client_id,
        config.require_redirect_uri()?,
        scopes.as_slice(),
        Some(&state),
    )?;

    println!();
    println!("STEP 1: Open this URL in your browser and grant access:");
    println!();
    println!("  {}", url);
    println!();
    println!("STEP 2: After consent eBay redirects to a URL containing ?code=...");
    println!("        Paste the whole URL or just the code below.");
    println!();

    let code = config::prompt_authorization_code()?;
    let tokens = request_user_tokens(config, &code).await?;
    print_tokens(&tokens);

    if config::offer_to_save_tokens(&tokens)? {
        println!("Tokens saved to .env file");
    }

    Ok(())
}

async fn request_user_tokens(config: &Config, code: &str) -> Result<config::UserTokens> {
    let redirect_uri = config.require_redirect_uri()?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("Failed to create HTTP client")?;

    tracing::info!(code = %mask_token(code), "Exchanging authorization code");

    let response = oauth::exchange_code(
        &client,
        &config.environment.endpoints(),
        &config.client_id,
        &config.client_secret,
        code,
        redirect_uri,
    )
    .await
    .context("Failed to exchange authorization code; check that EBAY_REDIRECT_URI matches the RuName")?;

    let access_token = response
        .access_token()
        .context("Token response does not contain access_token")?
        .to_string();

    Ok(config::UserTokens {
        access_token,
        refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
        expires_in: response.expires_in,
    })
}

fn print_tokens(tokens: &config::UserTokens) {
    println!();
    println!("Add these to your .env file:");
    println!();
    println!("EBAY_USER_ACCESS_TOKEN={}", tokens.access_token);
    match &tokens.refresh_token {
        Some(refresh_token) => println!("EBAY_USER_REFRESH_TOKEN={}", refresh_token),
        None => println!("# No refresh token returned; rerun the consent flow when the token expires"),
    }
    println!();
    if let Some(expires_in) = tokens.expires_in {
        println!(
            "Access token expires in {:.1} hours",
            expires_in as f64 / 3600.0
        );
    }
}

fn print_decoded<T>(decoded: Decoded<T>) -> Result<()> {
    if !decoded.is_decoded() {
        tracing::warn!("Response did not match the expected record, printing raw JSON");
    }
    print_json(&decoded.into_value())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to format response")?
    );
    Ok(())
}
