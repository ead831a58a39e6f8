// Command line front end.
// Configures the account, verifies tokens, and prints shots or widget markup.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dribbble_feed::cache::paths;
use dribbble_feed::config::DEFAULT_SHOTS_COUNT;
use dribbble_feed::widget::{self, WidgetForm};
use dribbble_feed::{ClientConfig, DribbbleClient, FileCache, Settings, WidgetOptions};

#[derive(Debug, Parser)]
#[command(name = "dribbble-feed", version, about)]
struct Cli {
    /// Directory for cached API responses.
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,
    /// Settings file holding the account name and access token.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true, env = "DRIBBBLE_API_BASE")]
    base_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, global = true)]
    timeout: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Credentials {
    #[arg(long, env = "DRIBBBLE_ACCOUNT")]
    account: Option<String>,
    #[arg(long, env = "DRIBBBLE_ACCESS_TOKEN")]
    token: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save the account name and access token (the token is verified first).
    Configure {
        #[arg(long)]
        account: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    /// Check an access token against the API.
    Verify {
        #[arg(long, env = "DRIBBBLE_ACCESS_TOKEN")]
        token: Option<String>,
    },
    /// Print a user's recent shots as JSON.
    Shots {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long, default_value_t = DEFAULT_SHOTS_COUNT)]
        count: u32,
    },
    /// Print the shots widget markup.
    Widget {
        #[command(flatten)]
        credentials: Credentials,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        count: Option<String>,
    },
}

impl Cli {
    fn settings_path(&self) -> Result<PathBuf> {
        self.config
            .clone()
            .or_else(paths::settings_path)
            .context("no configuration directory available, pass --config")
    }

    fn client(&self) -> Result<DribbbleClient<FileCache>> {
        let mut config = ClientConfig::default();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        let store = match &self.cache_dir {
            Some(dir) => FileCache::new(dir),
            None => FileCache::in_default_dir()?,
        };
        debug!("Caching responses in {}", store.dir().display());

        Ok(DribbbleClient::new(config, store)?)
    }
}

impl Credentials {
    /// Account and token from flags or environment, then saved settings.
    /// Either may be empty.
    fn or_saved(self, settings: &Settings) -> (String, String) {
        let account = self
            .account
            .unwrap_or_else(|| settings.account_name.clone());
        let token = self
            .token
            .unwrap_or_else(|| settings.access_token.clone());
        (account, token)
    }
}

/// Like [`Credentials::or_saved`], but both values must be present.
fn resolve(credentials: Credentials, settings: &Settings) -> Result<(String, String)> {
    let (account, token) = credentials.or_saved(settings);
    if account.is_empty() || token.is_empty() {
        bail!("account name and access token are required, run `dribbble-feed configure` first");
    }
    Ok((account, token))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings_path = cli.settings_path()?;
    let client = cli.client()?;
    let mut settings = Settings::load_or_default(&settings_path);

    match cli.command {
        Command::Configure { account, token } => {
            if let Some(account) = account {
                settings.set_account_name(&account);
            }
            if let Some(token) = token {
                settings.update_access_token(&client, &token).await?;
            }
            settings
                .save(&settings_path)
                .with_context(|| format!("failed to write {}", settings_path.display()))?;
            println!("Saved settings to {}", settings_path.display());
        }
        Command::Verify { token } => {
            let token = token.unwrap_or(settings.access_token);
            if !client.verify_access_token(&token).await {
                eprintln!("The access token doesn't look quite right.");
                return Ok(ExitCode::FAILURE);
            }
            println!("Access token is valid.");
        }
        Command::Shots { credentials, count } => {
            let (account, token) = resolve(credentials, &settings)?;
            let shots = client.retrieve_shots(&account, &token, count).await?;
            println!("{}", serde_json::to_string_pretty(&shots)?);
        }
        Command::Widget {
            credentials,
            title,
            desc,
            count,
        } => {
            let (account, token) = credentials.or_saved(&settings);
            let mut options = WidgetOptions::default();
            options.update(&WidgetForm {
                title,
                desc,
                shots: count,
            });

            let html = widget::render_feed(&client, &account, &token, &options).await;
            println!("{html}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}
