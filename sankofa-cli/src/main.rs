//! Sankofa CLI
//!
//! Command-line interface for checking, inspecting, and tracking names under
//! `sankofachain.eth`.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sankofa_core::traits::RegistryReader;
use sankofa_core::types::{
    AvailabilityStatus, Currency, Location, Preferences, ProfileUpdate, SocialLinks, UserProfile,
};
use sankofa_core::validation::validate_label;
use sankofa_ens::names::{
    explorer_address_url, full_name, is_address, namehash, truncate_address, truncate_text,
};
use sankofa_ens::{AvailabilityChecker, NameResolver, RpcRegistrar};
use sankofa_profile::{FileStorage, ProfileStore};

use crate::config::CliConfig;

/// Sankofa - names under sankofachain.eth
#[derive(Parser)]
#[command(name = "sankofa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a label against the naming rules
    Validate {
        /// Label to check
        label: String,
    },

    /// Ask the registrar whether a label is free
    Available {
        /// Label to check
        label: String,
        /// JSON-RPC endpoint
        #[arg(long, env = "SANKOFA_RPC_URL")]
        rpc_url: Option<String>,
    },

    /// Show the registry owner and resolver of a name
    Owner {
        /// Full name, e.g. alice.sankofachain.eth
        name: String,
        /// JSON-RPC endpoint
        #[arg(long, env = "SANKOFA_RPC_URL")]
        rpc_url: Option<String>,
    },

    /// Resolve a name or an address
    Resolve {
        /// Name or 0x address
        value: String,
    },

    /// Manage the local profile
    Profile {
        /// Profile file
        #[arg(long, env = "SANKOFA_PROFILE_PATH")]
        store: Option<PathBuf>,

        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Print the current profile
    Show,
    /// Switch to the profile of an address
    Load {
        /// Wallet address
        address: String,
    },
    /// Replace the profile
    Create {
        /// Wallet address
        #[arg(long, env = "SANKOFA_WALLET_ADDRESS")]
        wallet: Option<String>,
        #[command(flatten)]
        fields: ProfileFields,
    },
    /// Change some profile fields
    Edit {
        #[command(flatten)]
        fields: ProfileFields,
    },
    /// Attach <label>.sankofachain.eth to the profile
    RegisterName {
        /// Label to attach
        label: String,
    },
    /// Delete the stored profile
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
enum CurrencyArg {
    Eth,
    Sankofa,
}

impl From<CurrencyArg> for Currency {
    fn from(arg: CurrencyArg) -> Self {
        match arg {
            CurrencyArg::Eth => Currency::Eth,
            CurrencyArg::Sankofa => Currency::Sankofa,
        }
    }
}

#[derive(Args)]
struct ProfileFields {
    /// Full name (e.g. alice.sankofachain.eth)
    #[arg(long)]
    ens_name: Option<String>,
    /// Display name
    #[arg(long)]
    name: Option<String>,
    /// Short biography
    #[arg(long)]
    bio: Option<String>,
    /// Avatar URL
    #[arg(long)]
    avatar: Option<String>,
    /// Country
    #[arg(long)]
    country: Option<String>,
    /// Region within the country
    #[arg(long, requires = "country")]
    region: Option<String>,
    /// Website
    #[arg(long)]
    website: Option<String>,
    /// Twitter handle
    #[arg(long)]
    twitter: Option<String>,
    /// Instagram handle
    #[arg(long)]
    instagram: Option<String>,
    /// LinkedIn profile
    #[arg(long)]
    linkedin: Option<String>,
    /// Display currency
    #[arg(long, value_enum)]
    currency: Option<CurrencyArg>,
    /// UI language
    #[arg(long)]
    language: Option<String>,
}

impl ProfileFields {
    fn into_update(self, wallet_address: Option<String>) -> ProfileUpdate {
        let location = self.country.map(|country| Location {
            country,
            region: self.region,
        });

        let social_links = if self.website.is_some()
            || self.twitter.is_some()
            || self.instagram.is_some()
            || self.linkedin.is_some()
        {
            Some(SocialLinks {
                website: self.website,
                twitter: self.twitter,
                instagram: self.instagram,
                linkedin: self.linkedin,
            })
        } else {
            None
        };

        let preferences = if self.currency.is_some() || self.language.is_some() {
            let defaults = Preferences::default();
            Some(Preferences {
                currency: self.currency.map(Currency::from).unwrap_or(defaults.currency),
                language: self.language.unwrap_or(defaults.language),
            })
        } else {
            None
        };

        ProfileUpdate {
            wallet_address,
            ens_name: self.ens_name,
            name: self.name,
            bio: self.bio,
            avatar: self.avatar,
            location,
            social_links,
            preferences,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "sankofa=debug,info"
    } else {
        "sankofa=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CliConfig::from_env();

    match cli.command {
        Commands::Validate { label } => cmd_validate(&label),
        Commands::Available { label, rpc_url } => cmd_available(&config, &label, rpc_url).await,
        Commands::Owner { name, rpc_url } => cmd_owner(&config, &name, rpc_url).await,
        Commands::Resolve { value } => cmd_resolve(&value).await,
        Commands::Profile { store, command } => {
            let path = store.unwrap_or_else(|| config.profile_path.clone());
            cmd_profile(&config, path, command).await
        }
    }
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

/// Builds the RPC client and checks it points at the configured chain.
async fn connect(config: &CliConfig, rpc_url: Option<String>) -> Result<RpcRegistrar> {
    let registrar = RpcRegistrar::with_config(config.rpc_config(rpc_url))
        .context("Invalid RPC configuration")?;

    let pb = spinner("Connecting...")?;
    let chain_id = registrar.verify_chain().await;
    pb.finish_and_clear();

    let chain_id = chain_id.context("RPC endpoint check failed")?;
    info!(rpc_url = %registrar.config().rpc_url, chain_id, "Connected");
    Ok(registrar)
}

/// Check a label locally
fn cmd_validate(label: &str) -> Result<()> {
    let validation = validate_label(label);

    match validation.error {
        None => {
            println!("{} {}", "✅ Valid:".green().bold(), full_name(label));
            Ok(())
        }
        Some(reason) => bail!("{}", reason),
    }
}

/// Query the registrar for a label
async fn cmd_available(config: &CliConfig, label: &str, rpc_url: Option<String>) -> Result<()> {
    let registrar = connect(config, rpc_url).await?;
    let checker = AvailabilityChecker::new(Arc::new(registrar));

    let pb = spinner(&format!("Checking {}...", full_name(label)))?;
    checker.check_now(label).await;
    pb.finish_and_clear();
    debug!(state = ?checker.state(), "Availability settled");

    match checker.status() {
        AvailabilityStatus::Available(name) => {
            println!("{} {} is available!", "✅".green(), name.bold());
        }
        AvailabilityStatus::Taken(name) => {
            println!("{} {} is already taken", "❌".red(), name.bold());
        }
        AvailabilityStatus::Error(message) => bail!("{}", message),
        AvailabilityStatus::Idle => bail!("Label must be at least 3 characters long"),
        AvailabilityStatus::Checking => bail!("Availability check did not finish"),
    }

    Ok(())
}

/// Read registry records for a name
async fn cmd_owner(config: &CliConfig, name: &str, rpc_url: Option<String>) -> Result<()> {
    let registrar = connect(config, rpc_url).await?;
    let node = namehash(name);
    debug!(name, node = %hex::encode(node), "Reading registry");

    let pb = spinner(&format!("Reading registry for {}...", name))?;
    let owner = registrar.owner(node).await.context("Failed to read owner")?;
    let resolver = registrar
        .resolver(node)
        .await
        .context("Failed to read resolver")?;
    pb.finish_and_clear();

    println!("{} {}", "🔍 Name:".cyan().bold(), name);
    println!("   {} 0x{}", "Node:".dimmed(), hex::encode(node));
    println!("   {} {}", "Owner:".yellow(), owner);
    println!("   {} {}", "Resolver:".yellow(), resolver);
    println!("   {} {}", "Explorer:".dimmed(), explorer_address_url(&owner));

    Ok(())
}

/// Resolve a name or address
async fn cmd_resolve(value: &str) -> Result<()> {
    let resolver = NameResolver::default();
    let resolution = resolver.resolution(value).await;

    if resolution == Default::default() {
        bail!("'{}' is neither a name nor an address", value);
    }

    println!("{} {}", "🔍 Resolving:".cyan().bold(), value);
    println!(
        "   {} {}",
        "Name:".dimmed(),
        resolution.name.as_deref().unwrap_or("(unresolved)")
    );
    println!(
        "   {} {}",
        "Address:".dimmed(),
        resolution.address.as_deref().unwrap_or("(unresolved)")
    );

    Ok(())
}

async fn cmd_profile(config: &CliConfig, path: PathBuf, command: ProfileCommands) -> Result<()> {
    let store = ProfileStore::open(Arc::new(FileStorage::new(&path)))
        .await
        .with_context(|| format!("Failed to open profile store at {}", path.display()))?;

    match command {
        ProfileCommands::Show => match store.current_profile() {
            Some(profile) => print_profile(&profile),
            None => println!("{}", "No profile loaded. Use `sankofa profile load <address>`.".yellow()),
        },
        ProfileCommands::Load { address } => {
            if !is_address(&address) {
                bail!("Invalid wallet address: {}", address);
            }
            let profile = store.load_profile(&address).await?;
            println!("{} {}", "✅ Loaded profile for".green(), truncate_address(&address));
            print_profile(&profile);
        }
        ProfileCommands::Create { wallet, fields } => {
            let wallet = wallet.or_else(|| config.wallet_address.clone());
            let profile = store
                .create_profile(fields.into_update(wallet))
                .await
                .context("Failed to create profile")?;
            println!("{}", "✅ Profile created".green());
            print_profile(&profile);
        }
        ProfileCommands::Edit { fields } => {
            let profile = store
                .update_profile(fields.into_update(None))
                .await
                .context("Failed to update profile")?;
            println!("{}", "✅ Profile updated".green());
            print_profile(&profile);
        }
        ProfileCommands::RegisterName { label } => {
            let name = store
                .register_ens_name(&label)
                .await
                .context("Failed to attach name")?;
            println!("{} {}", "✅ Attached".green(), name.bold());
        }
        ProfileCommands::Clear => {
            store.clear().await?;
            println!("{} {}", "🗑  Cleared".yellow(), path.display());
        }
    }

    Ok(())
}

fn print_profile(profile: &UserProfile) {
    let title = profile
        .ens_name
        .clone()
        .unwrap_or_else(|| truncate_address(&profile.wallet_address));

    println!("\n{}", truncate_text(&title, 40).cyan().bold());
    println!("   {} {}", "Wallet:".dimmed(), profile.wallet_address);
    println!(
        "   {} {}",
        "Registered:".dimmed(),
        if profile.is_ens_registered { "yes".green() } else { "no".red() }
    );
    if !profile.name.is_empty() {
        println!("   {} {}", "Name:".dimmed(), profile.name);
    }
    if !profile.bio.is_empty() {
        println!("   {} {}", "Bio:".dimmed(), profile.bio);
    }
    if let Some(location) = &profile.location {
        match &location.region {
            Some(region) => println!("   {} {}, {}", "Location:".dimmed(), region, location.country),
            None => println!("   {} {}", "Location:".dimmed(), location.country),
        }
    }
    if let Some(links) = &profile.social_links {
        for (label, value) in [
            ("Website:", &links.website),
            ("Twitter:", &links.twitter),
            ("Instagram:", &links.instagram),
            ("LinkedIn:", &links.linkedin),
        ] {
            if let Some(value) = value {
                println!("   {} {}", label.dimmed(), value);
            }
        }
    }
    if let Some(preferences) = &profile.preferences {
        println!(
            "   {} {:?} / {}",
            "Preferences:".dimmed(),
            preferences.currency,
            preferences.language
        );
    }
    println!(
        "   {} {}",
        "Updated:".dimmed(),
        profile.updated_at.to_rfc3339()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_profile_fields_into_update() {
        let cli = Cli::try_parse_from([
            "sankofa",
            "profile",
            "create",
            "--wallet",
            "0x1111111111111111111111111111111111111111",
            "--name",
            "Alice",
            "--twitter",
            "@alice",
            "--country",
            "Ghana",
            "--currency",
            "sankofa",
        ])
        .unwrap();

        let Commands::Profile {
            command: ProfileCommands::Create { wallet, fields },
            ..
        } = cli.command
        else {
            panic!("expected profile create");
        };

        let update = fields.into_update(wallet);
        assert_eq!(update.name.as_deref(), Some("Alice"));
        assert_eq!(update.location.unwrap().country, "Ghana");
        assert_eq!(update.social_links.unwrap().twitter.as_deref(), Some("@alice"));
        assert_eq!(update.preferences.unwrap().currency, Currency::Sankofa);
        assert!(update.bio.is_none());
    }

    #[test]
    fn test_edit_without_links_leaves_them_untouched() {
        let cli = Cli::try_parse_from(["sankofa", "profile", "edit", "--bio", "Builder"]).unwrap();

        let Commands::Profile {
            command: ProfileCommands::Edit { fields },
            ..
        } = cli.command
        else {
            panic!("expected profile edit");
        };

        let update = fields.into_update(None);
        assert_eq!(update.bio.as_deref(), Some("Builder"));
        assert!(update.social_links.is_none());
        assert!(update.preferences.is_none());
        assert!(update.wallet_address.is_none());
    }

    #[test]
    fn test_validate_command() {
        assert!(cmd_validate("alice").is_ok());
        let err = cmd_validate("al").unwrap_err();
        assert_eq!(err.to_string(), "Label must be at least 3 characters long");
    }

    fn chain_server_response(chain_id: &str) -> wiremock::ResponseTemplate {
        wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": chain_id,
        }))
    }

    #[tokio::test]
    async fn test_connect_refuses_wrong_chain() {
        use sankofa_core::error::SankofaError;
        use wiremock::{matchers::method, Mock, MockServer};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(chain_server_response("0x1"))
            .mount(&server)
            .await;

        let err = connect(&CliConfig::default(), Some(server.uri()))
            .await
            .err()
            .unwrap();

        assert!(matches!(
            err.downcast_ref::<SankofaError>(),
            Some(SankofaError::ChainMismatch { actual: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_connect_accepts_configured_chain() {
        use wiremock::{matchers::method, Mock, MockServer};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(chain_server_response("0x14a34"))
            .expect(1)
            .mount(&server)
            .await;

        let registrar = connect(&CliConfig::default(), Some(server.uri()))
            .await
            .unwrap();
        assert_eq!(registrar.config().rpc_url, server.uri());
    }
}
