//! Deploy Notify binary.
//!
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx TELEGRAM_CHAT_ID=123 deploy-notify serve
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use deploy_notify_core::{
    compose, compose_plain, config, ActionOutcome, ChannelKind, EnableRequest,
};
use deploy_notify_events::{DeploymentCompleted, EventBus};
use deploy_notify_models::{Deployment, NotificationConfig, Server, Site, SiteId, SiteType};
use deploy_notify_persistence::{DeploymentStore, SiteStore};
use deploy_notify_telegram::{
    DeploymentNotifier, NotificationChannel, Plugin, SiteActions, StdoutChannel, StoreWatcher,
    TelegramChannel, DEFAULT_POLL_INTERVAL,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Deploy Notify - enhanced deployment notifications for Telegram
#[derive(Parser, Debug)]
#[command(name = "deploy-notify")]
#[command(about = "Detailed Telegram notifications for site deployments")]
struct Args {
    /// Directory holding site and deployment records
    #[arg(long, env = "DEPLOY_NOTIFY_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List sites and their notification status
    Sites,

    /// Register a site
    AddSite {
        /// Site type (laravel, php, wordpress, phpmyadmin, nodejs, python, static)
        #[arg(long = "type", value_parser = parse_site_type)]
        site_type: SiteType,
        #[arg(long)]
        domain: String,
        #[arg(long, default_value = "main")]
        branch: String,
        #[arg(long, requires = "server_ip")]
        server_name: Option<String>,
        #[arg(long, requires = "server_name")]
        server_ip: Option<String>,
    },

    /// Remove a site and its deployment records
    RemoveSite {
        #[arg(long)]
        site: String,
    },

    /// Enable enhanced notifications for a site
    Enable {
        #[arg(long)]
        site: String,
        /// Leave out commit hash, author and message
        #[arg(long)]
        no_commit_info: bool,
        /// Leave out deployment duration
        #[arg(long)]
        no_duration: bool,
        /// Include server name and IP
        #[arg(long)]
        server_info: bool,
        /// Include the last 10 log lines on failure
        #[arg(long)]
        log_snippet: bool,
        #[arg(long)]
        success_emoji: Option<String>,
        #[arg(long)]
        failure_emoji: Option<String>,
    },

    /// Disable enhanced notifications for a site
    Disable {
        #[arg(long)]
        site: String,
    },

    /// Print the message a deployment would produce
    Preview {
        #[arg(long)]
        site: String,
        /// Deployment id; the latest one if omitted
        #[arg(long)]
        deployment: Option<u64>,
        /// Show the plain-text variant
        #[arg(long)]
        plain: bool,
    },

    /// Send the notification for one deployment now
    Notify {
        #[arg(long)]
        site: String,
        /// Deployment id; the latest one if omitted
        #[arg(long)]
        deployment: Option<u64>,
    },

    /// Watch the store and notify as deployments complete
    Serve {
        /// Seconds between store scans
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
        interval: u64,
    },
}

fn parse_site_type(raw: &str) -> Result<SiteType, String> {
    SiteType::ALL
        .into_iter()
        .find(|t| t.as_str() == raw)
        .ok_or_else(|| format!("unknown site type: {}", raw))
}

fn telegram() -> Option<TelegramChannel> {
    TelegramChannel::from_env()
        .map_err(|e| warn!(error = %e, "Telegram not configured, printing notifications instead"))
        .ok()
}

/// Telegram if configured, stdout otherwise.
fn notifier(sites: SiteStore, telegram: Option<TelegramChannel>) -> DeploymentNotifier {
    let channel: Arc<dyn NotificationChannel> = match telegram {
        Some(telegram) => Arc::new(telegram),
        None => Arc::new(StdoutChannel::new(ChannelKind::Telegram)),
    };
    DeploymentNotifier::new(sites).with_channel(channel)
}

/// The requested deployment, or the site's latest.
fn pick_deployment(
    store: &DeploymentStore,
    site_id: &SiteId,
    id: Option<u64>,
) -> Result<Deployment, Box<dyn Error>> {
    match id {
        Some(id) => Ok(store.load_deployment(site_id, id)?),
        None => store
            .latest(site_id)?
            .ok_or_else(|| format!("site {} has no deployments", site_id).into()),
    }
}

fn print_outcome(outcome: &ActionOutcome) {
    println!("{}", outcome.success);
    println!("{}", outcome.info);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load .env before parsing so clap sees the variables
    config::load_env();

    let args = Args::parse();

    let filter = match args.verbose {
        0 => "deploy_notify=info,deploy_notify_telegram=info,teloxide=warn",
        1 => "deploy_notify=debug,deploy_notify_telegram=debug,deploy_notify_core=debug,teloxide=info",
        2 => "deploy_notify=trace,deploy_notify_telegram=trace,deploy_notify_core=trace,teloxide=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let state_dir = match args.state_dir {
        Some(dir) => dir,
        None => config::ensure_state_dir()?,
    };
    let sites = SiteStore::new(&state_dir);
    let deployments = DeploymentStore::new(&state_dir);

    match args.command {
        Command::Sites => {
            for site in sites.list_sites()? {
                let status = match &site.type_data.notifications {
                    Some(c) if c.enabled => "enabled",
                    Some(_) => "disabled",
                    None => "not configured",
                };
                println!("{}  {:<28} {:<10} {}", site.id, site.domain, site.site_type, status);
            }
        }

        Command::AddSite {
            site_type,
            domain,
            branch,
            server_name,
            server_ip,
        } => {
            let mut site = Site::new(site_type, domain, branch);
            if let (Some(name), Some(ip)) = (server_name, server_ip) {
                site = site.with_server(Server::new(name, ip));
            }
            sites.save_site(&site)?;
            println!("{}", site.id);
        }

        Command::RemoveSite { site } => {
            let site = sites.load_site(&SiteId::from(site))?;
            deployments.delete_site_deployments(&site.id)?;
            sites.delete_site(&site.id)?;
            info!(site_id = %site.id, domain = %site.domain, "Site removed");
            println!("Removed {}", site.domain);
        }

        Command::Enable {
            site,
            no_commit_info,
            no_duration,
            server_info,
            log_snippet,
            success_emoji,
            failure_emoji,
        } => {
            let request = EnableRequest {
                include_commit_info: no_commit_info.then_some(false),
                include_duration: no_duration.then_some(false),
                include_server_info: server_info.then_some(true),
                include_log_snippet: log_snippet.then_some(true),
                success_emoji,
                failure_emoji,
            };
            let outcome = SiteActions::new(sites).enable(&SiteId::from(site), request)?;
            print_outcome(&outcome);
        }

        Command::Disable { site } => {
            let outcome = SiteActions::new(sites).disable(&SiteId::from(site))?;
            print_outcome(&outcome);
        }

        Command::Preview {
            site,
            deployment,
            plain,
        } => {
            let site = sites.load_site(&SiteId::from(site))?;
            let deployment = pick_deployment(&deployments, &site.id, deployment)?;
            let config = site
                .type_data
                .notifications
                .clone()
                .unwrap_or_else(NotificationConfig::enabled);

            if plain {
                println!("{}", compose_plain(&deployment, &site));
            } else {
                println!("{}", compose(&deployment, &site, &config));
            }
        }

        Command::Notify { site, deployment } => {
            let site_id = SiteId::from(site);
            let deployment = pick_deployment(&deployments, &site_id, deployment)?;
            let report = notifier(sites, telegram())
                .handle(&DeploymentCompleted::new(deployment))
                .await?;
            println!("{:?}", report);
        }

        Command::Serve { interval } => {
            let telegram = telegram();
            if let Some(channel) = &telegram {
                let bot = channel.get_me().await?;
                info!(bot = %bot, chat_id = channel.chat_id(), "Telegram bot verified");
            }

            let bus = EventBus::new();
            let plugin = Plugin::new(bus.clone(), notifier(sites.clone(), telegram));
            plugin.boot(tokio::runtime::Handle::current())?;

            let mut watcher = StoreWatcher::new(sites, deployments, bus);
            let primed = watcher.prime()?;
            info!(primed, interval, "Watching for completed deployments");
            tokio::spawn(watcher.run(Duration::from_secs(interval.max(1))));

            println!("\n{}", plugin.name());
            println!("   State: {}", state_dir.display());
            println!("   Press Ctrl+C to stop\n");

            tokio::signal::ctrl_c().await?;
            info!("Shutting down");
        }
    }

    Ok(())
}
