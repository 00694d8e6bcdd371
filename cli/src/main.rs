use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use events::EventKind;
use events::rest::{KitchenStatusResponse, kitchen_status_endpoint};
use realtime::config::{DEFAULT_NAMESPACE, DEFAULT_ORIGIN};
use realtime::policy::DEFAULT_RECONNECT_ATTEMPTS;
use realtime::{
    Channel, ChannelConfig, ChannelEvent, DegradedReason, Notification, NotificationFeed, ReconnectPolicy,
    Subscription, Topic,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing_subscriber::EnvFilter;

mod driver;
mod output;


use driver::Control;
use output::Printer;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("unknown event profile `{0}`; expected `current` or `legacy`")]
    UnknownProfile(String),
    #[error(transparent)]
    Channel(#[from] realtime::ChannelError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("gave up reconnecting after {attempts} attempts")]
    Degraded { attempts: u32 },
    #[error("server refused the notification namespace")]
    NamespaceRefused,
}

impl From<DegradedReason> for CliError {
    fn from(reason: DegradedReason) -> Self {
        match reason {
            DegradedReason::RetriesExhausted { attempts } => Self::Degraded { attempts },
            DegradedReason::NamespaceRefused => Self::NamespaceRefused,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "canteen-cli", about = "Canteen realtime notification watcher")]
struct Cli {
    /// Notification server origin (http, https, ws or wss).
    #[arg(long, env = "CANTEEN_SOCKET_URL", default_value = DEFAULT_ORIGIN)]
    socket_url: String,

    #[arg(long, env = "CANTEEN_SOCKET_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Wire event names: `current` or `legacy`.
    #[arg(long, env = "CANTEEN_EVENT_PROFILE", default_value = "current")]
    profile: String,

    #[arg(long, env = "CANTEEN_RECONNECT_ATTEMPTS", default_value_t = DEFAULT_RECONNECT_ATTEMPTS)]
    reconnect_attempts: u32,

    #[arg(long, env = "CANTEEN_RECONNECT_DELAY_MS", default_value_t = 2000)]
    reconnect_delay_ms: u64,

    /// REST API base URL.
    #[arg(long, env = "CANTEEN_API_URL", default_value = "http://127.0.0.1:5000/api")]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect and print notifications as they arrive.
    Watch(WatchArgs),
    /// Fetch a kitchen's online status once.
    KitchenStatus {
        #[arg(env = "CANTEEN_KITCHEN_ID")]
        kitchen_id: String,
    },
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// Phone number registered as the user identity.
    #[arg(long, env = "CANTEEN_USER_PHONE")]
    user: Option<String>,

    /// Ring the terminal bell on every notification.
    #[arg(long, default_value_t = false)]
    bell: bool,

    /// Print one JSON object per notification.
    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(long, help = "Disconnect after this many notifications")]
    max_events: Option<usize>,
}

impl Cli {
    fn channel_config(&self) -> Result<ChannelConfig, CliError> {
        let events = events::EventNames::by_profile(&self.profile)
            .ok_or_else(|| CliError::UnknownProfile(self.profile.clone()))?;
        Ok(ChannelConfig::new(self.socket_url.clone())
            .with_namespace(&self.namespace)
            .with_events(events)
            .with_reconnect(ReconnectPolicy::new(
                self.reconnect_attempts,
                Duration::from_millis(self.reconnect_delay_ms),
            )))
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Watch(args) => run_watch(cli.channel_config()?, args).await,
        Command::KitchenStatus { kitchen_id } => run_kitchen_status(&cli.api_url, kitchen_id).await,
    }
}

async fn run_watch(config: ChannelConfig, args: &WatchArgs) -> Result<(), CliError> {
    let mut channel = Channel::new(config)?;
    channel.identify(args.user.clone());

    let (control_tx, mut control_rx) = mpsc::unbounded_channel();
    let feed = Arc::new(Mutex::new(NotificationFeed::new()));
    let printer = Printer { bell: args.bell, json: args.json };
    let _subscriptions = subscribe(&channel, &feed, printer, args.max_events, &control_tx)?;

    let interrupt = control_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted; disconnecting");
            let _ = interrupt.send(Control::Disconnect);
        }
    });

    let state = driver::run(&mut channel, &mut control_rx).await;
    let received = feed.lock().unwrap_or_else(PoisonError::into_inner).len();
    let stats = channel.stats();
    tracing::info!(
        ?state,
        received,
        delivered = stats.delivered,
        rejected = stats.rejected,
        reconnects = stats.reconnects,
        "watch finished"
    );

    match channel.degraded_reason() {
        Some(reason) => Err(reason.into()),
        None => Ok(()),
    }
}

/// Print and record every server event; log lifecycle changes.
fn subscribe(
    channel: &Channel,
    feed: &Arc<Mutex<NotificationFeed>>,
    printer: Printer,
    max_events: Option<usize>,
    control: &UnboundedSender<Control>,
) -> Result<Vec<Subscription>, CliError> {
    let on_event = {
        let feed = Arc::clone(feed);
        let control = control.clone();
        move |event: &ChannelEvent| {
            let ChannelEvent::Server(server) = event else {
                return;
            };
            let notification = Notification::from_event(server, output::now_ms());
            printer.print(&notification);
            let received = {
                let mut feed = feed.lock().unwrap_or_else(PoisonError::into_inner);
                feed.append(notification);
                feed.len()
            };
            if max_events.is_some_and(|max| received >= max) {
                tracing::info!(received, "notification limit reached");
                let _ = control.send(Control::Disconnect);
            }
        }
    };

    let mut subscriptions = Vec::with_capacity(EventKind::ALL.len() + 1);
    for kind in EventKind::ALL {
        subscriptions.push(channel.on(Topic::Event(kind), on_event.clone())?);
    }
    subscriptions.push(channel.on(Topic::Connection, |event| match event {
        ChannelEvent::Connected => tracing::info!("live"),
        ChannelEvent::Disconnected => tracing::info!("offline"),
        ChannelEvent::Server(_) => {}
    })?);
    Ok(subscriptions)
}

async fn run_kitchen_status(api_url: &str, kitchen_id: &str) -> Result<(), CliError> {
    let url = kitchen_status_endpoint(api_url, kitchen_id);
    let response = reqwest::Client::new().get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::HttpStatus { url, status: status.as_u16() });
    }
    let body: KitchenStatusResponse = response.json().await?;
    println!("kitchen {kitchen_id}: {}", if body.status { "online" } else { "offline" });
    if let Some(phone) = body.phone {
        println!("call: tel:+91{}", phone.trim_start_matches("+91"));
    }
    Ok(())
}
