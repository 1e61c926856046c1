use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AccountSettingsScreen, Alert, ArtefactFeed, ArtefactsScreen, DataAccess, HttpDataAccess,
    InvitationScreen, LoggingNavigator, Phase, ProfileScreen, Route, ScreenContext, Session,
};
use shared::domain::{NotificationKind, UserId};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, DEFAULT_CONFIG_PATH};

#[derive(Parser, Debug)]
#[command(about = "Headless front end for the artefact sharing client")]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Acting user.
    #[arg(long)]
    user_id: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    AcceptInvite {
        notification_id: String,
    },
    DeclineInvite {
        notification_id: String,
    },
    Artefacts {
        #[arg(long)]
        private: bool,
    },
    EditAccount {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    Profile,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .init();

    let mut http = HttpDataAccess::new(&settings.api_url, settings.request_timeout())
        .context("failed to build http client")?;
    if let Some(token) = settings.access_token {
        http = http.with_access_token(token);
    }
    let data: Arc<dyn DataAccess> = Arc::new(http);

    let user_id = UserId::new(cli.user_id);
    let user = data
        .fetch_user(&user_id)
        .await
        .with_context(|| format!("failed to load session user {user_id}"))?;
    let ctx = ScreenContext::new(data, Arc::new(Session::new(user)), Arc::new(LoggingNavigator));

    match cli.command {
        Command::AcceptInvite { notification_id } => {
            let mut screen = open_invitation(&ctx, &notification_id).await?;
            screen.accept_invite().await;
            settle(screen.phase(), screen.alert())?;
            println!("joined group");
        }
        Command::DeclineInvite { notification_id } => {
            let mut screen = open_invitation(&ctx, &notification_id).await?;
            screen.decline_invite().await;
            settle(screen.phase(), screen.alert())?;
            println!("invitation declined");
        }
        Command::Artefacts { private } => {
            let mut screen = ArtefactsScreen::new(ctx);
            screen.refresh().await;
            settle(screen.phase(), screen.alert())?;
            if private {
                screen.change_tab();
            }
            match screen.feed() {
                ArtefactFeed::Items(items) => {
                    for artefact in items {
                        println!("{}\t{}", artefact.id, artefact.title);
                    }
                }
                ArtefactFeed::Empty(message) => {
                    println!("{}\n{}\n\n{}", message.headline, message.hint, message.detail);
                }
            }
        }
        Command::EditAccount {
            name,
            image,
            password,
        } => {
            let mut screen = AccountSettingsScreen::new(ctx, Route::Profile);
            screen.set_name(name.unwrap_or_default());
            screen.set_image(image.unwrap_or_default());
            screen.set_password(password.unwrap_or_default());
            if !screen.can_submit() {
                bail!("nothing to change; pass --name, --image or --password");
            }
            screen.submit_edit().await;
            settle(screen.phase(), screen.alert())?;
            println!("account updated");
        }
        Command::Profile => {
            let mut screen = ProfileScreen::new(ctx);
            screen.load().await;
            settle(screen.phase(), screen.alert())?;
            if let Some(user) = screen.profile() {
                println!("{} (@{})", user.name, user.username);
            }
            if let Some(joined) = screen.joined_since() {
                println!("{joined}");
            }
        }
    }

    Ok(())
}

async fn open_invitation(ctx: &ScreenContext, notification_id: &str) -> Result<InvitationScreen> {
    let notifications = ctx
        .data
        .fetch_user_notifications(ctx.user_id())
        .await
        .context("failed to load notifications")?;
    let notification = notifications
        .into_iter()
        .find(|n| n.id.as_str() == notification_id && n.kind == NotificationKind::GroupInvite)
        .ok_or_else(|| anyhow!("no group invite with id {notification_id}"))?;

    let mut screen = InvitationScreen::new(ctx.clone(), notification);
    screen.load().await;
    settle(screen.phase(), screen.alert())?;
    if let Some(details) = screen.details() {
        println!("{}\n{}", details.headline(), details.group.title);
    }
    Ok(screen)
}

/// Turns a screen error into a process error carrying the alert text.
fn settle(phase: &Phase, alert: Option<&Alert>) -> Result<()> {
    match phase.error() {
        None => Ok(()),
        Some(err) => {
            let shown = alert.map(|a| a.message.as_str()).unwrap_or("request failed");
            Err(anyhow!("{shown}: {err}"))
        }
    }
}
