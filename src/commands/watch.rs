//! `intrack watch` — follow the schedule live.
//!
//! Seeds the session from a snapshot, then applies push-channel frames as
//! they arrive. After a transport gap the session is re-seeded before any
//! further frame is applied, since the channel fills no gaps.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use intrack_core::event::WireFrame;
use intrack_core::interview::UserId;
use intrack_core::reconcile::Outcome;
use intrack_core::session::{FrameEffect, Session};

use crate::channel::{ChannelMessage, EventChannel};
use crate::client::ApiClient;
use crate::config::TrackerConfig;
use crate::render::Render;

pub async fn run(config: &TrackerConfig, user: Option<UserId>) -> Result<()> {
    let client = ApiClient::new(config);
    let mut session = Session::new(config.user_id);

    seed(&client, config, &mut session, user).await?;
    report_schedule(&session);

    let mut channel = EventChannel::connect(client.clone());
    println!("{}", "Watching for changes (ctrl-c to stop)...".dimmed());

    loop {
        tokio::select! {
            message = channel.recv() => {
                let Some(message) = message else { break };
                match message {
                    ChannelMessage::Frame(frame) => {
                        let label = describe(&frame);
                        let effect = session.handle_frame(frame);
                        report(effect, &label);
                    }
                    ChannelMessage::Resynced => {
                        println!("{}", "Reconnected, refreshing schedule...".yellow());
                        seed(&client, config, &mut session, user).await?;
                        report_schedule(&session);
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    Ok(())
}

/// Pull fresh snapshots for everything the session shows.
async fn seed(
    client: &ApiClient,
    config: &TrackerConfig,
    session: &mut Session,
    user: Option<UserId>,
) -> Result<()> {
    let snapshot = client
        .fetch_schedule(config.role)
        .await
        .context("Could not load your schedule")?;
    session.seed(snapshot);

    let access = client.fetch_access().await?;
    session.seed_access(access.granted_by_me, access.granted_to_me);

    if let Some(target) = user {
        let delegated = client
            .fetch_delegated_calendar(target)
            .await
            .with_context(|| format!("Could not load the calendar of user {target}"))?;
        session.open_delegated(target, delegated)?;
    }
    Ok(())
}

fn report_schedule(session: &Session) {
    for interview in session.store().iter() {
        println!("{}", interview.render());
    }
    if let Some(view) = session.delegated() {
        println!();
        println!("{}", format!("Calendar of user {}:", view.target()).bold());
        for interview in view.store().iter() {
            println!("   {}", interview.render());
        }
    }
}

fn report(effect: FrameEffect, label: &str) {
    match effect {
        FrameEffect::Schedule(Outcome::Applied) => {
            println!("{} {}", "~".cyan(), label);
        }
        FrameEffect::Delegated(Outcome::Applied) => {
            println!("{} {} {}", "~".cyan(), label, "(delegated)".dimmed());
        }
        FrameEffect::Access { view_closed } => {
            println!("{} access updated", "~".cyan());
            if view_closed {
                println!(
                    "{}",
                    "The shared calendar you were viewing was revoked and has been closed.".red()
                );
            }
        }
        // Out-of-scope and duplicate traffic is expected on a shared
        // stream; stay quiet about it.
        FrameEffect::Schedule(Outcome::Ignored(_))
        | FrameEffect::Delegated(Outcome::Ignored(_))
        | FrameEffect::Dropped => {}
    }
}

fn describe(frame: &WireFrame) -> String {
    match frame {
        WireFrame::Interview(raw) => {
            let id = raw.body.get("id").and_then(|v| v.as_i64()).unwrap_or_default();
            format!("interview #{id} {}", raw.kind)
        }
        WireFrame::Access(raw) => format!("access {}", raw.kind),
    }
}
