//! `intrack list` — pull a snapshot and print the schedule.

use anyhow::Result;
use owo_colors::OwoColorize;

use intrack_core::interview::InvitationStatus;
use intrack_core::store::InterviewStore;

use crate::client::ApiClient;
use crate::config::TrackerConfig;
use crate::render::Render;

pub async fn run(config: &TrackerConfig) -> Result<()> {
    let client = ApiClient::new(config);
    let snapshot = client.fetch_schedule(config.role).await?;

    let mut store = InterviewStore::new();
    store.replace_all(snapshot);

    if store.is_empty() {
        println!("No interviews scheduled.");
        return Ok(());
    }

    for interview in store.iter() {
        println!("{}", interview.render());
    }

    let pending = store
        .iter()
        .filter(|iv| iv.invitation_status == InvitationStatus::Pending)
        .count();
    if pending > 0 {
        println!();
        println!(
            "{}",
            format!(
                "{pending} pending invitation{}; answer with `intrack accept <id>` or `intrack decline <id>`",
                if pending == 1 { "" } else { "s" }
            )
            .yellow()
        );
    }

    Ok(())
}
