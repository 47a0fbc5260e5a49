//! `intrack accept` / `intrack decline` — answer an invitation.

use anyhow::{Result, bail};

use intrack_core::interview::InterviewId;
use intrack_core::invitation::{self, InvitationAction};

use crate::client::ApiClient;
use crate::config::TrackerConfig;
use crate::render::Render;

pub async fn run(config: &TrackerConfig, id: InterviewId, action: InvitationAction) -> Result<()> {
    let client = ApiClient::new(config);

    // Validate against the current snapshot before issuing the command, so
    // a stale id or an already-answered invitation fails with a local
    // message instead of a server round-trip.
    let snapshot = client.fetch_schedule(config.role).await?;
    let Some(interview) = snapshot.iter().find(|iv| iv.id == id) else {
        bail!("Interview #{id} is not in your schedule; pull it again with `intrack list`");
    };
    invitation::validate_response(interview, config.user_id, action)?;

    let updated = client.respond_invitation(id, action).await?;
    println!("{}", updated.render());
    Ok(())
}
