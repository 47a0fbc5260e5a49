//! `intrack access` — list, grant and revoke calendar delegation.

use anyhow::Result;
use owo_colors::OwoColorize;

use intrack_core::access::AccessRegistry;
use intrack_core::interview::UserId;

use crate::client::ApiClient;
use crate::config::TrackerConfig;
use crate::render::Render;

pub async fn list(config: &TrackerConfig) -> Result<()> {
    let client = ApiClient::new(config);
    let access = client.fetch_access().await?;

    println!("{}", "Shared by you:".bold());
    if access.granted_by_me.is_empty() {
        println!("   (nobody)");
    }
    for grant in &access.granted_by_me {
        println!("   {}", grant.render());
    }

    println!();
    println!("{}", "Shared with you:".bold());
    if access.granted_to_me.is_empty() {
        println!("   (nobody)");
    }
    for grant in &access.granted_to_me {
        println!("   {}", grant.render());
    }

    Ok(())
}

pub async fn grant(config: &TrackerConfig, target: UserId) -> Result<()> {
    let client = ApiClient::new(config);

    // Check against the current listing first; the server enforces the same
    // rules but a duplicate or self-grant should fail without a write.
    let access = client.fetch_access().await?;
    let mut registry = AccessRegistry::new(config.user_id);
    registry.replace_all(access.granted_by_me, access.granted_to_me);
    registry.validate_grant(target)?;

    let grant = client.grant_access(target).await?;
    println!("Shared your calendar with user {}: {}", target, grant.render());
    Ok(())
}

pub async fn revoke(config: &TrackerConfig, grant_id: i64) -> Result<()> {
    let client = ApiClient::new(config);

    let access = client.fetch_access().await?;
    let mut registry = AccessRegistry::new(config.user_id);
    registry.replace_all(access.granted_by_me, access.granted_to_me);
    let grant = registry.validate_revoke(grant_id)?;
    let grantee = grant.grantee_id;

    client.revoke_access(grant_id).await?;
    println!("Revoked calendar access for user {grantee}.");
    Ok(())
}
