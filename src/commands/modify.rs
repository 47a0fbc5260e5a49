//! Status, result and delete commands for a single interview.
//!
//! Each command round-trips through the service; the updated record in the
//! response is printed, and the store of any running watcher converges when
//! the matching change event arrives on the push channel.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, NaiveTime};

use intrack_core::interview::{InterviewId, InterviewResult, InterviewStatus};

use crate::client::{ApiClient, NewInterview};
use crate::config::TrackerConfig;
use crate::render::Render;

/// Move an interview to a new date/time, carrying the other fields over
/// from the current record.
pub async fn reschedule(
    config: &TrackerConfig,
    id: InterviewId,
    date: Option<String>,
    time: Option<String>,
) -> Result<()> {
    if date.is_none() && time.is_none() {
        bail!("Nothing to change; pass --date and/or --time");
    }

    let client = ApiClient::new(config);
    let snapshot = client.fetch_schedule(config.role).await?;
    let Some(current) = snapshot.iter().find(|iv| iv.id == id) else {
        bail!("Interview #{id} is not in your schedule; pull it again with `intrack list`");
    };

    let date: NaiveDate = match date {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Expected YYYY-MM-DD, got '{raw}'"))?,
        None => current.date,
    };
    let time: NaiveTime = match time {
        Some(raw) => NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .with_context(|| format!("Expected HH:MM, got '{raw}'"))?,
        None => current.time,
    };

    let updated = client
        .update_interview(
            id,
            &NewInterview {
                date,
                time,
                counterpart_name: current.counterpart_name.clone(),
                position: current.position.clone(),
                notes: current.notes.clone(),
            },
        )
        .await?;
    println!("{}", updated.render());
    Ok(())
}

pub async fn complete(config: &TrackerConfig, id: InterviewId) -> Result<()> {
    let client = ApiClient::new(config);
    let updated = client.update_status(id, InterviewStatus::Completed).await?;
    println!("{}", updated.render());
    Ok(())
}

pub async fn cancel(config: &TrackerConfig, id: InterviewId) -> Result<()> {
    let client = ApiClient::new(config);
    let updated = client.update_status(id, InterviewStatus::Cancelled).await?;
    println!("{}", updated.render());
    Ok(())
}

pub async fn result(config: &TrackerConfig, id: InterviewId, result: InterviewResult) -> Result<()> {
    let client = ApiClient::new(config);
    let updated = client.update_result(id, result).await?;
    println!("{}", updated.render());
    Ok(())
}

pub async fn delete(config: &TrackerConfig, id: InterviewId) -> Result<()> {
    let client = ApiClient::new(config);
    client.delete_interview(id).await?;
    println!("Deleted interview #{id}.");
    Ok(())
}
