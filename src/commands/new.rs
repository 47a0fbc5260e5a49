//! `intrack new` — schedule an interview.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};

use crate::client::{ApiClient, NewInterview};
use crate::config::TrackerConfig;
use crate::render::Render;

pub async fn run(
    config: &TrackerConfig,
    counterpart: String,
    date: String,
    time: String,
    position: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let date: NaiveDate = date
        .parse()
        .with_context(|| format!("Expected YYYY-MM-DD, got '{date}'"))?;
    let time = parse_time(&time)?;

    let client = ApiClient::new(config);
    let created = client
        .create_interview(&NewInterview {
            date,
            time,
            counterpart_name: counterpart,
            position,
            notes,
        })
        .await?;

    println!("Scheduled: {}", created.render());
    Ok(())
}

fn parse_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .with_context(|| format!("Expected HH:MM, got '{raw}'"))
}
