//! `intrack calendar` — month grid of the own or a delegated schedule.

use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};

use intrack_core::calendar::{self, YearMonth};
use intrack_core::interview::UserId;
use intrack_core::store::InterviewStore;

use crate::client::ApiClient;
use crate::config::TrackerConfig;
use crate::render;

pub async fn run(config: &TrackerConfig, month: Option<String>, user: Option<UserId>) -> Result<()> {
    let month = match month {
        Some(raw) => parse_month(&raw)?,
        None => YearMonth::from_date(Local::now().date_naive()),
    };

    let client = ApiClient::new(config);
    let snapshot = match user {
        None => client.fetch_schedule(config.role).await?,
        Some(target) => {
            // Fail early with a readable message when no grant exists; the
            // server would reject the pull anyway.
            let access = client.fetch_access().await?;
            if !access.granted_to_me.iter().any(|g| g.grantor_id == target) {
                bail!("user {target} has not shared their calendar with you");
            }
            client.fetch_delegated_calendar(target).await?
        }
    };

    let mut store = InterviewStore::new();
    store.replace_all(snapshot);

    let grid = calendar::project(store.as_slice(), month);
    println!("{}", render::render_month(&grid, month));

    let agenda = render::render_month_agenda(&grid);
    if !agenda.is_empty() {
        println!();
        println!("{agenda}");
    }

    Ok(())
}

fn parse_month(raw: &str) -> Result<YearMonth> {
    // Accept YYYY-MM or a full date.
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return Ok(YearMonth::from_date(date));
    }
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("Expected YYYY-MM, got '{raw}'"))?;
    let year: i32 = year.parse().with_context(|| format!("Invalid year in '{raw}'"))?;
    let month: u32 = month.parse().with_context(|| format!("Invalid month in '{raw}'"))?;
    YearMonth::new(year, month).with_context(|| format!("Month out of range in '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month_accepts_year_month() {
        let ym = parse_month("2024-02").unwrap();
        assert_eq!((ym.year(), ym.month()), (2024, 2));
    }

    #[test]
    fn test_parse_month_accepts_full_date() {
        let ym = parse_month("2024-02-29").unwrap();
        assert_eq!((ym.year(), ym.month()), (2024, 2));
    }

    #[test]
    fn test_parse_month_rejects_garbage() {
        assert!(parse_month("March").is_err());
        assert!(parse_month("2024-13").is_err());
    }
}
