//! Terminal rendering for tracker types.
//!
//! Extension trait adding colored output to intrack-core types using
//! owo_colors, plus the month-grid renderer for the calendar view.

use chrono::Datelike;
use owo_colors::OwoColorize;

use intrack_core::access::AccessGrant;
use intrack_core::calendar::{DayBucket, YearMonth};
use intrack_core::interview::{Interview, InterviewResult, InterviewStatus, InvitationStatus};

/// Extension trait for terminal rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for InterviewStatus {
    fn render(&self) -> String {
        match self {
            InterviewStatus::Scheduled => "scheduled".cyan().to_string(),
            InterviewStatus::Completed => "completed".green().to_string(),
            InterviewStatus::Cancelled => "cancelled".red().to_string(),
        }
    }
}

impl Render for InterviewResult {
    fn render(&self) -> String {
        match self {
            InterviewResult::Passed => "passed".green().to_string(),
            InterviewResult::Failed => "failed".red().to_string(),
            InterviewResult::Pending => "pending".yellow().to_string(),
        }
    }
}

impl Render for InvitationStatus {
    fn render(&self) -> String {
        match self {
            InvitationStatus::None => String::new(),
            InvitationStatus::Pending => "[invitation pending]".yellow().to_string(),
            InvitationStatus::Accepted => "[accepted]".green().to_string(),
            InvitationStatus::Declined => "[declined]".red().to_string(),
        }
    }
}

impl Render for Interview {
    fn render(&self) -> String {
        let when = format!("{} {}", self.date, self.time.format("%H:%M"));
        let who = match &self.position {
            Some(position) => format!("{} ({})", self.counterpart_name, position),
            None => self.counterpart_name.clone(),
        };

        let mut line = format!(
            "#{:<4} {} {} {}",
            self.id,
            when.dimmed(),
            who.bold(),
            self.status.render()
        );
        if let Some(result) = self.result {
            line.push_str(&format!(" → {}", result.render()));
        }
        let invitation = self.invitation_status.render();
        if !invitation.is_empty() {
            line.push(' ');
            line.push_str(&invitation);
        }
        line
    }
}

impl Render for AccessGrant {
    fn render(&self) -> String {
        format!(
            "#{:<4} {} → {} {}",
            self.id,
            format!("user {}", self.grantor_id).bold(),
            format!("user {}", self.grantee_id).bold(),
            format!("since {}", self.created_at.format("%Y-%m-%d")).dimmed()
        )
    }
}

/// Render the 42-cell projection as a Monday-first month grid.
///
/// Out-of-month cells are dimmed, days with interviews carry their count.
pub fn render_month(grid: &[DayBucket], month: YearMonth) -> String {
    let mut lines = Vec::new();
    // Center before coloring: ANSI escapes would throw off the padding.
    lines.push(format!("{:^34}", month.to_string()).bold().to_string());
    lines.push(" Mo   Tu   We   Th   Fr   Sa   Su".dimmed().to_string());

    for week in grid.chunks(7) {
        let mut row = String::new();
        for bucket in week {
            let cell = if bucket.interviews.is_empty() {
                format!("{:>3}  ", bucket.date.day())
            } else {
                format!("{:>3}{} ", bucket.date.day(), marker(bucket.interviews.len()))
            };
            if bucket.out_of_month {
                row.push_str(&cell.dimmed().to_string());
            } else if bucket.interviews.is_empty() {
                row.push_str(&cell);
            } else {
                row.push_str(&cell.cyan().to_string());
            }
        }
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

fn marker(count: usize) -> char {
    match count {
        1 => '·',
        2 => ':',
        _ => '*',
    }
}

/// List the interviews of every non-empty in-month cell, in grid order.
pub fn render_month_agenda(grid: &[DayBucket]) -> String {
    let mut lines = Vec::new();
    for bucket in grid {
        if bucket.out_of_month || bucket.interviews.is_empty() {
            continue;
        }
        lines.push(bucket.date.format("%a %Y-%m-%d").to_string().bold().to_string());
        for interview in &bucket.interviews {
            lines.push(format!("   {}", interview.render()));
        }
    }
    lines.join("\n")
}
