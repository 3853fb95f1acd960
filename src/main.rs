use chrono::Datelike;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use profilecheck::models::{HeatmapCell, NormalizedProfile, SeriesPoint};
use profilecheck::normalize::CalendarZone;
use profilecheck::{
    adapter_for, ChartInteraction, Config, FetchOutcome, Platform, Session, UpstreamClient, View,
};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Parser, Debug)]
#[command(name = "profilecheck")]
#[command(version)]
#[command(about = "Check a coding-platform profile: rating history and a one-year activity calendar")]
struct Args {
    /// Platform to query (leetcode, github, codeforces, codechef)
    #[arg(short, long)]
    platform: Platform,

    /// Username on that platform
    #[arg(short, long)]
    username: String,

    /// Output format (json, text, markdown)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Report the contest at this series index instead of the latest one
    #[arg(long)]
    hover: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("profilecheck=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env()?;

    let http = UpstreamClient::new(config.request_timeout_secs)?;
    let adapter = adapter_for(args.platform, &config, http);

    let mut session = Session::new();
    session.set_username(&args.username);
    let Some(ticket) = session.begin_fetch(args.platform) else {
        anyhow::bail!("Please enter a username!");
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.set_message(format!("Fetching {} profile for {}", ticket.platform, ticket.username));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = adapter.fetch_and_normalize(&ticket.username).await;
    spinner.finish_and_clear();
    session.complete(&ticket, result);

    if let (Some(index), Some(chart)) = (args.hover, session.chart_mut()) {
        if !chart.pointer_move(index) {
            tracing::warn!(
                "Hover index {} is outside the series ({} points)",
                index,
                chart.series().len()
            );
        }
    }

    let output = match args.format.as_str() {
        "json" => format_json(&session)?,
        "markdown" => format_markdown(&session, config.zone),
        _ => format_text(&session, config.zone),
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Output written to: {}", path);
    } else {
        println!("{}", output);
    }

    let failed = session.outcome().map(|o| o.is_failure()).unwrap_or(true);
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn format_json(session: &Session) -> anyhow::Result<String> {
    let value = match session.view() {
        View::Ready { outcome, chart } => serde_json::json!({
            "outcome": outcome,
            "current_data": chart.current_data(),
            "axis_ticks": chart.axis_ticks(),
        }),
        View::Failed(outcome) => serde_json::json!({ "outcome": outcome }),
        View::Home | View::Loading { .. } => serde_json::json!({ "outcome": null }),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

fn format_text(session: &Session, zone: CalendarZone) -> String {
    let (profile, chart) = match session.view() {
        View::Ready { outcome, chart } => match outcome.profile() {
            Some(profile) => (profile, chart),
            None => return "User data not available.\n".to_string(),
        },
        View::Failed(FetchOutcome::NotFound(msg)) => return format!("{}\n", msg),
        View::Failed(_) => return "User data not available.\n".to_string(),
        View::Home | View::Loading { .. } => return String::new(),
    };

    let mut output = String::new();

    output.push_str(&format!(
        "\n=== {} Profile: {} ===\n\n",
        profile.platform, profile.username
    ));
    output.push_str(&format!("Name: {}\n", profile.display_name));
    if let Some(ref avatar) = profile.avatar_url {
        output.push_str(&format!("Avatar: {}\n", avatar));
    }
    output.push_str(&format!("Joined: {}\n", profile.joined_label()));
    output.push_str(&format!("Bio: {}\n", profile.bio));

    if !profile.headline_stats.is_empty() {
        output.push_str("\nStats:\n");
        for (label, value) in &profile.headline_stats {
            output.push_str(&format!("  {}: {}\n", label, value));
        }
    }

    if !profile.showcase.is_empty() {
        output.push_str("\nShowcase:\n");
        for item in &profile.showcase {
            output.push_str(&format!("  [{}] {}", item.kind, item.label));
            if let Some(date) = item.date {
                output.push_str(&format!(" [ {} ]", date));
            }
            if let Some(ref url) = item.url {
                output.push_str(&format!(" {}", url));
            }
            output.push('\n');
        }
    }

    output.push_str("\nContest Rating:\n");
    match chart.current_data() {
        Some(point) => {
            output.push_str(&format!("  {}\n", describe_point(point, zone)));
            if let Some([first, last]) = chart.axis_ticks() {
                output.push_str(&format!(
                    "  {} contests, {} .. {}\n",
                    chart.series().len(),
                    first,
                    last
                ));
            }
        }
        None => output.push_str("  Rating data not available.\n"),
    }

    output.push_str(&format!(
        "\nSubmissions (last {} days): {} total, {} active days\n",
        profile.heatmap.len(),
        total_count(profile),
        profile.heatmap.iter().filter(|c| c.count > 0).count()
    ));
    for row in render_calendar(&profile.heatmap) {
        output.push_str(&format!("  {}\n", row));
    }

    output
}

fn format_markdown(session: &Session, zone: CalendarZone) -> String {
    let (profile, chart) = match session.view() {
        View::Ready { outcome, chart } => match outcome.profile() {
            Some(profile) => (profile, chart),
            None => return "**User data not available.**\n".to_string(),
        },
        View::Failed(FetchOutcome::NotFound(msg)) => return format!("**{}**\n", msg),
        View::Failed(_) => return "**User data not available.**\n".to_string(),
        View::Home | View::Loading { .. } => return String::new(),
    };

    let mut output = String::new();

    output.push_str(&format!(
        "# {} Profile: {}\n\n",
        profile.platform, profile.username
    ));
    output.push_str(&format!("**Name:** {}\n\n", profile.display_name));
    output.push_str(&format!("**Joined:** {}\n\n", profile.joined_label()));
    output.push_str(&format!("> {}\n\n", profile.bio));

    if !profile.headline_stats.is_empty() {
        output.push_str("## Stats\n\n");
        output.push_str("| Metric | Value |\n|--------|-------|\n");
        for (label, value) in &profile.headline_stats {
            output.push_str(&format!("| {} | {} |\n", label, value));
        }
    }

    if !profile.showcase.is_empty() {
        output.push_str("\n## Showcase\n\n");
        for item in &profile.showcase {
            match item.url {
                Some(ref url) => {
                    output.push_str(&format!("- **{}**: [{}]({})\n", item.kind, item.label, url))
                }
                None => output.push_str(&format!("- **{}**: {}\n", item.kind, item.label)),
            }
        }
    }

    output.push_str("\n## Contest Rating\n\n");
    write_series_table(&mut output, chart, zone);

    output.push_str(&format!(
        "\n## Submissions\n\n{} submissions over {} days\n\n```\n",
        total_count(profile),
        profile.heatmap.len()
    ));
    for row in render_calendar(&profile.heatmap) {
        output.push_str(&row);
        output.push('\n');
    }
    output.push_str("```\n");

    output
}

fn write_series_table(output: &mut String, chart: &ChartInteraction, zone: CalendarZone) {
    let Some(current) = chart.current_data() else {
        output.push_str("Rating data not available.\n");
        return;
    };

    output.push_str(&format!("**Current:** {}\n\n", describe_point(current, zone)));
    output.push_str("| Date | Contest | Rating | Trend | Rank |\n");
    output.push_str("|------|---------|--------|-------|------|\n");
    for point in chart.series() {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            format_timestamp(point.timestamp, zone),
            point.title,
            point.rating.round(),
            point.direction.arrow(),
            point.rank.map(|r| r.to_string()).unwrap_or_default()
        ));
    }
}

fn describe_point(point: &SeriesPoint, zone: CalendarZone) -> String {
    let mut line = format!(
        "{} {}  {}  {}",
        point.rating.round(),
        point.direction.arrow(),
        format_timestamp(point.timestamp, zone),
        point.title
    );
    if let Some(rank) = point.rank {
        line.push_str(&format!("  Rank: {}", rank));
    }
    if let (Some(solved), Some(total)) = (point.problems_solved, point.total_problems) {
        line.push_str(&format!("  Solved: {} / {}", solved, total));
    }
    line
}

/// Calendar date of `secs` in the same zone that produced the year labels.
fn format_timestamp(secs: i64, zone: CalendarZone) -> String {
    zone.day_of_epoch(secs)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

fn total_count(profile: &NormalizedProfile) -> u64 {
    profile.heatmap.iter().map(|c| c.count as u64).sum()
}

/// One row per weekday, one column per week, one glyph per severity tier.
fn render_calendar(cells: &[HeatmapCell]) -> Vec<String> {
    let Some(first) = cells.first() else {
        return Vec::new();
    };
    let offset = first.date.weekday().num_days_from_sunday() as usize;

    let mut rows: Vec<String> = WEEKDAYS.iter().map(|d| format!("{} ", d)).collect();
    for row in rows.iter_mut().take(offset) {
        row.push(' ');
    }
    for (i, cell) in cells.iter().enumerate() {
        rows[(offset + i) % 7].push(cell.severity().glyph());
    }
    rows
}
