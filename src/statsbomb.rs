use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::http_client::http_client;

const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/statsbomb/open-data/master/data";

/// One row of `competitions.json`. Each (competition, season) pair is its
/// own row in the open data.
#[derive(Debug, Clone, Deserialize)]
pub struct Competition {
    pub competition_id: u32,
    pub season_id: u32,
    pub competition_name: String,
    pub season_name: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub competition_gender: String,
}

#[derive(Debug, Clone)]
pub struct MatchRow {
    pub match_id: u64,
    pub home_team: String,
    pub away_team: String,
    pub match_date: String,
    pub kick_off: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub stadium: String,
}

/// One row of `events/{match_id}.json`, limited to the fields the heatmap
/// pipeline reads. End locations stay nested under `pass`/`carry` on the
/// wire; `events::expand_events` flattens them.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub event_type: NameRef,
    pub team: Option<NameRef>,
    pub player: Option<PlayerRef>,
    pub location: Option<[f32; 2]>,
    #[serde(default)]
    pub period: u8,
    #[serde(default)]
    pub minute: u16,
    #[serde(default)]
    pub second: u8,
    pub pass: Option<PassDetail>,
    pub carry: Option<CarryDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerRef {
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassDetail {
    pub end_location: Option<[f32; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarryDetail {
    pub end_location: Option<[f32; 2]>,
}

pub fn fetch_competitions() -> Result<Vec<Competition>> {
    let client = http_client()?;
    let url = format!("{}/competitions.json", base_url());
    let body = fetch_body(client, &url).context("competitions request failed")?;
    parse_competitions_json(&body)
}

pub fn fetch_matches(competition_id: u32, season_id: u32) -> Result<Vec<MatchRow>> {
    let client = http_client()?;
    let url = format!("{}/matches/{competition_id}/{season_id}.json", base_url());
    let body = fetch_body(client, &url).context("matches request failed")?;
    parse_matches_json(&body)
}

pub fn fetch_events(match_id: u64) -> Result<Vec<RawEvent>> {
    let client = http_client()?;
    let url = format!("{}/events/{match_id}.json", base_url());
    let body = fetch_body(client, &url).context("events request failed")?;
    parse_events_json(&body)
}

fn base_url() -> String {
    match std::env::var("SB_DATA_BASE_URL") {
        Ok(base) if !base.trim().is_empty() => base.trim().trim_end_matches('/').to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

fn fetch_body(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .header(USER_AGENT, "pitchheat-terminal/0.1")
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

pub fn parse_competitions_json(raw: &str) -> Result<Vec<Competition>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid competitions json")
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let wire: Vec<WireMatch> = serde_json::from_str(trimmed).context("invalid matches json")?;
    Ok(wire.into_iter().map(build_match_row).collect())
}

pub fn parse_events_json(raw: &str) -> Result<Vec<RawEvent>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).context("invalid events json")
}

/// `"{competition_name} ({season_name})"`, the dropdown label for one
/// competition/season row.
pub fn competition_label(comp: &Competition) -> String {
    format!("{} ({})", comp.competition_name, comp.season_name)
}

/// `"{home_team} vs {away_team} ({match_date})"`.
pub fn match_label(row: &MatchRow) -> String {
    format!("{} vs {} ({})", row.home_team, row.away_team, row.match_date)
}

/// Header line for a selected match: date, kickoff time, score, stadium,
/// whichever of those the row actually carries.
pub fn match_header(row: &MatchRow) -> String {
    let mut parts = vec![format!("{} vs {}", row.home_team, row.away_team)];
    if let (Some(home), Some(away)) = (row.home_score, row.away_score) {
        parts.push(format!("{home}-{away}"));
    }
    parts.push(format_kickoff(&row.match_date, &row.kick_off));
    if !row.stadium.is_empty() {
        parts.push(row.stadium.clone());
    }
    parts.join(" | ")
}

fn format_kickoff(date: &str, kick_off: &str) -> String {
    let Ok(day) = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") else {
        return date.trim().to_string();
    };
    let time = NaiveTime::parse_from_str(kick_off.trim(), "%H:%M:%S%.3f")
        .or_else(|_| NaiveTime::parse_from_str(kick_off.trim(), "%H:%M:%S"))
        .ok();
    match time {
        Some(time) => format!("{} {}", day.format("%Y-%m-%d"), time.format("%H:%M")),
        None => day.format("%Y-%m-%d").to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    match_id: u64,
    #[serde(default)]
    match_date: String,
    #[serde(default)]
    kick_off: Option<String>,
    home_team: WireHomeTeam,
    away_team: WireAwayTeam,
    #[serde(default)]
    home_score: Option<u32>,
    #[serde(default)]
    away_score: Option<u32>,
    #[serde(default)]
    stadium: Option<WireStadium>,
}

#[derive(Debug, Deserialize)]
struct WireHomeTeam {
    home_team_name: String,
}

#[derive(Debug, Deserialize)]
struct WireAwayTeam {
    away_team_name: String,
}

#[derive(Debug, Deserialize)]
struct WireStadium {
    #[serde(default)]
    name: String,
}

fn build_match_row(wire: WireMatch) -> MatchRow {
    MatchRow {
        match_id: wire.match_id,
        home_team: wire.home_team.home_team_name,
        away_team: wire.away_team.away_team_name,
        match_date: wire.match_date,
        kick_off: wire.kick_off.unwrap_or_default(),
        home_score: wire.home_score,
        away_score: wire.away_score,
        stadium: wire.stadium.map(|s| s.name).unwrap_or_default(),
    }
}
