use crate::statsbomb::RawEvent;

/// One event with its compound location fields flattened into plain
/// columns. Only rows with a named player survive expansion; everything
/// downstream (player list, filter, plot) works on these.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub event_type: String,
    pub player: String,
    pub team: String,
    pub period: u8,
    pub minute: u16,
    pub second: u8,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub pass_end_x: Option<f32>,
    pub pass_end_y: Option<f32>,
    pub carry_end_x: Option<f32>,
    pub carry_end_y: Option<f32>,
}

/// Action types offered in the dropdown. Events of other types still pass
/// through expansion; they just cannot be selected.
pub const ACTION_TYPES: [&str; 12] = [
    "Pass",
    "Carry",
    "Ball Receipt*",
    "Shot",
    "Duel",
    "Interception",
    "Clearance",
    "Foul Won",
    "Block",
    "Ball Recovery",
    "Dribble",
    "Miscontrol",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateChoice {
    Start,
    End,
}

impl CoordinateChoice {
    pub fn label(self) -> &'static str {
        match self {
            CoordinateChoice::Start => "Start",
            CoordinateChoice::End => "End",
        }
    }
}

/// The End option only exists for actions that carry an end location in
/// the event data.
pub fn location_choices(event_type: &str) -> &'static [CoordinateChoice] {
    if event_type == "Pass" || event_type == "Carry" {
        &[CoordinateChoice::Start, CoordinateChoice::End]
    } else {
        &[CoordinateChoice::Start]
    }
}

pub fn expand_events(raw: Vec<RawEvent>) -> Vec<EventRecord> {
    raw.into_iter().filter_map(expand_event).collect()
}

fn expand_event(raw: RawEvent) -> Option<EventRecord> {
    let player = raw.player?.name;
    let (x, y) = split_pair(raw.location);
    let (pass_end_x, pass_end_y) = split_pair(raw.pass.and_then(|p| p.end_location));
    let (carry_end_x, carry_end_y) = split_pair(raw.carry.and_then(|c| c.end_location));
    Some(EventRecord {
        event_type: raw.event_type.name,
        player,
        team: raw.team.map(|t| t.name).unwrap_or_default(),
        period: raw.period,
        minute: raw.minute,
        second: raw.second,
        x,
        y,
        pass_end_x,
        pass_end_y,
        carry_end_x,
        carry_end_y,
    })
}

fn split_pair(pair: Option<[f32; 2]>) -> (Option<f32>, Option<f32>) {
    match pair {
        Some([x, y]) => (Some(x), Some(y)),
        None => (None, None),
    }
}

/// Unique player names in first-appearance order.
pub fn player_names(records: &[EventRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        if !names.iter().any(|name| name == &record.player) {
            names.push(record.player.clone());
        }
    }
    names
}

/// Rows matching the selected player and action type, in input order.
/// An empty result is a normal outcome, not an error.
pub fn filter_events<'a>(
    records: &'a [EventRecord],
    player: &str,
    event_type: &str,
) -> Vec<&'a EventRecord> {
    records
        .iter()
        .filter(|record| record.player == player && record.event_type == event_type)
        .collect()
}

/// Coordinate pair to plot for one filtered row. Pass+End and Carry+End
/// read the respective end columns; every other combination reads the
/// start location. Rows missing the chosen pair yield None and are
/// skipped by the plot.
pub fn select_coordinates(
    record: &EventRecord,
    event_type: &str,
    choice: CoordinateChoice,
) -> Option<(f32, f32)> {
    let (x, y) = match (event_type, choice) {
        ("Pass", CoordinateChoice::End) => (record.pass_end_x, record.pass_end_y),
        ("Carry", CoordinateChoice::End) => (record.carry_end_x, record.carry_end_y),
        _ => (record.x, record.y),
    };
    Some((x?, y?))
}

/// The full coordinate set for a filtered selection, ready for density
/// estimation.
pub fn plot_points(
    records: &[&EventRecord],
    event_type: &str,
    choice: CoordinateChoice,
) -> Vec<(f32, f32)> {
    records
        .iter()
        .filter_map(|record| select_coordinates(record, event_type, choice))
        .collect()
}
