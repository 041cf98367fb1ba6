use std::collections::VecDeque;

use crate::colormap::{ColorMap, Rgb};
use crate::events::{
    filter_events, location_choices, player_names, plot_points, CoordinateChoice, EventRecord,
    ACTION_TYPES,
};
use crate::statsbomb::{Competition, MatchRow};

const LOG_CAPACITY: usize = 200;

pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0x31, 0x36, 0x39);
pub const DEFAULT_LINE: Rgb = Rgb::new(0xc3, 0xc3, 0xc3);
pub const DEFAULT_HEAT1: Rgb = Rgb::new(0x8a, 0xce, 0x00);
pub const DEFAULT_HEAT2: Rgb = Rgb::new(0xd7, 0xff, 0x85);
pub const DEFAULT_HEAT3: Rgb = Rgb::new(0xff, 0xff, 0xff);

/// Sidebar controls, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Competition,
    Match,
    Player,
    ActionType,
    Location,
    Color(ColorSlot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSlot {
    Background,
    Line,
    Heat1,
    Heat2,
    Heat3,
}

impl ColorSlot {
    pub const ALL: [ColorSlot; 5] = [
        ColorSlot::Background,
        ColorSlot::Line,
        ColorSlot::Heat1,
        ColorSlot::Heat2,
        ColorSlot::Heat3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColorSlot::Background => "Background",
            ColorSlot::Line => "Line",
            ColorSlot::Heat1 => "Heatmap 1",
            ColorSlot::Heat2 => "Heatmap 2",
            ColorSlot::Heat3 => "Heatmap 3",
        }
    }

    fn index(self) -> usize {
        match self {
            ColorSlot::Background => 0,
            ColorSlot::Line => 1,
            ColorSlot::Heat1 => 2,
            ColorSlot::Heat2 => 3,
            ColorSlot::Heat3 => 4,
        }
    }
}

const FOCUS_ORDER: [Control; 10] = [
    Control::Competition,
    Control::Match,
    Control::Player,
    Control::ActionType,
    Control::Location,
    Control::Color(ColorSlot::Background),
    Control::Color(ColorSlot::Line),
    Control::Color(ColorSlot::Heat1),
    Control::Color(ColorSlot::Heat2),
    Control::Color(ColorSlot::Heat3),
];

/// Fetch requests the UI thread sends to the fetcher thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    FetchCompetitions,
    FetchMatches {
        competition_id: u32,
        season_id: u32,
    },
    FetchEvents {
        match_id: u64,
    },
}

/// Results the fetcher thread sends back. Matches and events carry the
/// ids they were fetched for so stale responses can be dropped after the
/// selection has moved on.
#[derive(Debug)]
pub enum Delta {
    Competitions(Vec<Competition>),
    Matches {
        competition_id: u32,
        season_id: u32,
        rows: Vec<MatchRow>,
    },
    Events {
        match_id: u64,
        records: Vec<EventRecord>,
    },
    FetchFailed {
        command: ProviderCommand,
        error: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub competitions: Vec<Competition>,
    pub competitions_loading: bool,
    pub competitions_failed: bool,
    pub matches: Vec<MatchRow>,
    pub matches_loading: bool,
    pub matches_failed: bool,
    pub matches_for: Option<(u32, u32)>,
    pub events: Vec<EventRecord>,
    pub events_loading: bool,
    pub events_failed: bool,
    pub events_for: Option<u64>,
    pub players: Vec<String>,

    pub competition_idx: usize,
    pub match_idx: usize,
    pub player_idx: usize,
    pub action_type_idx: usize,
    pub location: CoordinateChoice,
    pub colors: [Rgb; 5],

    pub focus: Control,
    pub color_entry: Option<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            competitions: Vec::new(),
            competitions_loading: false,
            competitions_failed: false,
            matches: Vec::new(),
            matches_loading: false,
            matches_failed: false,
            matches_for: None,
            events: Vec::new(),
            events_loading: false,
            events_failed: false,
            events_for: None,
            players: Vec::new(),
            competition_idx: 0,
            match_idx: 0,
            player_idx: 0,
            action_type_idx: 0,
            location: CoordinateChoice::Start,
            colors: [
                DEFAULT_BACKGROUND,
                DEFAULT_LINE,
                DEFAULT_HEAT1,
                DEFAULT_HEAT2,
                DEFAULT_HEAT3,
            ],
            focus: Control::Competition,
            color_entry: None,
            logs: VecDeque::with_capacity(LOG_CAPACITY),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn focus_next(&mut self) {
        self.focus = FOCUS_ORDER[(self.focus_pos() + 1) % FOCUS_ORDER.len()];
    }

    pub fn focus_prev(&mut self) {
        let pos = self.focus_pos();
        self.focus = FOCUS_ORDER[(pos + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len()];
    }

    fn focus_pos(&self) -> usize {
        FOCUS_ORDER
            .iter()
            .position(|control| *control == self.focus)
            .unwrap_or(0)
    }

    pub fn selected_competition(&self) -> Option<&Competition> {
        self.competitions.get(self.competition_idx)
    }

    pub fn selected_match(&self) -> Option<&MatchRow> {
        self.matches.get(self.match_idx)
    }

    pub fn selected_player(&self) -> Option<&str> {
        self.players.get(self.player_idx).map(String::as_str)
    }

    pub fn action_type(&self) -> &'static str {
        ACTION_TYPES[self.action_type_idx.min(ACTION_TYPES.len() - 1)]
    }

    pub fn color(&self, slot: ColorSlot) -> Rgb {
        self.colors[slot.index()]
    }

    pub fn set_color(&mut self, slot: ColorSlot, color: Rgb) {
        self.colors[slot.index()] = color;
    }

    /// Gradient for the density overlay: background plus the three heat
    /// stops, lowest density to highest.
    pub fn colormap(&self) -> ColorMap {
        ColorMap::from_stops([
            self.color(ColorSlot::Background),
            self.color(ColorSlot::Heat1),
            self.color(ColorSlot::Heat2),
            self.color(ColorSlot::Heat3),
        ])
    }

    /// Cycle the focused control's value by `step`. Selection changes
    /// invalidate everything downstream of them; the fetch reconciler in
    /// the main loop notices and issues the refetch.
    pub fn cycle_value(&mut self, step: isize) {
        match self.focus {
            Control::Competition => {
                let next = cycle_index(self.competition_idx, self.competitions.len(), step);
                if next != self.competition_idx {
                    self.competition_idx = next;
                    self.clear_matches();
                }
            }
            Control::Match => {
                let next = cycle_index(self.match_idx, self.matches.len(), step);
                if next != self.match_idx {
                    self.match_idx = next;
                    self.clear_events();
                }
            }
            Control::Player => {
                self.player_idx = cycle_index(self.player_idx, self.players.len(), step);
            }
            Control::ActionType => {
                self.action_type_idx = cycle_index(self.action_type_idx, ACTION_TYPES.len(), step);
                self.constrain_location();
            }
            Control::Location => {
                let choices = location_choices(self.action_type());
                let pos = choices
                    .iter()
                    .position(|choice| *choice == self.location)
                    .unwrap_or(0);
                self.location = choices[cycle_index(pos, choices.len(), step)];
            }
            Control::Color(slot) => {
                let presets = color_presets(slot);
                let pos = presets
                    .iter()
                    .position(|preset| *preset == self.color(slot))
                    .unwrap_or(0);
                let next = presets[cycle_index(pos, presets.len(), step)];
                self.set_color(slot, next);
            }
        }
    }

    /// Offered location options for the current action type.
    pub fn location_choices(&self) -> &'static [CoordinateChoice] {
        location_choices(self.action_type())
    }

    // End is only meaningful for Pass/Carry; fall back to Start whenever
    // the action type stops offering it.
    fn constrain_location(&mut self) {
        if !self.location_choices().contains(&self.location) {
            self.location = CoordinateChoice::Start;
        }
    }

    fn clear_matches(&mut self) {
        self.matches.clear();
        self.matches_for = None;
        self.matches_failed = false;
        self.match_idx = 0;
        self.clear_events();
    }

    fn clear_events(&mut self) {
        self.events.clear();
        self.events_for = None;
        self.events_failed = false;
        self.players.clear();
        self.player_idx = 0;
    }

    /// The fetch the current selection still needs, if any. The main loop
    /// polls this after every state change and forwards it to the fetcher
    /// thread. A stage that is in flight or already failed is not
    /// re-requested; a failed stage stays down until the selection
    /// changes or the user asks for a refetch.
    pub fn wanted_fetch(&self) -> Option<ProviderCommand> {
        if self.competitions.is_empty() {
            if self.competitions_loading || self.competitions_failed {
                return None;
            }
            return Some(ProviderCommand::FetchCompetitions);
        }
        let comp = self.selected_competition()?;
        let key = (comp.competition_id, comp.season_id);
        if self.matches_for != Some(key) {
            if self.matches_loading || self.matches_failed {
                return None;
            }
            return Some(ProviderCommand::FetchMatches {
                competition_id: key.0,
                season_id: key.1,
            });
        }
        let row = self.selected_match()?;
        if self.events_for != Some(row.match_id) {
            if self.events_loading || self.events_failed {
                return None;
            }
            return Some(ProviderCommand::FetchEvents {
                match_id: row.match_id,
            });
        }
        None
    }

    pub fn mark_loading(&mut self, command: &ProviderCommand) {
        match command {
            ProviderCommand::FetchCompetitions => self.competitions_loading = true,
            ProviderCommand::FetchMatches { .. } => self.matches_loading = true,
            ProviderCommand::FetchEvents { .. } => self.events_loading = true,
        }
    }

    /// Filtered rows for the current player/action selection.
    pub fn filtered(&self) -> Vec<&EventRecord> {
        let Some(player) = self.selected_player() else {
            return Vec::new();
        };
        filter_events(&self.events, player, self.action_type())
    }

    /// Coordinates feeding the density overlay for the current selection.
    pub fn heat_points(&self) -> Vec<(f32, f32)> {
        plot_points(&self.filtered(), self.action_type(), self.location)
    }

    pub fn begin_color_entry(&mut self) {
        if matches!(self.focus, Control::Color(_)) {
            self.color_entry = Some(String::new());
        }
    }

    pub fn color_entry_push(&mut self, ch: char) {
        let Some(entry) = self.color_entry.as_mut() else {
            return;
        };
        if entry.len() < 7 && (ch == '#' || ch.is_ascii_hexdigit()) {
            entry.push(ch);
        }
    }

    pub fn color_entry_backspace(&mut self) {
        if let Some(entry) = self.color_entry.as_mut() {
            entry.pop();
        }
    }

    pub fn commit_color_entry(&mut self) {
        let Some(entry) = self.color_entry.take() else {
            return;
        };
        let Control::Color(slot) = self.focus else {
            return;
        };
        match Rgb::parse_hex(&entry) {
            Some(color) => self.set_color(slot, color),
            None => self.push_log(format!("[WARN] Not a hex color: {entry}")),
        }
    }

    pub fn cancel_color_entry(&mut self) {
        self.color_entry = None;
    }
}

fn cycle_index(current: usize, len: usize, step: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    let next = (current as isize + step).rem_euclid(len);
    next as usize
}

fn color_presets(slot: ColorSlot) -> &'static [Rgb] {
    const BACKGROUND: [Rgb; 4] = [
        DEFAULT_BACKGROUND,
        Rgb::new(0x0e, 0x1a, 0x12),
        Rgb::new(0x1b, 0x1b, 0x2f),
        Rgb::new(0xf5, 0xf5, 0xf0),
    ];
    const LINE: [Rgb; 4] = [
        DEFAULT_LINE,
        Rgb::new(0xff, 0xff, 0xff),
        Rgb::new(0x5a, 0x5a, 0x5a),
        Rgb::new(0x2d, 0x2d, 0x2d),
    ];
    const HEAT1: [Rgb; 4] = [
        DEFAULT_HEAT1,
        Rgb::new(0x00, 0x4d, 0x40),
        Rgb::new(0x4a, 0x14, 0x8c),
        Rgb::new(0x8b, 0x00, 0x00),
    ];
    const HEAT2: [Rgb; 4] = [
        DEFAULT_HEAT2,
        Rgb::new(0x26, 0xa6, 0x9a),
        Rgb::new(0xab, 0x47, 0xbc),
        Rgb::new(0xff, 0x45, 0x00),
    ];
    const HEAT3: [Rgb; 4] = [
        DEFAULT_HEAT3,
        Rgb::new(0xe0, 0xf2, 0xf1),
        Rgb::new(0xf3, 0xe5, 0xf5),
        Rgb::new(0xff, 0xd7, 0x00),
    ];
    match slot {
        ColorSlot::Background => &BACKGROUND,
        ColorSlot::Line => &LINE,
        ColorSlot::Heat1 => &HEAT1,
        ColorSlot::Heat2 => &HEAT2,
        ColorSlot::Heat3 => &HEAT3,
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Competitions(rows) => {
            state.competitions_loading = false;
            state.competitions_failed = false;
            state.competition_idx = 0;
            state.competitions = rows;
            state.clear_matches();
            state.push_log(format!(
                "[INFO] Loaded {} competition seasons",
                state.competitions.len()
            ));
        }
        Delta::Matches {
            competition_id,
            season_id,
            rows,
        } => {
            state.matches_loading = false;
            state.matches_failed = false;
            let wanted = state
                .selected_competition()
                .map(|comp| (comp.competition_id, comp.season_id));
            if wanted != Some((competition_id, season_id)) {
                return;
            }
            state.match_idx = 0;
            state.matches = rows;
            state.matches_for = Some((competition_id, season_id));
            state.clear_events();
            state.push_log(format!("[INFO] Loaded {} matches", state.matches.len()));
        }
        Delta::Events { match_id, records } => {
            state.events_loading = false;
            state.events_failed = false;
            if state.selected_match().map(|row| row.match_id) != Some(match_id) {
                return;
            }
            state.players = player_names(&records);
            state.player_idx = 0;
            state.events = records;
            state.events_for = Some(match_id);
            state.push_log(format!(
                "[INFO] Loaded {} events, {} players",
                state.events.len(),
                state.players.len()
            ));
        }
        Delta::FetchFailed { command, error } => {
            match command {
                ProviderCommand::FetchCompetitions => {
                    state.competitions_loading = false;
                    state.competitions_failed = true;
                }
                ProviderCommand::FetchMatches { .. } => {
                    state.matches_loading = false;
                    state.matches_failed = true;
                }
                ProviderCommand::FetchEvents { .. } => {
                    state.events_loading = false;
                    state.events_failed = true;
                }
            }
            state.push_log(format!("[WARN] {error} (press r to retry)"));
        }
        Delta::Log(line) => state.push_log(line),
    }
}
