use pitchheat_terminal::colormap::Rgb;
use pitchheat_terminal::events::{CoordinateChoice, EventRecord};
use pitchheat_terminal::state::{
    apply_delta, AppState, ColorSlot, Control, Delta, DEFAULT_BACKGROUND, DEFAULT_HEAT3,
};
use pitchheat_terminal::statsbomb::{Competition, MatchRow};

fn competition(id: u32, season_id: u32, name: &str) -> Competition {
    Competition {
        competition_id: id,
        season_id,
        competition_name: name.to_string(),
        season_name: "2019/2020".to_string(),
        country_name: String::new(),
        competition_gender: String::new(),
    }
}

fn match_row(match_id: u64, date: &str) -> MatchRow {
    MatchRow {
        match_id,
        home_team: "Home".to_string(),
        away_team: "Away".to_string(),
        match_date: date.to_string(),
        kick_off: String::new(),
        home_score: None,
        away_score: None,
        stadium: String::new(),
    }
}

fn pass_record(player: &str, x: f32, y: f32, end: Option<(f32, f32)>) -> EventRecord {
    EventRecord {
        event_type: "Pass".to_string(),
        player: player.to_string(),
        team: "Home".to_string(),
        period: 1,
        minute: 12,
        second: 0,
        x: Some(x),
        y: Some(y),
        pass_end_x: end.map(|e| e.0),
        pass_end_y: end.map(|e| e.1),
        carry_end_x: None,
        carry_end_y: None,
    }
}

fn loaded_state() -> AppState {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::Competitions(vec![
            competition(11, 42, "La Liga"),
            competition(2, 27, "Premier League"),
        ]),
    );
    apply_delta(
        &mut state,
        Delta::Matches {
            competition_id: 11,
            season_id: 42,
            rows: vec![match_row(1, "2019-12-18"), match_row(2, "2020-03-01")],
        },
    );
    apply_delta(
        &mut state,
        Delta::Events {
            match_id: 1,
            records: vec![
                pass_record("A", 10.0, 20.0, Some((50.0, 60.0))),
                pass_record("B", 5.0, 5.0, None),
            ],
        },
    );
    state
}

#[test]
fn cycling_competition_clears_downstream_selection() {
    let mut state = loaded_state();
    assert!(!state.matches.is_empty());
    assert!(!state.events.is_empty());

    state.focus = Control::Competition;
    state.cycle_value(1);

    assert_eq!(state.competition_idx, 1);
    assert!(state.matches.is_empty());
    assert!(state.events.is_empty());
    assert!(state.players.is_empty());
    assert_eq!(state.match_idx, 0);
    assert_eq!(state.player_idx, 0);
}

#[test]
fn cycling_wraps_around() {
    let mut state = loaded_state();
    state.focus = Control::Competition;
    state.cycle_value(-1);
    assert_eq!(state.competition_idx, 1);
    state.cycle_value(1);
    assert_eq!(state.competition_idx, 0);
}

#[test]
fn cycling_on_empty_lists_is_a_no_op() {
    let mut state = AppState::new();
    state.focus = Control::Match;
    state.cycle_value(1);
    assert_eq!(state.match_idx, 0);
    state.focus = Control::Player;
    state.cycle_value(-1);
    assert_eq!(state.player_idx, 0);
}

#[test]
fn leaving_pass_or_carry_resets_location_to_start() {
    let mut state = loaded_state();
    assert_eq!(state.action_type(), "Pass");
    state.location = CoordinateChoice::End;

    // Pass -> Carry keeps End available.
    state.focus = Control::ActionType;
    state.cycle_value(1);
    assert_eq!(state.action_type(), "Carry");
    assert_eq!(state.location, CoordinateChoice::End);

    // Carry -> Ball Receipt* only offers Start.
    state.cycle_value(1);
    assert_eq!(state.action_type(), "Ball Receipt*");
    assert_eq!(state.location, CoordinateChoice::Start);
    assert_eq!(state.location_choices(), &[CoordinateChoice::Start]);
}

#[test]
fn heat_points_follow_the_selection() {
    let mut state = loaded_state();
    assert_eq!(state.selected_player(), Some("A"));
    assert_eq!(state.action_type(), "Pass");

    assert_eq!(state.heat_points(), vec![(10.0, 20.0)]);

    state.location = CoordinateChoice::End;
    assert_eq!(state.heat_points(), vec![(50.0, 60.0)]);

    // B's pass has no end location; End plotting yields nothing, which
    // downstream rendering treats as a bare pitch.
    state.focus = Control::Player;
    state.cycle_value(1);
    assert_eq!(state.selected_player(), Some("B"));
    assert!(state.heat_points().is_empty());
}

#[test]
fn colormap_uses_background_and_heat_stops() {
    let state = AppState::new();
    let cmap = state.colormap();
    assert_eq!(cmap.sample(0.0), DEFAULT_BACKGROUND);
    assert_eq!(cmap.sample(1.0), DEFAULT_HEAT3);
}

#[test]
fn hex_entry_commits_valid_input() {
    let mut state = AppState::new();
    state.focus = Control::Color(ColorSlot::Heat1);
    state.begin_color_entry();
    for ch in "#ff8800".chars() {
        state.color_entry_push(ch);
    }
    state.commit_color_entry();
    assert_eq!(state.color(ColorSlot::Heat1), Rgb::new(0xff, 0x88, 0x00));
    assert_eq!(state.color_entry, None);
}

#[test]
fn hex_entry_rejects_garbage_and_keeps_old_color() {
    let mut state = AppState::new();
    let before = state.color(ColorSlot::Line);
    state.focus = Control::Color(ColorSlot::Line);
    state.begin_color_entry();
    for ch in "#12".chars() {
        state.color_entry_push(ch);
    }
    state.commit_color_entry();
    assert_eq!(state.color(ColorSlot::Line), before);
    assert!(state
        .logs
        .back()
        .is_some_and(|line| line.starts_with("[WARN]")));
}

#[test]
fn hex_entry_filters_non_hex_characters() {
    let mut state = AppState::new();
    state.focus = Control::Color(ColorSlot::Background);
    state.begin_color_entry();
    for ch in "#1z2x3c45b6".chars() {
        state.color_entry_push(ch);
    }
    // Non-hex characters are ignored and the buffer caps at 7 chars.
    assert_eq!(state.color_entry.as_deref(), Some("#123c45"));
}
