#![allow(dead_code)]

use chrono::NaiveDate;
use prop_edge::feed::snapshot::SignalSnapshot;
use prop_edge::feed::types::{
    Game, GameLog, Injury, InjuryStatus, Player, PlayerId, Prop, StatCategory, UNKNOWN_TEAM,
};

pub fn slate_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

pub const TATUM: PlayerId = 7;
pub const WHITE: PlayerId = 9;
pub const BENCH: PlayerId = 12;
pub const LEBRON: PlayerId = 23;

fn player(id: PlayerId, name: &str, team: &str, position: &str) -> Player {
    Player {
        id,
        name: name.to_string(),
        team_abbr: team.to_string(),
        position: position.to_string(),
    }
}

/// Fifteen games, most recent first, alternating home/away and hitting
/// LAL three times.
fn logs(minutes: impl Fn(usize) -> f64, points: [u32; 2], rebounds: [u32; 2]) -> Vec<GameLog> {
    (0..15)
        .map(|i| GameLog {
            game_id: format!("prev{}", i),
            game_date: slate_date() - chrono::Duration::days(2 * (i as i64 + 1)),
            opponent_abbr: if i % 5 == 0 { "LAL" } else { "NYK" }.to_string(),
            is_home: i % 2 == 0,
            minutes: minutes(i),
            points: points[i % 2],
            rebounds: rebounds[i % 2],
            assists: 4,
            fg3m: 2,
            fga: 18,
            steals: 1,
            blocks: 0,
            started: true,
            team_won: i % 3 != 0,
        })
        .collect()
}

fn prop(name: &str, category: StatCategory, line: f64) -> Prop {
    Prop {
        player_id: None,
        player_name: name.to_string(),
        team_abbr: UNKNOWN_TEAM.to_string(),
        opponent_abbr: UNKNOWN_TEAM.to_string(),
        game_id: "0022400555".to_string(),
        category,
        line,
        over_price: -110,
        under_price: -110,
        book: "DraftKings".to_string(),
        is_home: false,
    }
}

/// BOS at LAL with Anthony Davis out. BOS players get the injury edge,
/// LAL players get nothing, and the BOS bench guard fails the minutes gate.
pub fn slate() -> SignalSnapshot {
    let mut s = SignalSnapshot::empty(slate_date());
    s.games.push(Game {
        id: "0022400555".to_string(),
        date: slate_date(),
        home_team_abbr: "LAL".to_string(),
        away_team_abbr: "BOS".to_string(),
        total: Some(229.5),
        spread: Some(-3.5),
    });
    s.players = vec![
        player(TATUM, "Jayson Tatum", "BOS", "F"),
        player(WHITE, "Derrick White", "BOS", "G"),
        player(BENCH, "Bench Guard", "BOS", "G"),
        player(LEBRON, "LeBron James", "LAL", "F"),
    ];
    s.game_logs.insert(TATUM, logs(|i| 35.0 + (i % 2) as f64 * 2.0, [26, 28], [8, 9]));
    s.game_logs.insert(WHITE, logs(|i| 31.0 + (i % 3) as f64, [15, 17], [5, 6]));
    s.game_logs.insert(
        BENCH,
        logs(|i| if i == 1 { 0.0 } else { 14.0 }, [6, 8], [2, 3]),
    );
    s.game_logs.insert(LEBRON, logs(|_| 35.0, [24, 26], [7, 8]));
    s.injuries.insert(
        "LAL".to_string(),
        vec![Injury {
            player_id: None,
            player_name: "Anthony Davis".to_string(),
            team_abbr: "LAL".to_string(),
            status: InjuryStatus::Out,
            injury_type: "ankle".to_string(),
            usage_rate: 28.0,
            minutes_per_game: 34.0,
            notes: "starting center, rim protector".to_string(),
        }],
    );
    s.props = vec![
        prop("Jayson Tatum", StatCategory::Points, 25.5),
        prop("Derrick White", StatCategory::Rebounds, 4.5),
        prop("Bench Guard", StatCategory::Points, 6.5),
        prop("LeBron James", StatCategory::Points, 24.5),
    ];
    s
}
