use super::projection;
use super::types::{Edge, PropAnalysis};
use crate::config::ProjectionConfig;
use crate::feed::snapshot::SignalSnapshot;
use crate::feed::types::{Player, Prop, UNKNOWN_TEAM};
use std::collections::BTreeMap;

/// Edges grouped by the team they benefit. Edges without a team can't be
/// attached to any prop and are dropped here.
pub fn index_edges_by_team(edges: &[Edge]) -> BTreeMap<&str, Vec<&Edge>> {
    let mut index: BTreeMap<&str, Vec<&Edge>> = BTreeMap::new();
    for edge in edges {
        if let Some(team) = edge.team_abbr() {
            index.entry(team).or_default().push(edge);
        }
    }
    index
}

/// Props grouped by player name, with `UNK` teams backfilled from the roster
/// and the player id filled in when the book omitted it. Each player's props
/// are ordered by category, book and line.
pub fn index_props_by_player(props: &[Prop], snapshot: &SignalSnapshot) -> BTreeMap<String, Vec<Prop>> {
    let mut index: BTreeMap<String, Vec<Prop>> = BTreeMap::new();
    for prop in props {
        let mut prop = prop.clone();
        if let Some(player) = snapshot.player_by_name(&prop.player_name) {
            if !prop.has_known_team() {
                prop.team_abbr = player.team_abbr.clone();
            }
            prop.player_id.get_or_insert(player.id);
        }
        index.entry(prop.player_name.clone()).or_default().push(prop);
    }
    for props in index.values_mut() {
        props.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.book.cmp(&b.book))
                .then_with(|| a.line.total_cmp(&b.line))
        });
    }

    let with_team = index
        .values()
        .filter(|props| props.iter().any(Prop::has_known_team))
        .count();
    tracing::info!(players = index.len(), with_team, "indexed props by player");
    index
}

/// Edges that move this prop: category matches under the compound policy and,
/// for player-targeted edges, the prop's player is the one named.
pub fn edges_for_prop<'a>(prop: &Prop, team_edges: &[&'a Edge]) -> Vec<&'a Edge> {
    team_edges
        .iter()
        .copied()
        .filter(|e| e.matches(prop.category) && e.applies_to(prop.player_id))
        .collect()
}

fn resolve_player(prop: &Prop, snapshot: &SignalSnapshot) -> Player {
    prop.player_id
        .and_then(|id| snapshot.player_by_id(id))
        .or_else(|| snapshot.player_by_name(&prop.player_name))
        .cloned()
        .unwrap_or_else(|| Player {
            id: prop.player_id.unwrap_or_default(),
            name: prop.player_name.clone(),
            team_abbr: prop.team_abbr.clone(),
            position: String::new(),
        })
}

/// Attach edges to props and build one analysis per prop with at least one
/// matching edge. Output order follows team then player name, so it never
/// depends on the order providers returned data in.
pub fn match_edges_to_props(
    edges: &[Edge],
    props: &[Prop],
    snapshot: &SignalSnapshot,
    cfg: &ProjectionConfig,
) -> Vec<PropAnalysis> {
    let edges_by_team = index_edges_by_team(edges);
    let props_by_player = index_props_by_player(props, snapshot);
    let mut analyses = Vec::new();

    for (team, team_edges) in &edges_by_team {
        let Some(game) = snapshot.game_for_team(team) else {
            tracing::debug!(team, "team with edges is not on the slate");
            continue;
        };
        let Some(opponent) = game.opponent_of(team) else {
            continue;
        };

        for player_props in props_by_player.values() {
            for prop in player_props.iter().filter(|p| p.team_abbr == *team) {
                let matched = edges_for_prop(prop, team_edges);
                if matched.is_empty() {
                    continue;
                }

                let mut prop = prop.clone();
                if !prop.opponent_abbr.is_empty() && prop.opponent_abbr != UNKNOWN_TEAM
                    && prop.opponent_abbr != opponent
                {
                    tracing::debug!(
                        player = %prop.player_name,
                        listed = %prop.opponent_abbr,
                        opponent,
                        "prop opponent disagrees with schedule, using schedule"
                    );
                }
                prop.opponent_abbr = opponent.to_string();
                prop.is_home = game.home_team_abbr == *team;

                let player = resolve_player(&prop, snapshot);
                let logs = prop
                    .player_id
                    .map(|id| snapshot.logs_for(id).to_vec())
                    .unwrap_or_default();
                let matched: Vec<Edge> = matched.into_iter().cloned().collect();
                let projection =
                    projection::project(prop.line, prop.category, &logs, &matched, cfg);
                let schedule = snapshot.schedules.get(*team).cloned();

                analyses.extend(PropAnalysis::new(
                    prop,
                    player,
                    game.clone(),
                    opponent.to_string(),
                    matched,
                    logs,
                    schedule,
                    projection,
                ));
            }
        }
    }

    tracing::info!(count = analyses.len(), "matched props to edges");
    analyses
}
