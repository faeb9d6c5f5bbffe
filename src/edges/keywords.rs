use crate::feed::types::{Injury, StatCategory};
use std::collections::BTreeSet;

/// One row of the injury inference table: when `applies` holds for the
/// sidelined player, every category in `stats` is affected.
pub struct InjuryRule {
    pub name: &'static str,
    pub applies: fn(&Injury) -> bool,
    pub stats: &'static [StatCategory],
}

const BIG_MAN_WORDS: [&str; 5] = ["center", "forward", "big", "rim", "paint"];
const PLAYMAKER_WORDS: [&str; 4] = ["guard", "point", "playmaker", "ball-handler"];

fn notes_mention(injury: &Injury, words: &[&str]) -> bool {
    let notes = injury.notes.to_lowercase();
    words.iter().any(|w| notes.contains(w))
}

/// Evaluated in order; results are unioned.
pub const INJURY_RULES: [InjuryRule; 3] = [
    InjuryRule {
        name: "high_usage",
        applies: |i| i.usage_rate >= 20.0,
        stats: &[
            StatCategory::Points,
            StatCategory::PtsRebsAsts,
            StatCategory::PtsAsts,
        ],
    },
    InjuryRule {
        name: "big_man",
        applies: |i| notes_mention(i, &BIG_MAN_WORDS),
        stats: &[
            StatCategory::Rebounds,
            StatCategory::PtsRebsAsts,
            StatCategory::PtsRebs,
            StatCategory::RebsAsts,
        ],
    },
    InjuryRule {
        name: "playmaker",
        applies: |i| notes_mention(i, &PLAYMAKER_WORDS),
        stats: &[
            StatCategory::Assists,
            StatCategory::PtsRebsAsts,
            StatCategory::PtsAsts,
            StatCategory::RebsAsts,
        ],
    },
];

/// Only consulted when no rule in [`INJURY_RULES`] matched.
pub const FALLBACK_RULE: InjuryRule = InjuryRule {
    name: "fallback_usage",
    applies: |i| i.usage_rate >= 15.0,
    stats: &[StatCategory::Points, StatCategory::PtsRebsAsts],
};

/// Categories a sidelined player's absence opens up. Empty when nothing
/// about the player suggests a meaningful role.
pub fn affected_stats(injury: &Injury) -> BTreeSet<StatCategory> {
    let mut affected = BTreeSet::new();
    for rule in &INJURY_RULES {
        if (rule.applies)(injury) {
            affected.extend(rule.stats.iter().copied());
        }
    }
    if affected.is_empty() && (FALLBACK_RULE.applies)(injury) {
        affected.extend(FALLBACK_RULE.stats.iter().copied());
    }
    affected
}

/// Names of the rules that fired, for supporting data.
pub fn matched_rules(injury: &Injury) -> Vec<&'static str> {
    let fired: Vec<&'static str> = INJURY_RULES
        .iter()
        .filter(|r| (r.applies)(injury))
        .map(|r| r.name)
        .collect();
    if fired.is_empty() && (FALLBACK_RULE.applies)(injury) {
        return vec![FALLBACK_RULE.name];
    }
    fired
}
