use crate::config::PropsConfig;
use crate::feed::types::Prop;

/// True if `price` is no worse than `ceiling` (e.g. -125 passes a -140 ceiling).
pub fn within_juice(price: i32, ceiling: i32) -> bool {
    price > 0 || price >= ceiling
}

/// Value of the side we would bet. Plus money scores highest, heavier juice
/// degrades through the -115 / -130 / -140 steps.
pub fn odds_value_score(price: i32) -> f64 {
    if price > 0 {
        return 0.8 + (price as f64 / 500.0).min(0.2);
    }
    match price {
        p if p >= -115 => 0.7,
        p if p >= -130 => 0.5,
        p if p >= -140 => 0.3,
        _ => 0.0,
    }
}

/// Keep props in an allowed category with at least one side inside the juice ceiling.
pub fn filter_props(props: Vec<Prop>, cfg: &PropsConfig) -> Vec<Prop> {
    let before = props.len();
    let kept: Vec<Prop> = props
        .into_iter()
        .filter(|p| cfg.categories.contains(&p.category))
        .filter(|p| {
            within_juice(p.over_price, cfg.juice_ceiling)
                || within_juice(p.under_price, cfg.juice_ceiling)
        })
        .collect();
    tracing::info!(before, after = kept.len(), "filtered props by category and juice");
    kept
}
