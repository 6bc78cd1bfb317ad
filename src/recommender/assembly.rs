use super::candidates::{Pool, PoolEntry};
use crate::model::{BuildOption, LineItem};
use tracing::{debug, warn};

/// Option `rank` takes the rank-th candidate of every pool (top candidate when
/// the pool is shorter); empty pools leave the slot absent.
pub fn assemble_option<'a>(pools: &[Pool<'a>], rank: usize) -> BuildOption<'a> {
    let lines = pools
        .iter()
        .map(|pool| match pool.pick(rank) {
            Some(entry) => LineItem::picked(&pool.category, entry.record, entry.price),
            None => LineItem::absent(&pool.category),
        })
        .collect();
    BuildOption { lines }
}

/// The highest-priced pick that still has something cheaper in its pool, paired
/// with that pool's cheapest entry.
fn next_downgrade<'a>(option: &BuildOption<'a>, pools: &[Pool<'a>]) -> Option<(usize, PoolEntry<'a>)> {
    let mut best: Option<(usize, &PoolEntry<'a>)> = None;
    for (i, (line, pool)) in option.lines.iter().zip(pools).enumerate() {
        if line.record.is_none() {
            continue;
        }
        let Some(cheaper) = pool.cheapest_below(line.price) else {
            continue;
        };
        if best.is_none_or(|(top, _)| line.price > option.lines[top].price) {
            best = Some((i, cheaper));
        }
    }
    best.map(|(line, entry)| (line, entry.clone()))
}

fn swap_in<'a>(option: &mut BuildOption<'a>, pool: &Pool<'a>, line: usize, pick: &PoolEntry<'a>) {
    debug!(
        "Downgrading {}: {:.0} -> {} at {:.0}",
        pool.category, option.lines[line].price, pick.record.display_name, pick.price
    );
    option.lines[line] = LineItem::picked(&pool.category, pick.record, pick.price);
}

/// Greedy downgrade until the option fits under `limit`. Each swap moves a slot to
/// its pool's cheapest entry, so a slot is swapped at most once. Returns the swap count.
pub fn fit_to_budget<'a>(option: &mut BuildOption<'a>, pools: &[Pool<'a>], limit: f64) -> usize {
    let mut swaps = 0;
    while option.total() > limit {
        match next_downgrade(option, pools) {
            Some((line, pick)) => {
                swap_in(option, &pools[line], line, &pick);
                swaps += 1;
            }
            None => {
                debug!(
                    "No cheaper substitutes left, total {:.0} stays over {:.0}",
                    option.total(),
                    limit
                );
                break;
            }
        }
    }
    swaps
}

/// Forces the cheapest candidate into each safeguard slot when the total still
/// exceeds `ceiling`.
pub fn cap_runaway<'a>(
    option: &mut BuildOption<'a>,
    pools: &[Pool<'a>],
    ceiling: f64,
    safeguard_categories: &[String],
) -> bool {
    if option.total() <= ceiling {
        return false;
    }
    warn!(
        "Build total {:.0} exceeds ceiling {:.0}, forcing cheapest {:?}",
        option.total(),
        ceiling,
        safeguard_categories
    );
    for category in safeguard_categories {
        let Some(line) = option.lines.iter().position(|l| &l.category == category) else {
            continue;
        };
        if let Some(cheapest) = pools[line].cheapest() {
            option.lines[line] = LineItem::picked(category, cheapest.record, cheapest.price);
        }
    }
    true
}

/// Drops options that repeat an earlier one's picks.
pub fn dedupe<'a>(options: Vec<BuildOption<'a>>) -> Vec<BuildOption<'a>> {
    let mut unique: Vec<BuildOption<'a>> = Vec::with_capacity(options.len());
    for option in options {
        if !unique.iter().any(|u| u.same_picks(&option)) {
            unique.push(option);
        }
    }
    unique
}
