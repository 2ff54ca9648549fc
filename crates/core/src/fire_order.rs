//! Fire-order resolution: which pack slots are worth firing, in what order.
//! This module exists to keep category matching and the ranked sort in one
//! place. It does not decide what the quiver currently holds.

use crate::state::{Env, Item, ItemKind, MissileKind, launch_kind, weapon_ammo_category};
use crate::types::{AmmoCategory, FireCategory, LaunchKind, PACK_SIZE};

/// Pack slots eligible for weapon auto-switching.
pub(crate) const AUTOSWITCH_SLOTS: [usize; 2] = [0, 1];

/// Auto-switch only applies while one of the two switchable slots is wielded.
pub(crate) fn autoswitch_active(env: &Env) -> bool {
    env.config.auto_switch
        && env.player.weapon_slot.is_some_and(|s| AUTOSWITCH_SLOTS.contains(&s))
}

/// Whether `item` is usable ammo for either of the switchable weapon slots.
pub(crate) fn autoswitch_ammo_check(env: &Env, item: &Item) -> bool {
    AUTOSWITCH_SLOTS
        .iter()
        .any(|&slot| env.player.inv.defined(slot as i32) && matches_any(env, item, slot as i32))
}

/// Does `item` fall into `category`? `launcher` is the wielded slot (or `-1`).
/// Manual resolution reads the `+F` opt-in inscription instead of `+f`.
pub(crate) fn item_matches(
    env: &Env,
    item: &Item,
    category: FireCategory,
    launcher: i32,
    manual: bool,
) -> bool {
    if category == FireCategory::Inscribed {
        return item.has_inscription(if manual { "+F" } else { "+f" });
    }
    let ItemKind::Missile(missile) = item.kind else { return false };
    match category {
        FireCategory::Launcher => {
            env.player.inv.item_at(launcher).is_some_and(|l| item.launched_by(l))
        }
        FireCategory::Stone => missile == MissileKind::Stone,
        FireCategory::Javelin => missile == MissileKind::Javelin,
        FireCategory::Rock => missile == MissileKind::LargeRock,
        FireCategory::Net => missile == MissileKind::ThrowingNet,
        FireCategory::Boomerang => missile == MissileKind::Boomerang,
        FireCategory::Dart => missile == MissileKind::Dart,
        FireCategory::Inscribed => unreachable!(),
    }
}

/// Does `item` fall into any category at all, configured or not?
pub(crate) fn matches_any(env: &Env, item: &Item, launcher: i32) -> bool {
    FireCategory::ALL.iter().any(|&c| item_matches(env, item, c, launcher, false))
}

/// Ranked pack slots to fire, best first.
///
/// Each eligible slot is keyed `(category_rank << 16) | slot` and the keys
/// sorted, so the configured category order dominates and pack position
/// breaks ties. `launcher` is the slot of the launcher to resolve against,
/// normally the wielded weapon. Manual resolution (`manual`) also offers
/// hand-thrown ammo while a launcher is wielded and honours the `=F`
/// exclusion instead of `=f`.
pub fn item_fire_order(
    env: &Env,
    ignore_inscriptions: bool,
    launcher: i32,
    manual: bool,
) -> Vec<usize> {
    let start = if ignore_inscriptions { 0 } else { env.config.fire_items_start };
    let launcher_kind = env.player.inv.item_at(launcher).map(|l| l.kind);
    let launcher_category = weapon_ammo_category(launcher_kind.as_ref());
    let autoswitch_launcher = launcher >= 0
        && AUTOSWITCH_SLOTS.contains(&(launcher as usize))
        && autoswitch_active(env);

    let mut keys: Vec<u32> = Vec::new();
    for slot in start..PACK_SIZE {
        let Some(item) = env.player.inv.item_at(slot as i32) else { continue };

        // While wielding a launcher, hand-thrown ammo only shows up in
        // manual resolution.
        let launched = launch_kind(launcher_kind.as_ref(), &item.kind);
        if !manual && launcher_category != AmmoCategory::Throw && launched == LaunchKind::Thrown {
            continue;
        }
        if !ignore_inscriptions && item.has_inscription(if manual { "=F" } else { "=f" }) {
            continue;
        }

        for (rank, &category) in env.config.fire_order.iter().enumerate() {
            if item_matches(env, item, category, launcher, manual)
                || autoswitch_launcher && autoswitch_ammo_check(env, item)
            {
                keys.push(((rank as u32) << 16) | slot as u32);
                break;
            }
        }
    }

    keys.sort_unstable();
    keys.into_iter().map(|k| (k & 0xffff) as usize).collect()
}
