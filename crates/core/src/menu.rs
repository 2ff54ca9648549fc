//! The quiver selection menu: everything currently quiverable, flattened
//! into one list for the frontend to present.

use crate::cycler::{CyclerId, PlayerQuiver};
use crate::hooks::MenuSelection;
use crate::state::{Env, World};
use crate::types::{Action, ActionKind, QuiverColor};

/// One row of the selection menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuEntry {
    pub action: Action,
    pub description: String,
    pub color: QuiverColor,
}

/// Presentation order of the menu, item-backed kinds first.
const MENU_ORDER: [ActionKind; 6] = [
    ActionKind::Ammo,
    ActionKind::Wand,
    ActionKind::Device,
    ActionKind::Artifact,
    ActionKind::Spell,
    ActionKind::Ability,
];

/// Everything quiverable right now. Disabled actions are listed (greyed
/// out); invalid ones are not.
pub fn build_entries(env: &Env) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    for kind in MENU_ORDER {
        for action in Action::sentinel(kind).get_fire_order(env, true) {
            entries.push(MenuEntry {
                action,
                description: action.description(env),
                color: action.color(env),
            });
        }
    }
    entries
}

/// Run the selection menu against `which` cycler. Returns whether the
/// selection changed. Picking into the primary cycler also offers the
/// choice to the launcher shadow, which keeps it only if the wielded
/// weapon fires it.
pub fn choose(quiver: &mut PlayerQuiver, which: CyclerId, allow_empty: bool, w: &mut World) -> bool {
    let entries = {
        let env = Env::new(w.player, w.config);
        build_entries(&env)
    };
    match w.hooks.select_from_menu(&entries, allow_empty) {
        MenuSelection::Pick(index) => {
            let Some(entry) = entries.get(index) else { return false };
            let action = entry.action;
            if !action.is_valid(&Env::new(w.player, w.config)) {
                return false;
            }
            match which {
                CyclerId::Primary => {
                    let changed = quiver.action.set(action, w);
                    quiver.launcher.set(action, w);
                    changed
                }
                CyclerId::Launcher => quiver.launcher.set(action, w),
            }
        }
        MenuSelection::Clear if allow_empty => match which {
            CyclerId::Primary => quiver.action.clear(w),
            CyclerId::Launcher => quiver.launcher.clear(w),
        },
        MenuSelection::Clear | MenuSelection::Cancel => false,
    }
}
