//! Quiver selection state: the action cyclers, the launcher fallback
//! resolver and persistence of the current selection.
//! This module exists to keep every way the quiver can change routed
//! through one `set`, so history, UI flags and the feedback cue stay
//! consistent. It does not carry actions out.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher as _};

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

use crate::fire_order::item_fire_order;
use crate::history::{AmmoHistory, ItemSnapshot};
use crate::state::{Env, ItemKind, MessageLog, UiState, World, weapon_ammo_category};
use crate::types::{
    AbilityId, Action, ActionKind, AmmoCategory, CYCLE_ORDER, SpellId, slot_letter,
};

/// Which of the player's two cyclers a menu or command addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CyclerId {
    Primary,
    Launcher,
}

/// An action resolved by fallback logic, with an explanation when the
/// resolver came up empty-handed.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAction {
    pub action: Action,
    pub error: Option<String>,
}

/// Item slots currently held by both cyclers, for resolution that prefers
/// what is already quivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuiverView {
    pub primary_item: i32,
    pub launcher_item: i32,
}

/// One persisted quiver selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedAction {
    pub tag: String,
    pub param: i32,
}

/// Keyed persistence records, serialized alongside the rest of a save.
pub type Props = BTreeMap<String, SavedAction>;

fn kind_tag(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::None => "none",
        ActionKind::Ammo => "ammo",
        ActionKind::Fumble => "fumble",
        ActionKind::Spell => "spell",
        ActionKind::Ability => "ability",
        ActionKind::Wand => "wand",
        ActionKind::Device => "device",
        ActionKind::Artifact => "artifact",
    }
}

impl Action {
    pub fn saved(&self) -> SavedAction {
        SavedAction { tag: kind_tag(self.kind()).to_string(), param: self.param() }
    }

    /// Unknown tags degrade to `None` rather than failing the whole load.
    pub fn from_saved(record: &SavedAction) -> Action {
        match record.tag.as_str() {
            "ammo" => Action::Ammo { slot: record.param },
            "fumble" => Action::Fumble { slot: record.param },
            "spell" => Action::Spell { spell: SpellId(record.param) },
            "ability" => Action::Ability { ability: AbilityId(record.param) },
            "wand" => Action::Wand { slot: record.param },
            "device" => Action::Device { slot: record.param },
            "artifact" => Action::Artifact { slot: record.param },
            _ => Action::None,
        }
    }

    /// A fresh action to quiver when this one stopped being valid, if the
    /// kind has a resolver. Only ammo re-derives itself; other kinds fall
    /// back to cycling.
    pub fn find_replacement(
        &self,
        env: &Env,
        history: &AmmoHistory,
        view: &QuiverView,
    ) -> Option<ResolvedAction> {
        match self.kind() {
            ActionKind::Ammo | ActionKind::Fumble => Some(find_action_from_launcher(
                env,
                history,
                view,
                env.player.weapon_slot_index(),
            )),
            _ => None,
        }
    }
}

/// Best ammo to quiver for the launcher in `launcher_slot` (hand-thrown
/// ammo when it is not a launcher). Prefers ammo already quivered, then the
/// fired-ammo history, then the head of the fire order. When nothing
/// resolves, the result is the invalid-ammo sentinel plus an error telling
/// the player why.
pub fn find_action_from_launcher(
    env: &Env,
    history: &AmmoHistory,
    view: &QuiverView,
    launcher_slot: i32,
) -> ResolvedAction {
    if env.player.cannot_throw {
        return ResolvedAction {
            action: Action::Ammo { slot: -1 },
            error: Some("You can't throw or fire anything.".to_string()),
        };
    }

    let launcher = env.player.inv.item_at(launcher_slot);
    let mut slot = -1;
    for candidate in [view.launcher_item, view.primary_item] {
        if let Some(item) = env.player.inv.item_at(candidate)
            && let Some(launcher) = launcher
            && item.launched_by(launcher)
        {
            slot = candidate;
            break;
        }
    }
    if slot == -1 {
        slot = history.last_ammo_for_launcher(env.player, launcher_slot);
    }
    if slot == -1 {
        let order = item_fire_order(env, false, launcher_slot, false);
        slot = order.first().map_or(-1, |&s| s as i32);
    }

    let mut result = ResolvedAction { action: Action::Ammo { slot }, error: None };
    if slot == -1 {
        // Resolve again blind to inscriptions and the start cutoff, purely
        // to explain what got in the way.
        let unrestricted = item_fire_order(env, true, launcher_slot, false);
        result.error = Some(match unrestricted.first() {
            None => "No suitable missiles.".to_string(),
            Some(&first) if first < env.config.fire_items_start => format!(
                "Nothing suitable (fire items start at slot {}).",
                slot_letter(env.config.fire_items_start)
            ),
            Some(&first) => format!(
                "Nothing suitable (ignored '=f'-inscribed item in slot {}).",
                slot_letter(first)
            ),
        });
    }
    result
}

/// Interpret a raw pack slot as a quiverable action. Worn items (other than
/// evokable artifacts) refuse with a message; `force` turns an unfireable
/// item into a fumble throw instead of rejecting it.
pub fn slot_to_action(env: &Env, slot: i32, force: bool, log: &mut MessageLog) -> Option<Action> {
    let item = env.player.inv.item_at(slot)?;
    match item.kind {
        ItemKind::Wand(_) => Some(Action::Wand { slot }),
        ItemKind::Device(_) => Some(Action::Device { slot }),
        ItemKind::Artifact(_) => Some(Action::Artifact { slot }),
        _ => {
            if item.equipped && env.player.weapon_slot_index() != slot {
                log.push("You can't quiver something you're wearing.");
                return Some(Action::Ammo { slot: -1 });
            }
            let ammo = Action::Ammo { slot };
            if force && !ammo.is_valid(env) {
                Some(Action::Fumble { slot })
            } else {
                Some(ammo)
            }
        }
    }
}

/// Holds the current selection and steps it through fire orders and the
/// kind rotation. The launcher-restricted variant only ever holds ammo the
/// wielded weapon fires.
#[derive(Clone, Debug)]
pub struct ActionCycler {
    current: Action,
    launcher_only: bool,
    resolution_error: Option<String>,
}

impl Default for ActionCycler {
    fn default() -> ActionCycler {
        ActionCycler::new()
    }
}

impl ActionCycler {
    pub fn new() -> ActionCycler {
        ActionCycler {
            current: Action::Ammo { slot: -1 },
            launcher_only: false,
            resolution_error: None,
        }
    }

    /// A cycler that only accepts ammo launched by the wielded weapon.
    pub fn new_launcher() -> ActionCycler {
        ActionCycler { launcher_only: true, ..ActionCycler::new() }
    }

    pub fn get(&self) -> Action {
        self.current
    }

    /// Why the last resolution left the cycler empty, if it told us.
    pub fn error(&self) -> Option<&str> {
        self.resolution_error.as_deref()
    }

    pub fn is_empty(&self, env: &Env) -> bool {
        !self.current.is_valid(env) || !self.accepts(env, self.current)
    }

    fn accepts(&self, env: &Env, action: Action) -> bool {
        if !self.launcher_only || action == Action::None {
            return true;
        }
        matches!(action, Action::Ammo { .. }) && is_launched_ammo(env, action.item_slot())
    }

    /// Change the selection. Returns whether it actually changed.
    ///
    /// A changed selection updates the fired-ammo history for item-backed
    /// actions, requests the feedback cue and a redraw. A rejected action
    /// (launcher restriction) only requests a redraw.
    pub fn set(&mut self, new_action: Action, w: &mut World) -> bool {
        if !self.accepts(&Env::new(w.player, w.config), new_action) {
            w.ui.redraw_quiver = true;
            return false;
        }
        let changed = new_action != self.current;
        self.current = new_action;
        self.resolution_error = None;
        if changed {
            if let Some(snap) = ItemSnapshot::capture(&w.player.inv, new_action.item_slot()) {
                let weapon_kind = w.player.weapon().map(|weapon| weapon.kind);
                let category = if weapon_kind.is_some_and(|wk| snap.kind.launched_by(&wk)) {
                    weapon_ammo_category(weapon_kind.as_ref())
                } else {
                    AmmoCategory::Throw
                };
                w.history.set_quiver(snap, category, w.ui);
            }
            w.ui.quiver_cue = true;
        }
        w.ui.redraw_quiver = true;
        changed
    }

    pub fn set_resolved(&mut self, resolved: ResolvedAction, w: &mut World) -> bool {
        let changed = self.set(resolved.action, w);
        self.resolution_error = resolved.error;
        changed
    }

    /// Take another cycler's selection without history or cue side effects.
    /// Used when handing a selection back, e.g. restoring after a cancelled
    /// fire loop.
    pub fn set_from_cycler(&mut self, other: &ActionCycler, ui: &mut UiState) {
        self.current = other.current;
        self.resolution_error = other.resolution_error.clone();
        ui.redraw_quiver = true;
    }

    pub fn set_from_slot(&mut self, slot: i32, w: &mut World) -> bool {
        let action = {
            let env = Env::new(w.player, w.config);
            slot_to_action(&env, slot, false, w.log)
        };
        match action {
            Some(action) => self.set(action, w),
            None => false,
        }
    }

    pub fn clear(&mut self, w: &mut World) -> bool {
        self.set(Action::None, w)
    }

    /// The action cycling one step from the current selection would land
    /// on. Falls back to the invalid-ammo sentinel when every kind is
    /// exhausted, so cycling is always well-defined.
    pub fn next(&self, env: &Env, dir: i32, allow_disabled: bool) -> Action {
        if let Some(result) = self.current.find_next(env, dir, allow_disabled, false)
            && result.is_valid(env)
        {
            return result;
        }
        next_in_kind_order(self.current, env, dir, allow_disabled)
            .unwrap_or(Action::Ammo { slot: -1 })
    }

    pub fn cycle(&mut self, dir: i32, allow_disabled: bool, w: &mut World) -> bool {
        let next = self.next(&Env::new(w.player, w.config), dir, allow_disabled);
        self.set(next, w)
    }

    /// Re-validate after inventory, spell or ability changes. An invalidated
    /// selection is replaced (ammo re-resolves, everything else cycles on).
    pub fn on_actions_changed(&mut self, w: &mut World, view: &QuiverView) {
        if !self.current.is_valid(&Env::new(w.player, w.config)) {
            let replacement = {
                let env = Env::new(w.player, w.config);
                self.current.find_replacement(&env, w.history, view)
            };
            match replacement {
                Some(resolved) if resolved.action.is_valid(&Env::new(w.player, w.config)) => {
                    self.set_resolved(resolved, w);
                }
                other => {
                    self.cycle(1, true, w);
                    // If cycling found nothing either, keep the resolver's
                    // explanation for the quiver display.
                    if !self.current.is_valid(&Env::new(w.player, w.config))
                        && let Some(resolved) = other
                    {
                        self.resolution_error = resolved.error;
                    }
                }
            }
        }
        w.ui.redraw_quiver = true;
    }

    pub fn spell_is_quivered(&self, spell: SpellId) -> bool {
        self.current == Action::Spell { spell }
    }

    pub fn item_is_quivered(&self, slot: i32) -> bool {
        slot >= 0 && self.current.item_slot() == slot
    }

    pub fn save(&self, props: &mut Props, key: &str) {
        props.insert(key.to_string(), self.current.saved());
    }

    /// Restore from `props`. A save without this key predates quiver
    /// persistence: derive a selection from the wielded weapon, cycle if
    /// that fails, and write the record back.
    pub fn load(&mut self, props: &mut Props, key: &str, w: &mut World, view: &QuiverView) {
        if let Some(record) = props.get(key) {
            let action = Action::from_saved(record);
            self.set(action, w);
            return;
        }
        let resolved = {
            let env = Env::new(w.player, w.config);
            find_action_from_launcher(&env, w.history, view, w.player.weapon_slot_index())
        };
        self.set_resolved(resolved, w);
        if !self.current.is_valid(&Env::new(w.player, w.config)) {
            self.cycle(1, true, w);
        }
        self.save(props, key);
    }
}

fn is_launched_ammo(env: &Env, slot: i32) -> bool {
    let Some(weapon) = env.player.weapon() else { return false };
    env.player.inv.item_at(slot).is_some_and(|item| item.launched_by(weapon))
}

/// Walk the kind rotation from `current`'s kind and return the first valid
/// action any kind offers. A kind outside the rotation starts the walk at
/// the top, including the first kind itself.
fn next_in_kind_order(current: Action, env: &Env, dir: i32, allow_disabled: bool) -> Option<Action> {
    let mut kinds = CYCLE_ORDER.to_vec();
    if dir < 0 {
        kinds.reverse();
    }
    let start = match kinds.iter().position(|&k| k == current.kind()) {
        Some(i) => (i + 1) % kinds.len(),
        None => 0,
    };
    kinds.rotate_left(start);
    for kind in kinds {
        if let Some(next) = Action::sentinel(kind).find_next(env, dir, allow_disabled, false)
            && next.is_valid(env)
        {
            return Some(next);
        }
    }
    None
}

/// The player's quiver: the primary cycler plus the launcher-restricted
/// shadow used for launcher-specific commands and displays.
#[derive(Clone, Debug, Default)]
pub struct PlayerQuiver {
    pub action: ActionCycler,
    pub launcher: ActionCycler,
}

/// Persistence key for the primary selection.
pub const QUIVER_KEY: &str = "current_quiver";
/// Persistence key for the launcher selection.
pub const LAUNCHER_KEY: &str = "launcher_quiver";

impl PlayerQuiver {
    pub fn new() -> PlayerQuiver {
        PlayerQuiver { action: ActionCycler::new(), launcher: ActionCycler::new_launcher() }
    }

    pub fn view(&self) -> QuiverView {
        QuiverView {
            primary_item: self.action.get().item_slot(),
            launcher_item: self.launcher.get().item_slot(),
        }
    }

    /// Re-validate both cyclers after anything quiverable changed.
    pub fn on_actions_changed(&mut self, w: &mut World) {
        let view = self.view();
        self.action.on_actions_changed(w, &view);
        let view = self.view();
        self.launcher.on_actions_changed(w, &view);
    }

    /// React to wielding a different weapon: re-derive the launcher cycler,
    /// mirror it into the primary quiver when it found something, and let
    /// an evokable artifact quiver itself when the quiver went dead.
    pub fn on_weapon_changed(&mut self, w: &mut World) {
        let view = self.view();
        let resolved = {
            let env = Env::new(w.player, w.config);
            find_action_from_launcher(&env, w.history, &view, w.player.weapon_slot_index())
        };
        self.launcher.set_resolved(resolved, w);

        if !self.launcher.is_empty(&Env::new(w.player, w.config)) {
            self.action.set(self.launcher.get(), w);
            return;
        }
        if !self.action.get().is_valid(&Env::new(w.player, w.config)) {
            let weapon_slot = w.player.weapon_slot_index();
            let wielded_artifact = matches!(
                w.player.inv.item_at(weapon_slot).map(|i| i.kind),
                Some(ItemKind::Artifact(_))
            );
            if wielded_artifact {
                self.action.set(Action::Artifact { slot: weapon_slot }, w);
            }
        }
        w.ui.redraw_quiver = true;
    }

    pub fn save(&self, props: &mut Props) {
        self.action.save(props, QUIVER_KEY);
        self.launcher.save(props, LAUNCHER_KEY);
    }

    pub fn load(&mut self, props: &mut Props, w: &mut World) {
        let view = self.view();
        self.launcher.load(props, LAUNCHER_KEY, w, &view);
        let view = self.view();
        self.action.load(props, QUIVER_KEY, w, &view);
        // Stale slots in old records settle out the same way any other
        // inventory change does.
        self.on_actions_changed(w);
    }

    /// Deterministic digest of the selection state, for save validation and
    /// regression comparisons.
    pub fn snapshot_hash(&self, history: &AmmoHistory) -> u64 {
        let mut hasher = Xxh3::new();
        for cycler in [&self.action, &self.launcher] {
            cycler.get().hash(&mut hasher);
        }
        for snap in history.snapshots() {
            match snap {
                None => hasher.write_u8(0),
                Some(snap) => {
                    hasher.write_u8(1);
                    snap.slot.hash(&mut hasher);
                    snap.quantity.hash(&mut hasher);
                    snap.kind.hash(&mut hasher);
                }
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LauncherKind, MissileKind, WandKind};
    use crate::test_support::{artifact, harness, known_spell, launcher, missile, other_item, wand};

    #[test]
    fn set_reports_change_and_feeds_history() {
        let mut h = harness();
        h.player.inv.add_at(0, missile(MissileKind::Stone, "stone", 5));
        let mut cycler = ActionCycler::new();

        let mut w = h.world();
        assert!(cycler.set(Action::Ammo { slot: 0 }, &mut w));
        assert!(!cycler.set(Action::Ammo { slot: 0 }, &mut w));
        assert!(h.ui.quiver_cue);
        assert!(h.ui.redraw_quiver);
        assert_eq!(h.history.last_ammo(&h.player, AmmoCategory::Throw), 0);
    }

    #[test]
    fn launcher_cycler_rejects_unlaunched_ammo() {
        let mut h = harness();
        h.player.inv.add_at(0, launcher(LauncherKind::Sling, "sling"));
        h.player.inv.add_at(1, missile(MissileKind::SlingBullet, "sling bullet", 7));
        h.player.inv.add_at(2, missile(MissileKind::Javelin, "javelin", 2));
        h.player.weapon_slot = Some(0);
        let mut cycler = ActionCycler::new_launcher();

        let mut w = h.world();
        assert!(!cycler.set(Action::Ammo { slot: 2 }, &mut w));
        assert_eq!(cycler.get(), Action::Ammo { slot: -1 });
        assert!(h.ui.redraw_quiver);
        assert!(!h.ui.quiver_cue);

        let mut w = h.world();
        assert!(cycler.set(Action::Ammo { slot: 1 }, &mut w));
        assert!(cycler.set(Action::None, &mut w));
    }

    #[test]
    fn cycling_walks_the_kind_rotation() {
        let mut h = harness();
        h.player.inv.add_at(0, missile(MissileKind::Stone, "stone", 5));
        h.player.inv.add_at(1, wand(WandKind::Frost, "wand of frost", 3));
        h.player.spells = vec![known_spell(SpellId(4), "magic dart", true)];
        let mut cycler = ActionCycler::new();

        let mut w = h.world();
        cycler.set(Action::Ammo { slot: 0 }, &mut w);
        cycler.cycle(1, true, &mut w);
        assert_eq!(cycler.get(), Action::Wand { slot: 1 });
        cycler.cycle(1, true, &mut w);
        assert_eq!(cycler.get(), Action::Spell { spell: SpellId(4) });
        cycler.cycle(1, true, &mut w);
        assert_eq!(cycler.get(), Action::Ammo { slot: 0 });
        // And back again.
        cycler.cycle(-1, true, &mut w);
        assert_eq!(cycler.get(), Action::Spell { spell: SpellId(4) });
    }

    #[test]
    fn exhausted_cycling_lands_on_the_sentinel() {
        let mut h = harness();
        let mut cycler = ActionCycler::new();
        let mut w = h.world();
        cycler.cycle(1, true, &mut w);
        assert_eq!(cycler.get(), Action::Ammo { slot: -1 });
    }

    #[test]
    fn consumed_ammo_is_replaced_from_history_kind_match() {
        let mut h = harness();
        h.player.inv.add_at(0, missile(MissileKind::Stone, "stone", 1));
        h.player.inv.add_at(2, missile(MissileKind::Stone, "stone", 8));
        let mut quiver = PlayerQuiver::new();

        let mut w = h.world();
        quiver.action.set(Action::Ammo { slot: 0 }, &mut w);
        h.player.inv.remove_slot(0);
        let mut w = h.world();
        quiver.on_actions_changed(&mut w);
        assert_eq!(quiver.action.get(), Action::Ammo { slot: 2 });
    }

    #[test]
    fn invalidated_wand_cycles_to_the_next_kind() {
        let mut h = harness();
        h.player.inv.add_at(0, wand(WandKind::Flame, "wand of flame", 3));
        h.player.spells = vec![known_spell(SpellId(1), "magic dart", true)];
        let mut quiver = PlayerQuiver::new();

        let mut w = h.world();
        quiver.action.set(Action::Wand { slot: 0 }, &mut w);
        h.player.inv.remove_slot(0);
        let mut w = h.world();
        quiver.on_actions_changed(&mut w);
        assert_eq!(quiver.action.get(), Action::Spell { spell: SpellId(1) });
    }

    #[test]
    fn saved_actions_round_trip_and_unknown_tags_degrade() {
        let actions = [
            Action::None,
            Action::Ammo { slot: 3 },
            Action::Fumble { slot: 4 },
            Action::Spell { spell: SpellId(9) },
            Action::Wand { slot: 1 },
            Action::Artifact { slot: 2 },
        ];
        for action in actions {
            assert_eq!(Action::from_saved(&action.saved()), action);
        }
        let alien = SavedAction { tag: "polymorph_other".to_string(), param: 5 };
        assert_eq!(Action::from_saved(&alien), Action::None);
    }

    #[test]
    fn saved_action_serializes_as_tag_and_param() {
        let json = serde_json::to_string(&Action::Ammo { slot: 7 }.saved()).unwrap();
        assert_eq!(json, r#"{"tag":"ammo","param":7}"#);
    }

    #[test]
    fn load_self_heals_a_missing_record() {
        let mut h = harness();
        h.player.inv.add_at(0, missile(MissileKind::Dart, "dart", 6));
        let mut quiver = PlayerQuiver::new();
        let mut props = Props::new();

        let mut w = h.world();
        quiver.load(&mut props, &mut w);
        assert_eq!(quiver.action.get(), Action::Ammo { slot: 0 });
        assert!(props.contains_key(QUIVER_KEY));
        assert!(props.contains_key(LAUNCHER_KEY));
    }

    #[test]
    fn load_revalidates_a_stale_record() {
        let mut h = harness();
        h.player.inv.add_at(2, missile(MissileKind::Stone, "stone", 4));
        let mut quiver = PlayerQuiver::new();
        let mut props = Props::new();
        props.insert(
            QUIVER_KEY.to_string(),
            SavedAction { tag: "ammo".to_string(), param: 40 },
        );

        let mut w = h.world();
        quiver.load(&mut props, &mut w);
        assert_eq!(quiver.action.get(), Action::Ammo { slot: 2 });
    }

    #[test]
    fn slot_to_action_refuses_worn_items() {
        let mut h = harness();
        let mut cloak = other_item("cloak");
        cloak.equipped = true;
        h.player.inv.add_at(5, cloak);

        let env = Env::new(&h.player, &h.config);
        let action = slot_to_action(&env, 5, false, &mut h.log);
        assert_eq!(action, Some(Action::Ammo { slot: -1 }));
        assert_eq!(h.log.last(), Some("You can't quiver something you're wearing."));
    }

    #[test]
    fn forced_slot_selection_falls_back_to_fumbling() {
        let mut h = harness();
        h.player.inv.add_at(0, other_item("iron ration"));

        let env = Env::new(&h.player, &h.config);
        assert_eq!(slot_to_action(&env, 0, false, &mut h.log), Some(Action::Ammo { slot: 0 }));
        assert_eq!(slot_to_action(&env, 0, true, &mut h.log), Some(Action::Fumble { slot: 0 }));
    }

    #[test]
    fn resolver_prefers_quivered_then_history_then_fire_order() {
        let mut h = harness();
        h.player.inv.add_at(0, launcher(LauncherKind::Arbalest, "arbalest"));
        h.player.inv.add_at(1, missile(MissileKind::Bolt, "bolt", 10));
        h.player.inv.add_at(2, missile(MissileKind::Bolt, "bolt", 3));
        h.player.weapon_slot = Some(0);

        let env = Env::new(&h.player, &h.config);
        // Quivered bolts win.
        let view = QuiverView { primary_item: 2, launcher_item: -1 };
        assert_eq!(
            find_action_from_launcher(&env, &h.history, &view, 0).action,
            Action::Ammo { slot: 2 }
        );

        // With nothing quivered, history wins.
        let snap = ItemSnapshot::capture(&h.player.inv, 2).unwrap();
        h.history.on_item_fired(&h.player, snap, true, &mut h.ui);
        let env = Env::new(&h.player, &h.config);
        let view = QuiverView { primary_item: -1, launcher_item: -1 };
        assert_eq!(
            find_action_from_launcher(&env, &h.history, &view, 0).action,
            Action::Ammo { slot: 2 }
        );

        // With no history either, the fire order's head wins.
        let fresh = AmmoHistory::new();
        assert_eq!(
            find_action_from_launcher(&env, &fresh, &view, 0).action,
            Action::Ammo { slot: 1 }
        );
    }

    #[test]
    fn resolver_explains_an_empty_result() {
        let mut h = harness();
        let env = Env::new(&h.player, &h.config);
        let view = QuiverView { primary_item: -1, launcher_item: -1 };
        let resolved = find_action_from_launcher(&env, &h.history, &view, -1);
        assert_eq!(resolved.action, Action::Ammo { slot: -1 });
        assert_eq!(resolved.error.as_deref(), Some("No suitable missiles."));

        let mut stone = missile(MissileKind::Stone, "stone", 5);
        stone.inscription = "=f".into();
        h.player.inv.add_at(3, stone);
        let env = Env::new(&h.player, &h.config);
        let resolved = find_action_from_launcher(&env, &h.history, &view, -1);
        assert_eq!(
            resolved.error.as_deref(),
            Some("Nothing suitable (ignored '=f'-inscribed item in slot d).")
        );

        h.player.inv.item_at_mut(3).unwrap().inscription.clear();
        h.config.fire_items_start = 10;
        let env = Env::new(&h.player, &h.config);
        let resolved = find_action_from_launcher(&env, &h.history, &view, -1);
        assert_eq!(
            resolved.error.as_deref(),
            Some("Nothing suitable (fire items start at slot k).")
        );
    }

    #[test]
    fn cycler_surfaces_the_resolution_error() {
        let mut h = harness();
        let mut quiver = PlayerQuiver::new();
        let mut w = h.world();
        let view = quiver.view();
        quiver.action.on_actions_changed(&mut w, &view);
        assert_eq!(quiver.action.error(), Some("No suitable missiles."));
        // A successful set clears it.
        h.player.inv.add_at(0, missile(MissileKind::Stone, "stone", 2));
        let mut w = h.world();
        quiver.action.set(Action::Ammo { slot: 0 }, &mut w);
        assert_eq!(quiver.action.error(), None);
    }

    #[test]
    fn wielding_a_launcher_mirrors_its_ammo_into_the_quiver() {
        let mut h = harness();
        h.player.inv.add_at(0, launcher(LauncherKind::Shortbow, "shortbow"));
        h.player.inv.add_at(1, missile(MissileKind::Arrow, "arrow", 12));
        h.player.inv.add_at(2, missile(MissileKind::Javelin, "javelin", 2));
        let mut quiver = PlayerQuiver::new();

        let mut w = h.world();
        quiver.action.set(Action::Ammo { slot: 2 }, &mut w);
        h.player.weapon_slot = Some(0);
        let mut w = h.world();
        quiver.on_weapon_changed(&mut w);
        assert_eq!(quiver.launcher.get(), Action::Ammo { slot: 1 });
        assert_eq!(quiver.action.get(), Action::Ammo { slot: 1 });
    }

    #[test]
    fn wielding_an_evokable_artifact_quivers_it_when_the_quiver_dies() {
        let mut h = harness();
        h.player.inv.add_at(0, artifact("lamp of fire", true, 0, 2));
        let mut quiver = PlayerQuiver::new();

        h.player.weapon_slot = Some(0);
        let mut w = h.world();
        quiver.on_weapon_changed(&mut w);
        assert_eq!(quiver.action.get(), Action::Artifact { slot: 0 });
    }

    #[test]
    fn snapshot_hash_tracks_selection_and_history() {
        let mut h = harness();
        h.player.inv.add_at(0, missile(MissileKind::Stone, "stone", 5));
        let mut quiver = PlayerQuiver::new();
        let empty = quiver.snapshot_hash(&h.history);
        assert_eq!(empty, quiver.snapshot_hash(&h.history));

        let mut w = h.world();
        quiver.action.set(Action::Ammo { slot: 0 }, &mut w);
        assert_ne!(empty, quiver.snapshot_hash(&h.history));
    }
}
