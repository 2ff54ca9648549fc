//! Inventory, player and configuration state the quiver engine selects over.
//! This module exists to model just enough of the game world for action
//! validity to be decidable. It does not own action semantics.

use slotmap::SlotMap;

use crate::history::AmmoHistory;
use crate::hooks::ActionHooks;
use crate::types::{AbilityId, AmmoCategory, FireCategory, ItemId, LaunchKind, PACK_SIZE, SpellId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LauncherKind {
    Sling,
    Shortbow,
    Longbow,
    HandCrossbow,
    Arbalest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissileKind {
    Stone,
    SlingBullet,
    Arrow,
    Bolt,
    Javelin,
    LargeRock,
    Boomerang,
    Dart,
    ThrowingNet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WandKind {
    Flame,
    Frost,
    Acid,
    /// Terrain-only effect; never offered by cycling, still force-settable.
    Digging,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Targeted, and safe to aim automatically.
    FloodFlask,
    /// Targeted, but only with manual aim.
    StormRod,
    MirrorShard,
    /// Untargeted.
    BeastCage,
    /// Never quiverable through cycling or menus.
    PortalSigil,
}

/// Evocation profile of an equipped artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArtifactProfile {
    pub targeted: bool,
    /// Health paid up front; evoking below this is disabled.
    pub hp_cost: i32,
    pub mp_cost: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Launcher(LauncherKind),
    MeleeWeapon,
    Missile(MissileKind),
    Wand(WandKind),
    Device(DeviceKind),
    Artifact(ArtifactProfile),
    Other,
}

impl ItemKind {
    pub fn is_missile(&self) -> bool {
        matches!(self, ItemKind::Missile(_))
    }

    /// Whether this item is proper hand-thrown ammo.
    pub fn is_throwable(&self) -> bool {
        matches!(
            self,
            ItemKind::Missile(
                MissileKind::Stone
                    | MissileKind::Javelin
                    | MissileKind::LargeRock
                    | MissileKind::Boomerang
                    | MissileKind::Dart
                    | MissileKind::ThrowingNet
            )
        )
    }

    /// Whether `launcher` fires this item.
    pub fn launched_by(&self, launcher: &ItemKind) -> bool {
        let ItemKind::Missile(missile) = self else { return false };
        match launcher {
            ItemKind::Launcher(LauncherKind::Sling) => {
                matches!(missile, MissileKind::Stone | MissileKind::SlingBullet)
            }
            ItemKind::Launcher(LauncherKind::Shortbow | LauncherKind::Longbow) => {
                matches!(missile, MissileKind::Arrow)
            }
            ItemKind::Launcher(LauncherKind::HandCrossbow | LauncherKind::Arbalest) => {
                matches!(missile, MissileKind::Bolt)
            }
            _ => false,
        }
    }
}

/// How `ammo` would leave the hands of someone wielding `weapon`.
pub fn launch_kind(weapon: Option<&ItemKind>, ammo: &ItemKind) -> LaunchKind {
    if let Some(weapon) = weapon
        && ammo.launched_by(weapon)
    {
        LaunchKind::Launched
    } else if ammo.is_throwable() {
        LaunchKind::Thrown
    } else {
        LaunchKind::Fumbled
    }
}

/// History bucket for ammo fired while wielding `weapon`.
pub fn weapon_ammo_category(weapon: Option<&ItemKind>) -> AmmoCategory {
    match weapon {
        Some(ItemKind::Launcher(LauncherKind::Sling)) => AmmoCategory::Sling,
        Some(ItemKind::Launcher(LauncherKind::Shortbow | LauncherKind::Longbow)) => {
            AmmoCategory::Bow
        }
        Some(ItemKind::Launcher(LauncherKind::HandCrossbow | LauncherKind::Arbalest)) => {
            AmmoCategory::Crossbow
        }
        _ => AmmoCategory::Throw,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub name: String,
    pub quantity: i32,
    /// Remaining wand charges. Unused for other kinds.
    pub charges: i32,
    pub inscription: String,
    /// Wielded or worn. Artifacts must be equipped to evoke.
    pub equipped: bool,
}

impl Item {
    pub fn launched_by(&self, launcher: &Item) -> bool {
        self.kind.launched_by(&launcher.kind)
    }

    pub fn has_inscription(&self, marker: &str) -> bool {
        self.inscription.contains(marker)
    }
}

/// Letter-addressed pack backed by a slotmap for stable item identity.
#[derive(Clone, Debug)]
pub struct Inventory {
    items: SlotMap<ItemId, Item>,
    slots: [Option<ItemId>; PACK_SIZE],
}

impl Default for Inventory {
    fn default() -> Inventory {
        Inventory {
            items: SlotMap::default(),
            slots: [None; PACK_SIZE],
        }
    }
}

impl Inventory {
    pub fn new() -> Inventory {
        Inventory::default()
    }

    /// Place `item` in `slot`, replacing whatever was there.
    pub fn add_at(&mut self, slot: usize, item: Item) -> ItemId {
        if let Some(old) = self.slots[slot].take() {
            self.items.remove(old);
        }
        let id = self.items.insert(item);
        self.slots[slot] = Some(id);
        id
    }

    pub fn remove_slot(&mut self, slot: usize) {
        if let Some(id) = self.slots[slot].take() {
            self.items.remove(id);
        }
    }

    /// Decrement the stack in `slot`, removing it when it runs out.
    pub fn consume(&mut self, slot: usize, count: i32) {
        let Some(id) = self.slots[slot] else { return };
        let Some(item) = self.items.get_mut(id) else { return };
        item.quantity -= count;
        if item.quantity <= 0 {
            self.remove_slot(slot);
        }
    }

    /// Move an item between slots without disturbing its identity.
    pub fn shift(&mut self, from: usize, to: usize) {
        if let Some(id) = self.slots[from].take() {
            if let Some(old) = self.slots[to].take() {
                self.items.remove(old);
            }
            self.slots[to] = Some(id);
        }
    }

    /// Slot-addressed lookup tolerating the `-1` sentinel and junk indices.
    pub fn item_at(&self, slot: i32) -> Option<&Item> {
        let id = self.id_at(slot)?;
        self.items.get(id)
    }

    pub fn item_at_mut(&mut self, slot: i32) -> Option<&mut Item> {
        let id = self.id_at(slot)?;
        self.items.get_mut(id)
    }

    pub fn id_at(&self, slot: i32) -> Option<ItemId> {
        if !(0..PACK_SIZE as i32).contains(&slot) {
            return None;
        }
        self.slots[slot as usize]
    }

    pub fn defined(&self, slot: i32) -> bool {
        self.item_at(slot).is_some()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn slot_of(&self, id: ItemId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(id))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KnownSpell {
    pub id: SpellId,
    pub name: String,
    pub targeted: bool,
    /// Requires interactive aim; never auto-targeted.
    pub manual_targeting: bool,
    /// Targeted, but the automatic targeter picks badly for it.
    pub autotarget_incompatible: bool,
    /// Failure severity, `0` (safe) and up.
    pub fail_severity: u8,
    /// Forbidden by the player's god or mutations.
    pub forbidden: bool,
    /// Castable but would do nothing here.
    pub useless: bool,
    pub mp_cost: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
    pub targeted: bool,
    pub mp_cost: i32,
    /// Pseudo-abilities (renouncing a god and the like) stay out of the quiver.
    pub quiverable: bool,
    /// Reason the ability cannot currently be used, if any.
    pub blocked: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub inv: Inventory,
    pub weapon_slot: Option<usize>,
    pub spells: Vec<KnownSpell>,
    pub abilities: Vec<Ability>,
    pub hp: i32,
    pub max_hp: i32,
    pub mp: i32,
    pub max_mp: i32,
    pub confused: bool,
    pub berserk: bool,
    /// Bodily unable to throw anything (e.g. felid forms).
    pub cannot_throw: bool,
    /// Active portal projectile enchantment; throwing spends magic.
    pub portal_projectile: bool,
    pub can_cast: bool,
}

impl Default for Player {
    fn default() -> Player {
        Player {
            inv: Inventory::new(),
            weapon_slot: None,
            spells: Vec::new(),
            abilities: Vec::new(),
            hp: 20,
            max_hp: 20,
            mp: 10,
            max_mp: 10,
            confused: false,
            berserk: false,
            cannot_throw: false,
            portal_projectile: false,
            can_cast: true,
        }
    }
}

impl Player {
    pub fn weapon(&self) -> Option<&Item> {
        self.inv.item_at(self.weapon_slot_index())
    }

    /// Wielded slot as an `i32`, `-1` when unarmed.
    pub fn weapon_slot_index(&self) -> i32 {
        self.weapon_slot.map_or(-1, |s| s as i32)
    }

    pub fn spell(&self, id: SpellId) -> Option<&KnownSpell> {
        self.spells.iter().find(|s| s.id == id)
    }

    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id == id)
    }
}

/// Player-tunable firing options.
#[derive(Clone, Debug)]
pub struct FireConfig {
    pub fire_order: Vec<FireCategory>,
    /// Slots below this are ignored when building fire orders.
    pub fire_items_start: usize,
    /// Swap between the first two pack slots to reach a matching launcher.
    pub auto_switch: bool,
    /// Spells at or above this severity stay out of cycling and menus.
    pub fail_severity_to_quiver: u8,
}

impl Default for FireConfig {
    fn default() -> FireConfig {
        FireConfig {
            fire_order: vec![
                FireCategory::Launcher,
                FireCategory::Boomerang,
                FireCategory::Dart,
                FireCategory::Stone,
                FireCategory::Rock,
                FireCategory::Javelin,
                FireCategory::Net,
            ],
            fire_items_start: 0,
            auto_switch: false,
            fail_severity_to_quiver: 3,
        }
    }
}

/// Player-facing message sink. The frontend drains it each frame.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    lines: Vec<String>,
}

impl MessageLog {
    pub fn new() -> MessageLog {
        MessageLog::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// Redraw and feedback flags for the frontend to consume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub redraw_quiver: bool,
    /// Play the quiver-changed cue.
    pub quiver_cue: bool,
}

impl UiState {
    pub fn reset(&mut self) {
        *self = UiState::default();
    }
}

/// Read-only view for validity and ordering queries.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    pub player: &'a Player,
    pub config: &'a FireConfig,
}

impl<'a> Env<'a> {
    pub fn new(player: &'a Player, config: &'a FireConfig) -> Env<'a> {
        Env { player, config }
    }
}

/// Mutable context for triggers and cycler side effects.
pub struct World<'a> {
    pub player: &'a mut Player,
    pub config: &'a FireConfig,
    pub history: &'a mut AmmoHistory,
    pub log: &'a mut MessageLog,
    pub ui: &'a mut UiState,
    pub hooks: &'a mut dyn ActionHooks,
}

impl World<'_> {
    pub fn env(&self) -> Env<'_> {
        Env { player: self.player, config: self.config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{launcher, missile};

    #[test]
    fn out_of_range_slots_are_undefined() {
        let inv = Inventory::new();
        assert!(!inv.defined(-1));
        assert!(!inv.defined(PACK_SIZE as i32));
        assert!(inv.item_at(9999).is_none());
    }

    #[test]
    fn consuming_a_stack_to_zero_empties_the_slot() {
        let mut inv = Inventory::new();
        inv.add_at(3, missile(MissileKind::Stone, "stone", 2));
        inv.consume(3, 1);
        assert!(inv.defined(3));
        inv.consume(3, 1);
        assert!(!inv.defined(3));
    }

    #[test]
    fn shifting_preserves_item_identity() {
        let mut inv = Inventory::new();
        let id = inv.add_at(0, missile(MissileKind::Dart, "dart", 5));
        inv.shift(0, 7);
        assert_eq!(inv.id_at(7), Some(id));
        assert!(!inv.defined(0));
    }

    #[test]
    fn launch_kind_distinguishes_fired_thrown_and_fumbled() {
        let bow = launcher(LauncherKind::Shortbow, "shortbow");
        let arrow = missile(MissileKind::Arrow, "arrow", 10);
        let javelin = missile(MissileKind::Javelin, "javelin", 2);

        assert_eq!(launch_kind(Some(&bow.kind), &arrow.kind), LaunchKind::Launched);
        assert_eq!(launch_kind(Some(&bow.kind), &javelin.kind), LaunchKind::Thrown);
        assert_eq!(launch_kind(None, &arrow.kind), LaunchKind::Fumbled);
    }

    #[test]
    fn weapon_ammo_category_defaults_to_throw() {
        assert_eq!(weapon_ammo_category(None), AmmoCategory::Throw);
        assert_eq!(weapon_ammo_category(Some(&ItemKind::MeleeWeapon)), AmmoCategory::Throw);
        assert_eq!(
            weapon_ammo_category(Some(&ItemKind::Launcher(LauncherKind::Arbalest))),
            AmmoCategory::Crossbow
        );
    }
}
