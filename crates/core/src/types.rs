//! Identifier and value types shared across the quiver engine.
//! This module exists to keep the vocabulary of actions, targets and
//! fire categories in one place. It does not own any selection logic.

use slotmap::new_key_type;

new_key_type! {
    /// Stable identity for an inventory item. Survives slot reshuffles.
    pub struct ItemId;
}

/// Number of letter-addressable pack slots (`a`-`z`, `A`-`Z`).
pub const PACK_SIZE: usize = 52;

/// Letter shown for a pack slot in messages and menus.
pub fn slot_letter(slot: usize) -> char {
    debug_assert!(slot < PACK_SIZE);
    if slot < 26 {
        (b'a' + slot as u8) as char
    } else {
        (b'A' + (slot - 26) as u8) as char
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpellId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbilityId(pub i32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

/// A quiverable action. Item-backed variants carry a pack slot; `-1` is the
/// conventional invalid slot, so `Ammo { slot: -1 }` is the never-valid
/// placeholder the engine falls back to when nothing can be quivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Nothing quivered. Distinct from an invalid `Ammo` slot: `None` is a
    /// deliberate empty selection, not a failed one.
    None,
    /// Fire or throw the missile in `slot`, respecting launcher matching.
    Ammo { slot: i32 },
    /// Toss the item in `slot` for no effect. Only valid where `Ammo` is not.
    Fumble { slot: i32 },
    Spell { spell: SpellId },
    Ability { ability: AbilityId },
    Wand { slot: i32 },
    /// Evoke a miscellaneous device.
    Device { slot: i32 },
    /// Evoke an equipped artifact.
    Artifact { slot: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    None,
    Ammo,
    Fumble,
    Spell,
    Ability,
    Wand,
    Device,
    Artifact,
}

/// Kind rotation used when cycling runs off the end of one kind's fire order.
/// `None` and `Fumble` are not part of the rotation; cycling away from them
/// starts at `Ammo`.
pub const CYCLE_ORDER: [ActionKind; 6] = [
    ActionKind::Ammo,
    ActionKind::Wand,
    ActionKind::Device,
    ActionKind::Artifact,
    ActionKind::Spell,
    ActionKind::Ability,
];

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::None => ActionKind::None,
            Action::Ammo { .. } => ActionKind::Ammo,
            Action::Fumble { .. } => ActionKind::Fumble,
            Action::Spell { .. } => ActionKind::Spell,
            Action::Ability { .. } => ActionKind::Ability,
            Action::Wand { .. } => ActionKind::Wand,
            Action::Device { .. } => ActionKind::Device,
            Action::Artifact { .. } => ActionKind::Artifact,
        }
    }

    /// The never-valid placeholder for a kind, used as a cursor when cycling
    /// into a kind with no current selection.
    pub fn sentinel(kind: ActionKind) -> Action {
        match kind {
            ActionKind::None => Action::None,
            ActionKind::Ammo => Action::Ammo { slot: -1 },
            ActionKind::Fumble => Action::Fumble { slot: -1 },
            ActionKind::Spell => Action::Spell { spell: SpellId(-1) },
            ActionKind::Ability => Action::Ability { ability: AbilityId(-1) },
            ActionKind::Wand => Action::Wand { slot: -1 },
            ActionKind::Device => Action::Device { slot: -1 },
            ActionKind::Artifact => Action::Artifact { slot: -1 },
        }
    }

    /// Pack slot backing this action, or `-1` for slotless variants.
    pub fn item_slot(&self) -> i32 {
        match *self {
            Action::Ammo { slot }
            | Action::Fumble { slot }
            | Action::Wand { slot }
            | Action::Device { slot }
            | Action::Artifact { slot } => slot,
            Action::None | Action::Spell { .. } | Action::Ability { .. } => -1,
        }
    }

    /// The variant parameter as a raw integer, for persistence and hashing.
    pub fn param(&self) -> i32 {
        match *self {
            Action::None => 0,
            Action::Spell { spell } => spell.0,
            Action::Ability { ability } => ability.0,
            _ => self.item_slot(),
        }
    }
}

/// Side-channel command a targeting hook can hand back to the fire loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetCommand {
    /// Targeting ended without an explicit command; treated as a cancel.
    #[default]
    None,
    CycleForward,
    CycleBackward,
    /// Open the selection menu and go around again.
    SelectMenu,
    /// Commit to the shot. Ends the fire loop keeping the current selection.
    Fire,
}

/// Mutable targeting state threaded through a trigger. Hooks fill in the
/// outcome; the engine only inspects it afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Target {
    pub pos: Option<Pos>,
    /// Set by the hook when the action actually went off.
    pub is_valid: bool,
    pub cancelled: bool,
    /// Interactive targeting is wanted (player-facing aim UI).
    pub interactive: bool,
    /// Ask the hook to pick a target automatically.
    pub find_target: bool,
    /// The caster targets their own tile.
    pub self_target: bool,
    /// True while inside the fire loop; suppresses duplicate messaging.
    pub in_fire_loop: bool,
    pub command: TargetCommand,
}

impl Target {
    /// Fresh state for one pass of the interactive fire loop.
    pub fn for_fire_loop() -> Target {
        Target { interactive: true, in_fire_loop: true, ..Target::default() }
    }

    /// Whether a targeter still has to run before the action can resolve.
    pub fn needs_targeting(&self) -> bool {
        self.interactive || self.pos.is_none() && !self.self_target
    }
}

/// Ammo history bucket. Launchers file under their own category, everything
/// thrown by hand files under `Throw`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AmmoCategory {
    Sling,
    Bow,
    Crossbow,
    Throw,
}

impl AmmoCategory {
    pub const ALL: [AmmoCategory; 4] =
        [AmmoCategory::Sling, AmmoCategory::Bow, AmmoCategory::Crossbow, AmmoCategory::Throw];

    pub fn index(&self) -> usize {
        match self {
            AmmoCategory::Sling => 0,
            AmmoCategory::Bow => 1,
            AmmoCategory::Crossbow => 2,
            AmmoCategory::Throw => 3,
        }
    }
}

/// One entry of the configurable fire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FireCategory {
    /// Items the player opted in with a `+f` inscription.
    Inscribed,
    /// Ammo launched by the wielded weapon.
    Launcher,
    Stone,
    Javelin,
    Rock,
    Net,
    Boomerang,
    Dart,
}

impl FireCategory {
    pub const ALL: [FireCategory; 8] = [
        FireCategory::Inscribed,
        FireCategory::Launcher,
        FireCategory::Stone,
        FireCategory::Javelin,
        FireCategory::Rock,
        FireCategory::Net,
        FireCategory::Boomerang,
        FireCategory::Dart,
    ];
}

/// How an item would leave the player's hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchKind {
    /// Tossed for no effect.
    Fumbled,
    /// Thrown by hand for full effect.
    Thrown,
    /// Fired from the wielded launcher.
    Launched,
}

/// Display colour for menu entries and the quiver readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuiverColor {
    White,
    LightGrey,
    DarkGrey,
    Yellow,
    LightRed,
    Red,
    Magenta,
}

/// Colour for a spell's failure severity, `0` (safe) through `5+` (dire).
pub fn severity_color(severity: u8) -> QuiverColor {
    match severity {
        0 => QuiverColor::White,
        1 => QuiverColor::LightGrey,
        2 => QuiverColor::Yellow,
        3 => QuiverColor::LightRed,
        4 => QuiverColor::Red,
        _ => QuiverColor::Magenta,
    }
}
