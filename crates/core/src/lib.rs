//! A polymorphic action-selection and cycling engine for the "quiver" of a
//! roguelike: the one slot holding whatever the player fires next, be it
//! ammo, a spell, an ability, a wand, a device or an equipped artifact.
//!
//! The engine decides what can be quivered, in what order cycling visits
//! it, and how the selection survives firing, inventory churn, weapon
//! swaps and save files. Carrying the actions out (and every bit of UI) is
//! delegated through [`hooks::ActionHooks`].

pub mod action;
pub mod cycler;
pub mod fire_order;
pub mod history;
pub mod hooks;
pub mod menu;
pub mod state;
pub mod targeting;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use cycler::{
    ActionCycler, CyclerId, LAUNCHER_KEY, PlayerQuiver, Props, QUIVER_KEY, QuiverView,
    ResolvedAction, SavedAction, find_action_from_launcher, slot_to_action,
};
pub use fire_order::item_fire_order;
pub use history::{AmmoHistory, ItemSnapshot};
pub use hooks::{ActionHooks, MenuSelection, NullHooks};
pub use menu::{MenuEntry, build_entries, choose};
pub use state::{
    Ability, ArtifactProfile, DeviceKind, Env, FireConfig, Inventory, Item, ItemKind, KnownSpell,
    LauncherKind, MessageLog, MissileKind, Player, UiState, WandKind, World, launch_kind,
    weapon_ammo_category,
};
pub use types::{
    AbilityId, Action, ActionKind, AmmoCategory, CYCLE_ORDER, FireCategory, ItemId, LaunchKind,
    PACK_SIZE, Pos, QuiverColor, SpellId, Target, TargetCommand, severity_color, slot_letter,
};
