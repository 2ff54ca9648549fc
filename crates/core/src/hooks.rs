//! Seam between the quiver engine and the surrounding game.
//! Triggers resolve what to do; the hooks carry it out (throwing, casting,
//! evoking, the aim UI, the selection menu). Hooks report back through the
//! `Target` they are handed.

use crate::menu::MenuEntry;
use crate::state::Player;
use crate::types::{AbilityId, SpellId, Target};

/// Outcome of showing the selection menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuSelection {
    /// Index into the entry list shown.
    Pick(usize),
    /// Empty the quiver (only honoured where clearing is allowed).
    Clear,
    Cancel,
}

/// Game-side effects the engine delegates to.
///
/// A hook that performs its action should set `target.is_valid`; an
/// interactive hook that commits to a shot should also set `target.command`
/// to [`crate::types::TargetCommand::Fire`], and may hand back a cycling or
/// menu command instead to steer the fire loop.
pub trait ActionHooks {
    fn throw_item(&mut self, player: &mut Player, slot: usize, target: &mut Target);

    fn cast_spell(&mut self, player: &mut Player, spell: SpellId, target: &mut Target);

    fn use_ability(&mut self, player: &mut Player, ability: AbilityId, target: &mut Target);

    /// Zap a wand or evoke a device or artifact in `slot`.
    fn evoke_item(&mut self, player: &mut Player, slot: usize, target: &mut Target);

    /// Swap weapons for auto-switch. Returns false if the swap was refused.
    fn wield_weapon(&mut self, player: &mut Player, slot: usize) -> bool {
        player.weapon_slot = Some(slot);
        true
    }

    /// Autofight advisory: health too low to fight recklessly.
    fn hp_is_low(&self, _player: &Player) -> bool {
        false
    }

    /// Autofight advisory: magic too low to spend recklessly.
    fn mp_is_low(&self, _player: &Player) -> bool {
        false
    }

    fn select_from_menu(&mut self, _entries: &[MenuEntry], _allow_empty: bool) -> MenuSelection {
        MenuSelection::Cancel
    }
}

/// Hooks that do nothing. Useful for pure selection work and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHooks;

impl ActionHooks for NullHooks {
    fn throw_item(&mut self, _player: &mut Player, _slot: usize, _target: &mut Target) {}

    fn cast_spell(&mut self, _player: &mut Player, _spell: SpellId, _target: &mut Target) {}

    fn use_ability(&mut self, _player: &mut Player, _ability: AbilityId, _target: &mut Target) {}

    fn evoke_item(&mut self, _player: &mut Player, _slot: usize, _target: &mut Target) {}
}
