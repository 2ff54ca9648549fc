//! Shared fixtures for unit tests: item builders, a recording hook
//! implementation and a bundled world harness.

use std::collections::VecDeque;

use crate::history::AmmoHistory;
use crate::hooks::{ActionHooks, MenuSelection};
use crate::menu::MenuEntry;
use crate::state::{
    Ability, ArtifactProfile, DeviceKind, Env, FireConfig, Item, ItemKind, KnownSpell,
    LauncherKind, MessageLog, MissileKind, Player, UiState, WandKind, World,
};
use crate::types::{AbilityId, SpellId, Target, TargetCommand};

pub(crate) fn item(kind: ItemKind, name: &str) -> Item {
    Item {
        kind,
        name: name.to_string(),
        quantity: 1,
        charges: 0,
        inscription: String::new(),
        equipped: false,
    }
}

pub(crate) fn missile(kind: MissileKind, name: &str, quantity: i32) -> Item {
    Item { quantity, ..item(ItemKind::Missile(kind), name) }
}

pub(crate) fn launcher(kind: LauncherKind, name: &str) -> Item {
    item(ItemKind::Launcher(kind), name)
}

pub(crate) fn wand(kind: WandKind, name: &str, charges: i32) -> Item {
    Item { charges, ..item(ItemKind::Wand(kind), name) }
}

pub(crate) fn device(kind: DeviceKind, name: &str) -> Item {
    item(ItemKind::Device(kind), name)
}

pub(crate) fn artifact(name: &str, targeted: bool, hp_cost: i32, mp_cost: i32) -> Item {
    Item {
        equipped: true,
        ..item(ItemKind::Artifact(ArtifactProfile { targeted, hp_cost, mp_cost }), name)
    }
}

pub(crate) fn other_item(name: &str) -> Item {
    item(ItemKind::Other, name)
}

pub(crate) fn known_spell(id: SpellId, name: &str, targeted: bool) -> KnownSpell {
    KnownSpell {
        id,
        name: name.to_string(),
        targeted,
        manual_targeting: false,
        autotarget_incompatible: false,
        fail_severity: 0,
        forbidden: false,
        useless: false,
        mp_cost: 1,
    }
}

pub(crate) fn ability(id: AbilityId, name: &str, mp_cost: i32) -> Ability {
    Ability { id, name: name.to_string(), targeted: false, mp_cost, quiverable: true, blocked: None }
}

/// How one scripted hook invocation reports back through its target.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScriptStep {
    pub(crate) command: TargetCommand,
    pub(crate) cancelled: bool,
    pub(crate) fired: bool,
}

pub(crate) fn step(command: TargetCommand) -> ScriptStep {
    ScriptStep { command, cancelled: false, fired: true }
}

/// Hooks that record every delegated effect and play back scripted
/// targeting outcomes. With an empty script every action simply succeeds.
#[derive(Debug, Default)]
pub(crate) struct RecordingHooks {
    pub(crate) thrown: Vec<usize>,
    pub(crate) cast: Vec<SpellId>,
    pub(crate) used: Vec<AbilityId>,
    pub(crate) evoked: Vec<usize>,
    pub(crate) hp_low: bool,
    pub(crate) mp_low: bool,
    pub(crate) consume_on_throw: bool,
    pub(crate) script: VecDeque<ScriptStep>,
    pub(crate) menu: VecDeque<MenuSelection>,
}

impl RecordingHooks {
    fn apply(&mut self, target: &mut Target) {
        match self.script.pop_front() {
            Some(step) => {
                target.command = step.command;
                target.cancelled = step.cancelled;
                target.is_valid = step.fired;
            }
            None => target.is_valid = true,
        }
    }
}

impl ActionHooks for RecordingHooks {
    fn throw_item(&mut self, player: &mut Player, slot: usize, target: &mut Target) {
        self.thrown.push(slot);
        self.apply(target);
        if self.consume_on_throw && target.is_valid {
            player.inv.consume(slot, 1);
        }
    }

    fn cast_spell(&mut self, _player: &mut Player, spell: SpellId, target: &mut Target) {
        self.cast.push(spell);
        self.apply(target);
    }

    fn use_ability(&mut self, _player: &mut Player, ability: AbilityId, target: &mut Target) {
        self.used.push(ability);
        self.apply(target);
    }

    fn evoke_item(&mut self, _player: &mut Player, slot: usize, target: &mut Target) {
        self.evoked.push(slot);
        self.apply(target);
    }

    fn hp_is_low(&self, _player: &Player) -> bool {
        self.hp_low
    }

    fn mp_is_low(&self, _player: &Player) -> bool {
        self.mp_low
    }

    fn select_from_menu(&mut self, _entries: &[MenuEntry], _allow_empty: bool) -> MenuSelection {
        self.menu.pop_front().unwrap_or(MenuSelection::Cancel)
    }
}

/// Everything a test world needs, bundled so tests can split-borrow it.
pub(crate) struct Harness {
    pub(crate) player: Player,
    pub(crate) config: FireConfig,
    pub(crate) history: AmmoHistory,
    pub(crate) log: MessageLog,
    pub(crate) ui: UiState,
    pub(crate) hooks: RecordingHooks,
}

impl Harness {
    pub(crate) fn env(&self) -> Env<'_> {
        Env::new(&self.player, &self.config)
    }

    pub(crate) fn world(&mut self) -> World<'_> {
        World {
            player: &mut self.player,
            config: &self.config,
            history: &mut self.history,
            log: &mut self.log,
            ui: &mut self.ui,
            hooks: &mut self.hooks,
        }
    }
}

pub(crate) fn harness() -> Harness {
    Harness {
        player: Player::default(),
        config: FireConfig::default(),
        history: AmmoHistory::new(),
        log: MessageLog::new(),
        ui: UiState::default(),
        hooks: RecordingHooks::default(),
    }
}
