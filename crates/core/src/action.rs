//! Per-variant behaviour of quiverable actions: validity, enablement,
//! targeting traits, ordering and triggering. One dispatch site per
//! question, so adding a variant is a compile-error checklist.

use crate::fire_order::{autoswitch_active, autoswitch_ammo_check, item_fire_order, matches_any};
use crate::history::ItemSnapshot;
use crate::state::{DeviceKind, Env, Item, ItemKind, WandKind, World, launch_kind};
use crate::types::{
    Action, ActionKind, LaunchKind, PACK_SIZE, QuiverColor, Target, severity_color,
};

/// Reason firing is globally impossible right now, if any.
fn fire_blocked(env: &Env) -> Option<&'static str> {
    if env.player.berserk {
        Some("You are too berserk to aim carefully!")
    } else {
        None
    }
}

/// A `!f` inscription asks for confirmation before firing; without a prompt
/// layer that means the action stays disabled.
fn warns_against_firing(item: &Item) -> bool {
    item.has_inscription("!f")
}

impl Action {
    /// Could this action conceivably fire, ignoring temporary obstacles?
    pub fn is_valid(&self, env: &Env) -> bool {
        match *self {
            Action::None => false,
            Action::Ammo { slot } => {
                if env.player.cannot_throw {
                    return false;
                }
                let Some(item) = env.player.inv.item_at(slot) else { return false };
                if autoswitch_active(env) {
                    autoswitch_ammo_check(env, item)
                } else {
                    matches_any(env, item, env.player.weapon_slot_index())
                }
            }
            Action::Fumble { slot } => {
                !env.player.cannot_throw
                    && env.player.inv.defined(slot)
                    && !Action::Ammo { slot }.is_valid(env)
            }
            Action::Spell { spell } => env.player.spell(spell).is_some(),
            Action::Ability { ability } => env.player.ability(ability).is_some(),
            Action::Wand { slot } => {
                matches!(env.player.inv.item_at(slot), Some(i) if matches!(i.kind, ItemKind::Wand(_)))
            }
            Action::Device { slot } => {
                matches!(env.player.inv.item_at(slot), Some(i) if matches!(i.kind, ItemKind::Device(_)))
            }
            Action::Artifact { slot } => {
                matches!(env.player.inv.item_at(slot),
                    Some(i) if matches!(i.kind, ItemKind::Artifact(_)) && i.equipped)
            }
        }
    }

    /// Would triggering do something right now? Always false when invalid.
    pub fn is_enabled(&self, env: &Env) -> bool {
        self.is_valid(env) && self.disabled_reason(env).is_none()
    }

    /// Human-readable reason the action is disabled, when it is valid but
    /// cannot currently fire.
    pub fn explain_disabled(&self, env: &Env) -> Option<String> {
        if !self.is_valid(env) { None } else { self.disabled_reason(env) }
    }

    fn disabled_reason(&self, env: &Env) -> Option<String> {
        match *self {
            Action::None => None,
            Action::Ammo { slot } | Action::Fumble { slot } => {
                if let Some(msg) = fire_blocked(env) {
                    return Some(msg.to_string());
                }
                let item = env.player.inv.item_at(slot)?;
                if matches!(self, Action::Ammo { .. })
                    && !matches_any(env, item, env.player.weapon_slot_index())
                {
                    return Some("This ammo needs a different weapon.".to_string());
                }
                if warns_against_firing(item) {
                    return Some("An inscription warns against firing this.".to_string());
                }
                if let Some(weapon) = env.player.weapon()
                    && launch_kind(Some(&weapon.kind), &item.kind) == LaunchKind::Launched
                    && warns_against_firing(weapon)
                {
                    return Some("An inscription warns against firing your weapon.".to_string());
                }
                None
            }
            Action::Spell { spell } => {
                let s = env.player.spell(spell)?;
                if !env.player.can_cast {
                    Some("You can't cast spells right now.".to_string())
                } else if s.useless {
                    Some(format!("{} would do nothing useful here.", s.name))
                } else {
                    None
                }
            }
            Action::Ability { ability } => {
                let a = env.player.ability(ability)?;
                if let Some(reason) = &a.blocked {
                    Some(reason.clone())
                } else if env.player.mp < a.mp_cost {
                    Some("You don't have enough magic to use that ability.".to_string())
                } else {
                    None
                }
            }
            Action::Wand { slot } => {
                let item = env.player.inv.item_at(slot)?;
                if item.charges <= 0 {
                    Some("That wand has no charges.".to_string())
                } else {
                    None
                }
            }
            Action::Device { .. } => None,
            Action::Artifact { slot } => {
                let item = env.player.inv.item_at(slot)?;
                let ItemKind::Artifact(profile) = item.kind else { return None };
                if env.player.hp <= profile.hp_cost {
                    Some("You don't have the health to spare.".to_string())
                } else if env.player.mp < profile.mp_cost {
                    Some("You don't have enough magic to evoke that.".to_string())
                } else {
                    None
                }
            }
        }
    }

    /// Whether triggering involves picking a target at all.
    pub fn is_targeted(&self, env: &Env) -> bool {
        match *self {
            Action::None => false,
            Action::Ammo { .. } | Action::Fumble { .. } => !env.player.confused,
            Action::Spell { spell } => {
                env.player.spell(spell).is_some_and(|s| s.targeted || s.manual_targeting)
            }
            Action::Ability { ability } => {
                env.player.ability(ability).is_some_and(|a| a.targeted)
            }
            Action::Wand { .. } => true,
            Action::Device { slot } => matches!(
                env.player.inv.item_at(slot).map(|i| i.kind),
                Some(ItemKind::Device(
                    DeviceKind::FloodFlask | DeviceKind::StormRod | DeviceKind::MirrorShard
                ))
            ),
            Action::Artifact { slot } => matches!(
                env.player.inv.item_at(slot).map(|i| i.kind),
                Some(ItemKind::Artifact(p)) if p.targeted
            ),
        }
    }

    /// May autofight pull the trigger on this action?
    pub fn allow_autofight(&self, env: &Env) -> bool {
        match *self {
            Action::Ammo { .. } | Action::Fumble { .. } | Action::Wand { .. } => {
                self.is_enabled(env)
            }
            Action::Spell { spell } => env.player.spell(spell).is_some_and(|s| {
                s.targeted && !s.manual_targeting && !s.autotarget_incompatible
            }),
            Action::None
            | Action::Ability { .. }
            | Action::Device { .. }
            | Action::Artifact { .. } => false,
        }
    }

    /// Does triggering spend magic? Feeds the autofight mp-low gate.
    pub fn uses_mp(&self, env: &Env) -> bool {
        match *self {
            Action::Ammo { .. } | Action::Fumble { .. } => env.player.portal_projectile,
            Action::Spell { .. } => self.is_valid(env),
            Action::Ability { ability } => {
                env.player.ability(ability).is_some_and(|a| a.mp_cost > 0)
            }
            Action::Artifact { slot } => matches!(
                env.player.inv.item_at(slot).map(|i| i.kind),
                Some(ItemKind::Artifact(p)) if p.mp_cost > 0
            ),
            Action::None | Action::Wand { .. } | Action::Device { .. } => false,
        }
    }

    /// Everything of this action's kind worth offering, in cycling order.
    /// Disabled entries are kept unless `allow_disabled` is off; invalid
    /// ones never appear.
    pub fn get_fire_order(&self, env: &Env, allow_disabled: bool) -> Vec<Action> {
        let keep = |a: &Action| a.is_valid(env) && (allow_disabled || a.is_enabled(env));
        match self.kind() {
            ActionKind::None => Vec::new(),
            // Fumble shares the ammo order: cycling away from a fumble lands
            // on real ammo.
            ActionKind::Ammo | ActionKind::Fumble => {
                item_fire_order(env, false, env.player.weapon_slot_index(), true)
                    .into_iter()
                    .map(|slot| Action::Ammo { slot: slot as i32 })
                    .filter(keep)
                    .collect()
            }
            ActionKind::Spell => env
                .player
                .spells
                .iter()
                .filter(|s| {
                    !s.forbidden && s.fail_severity < env.config.fail_severity_to_quiver
                })
                .map(|s| Action::Spell { spell: s.id })
                .filter(keep)
                .collect(),
            ActionKind::Ability => env
                .player
                .abilities
                .iter()
                .filter(|a| a.quiverable)
                .map(|a| Action::Ability { ability: a.id })
                .filter(keep)
                .collect(),
            ActionKind::Wand => pack_scan(env, |kind| {
                matches!(kind, ItemKind::Wand(w) if w != WandKind::Digging)
            })
            .into_iter()
            .map(|slot| Action::Wand { slot })
            .filter(keep)
            .collect(),
            ActionKind::Device => pack_scan(env, |kind| {
                matches!(kind, ItemKind::Device(d) if d != DeviceKind::PortalSigil)
            })
            .into_iter()
            .map(|slot| Action::Device { slot })
            .filter(keep)
            .collect(),
            ActionKind::Artifact => pack_scan(env, |kind| matches!(kind, ItemKind::Artifact(_)))
            .into_iter()
            .map(|slot| Action::Artifact { slot })
            .filter(keep)
            .collect(),
        }
    }

    /// Step through this kind's fire order. `None` means the order is empty,
    /// or the end was reached without `wrap`.
    pub fn find_next(&self, env: &Env, dir: i32, allow_disabled: bool, wrap: bool) -> Option<Action> {
        let mut order = self.get_fire_order(env, allow_disabled);
        if order.is_empty() {
            return None;
        }
        if dir < 0 {
            order.reverse();
        }
        // An invalid or vanished cursor restarts from the top.
        if !self.is_valid(env) {
            return Some(order[0]);
        }
        let Some(i) = order.iter().position(|a| a == self) else {
            return Some(order[0]);
        };
        let next = i + 1;
        if !wrap && next >= order.len() {
            return None;
        }
        Some(order[next % order.len()])
    }

    /// Advisory autofight gate. Blocks (with a message) when an automatic
    /// trigger would fight recklessly at low health or spend scarce magic.
    pub fn autofight_check(&self, w: &mut World, target: &Target) -> bool {
        if !target.find_target || target.interactive {
            return false;
        }
        let hp_low = w.hooks.hp_is_low(w.player);
        let mp_low = self.uses_mp(&w.env()) && w.hooks.mp_is_low(w.player);
        if hp_low {
            w.log.push("You are too injured to fight recklessly!");
        } else if mp_low {
            w.log.push("You are too depleted to draw on your magic recklessly!");
        }
        hp_low || mp_low
    }

    /// Carry the action out against `target`, routing the effect through the
    /// world's hooks. A no-op when invalid; a disabled action explains itself
    /// instead of firing.
    pub fn trigger(&self, target: &mut Target, w: &mut World) {
        if !self.is_valid(&w.env()) {
            return;
        }
        match *self {
            Action::None => {}
            Action::Ammo { slot } | Action::Fumble { slot } => {
                self.trigger_ammo(slot, target, w);
            }
            Action::Spell { spell } => {
                let Some(s) = w.player.spell(spell) else { return };
                if s.manual_targeting {
                    target.pos = None;
                    target.find_target = false;
                    target.interactive = true;
                } else if s.autotarget_incompatible {
                    target.pos = None;
                    target.find_target = true;
                } else if !s.targeted {
                    target.self_target = true;
                }
                if self.autofight_check(w, target) {
                    return;
                }
                // Enablement is not rechecked here: the casting hook owns
                // its own refusals and messaging.
                w.hooks.cast_spell(w.player, spell, target);
                if target.find_target && !target.is_valid && !target.in_fire_loop {
                    w.log.push("Couldn't find an automatic target!");
                }
            }
            Action::Ability { ability } => {
                if !self.explain_and_bail(target, w) {
                    return;
                }
                target.find_target = true;
                w.hooks.use_ability(w.player, ability, target);
            }
            Action::Wand { slot } => {
                if !self.explain_and_bail(target, w) {
                    return;
                }
                target.find_target = true;
                w.hooks.evoke_item(w.player, slot as usize, target);
            }
            Action::Device { slot } => {
                if !self.explain_and_bail(target, w) {
                    return;
                }
                if let Some(item) = w.player.inv.item_at(slot)
                    && let ItemKind::Device(device) = item.kind
                {
                    match device {
                        DeviceKind::FloodFlask => target.find_target = true,
                        DeviceKind::StormRod | DeviceKind::MirrorShard => {
                            target.interactive = true;
                        }
                        DeviceKind::BeastCage | DeviceKind::PortalSigil => {
                            target.self_target = true;
                        }
                    }
                }
                w.hooks.evoke_item(w.player, slot as usize, target);
            }
            Action::Artifact { slot } => {
                if !self.explain_and_bail(target, w) {
                    return;
                }
                target.find_target = true;
                w.hooks.evoke_item(w.player, slot as usize, target);
            }
        }
    }

    /// Shared disabled/autofight preamble. Returns false when the trigger
    /// should stop here.
    fn explain_and_bail(&self, target: &Target, w: &mut World) -> bool {
        if !self.is_enabled(&w.env()) {
            if let Some(msg) = self.explain_disabled(&w.env()) {
                w.log.push(msg);
            }
            return false;
        }
        !self.autofight_check(w, target)
    }

    fn trigger_ammo(&self, slot: i32, target: &mut Target, w: &mut World) {
        if !self.is_enabled(&w.env()) {
            // A mismatched launcher may just be stowed in the other swap
            // slot; wielding it costs the action instead.
            if !try_autoswitch_to_ranged(w, slot) {
                if let Some(msg) = self.explain_disabled(&w.env()) {
                    w.log.push(msg);
                }
            }
            return;
        }
        if self.autofight_check(w, target) {
            return;
        }
        // Snapshot before the throw: firing the last of a stack empties the
        // slot before the history sees it.
        let fired = ItemSnapshot::capture(&w.player.inv, slot);
        w.hooks.throw_item(w.player, slot as usize, target);
        // A cancelled aim leaves `is_valid` unset and the history alone.
        if target.is_valid
            && let Some(fired) = fired
        {
            w.history.on_item_fired(w.player, fired, true, w.ui);
        }
    }

    pub fn description(&self, env: &Env) -> String {
        match *self {
            Action::None => "Nothing quivered".to_string(),
            Action::Ammo { slot } | Action::Fumble { slot } => {
                let Some(item) = env.player.inv.item_at(slot) else {
                    return "Nothing quivered".to_string();
                };
                let weapon_kind = env.player.weapon().map(|weapon| weapon.kind);
                let verb = match launch_kind(weapon_kind.as_ref(), &item.kind) {
                    LaunchKind::Launched => "Fire",
                    LaunchKind::Thrown => "Throw",
                    LaunchKind::Fumbled => "Toss (no damage)",
                };
                format!("{verb}: {}", item_label(item))
            }
            Action::Spell { spell } => {
                let name = env.player.spell(spell).map_or("buggy spell", |s| s.name.as_str());
                format!("Cast: {name}")
            }
            Action::Ability { ability } => {
                let name =
                    env.player.ability(ability).map_or("buggy ability", |a| a.name.as_str());
                format!("Abil: {name}")
            }
            Action::Wand { slot } => format!("Zap: {}", slot_label(env, slot)),
            Action::Device { slot } | Action::Artifact { slot } => {
                format!("Evoke: {}", slot_label(env, slot))
            }
        }
    }

    pub fn color(&self, env: &Env) -> QuiverColor {
        if !self.is_valid(env) || !self.is_enabled(env) {
            return QuiverColor::DarkGrey;
        }
        match *self {
            Action::Spell { spell } => match env.player.spell(spell) {
                Some(s) if s.forbidden => QuiverColor::Magenta,
                Some(s) => severity_color(s.fail_severity),
                None => QuiverColor::DarkGrey,
            },
            _ => QuiverColor::LightGrey,
        }
    }
}

fn item_label(item: &Item) -> String {
    if item.quantity > 1 {
        format!("{} {}s", item.quantity, item.name)
    } else {
        item.name.clone()
    }
}

fn slot_label(env: &Env, slot: i32) -> String {
    env.player.inv.item_at(slot).map_or_else(|| "nothing".to_string(), |i| i.name.clone())
}

fn pack_scan(env: &Env, want: impl Fn(ItemKind) -> bool) -> Vec<i32> {
    (0..PACK_SIZE as i32)
        .filter(|&slot| env.player.inv.item_at(slot).is_some_and(|i| want(i.kind)))
        .collect()
}

/// Wield the launcher stowed in the other swap slot when it fires `slot`'s
/// ammo. Returns true if a swap happened (consuming the trigger).
pub(crate) fn try_autoswitch_to_ranged(w: &mut World, slot: i32) -> bool {
    let other = {
        let env = w.env();
        if !autoswitch_active(&env) {
            return false;
        }
        let other = if env.player.weapon_slot == Some(0) { 1 } else { 0 };
        let Some(ammo) = env.player.inv.item_at(slot) else { return false };
        let Some(stowed) = env.player.inv.item_at(other) else { return false };
        if !ammo.launched_by(stowed) {
            return false;
        }
        other
    };
    if w.hooks.wield_weapon(w.player, other as usize) {
        w.log.push("You switch to your other weapon.");
        w.ui.redraw_quiver = true;
        true
    } else {
        false
    }
}
