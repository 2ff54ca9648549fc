//! The interactive fire loop: trigger the quivered action, let the aim UI
//! cycle or reselect mid-aim, and put the original selection back when the
//! player bows out.

use crate::cycler::{CyclerId, PlayerQuiver};
use crate::menu::choose;
use crate::state::{Env, World};
use crate::types::{Action, Target, TargetCommand};

impl PlayerQuiver {
    /// Fire the quivered action interactively.
    ///
    /// The aim hook may hand back cycling and menu commands; each goes
    /// around the loop again with the new selection. The loop ends on
    /// [`TargetCommand::Fire`] (keeping the selection) or a cancel
    /// (restoring the selection held on entry, if it is still valid).
    /// A selection invalidated mid-loop, e.g. by firing the last of a
    /// stack, is restored the same way.
    pub fn target(&mut self, w: &mut World) {
        let initial = self.action.clone();
        let mut what;
        let mut force_restore;
        loop {
            w.log.clear();
            force_restore = false;
            let step = self.do_target(w);
            match &step {
                None => force_restore = true,
                Some((action, _)) => {
                    if !action.is_valid(&Env::new(w.player, w.config)) {
                        force_restore = true;
                    }
                }
            }
            what = step.map_or(TargetCommand::None, |(_, target)| target.command);
            match what {
                TargetCommand::CycleForward => {
                    self.action.cycle(1, false, w);
                }
                TargetCommand::CycleBackward => {
                    self.action.cycle(-1, false, w);
                }
                TargetCommand::SelectMenu => {
                    choose(self, CyclerId::Primary, false, w);
                }
                TargetCommand::Fire | TargetCommand::None => break,
            }
        }
        if (what == TargetCommand::None || force_restore)
            && initial.get().is_valid(&Env::new(w.player, w.config))
        {
            self.action.set_from_cycler(&initial, w.ui);
        }
    }

    /// One pass: trigger the current selection against a fresh target.
    /// Returns what ran and how it ended; `None` when nothing valid is
    /// quivered.
    fn do_target(&mut self, w: &mut World) -> Option<(Action, Target)> {
        let action = self.action.get();
        if !action.is_valid(&Env::new(w.player, w.config)) {
            return None;
        }
        let mut target = Target::for_fire_loop();
        if !action.is_targeted(&Env::new(w.player, w.config)) {
            // Nothing to aim: resolve against the actor's own tile.
            target.interactive = false;
            target.self_target = true;
        }
        action.trigger(&mut target, w);
        if target.cancelled && target.command == TargetCommand::None {
            w.log.push("Okay, then.");
        }
        Some((action, target))
    }
}
