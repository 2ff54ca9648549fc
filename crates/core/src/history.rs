//! Last-fired ammo history, one remembered item per launcher category.
//! This module exists to make "fire again what I fired last time" work
//! across weapon swaps, slot shuffles and reloads. It does not pick
//! fresh ammo; that is the fire order's job.
//!
//! On disk the history is a fixed binary record: a version cookie, a
//! legacy placeholder snapshot and integer, then a count and that many
//! snapshots. A cookie mismatch is a fatal format error; an overlong
//! count is read through and silently truncated.

use std::io::{self, Read, Write};

use crate::state::{
    ArtifactProfile, DeviceKind, Inventory, ItemKind, LauncherKind, MissileKind, Player, UiState,
    WandKind, launch_kind, weapon_ammo_category,
};
use crate::types::{AmmoCategory, ItemId, LaunchKind, PACK_SIZE};

/// Version cookie leading the serialized history record.
const HISTORY_COOKIE: i16 = 0x5131;

/// What the history remembers about a fired item. The live `id` pins the
/// exact item; after a reload only the slot and kind survive.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemSnapshot {
    pub id: Option<ItemId>,
    pub slot: i32,
    pub kind: ItemKind,
    pub quantity: i32,
}

impl ItemSnapshot {
    pub fn capture(inv: &Inventory, slot: i32) -> Option<ItemSnapshot> {
        let item = inv.item_at(slot)?;
        Some(ItemSnapshot { id: inv.id_at(slot), slot, kind: item.kind, quantity: item.quantity })
    }

    /// Stored snapshots always claim quantity one; firing ten darts should
    /// not make the history think ten are still around.
    fn pinned(mut self) -> ItemSnapshot {
        self.quantity = 1;
        self
    }
}

/// Last ammo fired per [`AmmoCategory`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmmoHistory {
    last_used: [Option<ItemSnapshot>; AmmoCategory::ALL.len()],
}

impl AmmoHistory {
    pub fn new() -> AmmoHistory {
        AmmoHistory::default()
    }

    /// Record that `snap` is the quivered ammo for `category`.
    pub fn set_quiver(&mut self, snap: ItemSnapshot, category: AmmoCategory, ui: &mut UiState) {
        self.last_used[category.index()] = Some(snap.pinned());
        ui.redraw_quiver = true;
    }

    /// Record a throw or shot. Only explicit fires (the player chose this
    /// item) update the history; deliberate fumbles never do.
    pub fn on_item_fired(
        &mut self,
        player: &Player,
        snap: ItemSnapshot,
        explicit: bool,
        ui: &mut UiState,
    ) {
        ui.redraw_quiver = true;
        if !explicit {
            return;
        }
        let weapon_kind = player.weapon().map(|w| w.kind);
        match launch_kind(weapon_kind.as_ref(), &snap.kind) {
            LaunchKind::Launched => {
                let category = weapon_ammo_category(weapon_kind.as_ref());
                self.last_used[category.index()] = Some(snap.pinned());
            }
            LaunchKind::Thrown => {
                self.last_used[AmmoCategory::Throw.index()] = Some(snap.pinned());
            }
            LaunchKind::Fumbled => {}
        }
    }

    /// Current pack slot of the remembered ammo for the launcher in
    /// `launcher_slot` (or hand-thrown ammo when it is not a launcher).
    /// `-1` when nothing usable is remembered.
    pub fn last_ammo_for_launcher(&self, player: &Player, launcher_slot: i32) -> i32 {
        let kind = player.inv.item_at(launcher_slot).map(|l| l.kind);
        self.last_ammo(player, weapon_ammo_category(kind.as_ref()))
    }

    pub fn last_ammo(&self, player: &Player, category: AmmoCategory) -> i32 {
        match &self.last_used[category.index()] {
            None => -1,
            Some(snap) => pack_slot(&player.inv, snap),
        }
    }

    pub fn snapshots(&self) -> &[Option<ItemSnapshot>] {
        &self.last_used
    }

    pub fn save<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_i16(out, HISTORY_COOKIE)?;
        // Legacy placeholder item and integer, kept for record layout.
        write_snapshot(out, &None)?;
        write_i32(out, 0)?;
        write_i32(out, self.last_used.len() as i32)?;
        for snap in &self.last_used {
            write_snapshot(out, snap)?;
        }
        Ok(())
    }

    /// Read a history record written by [`save`](AmmoHistory::save).
    ///
    /// Panics on a cookie mismatch: the record is from an incompatible
    /// format version and nothing after the cookie can be trusted.
    pub fn load<R: Read>(&mut self, inf: &mut R) -> io::Result<()> {
        let cookie = read_i16(inf)?;
        assert_eq!(cookie, HISTORY_COOKIE, "ammo history version cookie mismatch");
        read_snapshot(inf)?;
        read_i32(inf)?;
        let count = read_i32(inf)?;
        self.last_used = Default::default();
        for i in 0..count {
            let snap = read_snapshot(inf)?;
            // Entries past the category count are read through and dropped.
            if (i as usize) < self.last_used.len() {
                self.last_used[i as usize] = snap;
            }
        }
        Ok(())
    }
}

/// Where the snapshotted item sits in the pack now, `-1` if it is gone.
/// Identity wins over position; a same-kind stand-in is accepted unless it
/// is inscribed `=f`.
fn pack_slot(inv: &Inventory, snap: &ItemSnapshot) -> i32 {
    if let Some(id) = snap.id
        && let Some(slot) = inv.slot_of(id)
    {
        return slot as i32;
    }
    if let Some(item) = inv.item_at(snap.slot)
        && item.kind == snap.kind
    {
        return snap.slot;
    }
    for slot in 0..PACK_SIZE as i32 {
        if let Some(item) = inv.item_at(slot)
            && item.kind == snap.kind
        {
            return if item.has_inscription("=f") { -1 } else { slot };
        }
    }
    -1
}

// --- binary record helpers -------------------------------------------------

fn write_u8<W: Write>(out: &mut W, v: u8) -> io::Result<()> {
    out.write_all(&[v])
}

fn write_i16<W: Write>(out: &mut W, v: i16) -> io::Result<()> {
    out.write_all(&v.to_le_bytes())
}

fn write_i32<W: Write>(out: &mut W, v: i32) -> io::Result<()> {
    out.write_all(&v.to_le_bytes())
}

fn read_u8<R: Read>(inf: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    inf.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_i16<R: Read>(inf: &mut R) -> io::Result<i16> {
    let mut buf = [0u8; 2];
    inf.read_exact(&mut buf)?;
    Ok(i16::from_le_bytes(buf))
}

fn read_i32<R: Read>(inf: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    inf.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn bad_data(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("ammo history: {what}"))
}

fn write_kind<W: Write>(out: &mut W, kind: &ItemKind) -> io::Result<()> {
    match *kind {
        ItemKind::Launcher(l) => {
            write_u8(out, 0)?;
            write_u8(out, LAUNCHERS.iter().position(|&k| k == l).unwrap_or(0) as u8)
        }
        ItemKind::MeleeWeapon => write_u8(out, 1),
        ItemKind::Missile(m) => {
            write_u8(out, 2)?;
            write_u8(out, MISSILES.iter().position(|&k| k == m).unwrap_or(0) as u8)
        }
        ItemKind::Wand(w) => {
            write_u8(out, 3)?;
            write_u8(out, WANDS.iter().position(|&k| k == w).unwrap_or(0) as u8)
        }
        ItemKind::Device(d) => {
            write_u8(out, 4)?;
            write_u8(out, DEVICES.iter().position(|&k| k == d).unwrap_or(0) as u8)
        }
        ItemKind::Artifact(p) => {
            write_u8(out, 5)?;
            write_u8(out, p.targeted as u8)?;
            write_i32(out, p.hp_cost)?;
            write_i32(out, p.mp_cost)
        }
        ItemKind::Other => write_u8(out, 6),
    }
}

const LAUNCHERS: [LauncherKind; 5] = [
    LauncherKind::Sling,
    LauncherKind::Shortbow,
    LauncherKind::Longbow,
    LauncherKind::HandCrossbow,
    LauncherKind::Arbalest,
];

const MISSILES: [MissileKind; 9] = [
    MissileKind::Stone,
    MissileKind::SlingBullet,
    MissileKind::Arrow,
    MissileKind::Bolt,
    MissileKind::Javelin,
    MissileKind::LargeRock,
    MissileKind::Boomerang,
    MissileKind::Dart,
    MissileKind::ThrowingNet,
];

const WANDS: [WandKind; 4] = [WandKind::Flame, WandKind::Frost, WandKind::Acid, WandKind::Digging];

const DEVICES: [DeviceKind; 5] = [
    DeviceKind::FloodFlask,
    DeviceKind::StormRod,
    DeviceKind::MirrorShard,
    DeviceKind::BeastCage,
    DeviceKind::PortalSigil,
];

fn read_sub<T: Copy>(inf: &mut impl Read, table: &[T], what: &str) -> io::Result<T> {
    let sub = read_u8(inf)? as usize;
    table.get(sub).copied().ok_or_else(|| bad_data(what))
}

fn read_kind<R: Read>(inf: &mut R) -> io::Result<ItemKind> {
    match read_u8(inf)? {
        0 => Ok(ItemKind::Launcher(read_sub(inf, &LAUNCHERS, "unknown launcher kind")?)),
        1 => Ok(ItemKind::MeleeWeapon),
        2 => Ok(ItemKind::Missile(read_sub(inf, &MISSILES, "unknown missile kind")?)),
        3 => Ok(ItemKind::Wand(read_sub(inf, &WANDS, "unknown wand kind")?)),
        4 => Ok(ItemKind::Device(read_sub(inf, &DEVICES, "unknown device kind")?)),
        5 => {
            let targeted = read_u8(inf)? != 0;
            let hp_cost = read_i32(inf)?;
            let mp_cost = read_i32(inf)?;
            Ok(ItemKind::Artifact(ArtifactProfile { targeted, hp_cost, mp_cost }))
        }
        6 => Ok(ItemKind::Other),
        _ => Err(bad_data("unknown item kind tag")),
    }
}

fn write_snapshot<W: Write>(out: &mut W, snap: &Option<ItemSnapshot>) -> io::Result<()> {
    match snap {
        None => write_u8(out, 0),
        Some(snap) => {
            write_u8(out, 1)?;
            write_i32(out, snap.slot)?;
            write_i32(out, snap.quantity)?;
            write_kind(out, &snap.kind)
        }
    }
}

fn read_snapshot<R: Read>(inf: &mut R) -> io::Result<Option<ItemSnapshot>> {
    if read_u8(inf)? == 0 {
        return Ok(None);
    }
    let slot = read_i32(inf)?;
    let quantity = read_i32(inf)?;
    let kind = read_kind(inf)?;
    // Item identity does not survive serialization.
    Ok(Some(ItemSnapshot { id: None, slot, kind, quantity }))
}
