//! Point-to-point connection graph of one die.

use std::collections::BTreeMap;

use enum_map::{EnumMap, enum_map};
use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use unnamed_entity::{EntityId, entity_id};

use crate::dir::Dir;
use crate::grid::{
    ALT_DIR_D6, ALT_DIR_D7, IoBank, IoName, IoPort, PLANES, PLL_X_POS, PLL_Y_POS, USR_RSTN_X_POS,
    USR_RSTN_Y_POS, all_coords, alt_plane, base_loc, edge_of, get_io_name, get_sb_type, is_cpe,
    is_edge_io, is_gpio, is_outmux, is_sb, is_sb_big, next_plane, num_cols, num_rows, prev_plane,
};

entity_id! {
    pub id WireId u16, reserve 1;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

/// A wire at an absolute (die-offset applied) coordinate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub x: i32,
    pub y: i32,
    pub wire: WireId,
}

/// Switchbox CPE output feeding D0 of planes 1..8, for odd and even columns.
const SB_CPE_OUT_ODD: [u8; 8] = [2, 1, 2, 1, 1, 2, 1, 2];
const SB_CPE_OUT_EVEN: [u8; 8] = [1, 2, 1, 2, 2, 1, 2, 1];

/// CPE outputs feeding the four outmux inputs, when plane parity matches the
/// column parity and when it does not.
const OM_CPE_OUT_SAME: [u8; 4] = [2, 2, 1, 1];
const OM_CPE_OUT_OTHER: [u8; 4] = [1, 1, 2, 2];

const SB_BIG_DISTANCES: &[i32] = &[2, 4, 8, 12, 16, 20];
const SB_SML_DISTANCES: &[i32] = &[2, 4];

/// Longest tap that is wired straight from the remote switchbox output;
/// longer ones go through that switchbox's drive stage.
const SB_DIRECT_MAX: i32 = 4;

/// GPIO pads feeding the PLL reference clock inputs `CLKIN.CLK0..3`.
const PLL_CLKIN_PADS: [&str; 4] = ["GPIO_W2_A[8]", "GPIO_W2_A[7]", "GPIO_W2_A[6]", "GPIO_W2_A[5]"];

/// DDR capture: (CPE x, CPE y, RAM_O output, bank).
const DDR_CONNS: [(i32, i32, u8, IoBank); 9] = [
    (97, 128, 1, IoBank::N1),
    (97, 128, 2, IoBank::N2),
    (160, 65, 1, IoBank::E1),
    (160, 65, 2, IoBank::E2),
    (1, 65, 1, IoBank::W1),
    (1, 65, 2, IoBank::W2),
    (96, 1, 1, IoBank::S1),
    (96, 1, 2, IoBank::S2),
    (48, 1, 1, IoBank::S3),
];

fn sb_wire(x: i32, y: i32, p: u32, wire: &str) -> String {
    format!("{t}.P{p:02}.{wire}", t = get_sb_type(x, y))
}

/// 8×8 super-tile containing a switchbox coordinate.
fn sb_super_tile(x: i32, y: i32) -> (i32, i32) {
    ((x + 15).div_euclid(8), (y + 15).div_euclid(8))
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Die {
    pub name: String,
    pub die_x: i32,
    pub die_y: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    io_pads: BTreeMap<IoName, Location>,
    gpio_to_loc: BTreeMap<String, Location>,
    wires: IndexSet<String>,
    conn: IndexMap<Connection, Vec<Connection>>,
    rev_conn: IndexMap<Connection, Vec<Connection>>,
}

impl Die {
    /// Creates an empty die and records its IO pad locations.
    pub fn new(name: &str, die_x: i32, die_y: i32) -> Self {
        let mut io_pads = BTreeMap::new();
        let mut gpio_to_loc = BTreeMap::new();
        for (x, y) in all_coords() {
            if !is_gpio(x, y) {
                continue;
            }
            let Some(io) = get_io_name(x, y) else {
                continue;
            };
            io_pads.insert(io, Location { x, y });
            gpio_to_loc.insert(io.gpio_name(), Location { x, y });
        }
        Die {
            name: name.to_string(),
            die_x,
            die_y,
            offset_x: die_x * num_cols(),
            offset_y: die_y * num_rows(),
            io_pads,
            gpio_to_loc,
            wires: IndexSet::new(),
            conn: IndexMap::new(),
            rev_conn: IndexMap::new(),
        }
    }

    fn intern(&mut self, name: &str) -> WireId {
        if let Some(idx) = self.wires.get_index_of(name) {
            return WireId::from_idx(idx);
        }
        WireId::from_idx(self.wires.insert_full(name.to_string()).0)
    }

    pub fn wire_id(&self, name: &str) -> Option<WireId> {
        self.wires.get_index_of(name).map(WireId::from_idx)
    }

    #[track_caller]
    pub fn wire_name(&self, wire: WireId) -> &str {
        match self.wires.get_index(wire.to_idx()) {
            Some(name) => name,
            None => panic!("no wire {i} in die {n}", i = wire.to_idx(), n = self.name),
        }
    }

    pub fn wires(&self) -> impl Iterator<Item = (WireId, &str)> {
        self.wires
            .iter()
            .enumerate()
            .map(|(idx, name)| (WireId::from_idx(idx), name.as_str()))
    }

    fn key(&self, x: i32, y: i32, wire: &str) -> Option<Connection> {
        Some(Connection {
            x: x + self.offset_x,
            y: y + self.offset_y,
            wire: self.wire_id(wire)?,
        })
    }

    /// Records that `src` at (src_x, src_y) drives `dst` at (dst_x, dst_y).
    /// Coordinates are die-local.  Loads named `CPE.RAM_I*` are also indexed
    /// in the reverse direction.
    pub fn create_conn(
        &mut self,
        src_x: i32,
        src_y: i32,
        src: &str,
        dst_x: i32,
        dst_y: i32,
        dst: &str,
    ) {
        let key = Connection {
            x: src_x + self.offset_x,
            y: src_y + self.offset_y,
            wire: self.intern(src),
        };
        let item = Connection {
            x: dst_x + self.offset_x,
            y: dst_y + self.offset_y,
            wire: self.intern(dst),
        };
        self.conn.entry(key).or_insert_with(|| vec![key]).push(item);
        if dst.starts_with("CPE.RAM_I") {
            self.rev_conn.entry(item).or_insert_with(|| vec![item]).push(key);
        }
        trace!(
            "({sx},{sy}) {src} => ({dx},{dy}) {dst}",
            sx = key.x,
            sy = key.y,
            dx = item.x,
            dy = item.y
        );
    }

    /// The driver itself followed by everything it drives, or nothing if
    /// the wire drives nothing.
    pub fn get_connections_for(&self, x: i32, y: i32, wire: &str) -> &[Connection] {
        self.key(x, y, wire)
            .and_then(|key| self.conn.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The load itself followed by everything driving it.  Only `CPE.RAM_I*`
    /// loads are indexed.
    pub fn get_connections_to(&self, x: i32, y: i32, wire: &str) -> &[Connection] {
        self.key(x, y, wire)
            .and_then(|key| self.rev_conn.get(&key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every driver with its fan-out, in creation order.
    pub fn connections(&self) -> impl Iterator<Item = (&Connection, &[Connection])> {
        self.conn.iter().map(|(k, v)| (k, &v[1..]))
    }

    pub fn num_drivers(&self) -> usize {
        self.conn.len()
    }

    pub fn num_connections(&self) -> usize {
        self.conn.values().map(|v| v.len() - 1).sum()
    }

    pub fn gpio_loc(&self, name: &str) -> Option<Location> {
        self.gpio_to_loc.get(name).copied()
    }

    pub fn io_pad(&self, bank: IoBank, port: IoPort, num: u32) -> Option<Location> {
        self.io_pads.get(&IoName { bank, port, num }).copied()
    }

    /// GPIO pads ordered by name.
    pub fn gpio_pads(&self) -> impl Iterator<Item = (&str, Location)> {
        self.gpio_to_loc
            .iter()
            .map(|(name, &loc)| (name.as_str(), loc))
    }

    #[track_caller]
    fn pad(&self, name: &str) -> Location {
        match self.gpio_loc(name) {
            Some(loc) => loc,
            None => panic!("no IO pad {name} in die {n}", n = self.name),
        }
    }

    fn create_cpe(&mut self, x: i32, y: i32) {
        for (p, inp) in [
            (1, "IN1"),
            (2, "IN2"),
            (3, "IN3"),
            (4, "IN4"),
            (5, "IN5"),
            (6, "IN6"),
            (7, "IN7"),
            (8, "IN8"),
            (9, "CLK"),
            (10, "EN"),
            (11, "SR"),
        ] {
            self.create_conn(x, y, &format!("IM.P{p:02}.Y"), x, y, &format!("CPE.{inp}"));
        }
        if is_cpe(x, y - 1) {
            self.create_conn(x, y - 1, "CPE.COUTY1", x, y, "CPE.CINY1");
            self.create_conn(x, y - 1, "CPE.COUTY2", x, y, "CPE.CINY2");
            self.create_conn(x, y - 1, "CPE.POUTY1", x, y, "CPE.PINY1");
            self.create_conn(x, y - 1, "CPE.POUTY2", x, y, "CPE.PINY2");
        }
        if is_cpe(x - 1, y) {
            self.create_conn(x - 1, y, "CPE.COUTX", x, y, "CPE.CINX");
            self.create_conn(x - 1, y, "CPE.POUTX", x, y, "CPE.PINX");
        }
    }

    fn create_inmux(&mut self, x: i32, y: i32) {
        let offset = if is_sb(x, y) { 2 } else { 1 };
        for p in PLANES {
            let src = [
                (x - offset, y),
                (x, y - offset),
                (x + offset, y),
                (x, y + offset),
            ];
            for (i, (sx, sy)) in src.into_iter().enumerate() {
                self.create_conn(
                    sx,
                    sy,
                    &sb_wire(sx, sy, p, &format!("Y{n}", n = i + 1)),
                    x,
                    y,
                    &format!("IM.P{p:02}.D{i}"),
                );
            }
            if is_cpe(x - 1, y - 1) {
                self.create_conn(
                    x - 1,
                    y - 1,
                    &format!("IM.P{p:02}.Y"),
                    x,
                    y,
                    &format!("IM.P{p:02}.D4"),
                );
            }
            if is_cpe(x + 1, y + 1) {
                self.create_conn(
                    x + 1,
                    y + 1,
                    &format!("IM.P{p:02}.Y"),
                    x,
                    y,
                    &format!("IM.P{p:02}.D5"),
                );
            }
            let alt = alt_plane(ALT_DIR_D6, p);
            self.create_conn(
                x,
                y,
                &format!("IM.P{alt:02}.Y"),
                x,
                y,
                &format!("IM.P{p:02}.D6"),
            );
            let alt = alt_plane(ALT_DIR_D7, p);
            self.create_conn(
                x,
                y,
                &format!("IM.P{alt:02}.Y"),
                x,
                y,
                &format!("IM.P{p:02}.D7"),
            );
        }
    }

    fn create_outmux(&mut self, x: i32, y: i32) {
        let (x0, y0) = base_loc(x, y);
        for p in 9..=12 {
            let outputs = if p % 2 == (x & 1) {
                OM_CPE_OUT_SAME
            } else {
                OM_CPE_OUT_OTHER
            };
            let srcs = [(x0, y0), (x0, y0 + 1), (x0 + 1, y0), (x0 + 1, y0 + 1)];
            for (i, (sx, sy)) in srcs.into_iter().enumerate() {
                self.create_conn(
                    sx,
                    sy,
                    &format!("CPE.OUT{o}", o = outputs[i]),
                    x,
                    y,
                    &format!("OM.P{p:02}.D{i}"),
                );
            }
        }
    }

    fn create_sb(&mut self, x: i32, y: i32) {
        let (x0, y0) = base_loc(x, y);
        let distances = if is_sb_big(x, y) {
            SB_BIG_DISTANCES
        } else {
            SB_SML_DISTANCES
        };
        for p in PLANES {
            if is_cpe(x, y) {
                if p < 9 {
                    let idx = (p - 1) as usize;
                    let cpe_x = x0 + if idx & 2 != 0 { 1 } else { 0 };
                    let cpe_y = y0 + if idx & 1 != 0 { 1 } else { 0 };
                    let out = if x & 1 != 0 {
                        SB_CPE_OUT_ODD
                    } else {
                        SB_CPE_OUT_EVEN
                    };
                    self.create_conn(
                        cpe_x,
                        cpe_y,
                        &format!("CPE.OUT{o}", o = out[idx]),
                        x,
                        y,
                        &sb_wire(x, y, p, "D0"),
                    );
                } else {
                    self.create_conn(
                        x,
                        y,
                        &format!("OM.P{p:02}.Y"),
                        x,
                        y,
                        &sb_wire(x, y, p, "D0"),
                    );
                }
            }

            for (i, &distance) in distances.iter().enumerate() {
                for dir in Dir::DIRS {
                    let n = dir.sb_index() + 1;
                    let (sx, sy) = match dir {
                        Dir::W => (x - distance, y),
                        Dir::S => (x, y - distance),
                        Dir::E => (x + distance, y),
                        Dir::N => (x, y + distance),
                    };
                    if !is_sb(sx, sy) {
                        continue;
                    }
                    let src = if distance > SB_DIRECT_MAX {
                        let (t1x, t1y) = sb_super_tile(sx, sy);
                        let (t2x, t2y) = sb_super_tile(x, y);
                        let dist = (t1x - t2x).abs() + (t1y - t2y).abs();
                        if dist % 2 == 1 {
                            format!("SB_DRIVE.P{p:02}.D{n}.OUT")
                        } else {
                            format!("SB_DRIVE.P{p:02}.D{n}.OUT_NOINV")
                        }
                    } else {
                        sb_wire(sx, sy, p, &format!("Y{n}"))
                    };
                    self.create_conn(
                        sx,
                        sy,
                        &src,
                        x,
                        y,
                        &sb_wire(x, y, p, &format!("D{d}_{n}", d = i + 2)),
                    );
                }
            }

            if is_sb_big(x, y) {
                for n in 1..=4 {
                    self.create_conn(
                        x,
                        y,
                        &sb_wire(x, y, p, &format!("Y{n}")),
                        x,
                        y,
                        &format!("SB_DRIVE.P{p:02}.D{n}.IN"),
                    );
                }
            }

            // X12 and X34 stay unconnected on the fabric border.
            if is_sb(x - 1, y - 1) {
                self.create_conn(
                    x - 1,
                    y - 1,
                    &sb_wire(x - 1, y - 1, p, "YDIAG"),
                    x,
                    y,
                    &sb_wire(x, y, p, "X12"),
                );
            }
            if is_sb(x + 1, y + 1) {
                self.create_conn(
                    x + 1,
                    y + 1,
                    &sb_wire(x + 1, y + 1, p, "YDIAG"),
                    x,
                    y,
                    &sb_wire(x, y, p, "X34"),
                );
            }
            self.create_conn(
                x,
                y,
                &sb_wire(x, y, prev_plane(p), "YDIAG"),
                x,
                y,
                &sb_wire(x, y, p, "X14"),
            );
            self.create_conn(
                x,
                y,
                &sb_wire(x, y, next_plane(p), "YDIAG"),
                x,
                y,
                &sb_wire(x, y, p, "X23"),
            );
        }
    }

    fn create_io(&mut self, x: i32, y: i32) {
        let (mut cpe_x, mut cpe_y) = (x, y);
        let (mut gpio_x, mut gpio_y) = (x, y);
        let (mut sb_x, mut sb_y) = (x, y);
        let mut alt = false;
        let edge = edge_of(x, y).unwrap_or(Dir::N);
        match edge {
            Dir::W => {
                cpe_x += 3;
                if is_sb(x + 1, y) {
                    sb_x += 1;
                } else {
                    sb_x += 2;
                    gpio_y -= 1;
                    alt = true;
                }
            }
            Dir::E => {
                cpe_x -= 3;
                if is_sb(x - 1, y) {
                    sb_x -= 1;
                    gpio_y -= 1;
                    alt = true;
                } else {
                    sb_x -= 2;
                }
            }
            Dir::S => {
                cpe_y += 3;
                if is_sb(x, y + 1) {
                    sb_y += 1;
                } else {
                    sb_y += 2;
                    gpio_x -= 1;
                    alt = true;
                }
            }
            Dir::N => {
                cpe_y -= 3;
                if is_sb(x, y - 1) {
                    sb_y -= 1;
                    gpio_x -= 1;
                    alt = true;
                } else {
                    sb_y -= 2;
                }
            }
        }
        // The switchbox output facing the border.
        let output = format!("Y{n}", n = (!edge).sb_index() + 1);

        for p in PLANES {
            self.create_conn(
                sb_x,
                sb_y,
                &sb_wire(sb_x, sb_y, p, &output),
                x,
                y,
                &format!("IOES.ALTIN_{p:02}"),
            );
            self.create_conn(
                x,
                y,
                &format!("IOES.SB_IN_{p:02}"),
                sb_x,
                sb_y,
                &sb_wire(sb_x, sb_y, p, "D0"),
            );
        }
        self.create_conn(gpio_x, gpio_y, "GPIO.IN1", x, y, "IOES.IO_IN1");
        self.create_conn(gpio_x, gpio_y, "GPIO.IN2", x, y, "IOES.IO_IN2");

        let (out1, out2) = if alt {
            ("GPIO.OUT3", "GPIO.OUT4")
        } else {
            ("GPIO.OUT1", "GPIO.OUT2")
        };
        self.create_conn(cpe_x, cpe_y, "CPE.RAM_O1", gpio_x, gpio_y, out1);
        self.create_conn(cpe_x, cpe_y, "CPE.RAM_O2", gpio_x, gpio_y, out2);
    }

    fn create_pll(&mut self) {
        for (k, pad) in PLL_CLKIN_PADS.into_iter().enumerate() {
            let loc = self.pad(pad);
            self.create_conn(
                loc.x,
                loc.y,
                "GPIO.IN1",
                PLL_X_POS,
                PLL_Y_POS,
                &format!("CLKIN.CLK{k}"),
            );
        }
        let pll = (PLL_X_POS, PLL_Y_POS);
        for k in 0..4 {
            let kk = k as i32;
            for (cpe_y, out, wire) in [
                (128 - kk, 1, format!("GLBOUT.USR_GLB{k}")),
                (128 - kk, 2, format!("GLBOUT.USR_FB{k}")),
                (124 - kk, 1, format!("PLL{k}.USR_CLK_REF")),
                (120 - kk, 1, format!("PLL{k}.USR_LOCKED_STDY_RST")),
                (116 - kk, 1, format!("PLL{k}.USR_SEL_A_B")),
            ] {
                self.create_conn(1, cpe_y, &format!("CPE.RAM_O{out}"), pll.0, pll.1, &wire);
            }
        }
        for k in 0..4 {
            self.create_conn(
                pll.0,
                pll.1,
                &format!("PLL{k}.USR_PLL_LOCKED"),
                1,
                128 - k,
                "CPE.RAM_I2",
            );
        }
        for k in 0..4 {
            self.create_conn(
                pll.0,
                pll.1,
                &format!("PLL{k}.USR_PLL_LOCKED_STDY"),
                1,
                124 - k,
                "CPE.RAM_I2",
            );
        }
        let mut cpe_x = 39;
        for k in 0..4 {
            for phase in ["CLK0", "CLK90", "CLK180", "CLK270"] {
                self.create_conn(
                    pll.0,
                    pll.1,
                    &format!("GLBOUT.{phase}_{k}"),
                    cpe_x,
                    128,
                    "CPE.RAM_I1",
                );
                cpe_x += 1;
            }
        }
    }

    fn global_mesh_conn(&mut self, x: i32, y: i32, inp: &str) {
        if !is_sb_big(x, y) {
            return;
        }
        for p in PLANES {
            self.create_conn(
                PLL_X_POS,
                PLL_Y_POS,
                &format!("GLBOUT.GLB{g}", g = (p - 1) & 3),
                x,
                y,
                &format!("SB_BIG.P{p:02}.{inp}"),
            );
        }
    }

    fn global_mesh(&mut self) {
        // Corner switchboxes the per-edge stride misses.
        let corners: EnumMap<Dir, (i32, i32)> = enum_map! {
            Dir::W => (-1, -1),
            Dir::S => (-1, -1),
            Dir::E => (159, -1),
            Dir::N => (-1, 127),
        };
        for dir in [Dir::W, Dir::S, Dir::E, Dir::N] {
            let inp = format!("D7_{n}", n = dir.sb_index() + 1);
            match dir {
                Dir::W => {
                    for y in 0..=130 {
                        self.global_mesh_conn(2 - y % 4, y, &inp);
                    }
                }
                Dir::S => {
                    for x in 0..=162 {
                        self.global_mesh_conn(x, 2 - x % 4, &inp);
                    }
                }
                Dir::E => {
                    for y in 0..=130 {
                        self.global_mesh_conn(162 - y % 4, y, &inp);
                    }
                }
                Dir::N => {
                    for x in 0..=162 {
                        self.global_mesh_conn(x, 130 - x % 4, &inp);
                    }
                }
            }
            let (cx, cy) = corners[dir];
            self.global_mesh_conn(cx, cy, &inp);
        }
    }

    fn edge_clocks(&mut self, x: i32, y: i32, es: &str) {
        for k in 0..4 {
            self.create_conn(
                PLL_X_POS,
                PLL_Y_POS,
                &format!("GLBOUT.GLB{k}"),
                x,
                y,
                &format!("{es}.CLOCK{k}"),
            );
        }
    }

    fn edge_select(&mut self) {
        for y in 1..=128 {
            self.create_conn(-2, y, "LES.CPE_CINX", 1, y, "CPE.CINX");
            self.create_conn(-2, y, "LES.CPE_PINX", 1, y, "CPE.PINX");
            self.edge_clocks(-2, y, "LES");
            let sb_x = if y % 2 == 1 { -1 } else { 0 };
            for p in 1..=8 {
                self.create_conn(
                    sb_x,
                    y,
                    &sb_wire(sb_x, y, p, "Y3"),
                    -2,
                    y,
                    &format!("LES.SB_Y3.P{p}"),
                );
            }
        }

        for x in 1..=160 {
            for w in ["CINY1", "PINY1", "CINY2", "PINY2"] {
                self.create_conn(x, -2, &format!("BES.CPE_{w}"), x, 1, &format!("CPE.{w}"));
            }
            if x > 1 {
                for w in ["CINY1", "PINY1", "CINY2", "PINY2"] {
                    self.create_conn(
                        x - 1,
                        -2,
                        &format!("BES.CPE_{w}"),
                        x,
                        -2,
                        &format!("BES.P_{w}"),
                    );
                }
            }
            self.edge_clocks(x, -2, "BES");
            let sb_y = if x % 2 == 1 { -1 } else { 0 };
            for p in 1..=8 {
                self.create_conn(
                    x,
                    sb_y,
                    &sb_wire(x, sb_y, p, "Y4"),
                    x,
                    -2,
                    &format!("BES.SB_Y4.P{p}"),
                );
            }
        }

        for y in 1..=128 {
            for w in ["RAM_O1", "RAM_O2", "COUTX", "POUTX"] {
                self.create_conn(160, y, &format!("CPE.{w}"), 163, y, &format!("RES.CPE_{w}"));
            }
            self.edge_clocks(163, y, "RES");
            let sb_x = if y % 2 == 1 { 161 } else { 162 };
            for p in 1..=8 {
                self.create_conn(
                    sb_x,
                    y,
                    &sb_wire(sb_x, y, p, "Y1"),
                    163,
                    y,
                    &format!("RES.SB_Y1.P{p}"),
                );
            }
        }

        for x in 28..=160 {
            for w in ["RAM_O1", "RAM_O2", "COUTY1", "POUTY1", "COUTY2", "POUTY2"] {
                self.create_conn(x, 128, &format!("CPE.{w}"), x, 131, &format!("TES.CPE_{w}"));
            }
            self.edge_clocks(x, 131, "TES");
            let sb_y = if x % 2 == 1 { 129 } else { 130 };
            for p in 1..=8 {
                self.create_conn(
                    x,
                    sb_y,
                    &sb_wire(x, sb_y, p, "Y2"),
                    x,
                    131,
                    &format!("TES.SB_Y2.P{p}"),
                );
            }
        }
    }

    fn connect_ddr_i(&mut self, x: i32, y: i32, out: u8, bank: IoBank) {
        for port in [IoPort::A, IoPort::B] {
            for num in 0..9 {
                let name = IoName { bank, port, num }.gpio_name();
                let loc = self.pad(&name);
                self.create_conn(x, y, &format!("CPE.RAM_O{out}"), loc.x, loc.y, "GPIO.DDR");
            }
        }
    }

    fn misc_connections(&mut self) {
        self.create_conn(
            USR_RSTN_X_POS,
            USR_RSTN_Y_POS,
            "USR_RSTN.USR_RSTN",
            USR_RSTN_X_POS,
            USR_RSTN_Y_POS,
            "CPE.RAM_I2",
        );
        for (x, y, out, bank) in DDR_CONNS {
            self.connect_ddr_i(x, y, out, bank);
        }
    }

    fn run_pass(&mut self, pass: &str, f: impl FnOnce(&mut Self)) {
        let before = self.num_connections();
        f(self);
        debug!(
            "die {n}: {pass}: {c} connections",
            n = self.name,
            c = self.num_connections() - before
        );
    }

    /// Builds the whole in-die graph: one sweep over every tile, then the
    /// die-wide clock, edge and misc wiring that refers to tile wires.
    pub fn create_in_die_connections(&mut self) {
        self.run_pass("tiles", |die| {
            for (x, y) in all_coords() {
                if is_cpe(x, y) {
                    die.create_cpe(x, y);
                    die.create_inmux(x, y);
                    if is_outmux(x, y) {
                        die.create_outmux(x, y);
                    }
                }
                if is_sb(x, y) {
                    die.create_sb(x, y);
                }
                if is_edge_io(x, y) {
                    die.create_io(x, y);
                }
            }
        });
        self.run_pass("pll", Self::create_pll);
        self.run_pass("global mesh", Self::global_mesh);
        self.run_pass("edge select", Self::edge_select);
        self.run_pass("misc", Self::misc_connections);
        debug!(
            "die {n}: {w} wires, {d} drivers, {c} connections",
            n = self.name,
            w = self.wires.len(),
            d = self.num_drivers(),
            c = self.num_connections()
        );
    }

    /// Renders a connection as `(x,y) WIRE`.
    pub fn display_conn(&self, conn: &Connection) -> String {
        format!(
            "({x},{y}) {w}",
            x = conn.x,
            y = conn.y,
            w = self.wire_name(conn.wire),
        )
    }
}
