//! Named wire endpoints and configuration groups of each tile type.

use serde::{Deserialize, Serialize};

use crate::bels::{get_primitive_pins, get_primitives_for_type};
use crate::grid::{PLANES, TileTag, TileType};

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub wire_type: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub kind: String,
}

struct WireList(Vec<Endpoint>);

impl WireList {
    fn add(&mut self, name: impl Into<String>, wire_type: &str) {
        self.0.push(Endpoint {
            name: name.into(),
            wire_type: wire_type.to_string(),
        });
    }
}

const CPE_WIRES: &[(&str, &str)] = &[
    ("CPE.RAM_I1", "CPE_WIRE_L"),
    ("CPE.RAM_I2", "CPE_WIRE_L"),
    ("CPE.IN1", "CPE_WIRE_L"),
    ("CPE.IN2", "CPE_WIRE_L"),
    ("CPE.IN3", "CPE_WIRE_L"),
    ("CPE.IN4", "CPE_WIRE_L"),
    ("CPE.IN5", "CPE_WIRE_L"),
    ("CPE.IN6", "CPE_WIRE_L"),
    ("CPE.IN7", "CPE_WIRE_L"),
    ("CPE.IN8", "CPE_WIRE_L"),
    ("CPE.IN1_int", "CPE_WIRE_INT"),
    ("CPE.IN2_int", "CPE_WIRE_INT"),
    ("CPE.IN3_int", "CPE_WIRE_INT"),
    ("CPE.IN4_int", "CPE_WIRE_INT"),
    ("CPE.IN5_int", "CPE_WIRE_INT"),
    ("CPE.IN6_int", "CPE_WIRE_INT"),
    ("CPE.IN7_int", "CPE_WIRE_INT"),
    ("CPE.IN8_int", "CPE_WIRE_INT"),
    ("CPE.CLK", "CPE_WIRE_L"),
    ("CPE.EN", "CPE_WIRE_L"),
    ("CPE.SR", "CPE_WIRE_L"),
    ("CPE.OUT1", "CPE_WIRE_B"),
    ("CPE.OUT2", "CPE_WIRE_B"),
    ("CPE.RAM_O1", "CPE_WIRE_B"),
    ("CPE.RAM_O2", "CPE_WIRE_B"),
    ("CPE.CINX", "CPE_WIRE_L"),
    ("CPE.PINX", "CPE_WIRE_L"),
    ("CPE.CINY1", "CPE_WIRE_B"),
    ("CPE.PINY1", "CPE_WIRE_B"),
    ("CPE.CINY2", "CPE_WIRE_B"),
    ("CPE.PINY2", "CPE_WIRE_B"),
    ("CPE.COUTX", "CPE_WIRE_B"),
    ("CPE.POUTX", "CPE_WIRE_B"),
    ("CPE.COUTY1", "CPE_WIRE_T"),
    ("CPE.POUTY1", "CPE_WIRE_T"),
    ("CPE.COUTY2", "CPE_WIRE_T"),
    ("CPE.POUTY2", "CPE_WIRE_T"),
];

const BES_WIRES: &[&str] = &[
    "P_CINY1", "P_PINY1", "P_CINY2", "P_PINY2", "CPE_CINY1", "CPE_PINY1", "CPE_CINY2",
    "CPE_PINY2",
];

const CLKIN_WIRES: &[(&str, &str)] = &[
    ("CLKIN.CLK0", "CLKIN_WIRE"),
    ("CLKIN.CLK1", "CLKIN_WIRE"),
    ("CLKIN.CLK2", "CLKIN_WIRE"),
    ("CLKIN.CLK3", "CLKIN_WIRE"),
    ("CLKIN.SER_CLK", "CLKIN_WIRE"),
    ("CLKIN.CLK_REF_INT0", "CLKIN_INT_WIRE"),
    ("CLKIN.CLK_REF_INT1", "CLKIN_INT_WIRE"),
    ("CLKIN.CLK_REF_INT2", "CLKIN_INT_WIRE"),
    ("CLKIN.CLK_REF_INT3", "CLKIN_INT_WIRE"),
    ("CLKIN.CLK_REF_0", "CLKIN_WIRE"),
    ("CLKIN.CLK_REF_1", "CLKIN_WIRE"),
    ("CLKIN.CLK_REF_2", "CLKIN_WIRE"),
    ("CLKIN.CLK_REF_3", "CLKIN_WIRE"),
];

pub fn get_endpoints_for_type(tt: &TileType) -> Vec<Endpoint> {
    let mut wires = WireList(vec![]);

    for prim in get_primitives_for_type(tt) {
        for pin in get_primitive_pins(&prim.kind) {
            if !pin.alias {
                wires.add(
                    format!("{p}.{n}", p = prim.name, n = pin.name),
                    &pin.wire_type,
                );
            }
        }
    }

    if tt.contains(TileTag::Cpe) {
        for &(name, wt) in CPE_WIRES {
            wires.add(name, wt);
        }
        for p in PLANES {
            for i in 0..8 {
                wires.add(format!("IM.P{p:02}.D{i}"), "IM_WIRE");
            }
            wires.add(format!("IM.P{p:02}.Y"), "IM_WIRE");
            if tt.contains(TileTag::Om) && p >= 9 {
                for i in 0..4 {
                    wires.add(format!("OM.P{p:02}.D{i}"), "OM_WIRE");
                }
                wires.add(format!("OM.P{p:02}.Y"), "OM_WIRE");
            }
        }
    }

    if tt.contains(TileTag::SbBig) {
        for p in PLANES {
            let wt = "SB_BIG_WIRE";
            wires.add(format!("SB_BIG.P{p:02}.D0"), wt);
            for i in 1..=4 {
                for d in 2..=7 {
                    wires.add(format!("SB_BIG.P{p:02}.D{d}_{i}"), wt);
                }
                wires.add(format!("SB_BIG.P{p:02}.Y{i}"), wt);
            }
            for w in ["YDIAG", "X34", "X14", "X12", "X23"] {
                wires.add(format!("SB_BIG.P{p:02}.{w}"), wt);
            }
            for i in 1..=4 {
                wires.add(format!("SB_DRIVE.P{p:02}.D{i}.IN"), "SB_DRIVE_WIRE");
                wires.add(format!("SB_DRIVE.P{p:02}.D{i}.OUT"), "SB_DRIVE_WIRE");
                wires.add(
                    format!("SB_DRIVE.P{p:02}.D{i}.OUT_NOINV"),
                    "SB_DRIVE_INT_WIRE",
                );
            }
        }
    }

    if tt.contains(TileTag::SbSml) {
        for p in PLANES {
            let wt = "SB_SML_WIRE";
            wires.add(format!("SB_SML.P{p:02}.D0"), wt);
            for i in 1..=4 {
                wires.add(format!("SB_SML.P{p:02}.D2_{i}"), wt);
                wires.add(format!("SB_SML.P{p:02}.D3_{i}"), wt);
                wires.add(format!("SB_SML.P{p:02}.Y{i}"), wt);
                wires.add(format!("SB_SML.P{p:02}.Y{i}_int"), wt);
            }
            for w in ["YDIAG", "YDIAG_int", "X34", "X14", "X12", "X23"] {
                wires.add(format!("SB_SML.P{p:02}.{w}"), wt);
            }
        }
    }

    if tt.contains(TileTag::Ioes) {
        wires.add("IOES.IO_IN1", "IOES_WIRE");
        wires.add("IOES.IO_IN2", "IOES_WIRE");
        for p in PLANES {
            wires.add(format!("IOES.SB_IN_{p:02}"), "IOES_WIRE");
            wires.add(format!("IOES.ALTIN_{p:02}"), "IOES_WIRE");
        }
    }

    if tt.contains(TileTag::Les) {
        for p in 1..=8 {
            wires.add(format!("LES.SB_Y3.P{p}"), "LES_WIRE");
            wires.add(format!("LES.MDIE1.P{p}"), "LES_WIRE");
        }
        for i in 0..4 {
            wires.add(format!("LES.CLOCK{i}"), "LES_WIRE");
        }
        wires.add("LES.CPE_CINX", "LES_WIRE");
        wires.add("LES.CPE_PINX", "LES_WIRE");
        for sel in 1..=2 {
            wires.add(format!("LES.SB_Y3_SEL{sel}_int"), "LES_INT_WIRE");
            wires.add(format!("LES.MDIE1_SEL{sel}_int"), "LES_INT_WIRE");
            wires.add(format!("LES.CLOCK_SEL{sel}_int"), "LES_INT_WIRE");
        }
    }

    if tt.contains(TileTag::Bes) {
        for p in 1..=8 {
            wires.add(format!("BES.SB_Y4.P{p}"), "BES_WIRE");
            wires.add(format!("BES.MDIE2.P{p}"), "BES_WIRE");
        }
        for i in 0..4 {
            wires.add(format!("BES.CLOCK{i}"), "BES_WIRE");
        }
        for w in BES_WIRES {
            wires.add(format!("BES.{w}"), "BES_WIRE");
        }
        for sel in 1..=4 {
            wires.add(format!("BES.SB_Y4_SEL{sel}_int"), "BES_INT_WIRE");
            wires.add(format!("BES.MDIE2_SEL{sel}_int"), "BES_INT_WIRE");
            wires.add(format!("BES.CLOCK_SEL{sel}_int"), "BES_INT_WIRE");
        }
        for w in &BES_WIRES[4..] {
            wires.add(format!("BES.{w}_int"), "BES_INT_WIRE");
        }
    }

    if tt.contains(TileTag::Res) {
        for w in ["CPE_RAM_O1", "CPE_RAM_O2", "CPE_COUTX", "CPE_POUTX"] {
            wires.add(format!("RES.{w}"), "RES_WIRE");
        }
        for p in 1..=8 {
            wires.add(format!("RES.SB_Y1.P{p}"), "RES_WIRE");
            wires.add(format!("RES.MDIE1.P{p}"), "RES_WIRE");
        }
        for i in 0..4 {
            wires.add(format!("RES.CLOCK{i}"), "RES_WIRE");
        }
        for sel in 1..=4 {
            wires.add(format!("RES.SIG_SEL{sel}_int"), "RES_INT_WIRE");
        }
    }

    if tt.contains(TileTag::Tes) {
        for w in [
            "CPE_RAM_O1",
            "CPE_RAM_O2",
            "CPE_COUTY1",
            "CPE_POUTY1",
            "CPE_COUTY2",
            "CPE_POUTY2",
        ] {
            wires.add(format!("TES.{w}"), "TES_WIRE");
        }
        for p in 1..=8 {
            wires.add(format!("TES.SB_Y2.P{p}"), "TES_WIRE");
            wires.add(format!("TES.MDIE2.P{p}"), "TES_WIRE");
        }
        for i in 0..4 {
            wires.add(format!("TES.CLOCK{i}"), "TES_WIRE");
        }
        for sel in 1..=4 {
            wires.add(format!("TES.SIG_SEL{sel}_int"), "TES_INT_WIRE");
        }
    }

    if tt.contains(TileTag::Pll) {
        for &(name, wt) in CLKIN_WIRES {
            wires.add(name, wt);
        }
        for k in 0..4 {
            for (w, wt) in [
                ("CLK0_", "GLBOUT_WIRE"),
                ("CLK90_", "GLBOUT_WIRE"),
                ("CLK180_", "GLBOUT_WIRE"),
                ("CLK270_", "GLBOUT_WIRE"),
                ("CLK_INT_", "GLBOUT_INT_WIRE"),
                ("CLK_SEL_INT_", "GLBOUT_INT_WIRE"),
                ("CLK_REF_OUT", "GLBOUT_WIRE"),
                ("USR_GLB", "GLBOUT_WIRE"),
                ("GLB", "GLBOUT_WIRE"),
                ("FB_INT_", "GLBOUT_INT_WIRE"),
                ("USR_FB", "GLBOUT_WIRE"),
                ("CLK_FB", "GLBOUT_WIRE"),
            ] {
                wires.add(format!("GLBOUT.{w}{k}"), wt);
            }
        }
    }

    wires.0
}

pub fn get_groups_for_type(tt: &TileType) -> Vec<Group> {
    let mut groups = vec![];
    let mut add = |name: String, kind: &str| {
        groups.push(Group {
            name,
            kind: kind.to_string(),
        })
    };
    if tt.contains(TileTag::Cpe) {
        for p in PLANES {
            add(format!("IM_P{p:02}"), "IM");
            if tt.contains(TileTag::Om) && p >= 9 {
                add(format!("OM_P{p:02}"), "OM");
            }
        }
    }
    if tt.contains(TileTag::SbBig) {
        for p in PLANES {
            add(format!("SB_BIG_P{p:02}"), "SB_BIG");
        }
    }
    if tt.contains(TileTag::SbSml) {
        for p in PLANES {
            add(format!("SB_SML_P{p:02}"), "SB_SML");
        }
    }
    for tag in [TileTag::Ioes, TileTag::Les, TileTag::Res, TileTag::Tes, TileTag::Bes] {
        if tt.contains(tag) {
            add(tag.name().to_string(), tag.name());
        }
    }
    groups
}
