//! Hardware primitives and their pins.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::grid::{TileTag, TileType};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum PinDir {
    Input,
    Output,
    Inout,
}

impl std::fmt::Display for PinDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinDir::Input => write!(f, "INPUT"),
            PinDir::Output => write!(f, "OUTPUT"),
            PinDir::Inout => write!(f, "INOUT"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Pin {
    pub name: Cow<'static, str>,
    pub dir: PinDir,
    pub wire_type: Cow<'static, str>,
    /// The pin is merged into a shared tile-level wire (see
    /// [`get_pin_connection_name`]) and has no endpoint of its own.
    pub alias: bool,
}

const fn pin(name: &'static str, dir: PinDir, wire_type: &'static str, alias: bool) -> Pin {
    Pin {
        name: Cow::Borrowed(name),
        dir,
        wire_type: Cow::Borrowed(wire_type),
        alias,
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Primitive {
    pub name: Cow<'static, str>,
    pub kind: Cow<'static, str>,
    pub z: u32,
}

const fn prim(name: &'static str, kind: &'static str, z: u32) -> Primitive {
    Primitive {
        name: Cow::Borrowed(name),
        kind: Cow::Borrowed(kind),
        z,
    }
}

use PinDir::{Input as I, Output as O};

const CPE_HALF_U_PINS: &[Pin] = &[
    pin("RAM_I", I, "CPE_WIRE_L", true),
    pin("IN1", I, "CPE_WIRE_L", true),
    pin("IN2", I, "CPE_WIRE_L", true),
    pin("IN3", I, "CPE_WIRE_L", true),
    pin("IN4", I, "CPE_WIRE_L", true),
    pin("CLK", I, "CPE_WIRE_L", true),
    pin("EN", I, "CPE_WIRE_L", true),
    pin("SR", I, "CPE_WIRE_L", true),
    pin("OUT", O, "CPE_WIRE_B", true),
    pin("RAM_O", O, "CPE_WIRE_B", true),
];

const CPE_HALF_L_PINS: &[Pin] = &[
    pin("RAM_I", I, "CPE_WIRE_L", true),
    pin("IN1", I, "CPE_WIRE_L", true),
    pin("IN2", I, "CPE_WIRE_L", true),
    pin("IN3", I, "CPE_WIRE_L", true),
    pin("IN4", I, "CPE_WIRE_L", true),
    pin("CLK", I, "CPE_WIRE_L", true),
    pin("EN", I, "CPE_WIRE_L", true),
    pin("SR", I, "CPE_WIRE_L", true),
    pin("OUT", O, "CPE_WIRE_B", true),
    pin("RAM_O", O, "CPE_WIRE_B", true),
    pin("CINX", I, "CPE_WIRE_L", true),
    pin("PINX", I, "CPE_WIRE_L", true),
    pin("CINY1", I, "CPE_WIRE_B", true),
    pin("PINY1", I, "CPE_WIRE_B", true),
    pin("CINY2", I, "CPE_WIRE_B", true),
    pin("PINY2", I, "CPE_WIRE_B", true),
    pin("COUTX", O, "CPE_WIRE_B", true),
    pin("POUTX", O, "CPE_WIRE_B", true),
    pin("COUTY1", O, "CPE_WIRE_T", true),
    pin("POUTY1", O, "CPE_WIRE_T", true),
    pin("COUTY2", O, "CPE_WIRE_T", true),
    pin("POUTY2", O, "CPE_WIRE_T", true),
];

const GPIO_PINS: &[Pin] = &[
    pin("IN1", O, "GPIO_WIRE", false),
    pin("IN2", O, "GPIO_WIRE", false),
    pin("OUT1", I, "GPIO_WIRE", false),
    pin("OUT2", I, "GPIO_WIRE", false),
    pin("OUT3", I, "GPIO_WIRE", false),
    pin("OUT4", I, "GPIO_WIRE", false),
    pin("DDR", I, "GPIO_WIRE", false),
    pin("RESET", I, "GPIO_WIRE", false),
    pin("CLOCK1", I, "GPIO_WIRE", false),
    pin("CLOCK2", I, "GPIO_WIRE", false),
    pin("CLOCK3", I, "GPIO_WIRE", false),
    pin("CLOCK4", I, "GPIO_WIRE", false),
    pin("DI", I, "GPIO_WIRE", false),
    pin("DO", O, "GPIO_WIRE", false),
    pin("OE", O, "GPIO_WIRE", false),
];

const BUFG_PINS: &[Pin] = &[
    pin("I", I, "BUFG_WIRE", true),
    pin("O", O, "BUFG_WIRE", true),
];

const PLL_PINS: &[Pin] = &[
    pin("CLK_REF", I, "PLL_WIRE", true),
    pin("USR_CLK_REF", I, "PLL_WIRE", false),
    pin("USR_SEL_A_B", I, "PLL_WIRE", false),
    pin("CLK_FEEDBACK", I, "PLL_WIRE", true),
    pin("USR_LOCKED_STDY_RST", I, "PLL_WIRE", false),
    pin("CLK0", O, "PLL_WIRE", false),
    pin("CLK90", O, "PLL_WIRE", false),
    pin("CLK180", O, "PLL_WIRE", false),
    pin("CLK270", O, "PLL_WIRE", false),
    pin("CLK_REF_OUT", O, "PLL_WIRE", true),
    pin("USR_PLL_LOCKED_STDY", O, "PLL_WIRE", false),
    pin("USR_PLL_LOCKED", O, "PLL_WIRE", false),
];

const USR_RSTN_PINS: &[Pin] = &[pin("USR_RSTN", O, "USR_RSTN_WIRE", false)];

/// Every primitive kind with its ordered pin list.  The order is stable and
/// is the order identifiers are exported in.
pub const PRIMITIVES_PINS: &[(&str, &[Pin])] = &[
    ("CPE_HALF_U", CPE_HALF_U_PINS),
    ("CPE_HALF_L", CPE_HALF_L_PINS),
    ("GPIO", GPIO_PINS),
    ("BUFG", BUFG_PINS),
    ("PLL", PLL_PINS),
    ("USR_RSTN", USR_RSTN_PINS),
];

pub fn primitive_kinds() -> impl Iterator<Item = &'static str> {
    PRIMITIVES_PINS.iter().map(|&(kind, _)| kind)
}

/// Pins of a primitive kind.  Asking for a kind that is not in the catalog
/// is a bug in the caller.
#[track_caller]
pub fn get_primitive_pins(kind: &str) -> &'static [Pin] {
    PRIMITIVES_PINS
        .iter()
        .find(|&&(k, _)| k == kind)
        .map(|&(_, pins)| pins)
        .unwrap_or_else(|| panic!("no primitive kind {kind}"))
}

const CPE_PRIMS: &[Primitive] = &[
    prim("CPE_HALF_U", "CPE_HALF_U", 0),
    prim("CPE_HALF_L", "CPE_HALF_L", 1),
];

const PLL_PRIMS: &[Primitive] = &[
    prim("BUFG0", "BUFG", 0),
    prim("BUFG1", "BUFG", 1),
    prim("BUFG2", "BUFG", 2),
    prim("BUFG3", "BUFG", 3),
    prim("PLL0", "PLL", 4),
    prim("PLL1", "PLL", 5),
    prim("PLL2", "PLL", 6),
    prim("PLL3", "PLL", 7),
];

pub fn get_primitives_for_type(tt: &TileType) -> Vec<Primitive> {
    let mut res = vec![];
    if tt.contains(TileTag::Cpe) {
        res.extend_from_slice(CPE_PRIMS);
    }
    if tt.contains(TileTag::Gpio) {
        res.push(prim("GPIO", "GPIO", 0));
    }
    if tt.contains(TileTag::Pll) {
        res.extend_from_slice(PLL_PRIMS);
    }
    if tt.contains(TileTag::UsrRstn) {
        res.push(prim("USR_RSTN", "USR_RSTN", 2));
    }
    res
}

/// Name of the tile-level wire a primitive pin is attached to.
pub fn get_pin_connection_name(prim: &Primitive, pin: &Pin) -> String {
    match &*prim.kind {
        "BUFG" => {
            if pin.dir == PinDir::Input {
                format!("GLBOUT.CLK_SEL_INT_{z}", z = prim.z)
            } else {
                format!("GLBOUT.GLB{z}", z = prim.z)
            }
        }
        "PLL" => {
            let idx = prim.z - 4;
            match &*pin.name {
                "CLK_REF" => format!("CLKIN.CLK_REF_{idx}"),
                "CLK0" => format!("GLBOUT.CLK0_{idx}"),
                "CLK90" => format!("GLBOUT.CLK90_{idx}"),
                "CLK180" => format!("GLBOUT.CLK180_{idx}"),
                "CLK270" => format!("GLBOUT.CLK270_{idx}"),
                "CLK_REF_OUT" => format!("GLBOUT.CLK_REF_OUT{idx}"),
                "CLK_FEEDBACK" => format!("GLBOUT.CLK_FB{idx}"),
                _ => format!("{p}.{n}", p = prim.name, n = pin.name),
            }
        }
        "CPE_HALF_U" => match &*pin.name {
            "OUT" => "CPE.OUT2".to_string(),
            "IN1" => "CPE.IN1_int".to_string(),
            "IN2" => "CPE.IN2_int".to_string(),
            "IN3" => "CPE.IN3_int".to_string(),
            "IN4" => "CPE.IN4_int".to_string(),
            "RAM_O" => "CPE.RAM_O2".to_string(),
            "RAM_I" => "CPE.RAM_I2".to_string(),
            name => format!("CPE.{name}"),
        },
        "CPE_HALF_L" => match &*pin.name {
            "OUT" => "CPE.OUT1".to_string(),
            "IN1" => "CPE.IN5_int".to_string(),
            "IN2" => "CPE.IN6_int".to_string(),
            "IN3" => "CPE.IN7_int".to_string(),
            "IN4" => "CPE.IN8_int".to_string(),
            "RAM_O" => "CPE.RAM_O1".to_string(),
            "RAM_I" => "CPE.RAM_I1".to_string(),
            name => format!("CPE.{name}"),
        },
        _ => format!("{p}.{n}", p = prim.name, n = pin.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::get_tile_type_set;

    fn find_pin(kind: &str, name: &str) -> &'static Pin {
        get_primitive_pins(kind)
            .iter()
            .find(|p| p.name == name)
            .unwrap()
    }

    #[test]
    fn catalog_order() {
        assert_eq!(
            primitive_kinds().collect::<Vec<_>>(),
            ["CPE_HALF_U", "CPE_HALF_L", "GPIO", "BUFG", "PLL", "USR_RSTN"]
        );
        assert_eq!(get_primitive_pins("CPE_HALF_U").len(), 10);
        assert_eq!(get_primitive_pins("CPE_HALF_L").len(), 22);
        assert_eq!(get_primitive_pins("GPIO").len(), 15);
        assert_eq!(get_primitive_pins("PLL").len(), 12);
    }

    #[test]
    #[should_panic(expected = "no primitive kind LUT4")]
    fn unknown_kind_panics() {
        get_primitive_pins("LUT4");
    }

    #[test]
    fn pll_tile_primitives() {
        let prims = get_primitives_for_type(&get_tile_type_set(33, 131));
        let names: Vec<_> = prims.iter().map(|p| (&*p.name, p.z)).collect();
        assert_eq!(
            names,
            [
                ("BUFG0", 0),
                ("BUFG1", 1),
                ("BUFG2", 2),
                ("BUFG3", 3),
                ("PLL0", 4),
                ("PLL1", 5),
                ("PLL2", 6),
                ("PLL3", 7)
            ]
        );
    }

    #[test]
    fn cpe_and_rstn_primitives() {
        let prims = get_primitives_for_type(&get_tile_type_set(1, 66));
        let names: Vec<_> = prims.iter().map(|p| &*p.name).collect();
        assert_eq!(names, ["CPE_HALF_U", "CPE_HALF_L", "USR_RSTN"]);
        assert!(get_primitives_for_type(&get_tile_type_set(-2, -2)).is_empty());
    }

    #[test]
    fn pin_renames() {
        let bufg = &PLL_PRIMS[2];
        assert_eq!(
            get_pin_connection_name(bufg, find_pin("BUFG", "I")),
            "GLBOUT.CLK_SEL_INT_2",
        );
        assert_eq!(
            get_pin_connection_name(bufg, find_pin("BUFG", "O")),
            "GLBOUT.GLB2",
        );
        let pll = &PLL_PRIMS[5];
        assert_eq!(
            get_pin_connection_name(pll, find_pin("PLL", "CLK_REF")),
            "CLKIN.CLK_REF_1",
        );
        assert_eq!(
            get_pin_connection_name(pll, find_pin("PLL", "CLK90")),
            "GLBOUT.CLK90_1",
        );
        assert_eq!(
            get_pin_connection_name(pll, find_pin("PLL", "CLK_REF_OUT")),
            "GLBOUT.CLK_REF_OUT1",
        );
        assert_eq!(
            get_pin_connection_name(pll, find_pin("PLL", "CLK_FEEDBACK")),
            "GLBOUT.CLK_FB1",
        );
        assert_eq!(
            get_pin_connection_name(pll, find_pin("PLL", "USR_SEL_A_B")),
            "PLL1.USR_SEL_A_B",
        );
        let upper = &CPE_PRIMS[0];
        let lower = &CPE_PRIMS[1];
        assert_eq!(
            get_pin_connection_name(upper, find_pin("CPE_HALF_U", "IN3")),
            "CPE.IN3_int",
        );
        assert_eq!(
            get_pin_connection_name(lower, find_pin("CPE_HALF_L", "IN3")),
            "CPE.IN7_int",
        );
        assert_eq!(
            get_pin_connection_name(upper, find_pin("CPE_HALF_U", "OUT")),
            "CPE.OUT2",
        );
        assert_eq!(
            get_pin_connection_name(lower, find_pin("CPE_HALF_L", "RAM_I")),
            "CPE.RAM_I1",
        );
        assert_eq!(
            get_pin_connection_name(lower, find_pin("CPE_HALF_L", "COUTY1")),
            "CPE.COUTY1",
        );
        let gpio = prim("GPIO", "GPIO", 0);
        assert_eq!(
            get_pin_connection_name(&gpio, find_pin("GPIO", "DDR")),
            "GPIO.DDR",
        );
    }
}
