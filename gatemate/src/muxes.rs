//! Routing multiplexers of each tile type.
//!
//! Every [`Mux`] is one candidate source of one destination wire.  All
//! candidates sharing a destination and a configuration `name` form one
//! select field `bits` wide, and `value` is the field value that picks this
//! candidate.

use serde::{Deserialize, Serialize};

use crate::grid::{PLANES, TileTag, TileType};

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Mux {
    pub src: String,
    pub dst: String,
    /// Configuration field name; equals `dst` unless several fields drive
    /// the same wire.
    pub name: String,
    pub bits: u8,
    pub value: u8,
    /// The signal is inverted when this candidate is selected.
    pub invert: bool,
    /// Exposed to placement and routing.
    pub visible: bool,
    /// Static device configuration rather than a routing choice.
    pub config: bool,
}

struct MuxList(Vec<Mux>);

impl MuxList {
    fn add(
        &mut self,
        src: impl Into<String>,
        dst: impl Into<String>,
        bits: u8,
        value: u8,
        invert: bool,
    ) {
        let dst = dst.into();
        self.0.push(Mux {
            src: src.into(),
            name: dst.clone(),
            dst,
            bits,
            value,
            invert,
            visible: true,
            config: false,
        });
    }

    fn add_named(
        &mut self,
        src: impl Into<String>,
        dst: impl Into<String>,
        bits: u8,
        value: u8,
        invert: bool,
        name: impl Into<String>,
    ) {
        self.add(src, dst, bits, value, invert);
        self.last().name = name.into();
    }

    fn add_hidden(
        &mut self,
        src: impl Into<String>,
        dst: impl Into<String>,
        bits: u8,
        value: u8,
        invert: bool,
        name: impl Into<String>,
    ) {
        self.add_named(src, dst, bits, value, invert, name);
        self.last().visible = false;
    }

    fn add_config(
        &mut self,
        src: impl Into<String>,
        dst: impl Into<String>,
        bits: u8,
        value: u8,
        name: impl Into<String>,
    ) {
        self.add_named(src, dst, bits, value, false, name);
        self.last().config = true;
    }

    fn last(&mut self) -> &mut Mux {
        let idx = self.0.len() - 1;
        &mut self.0[idx]
    }
}

/// Reference clock feeding `GLBOUT.CLK_INT_{k}` for each select value.
const GLBOUT_CLK_INT_SOURCES: [[&str; 8]; 4] = [
    [
        "CLK_REF_OUT0", "CLK0_1", "CLK0_2", "CLK0_3", "CLK0_0", "CLK90_0", "CLK180_0", "CLK270_0",
    ],
    [
        "CLK_REF_OUT1", "CLK90_0", "CLK90_2", "CLK90_3", "CLK0_1", "CLK90_1", "CLK180_1",
        "CLK270_1",
    ],
    [
        "CLK_REF_OUT2", "CLK180_0", "CLK180_1", "CLK180_3", "CLK0_2", "CLK90_2", "CLK180_2",
        "CLK270_2",
    ],
    [
        "CLK_REF_OUT3", "CLK270_0", "CLK270_1", "CLK270_2", "CLK0_3", "CLK90_3", "CLK180_3",
        "CLK270_3",
    ],
];

fn add_cpe(muxes: &mut MuxList, tt: &TileType) {
    for i in 1..=8 {
        let dst = format!("CPE.IN{i}_int");
        muxes.add_hidden(format!("CPE.IN{i}"), dst.clone(), 0, 0, false, dst);
    }
    muxes.add_named("CPE.PINY1", "CPE.IN2_int", 1, 1, false, "CPE.C_I1");
    muxes.add_named("CPE.CINX", "CPE.IN4_int", 1, 1, false, "CPE.C_I2");
    muxes.add_named("CPE.PINY1", "CPE.IN6_int", 1, 1, false, "CPE.C_I3");
    muxes.add_named("CPE.PINX", "CPE.IN8_int", 1, 1, false, "CPE.C_I4");
    for p in PLANES {
        for i in 0..8 {
            muxes.add_named(
                format!("IM.P{p:02}.D{i}"),
                format!("IM.P{p:02}.Y"),
                3,
                i,
                true,
                format!("IM.P{p:02}"),
            );
        }
        if tt.contains(TileTag::Om) && p >= 9 {
            for i in 0..4 {
                muxes.add_named(
                    format!("OM.P{p:02}.D{i}"),
                    format!("OM.P{p:02}.Y"),
                    2,
                    i,
                    true,
                    format!("OM.P{p:02}"),
                );
            }
        }
    }
}

fn add_sb_big(muxes: &mut MuxList) {
    for p in PLANES {
        let sb = format!("SB_BIG.P{p:02}");
        for i in 1..=4 {
            let dst = format!("{sb}.Y{i}");
            muxes.add(format!("{sb}.D0"), &*dst, 3, 0, true);
            muxes.add(format!("{sb}.YDIAG"), &*dst, 3, 1, true);
            for d in 2..=7 {
                muxes.add(format!("{sb}.D{d}_{i}"), &*dst, 3, d, true);
            }
        }
        for (value, src) in ["Y1", "Y2", "Y3", "Y4", "X34", "X14", "X12", "X23"]
            .into_iter()
            .enumerate()
        {
            muxes.add(
                format!("{sb}.{src}"),
                format!("{sb}.YDIAG"),
                3,
                value as u8,
                true,
            );
        }
        for i in 1..=4 {
            let drv = format!("SB_DRIVE.P{p:02}.D{i}");
            muxes.add_named(format!("{drv}.IN"), format!("{drv}.OUT"), 1, 1, true, &*drv);
            muxes.add_named(
                format!("{drv}.IN"),
                format!("{drv}.OUT_NOINV"),
                1,
                1,
                false,
                &*drv,
            );
        }
    }
}

fn add_sb_sml(muxes: &mut MuxList) {
    for p in PLANES {
        let sb = format!("SB_SML.P{p:02}");
        for i in 1..=4 {
            let dst = format!("{sb}.Y{i}_int");
            let name = format!("{sb}.Y{i}");
            for (value, src) in [
                "D0".to_string(),
                "YDIAG_int".to_string(),
                format!("D2_{i}"),
                format!("D3_{i}"),
            ]
            .into_iter()
                .enumerate()
            {
                muxes.add_named(format!("{sb}.{src}"), &*dst, 2, value as u8, false, &*name);
            }
        }
        for (value, src) in ["Y1_int", "Y2_int", "Y3_int", "Y4_int", "X34", "X14", "X12", "X23"]
            .into_iter()
            .enumerate()
        {
            muxes.add_named(
                format!("{sb}.{src}"),
                format!("{sb}.YDIAG_int"),
                3,
                value as u8,
                false,
                format!("{sb}.YDIAG"),
            );
        }
        for out in ["Y1", "Y2", "Y3", "Y4", "YDIAG"] {
            muxes.add_hidden(
                format!("{sb}.{out}_int"),
                format!("{sb}.{out}"),
                1,
                1,
                true,
                format!("{sb}.{out}_INT"),
            );
        }
    }
}

fn add_ioes(muxes: &mut MuxList) {
    for p in PLANES {
        let io_in = if p % 2 == 1 { 1 } else { 2 };
        muxes.add(
            format!("IOES.IO_IN{io_in}"),
            format!("IOES.SB_IN_{p:02}"),
            1,
            0,
            false,
        );
        muxes.add(
            format!("IOES.ALTIN_{p:02}"),
            format!("IOES.SB_IN_{p:02}"),
            1,
            1,
            false,
        );
    }
}

/// The bus/MDIE/clock select stages shared by the left and bottom edge
/// selectors, followed by the per-output 2-bit select of the stage.
fn add_edge_sels(muxes: &mut MuxList, es: &str, bus: &str, mdie: &str, outs: &[(&str, &str)]) {
    let nsel = outs.len();
    for p in 1..=8u8 {
        for sel in 1..=nsel {
            muxes.add_named(
                format!("{es}.{bus}.P{p}"),
                format!("{es}.{bus}_SEL{sel}_int"),
                3,
                p - 1,
                false,
                format!("{es}.{bus}_SEL{sel}"),
            );
            muxes.add_named(
                format!("{es}.{mdie}.P{p}"),
                format!("{es}.{mdie}_SEL{sel}_int"),
                3,
                p - 1,
                false,
                format!("{es}.{mdie}_SEL{sel}"),
            );
        }
    }
    for i in 0..4u8 {
        for sel in 1..=nsel {
            muxes.add_named(
                format!("{es}.CLOCK{i}"),
                format!("{es}.CLOCK_SEL{sel}_int"),
                2,
                i,
                false,
                format!("{es}.CLOCK_SEL{sel}"),
            );
        }
    }
    for (sel, &(dst, name)) in outs.iter().enumerate() {
        let sel = sel + 1;
        for (value, stage) in [bus, mdie, "CLOCK"].into_iter().enumerate() {
            muxes.add_named(
                format!("{es}.{stage}_SEL{sel}_int"),
                format!("{es}.{dst}"),
                2,
                value as u8 + 1,
                false,
                format!("{es}.{name}"),
            );
        }
    }
}

fn add_les(muxes: &mut MuxList) {
    add_edge_sels(
        muxes,
        "LES",
        "SB_Y3",
        "MDIE1",
        &[("CPE_CINX", "CINX_SEL"), ("CPE_PINX", "PINX_SEL")],
    );
}

fn add_bes(muxes: &mut MuxList) {
    add_edge_sels(
        muxes,
        "BES",
        "SB_Y4",
        "MDIE2",
        &[
            ("CPE_CINY1_int", "CINY1_SEL"),
            ("CPE_PINY1_int", "PINY1_SEL"),
            ("CPE_CINY2_int", "CINY2_SEL"),
            ("CPE_PINY2_int", "PINY2_SEL"),
        ],
    );
    for w in ["CINY1", "PINY1", "CINY2", "PINY2"] {
        muxes.add_named(
            format!("BES.CPE_{w}_int"),
            format!("BES.CPE_{w}"),
            1,
            0,
            false,
            format!("BES.P_{w}"),
        );
        muxes.add_named(
            format!("BES.P_{w}"),
            format!("BES.CPE_{w}"),
            1,
            1,
            false,
            format!("BES.P_{w}"),
        );
    }
}

/// Right and top edge selectors: four signal selects feeding the MDIE bus.
fn add_sig_sels(
    muxes: &mut MuxList,
    es: &str,
    bus: &str,
    mdie: &str,
    cpe_srcs: &[&str],
    clocks: impl Fn(usize) -> Vec<u8>,
) {
    for sel in 0..4 {
        let dst = format!("{es}.SIG_SEL{n}_int", n = sel + 1);
        let name = format!("{es}.SIG_SEL{n}", n = sel + 1);
        let mut value = 0;
        for src in cpe_srcs {
            muxes.add_named(format!("{es}.CPE_{src}"), &*dst, 3, value, false, &*name);
            value += 1;
        }
        for clk in clocks(sel) {
            muxes.add_named(format!("{es}.CLOCK{clk}"), &*dst, 3, value, false, &*name);
            value += 1;
        }
    }
    for p in 1..=8 {
        let sel = (p - 1) / 2 + 1;
        let name = format!("{es}.SEL_MDIE{p}");
        muxes.add_named(
            format!("{es}.{bus}.P{p}"),
            format!("{es}.{mdie}.P{p}"),
            1,
            0,
            false,
            &*name,
        );
        muxes.add_named(
            format!("{es}.SIG_SEL{sel}_int"),
            format!("{es}.{mdie}.P{p}"),
            1,
            1,
            false,
            &*name,
        );
    }
}

fn add_res(muxes: &mut MuxList) {
    add_sig_sels(
        muxes,
        "RES",
        "SB_Y1",
        "MDIE1",
        &["RAM_O1", "RAM_O2", "COUTX", "POUTX"],
        |_| vec![0, 1, 2, 3],
    );
}

fn add_tes(muxes: &mut MuxList) {
    add_sig_sels(
        muxes,
        "TES",
        "SB_Y2",
        "MDIE2",
        &["RAM_O1", "RAM_O2", "COUTY1", "POUTY1", "COUTY2", "POUTY2"],
        |sel| {
            let clk = if sel < 2 { 0 } else { 2 };
            vec![clk, clk + 1]
        },
    );
}

fn add_pll(muxes: &mut MuxList) {
    for k in 0..4 {
        for (value, src) in ["CLK0", "CLK1", "CLK2", "CLK3", "SER_CLK"].into_iter().enumerate() {
            muxes.add_config(
                format!("CLKIN.{src}"),
                format!("CLKIN.CLK_REF_INT{k}"),
                3,
                value as u8,
                format!("CLKIN.REF{k}"),
            );
        }
        muxes.add_config(
            format!("CLKIN.CLK_REF_INT{k}"),
            format!("CLKIN.CLK_REF_{k}"),
            1,
            0,
            format!("CLKIN.REF{k}_INV"),
        );
    }
    for (k, srcs) in GLBOUT_CLK_INT_SOURCES.iter().enumerate() {
        for (value, src) in srcs.iter().enumerate() {
            muxes.add_config(
                format!("GLBOUT.{src}"),
                format!("GLBOUT.CLK_INT_{k}"),
                3,
                value as u8,
                format!("GLBOUT.GLB{k}"),
            );
        }
        muxes.add_config(
            format!("GLBOUT.CLK_INT_{k}"),
            format!("GLBOUT.CLK_SEL_INT_{k}"),
            1,
            0,
            format!("GLBOUT.USR_GLB{k}"),
        );
        muxes.add_config(
            format!("GLBOUT.USR_GLB{k}"),
            format!("GLBOUT.CLK_SEL_INT_{k}"),
            1,
            1,
            format!("GLBOUT.USR_GLB{k}"),
        );
        muxes.add_config(
            format!("GLBOUT.CLK_SEL_INT_{k}"),
            format!("GLBOUT.GLB{k}"),
            1,
            1,
            format!("GLBOUT.GLB{k}_EN"),
        );
        for glb in 0..4 {
            muxes.add_config(
                format!("GLBOUT.GLB{glb}"),
                format!("GLBOUT.FB_INT_{k}"),
                2,
                glb,
                format!("GLBOUT.FB{k}"),
            );
        }
        muxes.add_config(
            format!("GLBOUT.FB_INT_{k}"),
            format!("GLBOUT.CLK_FB{k}"),
            1,
            0,
            format!("GLBOUT.USR_FB{k}"),
        );
        muxes.add_config(
            format!("GLBOUT.USR_FB{k}"),
            format!("GLBOUT.CLK_FB{k}"),
            1,
            1,
            format!("GLBOUT.USR_FB{k}"),
        );
    }
    for k in 0..4 {
        muxes.add_config(
            format!("CLKIN.CLK_REF_{k}"),
            format!("GLBOUT.CLK_REF_OUT{k}"),
            1,
            0,
            format!("PLL{k}.USR_CLK_OUT"),
        );
    }
    for k in 0..4 {
        muxes.add_config(
            format!("PLL{k}.USR_CLK_REF"),
            format!("GLBOUT.CLK_REF_OUT{k}"),
            1,
            1,
            format!("PLL{k}.USR_CLK_OUT"),
        );
    }
}

pub fn get_mux_connections_for_type(tt: &TileType) -> Vec<Mux> {
    let mut muxes = MuxList(vec![]);
    if tt.contains(TileTag::Cpe) {
        add_cpe(&mut muxes, tt);
    }
    if tt.contains(TileTag::SbBig) {
        add_sb_big(&mut muxes);
    }
    if tt.contains(TileTag::SbSml) {
        add_sb_sml(&mut muxes);
    }
    if tt.contains(TileTag::Ioes) {
        add_ioes(&mut muxes);
    }
    if tt.contains(TileTag::Les) {
        add_les(&mut muxes);
    }
    if tt.contains(TileTag::Bes) {
        add_bes(&mut muxes);
    }
    if tt.contains(TileTag::Res) {
        add_res(&mut muxes);
    }
    if tt.contains(TileTag::Tes) {
        add_tes(&mut muxes);
    }
    if tt.contains(TileTag::Pll) {
        add_pll(&mut muxes);
    }
    muxes.0
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use super::*;
    use crate::grid::{get_tile_type_list, get_tile_type_set};
    use crate::wires::get_endpoints_for_type;

    fn find<'a>(muxes: &'a [Mux], src: &str, dst: &str) -> &'a Mux {
        muxes
            .iter()
            .find(|m| m.src == src && m.dst == dst)
            .unwrap_or_else(|| panic!("no mux {src} -> {dst}"))
    }

    #[test]
    fn im_mux() {
        let tt: TileType = [TileTag::Cpe, TileTag::Im].into_iter().collect();
        let muxes = get_mux_connections_for_type(&tt);
        let m = find(&muxes, "IM.P01.D0", "IM.P01.Y");
        assert_eq!((m.bits, m.value, m.invert), (3, 0, true));
        assert_eq!(m.name, "IM.P01");
        assert!(m.visible);
        assert!(!m.config);
        assert!(!muxes.iter().any(|m| m.dst.starts_with("OM.")));
    }

    #[test]
    fn cpe_fixed_links_hidden() {
        let muxes = get_mux_connections_for_type(&get_tile_type_set(2, 1));
        let m = find(&muxes, "CPE.IN3", "CPE.IN3_int");
        assert_eq!((m.bits, m.value, m.visible), (0, 0, false));
        let m = find(&muxes, "CPE.CINX", "CPE.IN4_int");
        assert_eq!((m.bits, m.value, m.name.as_str()), (1, 1, "CPE.C_I2"));
    }

    #[test]
    fn sb_sml_inverters() {
        let tt: TileType = [TileTag::SbSml].into_iter().collect();
        let muxes = get_mux_connections_for_type(&tt);
        let m = find(&muxes, "SB_SML.P03.YDIAG_int", "SB_SML.P03.YDIAG");
        assert_eq!(m.name, "SB_SML.P03.YDIAG_INT");
        assert!(m.invert);
        assert!(!m.visible);
        let m = find(&muxes, "SB_SML.P03.D3_2", "SB_SML.P03.Y2_int");
        assert_eq!((m.bits, m.value, m.invert), (2, 3, false));
        assert_eq!(m.name, "SB_SML.P03.Y2");
    }

    #[test]
    fn sb_drive_pair() {
        let tt: TileType = [TileTag::SbBig].into_iter().collect();
        let muxes = get_mux_connections_for_type(&tt);
        assert!(find(&muxes, "SB_DRIVE.P05.D2.IN", "SB_DRIVE.P05.D2.OUT").invert);
        assert!(!find(&muxes, "SB_DRIVE.P05.D2.IN", "SB_DRIVE.P05.D2.OUT_NOINV").invert);
        assert_eq!(find(&muxes, "SB_BIG.P05.X23", "SB_BIG.P05.YDIAG").value, 7);
    }

    #[test]
    fn edge_selectors() {
        let tt: TileType = [TileTag::Bes, TileTag::Tes, TileTag::Les, TileTag::Res]
            .into_iter()
            .collect();
        let muxes = get_mux_connections_for_type(&tt);
        let m = find(&muxes, "BES.MDIE2_SEL3_int", "BES.CPE_CINY2_int");
        assert_eq!((m.bits, m.value, m.name.as_str()), (2, 2, "BES.CINY2_SEL"));
        let m = find(&muxes, "LES.CLOCK_SEL2_int", "LES.CPE_PINX");
        assert_eq!((m.value, m.name.as_str()), (3, "LES.PINX_SEL"));
        let m = find(&muxes, "TES.CLOCK3", "TES.SIG_SEL4_int");
        assert_eq!(m.value, 7);
        assert!(!muxes.iter().any(|m| m.src == "TES.CLOCK2" && m.dst == "TES.SIG_SEL1_int"));
        let m = find(&muxes, "RES.CLOCK2", "RES.SIG_SEL1_int");
        assert_eq!(m.value, 6);
        let m = find(&muxes, "RES.SIG_SEL3_int", "RES.MDIE1.P6");
        assert_eq!((m.value, m.name.as_str()), (1, "RES.SEL_MDIE6"));
    }

    #[test]
    fn pll_muxes_are_config() {
        let muxes = get_mux_connections_for_type(&get_tile_type_set(33, 131));
        let pll: Vec<_> = muxes
            .iter()
            .filter(|m| m.dst.starts_with("GLBOUT.") || m.dst.starts_with("CLKIN."))
            .collect();
        assert!(pll.iter().all(|m| m.config));
        let m = find(&muxes, "GLBOUT.CLK90_2", "GLBOUT.CLK_INT_1");
        assert_eq!(m.value, 2);
        let m = find(&muxes, "PLL2.USR_CLK_REF", "GLBOUT.CLK_REF_OUT2");
        assert_eq!((m.value, m.name.as_str()), (1, "PLL2.USR_CLK_OUT"));
    }

    #[test]
    fn select_values_unique_and_fit() {
        for tt in get_tile_type_list() {
            let mut seen = HashSet::new();
            for m in get_mux_connections_for_type(&tt) {
                assert!(
                    seen.insert((m.dst.clone(), m.name.clone(), m.value)),
                    "{tt}: duplicate select {} {} {}",
                    m.dst,
                    m.name,
                    m.value
                );
                if m.bits < 8 {
                    assert!(
                        u32::from(m.value) < (1 << m.bits) || m.bits == 0,
                        "{tt}: {m:?}",
                    );
                }
            }
        }
    }

    #[test]
    fn select_width_consistent() {
        for tt in get_tile_type_list() {
            let mut widths = HashMap::new();
            for m in get_mux_connections_for_type(&tt) {
                let w = *widths.entry((m.dst.clone(), m.name.clone())).or_insert(m.bits);
                assert_eq!(w, m.bits, "{tt}: {m:?}");
            }
        }
    }

    #[test]
    fn mux_wires_are_endpoints() {
        for tt in get_tile_type_list() {
            let wires: HashSet<_> = get_endpoints_for_type(&tt)
                .into_iter()
                .map(|w| w.name)
                .collect();
            for m in get_mux_connections_for_type(&tt) {
                assert!(wires.contains(&m.src), "{tt}: {}", m.src);
                assert!(wires.contains(&m.dst), "{tt}: {}", m.dst);
            }
        }
    }
}
