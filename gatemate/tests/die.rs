use std::sync::LazyLock;

use prjcombine_gatemate::die::{Connection, Die, Location};
use prjcombine_gatemate::grid::{IoBank, IoPort, max_col, max_row};

static DIE: LazyLock<Die> = LazyLock::new(|| {
    let mut die = Die::new("1A", 0, 0);
    die.create_in_die_connections();
    die
});

fn conn(x: i32, y: i32, wire: &str) -> Connection {
    Connection {
        x,
        y,
        wire: DIE.wire_id(wire).unwrap(),
    }
}

fn drives(sx: i32, sy: i32, src: &str, dx: i32, dy: i32, dst: &str) -> bool {
    let conns = DIE.get_connections_for(sx, sy, src);
    !conns.is_empty() && conns[1..].contains(&conn(dx, dy, dst))
}

#[test]
fn driver_comes_first() {
    for (key, _) in DIE.connections().take(100000) {
        let all = DIE.get_connections_for(key.x, key.y, DIE.wire_name(key.wire));
        assert_eq!(&all[0], key);
        assert!(all.len() > 1);
    }
}

#[test]
fn connections_stay_on_die() {
    for (src, dsts) in DIE.connections() {
        for c in std::iter::once(src).chain(dsts) {
            assert!((-2..=max_col()).contains(&c.x), "{}", DIE.display_conn(c));
            assert!((-2..=max_row()).contains(&c.y), "{}", DIE.display_conn(c));
        }
    }
}

#[test]
fn cpe_inputs() {
    assert!(drives(1, 1, "IM.P01.Y", 1, 1, "CPE.IN1"));
    assert!(drives(1, 1, "IM.P09.Y", 1, 1, "CPE.CLK"));
    assert!(drives(1, 1, "IM.P11.Y", 1, 1, "CPE.SR"));
    assert!(drives(1, 1, "IM.P01.Y", 2, 2, "IM.P01.D4"));
    assert!(drives(-1, 1, "SB_SML.P01.Y1", 1, 1, "IM.P01.D0"));
}

#[test]
fn carry_chain() {
    assert!(drives(5, 7, "CPE.COUTY1", 5, 8, "CPE.CINY1"));
    assert!(drives(5, 7, "CPE.POUTX", 6, 7, "CPE.PINX"));
    // The bottom row gets its vertical carry from the bottom edge select.
    assert!(DIE.get_connections_for(5, 0, "CPE.COUTY1").is_empty());
    assert!(drives(5, -2, "BES.CPE_CINY1", 5, 1, "CPE.CINY1"));
    assert!(drives(4, -2, "BES.CPE_CINY1", 5, -2, "BES.P_CINY1"));
    assert!(drives(-2, 5, "LES.CPE_CINX", 1, 5, "CPE.CINX"));
    assert!(drives(160, 5, "CPE.COUTX", 163, 5, "RES.CPE_COUTX"));
    assert!(!drives(160, 5, "CPE.COUTX", 161, 5, "CPE.CINX"));
}

#[test]
fn switchbox_taps() {
    assert!(drives(3, 3, "SB_BIG.P01.Y1", 5, 3, "SB_SML.P01.D2_1"));
    assert!(drives(3, 3, "SB_BIG.P01.Y1", 3, 3, "SB_DRIVE.P01.D1.IN"));
    // Long taps are fed from the remote drive stage.
    assert!(drives(3, 3, "SB_DRIVE.P01.D1.OUT", 11, 3, "SB_BIG.P01.D4_1"));
    assert!(!drives(3, 3, "SB_BIG.P01.Y1", 11, 3, "SB_BIG.P01.D4_1"));
    // An even super-tile distance skips the inversion.
    assert!(drives(3, 3, "SB_DRIVE.P01.D1.OUT_NOINV", 19, 3, "SB_BIG.P01.D6_1"));
    assert!(!drives(3, 3, "SB_DRIVE.P01.D1.OUT", 19, 3, "SB_BIG.P01.D6_1"));
    assert!(drives(3, 3, "SB_BIG.P01.YDIAG", 4, 4, "SB_SML.P01.X12"));
    assert!(drives(3, 3, "SB_BIG.P12.YDIAG", 3, 3, "SB_BIG.P01.X14"));
    assert!(drives(3, 3, "SB_BIG.P02.YDIAG", 3, 3, "SB_BIG.P01.X23"));
}

#[test]
fn global_mesh() {
    assert!(drives(33, 131, "GLBOUT.GLB0", -2, 1, "LES.CLOCK0"));
    assert!(drives(33, 131, "GLBOUT.GLB3", 7, -2, "BES.CLOCK3"));
    assert!(drives(33, 131, "GLBOUT.GLB1", 163, 9, "RES.CLOCK1"));
    assert!(drives(33, 131, "GLBOUT.GLB2", 40, 131, "TES.CLOCK2"));
    let sb_big = DIE
        .get_connections_for(33, 131, "GLBOUT.GLB0")
        .iter()
        .filter(|c| DIE.wire_name(c.wire).starts_with("SB_BIG."))
        .count();
    assert!(sb_big > 0);
    assert!(drives(33, 131, "GLBOUT.GLB0", -1, -1, "SB_BIG.P01.D7_1"));
    assert!(drives(33, 131, "GLBOUT.GLB0", -1, -1, "SB_BIG.P01.D7_2"));
    assert!(drives(33, 131, "GLBOUT.GLB1", 159, -1, "SB_BIG.P02.D7_3"));
    assert!(drives(33, 131, "GLBOUT.GLB0", -1, 127, "SB_BIG.P01.D7_4"));
}

#[test]
fn pll() {
    let rev = DIE.get_connections_to(1, 128, "CPE.RAM_I2");
    assert_eq!(rev.len(), 2);
    assert_eq!(rev[0], conn(1, 128, "CPE.RAM_I2"));
    assert_eq!(rev[1], conn(33, 131, "PLL0.USR_PLL_LOCKED"));
    assert!(drives(1, 128, "CPE.RAM_O1", 33, 131, "GLBOUT.USR_GLB0"));
    assert!(drives(1, 125, "CPE.RAM_O2", 33, 131, "GLBOUT.USR_FB3"));
    assert!(drives(33, 131, "GLBOUT.CLK90_0", 40, 128, "CPE.RAM_I1"));
    let pad = DIE.gpio_loc("GPIO_W2_A[8]").unwrap();
    assert!(drives(pad.x, pad.y, "GPIO.IN1", 33, 131, "CLKIN.CLK0"));
}

#[test]
fn user_reset() {
    let rev = DIE.get_connections_to(1, 66, "CPE.RAM_I2");
    assert!(rev[1..].contains(&conn(1, 66, "USR_RSTN.USR_RSTN")));
    assert!(DIE.get_connections_to(1, 66, "CPE.IN1").is_empty());
}

#[test]
fn io_north() {
    let pad = DIE.io_pad(IoBank::N1, IoPort::A, 0).unwrap();
    assert_eq!(pad, Location { x: 57, y: 131 });
    assert!(drives(57, 131, "GPIO.IN1", 57, 131, "IOES.IO_IN1"));
    assert!(drives(57, 131, "GPIO.IN1", 58, 131, "IOES.IO_IN1"));
    assert!(drives(57, 128, "CPE.RAM_O1", 57, 131, "GPIO.OUT1"));
    assert!(drives(58, 128, "CPE.RAM_O1", 57, 131, "GPIO.OUT3"));
    assert!(drives(57, 131, "IOES.SB_IN_01", 57, 129, "SB_BIG.P01.D0"));
}

#[test]
fn ddr() {
    let conns = DIE.get_connections_for(97, 128, "CPE.RAM_O1");
    let ddr = conns[1..]
        .iter()
        .filter(|c| DIE.wire_name(c.wire) == "GPIO.DDR")
        .count();
    assert_eq!(ddr, 18);
    let pad = DIE.gpio_loc("GPIO_N1_B[8]").unwrap();
    assert!(drives(97, 128, "CPE.RAM_O1", pad.x, pad.y, "GPIO.DDR"));
    let pad = DIE.gpio_loc("GPIO_S3_A[0]").unwrap();
    assert!(drives(48, 1, "CPE.RAM_O1", pad.x, pad.y, "GPIO.DDR"));
}

#[test]
fn io_west() {
    let pad = DIE.io_pad(IoBank::W1, IoPort::A, 0).unwrap();
    assert_eq!(pad, Location { x: -2, y: 25 });
    assert!(drives(-2, 25, "GPIO.IN1", -2, 25, "IOES.IO_IN1"));
    assert!(drives(1, 25, "CPE.RAM_O1", -2, 25, "GPIO.OUT1"));
    assert!(drives(-2, 25, "IOES.SB_IN_01", -1, 25, "SB_SML.P01.D0"));
    // (-1, 26) has no switchbox, so the next row shares the pad below it.
    assert!(drives(-2, 25, "GPIO.IN1", -2, 26, "IOES.IO_IN1"));
    assert!(drives(1, 26, "CPE.RAM_O1", -2, 25, "GPIO.OUT3"));
    assert!(drives(1, 26, "CPE.RAM_O2", -2, 25, "GPIO.OUT4"));
    assert!(drives(-2, 26, "IOES.SB_IN_01", 0, 26, "SB_BIG.P01.D0"));
    assert!(drives(0, 26, "SB_BIG.P01.Y3", -2, 26, "IOES.ALTIN_01"));
    assert!(drives(0, 26, "SB_BIG.P01.Y3", -2, 26, "LES.SB_Y3.P1"));
    assert!(drives(-2, 26, "LES.CPE_CINX", 1, 26, "CPE.CINX"));
}

#[test]
fn io_east() {
    let pad = DIE.io_pad(IoBank::E1, IoPort::A, 0).unwrap();
    assert_eq!(pad, Location { x: 163, y: 25 });
    assert!(drives(163, 25, "GPIO.IN1", 163, 25, "IOES.IO_IN1"));
    assert!(drives(160, 25, "CPE.RAM_O1", 163, 25, "GPIO.OUT1"));
    assert!(drives(163, 25, "GPIO.IN1", 163, 26, "IOES.IO_IN1"));
    assert!(drives(160, 26, "CPE.RAM_O1", 163, 25, "GPIO.OUT3"));
    assert!(drives(163, 26, "IOES.SB_IN_01", 162, 26, "SB_SML.P01.D0"));
    assert!(drives(162, 26, "SB_SML.P01.Y1", 163, 26, "IOES.ALTIN_01"));
    assert!(drives(162, 26, "SB_SML.P01.Y1", 163, 26, "RES.SB_Y1.P1"));
    assert!(drives(160, 26, "CPE.RAM_O1", 163, 26, "RES.CPE_RAM_O1"));
}

#[test]
fn io_south() {
    let pad = DIE.io_pad(IoBank::S3, IoPort::A, 0).unwrap();
    assert_eq!(pad, Location { x: 5, y: -2 });
    assert!(drives(5, -2, "GPIO.IN1", 5, -2, "IOES.IO_IN1"));
    assert!(drives(5, 1, "CPE.RAM_O1", 5, -2, "GPIO.OUT1"));
    assert!(drives(5, -2, "GPIO.IN1", 6, -2, "IOES.IO_IN1"));
    assert!(drives(6, 1, "CPE.RAM_O1", 5, -2, "GPIO.OUT3"));
    assert!(drives(6, 1, "CPE.RAM_O2", 5, -2, "GPIO.OUT4"));
    assert!(drives(6, -2, "IOES.SB_IN_01", 6, 0, "SB_BIG.P01.D0"));
    assert!(drives(6, 0, "SB_BIG.P01.Y4", 6, -2, "IOES.ALTIN_01"));
    assert!(drives(6, 0, "SB_BIG.P01.Y4", 6, -2, "BES.SB_Y4.P1"));
    assert!(drives(6, -2, "BES.CPE_CINY1", 6, 1, "CPE.CINY1"));
}
