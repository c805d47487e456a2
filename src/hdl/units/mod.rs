//! Synthesizable modules.

mod alaghi;
mod arith;
mod datapath;
mod noise;

pub use alaghi::{AlaghiAdder, AlaghiTree};
pub use arith::{Multiplier, SelectAdder};
pub use datapath::{DotProduct, MatrixMult, ShiftRegister};
pub use noise::{Counter, DsConverter, LfsrModule, SdConverter, Sng};

pub const MULTIPLIER: &str = "sc_multiplier";
pub const MULTIPLIER_BI: &str = "sc_multiplier_bi";
pub const SELECT_ADDER: &str = "sc_nadder";
pub const ALAGHI_ADDER: &str = "alaghi_adder";
pub const ALAGHI_TREE: &str = "alaghi_nadder";
pub const DOT_PRODUCT: &str = "sc_dot_product";
pub const MATRIX_MULT: &str = "sc_matrix_mult";
pub const COUNTER: &str = "counter";
pub const LFSR: &str = "lfsr";
pub const DS_CONVERTER: &str = "ds_converter";
pub const SD_CONVERTER: &str = "sd_converter";
pub const SNG: &str = "sng";

/// `shift_<depth>_register`
pub fn shift_register_name(depth: usize) -> String {
    format!("shift_{}_register", depth)
}
