use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::config::AdderMode;
use crate::hdl::tests::fixed_time;
use crate::hdl::{render, EmitContext, HdlUnit, ModuleNames};

fn text(unit: &dyn HdlUnit) -> String {
    render(unit, &EmitContext::new(ModuleNames::default(), fixed_time()))
}

fn assert_common_shape(v: &str) {
    assert!(v.contains("`timescale 1ns / 10ps"));
    assert!(v.contains("parameter CLOCK_PERIOD=10;"));
    assert!(v.contains("$display(\"Validation successful.\");"));
    assert!(v.contains("$display(\"Validation failure: %d error(s).\", errors);"));
    assert!(v.contains("$stop;"));
}

#[test]
fn test_nadder_tb_exhaustive() {
    let tb = NadderTb::new(4);
    assert!(tb.is_exhaustive());
    let v = text(&tb);
    assert!(v.contains("module sc_nadder_tb();"));
    assert!(v.contains("sc_nadder dut(.x(x), .sel(sel), .out(out));"));
    assert!(v.contains("for(i = 0; i < 16; i = i + 1) begin"));
    assert!(v.contains("for(s = 0; s < INPUT_STREAMS; s = s + 1) begin"));
    assert!(v.contains("if( x[s] != out ) begin"));
    assert!(v.contains("Validation successful."));
    assert!(v.contains("endmodule // sc_nadder_tb"));
}

#[test]
fn test_nadder_tb_random_for_wide_adders() {
    let tb = NadderTb::new(40);
    assert!(!tb.is_exhaustive());
    let v = text(&tb);
    assert!(v.contains("for(i = 0; i < 4096; i = i + 1) begin"));
    assert!(v.contains("x = {$random, $random};"));
    assert!(v.contains("parameter SELECT_WIDTH = 6;"));
}

#[test]
fn test_alaghi_tree_tb() {
    let v = text(&AlaghiTreeTb::new(5, 64));
    assert_common_shape(&v);
    assert!(v.contains("module alaghi_nadder_tb();"));
    assert!(v.contains("parameter DELAY =         3;"));
    assert!(v.contains("parameter INPUTS =        \"data/adder_inputs.mif\";"));
    assert!(v.contains("parameter ADDER_RESULT =  \"data/adder_results.mif\";"));
    assert!(v.contains("parameter LENGTH =        64;"));
    assert!(v.contains("reg [5:0] test_index;"));
    assert!(v.contains("assign valid = (valid_delay == DELAY);"));
    assert!(v.contains("alaghi_nadder dut(.clk(clk), .rst(rst), .inpts(inpts), .out(out));"));
    assert!(v.contains("#(8*CLOCK_PERIOD + 1);"));
    assert!(v.contains("#((LENGTH+DELAY+2)*CLOCK_PERIOD);"));
}

#[test]
fn test_dot_product_tb_selector() {
    let v = text(&DotProductTb::new(4, AdderMode::Selector, 100));
    assert_common_shape(&v);
    assert!(v.contains("module sc_dot_product_tb();"));
    assert!(v.contains("parameter SELECT_WIDTH =  2;"));
    assert!(v.contains("parameter DELAY =         2;"));
    assert!(v.contains("parameter SELECT_STREAM = \"data/select_streams.mif\";"));
    assert!(v.contains("$readmemb(SELECT_STREAM, test_sel, 0, LENGTH-1);"));
    assert!(v.contains("assign sel = test_sel[test_index];"));
    assert!(v.contains("end else if( valid == 1'b1 && result_index < LENGTH ) begin"));
    assert!(v.contains("result_index <= result_index + 1;"));
    assert!(v.contains(".sel(sel),"));
    assert!(v.contains("reg [6:0] test_index;"));
}

#[test]
fn test_dot_product_tb_alaghi_drops_select() {
    let v = text(&DotProductTb::new(4, AdderMode::Alaghi, 100));
    assert!(!v.contains("sel"));
    assert!(!v.contains("select_streams.mif"));
    assert!(v.contains("parameter DELAY =         4;"));
}

#[test]
fn test_matrix_mult_tb() {
    let v = text(&MatrixMultTb::new(2, 3, 4, AdderMode::Selector, 100));
    assert_common_shape(&v);
    assert!(v.contains("module sc_matrix_mult_tb();"));
    assert!(v.contains("parameter INPUT_MATRICES =  \"data/input_matrices.mif\";"));
    assert!(v.contains("parameter SELECT_STREAM =   \"data/mm_select_streams.mif\";"));
    assert!(v.contains("parameter MM_RESULT =       \"data/mm_result.mif\";"));
    assert!(v.contains("end else if( outputWriteEn == 1'b1 && result_index < LENGTH ) begin"));
    assert!(v.contains("if( outputStreams != expected_results[result_index] ) begin"));
    assert!(v.contains(".outputWriteEn(outputWriteEn)"));
}

#[test]
fn test_testbench_names_carry_suffix() {
    let ctx = EmitContext::new(ModuleNames::new(Some("x")), fixed_time());
    let v = render(&MatrixMultTb::new(1, 1, 1, AdderMode::Alaghi, 8), &ctx);
    assert!(v.contains("module sc_matrix_mult_x_tb();"));
    assert!(v.contains("sc_matrix_mult_x dut("));
    assert!(v.contains("endmodule // sc_matrix_mult_x_tb"));
}

#[test]
fn test_simulation_operands() {
    let mut rng = StdRng::seed_from_u64(7);
    let sim = DotProductSim::random(4, 8, AdderMode::Selector, &mut rng);
    assert_eq!(sim.data().len(), 4);
    assert!(sim.data().iter().chain(sim.weights()).all(|&v| v < 256));
    let [a, b] = sim.seeds();
    assert_ne!(a, b);
    assert!(a < 256 && b < 256);

    let expected: u128 = sim
        .data()
        .iter()
        .zip(sim.weights())
        .map(|(&x, &y)| (x * y) as u128)
        .sum();
    assert_eq!(sim.expected(), expected);
    assert_eq!(sim.scale(), 4);
    assert_eq!(sim.result_width(), 19);
}

#[test]
fn test_simulation_top_selector() {
    let mut rng = StdRng::seed_from_u64(1);
    let sim = DotProductSim::random(3, 4, AdderMode::Selector, &mut rng);
    let v = text(&sim);
    assert!(v.contains("module sc_dot_product_sim();"));
    assert!(v.contains("parameter SCALE     = 3;"));
    assert!(v.contains("initial datas = 12'b"));
    assert!(v.contains(&format!("initial seed0 = {};", sim.seeds()[0])));
    assert!(v.contains("lfsr LFSR0("));
    assert!(v.contains("counter COUNTER("));
    assert!(v.contains(".sel(sel),"));
    assert!(v.contains("if( last_counter == 4'd15 ) begin"));
    assert!(v.contains("assign dot_product = (count * SCALE) << PRECISION;"));
    assert!(v.contains(&format!(
        "initial expected_result = {}'d{};",
        sim.result_width(),
        sim.expected()
    )));
}

#[test]
fn test_simulation_window_skips_sng_reset_sample() {
    let mut rng = StdRng::seed_from_u64(4);
    let v = text(&DotProductSim::random(4, 8, AdderMode::Alaghi, &mut rng));
    assert!(v.contains("stream_valid <= valid;"));
    assert!(v.contains("assign sample = result & stream_valid;"));
    assert!(v.contains("end else if( stream_valid == 1'b1 ) begin"));
    assert!(v.contains(".in(sample), .last(last), .out(count));"));
    assert!(!v.contains("in_stream"));
    // counting starts after the register that delays valid
    assert!(v.find("reg stream_valid;").unwrap() < v.find("reg last;").unwrap());
}

#[test]
fn test_simulation_top_alaghi_scale() {
    let mut rng = StdRng::seed_from_u64(2);
    let sim = DotProductSim::random(5, 8, AdderMode::Alaghi, &mut rng);
    assert_eq!(sim.scale(), 8);
    let v = text(&sim);
    assert!(!v.contains("COUNTER"));
    assert!(!v.contains(".sel("));
}

#[test]
fn test_simulation_vector_literal_order() {
    let mut rng = StdRng::seed_from_u64(3);
    let sim = DotProductSim::random(2, 4, AdderMode::Selector, &mut rng);
    let v = text(&sim);
    let d = sim.data();
    let literal = format!(
        "initial datas = 8'b{}{};",
        crate::bits::to_binary(d[1], 4),
        crate::bits::to_binary(d[0], 4)
    );
    assert!(v.contains(&literal));
}
