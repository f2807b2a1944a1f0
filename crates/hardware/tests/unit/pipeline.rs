//! Core pipeline behavior: data hazards, out-of-order completion, and
//! in-order retirement.

use crate::common::{row, run};

#[test]
fn test_raw_chain_timing_and_result() {
    // R3 depends on both earlier ADDIs; the adder latency is 2.
    let engine = run("ADDI R1, R0, 5\nADDI R2, R0, 7\nADD R3, R1, R2\n");

    assert_eq!(engine.regs.read(1), 5);
    assert_eq!(engine.regs.read(2), 7);
    assert_eq!(engine.regs.read(3), 12);
    assert_eq!(engine.stats.cycles, 9);
    assert_eq!(engine.stats.instructions_retired, 3);

    // First ADDI flows straight through.
    let r0 = row(&engine, 0);
    assert_eq!(r0.issue, Some(1));
    assert_eq!(r0.exec_start, Some(2));
    assert_eq!(r0.exec_finish, Some(3));
    assert_eq!(r0.write, Some(4));
    assert_eq!(r0.commit, Some(5));

    // Second ADDI finishes in cycle 4 but the first owns the CDB then.
    let r1 = row(&engine, 1);
    assert_eq!(r1.exec_finish, Some(4));
    assert_eq!(r1.write, Some(5));
    assert_eq!(r1.commit, Some(6));

    // The ADD captures R1 from the cycle-4 broadcast and R2 from cycle 5;
    // woken in cycle 5, it starts in cycle 6.
    let r2 = row(&engine, 2);
    assert_eq!(r2.issue, Some(3));
    assert_eq!(r2.exec_start, Some(6));
    assert_eq!(r2.exec_finish, Some(7));
    assert_eq!(r2.write, Some(8));
    assert_eq!(r2.commit, Some(9));
}

#[test]
fn test_out_of_order_completion_in_order_commit() {
    // The ADDI finishes long before the MUL but must retire after it.
    let engine = run("MUL R1, R2, R3\nADDI R4, R0, 1\n");

    let mul = row(&engine, 0);
    let addi = row(&engine, 1);

    assert_eq!(mul.exec_start, Some(2));
    assert_eq!(mul.exec_finish, Some(9));
    assert_eq!(mul.write, Some(10));
    assert_eq!(mul.commit, Some(11));

    assert_eq!(addi.exec_finish, Some(4));
    assert_eq!(addi.write, Some(5));
    assert_eq!(addi.commit, Some(12));

    assert!(addi.exec_finish < mul.exec_finish);
    assert!(addi.commit > mul.commit);
    assert_eq!(engine.stats.cycles, 12);
    assert_eq!(engine.regs.read(1), 0);
    assert_eq!(engine.regs.read(4), 1);
}

#[test]
fn test_waw_latest_producer_wins() {
    // Both writes target R1; the reader and the final state must see the
    // newer one even though the older commits later than it executes.
    let engine = run("MUL R1, R2, R3\nADDI R1, R0, 5\nADD R4, R1, R1\n");

    assert_eq!(engine.regs.read(1), 5);
    assert_eq!(engine.regs.read(4), 10);
}

#[test]
fn test_nand_and_mul_results() {
    let engine = run(
        "ADDI R1, R0, 12\n\
         ADDI R2, R0, 10\n\
         NAND R3, R1, R2\n\
         MUL R4, R1, R2\n",
    );
    assert_eq!(engine.regs.read(3), !(12u16 & 10));
    assert_eq!(engine.regs.read(4), 120);
}

#[test]
fn test_arithmetic_wraps_at_16_bits() {
    let engine = run(
        "ADDI R1, R0, 0x7FFF\n\
         ADD R2, R1, R1\n\
         ADDI R3, R1, 1\n",
    );
    assert_eq!(engine.regs.read(2), 0xFFFE);
    assert_eq!(engine.regs.read(3), 0x8000);
}

#[test]
fn test_negative_immediate() {
    let engine = run("ADDI R1, R0, 5\nADDI R1, R1, -7\n");
    assert_eq!(engine.regs.read(1), (-2i16) as u16);
}

#[test]
fn test_empty_program_terminates_immediately() {
    let engine = run("; nothing but comments\n");
    assert_eq!(engine.stats.cycles, 0);
    assert_eq!(engine.stats.instructions_retired, 0);
    assert!(engine.timeline.rows().is_empty());
}

#[test]
fn test_single_instruction_lifetime() {
    let engine = run("ADDI R1, R0, 3\n");
    let r = row(&engine, 0);
    assert_eq!(r.issue, Some(1));
    assert_eq!(r.exec_start, Some(2));
    assert_eq!(r.exec_finish, Some(3));
    assert_eq!(r.write, Some(4));
    assert_eq!(r.commit, Some(5));
    assert_eq!(engine.stats.cycles, 5);
}
