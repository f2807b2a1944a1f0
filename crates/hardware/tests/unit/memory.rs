//! Memory ordering and faults: STOREs write at commit, LOADs read committed
//! memory at execute, out-of-range addresses are fatal.

use tomasim_core::{Config, Engine, SimError};
use tomasim_core::isa::assemble;

use crate::common::{row, run, run_with};

#[test]
fn test_store_then_load_reads_pre_image() {
    // The LOAD's execute finishes before the STORE commits, and loads see
    // committed memory only: R2 observes the pre-image (zero), while the
    // store still lands in memory by the end of the run.
    let engine = run(
        "ADDI R1, R0, 42\n\
         STORE R1, 0(R0)\n\
         LOAD R2, 0(R0)\n",
    );

    assert_eq!(engine.regs.read(2), 0);
    assert_eq!(engine.mem.read(0), Some(42));

    let store = row(&engine, 1);
    let load = row(&engine, 2);
    assert!(load.exec_finish.unwrap() < store.commit.unwrap());
    // STOREs skip the CDB entirely.
    assert_eq!(store.write, None);
    assert!(store.commit.is_some());
}

#[test]
fn test_load_after_store_commit_sees_new_value() {
    // The MUL delays the LOAD's address operand past the STORE's commit,
    // so the load reads the stored value.
    let engine = run(
        "ADDI R1, R0, 42\n\
         STORE R1, 5(R0)\n\
         MUL R3, R0, R0\n\
         LOAD R2, 5(R3)\n",
    );

    let store = row(&engine, 1);
    let load = row(&engine, 3);
    assert!(load.exec_start.unwrap() > store.commit.unwrap());
    assert_eq!(engine.regs.read(2), 42);
}

#[test]
fn test_load_from_preloaded_memory() {
    let engine = run_with(
        "LOAD R1, 0(R0)\nLOAD R2, 5(R0)\n",
        &Config::default(),
        &[(0, 42), (5, 255)],
    );
    assert_eq!(engine.regs.read(1), 42);
    assert_eq!(engine.regs.read(2), 255);
}

#[test]
fn test_store_uses_register_base_and_offset() {
    let engine = run(
        "ADDI R1, R0, 10\n\
         ADDI R2, R0, 77\n\
         STORE R2, 3(R1)\n",
    );
    assert_eq!(engine.mem.read(13), Some(77));
}

#[test]
fn test_load_out_of_range_is_fatal_at_execute() {
    let mut config = Config::default();
    config.memory.size_words = 16;
    let program = assemble("LOAD R1, 20(R0)\n", 0).unwrap();
    let mut engine = Engine::new(&config, program);

    match engine.run() {
        Err(SimError::LoadOutOfRange { pc, addr, .. }) => {
            assert_eq!(pc, 0);
            assert_eq!(addr, 20);
        }
        other => panic!("expected load fault, got {other:?}"),
    }
}

#[test]
fn test_negative_effective_address_is_fatal() {
    let program = assemble("LOAD R1, -1(R0)\n", 0).unwrap();
    let mut engine = Engine::new(&Config::default(), program);
    assert!(matches!(
        engine.run(),
        Err(SimError::LoadOutOfRange { addr: -1, .. })
    ));
}

#[test]
fn test_store_out_of_range_is_fatal_at_commit() {
    let mut config = Config::default();
    config.memory.size_words = 8;
    let program = assemble("ADDI R1, R0, 1\nSTORE R1, 9(R0)\n", 0).unwrap();
    let mut engine = Engine::new(&config, program);

    match engine.run() {
        Err(SimError::StoreOutOfRange { pc, addr, .. }) => {
            assert_eq!(pc, 1);
            assert_eq!(addr, 9);
        }
        other => panic!("expected store fault, got {other:?}"),
    }
}

#[test]
fn test_memory_only_changes_at_commit() {
    // A wrong-path STORE must never reach memory: the branch squashes it.
    let engine = run(
        "ADDI R1, R0, 7\n\
         BEQ R1, R1, 1\n\
         STORE R1, 0(R0)\n\
         ADDI R2, R0, 1\n",
    );
    assert_eq!(engine.mem.read(0), Some(0));
    assert_eq!(engine.regs.read(2), 1);
}
