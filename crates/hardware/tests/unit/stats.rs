//! Whole-run metrics and stage-ordering laws.

use crate::common::run;

#[test]
fn test_ipc_never_exceeds_one() {
    let engine = run(
        "ADDI R1, R0, 1\n\
         ADD R2, R1, R1\n\
         NAND R3, R2, R1\n\
         MUL R4, R2, R2\n",
    );
    assert!(engine.stats.instructions_retired <= engine.stats.cycles);
    assert!(engine.stats.ipc() <= 1.0);
}

#[test]
fn test_stage_ordering_laws_hold() {
    // issue <= exec_start <= exec_finish <= write <= commit for every row
    // that reached each stage; squashed rows may stop anywhere.
    let src = "\
       ADDI R1, R0, 2
loop:  ADDI R1, R1, -1
       BEQ R1, R0, done
       BEQ R0, R0, loop
done:  STORE R1, 0(R0)
       LOAD R2, 0(R0)
";
    let engine = run(src);

    for row in engine.timeline.rows() {
        let issue = row.issue.expect("every row has an issue stamp");
        if let Some(start) = row.exec_start {
            assert!(issue < start);
            let finish = row.exec_finish.unwrap_or(start);
            assert!(start <= finish);
            if let Some(write) = row.write {
                assert!(finish < write);
                if let Some(commit) = row.commit {
                    assert!(write < commit);
                }
            }
        }
        if row.squashed {
            assert_eq!(row.commit, None);
        }
    }
}

#[test]
fn test_commit_cycles_monotonic_in_issue_order() {
    let src = "\
       ADDI R1, R0, 3
loop:  ADDI R1, R1, -1
       BEQ R1, R0, done
       BEQ R0, R0, loop
done:  ADDI R2, R0, 7
";
    let engine = run(src);
    let commits: Vec<u64> = engine
        .timeline
        .rows()
        .iter()
        .filter_map(|r| r.commit)
        .collect();
    assert!(commits.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(commits.len() as u64, engine.stats.instructions_retired);
}

#[test]
fn test_exec_duration_matches_unit_latency() {
    let engine = run("MUL R1, R0, R0\nADDI R2, R0, 1\nNAND R3, R0, R0\n");
    let latency = |idx: usize| {
        let row = &engine.timeline.rows()[idx];
        row.exec_finish.unwrap() - row.exec_start.unwrap() + 1
    };
    assert_eq!(latency(0), 8);
    assert_eq!(latency(1), 2);
    assert_eq!(latency(2), 1);
}

#[test]
fn test_misprediction_rate_zero_without_branches() {
    let engine = run("ADDI R1, R0, 1\n");
    assert_eq!(engine.stats.branches, 0);
    assert_eq!(engine.stats.misprediction_rate(), 0.0);
}
