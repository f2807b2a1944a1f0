//! Timeline table rendering.
//!
//! Formats the per-instruction timeline as a fixed-width table with one row
//! per dynamic instruction: index, PC, mnemonic, and the five stage cycles.
//! Cells for stages an instruction never reached render as `-` (STOREs skip
//! the Write column; squashed instructions stop wherever they were killed
//! and are marked with `*`).

use crate::core::pipeline::timeline::Timeline;

/// Renders the timeline table.
pub fn render_timeline(timeline: &Timeline) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<5} {:<5} {:<22} {:>6} {:>10} {:>11} {:>6} {:>7}\n",
        "Idx", "PC", "Instruction", "Issue", "ExecStart", "ExecFinish", "Write", "Commit"
    ));

    let mut any_squashed = false;
    for (idx, row) in timeline.rows().iter().enumerate() {
        let marker = if row.squashed {
            any_squashed = true;
            " *"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<5} {:<5} {:<22} {:>6} {:>10} {:>11} {:>6} {:>7}{}\n",
            idx,
            row.pc,
            row.text,
            cell(row.issue),
            cell(row.exec_start),
            cell(row.exec_finish),
            cell(row.write),
            cell(row.commit),
            marker
        ));
    }

    if any_squashed {
        out.push_str("(* squashed on branch misprediction)\n");
    }
    out
}

fn cell(stamp: Option<u64>) -> String {
    match stamp {
        Some(cycle) => cycle.to_string(),
        None => "-".to_string(),
    }
}
