//! Two-pass assembler for the textual assembly format.
//!
//! The format, one instruction or label per line:
//! - Labels end with `:` and resolve to word addresses. A label may be
//!   followed by an instruction on the same line.
//! - Mnemonics are case-insensitive; operands are comma-separated.
//! - Memory operands use `offset(rB)` syntax; offsets may be negative.
//! - Comments begin with `;` and run to end of line.
//! - Immediates and addresses are decimal or `0x`-prefixed hex.
//!
//! Pass 1 records label addresses; pass 2 parses operands and resolves
//! labels. All failures are [`SimError::Parse`] with the 1-based line number.

use std::collections::HashMap;

use crate::common::SimError;
use crate::common::constants::REG_COUNT;
use crate::isa::instruction::{Op, Program, Reg};

/// Assembles source text into a program placed at `origin`.
pub fn assemble(src: &str, origin: u16) -> Result<Program, SimError> {
    let mut labels: HashMap<String, u16> = HashMap::new();
    let mut pending: Vec<(usize, String)> = Vec::new();

    // Pass 1: strip comments, collect labels, gather instruction lines.
    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let mut text = raw.split(';').next().unwrap_or("").trim();

        while let Some(colon) = text.find(':') {
            let name = text[..colon].trim();
            if name.is_empty() || name.split_whitespace().count() != 1 {
                return Err(parse_err(line_no, format!("malformed label `{}`", text)));
            }
            let addr = origin.wrapping_add(pending.len() as u16);
            if labels.insert(name.to_lowercase(), addr).is_some() {
                return Err(parse_err(line_no, format!("duplicate label `{}`", name)));
            }
            text = text[colon + 1..].trim();
        }

        if !text.is_empty() {
            pending.push((line_no, text.to_string()));
        }
    }

    // Pass 2: parse each instruction with labels in scope.
    let mut ops = Vec::with_capacity(pending.len());
    for (i, (line_no, text)) in pending.iter().enumerate() {
        let pc = origin.wrapping_add(i as u16);
        ops.push(parse_line(text, pc, *line_no, &labels)?);
    }

    Ok(Program::new(origin, ops))
}

/// Parses one instruction line (comments and labels already stripped).
fn parse_line(
    text: &str,
    pc: u16,
    line: usize,
    labels: &HashMap<String, u16>,
) -> Result<Op, SimError> {
    let (mnemonic, rest) = match text.split_once(char::is_whitespace) {
        Some((m, r)) => (m, r.trim()),
        None => (text, ""),
    };
    let mnemonic = mnemonic.to_lowercase();
    let operands: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };

    let expect = |n: usize| -> Result<(), SimError> {
        if operands.len() == n {
            Ok(())
        } else {
            Err(parse_err(
                line,
                format!(
                    "`{}` expects {} operand(s), found {}",
                    mnemonic,
                    n,
                    operands.len()
                ),
            ))
        }
    };

    match mnemonic.as_str() {
        "load" => {
            expect(2)?;
            let rd = parse_reg(operands[0], line)?;
            let (offset, base) = parse_mem_operand(operands[1], line)?;
            Ok(Op::Load { rd, offset, base })
        }
        "store" => {
            expect(2)?;
            let src = parse_reg(operands[0], line)?;
            let (offset, base) = parse_mem_operand(operands[1], line)?;
            Ok(Op::Store { src, offset, base })
        }
        "beq" => {
            expect(3)?;
            let rs1 = parse_reg(operands[0], line)?;
            let rs2 = parse_reg(operands[1], line)?;
            // A label resolves to an offset relative to the fall-through PC;
            // a bare number is the offset itself.
            let offset = if is_label(operands[2]) {
                let addr = resolve_label(operands[2], labels, line)?;
                check_i16(addr as i32 - (pc as i32 + 1), line)?
            } else {
                parse_imm(operands[2], line)?
            };
            Ok(Op::Beq { rs1, rs2, offset })
        }
        "call" => {
            expect(1)?;
            let target = if is_label(operands[0]) {
                resolve_label(operands[0], labels, line)?
            } else {
                parse_addr(operands[0], line)?
            };
            Ok(Op::Call { target })
        }
        "ret" => {
            expect(0)?;
            Ok(Op::Ret)
        }
        "add" => {
            expect(3)?;
            Ok(Op::Add {
                rd: parse_reg(operands[0], line)?,
                rs1: parse_reg(operands[1], line)?,
                rs2: parse_reg(operands[2], line)?,
            })
        }
        "addi" => {
            expect(3)?;
            Ok(Op::Addi {
                rd: parse_reg(operands[0], line)?,
                rs1: parse_reg(operands[1], line)?,
                imm: parse_imm(operands[2], line)?,
            })
        }
        "nand" => {
            expect(3)?;
            Ok(Op::Nand {
                rd: parse_reg(operands[0], line)?,
                rs1: parse_reg(operands[1], line)?,
                rs2: parse_reg(operands[2], line)?,
            })
        }
        "mul" => {
            expect(3)?;
            Ok(Op::Mul {
                rd: parse_reg(operands[0], line)?,
                rs1: parse_reg(operands[1], line)?,
                rs2: parse_reg(operands[2], line)?,
            })
        }
        other => Err(parse_err(line, format!("unknown mnemonic `{}`", other))),
    }
}

/// True when a branch/call operand is a label reference rather than a number.
fn is_label(tok: &str) -> bool {
    tok.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && !tok.starts_with("0x")
        && !tok.starts_with("0X")
}

/// Looks up a label, reporting an undefined-label error otherwise.
fn resolve_label(
    tok: &str,
    labels: &HashMap<String, u16>,
    line: usize,
) -> Result<u16, SimError> {
    labels
        .get(&tok.to_lowercase())
        .copied()
        .ok_or_else(|| parse_err(line, format!("undefined label `{}`", tok)))
}

/// Parses a register operand (`R0`-`R7`, case-insensitive).
fn parse_reg(tok: &str, line: usize) -> Result<Reg, SimError> {
    let digits = tok
        .strip_prefix('r')
        .or_else(|| tok.strip_prefix('R'))
        .ok_or_else(|| parse_err(line, format!("expected register, found `{}`", tok)))?;
    let idx: usize = digits
        .parse()
        .map_err(|_| parse_err(line, format!("expected register, found `{}`", tok)))?;
    if idx >= REG_COUNT {
        return Err(parse_err(
            line,
            format!("register `{}` out of range (R0-R{})", tok, REG_COUNT - 1),
        ));
    }
    Ok(idx)
}

/// Parses a signed immediate, decimal or `0x` hex, into i16 range.
fn parse_imm(tok: &str, line: usize) -> Result<i16, SimError> {
    let (neg, body) = match tok.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, tok.strip_prefix('+').unwrap_or(tok)),
    };
    let magnitude = parse_u32_literal(body)
        .ok_or_else(|| parse_err(line, format!("bad immediate `{}`", tok)))?;
    let value = if neg {
        -(magnitude as i64)
    } else {
        magnitude as i64
    };
    check_i16(value as i32, line)
}

/// Parses an unsigned word address, decimal or `0x` hex.
fn parse_addr(tok: &str, line: usize) -> Result<u16, SimError> {
    let value = parse_u32_literal(tok)
        .ok_or_else(|| parse_err(line, format!("bad address `{}`", tok)))?;
    if value > u16::MAX as u32 {
        return Err(parse_err(line, format!("address `{}` out of range", tok)));
    }
    Ok(value as u16)
}

/// Parses a memory operand of the form `offset(rB)`.
fn parse_mem_operand(tok: &str, line: usize) -> Result<(i16, Reg), SimError> {
    let open = tok
        .find('(')
        .ok_or_else(|| parse_err(line, format!("bad memory operand `{}`", tok)))?;
    if !tok.ends_with(')') {
        return Err(parse_err(line, format!("bad memory operand `{}`", tok)));
    }
    let offset_text = tok[..open].trim();
    let reg_text = tok[open + 1..tok.len() - 1].trim();
    let offset = if offset_text.is_empty() {
        0
    } else {
        parse_imm(offset_text, line)?
    };
    let base = parse_reg(reg_text, line)?;
    Ok((offset, base))
}

/// Parses a decimal or `0x`-prefixed hex literal.
fn parse_u32_literal(body: &str) -> Option<u32> {
    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        body.parse().ok()
    }
}

/// Bounds a value to i16, reporting an out-of-range immediate otherwise.
fn check_i16(value: i32, line: usize) -> Result<i16, SimError> {
    i16::try_from(value)
        .map_err(|_| parse_err(line, format!("immediate {} out of range", value)))
}

fn parse_err(line: usize, msg: String) -> SimError {
    SimError::Parse { line, msg }
}
