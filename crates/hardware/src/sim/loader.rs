//! Assembly and memory-image loading.
//!
//! This module reads the two simulator inputs from disk:
//! 1. **Program:** Assembly text, assembled at the given start address.
//! 2. **Memory image:** (address, value) pairs, one per line, decimal or
//!    `0x`-prefixed hex, separated by whitespace or a comma; `;` comments.
//!
//! All failures surface as [`SimError`] and abort before simulation starts.

use std::fs;

use crate::common::SimError;
use crate::isa::asm::assemble;
use crate::isa::instruction::Program;

/// Reads and assembles a program file, placing it at `origin`.
pub fn load_program(path: &str, origin: u16) -> Result<Program, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_string(),
        source,
    })?;
    assemble(&text, origin)
}

/// Reads a memory-image file into (address, value) pairs.
pub fn load_memory_image(path: &str) -> Result<Vec<(u16, u16)>, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_memory_image(&text)
}

/// Parses memory-image text into (address, value) pairs.
pub fn parse_memory_image(text: &str) -> Result<Vec<(u16, u16)>, SimError> {
    let mut pairs = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let body = raw.split(';').next().unwrap_or("").trim();
        if body.is_empty() {
            continue;
        }

        let fields: Vec<&str> = body
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect();
        if fields.len() != 2 {
            return Err(SimError::Parse {
                line: line_no,
                msg: format!("expected `address value`, found `{}`", body),
            });
        }

        let addr = parse_u16(fields[0], line_no)?;
        let value = parse_u16(fields[1], line_no)?;
        pairs.push((addr, value));
    }
    Ok(pairs)
}

/// Parses a 16-bit decimal or `0x` hex literal.
fn parse_u16(tok: &str, line: usize) -> Result<u16, SimError> {
    let parsed = if let Some(hex) = tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16)
    } else {
        tok.parse()
    };
    parsed.map_err(|_| SimError::Parse {
        line,
        msg: format!("bad 16-bit value `{}`", tok),
    })
}
