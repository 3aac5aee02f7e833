// BSD 3-Clause License
// Copyright (c) 2025, NØNOS - NOXTERM
//
//! Operator facing description of every environment variable

use std::io::{self, Write};

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};

use super::error::ConfigError;
use super::schema::{check, Leaf, SCHEMA};

const INTRO: &str = "Inbucket is configured via the environment. The following environment variables
can be used:";

const HEADER: [&str; 3] = ["KEY", "DEFAULT", "DESCRIPTION"];

/// Spaces between aligned columns.
const PADDING: u16 = 4;

/// Borderless, left aligned table with a fixed gap after each column but the last.
fn usage_table(schema: &[Leaf]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(
            HEADER
                .iter()
                .map(|h| Cell::new(h).set_alignment(CellAlignment::Left)),
        );

    for leaf in schema.iter().filter(|leaf| !leaf.ignored) {
        table.add_row(vec![
            Cell::new(leaf.env_key()),
            Cell::new(leaf.default.unwrap_or_default()),
            Cell::new(leaf.description),
        ]);
    }

    let last = HEADER.len() - 1;
    for (index, column) in table.column_iter_mut().enumerate() {
        let right = if index == last { 0 } else { PADDING };
        column.set_padding((0, right));
    }
    table
}

/// Write the usage table for `schema`. Ignored leaves are left out.
pub fn render<W: Write>(schema: &[Leaf], out: &mut W) -> Result<(), ConfigError> {
    check(schema)?;
    let table = usage_table(schema);

    write_table(out, &table).map_err(|e| ConfigError::Schema {
        message: format!("write failed: {}", e),
    })
}

fn write_table<W: Write>(out: &mut W, table: &Table) -> io::Result<()> {
    writeln!(out, "{}", INTRO)?;
    writeln!(out)?;
    for line in table.lines() {
        writeln!(out, "{}", line.trim_end())?;
    }
    out.flush()
}

/// Print usage for the built-in schema to stderr.
///
/// Only reached from an explicit help request, so a failure ends the process.
pub fn print() {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    if let Err(e) = render(SCHEMA, &mut out) {
        drop(out);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
