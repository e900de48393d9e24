//! Text rendering of records.
//!
//! The rendered memory is the context block handed to the model, so its
//! layout is part of the external contract:
//!
//! ```text
//! Inventory (Items you own):
//! axe: a tool (You own 3 axe)
//!
//! Logs (Recent actions):
//! ```
//!
//! Each record starts with its capitalized name and description, followed
//! by one line per item. Records are separated by a blank line and the
//! whole text carries no trailing whitespace.

use std::fmt::Write as _;

use castaway_types::{Item, RecordKind};

use crate::store::{Record, RecordStore};

/// Rendered in place of a record the manifest does not declare.
pub const MISSING_RECORD: &str = "{}";

impl RecordStore {
    /// Render one record, or [`MISSING_RECORD`] if it is not declared.
    pub fn record_to_string(&self, name: &str) -> String {
        self.get(name).map_or_else(
            |_| MISSING_RECORD.to_owned(),
            |record| {
                let mut out = String::new();
                write_record(&mut out, record);
                out.trim().to_owned()
            },
        )
    }

    /// Render every record in manifest order.
    pub fn all_records_to_string(&self) -> String {
        let mut out = String::new();
        for record in self.records() {
            write_record(&mut out, record);
            out.push('\n');
        }
        out.trim().to_owned()
    }
}

fn write_record(out: &mut String, record: &Record) {
    let _ = writeln!(out, "{} ({}):", capitalize(record.name()), record.description());
    for item in record.items() {
        write_item(out, record.kind(), item);
    }
}

fn write_item(out: &mut String, kind: RecordKind, item: &Item) {
    match (kind, item.quantity) {
        (RecordKind::Inventory, Some(quantity)) => {
            let _ = writeln!(
                out,
                "{}: {} (You own {quantity} {})",
                item.name, item.description, item.name
            );
        }
        _ => {
            let _ = writeln!(out, "{}: {}", item.name, item.description);
        }
    }
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}
