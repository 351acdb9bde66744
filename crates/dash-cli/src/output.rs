//! Output formatting for human-readable and JSON modes.
//!
//! Results go to stdout, errors to stderr. JSON mode prints one compact
//! JSON document per result with no ANSI escapes.

use colored::Colorize;
use serde::Serialize;

pub fn print_success(msg: &str, json_mode: bool) {
    if json_mode {
        let obj = serde_json::json!({ "status": "ok", "message": msg });
        println!("{obj}");
    } else {
        println!("{} {}", "✓".green().bold(), msg);
    }
}

/// Prints a single key-value pair in human mode.
pub fn print_kv(key: &str, value: &str) {
    println!("{}: {}", key.bold(), value);
}

/// Prints a serializable value as compact JSON, or pretty JSON for humans.
pub fn print_value<T: Serialize>(value: &T, json_mode: bool) {
    let rendered = if json_mode {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("{{\"error\":\"json serialization failed: {e}\"}}"),
    }
}

pub fn print_error(msg: &str, json_mode: bool) {
    if json_mode {
        let obj = serde_json::json!({ "status": "error", "error": msg });
        eprintln!("{obj}");
    } else {
        eprintln!("{} {}", "error:".red().bold(), msg);
    }
}

/// Prints rows under a header line in human mode.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    if rows.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{h:<w$}"))
        .collect();
    println!("{}", header_line.join("  ").bold());

    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        println!("{}", line.join("  "));
    }
}

/// Satoshis with the BTC equivalent, e.g. `150000 sat (0.00150000 BTC)`.
pub fn format_sat(sat: i64) -> String {
    format!("{sat} sat ({:.8} BTC)", explorer::sat_to_btc(sat))
}
