use casedash::load::{list_sheets, load_raw_table, DEFAULT_SHEET};
use casedash::normalize::aliases::rename_columns;
use std::{env, path::Path, process::exit};

fn main() {
    // Expect a workbook path and optionally a sheet name.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <WORKBOOK> [SHEET]", args[0]);
        exit(1);
    }
    let sheet = args.get(2).map(String::as_str).unwrap_or(DEFAULT_SHEET);
    if let Err(e) = inspect_workbook(Path::new(&args[1]), sheet) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

/// Print the workbook's sheets, then the chosen sheet's headers and how each maps.
fn inspect_workbook(path: &Path, sheet: &str) -> Result<(), Box<dyn std::error::Error>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    println!("=== Workbook: {} ===", path.display());
    if !is_csv {
        for name in list_sheets(path)? {
            let marker = if name == sheet { "*" } else { " " };
            println!("{} {}", marker, name);
        }
        println!();
    }

    let raw = load_raw_table(path, sheet)?;
    println!("=== Sheet: {} ({} data rows) ===", sheet, raw.rows.len());
    let renamed = rename_columns(&raw.headers);
    for (idx, (original, canonical)) in raw.headers.iter().zip(&renamed).enumerate() {
        let filled = raw
            .rows
            .iter()
            .filter(|row| row.get(idx).is_some_and(Option::is_some))
            .count();
        if original == canonical {
            println!("- {:<40} | filled: {}", original, filled);
        } else {
            println!("- {:<40} | -> {:<20} | filled: {}", original, canonical, filled);
        }
    }
    Ok(())
}
