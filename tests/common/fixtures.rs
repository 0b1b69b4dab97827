//! Static table fixtures and helpers to put them on disk.

use std::path::{Path, PathBuf};

pub const FRUIT_CSV: &str = "name,category\napple,fruit\nBread,bakery\n";

/// Hebrew headers, a quoted comma, NA markers and a numeric column.
pub const HEBREW_CSV: &str = "\u{feff}שם המזון,קטגוריה,קלוריות\n\
\"לחם, מלא\",מאפים,247\n\
תפוח,פירות,52\n\
גבינה לבנה,NaN,\n\
חלב,מוצרי חלב,NA\n";

/// The third line has one field too many.
pub const MALFORMED_CSV: &str = "name,category\napple,fruit\nBread,bakery,extra\n";

/// Write `contents` to `dir/name` and return the path.
pub fn write_table(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}
