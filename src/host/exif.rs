use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

/// Shot date from EXIF, preferring DateTimeOriginal over DateTime.
/// EXIF dates look like "2024-05-17 10:12:31" once displayed.
pub(super) fn shot_date(path: &Path) -> Option<NaiveDate> {
    let file = File::open(path).ok()?;
    let mut reader = std::io::BufReader::new(&file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .ok()?;

    for tag in [exif::Tag::DateTimeOriginal, exif::Tag::DateTime] {
        if let Some(field) = exif.get_field(tag, exif::In::PRIMARY) {
            let display = field.display_value().to_string();
            if let Some(date) = parse_exif_date(&display) {
                return Some(date);
            }
        }
    }

    None
}

fn parse_exif_date(display: &str) -> Option<NaiveDate> {
    let date_part = display.split_whitespace().next()?;
    let normalized = date_part.replace(':', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").ok()
}
