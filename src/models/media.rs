use std::path::Path;

// https://en.wikipedia.org/wiki/Raw_image_format#Raw_filename_extensions_and_respective_camera_manufacturers_or_standard
pub const RAW_EXTENSIONS: &[&str] = &[
    "3fr", "ari", "arw", "srf", "sr2", "bay", "braw", "cri", "crw", "cr2", "cr3", "cap", "iiq",
    "eip", "dcs", "dcr", "drf", "k25", "kdc", "dng", "erf", "fff", "gpr", "jxs", "mef", "mdc",
    "mos", "mrw", "nef", "nrw", "orf", "pef", "ptx", "pxn", "r3d", "raf", "raw", "rw2", "rwl",
    "rwz", "srw", "tco", "x3f",
];

/// Whether a path carries a camera RAW extension (case-insensitive).
pub fn is_raw_file(path: &str) -> bool {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext {
        Some(ext) => RAW_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}
