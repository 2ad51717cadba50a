use std::collections::HashMap;
use std::sync::Mutex;

use tracing::warn;

/// Modal surfaced when the gated DNG toggle is rejected.
pub const DNG_CONVERTER_ALERT: &str = "dng-converter-alert";
/// Modal holding the DNG sub-settings form.
pub const DNG_SETTINGS_FORM: &str = "dng-settings-form";

/// Named open/closed flags for the modal dialogs the UI can show. Owned by
/// the app state and passed by reference to whoever needs to surface one;
/// there is deliberately no global instance.
#[derive(Debug, Default)]
pub struct DialogRegistry {
    dialogs: Mutex<HashMap<String, bool>>,
}

impl DialogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialog in the closed state. Re-registering is a no-op.
    pub fn add(&self, name: &str) {
        let mut dialogs = self.dialogs.lock().unwrap();
        if dialogs.contains_key(name) {
            warn!(dialog = name, "dialog already registered");
            return;
        }
        dialogs.insert(name.to_string(), false);
    }

    pub fn set(&self, name: &str, open: bool) {
        let mut dialogs = self.dialogs.lock().unwrap();
        dialogs.insert(name.to_string(), open);
    }

    pub fn open(&self, name: &str) {
        self.set(name, true);
    }

    pub fn close(&self, name: &str) {
        self.set(name, false);
    }

    pub fn toggle(&self, name: &str) {
        let mut dialogs = self.dialogs.lock().unwrap();
        let entry = dialogs.entry(name.to_string()).or_insert(false);
        *entry = !*entry;
    }

    pub fn is_open(&self, name: &str) -> bool {
        let dialogs = self.dialogs.lock().unwrap();
        dialogs.get(name).copied().unwrap_or(false)
    }

    pub fn has(&self, name: &str) -> bool {
        let dialogs = self.dialogs.lock().unwrap();
        dialogs.contains_key(name)
    }

    pub fn remove(&self, name: &str) {
        let mut dialogs = self.dialogs.lock().unwrap();
        dialogs.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_dialog_reads_closed() {
        let dialogs = DialogRegistry::new();
        assert!(!dialogs.is_open("nope"));
        assert!(!dialogs.has("nope"));
    }

    #[test]
    fn open_close_round_trip() {
        let dialogs = DialogRegistry::new();
        dialogs.add(DNG_CONVERTER_ALERT);
        assert!(!dialogs.is_open(DNG_CONVERTER_ALERT));

        dialogs.open(DNG_CONVERTER_ALERT);
        assert!(dialogs.is_open(DNG_CONVERTER_ALERT));

        dialogs.close(DNG_CONVERTER_ALERT);
        assert!(!dialogs.is_open(DNG_CONVERTER_ALERT));
    }

    #[test]
    fn toggle_registers_on_first_use() {
        let dialogs = DialogRegistry::new();
        dialogs.toggle(DNG_SETTINGS_FORM);
        assert!(dialogs.is_open(DNG_SETTINGS_FORM));
        dialogs.toggle(DNG_SETTINGS_FORM);
        assert!(!dialogs.is_open(DNG_SETTINGS_FORM));
    }
}
