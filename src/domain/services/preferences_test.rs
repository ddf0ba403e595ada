use crate::domain::models::FontSize;
use crate::domain::models::Preferences;
use crate::domain::models::Storage;
use crate::domain::models::ThemeMode;
use crate::infrastructure::storage::MemoryStorage;

#[test]
fn it_defaults_when_nothing_is_stored() {
    let storage = MemoryStorage::default();
    let prefs = Preferences::load(&storage);

    assert_eq!(prefs, Preferences::default());
    assert_eq!(prefs.theme, ThemeMode::System);
    assert_eq!(prefs.font_size, FontSize::Medium);
    assert!(!prefs.high_contrast);
}

#[test]
fn it_round_trips_through_storage() {
    let storage = MemoryStorage::default();
    let prefs = Preferences {
        theme: ThemeMode::Dark,
        font_size: FontSize::Large,
        high_contrast: true,
    };

    prefs.save(&storage).unwrap();
    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    assert_eq!(storage.get("fontSize").unwrap().as_deref(), Some("large"));
    assert_eq!(storage.get("highContrast").unwrap().as_deref(), Some("true"));
    assert_eq!(Preferences::load(&storage), prefs);
}

#[test]
fn it_ignores_unknown_values() {
    let storage = MemoryStorage::default();
    storage.set("theme", "sepia").unwrap();
    storage.set("fontSize", "small").unwrap();
    storage.set("highContrast", "yes please").unwrap();

    let prefs = Preferences::load(&storage);
    assert_eq!(prefs.theme, ThemeMode::System);
    assert_eq!(prefs.font_size, FontSize::Small);
    assert!(!prefs.high_contrast);
}
