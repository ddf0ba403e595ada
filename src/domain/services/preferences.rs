#[cfg(test)]
#[path = "preferences_test.rs"]
mod tests;

use std::str::FromStr;

use crate::domain::models::DeskResult;
use crate::domain::models::FontSize;
use crate::domain::models::Preferences;
use crate::domain::models::Storage;
use crate::domain::models::ThemeMode;

pub const THEME_KEY: &str = "theme";
pub const FONT_SIZE_KEY: &str = "fontSize";
pub const HIGH_CONTRAST_KEY: &str = "highContrast";

fn read_or_default<T: FromStr + Default>(storage: &dyn Storage, key: &str) -> T {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            tracing::warn!(key, error = %err, "Failed to read preference");
            return T::default();
        }
    };

    return raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(key, value = %raw, "Unknown preference value, using default");
        return T::default();
    });
}

impl Preferences {
    /// Reads stored preferences. Missing or unrecognised values fall back
    /// to their defaults.
    pub fn load(storage: &dyn Storage) -> Preferences {
        return Preferences {
            theme: read_or_default::<ThemeMode>(storage, THEME_KEY),
            font_size: read_or_default::<FontSize>(storage, FONT_SIZE_KEY),
            high_contrast: read_or_default::<bool>(storage, HIGH_CONTRAST_KEY),
        };
    }

    pub fn save(&self, storage: &dyn Storage) -> DeskResult<()> {
        storage.set(THEME_KEY, &self.theme.to_string())?;
        storage.set(FONT_SIZE_KEY, &self.font_size.to_string())?;
        storage.set(HIGH_CONTRAST_KEY, &self.high_contrast.to_string())?;

        return Ok(());
    }
}
