use strum::EnumString;
use strum::EnumVariantNames;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumString, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, EnumString, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: ThemeMode,
    pub font_size: FontSize,
    pub high_contrast: bool,
}
