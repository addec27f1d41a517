//! Localized user-facing strings.
//!
//! The engine never hard-codes prompt or error text; it asks a [`Localizer`]
//! for a key and substitutes `{{param}}` placeholders. [`BuiltinStrings`]
//! ships the English and Japanese tables; hosts with their own catalogs can
//! implement the trait directly.

#[cfg(test)]
#[path = "i18n_test.rs"]
mod i18n_test;

/// Placeholder inserted into a freshly created text box.
pub const KEY_ENTER_TEXT: &str = "enterText";
/// Prompt for a person's name. Param: `current`.
pub const KEY_ENTER_NAME: &str = "enterName";
/// Prompt for a person's age. Param: `current`.
pub const KEY_ENTER_AGE: &str = "enterAge";
/// Prompt for a boundary label. Param: `current`.
pub const KEY_ENTER_LABEL: &str = "enterLabel";
pub const KEY_LOAD_ERROR: &str = "loadError";
pub const KEY_SAVE_ERROR: &str = "saveError";
pub const KEY_PNG_SAVE_ERROR: &str = "pngSaveError";
/// Caption drawn under a shape living with the index person.
pub const KEY_COHABITING_CAPTION: &str = "cohabitingCaption";

/// Source of localized strings.
pub trait Localizer {
    /// Look up `key` and substitute each `{{name}}` with its value from `params`.
    fn t(&self, key: &str, params: &[(&str, &str)]) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    En,
    #[default]
    Ja,
}

impl Language {
    /// Parse a BCP 47 tag such as `"en"`, `"en-US"` or `"ja-JP"`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "ja" => Some(Self::Ja),
            _ => None,
        }
    }
}

const EN: &[(&str, &str)] = &[
    (KEY_ENTER_TEXT, "Enter text"),
    (KEY_ENTER_NAME, "Enter name (current: {{current}})"),
    (KEY_ENTER_AGE, "Enter age (current: {{current}})"),
    (KEY_ENTER_LABEL, "Enter label (current: {{current}})"),
    (KEY_LOAD_ERROR, "Failed to load the file. Please check that it is a valid genogram project."),
    (KEY_SAVE_ERROR, "Failed to save the project."),
    (KEY_PNG_SAVE_ERROR, "Failed to save the PNG image."),
    (KEY_COHABITING_CAPTION, "Cohabiting"),
];

const JA: &[(&str, &str)] = &[
    (KEY_ENTER_TEXT, "テキストを入力"),
    (KEY_ENTER_NAME, "名前を入力してください（現在: {{current}}）"),
    (KEY_ENTER_AGE, "年齢を入力してください（現在: {{current}}）"),
    (KEY_ENTER_LABEL, "ラベルを入力してください（現在: {{current}}）"),
    (KEY_LOAD_ERROR, "ファイルの読み込みに失敗しました。ジェノグラムのプロジェクトファイルか確認してください。"),
    (KEY_SAVE_ERROR, "プロジェクトの保存に失敗しました。"),
    (KEY_PNG_SAVE_ERROR, "PNG画像の保存に失敗しました。"),
    (KEY_COHABITING_CAPTION, "同居"),
];

/// Built-in string tables. Missing keys fall back to English, then to the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinStrings {
    pub language: Language,
}

impl BuiltinStrings {
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self.language {
            Language::En => EN,
            Language::Ja => JA,
        }
    }
}

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

impl Localizer for BuiltinStrings {
    fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        let template = lookup(self.table(), key).or_else(|| lookup(EN, key)).unwrap_or(key);
        interpolate(template, params)
    }
}

/// Replace every `{{name}}` in `template` with the matching param value.
#[must_use]
pub fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_owned(), |acc, (name, value)| acc.replace(&format!("{{{{{name}}}}}"), value))
}
