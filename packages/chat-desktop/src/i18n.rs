use gpui::Global;
use serde_json::Value;
use std::collections::HashMap;
use std::env;

const EN: &str = include_str!("../i18n/en.json");
const ZH: &str = include_str!("../i18n/zh.json");

#[derive(Clone, Debug)]
pub struct I18n {
    locale: String,
    messages: HashMap<String, String>,
    fallback: HashMap<String, String>,
}

impl I18n {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            messages: load_messages(locale),
            fallback: parse_messages(EN),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Look up a string, falling back to English and then to the key itself
    pub fn t(&self, key: &str) -> String {
        self.messages
            .get(key)
            .or_else(|| self.fallback.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    pub fn format(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut value = self.t(key);
        for (param, replacement) in params {
            value = value.replace(&format!("{{{param}}}"), replacement);
        }
        value
    }
}

impl Global for I18n {}

fn detect_locale() -> String {
    let candidates = ["LC_ALL", "LC_MESSAGES", "LANG"];
    for key in candidates {
        if let Ok(value) = env::var(key) {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            let normalized = trimmed
                .split('.')
                .next()
                .unwrap_or(trimmed)
                .replace('-', "_")
                .to_lowercase();
            if !normalized.is_empty() {
                return normalized;
            }
        }
    }
    "en".to_string()
}

fn parse_messages(raw: &str) -> HashMap<String, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
            .collect(),
        _ => HashMap::new(),
    }
}

fn load_messages(locale: &str) -> HashMap<String, String> {
    if locale.to_lowercase().starts_with("zh") {
        parse_messages(ZH)
    } else {
        parse_messages(EN)
    }
}

pub fn init(cx: &mut gpui::App) {
    let i18n = I18n::new(&detect_locale());
    tracing::debug!("Loaded strings for locale {}", i18n.locale());
    cx.set_global(i18n);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locales_share_keys() {
        let en = parse_messages(EN);
        let zh = parse_messages(ZH);
        assert!(!en.is_empty());
        let mut en_keys: Vec<_> = en.keys().collect();
        let mut zh_keys: Vec<_> = zh.keys().collect();
        en_keys.sort();
        zh_keys.sort();
        assert_eq!(en_keys, zh_keys);
    }

    #[test]
    fn chinese_locale_selected() {
        let i18n = I18n::new("zh_cn");
        assert_eq!(i18n.t("info_panel.title"), "信息面板");
        assert_eq!(I18n::new("en_us").t("info_panel.title"), "Info");
    }

    #[test]
    fn unknown_key_echoes_and_params_substitute() {
        let i18n = I18n::new("en");
        assert_eq!(i18n.t("missing.key"), "missing.key");
        assert_eq!(
            i18n.format("chat.command", &[("command", "search")]),
            "Command: search"
        );
    }
}
