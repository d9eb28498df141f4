//! Реквизиты счета для шапки выписки.

use crate::error::{Error, Result};
use crate::schema::BankSchema;
use serde_json::Value;
use std::io::Read;

/// Реквизиты счета: произвольные пары ключ/значение в порядке добавления.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountProfile {
    attributes: Vec<(String, String)>,
}

impl AccountProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut profile = AccountProfile::new();
        for (key, value) in pairs {
            profile.insert(key, value);
        }
        profile
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(attr) => attr.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Читает профиль из плоского JSON-объекта.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    /// Собирает профиль из JSON-объекта. Числа и логические значения
    /// превращаются в строки, `null` пропускается.
    pub fn from_json_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidFormat(
                "Профиль счета должен быть JSON-объектом".to_string(),
            ));
        };

        let mut profile = AccountProfile::new();
        for (key, value) in map {
            if let Some(text) = scalar_to_string(&value) {
                profile.insert(key, text);
            }
        }
        Ok(profile)
    }

    /// Реквизиты в порядке, объявленном схемой: (подпись, значение).
    /// Поля без значения и поля, которых нет в схеме, пропускаются.
    pub fn scoped(&self, schema: &BankSchema) -> Vec<(&'static str, String)> {
        schema
            .account_fields
            .iter()
            .filter_map(|(key, label)| {
                let value = self.get(key)?.trim();
                if value.is_empty() {
                    None
                } else {
                    Some((*label, value.to_string()))
                }
            })
            .collect()
    }
}

/// Скалярное JSON-значение в виде строки.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
