//! Input collaborator seam
//!
//! The assembler never reads raw user input itself. For each parameter it
//! builds an [`InputRequest`] and asks an [`InputSource`] for a value.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::document::ParamValue;
use crate::schema::ParamKind;

/// Identifies one input across the whole form
///
/// The slot index keeps keys unique when several slots use the same action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputKey {
    pub action: String,
    pub parameter: String,
    pub slot: usize,
}

impl InputKey {
    pub fn new(action: impl Into<String>, parameter: impl Into<String>, slot: usize) -> Self {
        Self {
            action: action.into(),
            parameter: parameter.into(),
            slot,
        }
    }
}

impl std::fmt::Display for InputKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}_{}", self.action, self.parameter, self.slot)
    }
}

/// Everything an input source needs to render and validate one parameter
#[derive(Debug, Clone)]
pub struct InputRequest<'a> {
    pub key: InputKey,
    pub kind: ParamKind,
    pub label: &'a str,
    /// Resolved choices (fixed options, or the available columns)
    pub options: &'a [String],
}

/// Supplies raw parameter values to the assembler
pub trait InputSource {
    /// Value for the requested parameter, or `None` when the user left it unset
    fn request(&mut self, request: &InputRequest<'_>) -> Option<ParamValue>;
}

/// In-memory input source backed by previously entered values
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    values: HashMap<InputKey, ParamValue>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: InputKey, value: impl Into<ParamValue>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &InputKey) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Forget every value entered for `slot`
    pub fn clear_slot(&mut self, slot: usize) {
        self.values.retain(|key, _| key.slot != slot);
    }

    /// Drop the values of `slot` and shift later slots down by one
    pub fn remove_slot(&mut self, slot: usize) {
        let values = std::mem::take(&mut self.values);
        self.values = values
            .into_iter()
            .filter(|(key, _)| key.slot != slot)
            .map(|(mut key, value)| {
                if key.slot > slot {
                    key.slot -= 1;
                }
                (key, value)
            })
            .collect();
    }
}

impl InputSource for ValueStore {
    fn request(&mut self, request: &InputRequest<'_>) -> Option<ParamValue> {
        let raw = self.values.get(&request.key)?;
        let value = coerce(raw, request.kind, request.options);
        if value.is_none() {
            warn!(key = %request.key, kind = %request.kind, "Ignoring value that does not fit the parameter");
        } else {
            debug!(key = %request.key, "Using stored value");
        }
        value
    }
}

/// Fit a raw value to a parameter kind and its choices
///
/// Returns `None` when the value cannot be used for the parameter. Selection
/// kinds only accept entries from `options`.
pub fn coerce(raw: &ParamValue, kind: ParamKind, options: &[String]) -> Option<ParamValue> {
    match kind {
        ParamKind::MultiSelect => {
            let items: Vec<String> = match raw {
                ParamValue::List(items) => items.clone(),
                ParamValue::Text(item) => vec![item.clone()],
                ParamValue::Number(_) => return None,
            };
            let kept: Vec<String> = items.into_iter().filter(|item| options.contains(item)).collect();
            Some(ParamValue::List(kept))
        }
        ParamKind::Select => match raw {
            ParamValue::Text(choice) if options.contains(choice) => Some(raw.clone()),
            ParamValue::Text(choice) if choice.is_empty() => Some(raw.clone()),
            _ => None,
        },
        ParamKind::Text => match raw {
            ParamValue::Text(_) => Some(raw.clone()),
            ParamValue::Number(n) => Some(ParamValue::Text(n.to_string())),
            ParamValue::List(_) => None,
        },
        ParamKind::Number => match raw {
            ParamValue::Number(_) => Some(raw.clone()),
            ParamValue::Text(text) => parse_number(text).map(ParamValue::Number),
            ParamValue::List(_) => None,
        },
    }
}

/// Parse text as a JSON number, integers first
pub fn parse_number(text: &str) -> Option<serde_json::Number> {
    let text = text.trim();
    if let Ok(int) = text.parse::<i64>() {
        return Some(int.into());
    }
    text.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_input_key_display() {
        let key = InputKey::new("filter_rows", "column", 2);
        assert_eq!(key.to_string(), "filter_rows_column_2");
    }

    #[test]
    fn test_keys_unique_across_slots() {
        let first = InputKey::new("select_columns", "column_names", 0);
        let second = InputKey::new("select_columns", "column_names", 1);
        assert_ne!(first, second);
        assert_ne!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_coerce_multiselect_filters_unknown_columns() {
        let raw = ParamValue::from(vec!["qty", "missing", "id"]);
        let value = coerce(&raw, ParamKind::MultiSelect, &opts(&["id", "qty"]));
        assert_eq!(value, Some(ParamValue::from(vec!["qty", "id"])));
    }

    #[test]
    fn test_coerce_multiselect_single_text() {
        let value = coerce(&ParamValue::from("id"), ParamKind::MultiSelect, &opts(&["id"]));
        assert_eq!(value, Some(ParamValue::from(vec!["id"])));
    }

    #[test]
    fn test_coerce_select_outside_options() {
        let options = opts(&["equals", "contains"]);
        assert_eq!(coerce(&ParamValue::from("like"), ParamKind::Select, &options), None);
        assert_eq!(
            coerce(&ParamValue::from("contains"), ParamKind::Select, &options),
            Some(ParamValue::from("contains"))
        );
    }

    #[test]
    fn test_coerce_text_and_number() {
        let number = ParamValue::Number(18.into());
        assert_eq!(coerce(&number, ParamKind::Text, &[]), Some(ParamValue::from("18")));
        assert_eq!(
            coerce(&ParamValue::from(" 42 "), ParamKind::Number, &[]),
            Some(ParamValue::Number(42.into()))
        );
        assert_eq!(coerce(&ParamValue::from("forty"), ParamKind::Number, &[]), None);
    }

    #[test]
    fn test_parse_number_float() {
        let n = parse_number("2.5").unwrap();
        assert_eq!(n.as_f64(), Some(2.5));
        assert!(parse_number("NaN").is_none());
    }

    #[test]
    fn test_value_store_remove_slot_shifts() {
        let mut store = ValueStore::new();
        store.set(InputKey::new("filter_rows", "value", 0), "a");
        store.set(InputKey::new("filter_rows", "value", 1), "b");
        store.set(InputKey::new("filter_rows", "value", 2), "c");

        store.remove_slot(1);

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(&InputKey::new("filter_rows", "value", 0)),
            Some(&ParamValue::from("a"))
        );
        assert_eq!(
            store.get(&InputKey::new("filter_rows", "value", 1)),
            Some(&ParamValue::from("c"))
        );
        assert!(store.get(&InputKey::new("filter_rows", "value", 2)).is_none());
    }

    #[test]
    fn test_value_store_request_missing() {
        let mut store = ValueStore::new();
        let options = opts(&["id"]);
        let request = InputRequest {
            key: InputKey::new("select_columns", "column_names", 0),
            kind: ParamKind::MultiSelect,
            label: "Select Columns",
            options: &options,
        };
        assert_eq!(store.request(&request), None);
    }
}
