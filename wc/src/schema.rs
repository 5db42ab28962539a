//! Schema registry
//!
//! A fixed table of transformation actions. Each action names the parameters
//! it takes, and each parameter says which kind of input collects it. The
//! table is built at compile time and has no mutation API.

use serde::Serialize;

use crate::error::FormError;

/// Smallest number of transformation slots a form offers
pub const MIN_TRANSFORMATIONS: usize = 1;

/// Largest number of transformation slots a form offers
pub const MAX_TRANSFORMATIONS: usize = 10;

/// Encodings offered for the data file
pub const ENCODINGS: [&str; 3] = ["utf-8", "ascii", "iso-8859-1"];

/// Operators accepted by `filter_rows`
pub const FILTER_OPERATORS: &[&str] = &["equals", "not_equals", "greater_than", "less_than", "contains"];

/// Input kind used to collect a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    MultiSelect,
    Select,
    Text,
    Number,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultiSelect => write!(f, "multiselect"),
            Self::Select => write!(f, "select"),
            Self::Text => write!(f, "text"),
            Self::Number => write!(f, "number"),
        }
    }
}

/// Schema entry for one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub kind: ParamKind,
    pub label: &'static str,
    /// Fixed choices; when absent, selection kinds choose among the available columns
    pub options: Option<&'static [&'static str]>,
}

impl ParameterDescriptor {
    const fn new(kind: ParamKind, label: &'static str) -> Self {
        Self {
            kind,
            label,
            options: None,
        }
    }

    const fn with_options(kind: ParamKind, label: &'static str, options: &'static [&'static str]) -> Self {
        Self {
            kind,
            label,
            options: Some(options),
        }
    }

    /// Choices offered when rendering this parameter
    ///
    /// Fixed options always win. Otherwise selection kinds offer `columns` in
    /// the given order, and free-form kinds offer nothing.
    pub fn effective_options(&self, columns: &[String]) -> Vec<String> {
        match (self.kind, self.options) {
            (_, Some(options)) => options.iter().map(|o| o.to_string()).collect(),
            (ParamKind::MultiSelect | ParamKind::Select, None) => columns.to_vec(),
            (ParamKind::Text | ParamKind::Number, None) => Vec::new(),
        }
    }
}

/// Schema entry for one action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub key: &'static str,
    pub display_name: &'static str,
    pub parameters: &'static [(&'static str, ParameterDescriptor)],
}

impl ActionDescriptor {
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|(n, _)| *n == name).map(|(_, p)| p)
    }
}

static ACTIONS: &[ActionDescriptor] = &[
    ActionDescriptor {
        key: "select_columns",
        display_name: "Select Columns",
        parameters: &[(
            "column_names",
            ParameterDescriptor::new(ParamKind::MultiSelect, "Select Columns"),
        )],
    },
    ActionDescriptor {
        key: "normalising_df_wrt_parent_column",
        display_name: "Normalize Parent-Child",
        parameters: &[
            ("parent_column", ParameterDescriptor::new(ParamKind::Select, "Parent Column")),
            ("child_column", ParameterDescriptor::new(ParamKind::Select, "Child Column")),
        ],
    },
    ActionDescriptor {
        key: "delete_columns",
        display_name: "Delete Columns",
        parameters: &[(
            "column_names",
            ParameterDescriptor::new(ParamKind::MultiSelect, "Select Columns to Delete"),
        )],
    },
    ActionDescriptor {
        key: "filter_rows",
        display_name: "Filter Rows",
        parameters: &[
            ("column", ParameterDescriptor::new(ParamKind::Select, "Column")),
            (
                "operator",
                ParameterDescriptor::with_options(ParamKind::Select, "Operator", FILTER_OPERATORS),
            ),
            ("value", ParameterDescriptor::new(ParamKind::Text, "Value")),
        ],
    },
];

/// Look up an action by key
pub fn lookup(key: &str) -> Result<&'static ActionDescriptor, FormError> {
    ACTIONS
        .iter()
        .find(|action| action.key == key)
        .ok_or_else(|| FormError::UnknownAction { key: key.to_string() })
}

/// All actions as `(key, display name)`, in registry order
pub fn list_actions() -> Vec<(&'static str, &'static str)> {
    ACTIONS.iter().map(|action| (action.key, action.display_name)).collect()
}

/// Action assigned to newly created slots
pub fn default_action() -> &'static ActionDescriptor {
    &ACTIONS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_every_action_has_parameters() {
        for (key, _) in list_actions() {
            let action = lookup(key).unwrap();
            assert!(!action.parameters.is_empty(), "{} has no parameters", key);
        }
    }

    #[test]
    fn test_list_actions_order() {
        let keys: Vec<_> = list_actions().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "select_columns",
                "normalising_df_wrt_parent_column",
                "delete_columns",
                "filter_rows"
            ]
        );
        assert_eq!(default_action().key, "select_columns");
    }

    #[test]
    fn test_lookup_unknown() {
        let err = lookup("pivot").unwrap_err();
        assert_eq!(err, FormError::UnknownAction { key: "pivot".into() });
    }

    #[test]
    fn test_select_without_options_uses_columns() {
        let action = lookup("normalising_df_wrt_parent_column").unwrap();
        let parent = action.parameter("parent_column").unwrap();
        let cols = columns(&["sku", "parent", "child"]);
        assert_eq!(parent.effective_options(&cols), cols);
    }

    #[test]
    fn test_fixed_options_win() {
        let operator = lookup("filter_rows").unwrap().parameter("operator").unwrap();
        let options = operator.effective_options(&columns(&["age", "name"]));
        assert_eq!(options, columns(FILTER_OPERATORS));
    }

    #[test]
    fn test_text_has_no_options() {
        let value = lookup("filter_rows").unwrap().parameter("value").unwrap();
        assert_eq!(value.kind, ParamKind::Text);
        assert!(value.effective_options(&columns(&["age"])).is_empty());
    }

    #[test]
    fn test_parameter_order_matches_schema() {
        let names: Vec<_> = lookup("filter_rows").unwrap().parameters.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["column", "operator", "value"]);
    }
}
