//! Form assembler
//!
//! Walks the slots of a form, asks the input source for each parameter the
//! schema lists, and wraps the cleaned results into a [`PipelineConfig`].

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::document::{FileConfig, ParamValue, PipelineConfig, TransformationInstance};
use crate::error::FormError;
use crate::form::input::{InputKey, InputRequest, InputSource};
use crate::schema;

/// Non-fatal conditions noticed while assembling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyWarning {
    /// No columns were supplied, so no transformation could be configured
    IncompleteConfiguration,
    /// A slot had no usable parameter values and was left out of the document
    EmptySlotDropped { slot: usize, action: String },
}

impl std::fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteConfiguration => {
                write!(f, "No column names supplied; enter column names to configure transformations")
            }
            Self::EmptySlotDropped { slot, action } => write!(
                f,
                "Transformation {} ({}) has no parameters set and was left out",
                slot + 1,
                action
            ),
        }
    }
}

/// Result of assembling a form
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub document: PipelineConfig,
    pub warnings: Vec<AssemblyWarning>,
}

impl Assembly {
    pub fn is_complete(&self) -> bool {
        !self.warnings.contains(&AssemblyWarning::IncompleteConfiguration)
    }
}

/// Collect the parameters of one slot
///
/// Unset values, empty selections and blank text are left out of the
/// returned mapping.
pub fn collect_slot(
    slot: usize,
    action: &str,
    columns: &[String],
    input: &mut dyn InputSource,
) -> Result<TransformationInstance, FormError> {
    let descriptor = schema::lookup(action)?;
    let mut parameters = IndexMap::new();

    for (name, param) in descriptor.parameters {
        let options = param.effective_options(columns);
        let request = InputRequest {
            key: InputKey::new(descriptor.key, *name, slot),
            kind: param.kind,
            label: param.label,
            options: &options,
        };
        if let Some(value) = input.request(&request).and_then(clean) {
            parameters.insert(name.to_string(), value);
        }
    }

    debug!(slot, action, parameters = parameters.len(), "Collected slot");
    Ok(TransformationInstance {
        action: descriptor.key.to_string(),
        parameters,
    })
}

/// Assemble the full document
///
/// `actions` holds the chosen action for each slot, in order. With no
/// columns nothing is requested and the document carries no transformations.
pub fn assemble(
    file: &FileConfig,
    columns: &[String],
    actions: &[&str],
    input: &mut dyn InputSource,
) -> Result<Assembly, FormError> {
    let mut warnings = Vec::new();
    let mut transformations = Vec::new();

    if columns.is_empty() {
        warn!("No columns supplied, skipping transformations");
        warnings.push(AssemblyWarning::IncompleteConfiguration);
    } else {
        for (slot, action) in actions.iter().enumerate() {
            let instance = collect_slot(slot, action, columns, input)?;
            if instance.parameters.is_empty() {
                // A slot with nothing set is left out of the document
                warn!(slot, action = %instance.action, "Dropping transformation with no parameters");
                warnings.push(AssemblyWarning::EmptySlotDropped {
                    slot,
                    action: instance.action,
                });
                continue;
            }
            transformations.push(instance);
        }
    }

    info!(
        slots = actions.len(),
        emitted = transformations.len(),
        "Assembled pipeline configuration"
    );
    Ok(Assembly {
        document: PipelineConfig::new(file.clone(), transformations),
        warnings,
    })
}

fn clean(value: ParamValue) -> Option<ParamValue> {
    if value.is_empty() { None } else { Some(value) }
}
