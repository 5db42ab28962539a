//! Per-session form state

use tracing::{debug, info, warn};

use crate::columns::parse_column_text;
use crate::document::{FileConfig, ParamValue};
use crate::error::FormError;
use crate::form::assembler::{self, Assembly};
use crate::form::input::{InputKey, InputSource, ValueStore};
use crate::schema::{self, MAX_TRANSFORMATIONS, MIN_TRANSFORMATIONS};

/// One transformation slot in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    action: &'static str,
}

impl Slot {
    pub fn action(&self) -> &'static str {
        self.action
    }
}

/// Everything one user has entered into the form
///
/// Slots form an ordered sequence. Removing a slot compacts the sequence, so
/// presentation indices never have gaps.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    file: FileConfig,
    columns: Vec<String>,
    slots: Vec<Slot>,
    values: ValueStore,
}

impl FormSession {
    pub fn new(file: FileConfig) -> Self {
        Self {
            file,
            ..Default::default()
        }
    }

    pub fn file(&self) -> &FileConfig {
        &self.file
    }

    pub fn set_file(&mut self, file: FileConfig) {
        self.file = file;
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn set_columns(&mut self, columns: Vec<String>) {
        debug!(count = columns.len(), "set_columns");
        self.columns = columns;
    }

    /// Set columns from free text, one name per line
    pub fn set_columns_from_text(&mut self, text: &str) {
        self.set_columns(parse_column_text(text));
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    /// Append a slot for `action`
    ///
    /// Returns the new slot's index, or `None` when the form is already full.
    pub fn add_slot(&mut self, action: &str) -> Result<Option<usize>, FormError> {
        let descriptor = schema::lookup(action)?;
        if self.slots.len() >= MAX_TRANSFORMATIONS {
            warn!(max = MAX_TRANSFORMATIONS, "Transformation limit reached, slot not added");
            return Ok(None);
        }
        self.slots.push(Slot { action: descriptor.key });
        Ok(Some(self.slots.len() - 1))
    }

    /// Remove the slot at `index`, keeping the others in order
    pub fn remove_slot(&mut self, index: usize) -> Result<Slot, FormError> {
        self.check_index(index)?;
        let slot = self.slots.remove(index);
        self.values.remove_slot(index);
        info!(index, action = slot.action, "Removed transformation slot");
        Ok(slot)
    }

    /// Change a slot's action; values entered for the previous action are dropped
    pub fn set_action(&mut self, index: usize, action: &str) -> Result<(), FormError> {
        let descriptor = schema::lookup(action)?;
        self.check_index(index)?;
        if self.slots[index].action != descriptor.key {
            self.values.clear_slot(index);
            self.slots[index].action = descriptor.key;
        }
        Ok(())
    }

    /// Grow or shrink the form to `count` slots, clamped to the allowed range
    ///
    /// New slots use the registry's first action. Returns the resulting count.
    pub fn set_transformation_count(&mut self, count: usize) -> usize {
        let count = count.clamp(MIN_TRANSFORMATIONS, MAX_TRANSFORMATIONS);
        while self.slots.len() > count {
            let index = self.slots.len() - 1;
            self.slots.pop();
            self.values.clear_slot(index);
        }
        while self.slots.len() < count {
            self.slots.push(Slot {
                action: schema::default_action().key,
            });
        }
        count
    }

    /// Record a value for one parameter of a slot
    pub fn set_value(&mut self, index: usize, parameter: &str, value: impl Into<ParamValue>) -> Result<(), FormError> {
        self.check_index(index)?;
        let action = self.slots[index].action;
        let descriptor = schema::lookup(action)?;
        if descriptor.parameter(parameter).is_none() {
            return Err(FormError::UnknownParameter {
                action: action.to_string(),
                parameter: parameter.to_string(),
            });
        }
        self.values.set(InputKey::new(action, parameter, index), value);
        Ok(())
    }

    /// Headings shown above each slot
    pub fn slot_labels(&self) -> Vec<String> {
        (1..=self.slots.len()).map(|n| format!("Transformation {}", n)).collect()
    }

    /// Assemble the document from the values stored in this session
    pub fn assemble(&mut self) -> Result<Assembly, FormError> {
        let actions: Vec<&str> = self.slots.iter().map(Slot::action).collect();
        assembler::assemble(&self.file, &self.columns, &actions, &mut self.values)
    }

    /// Assemble the document, asking `input` for every parameter value
    pub fn assemble_with(&self, input: &mut dyn InputSource) -> Result<Assembly, FormError> {
        let actions: Vec<&str> = self.slots.iter().map(Slot::action).collect();
        assembler::assemble(&self.file, &self.columns, &actions, input)
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        if index >= self.slots.len() {
            return Err(FormError::SlotOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        Ok(())
    }
}
