//! Schema-driven form
//!
//! A [`FormSession`] holds what one user has entered. The [`assembler`] turns a
//! session into a [`PipelineConfig`](crate::document::PipelineConfig), asking an
//! [`InputSource`] for each parameter the schema lists. Two sources ship with
//! the crate: [`answers`] (a YAML file) and [`prompt`] (an interactive terminal).

pub mod answers;
pub mod assembler;
pub mod input;
pub mod prompt;
pub mod session;

pub use answers::{FileOverrides, FormAnswers, SlotAnswers};
pub use assembler::{Assembly, AssemblyWarning, assemble, collect_slot};
pub use input::{InputKey, InputRequest, InputSource, ValueStore};
pub use prompt::{Prompt, columns_from_header};
pub use session::{FormSession, Slot};
