//! Optional arguments of the facade operations.

use encoding::{encode, join_names, join_shapes, EncodingError};
use engine::GraphArrays;

/// Structural lists for graph import.
///
/// Each list is independently absent (`None`) or present, possibly empty.
/// `input_names` selects the form: when it is absent the engine gets the
/// three-argument form and the other lists are ignored; when present all
/// four lists are joined and forwarded together. The facade does not check
/// that names, types, and shapes have matching counts; the engine does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphImportOptions {
    /// Input node names.
    pub input_names: Option<Vec<String>>,
    /// Input data types, one per input name.
    pub input_data_types: Option<Vec<String>>,
    /// Input shape descriptors, one per input name.
    pub input_data_shapes: Option<Vec<String>>,
    /// Output node names.
    pub output_names: Option<Vec<String>>,
}

impl GraphImportOptions {
    /// True when no input names were given.
    pub fn is_short_form(&self) -> bool { self.input_names.is_none() }

    /// Joined lists for the seven-argument form, or `None` for the short form.
    ///
    /// Absent lists inside the long form join to the empty string.
    pub fn joined_arrays(&self) -> Result<Option<GraphArrays>, EncodingError> {
        if self.is_short_form() {
            return Ok(None);
        }
        Ok(Some(GraphArrays {
            input_names: encode("input_names", join_names(list(&self.input_names)).as_str())?,
            input_data_types: encode(
                "input_data_types",
                join_names(list(&self.input_data_types)).as_str(),
            )?,
            input_data_shapes: encode(
                "input_data_shapes",
                join_shapes(list(&self.input_data_shapes)).as_str(),
            )?,
            output_names: encode("output_names", join_names(list(&self.output_names)).as_str())?,
        }))
    }
}

fn list(items: &Option<Vec<String>>) -> &[String] { items.as_deref().unwrap_or_default() }

/// Flags for the full legacy saved-model conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedModelV1Options {
    /// Lift variables into function arguments.
    pub lift_variables: bool,
    /// Keep variables in the session initializer function.
    pub include_variables_in_initializers: bool,
    /// Upgrade legacy graph constructs (control flow v1, ref variables).
    pub upgrade_legacy: bool,
}

impl Default for SavedModelV1Options {
    fn default() -> Self {
        Self { lift_variables: true, include_variables_in_initializers: false, upgrade_legacy: true }
    }
}

/// Options for flat-buffer to bytecode conversion.
///
/// Unlike the other optional arguments, absent array lists are forwarded as
/// empty lists; the entry point takes native lists and has no "absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TosaOptions {
    /// Keep large constants outside the bytecode.
    pub use_external_constant: bool,
    /// Input array names, in order.
    pub ordered_input_arrays: Option<Vec<String>>,
    /// Output array names, in order.
    pub ordered_output_arrays: Option<Vec<String>>,
}

impl TosaOptions {
    /// Input arrays as forwarded: absent becomes empty.
    pub fn input_arrays(&self) -> &[String] { list(&self.ordered_input_arrays) }

    /// Output arrays as forwarded: absent becomes empty.
    pub fn output_arrays(&self) -> &[String] { list(&self.ordered_output_arrays) }
}
