//! Joining ordered name lists into a single textual argument.

use std::fmt;

/// Separator used when flattening a list into one argument.
///
/// Fixed by the engine's argument parser; neither character is legal inside
/// a tensor name or a shape descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListSeparator {
    /// `,` for node names and data types.
    Names,
    /// `:` for shape descriptors such as `1x2`.
    Shapes,
}

impl ListSeparator {
    /// The separator character as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListSeparator::Names => ",",
            ListSeparator::Shapes => ":",
        }
    }

    /// Join `items` with this separator.
    pub fn join<S: AsRef<str>>(&self, items: &[S]) -> String {
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(self.as_str());
            }
            out.push_str(item.as_ref());
        }
        out
    }
}

impl fmt::Display for ListSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Join a name list with `,`.
pub fn join_names<S: AsRef<str>>(items: &[S]) -> String { ListSeparator::Names.join(items) }

/// Join a shape-descriptor list with `:`.
pub fn join_shapes<S: AsRef<str>>(items: &[S]) -> String { ListSeparator::Shapes.join(items) }
