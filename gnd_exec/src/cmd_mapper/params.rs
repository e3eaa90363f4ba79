//! Parameters structure for the command input mapper

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the command input mapper.
///
/// One key per drive surface. The defaults are the usual wasd layout with
/// the space bar acting as the stop button.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// Key bound to the forward drive surface
    pub forward_key: char,

    /// Key bound to the backward drive surface
    pub backward_key: char,

    /// Key bound to the left drive surface
    pub left_key: char,

    /// Key bound to the right drive surface
    pub right_key: char,

    /// Key acting as the stop button
    pub stop_key: char,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            forward_key: 'w',
            backward_key: 's',
            left_key: 'a',
            right_key: 'd',
            stop_key: ' ',
        }
    }
}
