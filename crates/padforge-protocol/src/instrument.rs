use serde::{Deserialize, Serialize};

/// {bottom-left pitch, rows, cols, layout-mode}. Determines the algorithmic
/// pitch -> pad function: pads tile the grid in banks of 16 (4x4 quadrants)
/// per standard drum-bank conventions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub bottom_left_pitch: u8,
    #[serde(default = "default_dim")]
    pub rows: u8,
    #[serde(default = "default_dim")]
    pub cols: u8,
    #[serde(default = "default_layout_mode")]
    pub layout_mode: String,
}

fn default_dim() -> u8 {
    8
}

fn default_layout_mode() -> String {
    "standard".to_string()
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self {
            bottom_left_pitch: 36,
            rows: 8,
            cols: 8,
            layout_mode: default_layout_mode(),
        }
    }
}
