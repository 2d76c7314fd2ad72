//! CAN frame data model
//!
//! One timestamped unit of bus traffic. Frames are immutable after parse;
//! ownership moves frame -> window -> sliding buffer, where they are
//! discarded once aggregated.

use serde::{Deserialize, Serialize};

const COLOR_RED: &str = "\u{1b}[31m";
const COLOR_GREEN: &str = "\u{1b}[32m";
const COLOR_RESET: &str = "\u{1b}[0m";

/// Ground-truth label attached to each captured frame.
///
/// Capture files flag normal traffic with `R`; anything else is attack
/// traffic. On the wire (display stream, result stream) Normal is `1`
/// and Attack is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Normal,
    Attack,
}

impl Label {
    /// Parse a capture-file flag (`R` = normal, anything else = attack).
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim() == "R" {
            Label::Normal
        } else {
            Label::Attack
        }
    }

    /// Binary wire representation: Normal = 1, Attack = 0.
    pub fn as_bit(&self) -> u8 {
        match self {
            Label::Normal => 1,
            Label::Attack => 0,
        }
    }

    /// Capture-file flag character.
    pub fn as_flag(&self) -> char {
        match self {
            Label::Normal => 'R',
            Label::Attack => 'T',
        }
    }
}

/// A single captured CAN bus frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanFrame {
    /// Capture timestamp in seconds.
    pub timestamp: f64,
    /// Arbitration ID as captured (hex string).
    pub can_id: String,
    /// Data length code.
    pub dlc: u8,
    /// Payload bytes concatenated as one hex string.
    pub payload: String,
    pub label: Label,
}

impl CanFrame {
    /// Human-readable replay line with ANSI color derived from the label:
    /// green for normal traffic, red for attack traffic.
    pub fn display_line(&self) -> String {
        let color = match self.label {
            Label::Normal => COLOR_GREEN,
            Label::Attack => COLOR_RED,
        };
        format!(
            "{}{} ID:{} DLC:{} {},{}{}\n",
            color, self.timestamp, self.can_id, self.dlc, self.payload, self.label.as_flag(), COLOR_RESET
        )
    }
}
