//! Parameter defaults
//!
//! Commands may omit parameters or send zero where the terminal applies a
//! default. Normalizing a completed command fills in those defaults so the
//! consumer can read the parameters directly.

use super::state::CommandData;
use super::table::TerminalCommand;

/// Apply the default and minimum parameter values for a completed command
///
/// Normalizing twice has no further effect. Commands whose parameter lists
/// are open-ended (margins, modes, graphic rendition) are left alone.
pub fn normalize_parameters(data: &mut CommandData) {
    let Some(command) = data.command else {
        return;
    };

    match command {
        // One count, where 0 means 1
        TerminalCommand::CursorUp
        | TerminalCommand::CursorDown
        | TerminalCommand::CursorLeft
        | TerminalCommand::CursorRight
        | TerminalCommand::ScrollUp
        | TerminalCommand::ScrollDown
        | TerminalCommand::SetCursorRowAbsolute
        | TerminalCommand::SetCursorColumnAbsolute => {
            if data.parameter_count == 0 || data.parameters[0] == 0 {
                data.parameters[0] = 1;
            }

            data.parameter_count = 1;
        }

        // Row and column, each 1-based
        TerminalCommand::CursorMove => {
            for index in 0..2 {
                if index >= data.parameter_count || data.parameters[index] == 0 {
                    data.parameters[index] = 1;
                }
            }

            data.parameter_count = 2;
        }

        TerminalCommand::NextLine
        | TerminalCommand::ReverseLineFeed
        | TerminalCommand::SaveCursorAndAttributes
        | TerminalCommand::RestoreCursorAndAttributes
        | TerminalCommand::SetHorizontalTab
        | TerminalCommand::KeypadNumeric
        | TerminalCommand::KeypadApplication
        | TerminalCommand::Reset
        | TerminalCommand::SoftReset
        | TerminalCommand::DeviceAttributesPrimary
        | TerminalCommand::DeviceAttributesSecondary
        | TerminalCommand::DoubleLineHeightTopHalf
        | TerminalCommand::DoubleLineHeightBottomHalf
        | TerminalCommand::SingleWidthLine
        | TerminalCommand::DoubleWidthLine => {
            data.parameter_count = 0;
        }

        // A selector that defaults to 0
        TerminalCommand::ClearHorizontalTab
        | TerminalCommand::EraseInDisplay
        | TerminalCommand::EraseInLine => {
            if data.parameter_count == 0 {
                data.parameters[0] = 0;
            }

            data.parameter_count = 1;
        }

        // A count that defaults to 1; an explicit 0 is kept
        TerminalCommand::InsertLines
        | TerminalCommand::DeleteLines
        | TerminalCommand::InsertCharacters
        | TerminalCommand::DeleteCharacters
        | TerminalCommand::EraseCharacters => {
            if data.parameter_count == 0 {
                data.parameters[0] = 1;
            }

            data.parameter_count = 1;
        }

        TerminalCommand::SetTopAndBottomMargin
        | TerminalCommand::SetMode
        | TerminalCommand::ClearMode
        | TerminalCommand::SetPrivateMode
        | TerminalCommand::ClearPrivateMode
        | TerminalCommand::EraseInDisplaySelective
        | TerminalCommand::EraseInLineSelective
        | TerminalCommand::SelectG0CharacterSet
        | TerminalCommand::SelectG1CharacterSet
        | TerminalCommand::SelectG2CharacterSet
        | TerminalCommand::SelectG3CharacterSet
        | TerminalCommand::SelectGraphicRendition => {}
    }
}
