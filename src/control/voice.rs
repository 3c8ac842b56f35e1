//! Voice Command Mapping
//!
//! Maps finalized speech transcripts to control commands. Matching is by
//! substring, bilingual, and strictly ordered: lifecycle words outrank
//! direction words, and the first matching rule wins. The ordering matters
//! because some command words contain others ("暂停" contains "停").

use serde::{Deserialize, Serialize};

use crate::game::state::Direction;

/// A command recognized from a transcript.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceCommand {
    /// Start (or restart) the game
    Start,
    /// Suspend gameplay
    Pause,
    /// Resume suspended gameplay
    Resume,
    /// Stop the agent in place
    Halt,
    /// Set travel direction and move
    Move(Direction),
}

/// Recognition rules in priority order.
static RULES: &[(&[&str], VoiceCommand)] = &[
    (&["start", "开始"], VoiceCommand::Start),
    (&["pause", "暂停"], VoiceCommand::Pause),
    (&["resume", "继续"], VoiceCommand::Resume),
    (&["stop", "停"], VoiceCommand::Halt),
    (&["up", "上"], VoiceCommand::Move(Direction::Up)),
    (&["down", "下"], VoiceCommand::Move(Direction::Down)),
    (&["left", "左"], VoiceCommand::Move(Direction::Left)),
    (&["right", "右"], VoiceCommand::Move(Direction::Right)),
];

/// Parse a finalized transcript into a command.
///
/// Transcripts arrive lower-cased from the recognizer; normalization here
/// keeps the mapping robust anyway. Returns `None` when nothing matches.
pub fn parse_transcript(transcript: &str) -> Option<VoiceCommand> {
    let text = transcript.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    for (words, command) in RULES {
        if words.iter().any(|word| text.contains(word)) {
            return Some(*command);
        }
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_commands() {
        assert_eq!(parse_transcript("start"), Some(VoiceCommand::Start));
        assert_eq!(parse_transcript("开始游戏"), Some(VoiceCommand::Start));
        assert_eq!(parse_transcript("please pause"), Some(VoiceCommand::Pause));
        assert_eq!(parse_transcript("继续"), Some(VoiceCommand::Resume));
        assert_eq!(parse_transcript("stop"), Some(VoiceCommand::Halt));
        assert_eq!(parse_transcript("停"), Some(VoiceCommand::Halt));
    }

    #[test]
    fn test_direction_commands() {
        assert_eq!(parse_transcript("up"), Some(VoiceCommand::Move(Direction::Up)));
        assert_eq!(parse_transcript("向下"), Some(VoiceCommand::Move(Direction::Down)));
        assert_eq!(parse_transcript("左"), Some(VoiceCommand::Move(Direction::Left)));
        assert_eq!(
            parse_transcript("turn right"),
            Some(VoiceCommand::Move(Direction::Right))
        );
    }

    #[test]
    fn test_pause_outranks_halt_substring() {
        // "暂停" contains "停"; the pause rule is evaluated first
        assert_eq!(parse_transcript("暂停"), Some(VoiceCommand::Pause));
    }

    #[test]
    fn test_lifecycle_outranks_direction() {
        assert_eq!(parse_transcript("start up"), Some(VoiceCommand::Start));
        assert_eq!(parse_transcript("stop going left"), Some(VoiceCommand::Halt));
    }

    #[test]
    fn test_case_and_whitespace_normalized() {
        assert_eq!(parse_transcript("  PAUSE  "), Some(VoiceCommand::Pause));
    }

    #[test]
    fn test_unrecognized_transcript() {
        assert_eq!(parse_transcript("hello there"), None);
        assert_eq!(parse_transcript(""), None);
        assert_eq!(parse_transcript("   "), None);
    }
}
