//! Line commands for the terminal client.
//!
//! ```text
//! video NAME       open a video
//! folder N         folder slider to folder N (1-based), then release
//! frame N          frame slider to offset N, then release
//! next [N]         step the frame forward (default 1)
//! prev [N]         step the frame backward (default 1)
//! fnext [N]        step the folder forward (default 1)
//! fprev [N]        step the folder backward (default 1)
//! scrub fwd|back   start continuous scrubbing
//! stop             stop scrubbing
//! task N           select task N (1-based)
//! label NAME       annotate the current frame with NAME
//! quit
//! ```

use framemark_core::input::InputEvent;
use framemark_core::prefetch::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Events(Vec<InputEvent>),
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("'{command}' expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

/// Parse one input line. Blank lines yield no events.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let events = match word {
        "" => Vec::new(),
        "quit" | "exit" => return Ok(Command::Quit),
        "video" => vec![InputEvent::SelectVideo(required("video", "a video name", rest)?)],
        "label" => vec![InputEvent::SelectName(required("label", "a name", rest)?)],
        "folder" => {
            let n: usize = number("folder", "a folder number", rest)?;
            vec![
                InputEvent::FolderSliderInput(n.saturating_sub(1)),
                InputEvent::SliderCommit,
            ]
        }
        "frame" => vec![
            InputEvent::FrameSliderInput(number("frame", "a frame offset", rest)?),
            InputEvent::SliderCommit,
        ],
        "next" => vec![InputEvent::FrameStep(step("next", rest)?)],
        "prev" => vec![InputEvent::FrameStep(-step("prev", rest)?)],
        "fnext" => vec![InputEvent::FolderStep(step("fnext", rest)?)],
        "fprev" => vec![InputEvent::FolderStep(-step("fprev", rest)?)],
        "scrub" => {
            let direction = match rest {
                "fwd" | "forward" => Direction::Forward,
                "back" | "backward" => Direction::Backward,
                _ => {
                    return Err(CommandError::BadArgument {
                        command: "scrub",
                        expected: "'fwd' or 'back'",
                    })
                }
            };
            vec![InputEvent::ScrubStart(direction)]
        }
        "stop" => vec![InputEvent::ScrubStop],
        "task" => {
            let n: usize = number("task", "a task number", rest)?;
            if n == 0 {
                return Err(CommandError::BadArgument {
                    command: "task",
                    expected: "a task number starting at 1",
                });
            }
            vec![InputEvent::SelectTask(n - 1)]
        }
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Command::Events(events))
}

fn required(command: &'static str, expected: &'static str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::BadArgument { command, expected });
    }
    Ok(rest.to_string())
}

fn number<T: std::str::FromStr>(
    command: &'static str,
    expected: &'static str,
    rest: &str,
) -> Result<T, CommandError> {
    rest.parse()
        .map_err(|_| CommandError::BadArgument { command, expected })
}

fn step(command: &'static str, rest: &str) -> Result<i64, CommandError> {
    if rest.is_empty() {
        return Ok(1);
    }
    let n: i64 = number(command, "a positive step size", rest)?;
    if n <= 0 {
        return Err(CommandError::BadArgument {
            command,
            expected: "a positive step size",
        });
    }
    Ok(n)
}
