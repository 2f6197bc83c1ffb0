use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// User input and timer signals handled by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    /// Leave the viewer/slideshow and return to the start screen.
    End,
    Play,
    Pause,
    /// Enter: start the viewer from the start screen, next image inside it.
    Confirm,
    StartViewer,
    StartSlideshow,
    /// A directory chosen in the picker; `None` when the picker was cancelled.
    SelectDirectory(Option<PathBuf>),
    Tick(Tick),
    Quit,
}

/// One autoplay beat, tagged with the play session that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub session: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command '{}'", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let cmd = match word.to_ascii_lowercase().as_str() {
            "" => Self::Confirm,
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" | "b" | "back" => Self::Previous,
            "e" | "end" | "stop" => Self::End,
            "v" | "viewer" => Self::StartViewer,
            "s" | "slideshow" => Self::StartSlideshow,
            "play" => Self::Play,
            "pause" => Self::Pause,
            "dir" | "open" => {
                Self::SelectDirectory((!rest.is_empty()).then(|| PathBuf::from(rest)))
            }
            "q" | "quit" | "exit" => Self::Quit,
            _ => return Err(UnknownCommand(line.to_string())),
        };
        Ok(cmd)
    }
}

/// Help text for the line-based host.
pub const COMMAND_HELP: &str = "commands: [enter] | n(ext) | p(rev) | e(nd) | v(iewer) | s(lideshow) | play | pause | dir <path> | q(uit)";
