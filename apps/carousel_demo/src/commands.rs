//! Line-based commands typed into the demo host.

use shared::{
    error::{ControllerError, ErrorCode},
    protocol::{Activation, Control, Key, UiAction},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCommand {
    Action(UiAction),
    Width(u32),
    Status,
    Help,
    Quit,
}

impl DemoCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DemoCommand::Action(UiAction::Activate { .. }) => "activate",
            DemoCommand::Action(UiAction::RegionKey { .. }) => "region_key",
            DemoCommand::Width(_) => "width",
            DemoCommand::Status => "status",
            DemoCommand::Help => "help",
            DemoCommand::Quit => "quit",
        }
    }
}

pub const HELP: &str = "\
commands:
  next | n                 pointer press on the next button
  prev | p                 pointer press on the previous button
  goto <i> | dot <i>       select indicator <i>
  toggle | t               play/pause button
  key <key> [target]       key press; target is next, prev, toggle or dot <i>,
                           without a target the carousel region receives it
                           keys: enter space left right home end
  width <px>               report a new viewport width
  status                   print the current state
  quit | q                 exit";

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<DemoCommand>, ControllerError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let command = match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
        ("next" | "n", []) => pointer(Control::Next),
        ("prev" | "p", []) => pointer(Control::Previous),
        ("goto" | "dot", [index]) => pointer(Control::Indicator {
            index: parse_number(index, "indicator index")?,
        }),
        ("toggle" | "t", []) => pointer(Control::PlayPause),
        ("key", [key]) => DemoCommand::Action(UiAction::RegionKey {
            key: parse_key(key),
        }),
        ("key", [key, target @ ..]) => DemoCommand::Action(UiAction::Activate {
            control: parse_control(target)?,
            activation: Activation::Key { key: parse_key(key) },
        }),
        ("width", [px]) => DemoCommand::Width(parse_number(px, "viewport width")?),
        ("status" | "s", []) => DemoCommand::Status,
        ("help" | "h" | "?", []) => DemoCommand::Help,
        ("quit" | "q" | "exit", []) => DemoCommand::Quit,
        _ => {
            return Err(ControllerError::new(
                ErrorCode::UnknownCommand,
                format!("unrecognized command '{}'; type 'help'", line.trim()),
            ))
        }
    };
    Ok(Some(command))
}

fn pointer(control: Control) -> DemoCommand {
    DemoCommand::Action(UiAction::Activate {
        control,
        activation: Activation::Pointer,
    })
}

fn parse_control(words: &[&str]) -> Result<Control, ControllerError> {
    match words {
        ["next"] => Ok(Control::Next),
        ["prev"] => Ok(Control::Previous),
        ["toggle"] => Ok(Control::PlayPause),
        ["dot", index] => Ok(Control::Indicator {
            index: parse_number(index, "indicator index")?,
        }),
        _ => Err(ControllerError::new(
            ErrorCode::Validation,
            format!("unknown key target '{}'", words.join(" ")),
        )),
    }
}

/// Unknown key names map to [`Key::Other`] so the controller can ignore them.
fn parse_key(raw: &str) -> Key {
    match raw.to_ascii_lowercase().as_str() {
        "enter" | "return" => Key::Enter,
        "space" => Key::Space,
        "left" | "arrowleft" => Key::ArrowLeft,
        "right" | "arrowright" => Key::ArrowRight,
        "home" => Key::Home,
        "end" => Key::End,
        _ => Key::Other,
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T, ControllerError> {
    raw.parse()
        .map_err(|_| ControllerError::new(ErrorCode::Validation, format!("invalid {what} '{raw}'")))
}
