use genbridge::core::nav::Section;

pub const HELP: &str = "\
Commands:
  <text>, /chat <text>   send a message to the chat
  /reset                 start a fresh chat
  /translate <text>      translate text into slang
  /clear                 clear the translator
  /caption <path>        caption an image file
  /regen                 caption the current image again
  /edit                  edit the caption
  /draft <text>          replace the text being edited
  /save, /cancel         finish editing
  /go <section>          jump to a section
  /state                 print the state of every widget as JSON
  /help                  show this help
  /quit                  exit";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Reset,
    Translate(String),
    Clear,
    Caption(String),
    Regenerate,
    Edit,
    Draft(String),
    Save,
    Cancel,
    Go(Section),
    State,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Chat(line.to_owned()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "chat" => Command::Chat(arg.to_owned()),
        "reset" => Command::Reset,
        "translate" => Command::Translate(arg.to_owned()),
        "clear" => Command::Clear,
        "caption" if arg.is_empty() => {
            return Err("usage: /caption <path>".to_owned());
        }
        "caption" => Command::Caption(arg.to_owned()),
        "regen" => Command::Regenerate,
        "edit" => Command::Edit,
        "draft" => Command::Draft(arg.to_owned()),
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "go" => Command::Go(arg.parse().map_err(|err| format!("{err}"))?),
        "state" => Command::State,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(format!("unknown command: /{name}")),
    };
    Ok(command)
}
