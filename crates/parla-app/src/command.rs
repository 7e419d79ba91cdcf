use parla_types::{AppEvent, LanguageDirection, SpeechTarget};

pub const HELP: &str = "\
Type any text to translate it. Lines starting with ':' are commands:
  :clear              empty the input
  :source <code>      set the source language (auto for detection)
  :target <code>      set the target language
  :swap               swap languages and texts
  :commit             save the current pair to history
  :history            list saved translations
  :restore <n>        load history entry n
  :delete <n>         delete history entry n
  :wipe               delete all history
  :speak [in|out]     synthesize speech for the input or output
  :theme              toggle dark/light
  :font <id>          inter, playfair or fira
  :color <id>         default, blue, emerald, violet or rose
  :languages [query]  list or search languages
  :help               show this help
  :quit               exit
Start a line with '\\:' to translate text that begins with ':'.";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command :{0} (try :help)")]
    Unknown(String),

    #[error("Missing {0}")]
    MissingArgument(&'static str),

    #[error("Not a history number: {0}")]
    InvalidIndex(String),
}

/// Turn one line of terminal input into an event
pub fn parse_line(line: &str) -> Result<AppEvent, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(escaped) = line.strip_prefix('\\')
        && escaped.starts_with(':')
    {
        return Ok(AppEvent::TextInput(escaped.to_string()));
    }

    let Some(command) = line.strip_prefix(':') else {
        return Ok(AppEvent::TextInput(line.to_string()));
    };

    let mut parts = command.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let event = match name.as_str() {
        "clear" => AppEvent::TextInput(String::new()),
        "source" => AppEvent::SelectLanguage {
            direction: LanguageDirection::Source,
            code: arg.ok_or(CommandError::MissingArgument("language code"))?.to_string(),
        },
        "target" => AppEvent::SelectLanguage {
            direction: LanguageDirection::Target,
            code: arg.ok_or(CommandError::MissingArgument("language code"))?.to_string(),
        },
        "swap" => AppEvent::SwapLanguages,
        "commit" => AppEvent::Commit,
        "history" => AppEvent::ShowHistory,
        "restore" => AppEvent::RestoreHistory(parse_index(arg)?),
        "delete" => AppEvent::DeleteHistory(parse_index(arg)?),
        "wipe" => AppEvent::ClearHistory,
        "speak" => match arg {
            None | Some("out") | Some("output") => AppEvent::Speak(SpeechTarget::Output),
            Some("in") | Some("input") => AppEvent::Speak(SpeechTarget::Input),
            Some(other) => return Err(CommandError::Unknown(format!("speak {other}"))),
        },
        "theme" => AppEvent::ToggleTheme,
        "font" => AppEvent::SetFont(
            arg.ok_or(CommandError::MissingArgument("font id"))?.to_string(),
        ),
        "color" => AppEvent::SetTextColor(
            arg.ok_or(CommandError::MissingArgument("color id"))?.to_string(),
        ),
        "languages" | "langs" => AppEvent::ListLanguages {
            query: arg.unwrap_or_default().to_string(),
        },
        "help" | "?" => AppEvent::Help,
        "quit" | "exit" | "q" => AppEvent::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(event)
}

/// History numbers are shown 1-based
fn parse_index(arg: Option<&str>) -> Result<usize, CommandError> {
    let raw = arg.ok_or(CommandError::MissingArgument("history number"))?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidIndex(raw.to_string())),
    }
}
