use serde::{Deserialize, Serialize};

/// Language code of the auto-detect sentinel
pub const AUTO_DETECT_CODE: &str = "auto";

/// A language selection, or the auto-detect sentinel when `code == "auto"`.
///
/// Two refs are equal when their codes are equal; names and regions are
/// display data only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRef {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl LanguageRef {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            region: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn is_auto(&self) -> bool {
        self.code == AUTO_DETECT_CODE
    }
}

impl PartialEq for LanguageRef {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for LanguageRef {}

/// Snapshot taken when the debounce window settles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source: LanguageRef,
    pub target: LanguageRef,
}

/// A committed translation pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub source_text: String,
    pub translated_text: String,
    pub source_lang: LanguageRef,
    pub target_lang: LanguageRef,
    /// Unix epoch milliseconds
    #[serde(alias = "timestamp")]
    pub created_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranslationPhase {
    #[default]
    Idle,
    Pending,
    InFlight,
    Settled,
    Failed,
}

impl TranslationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationPhase::Idle => "idle",
            TranslationPhase::Pending => "pending",
            TranslationPhase::InFlight => "translating",
            TranslationPhase::Settled => "settled",
            TranslationPhase::Failed => "failed",
        }
    }
}

/// What the presentation layer needs to draw the translator
#[derive(Debug, Clone)]
pub struct TranslationView {
    pub source_lang: LanguageRef,
    pub target_lang: LanguageRef,
    pub source_text: String,
    pub translated_text: String,
    pub phase: TranslationPhase,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub font_family: String,
    pub text_color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageDirection {
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechTarget {
    Input,
    Output,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// New full contents of the input field
    TextInput(String),
    SelectLanguage {
        direction: LanguageDirection,
        code: String,
    },
    SwapLanguages,
    /// Input lost focus
    Commit,
    ShowHistory,
    RestoreHistory(usize),
    DeleteHistory(usize),
    ClearHistory,
    Speak(SpeechTarget),
    ToggleTheme,
    SetFont(String),
    SetTextColor(String),
    ListLanguages {
        query: String,
    },
    Help,
    Quit,

    Render(TranslationView),
    ShowHistoryList(Vec<HistoryEntry>),
    ShowLanguages(Vec<(String, Vec<LanguageRef>)>),
    Appearance {
        theme: Theme,
        customization: Customization,
    },
    Status(String),
    /// Translation service name and model, e.g. "Gemini (gemini-2.5-flash)"
    BackendReady {
        provider: String,
    },
}
