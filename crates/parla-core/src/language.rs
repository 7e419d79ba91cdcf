use parla_types::{AUTO_DETECT_CODE, LanguageDirection, LanguageRef};

/// Code of the default target language
pub const DEFAULT_TARGET_CODE: &str = "es";

/// Code swapped into the target slot when the source was auto-detect
pub const SWAP_FALLBACK_CODE: &str = "en";

pub const POPULAR_LANGUAGE_CODES: [&str; 11] = [
    "en", "es", "zh-CN", "fr", "de", "hi", "ar", "pt", "ru", "ja", "ko",
];

pub const REGIONS: [&str; 5] = ["Europe", "Asia", "Africa", "Americas", "Oceania"];

/// (code, name, region)
const CATALOG: &[(&str, &str, &str)] = &[
    ("af", "Afrikaans", "Africa"),
    ("am", "Amharic", "Africa"),
    ("ny", "Chichewa", "Africa"),
    ("ha", "Hausa", "Africa"),
    ("ig", "Igbo", "Africa"),
    ("mg", "Malagasy", "Africa"),
    ("st", "Sesotho", "Africa"),
    ("sn", "Shona", "Africa"),
    ("so", "Somali", "Africa"),
    ("sw", "Swahili", "Africa"),
    ("xh", "Xhosa", "Africa"),
    ("yo", "Yoruba", "Africa"),
    ("zu", "Zulu", "Africa"),
    ("ht", "Haitian Creole", "Americas"),
    ("haw", "Hawaiian", "Americas"),
    ("ar", "Arabic", "Asia"),
    ("hy", "Armenian", "Asia"),
    ("az", "Azerbaijani", "Asia"),
    ("bn", "Bengali", "Asia"),
    ("ceb", "Cebuano", "Asia"),
    ("zh-CN", "Chinese (Simplified)", "Asia"),
    ("zh-TW", "Chinese (Traditional)", "Asia"),
    ("tl", "Filipino", "Asia"),
    ("ka", "Georgian", "Asia"),
    ("gu", "Gujarati", "Asia"),
    ("iw", "Hebrew", "Asia"),
    ("hi", "Hindi", "Asia"),
    ("hmn", "Hmong", "Asia"),
    ("id", "Indonesian", "Asia"),
    ("ja", "Japanese", "Asia"),
    ("jw", "Javanese", "Asia"),
    ("kn", "Kannada", "Asia"),
    ("kk", "Kazakh", "Asia"),
    ("km", "Khmer", "Asia"),
    ("ko", "Korean", "Asia"),
    ("ku", "Kurdish (Kurmanji)", "Asia"),
    ("ky", "Kyrgyz", "Asia"),
    ("lo", "Lao", "Asia"),
    ("ms", "Malay", "Asia"),
    ("ml", "Malayalam", "Asia"),
    ("mr", "Marathi", "Asia"),
    ("mn", "Mongolian", "Asia"),
    ("my", "Myanmar (Burmese)", "Asia"),
    ("ne", "Nepali", "Asia"),
    ("ps", "Pashto", "Asia"),
    ("fa", "Persian", "Asia"),
    ("pa", "Punjabi", "Asia"),
    ("sd", "Sindhi", "Asia"),
    ("si", "Sinhala", "Asia"),
    ("su", "Sundanese", "Asia"),
    ("tg", "Tajik", "Asia"),
    ("ta", "Tamil", "Asia"),
    ("te", "Telugu", "Asia"),
    ("th", "Thai", "Asia"),
    ("tr", "Turkish", "Asia"),
    ("ur", "Urdu", "Asia"),
    ("uz", "Uzbek", "Asia"),
    ("vi", "Vietnamese", "Asia"),
    ("sq", "Albanian", "Europe"),
    ("eu", "Basque", "Europe"),
    ("be", "Belarusian", "Europe"),
    ("bs", "Bosnian", "Europe"),
    ("bg", "Bulgarian", "Europe"),
    ("ca", "Catalan", "Europe"),
    ("co", "Corsican", "Europe"),
    ("hr", "Croatian", "Europe"),
    ("cs", "Czech", "Europe"),
    ("da", "Danish", "Europe"),
    ("nl", "Dutch", "Europe"),
    ("en", "English", "Europe"),
    ("eo", "Esperanto", "Europe"),
    ("et", "Estonian", "Europe"),
    ("fi", "Finnish", "Europe"),
    ("fr", "French", "Europe"),
    ("fy", "Frisian", "Europe"),
    ("gl", "Galician", "Europe"),
    ("de", "German", "Europe"),
    ("el", "Greek", "Europe"),
    ("hu", "Hungarian", "Europe"),
    ("is", "Icelandic", "Europe"),
    ("ga", "Irish", "Europe"),
    ("it", "Italian", "Europe"),
    ("la", "Latin", "Europe"),
    ("lv", "Latvian", "Europe"),
    ("lt", "Lithuanian", "Europe"),
    ("lb", "Luxembourgish", "Europe"),
    ("mk", "Macedonian", "Europe"),
    ("mt", "Maltese", "Europe"),
    ("no", "Norwegian", "Europe"),
    ("pl", "Polish", "Europe"),
    ("pt", "Portuguese", "Europe"),
    ("ro", "Romanian", "Europe"),
    ("ru", "Russian", "Europe"),
    ("gd", "Scots Gaelic", "Europe"),
    ("sr", "Serbian", "Europe"),
    ("sk", "Slovak", "Europe"),
    ("sl", "Slovenian", "Europe"),
    ("es", "Spanish", "Europe"),
    ("sv", "Swedish", "Europe"),
    ("uk", "Ukrainian", "Europe"),
    ("cy", "Welsh", "Europe"),
    ("yi", "Yiddish", "Europe"),
    ("mi", "Maori", "Oceania"),
    ("sm", "Samoan", "Oceania"),
];

/// The auto-detect sentinel, only valid as a source
pub fn auto_detect() -> LanguageRef {
    LanguageRef::new(AUTO_DETECT_CODE, "Detect Language").with_region("Auto")
}

/// Every selectable language, catalog order
pub fn languages() -> impl Iterator<Item = LanguageRef> {
    CATALOG
        .iter()
        .map(|(code, name, region)| LanguageRef::new(*code, *name).with_region(*region))
}

/// Case-insensitive code lookup; returns the catalog spelling
pub fn find(code: &str) -> Option<LanguageRef> {
    languages().find(|lang| lang.code.eq_ignore_ascii_case(code))
}

/// Resolve a stored source selection; auto-detect is allowed here
pub fn find_source(code: &str) -> Option<LanguageRef> {
    if code.eq_ignore_ascii_case(AUTO_DETECT_CODE) {
        return Some(auto_detect());
    }
    find(code)
}

/// Resolve a stored target selection; auto-detect is never a target
pub fn find_target(code: &str) -> Option<LanguageRef> {
    find(code)
}

pub fn default_source() -> LanguageRef {
    auto_detect()
}

pub fn default_target() -> LanguageRef {
    find(DEFAULT_TARGET_CODE).unwrap_or_else(|| LanguageRef::new(DEFAULT_TARGET_CODE, "Spanish"))
}

fn swap_fallback() -> LanguageRef {
    find(SWAP_FALLBACK_CODE).unwrap_or_else(|| LanguageRef::new(SWAP_FALLBACK_CODE, "English"))
}

/// Exchange a (source, target) pair.
///
/// Auto-detect cannot become a target, so when it is the source the new
/// target falls back to English instead.
pub fn swap(source: &LanguageRef, target: &LanguageRef) -> (LanguageRef, LanguageRef) {
    if source.is_auto() {
        (target.clone(), swap_fallback())
    } else {
        (target.clone(), source.clone())
    }
}

/// Case-insensitive name search.
///
/// For the source direction the auto-detect sentinel leads the results when
/// the query is empty or matches "detect language".
pub fn search(query: &str, direction: LanguageDirection) -> Vec<LanguageRef> {
    let query = query.trim().to_lowercase();
    let mut results = Vec::new();

    if direction == LanguageDirection::Source
        && (query.is_empty() || "detect language".contains(&query))
    {
        results.push(auto_detect());
    }

    results.extend(languages().filter(|lang| lang.name.to_lowercase().contains(&query)));
    results
}

/// Popular languages followed by each region
pub fn grouped() -> Vec<(String, Vec<LanguageRef>)> {
    let mut groups = Vec::with_capacity(REGIONS.len() + 1);

    groups.push((
        "Popular".to_string(),
        languages()
            .filter(|lang| POPULAR_LANGUAGE_CODES.contains(&lang.code.as_str()))
            .collect(),
    ));

    for region in REGIONS {
        groups.push((
            region.to_string(),
            languages()
                .filter(|lang| lang.region.as_deref() == Some(region))
                .collect(),
        ));
    }

    groups
}
