//! Plain-text, email, URL and number normalization used by the sanitizer.
//!
//! Every function here is idempotent: feeding its output back in returns the
//! same string.

use regex_lite::{Captures, Regex};
use std::fmt::Write;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)\s*>").expect("static regex")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z!][^>]*>").expect("static regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("static regex")
});

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.\-]*):").expect("static regex"));

static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&#x([0-9a-f]+);?|&#([0-9]+);?|&(colon|tab|newline);").expect("static regex")
});

/// URL schemes that survive sanitization. Scheme-less (relative) URLs are
/// always allowed.
pub const ALLOWED_URL_SCHEMES: &[&str] = &[
    "http", "https", "ftp", "ftps", "mailto", "tel", "sms", "news", "irc", "feed",
];

/// Characters kept verbatim in a URL. Everything else ASCII is dropped,
/// spaces and non-ASCII are percent-encoded.
const URL_SAFE_PUNCT: &str = "-~+_.?#=!&;,/:%@$|*'()[]";

const MIN_EMAIL_LEN: usize = 6;

const EMAIL_LOCAL_PUNCT: &str = "!#$%&'*+/=?^_`{|}~.-";

/// Upper bound on tag-stripping passes; nested fragments like `<<b>i>` can
/// form a new tag once the inner one is gone.
const MAX_STRIP_PASSES: usize = 8;

fn strip_tags(input: &str) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_STRIP_PASSES {
        let without_scripts = SCRIPT_BLOCK.replace_all(&current, "");
        let next = TAG.replace_all(&without_scripts, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Single-line plain text: tags removed, control characters dropped,
/// whitespace runs collapsed to one space, trimmed.
pub fn plain_text(input: &str) -> String {
    let spaced: String = input
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();
    let stripped = strip_tags(&spaced);
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Multi-line plain text: tags removed, line endings normalized to `\n`,
/// newlines and tabs kept, other control characters dropped, trimmed.
pub fn multiline_text(input: &str) -> String {
    let unified: String = input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();
    strip_tags(&unified).trim().to_string()
}

/// A finite numeric literal (integer, decimal or exponent form), or `""`.
pub fn numeric(input: &str) -> String {
    let trimmed = input.trim();
    let finite = trimmed.parse::<f64>().is_ok_and(f64::is_finite);
    if finite && NUMERIC.is_match(trimmed) {
        trimmed.to_string()
    } else {
        String::new()
    }
}

/// A syntactically valid email address, or `""`.
///
/// Invalid characters are dropped from the local part and from each domain
/// label; an address left without a local part or with fewer than two
/// domain labels is rejected.
pub fn email(input: &str) -> String {
    let Some((local, domain)) = input.trim().split_once('@') else {
        return String::new();
    };

    let local: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || EMAIL_LOCAL_PUNCT.contains(*c))
        .collect();
    if local.is_empty() {
        return String::new();
    }

    if domain.contains("..") {
        return String::new();
    }
    let labels: Vec<String> = domain
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .split('.')
        .map(|label| {
            let kept: String = label
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect();
            kept.trim_matches('-').to_string()
        })
        .filter(|label| !label.is_empty())
        .collect();
    if labels.len() < 2 {
        return String::new();
    }

    let address = format!("{local}@{}", labels.join("."));
    if address.len() < MIN_EMAIL_LEN {
        return String::new();
    }
    address
}

/// A URL safe to emit in an attribute, or `""` when its scheme is not
/// allowed.
pub fn url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut cleaned = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        if c.is_ascii_alphanumeric() || URL_SAFE_PUNCT.contains(c) {
            cleaned.push(c);
        } else if c == ' ' {
            cleaned.push_str("%20");
        } else if !c.is_ascii() && !c.is_control() {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(cleaned, "%{byte:02X}");
            }
        }
    }

    if let Some(caps) = SCHEME.captures(&as_rendered(&cleaned)) {
        let scheme = caps[1].to_ascii_lowercase();
        if !ALLOWED_URL_SCHEMES.contains(&scheme.as_str()) {
            return String::new();
        }
    }

    cleaned
}

/// The URL as markup would hand it to a browser: character references
/// decoded, then tabs, newlines and other controls dropped.
fn as_rendered(url: &str) -> String {
    let decoded = CHAR_REF.replace_all(url, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(hex), _, _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec), _) => dec.as_str().parse::<u32>().ok(),
            (_, _, Some(name)) => match name.as_str().to_ascii_lowercase().as_str() {
                "colon" => Some(':' as u32),
                "tab" => Some('\t' as u32),
                _ => Some('\n' as u32),
            },
            _ => None,
        };
        code.and_then(char::from_u32).map(String::from).unwrap_or_default()
    });
    decoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_control())
        .collect()
}

/// Loose truthiness of a submitted checkbox / flag string.
pub fn is_truthy_str(input: &str) -> bool {
    let trimmed = input.trim();
    !(trimmed.is_empty()
        || trimmed == "0"
        || trimmed.eq_ignore_ascii_case("false")
        || trimmed.eq_ignore_ascii_case("off")
        || trimmed.eq_ignore_ascii_case("no"))
}
