//! Builtin named validators.
//!
//! All of them work on the text form of the value and treat an empty value as
//! valid; use `"required"` for presence.

use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};

use super::ValidatorRegistry;

type TextCheck = fn(&str, &[JsonValue]) -> bool;

const BUILTINS: &[(&str, TextCheck)] = &[
    ("isEmail", is_email),
    ("isFQDN", is_fqdn),
    ("isURL", is_url),
    ("equals", equals),
    ("contains", contains),
    ("matches", matches),
    ("isLength", is_length),
    ("isNumeric", is_numeric),
    ("isInt", is_int),
    ("isCurrency", is_currency),
    ("isIn", is_in),
];

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").expect("valid numeric pattern"));
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid digits pattern"));
static INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?(0|[1-9][0-9]*)$").expect("valid int pattern"));
static INT_LEADING_ZEROES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+$").expect("valid int pattern"));

pub(super) fn register_all(registry: &mut ValidatorRegistry) {
    for &(name, check) in BUILTINS {
        registry.register(name, move |value, params| {
            let text = value.to_text();
            text.is_empty() || check(&text, params)
        });
    }
}

// -----------------------------------------------------------------------------
// Parameter helpers
// -----------------------------------------------------------------------------

fn options(params: &[JsonValue]) -> Option<&Map<String, JsonValue>> {
    params.first().and_then(JsonValue::as_object)
}

fn flag(params: &[JsonValue], key: &str, default: bool) -> bool {
    options(params)
        .and_then(|opts| opts.get(key))
        .and_then(JsonValue::as_bool)
        .unwrap_or(default)
}

fn str_option<'a>(params: &'a [JsonValue], key: &str, default: &'a str) -> &'a str {
    options(params)
        .and_then(|opts| opts.get(key))
        .and_then(JsonValue::as_str)
        .unwrap_or(default)
}

fn int_option(params: &[JsonValue], key: &str) -> Option<i64> {
    options(params)
        .and_then(|opts| opts.get(key))
        .and_then(JsonValue::as_i64)
}

fn str_param(params: &[JsonValue], index: usize) -> Option<&str> {
    params.get(index).and_then(JsonValue::as_str)
}

// -----------------------------------------------------------------------------
// Validators
// -----------------------------------------------------------------------------

fn is_email(text: &str, _params: &[JsonValue]) -> bool {
    email_address::EmailAddress::is_valid(text)
}

fn is_fqdn(text: &str, params: &[JsonValue]) -> bool {
    let require_tld = flag(params, "require_tld", true);
    let allow_underscores = flag(params, "allow_underscores", false);
    let allow_trailing_dot = flag(params, "allow_trailing_dot", false);

    let host = match text.strip_suffix('.') {
        Some(stripped) if allow_trailing_dot => stripped,
        _ => text,
    };

    if host.is_empty() || host.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();

    if require_tld {
        if labels.len() < 2 {
            return false;
        }
        let tld = labels[labels.len() - 1];
        let punycode = tld.starts_with("xn--") && tld.len() > 4;
        if !punycode && (tld.len() < 2 || !tld.chars().all(char::is_alphabetic)) {
            return false;
        }
    }

    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || (allow_underscores && c == '_'))
    })
}

fn is_url(text: &str, params: &[JsonValue]) -> bool {
    let require_protocol = flag(params, "require_protocol", false);
    let protocols: Vec<&str> = options(params)
        .and_then(|opts| opts.get("protocols"))
        .and_then(JsonValue::as_array)
        .map(|list| list.iter().filter_map(JsonValue::as_str).collect())
        .unwrap_or_else(|| vec!["http", "https", "ftp"]);

    let candidate = if text.contains("://") {
        text.to_string()
    } else if require_protocol {
        return false;
    } else {
        format!("http://{text}")
    };

    match url::Url::parse(&candidate) {
        Ok(url) => {
            protocols.contains(&url.scheme())
                && url
                    .host_str()
                    .is_some_and(|host| host == "localhost" || host.contains('.'))
        }
        Err(_) => false,
    }
}

fn equals(text: &str, params: &[JsonValue]) -> bool {
    str_param(params, 0).is_some_and(|comparison| text == comparison)
}

fn contains(text: &str, params: &[JsonValue]) -> bool {
    str_param(params, 0).is_some_and(|seed| text.contains(seed))
}

fn matches(text: &str, params: &[JsonValue]) -> bool {
    let Some(pattern) = str_param(params, 0) else {
        warn!("matches: missing pattern parameter");
        return false;
    };

    let pattern = match str_param(params, 1) {
        Some(flags) if flags.contains('i') => format!("(?i){pattern}"),
        _ => pattern.to_string(),
    };

    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(e) => {
            warn!("matches: invalid pattern {:?}: {}", pattern, e);
            false
        }
    }
}

fn is_length(text: &str, params: &[JsonValue]) -> bool {
    let (min, max) = if options(params).is_some() {
        (int_option(params, "min"), int_option(params, "max"))
    } else {
        (
            params.first().and_then(JsonValue::as_i64),
            params.get(1).and_then(JsonValue::as_i64),
        )
    };

    let len = text.chars().count() as i64;
    min.is_none_or(|min| len >= min) && max.is_none_or(|max| len <= max)
}

fn is_numeric(text: &str, params: &[JsonValue]) -> bool {
    if flag(params, "no_symbols", false) {
        DIGITS.is_match(text)
    } else {
        NUMERIC.is_match(text)
    }
}

fn is_int(text: &str, params: &[JsonValue]) -> bool {
    let shape = if flag(params, "allow_leading_zeroes", true) {
        &*INT_LEADING_ZEROES
    } else {
        &*INT
    };

    if !shape.is_match(text) {
        return false;
    }

    let Ok(n) = text.parse::<i64>() else {
        return false;
    };

    int_option(params, "min").is_none_or(|min| n >= min)
        && int_option(params, "max").is_none_or(|max| n <= max)
}

fn is_currency(text: &str, params: &[JsonValue]) -> bool {
    let symbol = regex::escape(str_option(params, "symbol", "$"));
    let symbol = if flag(params, "require_symbol", false) {
        symbol
    } else {
        format!("(?:{symbol})?")
    };
    let negative = if flag(params, "allow_negatives", true) {
        "-?"
    } else {
        ""
    };

    let pattern = format!(r"^{negative}{symbol}(?:[0-9]{{1,3}}(?:,[0-9]{{3}})+|[0-9]+)(?:\.[0-9]{{1,2}})?$");

    match Regex::new(&pattern) {
        Ok(re) => re.is_match(text),
        Err(e) => {
            warn!("isCurrency: invalid options produced {:?}: {}", pattern, e);
            false
        }
    }
}

fn is_in(text: &str, params: &[JsonValue]) -> bool {
    params
        .first()
        .and_then(JsonValue::as_array)
        .is_some_and(|options| options.iter().any(|option| option.as_str() == Some(text)))
}
