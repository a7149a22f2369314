//! Filter option strings and typed option values.
//!
//! The textual form of an invocation is `name[key:value,key:value,...]`.
//! Values are coerced once, here, into [`OptionValue`]s; filters read them
//! through [`OptionSet`], which falls back to the filter's declared default
//! whenever a value is missing or of the wrong kind.
//!
//! # Grammar
//!
//! - The bracket body is split on `,` (or `&`). A token without a `:` (or
//!   `=`) continues the previous value, so `rect:0,0,10,10` and
//!   `list:a,b,c` keep their commas.
//! - Key and value split on the first `:` (or `=`). Keys are lower-cased.
//! - Nested maps separate their pairs with `;`: `dark:r:10;g:20;b:30`.
//!
//! # Coercion order
//!
//! | Value                       | Result                          |
//! |-----------------------------|---------------------------------|
//! | `true`, `on`, `enabled`     | [`OptionValue::Bool`] `true`    |
//! | `false`, `off`, `disabled`  | [`OptionValue::Bool`] `false`   |
//! | `#RRGGBB`                   | [`OptionValue::Color`]          |
//! | `[0-9.-]+` that parses      | [`OptionValue::Number`]         |
//! | contains `:`                | [`OptionValue::Map`]            |
//! | contains `,`                | [`OptionValue::List`]           |
//! | anything else               | [`OptionValue::Str`]            |
//!
//! The key `rect` is special: its value is read as four integers
//! `left,top,width,height`, each defaulting to 0.
//!
//! ```rust
//! use filtr_ops::options::{parse_filter, OptionValue};
//!
//! let parsed = parse_filter("Brightness[brightness:20,legacy:on]");
//! assert_eq!(parsed.name, "brightness");
//! assert_eq!(parsed.options.get("brightness"), Some(&OptionValue::Number(20.0)));
//! assert_eq!(parsed.options.get("legacy"), Some(&OptionValue::Bool(true)));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use filtr_color::{hex_to_rgb, rgb_to_hex};
use filtr_core::RectRequest;

/// A coerced option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// Boolean flag.
    Bool(bool),
    /// Any numeric value (integers included).
    Number(f64),
    /// `#RRGGBB` color.
    Color([u8; 3]),
    /// Literal string.
    Str(String),
    /// Comma-separated list.
    List(Vec<OptionValue>),
    /// Nested `key:value` map.
    Map(OptionMap),
    /// Region from the `rect` key.
    Rect(RectRequest),
}

impl OptionValue {
    /// Returns the value as a number. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Returns the value as a flag. Numbers are true when non-zero.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Number(n) => Some(*n != 0.0),
            _ => None,
        }
    }

    /// Returns the value as a color.
    ///
    /// Accepts `#RRGGBB` values and maps with `r`, `g`, `b` number entries
    /// (missing entries read as 0).
    pub fn as_color(&self) -> Option<[u8; 3]> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Map(m) => {
                let ch = |k: &str| {
                    m.get(k)
                        .and_then(OptionValue::as_f64)
                        .map(filtr_color::clamp_channel)
                        .unwrap_or(0)
                };
                Some([ch("r"), ch("g"), ch("b")])
            }
            _ => None,
        }
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a nested map.
    pub fn as_map(&self) -> Option<&OptionMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the value as a list.
    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a region.
    pub fn as_rect(&self) -> Option<RectRequest> {
        match self {
            Self::Rect(r) => Some(*r),
            _ => None,
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Color(_) => "color",
            Self::Str(_) => "string",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Rect(_) => "rect",
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Color(c) => match rgb_to_hex(c) {
                Ok(hex) => write!(f, "{hex}"),
                Err(_) => f.write_str("#000000"),
            },
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
            Self::Map(m) => {
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{k}:{v}")?;
                }
                Ok(())
            }
            Self::Rect(r) => write!(f, "{},{},{},{}", r.left, r.top, r.width, r.height),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        Self::Number(v as f64)
    }
}

impl From<[u8; 3]> for OptionValue {
    fn from(v: [u8; 3]) -> Self {
        Self::Color(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<OptionMap> for OptionValue {
    fn from(v: OptionMap) -> Self {
        Self::Map(v)
    }
}

impl From<RectRequest> for OptionValue {
    fn from(v: RectRequest) -> Self {
        Self::Rect(v)
    }
}

/// Ordered `key -> value` options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionMap {
    entries: BTreeMap<String, OptionValue>,
}

impl OptionMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a value; the key is lower-cased.
    pub fn insert(&mut self, key: &str, value: impl Into<OptionValue>) {
        self.entries.insert(key.to_ascii_lowercase(), value.into());
    }

    /// Looks up a value.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    /// Returns true if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Copies every entry of `other` into this map; `other` wins.
    pub fn merge(&mut self, other: &OptionMap) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    /// Returns `self` overridden by `other`.
    pub fn merged(mut self, other: &OptionMap) -> Self {
        self.merge(other);
        self
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for OptionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}:{v}")?;
        }
        Ok(())
    }
}

/// Options merged with a filter's defaults, read through typed accessors.
///
/// Every accessor tries the given value first, then the declared default,
/// then a neutral zero value.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    given: OptionMap,
    defaults: OptionMap,
}

impl OptionSet {
    /// Combines caller options with declared defaults.
    pub fn new(given: OptionMap, defaults: OptionMap) -> Self {
        Self { given, defaults }
    }

    fn lookup<T>(&self, key: &str, read: impl Fn(&OptionValue) -> Option<T>) -> Option<T> {
        self.given
            .get(key)
            .and_then(&read)
            .or_else(|| self.defaults.get(key).and_then(&read))
    }

    /// Numeric option.
    pub fn number(&self, key: &str) -> f64 {
        self.lookup(key, OptionValue::as_f64).unwrap_or(0.0)
    }

    /// Boolean option.
    pub fn flag(&self, key: &str) -> bool {
        self.lookup(key, OptionValue::as_bool).unwrap_or(false)
    }

    /// Color option.
    pub fn color(&self, key: &str) -> [u8; 3] {
        self.lookup(key, OptionValue::as_color).unwrap_or([0, 0, 0])
    }

    /// String option, lower-cased.
    pub fn text(&self, key: &str) -> String {
        self.lookup(key, |v| v.as_str().map(str::to_ascii_lowercase))
            .unwrap_or_default()
    }

    /// String option as written, if present.
    pub fn string(&self, key: &str) -> Option<String> {
        self.lookup(key, |v| match v {
            OptionValue::Str(s) => Some(s.clone()),
            OptionValue::Number(_) | OptionValue::Bool(_) => Some(v.to_string()),
            _ => None,
        })
    }

    /// Nested map option.
    pub fn map(&self, key: &str) -> OptionMap {
        self.lookup(key, |v| v.as_map().cloned()).unwrap_or_default()
    }

    /// Region option, if one was given.
    pub fn rect(&self) -> Option<RectRequest> {
        self.lookup("rect", OptionValue::as_rect)
    }

    /// The merged view: defaults overridden by given values.
    pub fn resolved(&self) -> OptionMap {
        self.defaults.clone().merged(&self.given)
    }

    /// Caller-supplied values only.
    pub fn given(&self) -> &OptionMap {
        &self.given
    }
}

/// A parsed `name[options]` string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedFilter {
    /// Lower-cased filter name
    pub name: String,
    /// Options from the bracket body
    pub options: OptionMap,
}

/// Parses `name[key:value,...]`.
///
/// A string without brackets is a bare filter name.
pub fn parse_filter(s: &str) -> ParsedFilter {
    let s = s.trim();
    let Some(open) = s.find('[') else {
        return ParsedFilter {
            name: s.to_ascii_lowercase(),
            options: OptionMap::new(),
        };
    };
    let name = s[..open].trim().to_ascii_lowercase();
    let rest = &s[open + 1..];
    let body = rest.find(']').map_or(rest, |close| &rest[..close]);
    ParsedFilter {
        name,
        options: parse_body(body),
    }
}

fn split_pair(token: &str) -> Option<(&str, &str)> {
    let at = token.find([':', '='])?;
    Some((&token[..at], &token[at + 1..]))
}

fn parse_body(body: &str) -> OptionMap {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for token in body.split([',', '&']) {
        match split_pair(token) {
            Some((k, v)) if !k.trim().is_empty() => {
                pairs.push((k.trim().to_ascii_lowercase(), v.trim().to_string()));
            }
            _ => {
                if let Some((_, v)) = pairs.last_mut() {
                    v.push(',');
                    v.push_str(token.trim());
                }
            }
        }
    }

    let mut map = OptionMap::new();
    for (k, v) in pairs {
        let value = if k == "rect" { parse_rect(&v) } else { coerce(&v) };
        map.insert(&k, value);
    }
    map
}

fn parse_rect(v: &str) -> OptionValue {
    let mut parts = v.split(',').map(|p| parse_int_prefix(p.trim()).unwrap_or(0) as f64);
    let mut next = || parts.next().unwrap_or(0.0);
    OptionValue::Rect(RectRequest::new(next(), next(), next(), next()))
}

/// Leading-integer parse: `"12px"` reads as 12, `"x"` as `None`.
fn parse_int_prefix(s: &str) -> Option<i64> {
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

fn is_numeric_literal(v: &str) -> bool {
    !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'-')
}

fn is_hex_color(v: &str) -> bool {
    v.len() == 7 && v.starts_with('#') && v[1..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Coerces one raw value.
pub fn coerce(v: &str) -> OptionValue {
    let lower = v.to_ascii_lowercase();
    match lower.as_str() {
        "true" | "on" | "enabled" => return OptionValue::Bool(true),
        "false" | "off" | "disabled" => return OptionValue::Bool(false),
        _ => {}
    }
    if is_hex_color(v) {
        if let Ok(rgb) = hex_to_rgb(v) {
            return OptionValue::Color(rgb);
        }
    }
    if is_numeric_literal(v) {
        if let Ok(n) = v.parse::<f64>() {
            return OptionValue::Number(n);
        }
    }
    if v.contains(':') {
        let mut map = OptionMap::new();
        for pair in v.split(';') {
            if let Some((k, val)) = split_pair(pair) {
                if !k.trim().is_empty() {
                    map.insert(k.trim(), coerce(val.trim()));
                }
            }
        }
        return OptionValue::Map(map);
    }
    if v.contains(',') {
        return OptionValue::List(v.split(',').map(|p| coerce(p.trim())).collect());
    }
    OptionValue::Str(v.to_string())
}
