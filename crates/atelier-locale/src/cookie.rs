//! Reading and writing the locale preference cookie.

use std::fmt;

use atelier_core::Locale;

/// Find a cookie value by name in a `Cookie` request header.
///
/// The header is a `; `-separated list of `name=value` pairs. Surrounding
/// double quotes on the value are stripped. Returns the first match.
pub fn read_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() != name {
            return None;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some(value)
    })
}

/// Instruction to persist a locale choice in the visitor's browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCookie {
    pub name: String,
    pub value: Locale,
    pub max_age_secs: u64,
    /// Set on production deployments served over HTTPS.
    pub secure: bool,
}

impl LocaleCookie {
    /// Render as a `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LocaleCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.name,
            self.value.tag(),
            self.max_age_secs
        )?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        Ok(())
    }
}
