//! The fixed set of locales the site is published in.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AtelierError;

/// Text direction of a locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// The value used for the HTML `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported site locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// English.
    En,
    /// Arabic.
    Ar,
}

impl Locale {
    /// Every locale the binary knows about, in declaration order.
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ar];

    /// The language tag used in URLs, cookies and `lang` attributes.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Text direction for layout.
    pub fn direction(&self) -> Direction {
        match self {
            Locale::En => Direction::Ltr,
            Locale::Ar => Direction::Rtl,
        }
    }

    /// Native display name, as shown in the language switcher.
    pub fn display_name(&self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ar => "العربية",
        }
    }

    /// Language passed to speech recognition for this locale.
    pub fn speech_language(&self) -> &'static str {
        match self {
            Locale::En => "en-US",
            Locale::Ar => "ar-SA",
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == Direction::Rtl
    }

    /// Parse a bare language tag, ignoring ASCII case.
    ///
    /// Only exact tags match; region subtags such as `ar-EG` are left to
    /// negotiation.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        Locale::ALL
            .into_iter()
            .find(|l| l.tag().eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = AtelierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(s.trim())
            .ok_or_else(|| AtelierError::Locale(format!("unsupported locale: {}", s)))
    }
}
