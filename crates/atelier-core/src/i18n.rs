//! Typed translation records.
//!
//! Each locale has one statically shaped [`Translations`] value. Lookups go
//! through [`translations`] or, when a string may be left blank while a
//! translation is pending, through [`localized`], which falls back to the
//! English record.

use crate::locale::Locale;

/// Strings used by the page shell.
#[derive(Debug, Clone, Copy)]
pub struct SiteStrings {
    pub title: &'static str,
    pub tagline: &'static str,
    pub nav_home: &'static str,
    pub nav_services: &'static str,
    pub nav_pricing: &'static str,
    pub nav_contact: &'static str,
}

/// Strings used by the chat widget.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrings {
    pub greeting: &'static str,
    pub placeholder: &'static str,
    /// Apology shown when a reply fails. `{error}` is replaced with the reason.
    pub apology: &'static str,
    /// Reason used when a failure carries no message of its own.
    pub unknown_error: &'static str,
}

impl ChatStrings {
    /// Render the apology template for a failure reason.
    pub fn apology(&self, error: &str) -> String {
        self.apology.replace("{error}", error)
    }
}

/// Notices raised by voice input. These are shown to the user, never
/// appended to the chat history.
#[derive(Debug, Clone, Copy)]
pub struct VoiceStrings {
    pub unsupported: &'static str,
    pub failed: &'static str,
}

/// All user-facing strings for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Translations {
    pub site: SiteStrings,
    pub chat: ChatStrings,
    pub voice: VoiceStrings,
}

static EN: Translations = Translations {
    site: SiteStrings {
        title: "Atelier Design Studio",
        tagline: "Brand identities, websites and products, designed with intent.",
        nav_home: "Home",
        nav_services: "Services",
        nav_pricing: "Pricing",
        nav_contact: "Contact",
    },
    chat: ChatStrings {
        greeting: "Hi! Ask me anything about our services, pricing or timelines.",
        placeholder: "Type your message...",
        apology: "Sorry, something went wrong: {error}. Please try again or reach us at hello@atelier.studio.",
        unknown_error: "Unknown error",
    },
    voice: VoiceStrings {
        unsupported: "Voice input is not supported in this environment.",
        failed: "We couldn't catch that. Please try speaking again.",
    },
};

static AR: Translations = Translations {
    site: SiteStrings {
        title: "استوديو أتيليه للتصميم",
        tagline: "هويات بصرية ومواقع ومنتجات مصممة بعناية.",
        nav_home: "الرئيسية",
        nav_services: "الخدمات",
        nav_pricing: "الأسعار",
        nav_contact: "تواصل معنا",
    },
    chat: ChatStrings {
        greeting: "مرحباً! اسألني عن خدماتنا أو أسعارنا أو المدة الزمنية.",
        placeholder: "اكتب رسالتك...",
        apology: "عذراً، حدث خطأ: {error}. يرجى المحاولة مرة أخرى أو مراسلتنا على hello@atelier.studio.",
        unknown_error: "خطأ غير معروف",
    },
    voice: VoiceStrings {
        unsupported: "الإدخال الصوتي غير مدعوم في هذه البيئة.",
        failed: "لم نتمكن من التقاط صوتك. يرجى المحاولة مرة أخرى.",
    },
};

/// The translation record for a locale.
pub fn translations(locale: Locale) -> &'static Translations {
    match locale {
        Locale::En => &EN,
        Locale::Ar => &AR,
    }
}

/// Look up a single string, falling back to English when the locale's entry
/// is blank.
pub fn localized(locale: Locale, pick: fn(&Translations) -> &'static str) -> &'static str {
    let value = pick(translations(locale));
    if value.trim().is_empty() {
        pick(&EN)
    } else {
        value
    }
}
