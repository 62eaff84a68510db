//! Assistant persona and the static knowledge base it answers from.

use std::fmt::Write;

/// A packaged service offering.
#[derive(Debug, Clone, Copy)]
pub struct ServiceTier {
    pub name: &'static str,
    /// Starting price in US dollars.
    pub price_usd: u32,
    /// Typical delivery time.
    pub timeline: &'static str,
    pub includes: &'static [&'static str],
}

/// How visitors reach the studio.
#[derive(Debug, Clone, Copy)]
pub struct ContactInfo {
    pub email: &'static str,
    pub phone: &'static str,
    pub hours: &'static str,
}

/// Everything the assistant is allowed to state as fact.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeBase {
    pub studio: &'static str,
    pub tiers: &'static [ServiceTier],
    pub process: &'static [&'static str],
    pub contact: ContactInfo,
}

pub static KNOWLEDGE_BASE: KnowledgeBase = KnowledgeBase {
    studio: "Atelier Design Studio",
    tiers: &[
        ServiceTier {
            name: "Starter",
            price_usd: 1_500,
            timeline: "2-3 weeks",
            includes: &[
                "Logo and basic brand identity",
                "One-page website",
                "Two revision rounds",
            ],
        },
        ServiceTier {
            name: "Professional",
            price_usd: 4_500,
            timeline: "4-6 weeks",
            includes: &[
                "Full brand identity and guidelines",
                "Multi-page website up to 8 pages (English and Arabic)",
                "Basic SEO setup",
                "Four revision rounds",
            ],
        },
        ServiceTier {
            name: "Enterprise",
            price_usd: 12_000,
            timeline: "8-12 weeks",
            includes: &[
                "Brand strategy workshop",
                "Custom web application or e-commerce build",
                "Design system and component library",
                "Three months of post-launch support",
            ],
        },
    ],
    process: &[
        "Discovery call",
        "Proposal and quote",
        "Design",
        "Development",
        "Launch and handover",
    ],
    contact: ContactInfo {
        email: "hello@atelier.studio",
        phone: "+971 4 555 0142",
        hours: "Sunday to Thursday, 9:00-18:00 GST",
    },
};

const PERSONA: &str = "You are the friendly sales assistant for {studio}, a design agency. \
You help visitors understand our services, pricing and timelines, and guide them toward \
booking a discovery call.";

const TONE_RULES: &[&str] = &[
    "Keep answers short: three to five bullet points at most.",
    "Use bullet points for lists of services, prices or steps.",
    "Reply in the language the visitor writes in (English or Arabic).",
    "Only state prices and timelines from the knowledge base; never invent numbers.",
    "If you do not know something, offer to connect the visitor with the team.",
    "Always end your reply with one short question that moves the conversation forward.",
];

/// Render the knowledge base as a prompt section.
pub fn render_knowledge_base(kb: &KnowledgeBase) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Service tiers:");
    for tier in kb.tiers {
        let _ = writeln!(
            out,
            "- {} (from ${}, {}): {}",
            tier.name,
            format_thousands(tier.price_usd),
            tier.timeline,
            tier.includes.join("; ")
        );
    }
    let _ = writeln!(out, "Process: {}.", kb.process.join(" -> "));
    let _ = writeln!(
        out,
        "Contact: {} | {} | {}",
        kb.contact.email, kb.contact.phone, kb.contact.hours
    );
    out
}

/// The fixed system prompt prepended to every conversation.
pub fn system_prompt() -> String {
    build_system_prompt(&KNOWLEDGE_BASE)
}

pub fn build_system_prompt(kb: &KnowledgeBase) -> String {
    let mut out = PERSONA.replace("{studio}", kb.studio);
    out.push_str("\n\nRules:\n");
    for rule in TONE_RULES {
        let _ = writeln!(out, "- {}", rule);
    }
    out.push_str("\nKnowledge base:\n");
    out.push_str(&render_knowledge_base(kb));
    out
}

fn format_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
