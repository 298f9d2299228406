//! Ordered intent table
//!
//! Routing is a flat list of `(matcher, intent)` pairs evaluated top to bottom, so
//! precedence (restart > end > top-level menu > secondary > fallback) is the list order.

use super::script::{
    self, CannedReply, ACCOUNT_HELP, DONE, FEATURE_DETAILS, MAIN_OPTIONS, NEW_QUESTION,
    NO_THANK_YOU, PRICING_QUESTIONS, PRODUCT_INFORMATION, START_OVER, TECHNICAL_SUPPORT,
};

/// How a rule recognises an utterance
#[derive(Debug)]
pub enum Matcher {
    /// Case-sensitive equality with any of the listed strings
    Exact(&'static [&'static str]),
    /// Lower-cased utterance contains any of the listed (lower-case) needles
    Contains(&'static [&'static str]),
    /// Any of the nested matchers
    AnyOf(&'static [Matcher]),
    /// Matches everything
    Always,
}

impl Matcher {
    pub fn matches(&self, utterance: &str) -> bool {
        match self {
            Matcher::Exact(candidates) => candidates.iter().any(|c| *c == utterance),
            Matcher::Contains(needles) => {
                let lowered = utterance.to_lowercase();
                needles.iter().any(|n| lowered.contains(n))
            }
            Matcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(utterance)),
            Matcher::Always => true,
        }
    }
}

/// What the engine does once a rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Reset to the seeded transcript
    Restart,
    /// Say goodbye and schedule an automatic restart
    End,
    /// Append a canned bot reply
    Reply(Reply),
    /// Ask the renderer to show the phone/email/chat buttons
    RequestContact,
}

/// Canned replies addressable from the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    ProductInformation,
    Pricing,
    TechnicalSupport,
    AccountHelp,
    FeatureDetails,
    Acknowledge,
    Fallback,
}

impl Reply {
    pub(crate) fn canned(self) -> &'static CannedReply {
        match self {
            Reply::ProductInformation => &script::PRODUCT_INFO,
            Reply::Pricing => &script::PRICING,
            Reply::TechnicalSupport => &script::TECH_SUPPORT,
            Reply::AccountHelp => &script::ACCOUNT,
            Reply::FeatureDetails => &script::FEATURES,
            Reply::Acknowledge => &script::ACKNOWLEDGE,
            Reply::Fallback => &script::FALLBACK,
        }
    }

    pub fn text(self) -> &'static str {
        self.canned().text
    }

    pub fn options(self) -> &'static [&'static str] {
        self.canned().options
    }
}

#[derive(Debug)]
pub struct Rule {
    pub name: &'static str,
    pub matcher: Matcher,
    pub intent: Intent,
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "restart",
        matcher: Matcher::Exact(&[MAIN_OPTIONS, NEW_QUESTION, START_OVER]),
        intent: Intent::Restart,
    },
    Rule {
        name: "end",
        matcher: Matcher::Exact(&[DONE, NO_THANK_YOU]),
        intent: Intent::End,
    },
    Rule {
        name: "product_information",
        matcher: Matcher::Exact(&[PRODUCT_INFORMATION]),
        intent: Intent::Reply(Reply::ProductInformation),
    },
    Rule {
        name: "pricing_questions",
        matcher: Matcher::Exact(&[PRICING_QUESTIONS]),
        intent: Intent::Reply(Reply::Pricing),
    },
    Rule {
        name: "technical_support",
        matcher: Matcher::Exact(&[TECHNICAL_SUPPORT]),
        intent: Intent::Reply(Reply::TechnicalSupport),
    },
    Rule {
        name: "account_help",
        matcher: Matcher::Exact(&[ACCOUNT_HELP]),
        intent: Intent::Reply(Reply::AccountHelp),
    },
    Rule {
        name: "feature",
        matcher: Matcher::AnyOf(&[
            Matcher::Contains(&["feature"]),
            Matcher::Exact(&[FEATURE_DETAILS]),
        ]),
        intent: Intent::Reply(Reply::FeatureDetails),
    },
    Rule {
        name: "acknowledge",
        matcher: Matcher::Contains(&["no", "thanks"]),
        intent: Intent::Reply(Reply::Acknowledge),
    },
    Rule {
        name: "contact",
        matcher: Matcher::Contains(&["more help", "contact"]),
        intent: Intent::RequestContact,
    },
    Rule {
        name: "fallback",
        matcher: Matcher::Always,
        intent: Intent::Reply(Reply::Fallback),
    },
];

/// First rule whose matcher accepts the utterance.
///
/// The table ends in `Matcher::Always`, so resolution is total.
pub fn resolve(utterance: &str) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(utterance))
        .unwrap_or(&RULES[RULES.len() - 1])
}
