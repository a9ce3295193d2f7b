//! Chat intent vocabulary.
//!
//! Eight fixed labels. When a message mixes a greeting with an action
//! request the action label wins; GREETING is reserved for pure
//! greetings. The classifier prompt enforces this, the lenient parse
//! below preserves it by scanning labels in priority order.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Classified purpose of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    Deals,
    Orders,
    Payment,
    Support,
    Thanks,
    Greeting,
    Others,
    Unknown,
}

impl Intent {
    /// All labels in classifier priority order (actions before
    /// conversational labels)
    pub const ALL: [Intent; 8] = [
        Intent::Deals,
        Intent::Orders,
        Intent::Payment,
        Intent::Support,
        Intent::Thanks,
        Intent::Greeting,
        Intent::Others,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Deals => "DEALS",
            Intent::Orders => "ORDERS",
            Intent::Payment => "PAYMENT",
            Intent::Support => "SUPPORT",
            Intent::Thanks => "THANKS",
            Intent::Greeting => "GREETING",
            Intent::Others => "OTHERS",
            Intent::Unknown => "UNKNOWN",
        }
    }

    /// Lenient parse of a model reply: exact label match after
    /// trim/uppercase, then first label contained anywhere in the
    /// reply (priority order), else `Unknown`.
    pub fn parse_lenient(reply: &str) -> Self {
        let normalized = reply.trim().to_uppercase();

        for intent in Intent::ALL {
            if normalized == intent.as_str() {
                return intent;
            }
        }
        for intent in Intent::ALL {
            if normalized.contains(intent.as_str()) {
                return intent;
            }
        }

        Intent::Unknown
    }

    /// Canned reply used when the intent needs no data lookup
    pub fn canned_reply(&self) -> &'static str {
        match self {
            Intent::Deals => "I'll show you the latest deals!",
            Intent::Orders => "Let me fetch your order history.",
            Intent::Payment => "I'll check your payment status.",
            Intent::Support => {
                "I'm here to help! What can I assist you with? You can ask about deals, \
                 orders, payments, or any other questions you have."
            }
            Intent::Thanks => {
                "You're welcome! I'm happy to help. Is there anything else you'd like to know?"
            }
            Intent::Greeting => "Hello! How can I help you today?",
            Intent::Others => {
                "I understand. How can I assist you today? You can ask about deals, orders, \
                 payments, or anything else you need help with."
            }
            Intent::Unknown => {
                "I'm not sure I understand. Can you please clarify? You can ask about deals, \
                 orders, payments, or ask for help."
            }
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_label_round_trip() {
        for intent in Intent::ALL {
            assert_eq!(Intent::parse_lenient(intent.as_str()), intent);
        }
    }

    #[test]
    fn tolerates_whitespace_and_case() {
        assert_eq!(Intent::parse_lenient("  deals \n"), Intent::Deals);
        assert_eq!(Intent::parse_lenient("Orders"), Intent::Orders);
    }

    #[test]
    fn embedded_label_is_recovered_in_priority_order() {
        assert_eq!(
            Intent::parse_lenient("The intent is DEALS."),
            Intent::Deals
        );
        // DEALS outranks GREETING when the reply mentions both
        assert_eq!(
            Intent::parse_lenient("GREETING or DEALS, hard to say"),
            Intent::Deals
        );
    }

    #[test]
    fn gibberish_falls_back_to_unknown() {
        assert_eq!(Intent::parse_lenient("I cannot classify this"), Intent::Unknown);
        assert_eq!(Intent::parse_lenient(""), Intent::Unknown);
    }
}
