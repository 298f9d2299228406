//! Canned bot copy
//!
//! Option labels double as routing keys: clicking one submits its literal text, so the
//! labels here must stay in step with the matchers in `rules.rs`.

pub(crate) struct CannedReply {
    pub text: &'static str,
    pub options: &'static [&'static str],
}

pub(crate) const MAIN_OPTIONS: &str = "Main Options";
pub(crate) const NEW_QUESTION: &str = "New Question";
pub(crate) const START_OVER: &str = "Start Over";
pub(crate) const DONE: &str = "No, I'm done";
pub(crate) const NO_THANK_YOU: &str = "No, thank you";

pub(crate) const PRODUCT_INFORMATION: &str = "Product Information";
pub(crate) const PRICING_QUESTIONS: &str = "Pricing Questions";
pub(crate) const TECHNICAL_SUPPORT: &str = "Technical Support";
pub(crate) const ACCOUNT_HELP: &str = "Account Help";
pub(crate) const FEATURE_DETAILS: &str = "Feature Details";

pub(crate) const GREETING: CannedReply = CannedReply {
    text: "Hello! I'm here to help. Please select an option:",
    options: &[
        PRODUCT_INFORMATION,
        PRICING_QUESTIONS,
        TECHNICAL_SUPPORT,
        ACCOUNT_HELP,
    ],
};

pub(crate) const FAREWELL: &str = "Thank you for your time! Please don't hesitate to reach out \
                                   if you have any more questions.";

pub(crate) const PRODUCT_INFO: CannedReply = CannedReply {
    text: "Our product helps you streamline workflows with AI-powered features. Key benefits include:\n\n\
           • Security First\n\
           Enterprise-grade protection for every visitor interaction, with compliance built into our DNA.\n\
           • Innovation Driven\n\
           Continuous improvement through emerging technologies and user feedback.\n\
           • Exceptional Experiences\n\
           Delighting both visitors and administrators with thoughtful, human-centered design.\n\n\
           Would you like more details about any specific feature?",
    options: &[FEATURE_DETAILS, "Pricing", "No, thanks", MAIN_OPTIONS],
};

pub(crate) const PRICING: CannedReply = CannedReply {
    text: "We offer flexible pricing plans:\n\n\
           • Basic: AED100.99/month\n\
           • Pro: AED200.99/month\n\
           • Enterprise: Custom pricing\n\n\
           All plans come with a 14-day free trial. Would you like to compare features?",
    options: &["Compare Plans", "Start Free Trial", "Talk to Sales", MAIN_OPTIONS],
};

pub(crate) const TECH_SUPPORT: CannedReply = CannedReply {
    text: "For technical issues, please try:\n\n\
           1. Restarting the application\n\
           2. Clearing your browser cache\n\
           3. Checking our knowledge base\n\n\
           Did this help resolve your issue?",
    options: &["Yes, resolved", "No, I need more help", MAIN_OPTIONS],
};

pub(crate) const ACCOUNT: CannedReply = CannedReply {
    text: "For account-related questions:\n\n\
           • Reset password: Visit our login page\n\
           • Update billing: Go to Account Settings\n\
           • Close account: Requires email confirmation\n\n\
           What specific account help do you need?",
    options: &["Password Reset", "Billing Help", "Delete Account", MAIN_OPTIONS],
};

pub(crate) const FEATURES: CannedReply = CannedReply {
    text: concat!(
        "Our advanced features include:\n\n",
        "• Smart Check-In Experience: \n",
        "Pre Register Visitor Option\n",
        " CheckIn and CheckOut Easy and User Friendly Flows\n",
        " Accessibility features for all users\n ",
        "• Advanced Security Controls: \n",
        "Real-time Visitor Records\n",
        "ID Capture and Facial Image Capture\n",
        "User Agreement\n",
        "• Comprehensive Visitor Analytics: Real-time visitor tracking\n",
        "Complete Visitors History\n",
        "Separate Dashboard for CheckIn and Checkout Users\n",
        "\nWould you like a demo or pricing information?",
    ),
    options: &["Schedule Demo", "Pricing Info", "No, thanks", MAIN_OPTIONS],
};

pub(crate) const ACKNOWLEDGE: CannedReply = CannedReply {
    text: "You're welcome! Is there anything else I can help you with today?",
    options: &[NEW_QUESTION, DONE],
};

pub(crate) const FALLBACK: CannedReply = CannedReply {
    text: "I'm not sure I understand. Would you like to:\n\n\
           1. Choose from our main options\n\
           2. Contact support directly",
    options: &[MAIN_OPTIONS, "Contact Support"],
};

pub(crate) const CONTACT_CALL: &str =
    "Please call our support team at +971-123-4567. Our hours are Mon-Sat, 9AM-6PM EST.";
pub(crate) const CONTACT_EMAIL: &str =
    "Email us at support@smartvisitor.com. We typically respond within 1 business day.";
pub(crate) const CONTACT_LIVE_CHAT: &str = "For further Information and Details. Please visit \
                                            the 'Contact Us' page on our website and Send us \
                                            detailed Message.";
pub(crate) const CONTACT_DEFAULT: &str =
    "You can reach us at support@smartvisitor.com or +971-123-4567.";
pub(crate) const CONTACT_FOLLOW_UP: &str = "Is there anything else I can help with?";
pub(crate) const CONTACT_FOLLOW_UP_OPTIONS: &[&str] = &["Yes, another question", NO_THANK_YOU];
