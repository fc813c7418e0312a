//! Word lists used by detection, cleaning and the offline glossary.

/// English function words removed during cleaning.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "can", "will",
    "just", "don", "should", "now", "can't", "cannot", "won't", "isn't", "aren't", "wasn't",
];

/// Common Hindi function words removed when a ticket stays in Hindi.
pub const HINDI_STOPWORDS: &[&str] = &[
    "और", "का", "के", "की", "को", "से", "में", "पर", "है", "हैं", "था", "थे", "थी", "होगा",
    "होगी", "होंगे", "कि", "जो", "यह", "वह", "इस", "उस", "एक", "दो", "तीन", "कुछ", "सब", "कोई",
    "कहा", "कहे", "कहते", "बहुत", "अधिक", "कम", "ज्यादा",
];

/// IT vocabulary that survives stop-word removal and counts as English
/// during detection.
pub const IT_TERMS: &[&str] = &[
    "server", "servers", "database", "network", "email", "password", "login", "error", "bug",
    "crash", "slow", "down", "offline", "online", "backup", "restore", "update", "install",
    "uninstall", "virus", "malware", "firewall", "vpn", "wifi", "wireless", "internet",
    "browser", "application", "applications", "software", "hardware", "printer", "scanner",
    "monitor", "computer", "laptop", "desktop", "system", "systems", "user", "users",
    "account", "access", "reset", "outage", "failure", "timeout", "disk", "memory", "cpu",
    "storage", "service", "services", "portal", "website", "site", "app", "outlook",
];

/// Everyday English content words frequent in tickets, used only to help
/// tell English apart from other Latin-script languages.
const ENGLISH_CONTENT_WORDS: &[&str] = &[
    "need", "needs", "please", "help", "working", "work", "works", "broken", "issue",
    "problem", "problems", "unable", "cannot", "able", "new", "old", "request", "urgent",
    "complete", "completely", "extremely", "timing", "since", "today", "morning", "again",
    "everyone", "nobody", "team", "office", "getting", "get", "got", "keeps", "still",
];

/// Canonical spellings for common IT abbreviations and synonyms, applied to
/// lowercased text on word boundaries.
pub const IT_TERM_REWRITES: &[(&str, &str)] = &[
    (r"\bpc\b", "computer"),
    (r"\blaptop\b", "computer"),
    (r"\bdesktop\b", "computer"),
    (r"\bwifi\b", "wireless"),
    (r"\bwi-fi\b", "wireless"),
    (r"\binternet\b", "network"),
    (r"\bapp\b", "application"),
    (r"\bpwd\b", "password"),
    (r"\blogon\b", "login"),
    (r"\bsign in\b", "login"),
    (r"\bsign on\b", "login"),
    (r"\berr\b", "error"),
    (r"\bbug\b", "error"),
    (r"\bissue\b", "problem"),
    (r"\bprob\b", "problem"),
];

/// Offline Hindi to English glossary for ticket vocabulary. Transliterated
/// English loanwords map to their source word.
pub const HINDI_GLOSSARY: &[(&str, &str)] = &[
    ("सर्वर", "server"),
    ("डाउन", "down"),
    ("नेटवर्क", "network"),
    ("इंटरनेट", "internet"),
    ("ईमेल", "email"),
    ("पासवर्ड", "password"),
    ("लॉगिन", "login"),
    ("प्रिंटर", "printer"),
    ("कंप्यूटर", "computer"),
    ("सिस्टम", "system"),
    ("डेटाबेस", "database"),
    ("एप्लिकेशन", "application"),
    ("सॉफ्टवेयर", "software"),
    ("त्रुटि", "error"),
    ("एरर", "error"),
    ("धीमा", "slow"),
    ("धीमी", "slow"),
    ("बंद", "down"),
    ("खराब", "broken"),
    ("विफल", "failed"),
    ("विफलता", "failure"),
    ("क्रैश", "crash"),
    ("पूरा", "complete"),
    ("पूरी", "complete"),
    ("सभी", "all"),
    ("तुरंत", "urgent"),
    ("गंभीर", "critical"),
    ("रीसेट", "reset"),
    ("उपयोगकर्ता", "user"),
    ("यूजर", "user"),
    ("नहीं", "not"),
    ("काम", "work"),
    ("है", "is"),
    ("हैं", "are"),
    ("और", "and"),
    ("में", "in"),
    ("का", "of"),
    ("की", "of"),
    ("के", "of"),
    ("मेरा", "my"),
    ("मेरी", "my"),
    ("चाहिए", "need"),
];

pub fn is_english_stopword(word: &str) -> bool {
    ENGLISH_STOPWORDS.contains(&word)
}

pub fn is_hindi_stopword(word: &str) -> bool {
    HINDI_STOPWORDS.contains(&word)
}

pub fn is_it_term(word: &str) -> bool {
    IT_TERMS.contains(&word)
}

/// Expects a lowercased token.
pub fn is_english_word(word: &str) -> bool {
    is_english_stopword(word) || is_it_term(word) || ENGLISH_CONTENT_WORDS.contains(&word)
}

pub fn glossary_lookup(word: &str) -> Option<&'static str> {
    HINDI_GLOSSARY
        .iter()
        .find(|(hindi, _)| *hindi == word)
        .map(|(_, english)| *english)
}
