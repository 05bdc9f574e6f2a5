/// The romantic intents a sender can pick from.
pub const INTENT_OPTIONS: &[&str] = &[
    "A cup of coffee together",
    "Getting to know you",
    "A romantic dinner date",
    "Just spend time together",
    "Watching a movie together",
    "Playing games together",
    "A walk in the park",
];

/// Answers a recipient can give to a confession.
pub const RESPONSES: &[&str] = &["yes", "no", "maybe"];

pub const MESSAGE_CONFESSION: &str = "confession";
pub const MESSAGE_BOUQUET: &str = "bouquet";

pub fn is_intent_option(value: &str) -> bool {
    INTENT_OPTIONS.contains(&value)
}

pub fn is_response(value: &str) -> bool {
    RESPONSES.contains(&value)
}
