//! Canned cat lines that short-circuit the model for a few trigger words.

pub const GREETING_REPLY: &str =
    "Mrow... *yawn* Oh, it's you again. What do you want, friend? 🐾";
pub const FOOD_REPLY: &str =
    "*purr purr* Finally! Someone who understands priorities. Where are my treats? 🍖";
pub const PRAISE_REPLY: &str = "*purr* I know I'm magnificent. Now where are my treats? Mrow.";

/// Checked in order; the first rule with any matching trigger wins.
const RULES: &[(&[&str], &str)] = &[
    (&["hello", "hi"], GREETING_REPLY),
    (&["treat", "food"], FOOD_REPLY),
    (&["good cat", "good kitty"], PRAISE_REPLY),
];

/// Returns a fixed reply when the input contains a trigger (case-insensitive
/// substring match), or `None` when the model should answer instead.
pub fn canned_reply(input: &str) -> Option<&'static str> {
    let lower = input.to_lowercase();

    RULES
        .iter()
        .find(|(triggers, _)| triggers.iter().any(|t| lower.contains(t)))
        .map(|(_, reply)| *reply)
}
