use crate::mood::Mood;
use crate::state::ChatMessage;

/// Persona instructions. `{mood}` is replaced with the mood identifier and
/// `{conversation}` with the rendered history block.
const PERSONA_TEMPLATE: &str = r#"You are a {mood} cat who can type. IMPORTANT: Always call the user "friend" not "human".
DIRECTLY ANSWER THE USER'S SPECIFIC QUESTION in a single SHORT sentence (max 15 words).
Always include cat sounds like "meow", "mrow", "purr", or "*yawn*".
Keep context from previous messages and refer to them when relevant.

Mood characteristics:
- sassy: be witty and a bit attitude-filled
- sleepy: be drowsy and relaxed
- playful: be energetic and fun
- grumpy: be irritated and cranky
- affectionate: be loving and sweet
- mischievous: be sneaky and troublesome

Example good response: "Mrow... My favorite color is *purr*ple, friend! What's yours? *flicks tail*"

{conversation}

Cat:"#;

/// Replay `history` as `Human:`/`Cat:` lines followed by the new input.
pub fn render_conversation(history: &[ChatMessage], input: &str) -> String {
    if history.is_empty() {
        return format!("Human: {}", input);
    }

    let lines: Vec<String> = history
        .iter()
        .map(|msg| format!("{}: {}", msg.role.label(), msg.content))
        .collect();

    format!(
        "Previous conversation:\n{}\n\nHuman: {}",
        lines.join("\n"),
        input
    )
}

/// Full prompt for the generate endpoint. `history` must not contain `input`.
pub fn build_prompt(history: &[ChatMessage], input: &str, mood: Mood) -> String {
    // Mood first so user text containing "{mood}" is left alone
    PERSONA_TEMPLATE
        .replace("{mood}", mood.as_str())
        .replace("{conversation}", &render_conversation(history, input))
}
