/// Persona flavor injected into the next outbound prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mood {
    #[default]
    Funny,
    Sassy,
    Sleepy,
    Playful,
    Grumpy,
    Affectionate,
    Mischievous,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Funny => "funny",
            Mood::Sassy => "sassy",
            Mood::Sleepy => "sleepy",
            Mood::Playful => "playful",
            Mood::Grumpy => "grumpy",
            Mood::Affectionate => "affectionate",
            Mood::Mischievous => "mischievous",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "funny" => Some(Mood::Funny),
            "sassy" => Some(Mood::Sassy),
            "sleepy" => Some(Mood::Sleepy),
            "playful" => Some(Mood::Playful),
            "grumpy" => Some(Mood::Grumpy),
            "affectionate" => Some(Mood::Affectionate),
            "mischievous" => Some(Mood::Mischievous),
            _ => None,
        }
    }

    pub fn all() -> Vec<Mood> {
        vec![
            Mood::Funny,
            Mood::Sassy,
            Mood::Sleepy,
            Mood::Playful,
            Mood::Grumpy,
            Mood::Affectionate,
            Mood::Mischievous,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Mood::Funny => "😹 Funny",
            Mood::Sassy => "😼 Sassy",
            Mood::Sleepy => "😴 Sleepy",
            Mood::Playful => "😸 Playful",
            Mood::Grumpy => "😾 Grumpy",
            Mood::Affectionate => "😻 Affectionate",
            Mood::Mischievous => "😈 Mischievous",
        }
    }
}
