#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

// Best-effort pick of a preferred voice: "tammy", then any "female" voice,
// then an English voice named "woman". `None` means the engine default.
pub fn select_voice(voices: &[Voice]) -> Option<&Voice> {
    voices
        .iter()
        .find(|v| v.name_contains("tammy"))
        .or_else(|| voices.iter().find(|v| v.name_contains("female")))
        .or_else(|| {
            voices
                .iter()
                .find(|v| v.lang.starts_with("en") && v.name_contains("woman"))
        })
}
