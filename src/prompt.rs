//! Summary prompts
//!
//! The instruction sent upstream is the template text followed by the
//! document text:
//! - default: `Summarize this document: {text}`
//! - with a tone: `Summarize this document as a {tone} summary: {text}`

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::types::AppError;

/// User-selectable summary style.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Concise,
    Detailed,
    Bullet,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Concise, Tone::Detailed, Tone::Bullet];
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tone::Concise => write!(f, "concise"),
            Tone::Detailed => write!(f, "detailed"),
            Tone::Bullet => write!(f, "bullet"),
        }
    }
}

impl FromStr for Tone {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concise" => Ok(Tone::Concise),
            "detailed" => Ok(Tone::Detailed),
            "bullet" => Ok(Tone::Bullet),
            other => Err(AppError::Validation(format!("Unknown summary tone: {}", other))),
        }
    }
}

/// How the upstream prompt is chosen for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Default,
    Tone(Tone),
    /// A complete prompt built by the caller, sent as-is.
    Custom(String),
}

impl Instruction {
    /// A non-empty prompt wins over a tone; neither means the default template.
    pub fn from_fields(prompt: Option<String>, tone: Option<Tone>) -> Self {
        match (prompt.filter(|p| !p.trim().is_empty()), tone) {
            (Some(prompt), _) => Instruction::Custom(prompt),
            (None, Some(tone)) => Instruction::Tone(tone),
            (None, None) => Instruction::Default,
        }
    }

    /// Final prompt text; `text` and custom prompts are cut to `max_chars`.
    pub fn render(&self, text: &str, max_chars: usize) -> String {
        match self {
            Instruction::Default => default_prompt(truncate_chars(text, max_chars)),
            Instruction::Tone(tone) => tone_prompt(*tone, truncate_chars(text, max_chars)),
            Instruction::Custom(prompt) => truncate_chars(prompt, max_chars).to_string(),
        }
    }
}

pub fn default_prompt(text: &str) -> String {
    format!("Summarize this document: {}", text)
}

pub fn tone_prompt(tone: Tone, text: &str) -> String {
    format!("Summarize this document as a {} summary: {}", tone, text)
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt() {
        assert_eq!(
            Instruction::Default.render("Hello world", 100),
            "Summarize this document: Hello world"
        );
    }

    #[test]
    fn test_bullet_prompt_suffix() {
        let prompt = Instruction::Tone(Tone::Bullet).render("Some extracted text", 100);
        assert!(prompt.ends_with("as a bullet summary: Some extracted text"));
    }

    #[test]
    fn test_tone_parsing() {
        assert_eq!("Concise".parse::<Tone>().unwrap(), Tone::Concise);
        assert_eq!(" detailed ".parse::<Tone>().unwrap(), Tone::Detailed);
        assert_eq!("bullet".parse::<Tone>().unwrap(), Tone::Bullet);
        assert!(matches!("poetic".parse::<Tone>(), Err(AppError::Validation(_))));
        assert!(matches!("bullets".parse::<Tone>(), Err(AppError::Validation(_))));
        for tone in Tone::ALL {
            assert_eq!(tone.to_string().parse::<Tone>().unwrap(), tone);
        }
    }

    #[test]
    fn test_cli_values_match_form_values() {
        for tone in Tone::ALL {
            let value = tone.to_possible_value().unwrap();
            assert_eq!(value.get_name(), tone.to_string());
            assert_eq!(<Tone as ValueEnum>::from_str(value.get_name(), false).unwrap(), tone);
        }
        assert!(<Tone as ValueEnum>::from_str("bullets", false).is_err());
    }

    #[test]
    fn test_prompt_field_wins_over_tone() {
        let instruction =
            Instruction::from_fields(Some("Summarize briefly: abc".into()), Some(Tone::Detailed));
        assert_eq!(instruction, Instruction::Custom("Summarize briefly: abc".into()));

        let blank = Instruction::from_fields(Some("   ".into()), Some(Tone::Detailed));
        assert_eq!(blank, Instruction::Tone(Tone::Detailed));

        assert_eq!(Instruction::from_fields(None, None), Instruction::Default);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
        assert_eq!(
            Instruction::Default.render("abcdef", 3),
            "Summarize this document: abc"
        );
    }
}
