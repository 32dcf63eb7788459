//! Cover letter tones and the voice guidance each one adds to the generation prompt.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Enthusiastic,
    Formal,
    Confident,
    Conversational,
}

/// Voice guidance for a tone.
#[derive(Debug, Clone)]
pub struct ToneGuide {
    pub voice: &'static str,
    pub prefer: Vec<&'static str>,
    pub avoid: Vec<&'static str>,
}

impl Tone {
    pub const ALL: [Tone; 6] = [
        Tone::Professional,
        Tone::Friendly,
        Tone::Enthusiastic,
        Tone::Formal,
        Tone::Confident,
        Tone::Conversational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Formal => "formal",
            Tone::Confident => "confident",
            Tone::Conversational => "conversational",
        }
    }

    pub fn guide(&self) -> ToneGuide {
        match self {
            Tone::Professional => ToneGuide {
                voice: "polished and businesslike, focused on relevant results",
                prefer: vec!["contributed", "delivered", "managed", "improved"],
                avoid: vec!["slang", "exclamation marks", "overly casual openers"],
            },
            Tone::Friendly => ToneGuide {
                voice: "warm and approachable while staying respectful",
                prefer: vec!["enjoy", "collaborate", "glad", "team"],
                avoid: vec!["stiff legal phrasing", "excessive formality"],
            },
            Tone::Enthusiastic => ToneGuide {
                voice: "energetic and visibly excited about the role and the company",
                prefer: vec!["excited", "passionate", "eager", "thrilled"],
                avoid: vec!["flat, detached phrasing", "more than two exclamation marks"],
            },
            Tone::Formal => ToneGuide {
                voice: "traditional and reserved, suitable for conservative industries",
                prefer: vec!["respectfully", "I would welcome", "esteemed", "sincerely"],
                avoid: vec!["contractions", "humor", "casual greetings"],
            },
            Tone::Confident => ToneGuide {
                voice: "assertive and direct, leading with concrete achievements",
                prefer: vec!["led", "drove", "achieved", "I will"],
                avoid: vec!["hedging such as 'I think' or 'I hope'", "apologetic phrasing"],
            },
            Tone::Conversational => ToneGuide {
                voice: "natural and personable, as if speaking with the hiring manager",
                prefer: vec!["I've", "you'll", "honestly", "here's why"],
                avoid: vec!["buzzword-heavy sentences", "rigid templates"],
            },
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let options: Vec<&str> = Tone::ALL.iter().map(Tone::as_str).collect();
                format!("Tone must be one of: {}", options.join(", "))
            })
    }
}
