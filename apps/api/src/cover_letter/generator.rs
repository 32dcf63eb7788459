//! Cover letter generation.
//!
//! The reply is free text and is returned as-is. No JSON parsing happens here.

use tracing::{info, warn};

use crate::config::FailurePolicy;
use crate::cover_letter::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::cover_letter::tone::Tone;
use crate::errors::AppError;
use crate::llm_client::prompts::PLAIN_TEXT_INSTRUCTION;
use crate::llm_client::{CompletionRequest, LlmProvider};
use crate::models::resume::{Experience, PersonalInfo, Resume};

const COVER_LETTER_TEMPERATURE: f32 = 0.8;

/// Experience entries sent to the model, in stored order.
pub const MAX_EXPERIENCE_ENTRIES: usize = 2;

/// Top skills named in a fallback letter.
const FALLBACK_SKILL_COUNT: usize = 3;

/// The slice of a resume a cover letter is written from.
#[derive(Debug, Clone)]
pub struct CoverLetterContext {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
}

impl CoverLetterContext {
    pub fn from_resume(resume: &Resume) -> Self {
        Self {
            personal_info: resume.personal_info.clone(),
            experience: resume
                .experience
                .iter()
                .take(MAX_EXPERIENCE_ENTRIES)
                .cloned()
                .collect(),
            skills: resume.skills.clone(),
        }
    }
}

/// Generates a letter with one provider call. An empty reply is an empty letter.
///
/// Under `FailurePolicy::Degrade` a provider failure yields `fallback_letter` instead.
pub async fn generate_cover_letter(
    llm: &dyn LlmProvider,
    policy: FailurePolicy,
    context: &CoverLetterContext,
    job_description: &str,
    tone: Tone,
) -> Result<String, AppError> {
    let system = build_system(tone);
    let prompt = build_prompt(context, job_description, tone);

    let reply = llm
        .complete(CompletionRequest {
            system: &system,
            prompt: &prompt,
            json_output: false,
            temperature: COVER_LETTER_TEMPERATURE,
        })
        .await;

    match (reply, policy) {
        (Ok(content), _) => {
            info!(
                "Cover letter via {} ({tone}): {} chars",
                llm.name(),
                content.len()
            );
            Ok(content)
        }
        (Err(e), FailurePolicy::Fail) => {
            Err(AppError::Llm(format!("Cover letter call failed: {e}")))
        }
        (Err(e), FailurePolicy::Degrade) => {
            warn!("Cover letter via {} failed, using fallback letter: {e}", llm.name());
            Ok(fallback_letter(context))
        }
    }
}

fn build_system(tone: Tone) -> String {
    let guide = tone.guide();
    COVER_LETTER_SYSTEM
        .replace("{tone}", tone.as_str())
        .replace("{voice}", guide.voice)
        .replace("{prefer}", &guide.prefer.join(", "))
        .replace("{avoid}", &guide.avoid.join(", "))
        .replace("{plain_text}", PLAIN_TEXT_INSTRUCTION)
}

fn build_prompt(context: &CoverLetterContext, job_description: &str, tone: Tone) -> String {
    let info = &context.personal_info;
    let experience = context
        .experience
        .iter()
        .map(|e| format!("- {} at {}: {}", e.position, e.company, e.description))
        .collect::<Vec<_>>()
        .join("\n");

    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{full_name}", &info.full_name())
        .replace("{title}", &info.title)
        .replace("{email}", &info.email)
        .replace("{phone}", &info.phone)
        .replace("{location}", &info.location)
        .replace("{experience}", &experience)
        .replace("{skills}", &context.skills.join(", "))
        .replace("{job_description}", job_description)
        .replace("{tone}", tone.as_str())
}

/// A plain letter assembled from the resume itself, used when the provider is down.
pub fn fallback_letter(context: &CoverLetterContext) -> String {
    let info = &context.personal_info;
    let mut intro = String::from("I am writing to express my interest in this position.");

    let title = info.title.trim();
    let recent = context.experience.first();
    match (title.is_empty(), recent) {
        (false, Some(exp)) => intro.push_str(&format!(
            " As a {title}, most recently working as {} at {}, I would bring hands-on experience to your team.",
            exp.position, exp.company
        )),
        (false, None) => intro.push_str(&format!(
            " As a {title}, I would bring hands-on experience to your team."
        )),
        (true, Some(exp)) => intro.push_str(&format!(
            " In my most recent role as {} at {}, I built experience I would bring to your team.",
            exp.position, exp.company
        )),
        (true, None) => {}
    }

    let top_skills: Vec<&str> = context
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .take(FALLBACK_SKILL_COUNT)
        .collect();

    let mut paragraphs = vec!["Dear Hiring Manager,".to_string(), intro];
    if !top_skills.is_empty() {
        paragraphs.push(format!(
            "My strengths include {}, and I am confident they align with the needs of this role.",
            join_natural(&top_skills)
        ));
    }
    paragraphs.push(
        "Thank you for considering my application. I would welcome the opportunity to discuss \
         how my background can contribute to your organization."
            .to_string(),
    );

    let mut closing = format!("Sincerely,\n{}", info.full_name().trim());
    let contact: Vec<&str> = [&info.email, &info.phone, &info.location]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !contact.is_empty() {
        closing.push('\n');
        closing.push_str(&contact.join(" | "));
    }
    paragraphs.push(closing);

    paragraphs.join("\n\n")
}

/// "a", "a and b", "a, b and c".
fn join_natural(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::scripted::ScriptedLlm;

    fn context() -> CoverLetterContext {
        CoverLetterContext {
            personal_info: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                title: "Backend Engineer".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
                location: "London".to_string(),
                summary: None,
            },
            experience: vec![Experience {
                position: "Engineer".to_string(),
                company: "Analytical Engines".to_string(),
                description: "Wrote programs.".to_string(),
                ..Default::default()
            }],
            skills: vec![
                "Rust".to_string(),
                " ".to_string(),
                "SQL".to_string(),
                "Go".to_string(),
                "Kubernetes".to_string(),
            ],
        }
    }

    #[test]
    fn test_fallback_letter_uses_resume_fields() {
        let letter = fallback_letter(&context());
        assert!(letter.starts_with("Dear Hiring Manager,"));
        assert!(letter.contains("As a Backend Engineer"));
        assert!(letter.contains("Engineer at Analytical Engines"));
        assert!(letter.contains("Rust, SQL and Go"));
        assert!(!letter.contains("Kubernetes"));
        assert!(letter.contains("Sincerely,\nAda Lovelace\nada@example.com | 555-0100 | London"));
        assert!(!letter.contains('['));
    }

    #[test]
    fn test_fallback_letter_without_experience_or_skills() {
        let mut ctx = context();
        ctx.experience.clear();
        ctx.skills.clear();
        ctx.personal_info.phone.clear();
        let letter = fallback_letter(&ctx);
        assert!(letter.contains("As a Backend Engineer, I would bring"));
        assert!(!letter.contains("My strengths include"));
        assert!(letter.ends_with("ada@example.com | London"));
    }

    #[test]
    fn test_join_natural() {
        assert_eq!(join_natural(&[]), "");
        assert_eq!(join_natural(&["Rust"]), "Rust");
        assert_eq!(join_natural(&["Rust", "Go"]), "Rust and Go");
        assert_eq!(join_natural(&["Rust", "Go", "SQL"]), "Rust, Go and SQL");
    }

    #[test]
    fn test_prompt_includes_tone_guidance() {
        let system = build_system(Tone::Formal);
        assert!(system.contains("formal tone"));
        assert!(system.contains("contractions"));
        assert!(system.contains("[Company Name]"));

        let prompt = build_prompt(&context(), "Rust platform role", Tone::Formal);
        assert!(prompt.contains("- Engineer at Analytical Engines: Wrote programs."));
        assert!(prompt.contains("Rust platform role"));
        assert!(!prompt.contains("{tone}"));
    }

    #[tokio::test]
    async fn test_generate_returns_raw_text() {
        let llm = ScriptedLlm::new().reply("Dear team,\n\n{not json}");
        let content = generate_cover_letter(
            &llm,
            FailurePolicy::Fail,
            &context(),
            "Rust role",
            Tone::Professional,
        )
        .await
        .unwrap();
        assert_eq!(content, "Dear team,\n\n{not json}");

        let request = llm.last_request().unwrap();
        assert!(!request.json_output);
        assert_eq!(request.temperature, COVER_LETTER_TEMPERATURE);
    }

    #[tokio::test]
    async fn test_generate_empty_reply_is_empty_letter() {
        let llm = ScriptedLlm::new().reply("");
        let content =
            generate_cover_letter(&llm, FailurePolicy::Fail, &context(), "", Tone::Friendly)
                .await
                .unwrap();
        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn test_generate_failure_policies() {
        let llm = ScriptedLlm::new().fail("quota exceeded");
        let err = generate_cover_letter(&llm, FailurePolicy::Fail, &context(), "", Tone::Formal)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));

        let llm = ScriptedLlm::new().fail("quota exceeded");
        let content =
            generate_cover_letter(&llm, FailurePolicy::Degrade, &context(), "", Tone::Formal)
                .await
                .unwrap();
        assert_eq!(content, fallback_letter(&context()));
    }
}
