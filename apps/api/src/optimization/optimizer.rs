//! Resume optimization against a job description.
//!
//! Flow: build prompt → `complete_json` → merge the reply into the submitted form.
//!
//! The provider's reply is untrusted. Every field is read defensively and the match score
//! is always clamped into `0..=100`. Nothing here touches the store; callers persist the
//! returned form.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::FailurePolicy;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CompletionRequest, LlmProvider};
use crate::models::resume::{Experience, ResumeForm};
use crate::optimization::prompts::{OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_SYSTEM};

const OPTIMIZE_TEMPERATURE: f32 = 0.7;

/// The note returned in place of real optimizations when the provider is unavailable
/// and the service runs in degrade mode.
pub const DEGRADED_NOTE: &str =
    "AI optimization is temporarily unavailable. Your resume was kept unchanged.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    pub optimized_resume: ResumeForm,
    pub match_score: u8,
    pub optimizations: Vec<String>,
}

/// Optimizes `form` for `job_description` with one provider call.
///
/// Under `FailurePolicy::Fail` any provider or parse failure is an `AppError::Llm`.
/// Under `FailurePolicy::Degrade` it yields the form unchanged with a score of 0.
pub async fn optimize(
    llm: &dyn LlmProvider,
    policy: FailurePolicy,
    form: &ResumeForm,
    job_description: &str,
) -> Result<OptimizationOutcome, AppError> {
    let system = OPTIMIZE_SYSTEM.replace("{json_only}", JSON_ONLY_INSTRUCTION);
    let prompt = build_prompt(form, job_description);

    let reply = llm
        .complete_json(CompletionRequest {
            system: &system,
            prompt: &prompt,
            json_output: true,
            temperature: OPTIMIZE_TEMPERATURE,
        })
        .await;

    match reply {
        Ok(value) => {
            let outcome = merge_optimization(form, &value);
            info!(
                "Optimization via {} scored {}/100 with {} changes",
                llm.name(),
                outcome.match_score,
                outcome.optimizations.len()
            );
            Ok(outcome)
        }
        Err(e) => match policy {
            FailurePolicy::Fail => Err(AppError::Llm(format!("Optimization call failed: {e}"))),
            FailurePolicy::Degrade => {
                warn!("Optimization via {} failed, keeping resume unchanged: {e}", llm.name());
                Ok(OptimizationOutcome {
                    optimized_resume: form.clone(),
                    match_score: 0,
                    optimizations: vec![DEGRADED_NOTE.to_string()],
                })
            }
        },
    }
}

fn build_prompt(form: &ResumeForm, job_description: &str) -> String {
    let experience = form
        .experience
        .iter()
        .map(|e| format!("- {} at {}\n  {}", e.position, e.company, e.description))
        .collect::<Vec<_>>()
        .join("\n");
    let summary = form
        .personal_info
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or("No summary provided");

    OPTIMIZE_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{full_name}", &form.personal_info.full_name())
        .replace("{title}", &form.personal_info.title)
        .replace("{summary}", summary)
        .replace("{experience}", &experience)
        .replace("{skills}", &form.skills.join(", "))
}

// ────────────────────────────────────────────────────────────────────────────
// Reply merging
// ────────────────────────────────────────────────────────────────────────────

/// A job description counts only when it has non-whitespace content.
pub fn has_job_description(job_description: &str) -> bool {
    !job_description.trim().is_empty()
}

/// Merges a parsed provider reply into a copy of `form`.
pub fn merge_optimization(form: &ResumeForm, reply: &Value) -> OptimizationOutcome {
    let mut optimized = form.clone();

    let summary = non_empty_str(&reply["enhancedSummary"])
        .map(str::to_string)
        .or_else(|| form.personal_info.summary.clone())
        .unwrap_or_default();
    optimized.personal_info.summary = Some(summary);

    if let Some(entries) = reply["optimizedExperience"].as_array().filter(|a| !a.is_empty()) {
        let mut experience: Vec<Experience> = entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| merge_experience(entry, form.experience.get(i)))
            .collect();
        // A shorter reply never drops the remaining entries.
        experience.extend(form.experience.iter().skip(entries.len()).cloned());
        optimized.experience = experience;
    }

    if let Some(suggested) = reply["suggestedSkills"].as_array() {
        for skill in suggested.iter().filter_map(Value::as_str) {
            if !optimized.skills.iter().any(|s| s == skill) {
                optimized.skills.push(skill.to_string());
            }
        }
    }

    OptimizationOutcome {
        optimized_resume: optimized,
        match_score: clamp_score(&reply["matchScore"]),
        optimizations: read_optimizations(reply),
    }
}

/// Reads one optimized entry, inheriting any missing field from the original at the
/// same position. Entries that are not objects keep the original, or are dropped when
/// there is none.
fn merge_experience(entry: &Value, original: Option<&Experience>) -> Option<Experience> {
    let Some(fields) = entry.as_object() else {
        return original.cloned();
    };
    let base = original.cloned().unwrap_or_default();
    let text = |key: &str, fallback: String| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(fallback)
    };

    Some(Experience {
        position: text("position", base.position),
        company: text("company", base.company),
        start_date: text("startDate", base.start_date),
        end_date: match fields.get("endDate") {
            Some(Value::String(end)) => Some(end.clone()),
            _ => base.end_date,
        },
        current: fields
            .get("current")
            .and_then(Value::as_bool)
            .unwrap_or(base.current),
        description: text("description", base.description),
    })
}

/// Numbers are rounded, numeric strings are parsed, anything else scores 0.
pub fn clamp_score(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(score) if score.is_finite() => score.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

fn read_optimizations(reply: &Value) -> Vec<String> {
    if let Some(items) = reply["optimizations"].as_array() {
        return items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
    }
    non_empty_str(&reply["feedback"])
        .map(|feedback| vec![feedback.to_string()])
        .unwrap_or_default()
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::llm_client::scripted::ScriptedLlm;
    use crate::models::resume::{Education, PersonalInfo, TemplateId};

    fn sample_form() -> ResumeForm {
        ResumeForm {
            title: "SWE".to_string(),
            personal_info: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                title: "Backend Engineer".to_string(),
                email: "ada@example.com".to_string(),
                summary: Some("Builds services.".to_string()),
                ..Default::default()
            },
            experience: vec![Experience {
                position: "Engineer".to_string(),
                company: "Analytical Engines".to_string(),
                start_date: "2020-01".to_string(),
                end_date: None,
                current: true,
                description: "Wrote programs.".to_string(),
            }],
            education: vec![Education {
                degree: "BSc".to_string(),
                school: "London".to_string(),
                graduation_date: "2019".to_string(),
                gpa: None,
            }],
            skills: vec!["Go".to_string(), "SQL".to_string()],
            template_id: TemplateId::Modern,
            job_description: None,
        }
    }

    #[test]
    fn test_clamp_score_bounds() {
        assert_eq!(clamp_score(&json!(88)), 88);
        assert_eq!(clamp_score(&json!(140)), 100);
        assert_eq!(clamp_score(&json!(-5)), 0);
        assert_eq!(clamp_score(&json!(72.6)), 73);
        assert_eq!(clamp_score(&json!(" 64 ")), 64);
        assert_eq!(clamp_score(&json!("high")), 0);
        assert_eq!(clamp_score(&json!(null)), 0);
        assert_eq!(clamp_score(&json!([90])), 0);
        assert_eq!(clamp_score(&json!(1e308)), 100);
    }

    #[test]
    fn test_merge_full_reply() {
        let form = sample_form();
        let reply = json!({
            "matchScore": 88,
            "enhancedSummary": "Backend engineer shipping Go on Kubernetes.",
            "optimizedExperience": [{
                "position": "Engineer",
                "company": "Analytical Engines",
                "startDate": "2020-01",
                "current": true,
                "description": "Built Go services deployed on Kubernetes."
            }],
            "suggestedSkills": ["Kubernetes", "Go"],
            "optimizations": ["Rewrote summary", "Added Kubernetes"]
        });

        let outcome = merge_optimization(&form, &reply);
        assert_eq!(outcome.match_score, 88);
        assert_eq!(
            outcome.optimized_resume.personal_info.summary.as_deref(),
            Some("Backend engineer shipping Go on Kubernetes.")
        );
        assert_eq!(
            outcome.optimized_resume.experience[0].description,
            "Built Go services deployed on Kubernetes."
        );
        assert_eq!(outcome.optimized_resume.skills, vec!["Go", "SQL", "Kubernetes"]);
        assert_eq!(outcome.optimizations.len(), 2);
        assert_eq!(outcome.optimized_resume.education, form.education);
    }

    #[test]
    fn test_merge_empty_reply_falls_back_to_input() {
        let form = sample_form();
        let outcome = merge_optimization(&form, &json!({}));
        assert_eq!(outcome.match_score, 0);
        assert_eq!(outcome.optimized_resume, form);
        assert!(outcome.optimizations.is_empty());
    }

    #[test]
    fn test_merge_without_any_summary_is_empty_string() {
        let mut form = sample_form();
        form.personal_info.summary = None;
        let outcome = merge_optimization(&form, &json!({"enhancedSummary": ""}));
        assert_eq!(outcome.optimized_resume.personal_info.summary.as_deref(), Some(""));
    }

    #[test]
    fn test_partial_experience_entries_inherit_original_fields() {
        let form = sample_form();
        let reply = json!({
            "optimizedExperience": [
                {"description": "Automated difference tables."},
                {"position": "Consultant", "company": "Babbage & Co"}
            ]
        });
        let experience = merge_optimization(&form, &reply).optimized_resume.experience;
        assert_eq!(experience.len(), 2);
        assert_eq!(experience[0].company, "Analytical Engines");
        assert!(experience[0].current);
        assert_eq!(experience[0].description, "Automated difference tables.");
        assert_eq!(experience[1].position, "Consultant");
        assert!(experience[1].description.is_empty());
    }

    #[test]
    fn test_non_object_experience_entry_keeps_original() {
        let form = sample_form();
        let reply = json!({"optimizedExperience": ["rewrite me", "and me"]});
        let experience = merge_optimization(&form, &reply).optimized_resume.experience;
        assert_eq!(experience, form.experience);
    }

    #[test]
    fn test_short_experience_reply_keeps_trailing_entries() {
        let mut form = sample_form();
        for (position, company) in [("Analyst", "Looms"), ("Intern", "Babbage")] {
            form.experience.push(Experience {
                position: position.to_string(),
                company: company.to_string(),
                start_date: "2018-01".to_string(),
                end_date: Some("2019-12".to_string()),
                current: false,
                description: "Earlier work.".to_string(),
            });
        }
        let reply = json!({
            "optimizedExperience": [{"description": "Built Go services on Kubernetes."}]
        });

        let experience = merge_optimization(&form, &reply).optimized_resume.experience;
        assert_eq!(experience.len(), 3);
        assert_eq!(experience[0].description, "Built Go services on Kubernetes.");
        assert_eq!(experience[0].company, "Analytical Engines");
        assert_eq!(experience[1..], form.experience[1..]);
    }

    #[test]
    fn test_blank_job_description_does_not_count() {
        assert!(has_job_description("Go role"));
        assert!(!has_job_description(""));
        assert!(!has_job_description("  \n\t "));
    }

    #[test]
    fn test_feedback_becomes_single_optimization() {
        let outcome = merge_optimization(&sample_form(), &json!({"feedback": "Tightened wording."}));
        assert_eq!(outcome.optimizations, vec!["Tightened wording."]);
    }

    #[test]
    fn test_skills_keep_duplicates_from_input() {
        let mut form = sample_form();
        form.skills = vec!["Go".to_string(), "Go".to_string(), " ".to_string()];
        let outcome = merge_optimization(&form, &json!({"suggestedSkills": ["go", 7, "Go"]}));
        assert_eq!(outcome.optimized_resume.skills, vec!["Go", "Go", " ", "go"]);
    }

    #[test]
    fn test_prompt_carries_resume_and_job_description() {
        let prompt = build_prompt(&sample_form(), "Backend engineer, Go, Kubernetes");
        assert!(prompt.contains("Backend engineer, Go, Kubernetes"));
        assert!(prompt.contains("Name: Ada Lovelace"));
        assert!(prompt.contains("- Engineer at Analytical Engines"));
        assert!(prompt.contains("Current Skills: Go, SQL"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[tokio::test]
    async fn test_optimize_parses_reply_wrapped_in_prose() {
        let llm = ScriptedLlm::new().reply("Sure!\n```json\n{\"matchScore\": 91}\n```");
        let outcome = optimize(&llm, FailurePolicy::Fail, &sample_form(), "Go role")
            .await
            .unwrap();
        assert_eq!(outcome.match_score, 91);

        let request = llm.last_request().unwrap();
        assert!(request.json_output);
        assert_eq!(request.temperature, OPTIMIZE_TEMPERATURE);
        assert!(request.system.contains("valid JSON object"));
    }

    #[tokio::test]
    async fn test_optimize_fails_without_json() {
        let llm = ScriptedLlm::new().reply("I cannot help with that.");
        let err = optimize(&llm, FailurePolicy::Fail, &sample_form(), "Go role")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(llm.calls(), 1);
    }

    #[tokio::test]
    async fn test_optimize_degrades_when_configured() {
        let form = sample_form();
        let llm = ScriptedLlm::new().fail("provider down");
        let outcome = optimize(&llm, FailurePolicy::Degrade, &form, "Go role")
            .await
            .unwrap();
        assert_eq!(outcome.optimized_resume, form);
        assert_eq!(outcome.match_score, 0);
        assert_eq!(outcome.optimizations, vec![DEGRADED_NOTE]);
    }
}
