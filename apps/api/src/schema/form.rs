//! Resume submission shapes.
//!
//! Request bodies deserialize into the all-optional `*Input` types first so that every
//! missing or empty field is reported at once, then `validate` / `validate_partial`
//! produce the trusted models. No normalization happens here: strings are kept exactly
//! as submitted and skills keep duplicates and blank entries.

use serde::Deserialize;
use serde_json::Value;

use crate::models::resume::{Education, Experience, PersonalInfo, Resume, ResumeForm, TemplateId};
use crate::schema::validation::ValidationErrors;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceInput {
    pub position: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationInput {
    pub degree: Option<String>,
    pub school: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeInput {
    pub title: Option<String>,
    pub personal_info: Option<PersonalInfoInput>,
    pub experience: Option<Vec<ExperienceInput>>,
    pub education: Option<Vec<EducationInput>>,
    pub skills: Option<Vec<String>>,
    pub template_id: Option<String>,
    pub job_description: Option<String>,
}

/// A validated partial update. Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
    pub skills: Option<Vec<String>>,
    pub template_id: Option<TemplateId>,
    pub job_description: Option<String>,
}

impl ResumeInput {
    /// Decodes an arbitrary JSON body. Type mismatches (a number where a string belongs,
    /// a non-object body) are reported as a violation on `body`.
    pub fn from_json(value: Value) -> Result<Self, ValidationErrors> {
        serde_json::from_value(value)
            .map_err(|e| ValidationErrors::single("body", &format!("Malformed resume payload: {e}")))
    }

    /// Validates a complete submission.
    pub fn validate(self) -> Result<ResumeForm, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = errors.require("title", self.title, "Resume title is required");

        let personal_info = match self.personal_info {
            Some(info) => validate_personal_info(info, &mut errors),
            None => {
                errors.add("personalInfo", "Personal information is required");
                PersonalInfo::default()
            }
        };

        let experience = validate_list(
            self.experience,
            "experience",
            "At least one experience is required",
            &mut errors,
            validate_experience,
        );
        let education = validate_list(
            self.education,
            "education",
            "At least one education is required",
            &mut errors,
            validate_education,
        );
        let skills = validate_skills(self.skills, &mut errors);
        let template_id = validate_template(self.template_id, &mut errors);

        errors.into_result(ResumeForm {
            title,
            personal_info,
            experience,
            education,
            skills,
            template_id,
            job_description: self.job_description,
        })
    }

    /// Validates an edit: any subset of top-level fields, each checked in full when present.
    pub fn validate_partial(self) -> Result<ResumePatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self
            .title
            .map(|t| errors.require("title", Some(t), "Resume title is required"));
        let personal_info = self
            .personal_info
            .map(|info| validate_personal_info(info, &mut errors));
        let experience = self.experience.map(|entries| {
            validate_list(
                Some(entries),
                "experience",
                "At least one experience is required",
                &mut errors,
                validate_experience,
            )
        });
        let education = self.education.map(|entries| {
            validate_list(
                Some(entries),
                "education",
                "At least one education is required",
                &mut errors,
                validate_education,
            )
        });
        let skills = self
            .skills
            .map(|skills| validate_skills(Some(skills), &mut errors));
        let template_id = self
            .template_id
            .map(|id| validate_template(Some(id), &mut errors));

        errors.into_result(ResumePatch {
            title,
            personal_info,
            experience,
            education,
            skills,
            template_id,
            job_description: self.job_description,
        })
    }
}

impl ResumePatch {
    /// Writes the present fields onto `resume`. Replacing `personal_info` re-derives the
    /// denormalized summary; nothing else touches it.
    pub fn apply(self, resume: &mut Resume) {
        if let Some(title) = self.title {
            resume.title = title;
        }
        if let Some(info) = self.personal_info {
            resume.summary = info.summary.clone();
            resume.personal_info = info;
        }
        if let Some(experience) = self.experience {
            resume.experience = experience;
        }
        if let Some(education) = self.education {
            resume.education = education;
        }
        if let Some(skills) = self.skills {
            resume.skills = skills;
        }
        if let Some(template_id) = self.template_id {
            resume.template_id = template_id;
        }
        if let Some(job_description) = self.job_description {
            resume.job_description = Some(job_description);
        }
    }
}

fn validate_personal_info(input: PersonalInfoInput, errors: &mut ValidationErrors) -> PersonalInfo {
    PersonalInfo {
        first_name: errors.require(
            "personalInfo.firstName",
            input.first_name,
            "First name is required",
        ),
        last_name: errors.require(
            "personalInfo.lastName",
            input.last_name,
            "Last name is required",
        ),
        title: errors.require(
            "personalInfo.title",
            input.title,
            "Professional title is required",
        ),
        email: errors.require_email("personalInfo.email", input.email),
        phone: errors.require(
            "personalInfo.phone",
            input.phone,
            "Phone number is required",
        ),
        location: errors.require(
            "personalInfo.location",
            input.location,
            "Location is required",
        ),
        summary: input.summary,
    }
}

fn validate_experience(
    prefix: &str,
    input: ExperienceInput,
    errors: &mut ValidationErrors,
) -> Experience {
    Experience {
        position: errors.require(
            &format!("{prefix}.position"),
            input.position,
            "Position is required",
        ),
        company: errors.require(
            &format!("{prefix}.company"),
            input.company,
            "Company is required",
        ),
        start_date: errors.require(
            &format!("{prefix}.startDate"),
            input.start_date,
            "Start date is required",
        ),
        end_date: input.end_date,
        current: input.current.unwrap_or(false),
        description: errors.require(
            &format!("{prefix}.description"),
            input.description,
            "Description is required",
        ),
    }
}

fn validate_education(
    prefix: &str,
    input: EducationInput,
    errors: &mut ValidationErrors,
) -> Education {
    Education {
        degree: errors.require(
            &format!("{prefix}.degree"),
            input.degree,
            "Degree is required",
        ),
        school: errors.require(
            &format!("{prefix}.school"),
            input.school,
            "School is required",
        ),
        graduation_date: errors.require(
            &format!("{prefix}.graduationDate"),
            input.graduation_date,
            "Graduation date is required",
        ),
        gpa: input.gpa,
    }
}

fn validate_list<I, T>(
    entries: Option<Vec<I>>,
    field: &str,
    empty_message: &str,
    errors: &mut ValidationErrors,
    validate_entry: fn(&str, I, &mut ValidationErrors) -> T,
) -> Vec<T> {
    let entries = entries.unwrap_or_default();
    if entries.is_empty() {
        errors.add(field, empty_message);
    }
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| validate_entry(&format!("{field}[{i}]"), entry, errors))
        .collect()
}

fn validate_skills(skills: Option<Vec<String>>, errors: &mut ValidationErrors) -> Vec<String> {
    let skills = skills.unwrap_or_default();
    if skills.is_empty() {
        errors.add("skills", "At least one skill is required");
    }
    skills
}

fn validate_template(template_id: Option<String>, errors: &mut ValidationErrors) -> TemplateId {
    match template_id.as_deref() {
        None | Some("") => {
            errors.add("templateId", "Please select a template");
            TemplateId::default()
        }
        Some(id) => id.parse().unwrap_or_else(|_| {
            errors.add("templateId", "Template must be one of: modern, minimal, executive");
            TemplateId::default()
        }),
    }
}
