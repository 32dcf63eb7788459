//! Resume rendering.
//!
//! All three layouts share `templates/resume.html`. What differs between them is carried by
//! a `TemplateStyle`, so adding a layout means adding a descriptor, not markup.
//! Every piece of user text goes through askama's HTML escaping.

pub mod handlers;
pub mod pdf;

use askama::Template;

use crate::models::resume::{Resume, TemplateId};

/// Attribution mark composited into every non-premium export.
pub const WATERMARK: &str = "Generated with SmartResume";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateStyle {
    pub accent: &'static str,
    pub accent_soft: &'static str,
    pub heading_color: &'static str,
    pub org_color: &'static str,
    pub header_align: &'static str,
    pub heading_transform: &'static str,
    pub heading_spacing: &'static str,
    /// Rule under the header and each section title.
    pub heading_rule: bool,
    /// Full-height bar down the left edge of the page.
    pub accent_bar: bool,
    /// Skills as pill tags; otherwise a comma-separated line.
    pub skill_tags: bool,
    pub summary_heading: &'static str,
    pub experience_heading: &'static str,
}

pub fn style_for(template: TemplateId) -> TemplateStyle {
    match template {
        TemplateId::Modern => TemplateStyle {
            accent: "#2563eb",
            accent_soft: "#dbeafe",
            heading_color: "#0f172a",
            org_color: "#2563eb",
            header_align: "center",
            heading_transform: "none",
            heading_spacing: "normal",
            heading_rule: true,
            accent_bar: false,
            skill_tags: true,
            summary_heading: "Professional Summary",
            experience_heading: "Professional Experience",
        },
        TemplateId::Minimal => TemplateStyle {
            accent: "#475569",
            accent_soft: "#f1f5f9",
            heading_color: "#0f172a",
            org_color: "#334155",
            header_align: "left",
            heading_transform: "uppercase",
            heading_spacing: "0.05em",
            heading_rule: false,
            accent_bar: false,
            skill_tags: false,
            summary_heading: "Summary",
            experience_heading: "Experience",
        },
        TemplateId::Executive => TemplateStyle {
            accent: "#9333ea",
            accent_soft: "#f3e8ff",
            heading_color: "#9333ea",
            org_color: "#9333ea",
            header_align: "left",
            heading_transform: "uppercase",
            heading_spacing: "0.05em",
            heading_rule: false,
            accent_bar: true,
            skill_tags: true,
            summary_heading: "Executive Summary",
            experience_heading: "Professional Experience",
        },
    }
}

pub struct ExperienceView {
    pub position: String,
    pub company: String,
    pub dates: String,
    pub description: String,
}

pub struct EducationView {
    pub degree: String,
    pub school: String,
    pub graduation_date: String,
    /// Empty when no GPA was given.
    pub gpa: String,
}

#[derive(Template)]
#[template(path = "resume.html")]
pub struct ResumeDocument {
    pub style: TemplateStyle,
    pub template_id: &'static str,
    pub title: String,
    pub full_name: String,
    pub headline: String,
    pub contact: Vec<String>,
    pub summary: String,
    pub experience: Vec<ExperienceView>,
    pub education: Vec<EducationView>,
    pub skills: Vec<String>,
    pub skills_line: String,
    /// Empty for premium documents.
    pub watermark: &'static str,
}

impl ResumeDocument {
    /// Builds the view of a stored resume. Entries keep their stored order; blank skills
    /// and blank contact fields are not displayed.
    pub fn from_resume(resume: &Resume) -> Self {
        let info = &resume.personal_info;
        let skills: Vec<String> = resume
            .skills
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();

        Self {
            style: style_for(resume.template_id),
            template_id: resume.template_id.as_str(),
            title: resume.title.clone(),
            full_name: info.full_name().trim().to_string(),
            headline: info.title.clone(),
            contact: [&info.email, &info.phone, &info.location]
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .cloned()
                .collect(),
            summary: resume
                .summary
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            experience: resume
                .experience
                .iter()
                .map(|e| ExperienceView {
                    position: e.position.clone(),
                    company: e.company.clone(),
                    dates: e.date_range(),
                    description: e.description.clone(),
                })
                .collect(),
            education: resume
                .education
                .iter()
                .map(|e| EducationView {
                    degree: e.degree.clone(),
                    school: e.school.clone(),
                    graduation_date: e.graduation_date.clone(),
                    gpa: e.gpa.clone().unwrap_or_default(),
                })
                .collect(),
            skills_line: skills.join(", "),
            skills,
            watermark: if resume.is_premium { "" } else { WATERMARK },
        }
    }
}

/// Renders the printable HTML for a resume.
pub fn render_resume_html(resume: &Resume) -> Result<String, askama::Error> {
    ResumeDocument::from_resume(resume).render()
}
