// LLM prompt constants for cover letter generation.

/// System prompt. Replace `{tone}`, `{voice}`, `{prefer}`, `{avoid}` and `{plain_text}`.
pub const COVER_LETTER_SYSTEM: &str = "You are an expert cover letter writer. \
    Create compelling, personalized cover letters that highlight relevant experience and \
    demonstrate genuine interest in the role. Write in a {tone} tone: {voice}. \
    Favour language such as: {prefer}. Avoid: {avoid}. {plain_text}";

/// Cover letter prompt template. Replace every `{placeholder}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Create a cover letter for the following:

Personal Information:
- Name: {full_name}
- Title: {title}
- Email: {email}
- Phone: {phone}
- Location: {location}

Relevant Experience:
{experience}

Skills: {skills}

Job Description:
{job_description}

Requirements:
1. Start with a compelling opening that shows genuine interest
2. Highlight the most relevant experiences that match the job requirements
3. Demonstrate knowledge of the company and role
4. Include a strong closing with a call to action
5. Keep it concise (3-4 paragraphs)
6. Use a {tone} tone throughout
7. Avoid generic phrases and clichés

Provide only the cover letter content, no additional formatting or explanations."#;
