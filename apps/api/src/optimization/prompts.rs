// LLM prompt constants for resume optimization.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for optimization. Replace `{json_only}` before sending.
pub const OPTIMIZE_SYSTEM: &str = "You are an expert resume optimizer and ATS specialist. \
    Your task is to analyze a job description and optimize a resume to maximize the match score \
    and improve ATS compatibility. {json_only}";

/// Optimization prompt template. Replace every `{placeholder}` before sending.
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Job Description:
{job_description}

Current Resume Data:
Name: {full_name}
Title: {title}
Summary: {summary}

Experience:
{experience}

Current Skills: {skills}

Analyze this job description and optimize the resume for maximum ATS compatibility and relevance. Focus on:
1. Calculating an accurate match score between 0 and 100
2. Enhancing the professional summary with relevant keywords
3. Rewriting each experience description with action verbs, quantifiable achievements and keywords from the job description
4. Suggesting additional relevant skills from the job description
5. Listing each change you made

Keep every experience entry in the same order. Do not invent employers, positions or dates.

Return a JSON object with this EXACT schema:
{
  "matchScore": 0,
  "enhancedSummary": "optimized professional summary",
  "optimizedExperience": [
    {
      "position": "same as input",
      "company": "same as input",
      "startDate": "same as input",
      "endDate": "same as input",
      "current": false,
      "description": "optimized description"
    }
  ],
  "suggestedSkills": ["skill"],
  "optimizations": ["short description of one change"],
  "feedback": "brief explanation of the changes made"
}"#;
