// Cross-cutting prompt fragments. Each service keeps its own prompts.rs alongside it.

/// Appended to system prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with a single valid JSON object. \
    Do NOT include explanations, apologies or markdown code fences.";

/// Appended to prompts whose reply is shown to the user verbatim.
pub const PLAIN_TEXT_INSTRUCTION: &str = "Respond with plain text only. \
    Do NOT use markdown, HTML, headings or bullet symbols. \
    Do NOT leave placeholders such as [Company Name], [Hiring Manager] or [Your Name]; \
    write around any detail you do not know.";
