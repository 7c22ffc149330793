//! LLM prompts for job extraction.

/// System prompt: the output contract.
pub const EXTRACT_JOB_SYSTEM_PROMPT: &str = r#"You extract structured data from job postings.

Return ONLY a single JSON object, with no prose and no Markdown fences, using exactly these keys:
{
    "title": "job title, string or null",
    "company": "hiring company name, string or null",
    "location": "city/region/country or 'Remote', string or null",
    "job_type": "one of full-time | part-time | contract | internship | casual, or null",
    "salary_min": "lower salary bound as a number, or null",
    "salary_max": "upper salary bound as a number, or null",
    "salary_currency": "ISO 4217 code such as NZD, AUD, USD, or null",
    "description": "summary of the role, string or null",
    "requirements": "skills, experience and qualifications asked for, string or null",
    "benefits": "perks and benefits offered, string or null",
    "posted_date": "YYYY-MM-DD or null",
    "deadline": "application closing date as YYYY-MM-DD or null",
    "application_url": "URL to apply, string or null"
}

Rules:
- Use null for anything the posting does not state. Never invent values.
- Salaries are plain numbers without currency symbols or thousands separators.
- If only one salary figure is given, use it for both salary_min and salary_max.
- Ignore navigation, cookie banners, related jobs and other page chrome."#;

/// User prompt template.
pub const EXTRACT_JOB_USER_PROMPT: &str = r#"{language_instruction}Source URL: {url}

Job posting content:
{content}"#;

/// Human-readable name for a language code, falling back to the code itself.
pub fn language_name(code: &str) -> &str {
    match code.trim().to_lowercase().as_str() {
        "zh" | "zh-cn" | "zh-hans" => "Simplified Chinese",
        "zh-tw" | "zh-hant" => "Traditional Chinese",
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "ja" => "Japanese",
        "ko" => "Korean",
        "mi" => "Te Reo Māori",
        _ => code,
    }
}

/// Format the user prompt.
///
/// `content` should already be converted and truncated.
pub fn format_extract_prompt(content: &str, url: Option<&str>, language: Option<&str>) -> String {
    let language_instruction = match language.map(str::trim).filter(|l| !l.is_empty()) {
        Some(code) => format!(
            "Write description, requirements and benefits in {}. Keep title and company as written in the posting.\n\n",
            language_name(code)
        ),
        None => String::new(),
    };

    EXTRACT_JOB_USER_PROMPT
        .replace("{language_instruction}", &language_instruction)
        .replace("{url}", url.unwrap_or("unknown"))
        .replace("{content}", content)
}
