pub mod openai;
mod prompt_builder;
mod prompts;

use anyhow::Result;

/// First choice of a chat completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub finish_reason: Option<String>,
}

/// Trait for talking to an LLM.
///
/// Backends only implement [`LlmClient::request`]; the prompt-specific
/// operations are built on top of it.
pub trait LlmClient {
    /// Send `prompt` as a single user message and return the first choice.
    fn request(&self, prompt: &str) -> Result<Completion>;

    /// Review a unified diff. Returns either "Looks good to me." or a numbered list.
    fn request_review(&self, diff: &str) -> Result<String> {
        let prompt = prompt_builder::review_prompt(diff);
        log::trace!("Review prompt:\n{}", truncate(&prompt, 3000));

        let completion = self.request(&prompt)?;
        Ok(normalize_newlines(finished_text(&completion)))
    }

    /// Generate documentation comments for the items touched by a diff.
    ///
    /// The answer keeps the model's own line breaks since it is meant to be
    /// pasted into source code.
    fn request_docstring(&self, diff: &str) -> Result<String> {
        let prompt = prompt_builder::docstring_prompt(diff);
        log::trace!("Docstring prompt:\n{}", truncate(&prompt, 3000));

        let completion = self.request(&prompt)?;
        Ok(finished_text(&completion).to_string())
    }

    /// Suggest a variable name for `description` in four casing styles.
    fn request_naming(&self, description: &str) -> Result<String> {
        let prompt = prompt_builder::naming_prompt(description);
        log::trace!("Naming prompt:\n{}", prompt);

        let completion = self.request(&prompt)?;
        Ok(normalize_newlines(finished_text(&completion)))
    }
}

/// Trimmed answer text; warns when the model stopped early.
fn finished_text(completion: &Completion) -> &str {
    log::debug!("Finish reason: {:?}", completion.finish_reason);
    if completion.finish_reason.as_deref() == Some("length") {
        log::warn!("The response was cut off by the token limit");
    }
    completion.text.trim()
}

/// Turn every lone `\n` into `\n\n` so each line renders as its own paragraph.
/// Runs of two or more newlines are kept as they are.
pub fn normalize_newlines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + text.len() / 8);

    for (i, &c) in chars.iter().enumerate() {
        out.push(c);
        if c != '\n' {
            continue;
        }

        let prev_is_newline = i > 0 && chars[i - 1] == '\n';
        let next_is_newline = chars.get(i + 1) == Some(&'\n');
        if !prev_is_newline && !next_is_newline {
            out.push('\n');
        }
    }

    out
}

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some((cut, _)) => format!(
            "{}...\n[truncated {} chars]",
            &s[..cut],
            s[cut..].chars().count()
        ),
    }
}
