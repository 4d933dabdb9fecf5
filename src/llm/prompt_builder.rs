use crate::llm::prompts;

fn fenced_diff(diff: &str) -> String {
    format!(
        "{begin}\n{diff}\n{end}",
        begin = prompts::DIFF_BEGIN,
        diff = diff,
        end = prompts::DIFF_END
    )
}

pub fn review_prompt(diff: &str) -> String {
    let answer_format = prompts::REVIEW_ANSWER_FORMAT.replace("{lgtm}", prompts::LGTM);

    format!(
        "{instructions}\n\nThe changes to review are:\n{diff}\n\n{answer_format}",
        instructions = prompts::REVIEW_INSTRUCTIONS,
        diff = fenced_diff(diff),
        answer_format = answer_format
    )
}

pub fn docstring_prompt(diff: &str) -> String {
    format!(
        "{instructions}\n\nThe changes are:\n{diff}",
        instructions = prompts::DOCSTRING_INSTRUCTIONS,
        diff = fenced_diff(diff)
    )
}

pub fn naming_prompt(description: &str) -> String {
    format!(
        "{instructions}\n\nDescription: {description}",
        instructions = prompts::NAMING_INSTRUCTIONS,
        description = description.trim()
    )
}
