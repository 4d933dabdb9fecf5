pub const DIFF_BEGIN: &str = "==========BEGIN==========";
pub const DIFF_END: &str = "==========END==========";

/// Sentence the reviewer must answer with when it has nothing to point out.
pub const LGTM: &str = "Looks good to me.";

pub const REVIEW_INSTRUCTIONS: &str = r#"You are a senior software engineer performing a code review.
Review the changes below and check the following:
- Correctness: are there bugs, typos, or unhandled edge cases?
- Readability: is there code that is hard to follow?
- Efficiency: is there needless work or a clearly better approach?
- Modularity: is there a way to structurally or fundamentally improve the code?
- Conventions: does the code severely violate the conventions of its language or project?
The changes are a unified diff. Lines starting with + were added, lines starting with - were removed,
and all other lines are unchanged context."#;

pub const REVIEW_ANSWER_FORMAT: &str = r#"Answer format:
- If there is nothing to point out, reply with exactly: {lgtm}
- Otherwise reply only with a numbered list using ordinal numbers, like
1. ~~~~
2. ~~~~
3. ~~~~
... and so on. Do not add anything before or after the list."#;

pub const DOCSTRING_INSTRUCTIONS: &str = r#"You are an expert technical writer.
Write documentation comments for every function, method and class that appears in the changes below.
Rules:
- Detect the programming language and use its idiomatic documentation comment style.
- Describe the purpose of each item.
- Document every parameter and the return value.
- Document the errors or exceptions that can be raised.
- Reply only with the documented signatures, one block per item, without narration.
Lines starting with + were added and lines starting with - were removed."#;

pub const NAMING_INSTRUCTIONS: &str = r#"You are an expert programmer who is good at naming things.
Suggest one variable name for the value described below.
Reply with the same name in exactly these four styles and nothing else:
lowerCamelCase: ...
UpperCamelCase: ...
snake_case: ...
UPPER_SNAKE_CASE: ..."#;
