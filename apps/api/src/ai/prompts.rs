// Prompt text sent to the model and the descriptions stored for operations
// that have no user-written prompt.

/// Wrapped around the extracted resume text. `{resume_text}` is replaced verbatim.
pub const RESUME_REVIEW_PROMPT: &str = "Review the following resume and provide constructive \
feedback on its strengths, weaknesses, and areas for improvement. Resume Content:\n\n{resume_text}";

pub const REMOVE_BACKGROUND_DESCRIPTION: &str = "Remove background from image";
pub const RESUME_REVIEW_DESCRIPTION: &str = "Review the uploaded resume";

pub fn resume_review_prompt(resume_text: &str) -> String {
    RESUME_REVIEW_PROMPT.replace("{resume_text}", resume_text)
}

pub fn remove_object_description(object: &str) -> String {
    format!("Removed {object} from image")
}
