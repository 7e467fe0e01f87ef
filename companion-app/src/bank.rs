use companion_core::{CoreError, QuizCategory};
use std::fs;
use std::path::Path;

const BUNDLED: &str = include_str!("../data/questions.json");

/// Question bank from `path`, or the bundled one.
pub fn load_bank(path: Option<&Path>) -> Result<Vec<QuizCategory>, CoreError> {
    let raw = match path {
        Some(p) => fs::read_to_string(p)
            .map_err(|e| CoreError::Config(format!("{}: {e}", p.display())))?,
        None => BUNDLED.to_string(),
    };
    let bank: Vec<QuizCategory> =
        serde_json::from_str(&raw).map_err(|e| CoreError::Config(format!("question bank: {e}")))?;
    for cat in &bank {
        if let Some(q) = cat
            .questions
            .iter()
            .find(|q| q.correct_answer >= q.options.len())
        {
            return Err(CoreError::Config(format!(
                "question bank: '{}' in {} has no option {}",
                q.question, cat.slug, q.correct_answer
            )));
        }
    }
    Ok(bank)
}
