//! Prompt assembly for grounded question answering.

use bothive_core::Language;

/// Build the generation prompt: retrieved passages, then the question, with
/// an instruction to stay inside the provided context.
pub fn build_prompt(contexts: &[String], question: &str, lang: Language) -> String {
    let context = contexts.join("\n\n");
    let language_rule = match lang {
        Language::En => "Answer in English.",
        Language::Hi => "Answer in Hindi (Devanagari script).",
    };
    format!(
        "You are a helpful assistant for a business. Answer the question using \
         ONLY the information below. If the information does not contain the \
         answer, say you don't know and suggest contacting the business. Keep \
         the answer short and friendly. {}\n\n\
         Information:\n{}\n\n\
         Question: {}\n\n\
         Answer:",
        language_rule, context, question
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_context_and_question() {
        let prompt = build_prompt(
            &["We open at 9am.".to_string(), "Closed on Sundays.".to_string()],
            "When do you open?",
            Language::En,
        );
        assert!(prompt.contains("We open at 9am."));
        assert!(prompt.contains("Closed on Sundays."));
        assert!(prompt.contains("Question: When do you open?"));
        assert!(prompt.contains("Answer in English."));
    }

    #[test]
    fn test_hindi_instruction() {
        let prompt = build_prompt(&["ctx".to_string()], "q", Language::Hi);
        assert!(prompt.contains("Hindi"));
    }
}
