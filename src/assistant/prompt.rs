//! Prompt sent to the model for each question.

/// Support contact named when no `ASSISTANT_SUPPORT_CONTACT` is configured.
pub const DEFAULT_SUPPORT_CONTACT: &str = "the product support team";

const ANSWER_TEMPLATE: &str = "\
You answer questions about VPC networking documentation.
Pay attention to the tone of the question and use it to judge how familiar \
the user is with the product technically, then pitch your answer at that level.
If you do not know the answer, say so and advise the user to seek help via {support}.

Question: {question}
Answer tailored to the technical familiarity of the user:";

/// Render the answer prompt for `question`.
#[must_use]
pub fn render_answer_prompt(question: &str, support_contact: &str) -> String {
    let (head, tail) = ANSWER_TEMPLATE
        .split_once("{question}")
        .unwrap_or((ANSWER_TEMPLATE, ""));
    let mut prompt = head.replace("{support}", support_contact);
    prompt.push_str(question);
    prompt.push_str(tail);
    prompt
}
