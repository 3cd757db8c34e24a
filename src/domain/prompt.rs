use std::collections::HashMap;

use thiserror::Error;

use super::types::{ChatMessage, Role};

pub const QUESTION_VAR: &str = "question";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: &'static str },
    #[error("missing value for template variable '{0}'")]
    MissingVariable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A single role-tagged message with `{name}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub role: Role,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    pub fn parse(role: Role, template: &str) -> Result<Self, PromptError> {
        Ok(Self {
            role,
            segments: parse_segments(template)?,
        })
    }

    fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    fn render(&self, vars: &HashMap<&str, &str>) -> Result<ChatMessage, PromptError> {
        let mut content = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => content.push_str(text),
                Segment::Var(name) => {
                    let value = vars
                        .get(name.as_str())
                        .ok_or_else(|| PromptError::MissingVariable(name.clone()))?;
                    content.push_str(value);
                }
            }
        }
        Ok(ChatMessage::new(self.role, content))
    }
}

/// Ordered chat prompt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    messages: Vec<MessageTemplate>,
}

impl PromptTemplate {
    pub fn from_messages<'a>(
        messages: impl IntoIterator<Item = (Role, &'a str)>,
    ) -> Result<Self, PromptError> {
        let messages = messages
            .into_iter()
            .map(|(role, text)| MessageTemplate::parse(role, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { messages })
    }

    /// System instruction followed by `Question: {question}`
    pub fn question_answering(system_instruction: &str) -> Result<Self, PromptError> {
        // Braces in the instruction are literal text, not placeholders
        let system = system_instruction.replace('{', "{{").replace('}', "}}");
        Self::from_messages([
            (Role::System, system.as_str()),
            (Role::User, "Question: {question}"),
        ])
    }

    /// Placeholder names in first-appearance order, without duplicates
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.messages.iter().flat_map(|m| m.variables()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    pub fn render(&self, vars: &HashMap<&str, &str>) -> Result<Vec<ChatMessage>, PromptError> {
        self.messages.iter().map(|m| m.render(vars)).collect()
    }
}

fn parse_segments(template: &str) -> Result<Vec<Segment>, PromptError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                literal.push('{');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(PromptError::Malformed {
                        position: pos,
                        reason: "unclosed '{'",
                    });
                }
                if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    return Err(PromptError::Malformed {
                        position: pos,
                        reason: "placeholder name must be a non-empty identifier",
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Var(name));
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(PromptError::Malformed {
                    position: pos,
                    reason: "unmatched '}'",
                });
            }
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTRUCTION: &str = "You are a helpful assistant. Please respond to the question.";

    fn question(q: &str) -> HashMap<&str, &str> {
        HashMap::from([(QUESTION_VAR, q)])
    }

    #[test]
    fn renders_question_into_user_message() {
        let template = PromptTemplate::question_answering(INSTRUCTION).unwrap();

        for q in ["ping", "What is Rust?", "  spaced  ", "ünïcødé {braces}"] {
            let messages = template.render(&question(q)).unwrap();
            assert_eq!(messages.len(), 2);
            assert_eq!(messages[0], ChatMessage::new(Role::System, INSTRUCTION));
            assert_eq!(messages[1], ChatMessage::new(Role::User, format!("Question: {}", q)));
        }
    }

    #[test]
    fn rendering_does_not_change_the_template() {
        let template = PromptTemplate::question_answering(INSTRUCTION).unwrap();
        let before = template.clone();

        let first = template.render(&question("a")).unwrap();
        let _ = template.render(&question("b")).unwrap();
        let again = template.render(&question("a")).unwrap();

        assert_eq!(first, again);
        assert_eq!(template, before);
    }

    #[test]
    fn lists_input_variables() {
        let template = PromptTemplate::question_answering(INSTRUCTION).unwrap();
        assert_eq!(template.input_variables(), vec!["question"]);

        let template =
            PromptTemplate::from_messages([(Role::User, "{a} and {b} then {a}")]).unwrap();
        assert_eq!(template.input_variables(), vec!["a", "b"]);
    }

    #[test]
    fn missing_variable_is_an_error() {
        let template = PromptTemplate::question_answering(INSTRUCTION).unwrap();
        let err = template.render(&HashMap::new()).unwrap_err();
        assert_eq!(err, PromptError::MissingVariable("question".to_string()));
    }

    #[test]
    fn doubled_braces_are_literal() {
        let template = PromptTemplate::from_messages([(Role::User, "{{json}} {x}}}")]).unwrap();
        let messages = template.render(&HashMap::from([("x", "1")])).unwrap();
        assert_eq!(messages[0].content, "{json} 1}");
        assert!(template.input_variables() == vec!["x"]);
    }

    #[test]
    fn instruction_braces_are_escaped() {
        let template = PromptTemplate::question_answering("Reply as {json}").unwrap();
        let messages = template.render(&question("q")).unwrap();
        assert_eq!(messages[0].content, "Reply as {json}");
        assert_eq!(template.input_variables(), vec!["question"]);
    }

    #[test]
    fn rejects_malformed_templates() {
        for bad in ["{open", "close}", "{}", "{two words}"] {
            let result = PromptTemplate::from_messages([(Role::User, bad)]);
            assert!(
                matches!(result, Err(PromptError::Malformed { .. })),
                "expected malformed error for {:?}",
                bad
            );
        }
    }
}
