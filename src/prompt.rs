use crate::shell::ShellInfo;

/// Message roles understood by chat-completion APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One role-tagged turn of the prompt sent to the completion API.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Build the fixed few-shot prompt around the user's description.
///
/// The shape is always: one system instruction naming the target shell and
/// OS, two illustrative description/command exchanges, and the real
/// description as the final user turn.
pub fn build_messages(shell: &ShellInfo, os_name: &str, description: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::new(
            Role::System,
            format!(
                "You are a smart bot that can generate {} commands on {} from a description provided by user.",
                shell.friendly_name, os_name
            ),
        ),
        ChatMessage::new(
            Role::User,
            "description='Remove all files starting with Screen in the current directory'",
        ),
        ChatMessage::new(Role::Assistant, "rm -rf Screen*"),
        ChatMessage::new(
            Role::User,
            "description='show the content for file named test.txt'",
        ),
        ChatMessage::new(Role::Assistant, "cat test.txt"),
        ChatMessage::new(Role::User, format!("description={}", description)),
    ]
}

/// Flatten the message sequence into a single text block for APIs that
/// take one prompt string instead of role-tagged messages.
pub fn render_transcript(messages: &[ChatMessage]) -> String {
    let mut transcript = String::new();
    for message in messages {
        transcript.push_str(message.role.as_str());
        transcript.push_str(": ");
        transcript.push_str(&message.content);
        transcript.push('\n');
    }
    transcript
}
