//! Message formatters — pure translation from normalized history + new
//! message into each dialect's wire shape.
//!
//! Every formatter is total and deterministic: no I/O, no failure path.
//! Two invariants hold across all dialects:
//! - the newest user message is always last in any per-turn sequence;
//! - a `system` turn is either folded into a dedicated system field
//!   (Anthropic) or dropped (Gemini, Cohere) — never emitted as a turn with
//!   role `system` where the dialect has no such role.

use polychat_core::types::{ChatTurn, Role};
use serde::Serialize;

// ─────────────────────────────────────────────
// Flat turns (OpenAI, Mistral, Groq, OpenRouter)
// ─────────────────────────────────────────────

/// Verbatim pass-through of every history turn, new user message appended.
/// System turns survive unchanged — this dialect has a `system` role.
pub fn flat_turns(history: &[ChatTurn], new_message: &str) -> Vec<ChatTurn> {
    let mut messages: Vec<ChatTurn> = history.to_vec();
    messages.push(ChatTurn::user(new_message));
    messages
}

// ─────────────────────────────────────────────
// Split system (Anthropic)
// ─────────────────────────────────────────────

/// Extract system turns into a single accumulated system string (last one
/// wins — no merging); everything else passes through, new user message
/// appended. An empty string means no system turn was seen.
pub fn split_system(history: &[ChatTurn], new_message: &str) -> (Vec<ChatTurn>, String) {
    let mut messages = Vec::with_capacity(history.len() + 1);
    let mut system = String::new();

    for turn in history {
        if turn.role == Role::System {
            system = turn.content.clone();
        } else {
            messages.push(turn.clone());
        }
    }

    messages.push(ChatTurn::user(new_message));
    (messages, system)
}

// ─────────────────────────────────────────────
// Nested contents (Gemini)
// ─────────────────────────────────────────────

/// One entry in a Gemini `contents` array.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

/// A single text part.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Part {
    pub text: String,
}

/// Drop system turns; map `user`→`"user"` and anything else→`"model"`; wrap
/// each turn's content as a single text part; append the new message as a
/// final user content.
pub fn gemini_contents(history: &[ChatTurn], new_message: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .filter(|turn| turn.role != Role::System)
        .map(|turn| Content {
            role: match turn.role {
                Role::User => "user",
                _ => "model",
            },
            parts: vec![Part {
                text: turn.content.clone(),
            }],
        })
        .collect();

    contents.push(Content {
        role: "user",
        parts: vec![Part {
            text: new_message.to_string(),
        }],
    });

    contents
}

// ─────────────────────────────────────────────
// Single shot (Cohere)
// ─────────────────────────────────────────────

/// One entry in a Cohere `chat_history` array.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CohereTurn {
    pub role: &'static str,
    pub message: String,
}

/// The Cohere request core: the new message rides a separate top-level
/// field, not the history array.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CoherePayload {
    pub message: String,
    pub chat_history: Vec<CohereTurn>,
}

/// Drop system turns; map `user`→`"USER"` and anything else→`"CHATBOT"`.
pub fn cohere_payload(history: &[ChatTurn], new_message: &str) -> CoherePayload {
    let chat_history = history
        .iter()
        .filter(|turn| turn.role != Role::System)
        .map(|turn| CohereTurn {
            role: match turn.role {
                Role::User => "USER",
                _ => "CHATBOT",
            },
            message: turn.content.clone(),
        })
        .collect();

    CoherePayload {
        message: new_message.to_string(),
        chat_history,
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_history() -> Vec<ChatTurn> {
        vec![
            ChatTurn::system("Be terse"),
            ChatTurn::user("hi"),
            ChatTurn::assistant("hello"),
        ]
    }

    // ── flat_turns ──

    #[test]
    fn test_flat_empty_history() {
        let messages = flat_turns(&[], "hello");
        assert_eq!(messages, vec![ChatTurn::user("hello")]);
    }

    #[test]
    fn test_flat_preserves_system_turns() {
        let messages = flat_turns(&sample_history(), "again");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], ChatTurn::system("Be terse"));
        assert_eq!(messages[3], ChatTurn::user("again"));
    }

    #[test]
    fn test_flat_new_message_is_last() {
        // Even when history already ends in a user turn.
        let history = vec![ChatTurn::user("first")];
        let messages = flat_turns(&history, "second");
        assert_eq!(messages.last().unwrap(), &ChatTurn::user("second"));
    }

    // ── split_system ──

    #[test]
    fn test_split_extracts_system() {
        let history = vec![ChatTurn::system("Be terse"), ChatTurn::user("hi")];
        let (messages, system) = split_system(&history, "again");

        assert_eq!(
            messages,
            vec![ChatTurn::user("hi"), ChatTurn::user("again")]
        );
        assert_eq!(system, "Be terse");
    }

    #[test]
    fn test_split_one_system_one_user() {
        let history = vec![ChatTurn::system("Short answers"), ChatTurn::user("hey")];
        let (messages, system) = split_system(&history, "go");

        // The user turn plus the appended message; system is extracted.
        assert_eq!(messages.len(), 2);
        assert!(!system.is_empty());
        assert_eq!(system, "Short answers");
    }

    #[test]
    fn test_split_last_system_wins() {
        let history = vec![
            ChatTurn::system("first"),
            ChatTurn::user("hi"),
            ChatTurn::system("second"),
        ];
        let (_, system) = split_system(&history, "go");
        assert_eq!(system, "second");
    }

    #[test]
    fn test_split_no_system() {
        let history = vec![ChatTurn::user("hi")];
        let (messages, system) = split_system(&history, "go");
        assert_eq!(messages.len(), 2);
        assert_eq!(system, "");
    }

    #[test]
    fn test_split_empty_history() {
        let (messages, system) = split_system(&[], "hello");
        assert_eq!(messages, vec![ChatTurn::user("hello")]);
        assert_eq!(system, "");
    }

    #[test]
    fn test_split_all_system_history() {
        let history = vec![ChatTurn::system("a"), ChatTurn::system("b")];
        let (messages, system) = split_system(&history, "go");
        assert_eq!(messages, vec![ChatTurn::user("go")]);
        assert_eq!(system, "b");
    }

    // ── gemini_contents ──

    #[test]
    fn test_gemini_length_without_system() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let contents = gemini_contents(&history, "go");
        assert_eq!(contents.len(), history.len() + 1);
    }

    #[test]
    fn test_gemini_role_remap() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let contents = gemini_contents(&history, "go");

        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        assert_eq!(contents[2].parts, vec![Part { text: "go".to_string() }]);
    }

    #[test]
    fn test_gemini_drops_system_turns() {
        let contents = gemini_contents(&sample_history(), "go");
        // system dropped: user + assistant + new message
        assert_eq!(contents.len(), 3);
        assert!(contents.iter().all(|c| c.role == "user" || c.role == "model"));
    }

    #[test]
    fn test_gemini_empty_history() {
        let contents = gemini_contents(&[], "hello");
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[0].parts[0].text, "hello");
    }

    #[test]
    fn test_gemini_wire_shape() {
        let json = serde_json::to_value(gemini_contents(&[], "hi")).unwrap();
        assert_eq!(json[0]["parts"][0]["text"], "hi");
    }

    // ── cohere_payload ──

    #[test]
    fn test_cohere_message_not_in_history() {
        let history = vec![ChatTurn::user("hi"), ChatTurn::assistant("hello")];
        let payload = cohere_payload(&history, "go");

        assert_eq!(payload.message, "go");
        assert_eq!(payload.chat_history.len(), 2);
        assert!(payload.chat_history.iter().all(|t| t.message != "go"));
    }

    #[test]
    fn test_cohere_role_remap() {
        let payload = cohere_payload(&sample_history(), "go");
        // system dropped
        assert_eq!(payload.chat_history.len(), 2);
        assert_eq!(payload.chat_history[0].role, "USER");
        assert_eq!(payload.chat_history[1].role, "CHATBOT");
    }

    #[test]
    fn test_cohere_empty_history() {
        let payload = cohere_payload(&[], "hello");
        assert_eq!(payload.message, "hello");
        assert!(payload.chat_history.is_empty());
    }

    // ── determinism ──

    #[test]
    fn test_formatters_are_idempotent() {
        let history = sample_history();

        assert_eq!(flat_turns(&history, "go"), flat_turns(&history, "go"));
        assert_eq!(split_system(&history, "go"), split_system(&history, "go"));
        assert_eq!(
            gemini_contents(&history, "go"),
            gemini_contents(&history, "go")
        );
        assert_eq!(
            cohere_payload(&history, "go"),
            cohere_payload(&history, "go")
        );
    }
}
