use serde::{Deserialize, Serialize};

pub const INTRO_MESSAGE: &str = "How about I help you learn about basics of investing? and every week I will share with you the information that will help you make investment decisions";
pub const CHIP_ACCEPT: &str = "Yes, that sounds good";
pub const CHIP_LEARN_ONLY: &str = "help me only learn";
pub const CHIP_INFORMATION_ONLY: &str = "Help me only with information";
pub const CHIP_FAST_MODEL: &str = "Fast and lightweight";
pub const CHIP_THOROUGH_MODEL: &str = "Thorough and detailed";
const FALLBACK_REPLY: &str =
    "I understand you're interested in that topic. What specific aspects would you like to know more about?";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversationState {
    #[default]
    Intro,
    Onboarding,
    LearningOnly,
    InformationOnly,
    ChoosingModel,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum ChatInput {
    Chip(String),
    Text(String),
}

impl ChatInput {
    pub fn text(&self) -> &str {
        match self {
            Self::Chip(text) | Self::Text(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotReply {
    pub content: String,
    pub chips: Vec<String>,
}

fn reply(content: &str, chips: &[&str]) -> BotReply {
    BotReply {
        content: content.to_string(),
        chips: chips.iter().map(ToString::to_string).collect(),
    }
}

fn fallback() -> BotReply {
    reply(
        FALLBACK_REPLY,
        &["Tell me more", "Can you give examples?", "What are the risks?"],
    )
}

impl ConversationState {
    /// Next state plus the bot turn, delivered in order.
    pub fn transition(self, input: &ChatInput) -> (ConversationState, Vec<BotReply>) {
        if let ChatInput::Chip(chip) = input {
            match chip.as_str() {
                CHIP_ACCEPT => {
                    return (
                        Self::Onboarding,
                        vec![
                            reply(
                                "Perfect! I'll set up a learning flow that walks you through the basics of investing, one topic each week.",
                                &[],
                            ),
                            reply(
                                "To tailor it, I'll need a bit of information from you. How much experience do you have with investing?",
                                &["I'm a complete beginner", "I know the basics", "I'm fairly experienced"],
                            ),
                        ],
                    )
                }
                CHIP_LEARN_ONLY => {
                    return (
                        Self::LearningOnly,
                        vec![reply(
                            "Got it. I'll focus on teaching you the fundamentals, one lesson at a time. Where would you like to start?",
                            &["Stocks and bonds", "Index funds", "Risk and diversification"],
                        )],
                    )
                }
                CHIP_INFORMATION_ONLY => {
                    return (
                        Self::InformationOnly,
                        vec![reply(
                            "Sure. I'll send you a weekly digest of market information without the lessons. Which markets interest you most?",
                            &["US stocks", "Global markets", "Crypto"],
                        )],
                    )
                }
                _ => {}
            }
        }

        match self {
            Self::Onboarding | Self::LearningOnly | Self::InformationOnly => (
                Self::ChoosingModel,
                vec![reply(
                    "Thanks! One last thing: how should I prepare your weekly updates?",
                    &[CHIP_FAST_MODEL, CHIP_THOROUGH_MODEL],
                )],
            ),
            Self::ChoosingModel => (
                Self::Ready,
                vec![reply(
                    &format!(
                        "All set with \"{}\". Your first update arrives next week. Ask me anything in the meantime.",
                        input.text().trim()
                    ),
                    &[],
                )],
            ),
            Self::Intro | Self::Ready => match input {
                ChatInput::Chip(chip) => (
                    self,
                    vec![reply(
                        &format!("Great choice! Here's some information about \"{}\"...", chip),
                        &["Tell me more", "Can you explain differently?", "What should I do next?"],
                    )],
                ),
                ChatInput::Text(_) => (self, vec![fallback()]),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub is_user: bool,
    pub chips: Vec<String>,
}

/// Transcript plus conversation state. Bot replies are queued by `accept` and
/// appended one at a time through `deliver`.
#[derive(Debug, Clone)]
pub struct ChatSession {
    state: ConversationState,
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        let mut session = Self {
            state: ConversationState::Intro,
            messages: Vec::new(),
            next_id: 1,
        };
        session.deliver(reply(
            INTRO_MESSAGE,
            &[CHIP_ACCEPT, CHIP_LEARN_ONLY, CHIP_INFORMATION_ONLY],
        ));
        session
    }
}

impl ChatSession {
    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, content: String, is_user: bool, chips: Vec<String>) -> ChatMessage {
        let message = ChatMessage {
            id: self.next_id.to_string(),
            content,
            is_user,
            chips,
        };
        self.next_id += 1;
        self.messages.push(message.clone());
        message
    }

    /// Records the user turn and advances the state. Blank free text is ignored.
    pub fn accept(&mut self, input: ChatInput) -> Vec<BotReply> {
        if matches!(&input, ChatInput::Text(text) if text.trim().is_empty()) {
            return Vec::new();
        }
        let (next, replies) = self.state.transition(&input);
        tracing::debug!(from = ?self.state, to = ?next, "chat transition");
        self.state = next;
        let content = match input {
            ChatInput::Chip(text) | ChatInput::Text(text) => text,
        };
        self.push(content, true, Vec::new());
        replies
    }

    pub fn deliver(&mut self, reply: BotReply) -> ChatMessage {
        self.push(reply.content, false, reply.chips)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatInput, ChatSession, ConversationState, CHIP_ACCEPT, CHIP_FAST_MODEL, CHIP_LEARN_ONLY};

    fn chip(text: &str) -> ChatInput {
        ChatInput::Chip(text.to_string())
    }

    fn run(session: &mut ChatSession, input: ChatInput) -> usize {
        let replies = session.accept(input);
        let count = replies.len();
        for reply in replies {
            session.deliver(reply);
        }
        count
    }

    #[test]
    fn session_opens_with_three_chips() {
        let session = ChatSession::default();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].chips.len(), 3);
        assert!(!session.messages()[0].is_user);
    }

    #[test]
    fn accept_chip_gives_two_part_reply_from_any_state() {
        for state in [
            ConversationState::Intro,
            ConversationState::LearningOnly,
            ConversationState::ChoosingModel,
            ConversationState::Ready,
        ] {
            let (next, replies) = state.transition(&chip(CHIP_ACCEPT));
            assert_eq!(next, ConversationState::Onboarding);
            assert_eq!(replies.len(), 2);
            assert!(replies[0].content.starts_with("Perfect!"));
            assert!(replies[0].content.contains("learning flow"));
            assert!(replies[1].content.contains("information from you"));
        }
    }

    #[test]
    fn choose_model_turn_offers_two_chips_then_ready() {
        let mut session = ChatSession::default();
        run(&mut session, chip(CHIP_LEARN_ONLY));
        assert_eq!(session.state(), ConversationState::LearningOnly);
        run(&mut session, chip("Index funds"));
        assert_eq!(session.state(), ConversationState::ChoosingModel);
        let last = session.messages().last().expect("bot turn");
        assert_eq!(last.chips.len(), 2);

        run(&mut session, chip(CHIP_FAST_MODEL));
        assert_eq!(session.state(), ConversationState::Ready);
    }

    #[test]
    fn unmatched_text_keeps_state_and_blank_text_is_ignored() {
        let mut session = ChatSession::default();
        assert_eq!(run(&mut session, ChatInput::Text("   ".to_string())), 0);
        assert_eq!(session.messages().len(), 1);

        assert_eq!(run(&mut session, ChatInput::Text("what about gold?".to_string())), 1);
        assert_eq!(session.state(), ConversationState::Intro);
        let reply = session.messages().last().expect("reply");
        assert!(reply.content.starts_with("I understand you're interested"));
        let ids = session.messages().iter().map(|m| m.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
