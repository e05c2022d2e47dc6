//! Voice-platform request and response envelopes.
//!
//! Inbound requests are consumed as the platform sends them; unknown fields
//! are ignored. The outbound shape is fixed: plain-text speech, a simple card
//! titled `ANNOUNCEMENT`, an empty reprompt and no session attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ─── Inbound ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
  #[serde(default)]
  pub version: Option<String>,
  pub session: Session,
  pub request: SkillRequest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
  #[serde(default)]
  pub session_id:  Option<String>,
  #[serde(default)]
  pub application: Option<Application>,
  pub user:        User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
  pub application_id: String,
}

/// The caller. `user_id` is the identity key records are stored under.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  pub user_id: String,
}

/// The request body, discriminated by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SkillRequest {
  LaunchRequest {
    #[serde(rename = "requestId", default)]
    request_id: Option<String>,
  },
  IntentRequest {
    #[serde(rename = "requestId", default)]
    request_id: Option<String>,
    intent:     Intent,
  },
  SessionEndedRequest {
    #[serde(rename = "requestId", default)]
    request_id: Option<String>,
    #[serde(default)]
    reason:     Option<String>,
  },
  /// Any request type this skill does not know about.
  #[serde(other)]
  Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
  pub name:  String,
  #[serde(default)]
  pub slots: BTreeMap<String, Slot>,
}

impl Intent {
  /// The filled value of slot `name`, if the platform resolved one.
  pub fn slot_value(&self, name: &str) -> Option<&str> {
    self.slots.get(name).and_then(|s| s.value.as_deref())
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
  pub name:  String,
  #[serde(default)]
  pub value: Option<String>,
}

// ─── Outbound ────────────────────────────────────────────────────────────────

pub const RESPONSE_VERSION: &str = "1.0";
pub const CARD_TITLE: &str = "ANNOUNCEMENT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
  pub version:            String,
  pub response:           ResponseBody,
  pub session_attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
  pub output_speech:      OutputSpeech,
  pub card:               Card,
  pub reprompt:           Reprompt,
  pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputSpeech {
  #[serde(rename = "type")]
  pub kind: String,
  pub text: String,
}

impl OutputSpeech {
  pub fn plain_text(text: impl Into<String>) -> Self {
    Self { kind: "PlainText".to_owned(), text: text.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Card {
  #[serde(rename = "type")]
  pub kind:    String,
  pub title:   String,
  pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
  pub output_speech: OutputSpeech,
}

impl ResponseEnvelope {
  /// Build a response speaking `speech` with a card reading `card`.
  pub fn new(
    speech: impl Into<String>,
    card: impl Into<String>,
    should_end_session: bool,
  ) -> Self {
    Self {
      version:            RESPONSE_VERSION.to_owned(),
      response:           ResponseBody {
        output_speech: OutputSpeech::plain_text(speech),
        card:          Card {
          kind:    "Simple".to_owned(),
          title:   CARD_TITLE.to_owned(),
          content: card.into(),
        },
        reprompt:      Reprompt { output_speech: OutputSpeech::plain_text("") },
        should_end_session,
      },
      session_attributes: BTreeMap::new(),
    }
  }

  pub fn speech(&self) -> &str { &self.response.output_speech.text }
}
