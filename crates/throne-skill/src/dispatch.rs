//! Intent dispatch: route one request envelope to exactly one handler.

use chrono::FixedOffset;
use throne_core::{
  Coronation, KingName, Throne, clock::Clock, store::KingshipStore,
};

use crate::{
  envelope::{Intent, RequestEnvelope, ResponseEnvelope, SkillRequest},
  error::Error,
  speech,
};

pub const GET_KING: &str = "GetKing";
pub const SET_KING: &str = "SetKing";
pub const CANCEL: &str = "AMAZON.CancelIntent";
pub const STOP: &str = "AMAZON.StopIntent";
pub const HELP: &str = "AMAZON.HelpIntent";
pub const FALLBACK: &str = "AMAZON.FallbackIntent";

/// Slot holding the claimant's name on [`SET_KING`].
pub const NAME_SLOT: &str = "Name";

/// The skill: a [`Throne`] plus the offset start dates are spoken in.
pub struct Skill<S, C> {
  throne: Throne<S, C>,
  offset: FixedOffset,
}

impl<S, C> Skill<S, C>
where
  S: KingshipStore,
  C: Clock,
{
  pub fn new(throne: Throne<S, C>, offset: FixedOffset) -> Self {
    Self { throne, offset }
  }

  /// Answer `envelope`. Store failures are logged and spoken as an apology,
  /// so the platform always gets a well-formed response.
  #[tracing::instrument(skip_all, fields(user = %envelope.session.user.user_id))]
  pub async fn handle(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
    match self.try_handle(envelope).await {
      Ok(response) => response,
      Err(e) => {
        tracing::error!(error = %e, "kingship records unavailable");
        speech::records_unavailable()
      }
    }
  }

  /// Like [`handle`](Self::handle) but surfaces store failures.
  pub async fn try_handle(
    &self,
    envelope: &RequestEnvelope,
  ) -> Result<ResponseEnvelope, Error> {
    let uid = envelope.session.user.user_id.as_str();

    match &envelope.request {
      SkillRequest::LaunchRequest { .. } => {
        tracing::info!("launch");
        Ok(speech::welcome())
      }
      SkillRequest::IntentRequest { intent, .. } => {
        self.handle_intent(uid, intent).await
      }
      SkillRequest::SessionEndedRequest { reason, .. } => {
        tracing::info!(reason = reason.as_deref().unwrap_or("none"), "session ended");
        Ok(speech::goodbye())
      }
      SkillRequest::Unknown => {
        tracing::warn!("unrecognised request type");
        Ok(speech::help())
      }
    }
  }

  async fn handle_intent(
    &self,
    uid: &str,
    intent: &Intent,
  ) -> Result<ResponseEnvelope, Error> {
    tracing::info!(intent = %intent.name, "intent");

    match intent.name.as_str() {
      GET_KING => self.get_king(uid).await,
      SET_KING => match intent.slot_value(NAME_SLOT).map(KingName::new) {
        Some(Ok(name)) => self.set_king(uid, &name).await,
        _ => Ok(speech::missing_name()),
      },
      CANCEL | STOP => Ok(speech::goodbye()),
      HELP | FALLBACK => Ok(speech::help()),
      other => {
        tracing::warn!(intent = other, "unrecognised intent");
        Ok(speech::help())
      }
    }
  }

  async fn get_king(&self, uid: &str) -> Result<ResponseEnvelope, Error> {
    let reign = self.throne.reign(uid).await.map_err(Error::store)?;
    Ok(match reign {
      Some(reign) => speech::reigning(&reign, self.offset),
      None => speech::empty_throne(),
    })
  }

  async fn set_king(
    &self,
    uid: &str,
    name: &KingName,
  ) -> Result<ResponseEnvelope, Error> {
    let outcome = self.throne.crown(uid, name).await.map_err(Error::store)?;
    Ok(match outcome {
      Coronation::Crowned { record } => {
        tracing::info!(king = %record.curr_king, usurped = %record.old_king, "crowned");
        speech::now_king(&record.curr_king)
      }
      Coronation::AlreadyInPower { king } => speech::already_in_power(&king),
    })
  }
}

#[cfg(test)]
mod tests {
  use std::fmt;

  use chrono::{DateTime, Duration, TimeZone, Utc};
  use serde_json::json;
  use throne_core::{clock::FixedClock, memory::MemoryStore, record::KingshipRecord};

  use super::*;

  fn t0() -> DateTime<Utc> { Utc.timestamp_opt(1_700_000_000, 0).unwrap() }

  fn skill_at(store: &MemoryStore, at: DateTime<Utc>) -> Skill<MemoryStore, FixedClock> {
    Skill::new(
      Throne::new(store.clone(), FixedClock(at)),
      FixedOffset::east_opt(0).unwrap(),
    )
  }

  fn envelope(uid: &str, request: serde_json::Value) -> RequestEnvelope {
    serde_json::from_value(json!({
      "version": "1.0",
      "session": { "sessionId": "s-1", "user": { "userId": uid } },
      "request": request,
    }))
    .unwrap()
  }

  fn intent(uid: &str, name: &str) -> RequestEnvelope {
    envelope(uid, json!({ "type": "IntentRequest", "intent": { "name": name } }))
  }

  fn set_king(uid: &str, king: &str) -> RequestEnvelope {
    envelope(
      uid,
      json!({
        "type": "IntentRequest",
        "intent": {
          "name": "SetKing",
          "slots": { "Name": { "name": "Name", "value": king } }
        }
      }),
    )
  }

  // ── Session lifecycle ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn launch_welcomes() {
    let store = MemoryStore::new();
    let res = skill_at(&store, t0())
      .handle(&envelope("u1", json!({ "type": "LaunchRequest" })))
      .await;
    assert_eq!(res, speech::welcome());
    assert_eq!(store.writes(), 0);
  }

  #[tokio::test]
  async fn session_end_cancel_and_stop_say_goodbye() {
    let skill = skill_at(&MemoryStore::new(), t0());
    for req in [
      envelope("u1", json!({ "type": "SessionEndedRequest", "reason": "USER_INITIATED" })),
      intent("u1", CANCEL),
      intent("u1", STOP),
    ] {
      let res = skill.handle(&req).await;
      assert_eq!(res.speech(), "Goodbye");
      assert!(res.response.should_end_session);
    }
  }

  #[tokio::test]
  async fn help_fallback_and_unknowns_give_the_usage_hint() {
    let store = MemoryStore::new();
    let skill = skill_at(&store, t0());
    for req in [
      intent("u1", HELP),
      intent("u1", FALLBACK),
      intent("u1", "OrderPizza"),
      envelope("u1", json!({ "type": "Connections.Response" })),
    ] {
      assert_eq!(skill.handle(&req).await, speech::help());
    }
    assert_eq!(store.writes(), 0);
  }

  // ── GetKing / SetKing ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_king_on_an_empty_throne() {
    let store = MemoryStore::new();
    let res = skill_at(&store, t0()).handle(&intent("u1", GET_KING)).await;

    assert!(res.speech().contains("throne is empty"));
    assert!(!res.response.should_end_session);
    assert_eq!(store.writes(), 0);
  }

  #[tokio::test]
  async fn set_then_get_names_the_king_and_nobody() {
    let store = MemoryStore::new();
    let res = skill_at(&store, t0()).handle(&set_king("u1", "Alice")).await;
    assert_eq!(res.speech(), "Alice is now king");

    let res = skill_at(&store, t0() + Duration::seconds(90_061))
      .handle(&intent("u1", GET_KING))
      .await;
    assert_eq!(
      res.speech(),
      "the reigning king is Alice who has been on the throne for \
       1 day 1 hour 1 minute and 1 second since usurping nobody on \
       November 14, 2023 at 10:13 PM"
    );
  }

  #[tokio::test]
  async fn succession_names_the_usurped_king() {
    let store = MemoryStore::new();
    let skill = skill_at(&store, t0());
    skill.handle(&set_king("u1", "Alice")).await;
    skill.handle(&set_king("u1", "Bob")).await;

    let res = skill.handle(&intent("u1", GET_KING)).await;
    assert!(res.speech().starts_with("the reigning king is Bob "), "{}", res.speech());
    assert!(res.speech().contains("usurping Alice on"), "{}", res.speech());
  }

  #[tokio::test]
  async fn setting_the_same_king_twice_is_rejected() {
    let store = MemoryStore::new();
    skill_at(&store, t0()).handle(&set_king("u1", "Alice")).await;

    let res = skill_at(&store, t0() + Duration::hours(1))
      .handle(&set_king("u1", "Alice"))
      .await;

    assert_eq!(res.speech(), "Alice is already in power");
    assert_eq!(store.writes(), 1);
    let record = store.get("u1").await.unwrap().unwrap();
    assert_eq!(record.start_time, t0());
  }

  #[tokio::test]
  async fn set_king_without_a_name_writes_nothing() {
    let store = MemoryStore::new();
    let skill = skill_at(&store, t0());

    let unfilled = envelope(
      "u1",
      json!({
        "type": "IntentRequest",
        "intent": { "name": "SetKing", "slots": { "Name": { "name": "Name" } } }
      }),
    );
    assert_eq!(skill.handle(&unfilled).await, speech::missing_name());
    assert_eq!(skill.handle(&set_king("u1", "  ")).await, speech::missing_name());
    assert_eq!(skill.handle(&intent("u1", SET_KING)).await, speech::missing_name());
    assert_eq!(store.writes(), 0);
  }

  // ── Store failures ─────────────────────────────────────────────────────────

  #[derive(Debug)]
  struct Unreachable;

  impl fmt::Display for Unreachable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("connection refused")
    }
  }

  impl std::error::Error for Unreachable {}

  /// A store whose every call fails.
  struct FailingStore;

  impl KingshipStore for FailingStore {
    type Error = Unreachable;

    async fn get(&self, _: &str) -> Result<Option<KingshipRecord>, Unreachable> {
      Err(Unreachable)
    }

    async fn put(&self, _: KingshipRecord) -> Result<(), Unreachable> {
      Err(Unreachable)
    }
  }

  fn failing_skill() -> Skill<FailingStore, FixedClock> {
    Skill::new(
      Throne::new(FailingStore, FixedClock(t0())),
      FixedOffset::east_opt(0).unwrap(),
    )
  }

  #[tokio::test]
  async fn store_failures_are_not_an_empty_throne() {
    let skill = failing_skill();

    let err = skill.try_handle(&intent("u1", GET_KING)).await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));

    let res = skill.handle(&intent("u1", GET_KING)).await;
    assert_eq!(res, speech::records_unavailable());
    let res = skill.handle(&set_king("u1", "Alice")).await;
    assert_eq!(res, speech::records_unavailable());
  }

  #[tokio::test]
  async fn lifecycle_requests_never_touch_the_store() {
    let skill = failing_skill();
    let res = skill.handle(&envelope("u1", json!({ "type": "LaunchRequest" }))).await;
    assert_eq!(res, speech::welcome());
  }
}
