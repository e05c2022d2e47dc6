//! What the skill says back.
//!
//! Every function returns a complete [`ResponseEnvelope`]; the card label is
//! the short tag shown on screen-equipped devices.

use chrono::FixedOffset;
use throne_core::{Reign, duration::format_duration};

use crate::envelope::ResponseEnvelope;

/// `strftime` pattern for the start of a reign, e.g.
/// "November 14, 2023 at 10:13 PM".
pub const START_DATE_FORMAT: &str = "%B %d, %Y at %I:%M %p";

pub fn welcome() -> ResponseEnvelope {
  ResponseEnvelope::new("Welcome", "Welcome", false)
}

pub fn goodbye() -> ResponseEnvelope {
  ResponseEnvelope::new("Goodbye", "Goodbye", true)
}

pub fn help() -> ResponseEnvelope {
  ResponseEnvelope::new("I don't understand", "help", false)
}

pub fn empty_throne() -> ResponseEnvelope {
  ResponseEnvelope::new("the throne is empty", "get", false)
}

/// Describe the current reign; the start date is shown in `offset`.
pub fn reigning(reign: &Reign, offset: FixedOffset) -> ResponseEnvelope {
  let record = &reign.record;
  let started = record
    .start_time
    .with_timezone(&offset)
    .format(START_DATE_FORMAT);

  ResponseEnvelope::new(
    format!(
      "the reigning king is {} who has been on the throne for {} since usurping {} on {}",
      record.curr_king,
      format_duration(reign.elapsed),
      record.old_king,
      started,
    ),
    "get",
    false,
  )
}

pub fn now_king(king: &str) -> ResponseEnvelope {
  ResponseEnvelope::new(format!("{king} is now king"), "set", false)
}

pub fn already_in_power(king: &str) -> ResponseEnvelope {
  ResponseEnvelope::new(format!("{king} is already in power"), "set", false)
}

pub fn missing_name() -> ResponseEnvelope {
  ResponseEnvelope::new("I didn't catch the name of the new king", "set", false)
}

pub fn records_unavailable() -> ResponseEnvelope {
  ResponseEnvelope::new(
    "sorry, the royal records are unavailable right now",
    "error",
    false,
  )
}
