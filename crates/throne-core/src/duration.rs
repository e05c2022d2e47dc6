//! Spoken rendering of a reign length.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Render `seconds` as days, hours, minutes and seconds.
///
/// Days are never folded into hours, and every unit is pluralised unless its
/// value is exactly 1 (so zero reads as "0 hours").
pub fn format_duration(seconds: u64) -> String {
  let days = seconds / DAY;
  let hours = seconds % DAY / HOUR;
  let minutes = seconds % HOUR / MINUTE;
  let secs = seconds % MINUTE;

  format!(
    "{} {} {} and {}",
    unit(days, "day"),
    unit(hours, "hour"),
    unit(minutes, "minute"),
    unit(secs, "second"),
  )
}

fn unit(value: u64, word: &str) -> String {
  if value == 1 {
    format!("{value} {word}")
  } else {
    format!("{value} {word}s")
  }
}
