//! Small utility helpers used across modules.

/// Pick the singular or plural form for a count.
pub fn pluralize<'a>(count: u32, singular: &'a str, plural: &'a str) -> &'a str {
  if count == 1 { singular } else { plural }
}

/// Format a point value without trailing zeros (3.0 -> "3", 1.5 -> "1.5").
pub fn format_points(value: f64) -> String {
  format!("{}", value)
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge submitted answers.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    s.to_string()
  } else {
    let mut cut = max;
    while !s.is_char_boundary(cut) {
      cut -= 1;
    }
    format!("{}… ({} bytes total)", &s[..cut], s.len())
  }
}
