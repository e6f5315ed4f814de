/// Format a duration in seconds as `minutes:seconds`.
///
/// Zero, negative and non-finite inputs all render as `0:00`; seconds are
/// zero-padded to two digits, minutes are not (75 -> `1:15`, 9 -> `0:09`).
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
