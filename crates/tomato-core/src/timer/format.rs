/// Format a remaining duration as zero-padded `MM:SS`.
///
/// Minutes are not wrapped at the hour, so 3600 units read `60:00`.
pub fn format_remaining(units: u64) -> String {
    format!("{:02}:{:02}", units / 60, units % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_remaining(5), "00:05");
        assert_eq!(format_remaining(10), "00:10");
        assert_eq!(format_remaining(65), "01:05");
        assert_eq!(format_remaining(0), "00:00");
    }

    #[test]
    fn classic_work_phase() {
        assert_eq!(format_remaining(1500), "25:00");
        assert_eq!(format_remaining(3600), "60:00");
    }
}
