/// Decide, once per run, whether the subscription snapshot must be
/// re-fetched: always when no snapshot exists yet, otherwise whenever the
/// current wall-clock minute is an exact multiple of the refresh interval.
/// An interval of zero refreshes every run.
pub fn should_refresh(has_snapshot: bool, minute: u32, interval_minutes: u32) -> bool {
    !has_snapshot || interval_minutes == 0 || minute % interval_minutes == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_snapshot_always_refreshes() {
        for minute in 0..60 {
            assert!(should_refresh(false, minute, 15));
        }
    }

    #[test]
    fn test_refresh_on_interval_multiples() {
        assert!(should_refresh(true, 0, 15));
        assert!(should_refresh(true, 15, 15));
        assert!(should_refresh(true, 30, 15));
        assert!(should_refresh(true, 45, 15));

        assert!(!should_refresh(true, 1, 15));
        assert!(!should_refresh(true, 14, 15));
        assert!(!should_refresh(true, 59, 15));
    }

    #[test]
    fn test_zero_interval_refreshes_every_run() {
        assert!(should_refresh(true, 7, 0));
    }
}
