use jiff::{SignedDuration, Timestamp};

/// Runs `$block` and logs how long it took at debug level.
#[macro_export]
macro_rules! timer_debug {
    ($msg:literal, $block:expr) => {{
        let started_at = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(started_at);

        tracing::debug!(elapsed = %elapsed, "{}", $msg);

        result
    }};
}

/// `Timestamp::MAX` stands for "no upper bound" in schedule computations.
pub(crate) fn is_unbounded(timestamp: Timestamp) -> bool {
    timestamp == Timestamp::MAX
}

/// Subtracts `duration`, saturating at the representable range. An unbounded
/// timestamp stays unbounded.
pub(crate) fn saturating_sub(timestamp: Timestamp, duration: SignedDuration) -> Timestamp {
    if is_unbounded(timestamp) {
        return timestamp;
    }

    timestamp.checked_sub(duration).unwrap_or(if duration.is_negative() {
        Timestamp::MAX
    } else {
        Timestamp::MIN
    })
}

/// Adds `duration`, saturating at the representable range.
pub(crate) fn saturating_add(timestamp: Timestamp, duration: SignedDuration) -> Timestamp {
    if is_unbounded(timestamp) {
        return timestamp;
    }

    timestamp.checked_add(duration).unwrap_or(if duration.is_negative() {
        Timestamp::MIN
    } else {
        Timestamp::MAX
    })
}
