//! Pure slot computation. Given a provider's windows for one weekday, a
//! service duration and the intervals already booked that day, produce the
//! sorted list of free "HH:MM" start times.

/// A span of minutes-since-midnight, half-open: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Candidate starts advance on a fixed 30-minute stride regardless of service
/// duration, so a 45-minute service still only starts on :00/:30 boundaries.
pub const SLOT_STEP_MINUTES: i32 = 30;

pub fn time_to_minutes(time: &str) -> Option<i32> {
    let (h, m) = time.split_once(':')?;
    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn minutes_to_time(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Compute free start times. `windows` are (start, end) "HH:MM" pairs for the
/// requested weekday; `booked` are the occupied intervals for the requested
/// date. Windows with malformed times are skipped. The result is deduplicated
/// and ascending.
pub fn compute_slots(
    windows: &[(String, String)],
    duration_minutes: i32,
    booked: &[Interval],
    step_minutes: i32,
) -> Vec<String> {
    if windows.is_empty() || duration_minutes <= 0 || step_minutes <= 0 {
        return Vec::new();
    }

    let mut starts: Vec<i32> = Vec::new();

    for (window_start, window_end) in windows {
        let (Some(start), Some(end)) = (time_to_minutes(window_start), time_to_minutes(window_end))
        else {
            continue;
        };

        let mut candidate = start;
        while candidate + duration_minutes <= end {
            let slot = Interval {
                start: candidate,
                end: candidate + duration_minutes,
            };
            if !booked.iter().any(|b| slot.overlaps(b)) {
                starts.push(candidate);
            }
            candidate += step_minutes;
        }
    }

    starts.sort_unstable();
    starts.dedup();
    starts.into_iter().map(minutes_to_time).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows(specs: &[(&str, &str)]) -> Vec<(String, String)> {
        specs
            .iter()
            .map(|(s, e)| (s.to_string(), e.to_string()))
            .collect()
    }

    #[test]
    fn test_single_window_no_bookings() {
        let slots = compute_slots(&windows(&[("09:00", "11:00")]), 60, &[], 30);
        assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_no_windows() {
        let slots = compute_slots(&[], 30, &[], 30);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_duration_longer_than_window() {
        let slots = compute_slots(&windows(&[("09:00", "10:00")]), 90, &[], 30);
        assert!(slots.is_empty());
    }

    #[test]
    fn test_booking_blocks_overlapping_candidates() {
        // 10:00-11:00 is taken; a 60-minute service cannot start at 09:30,
        // 10:00 or 10:30.
        let booked = vec![Interval { start: 600, end: 660 }];
        let slots = compute_slots(&windows(&[("09:00", "13:00")]), 60, &booked, 30);
        assert_eq!(slots, vec!["09:00", "11:00", "11:30", "12:00"]);
    }

    #[test]
    fn test_adjacent_booking_does_not_block() {
        // Booking at 10:00-10:30; a slot ending exactly at 10:00 and a slot
        // starting exactly at 10:30 are both fine.
        let booked = vec![Interval { start: 600, end: 630 }];
        let slots = compute_slots(&windows(&[("09:00", "11:30")]), 30, &booked, 30);
        assert_eq!(slots, vec!["09:00", "09:30", "10:30", "11:00"]);
    }

    #[test]
    fn test_forty_five_minute_service_keeps_half_hour_stride() {
        let slots = compute_slots(&windows(&[("09:00", "11:00")]), 45, &[], 30);
        assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
    }

    #[test]
    fn test_multiple_windows_are_merged_and_sorted() {
        let slots = compute_slots(&windows(&[("14:00", "15:00"), ("09:00", "10:00")]), 30, &[], 30);
        assert_eq!(slots, vec!["09:00", "09:30", "14:00", "14:30"]);
    }

    #[test]
    fn test_overlapping_windows_deduplicate() {
        let slots = compute_slots(&windows(&[("09:00", "10:30"), ("09:30", "11:00")]), 30, &[], 30);
        assert_eq!(slots, vec!["09:00", "09:30", "10:00", "10:30"]);
    }

    #[test]
    fn test_every_slot_fits_inside_a_window() {
        let w = windows(&[("08:15", "12:00"), ("13:00", "17:45")]);
        let duration = 90;
        for slot in compute_slots(&w, duration, &[], 30) {
            let start = time_to_minutes(&slot).unwrap();
            let fits = w.iter().any(|(ws, we)| {
                start >= time_to_minutes(ws).unwrap()
                    && start + duration <= time_to_minutes(we).unwrap()
            });
            assert!(fits, "slot {slot} escapes all windows");
        }
    }

    #[test]
    fn test_no_slot_overlaps_bookings() {
        let booked = vec![
            Interval { start: 540, end: 600 },
            Interval { start: 720, end: 780 },
        ];
        let duration = 60;
        for slot in compute_slots(&windows(&[("08:00", "18:00")]), duration, &booked, 30) {
            let start = time_to_minutes(&slot).unwrap();
            let candidate = Interval { start, end: start + duration };
            assert!(
                !booked.iter().any(|b| candidate.overlaps(b)),
                "slot {slot} overlaps a booking"
            );
        }
    }

    #[test]
    fn test_idempotent() {
        let w = windows(&[("09:00", "17:00")]);
        let booked = vec![Interval { start: 600, end: 660 }];
        assert_eq!(
            compute_slots(&w, 60, &booked, 30),
            compute_slots(&w, 60, &booked, 30)
        );
    }

    #[test]
    fn test_time_conversion() {
        assert_eq!(time_to_minutes("08:30"), Some(510));
        assert_eq!(time_to_minutes("00:00"), Some(0));
        assert_eq!(time_to_minutes("24:00"), None);
        assert_eq!(time_to_minutes("bogus"), None);
        assert_eq!(minutes_to_time(510), "08:30");
        assert_eq!(minutes_to_time(0), "00:00");
    }
}
