#![forbid(unsafe_code)]
use chrono::{Duration, NaiveDate, NaiveTime};
use roulement::{ErrorKind, RotationDay, RotationId, ScheduleError, ShiftId, WorkSchedule};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn day_off_rotation() -> (WorkSchedule, ShiftId, RotationId) {
    let mut s = WorkSchedule::new("Office", "").unwrap();
    let day = s
        .create_shift(
            "Day",
            "",
            NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            Duration::hours(8),
        )
        .unwrap();
    let rotation = s.create_rotation("5x2", "Five on, two off").unwrap();
    s.add_segment(&rotation, &day, 5, 2).unwrap();
    (s, day, rotation)
}

#[test]
fn segments_expand_in_sequence_order() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let a = s
        .create_shift("A", "", NaiveTime::from_hms_opt(6, 0, 0).unwrap(), Duration::hours(8))
        .unwrap();
    let b = s
        .create_shift("B", "", NaiveTime::from_hms_opt(14, 0, 0).unwrap(), Duration::hours(8))
        .unwrap();
    let rotation = s.create_rotation("AB", "").unwrap();
    assert_eq!(s.add_segment(&rotation, &a, 2, 1).unwrap(), 1);
    assert_eq!(s.add_segment(&rotation, &b, 1, 2).unwrap(), 2);

    let r = s.rotation(&rotation).unwrap();
    assert_eq!(r.day_count(), 6);
    assert_eq!(r.duration(), Duration::days(6));
    assert_eq!(
        r.periods(),
        &[
            RotationDay::On(a.clone()),
            RotationDay::On(a),
            RotationDay::Off,
            RotationDay::On(b),
            RotationDay::Off,
            RotationDay::Off,
        ]
    );
    assert_eq!(r.working_time(&s), Duration::hours(24));
}

#[test]
fn day_index_is_periodic() {
    let (s, _, rotation) = day_off_rotation();
    let r = s.rotation(&rotation).unwrap();
    let anchor = d(2026, 2, 9);

    assert_eq!(r.day_in_rotation(anchor, anchor).unwrap(), 0);
    for offset in 0..7i64 {
        let base = r
            .day_in_rotation(anchor, anchor + Duration::days(offset))
            .unwrap();
        assert_eq!(base, offset as usize);
        for k in [1i64, 10, 1000] {
            let later = anchor + Duration::days(k * 7 + offset);
            assert_eq!(r.day_in_rotation(anchor, later).unwrap(), base);
        }
    }
}

#[test]
fn day_before_anchor_is_range_error() {
    let (s, _, rotation) = day_off_rotation();
    let r = s.rotation(&rotation).unwrap();
    let err = r.day_in_rotation(d(2026, 2, 9), d(2026, 2, 8)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Range);
    assert_eq!(
        err.to_string(),
        "rotation anchor must precede query date: anchor 2026-02-09, date 2026-02-08"
    );
}

#[test]
fn expansion_follows_segment_changes() {
    let (mut s, day, rotation) = day_off_rotation();
    assert_eq!(s.rotation(&rotation).unwrap().periods().len(), 7);

    let seq = s.add_segment(&rotation, &day, 1, 1).unwrap();
    assert_eq!(s.rotation(&rotation).unwrap().periods().len(), 9);

    s.remove_segment(&rotation, seq).unwrap();
    let r = s.rotation(&rotation).unwrap();
    assert_eq!(r.periods().len(), 7);
    assert!(r.periods()[5..].iter().all(|p| !p.is_working()));
}

#[test]
fn empty_rotation_has_no_day_index() {
    let mut s = WorkSchedule::new("Empty", "").unwrap();
    let rotation = s.create_rotation("None", "").unwrap();
    let r = s.rotation(&rotation).unwrap();
    assert!(matches!(
        r.day_in_rotation(d(2026, 1, 1), d(2026, 1, 2)),
        Err(ScheduleError::EmptyRotation(_))
    ));

    let err = s
        .create_team("T", "", &rotation, d(2026, 1, 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::EmptyRotation(_)));
}

#[test]
fn segment_needs_known_shift() {
    let (mut s, _, rotation) = day_off_rotation();
    let err = s
        .add_segment(&rotation, &ShiftId::new("missing"), 1, 1)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
