#![forbid(unsafe_code)]
use chrono::{Duration, NaiveDate, NaiveTime};
use roulement::{ErrorKind, MemberException, ScheduleError, TeamMember, WorkSchedule};

fn seven() -> NaiveTime {
    NaiveTime::from_hms_opt(7, 0, 0).unwrap()
}

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
}

#[test]
fn names_are_unique_per_entity_kind() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let day = s.create_shift("Day", "", seven(), Duration::hours(8)).unwrap();
    let err = s
        .create_shift("Day", "again", seven(), Duration::hours(4))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::DuplicateName { entity: "shift", .. }));
    assert_eq!(s.shifts().len(), 1);

    // un nom de rotation peut reprendre celui d'un shift
    let rotation = s.create_rotation("Day", "").unwrap();
    s.add_segment(&rotation, &day, 1, 0).unwrap();
    assert!(s.create_rotation("Day", "").is_err());

    s.create_team("Red", "", &rotation, anchor()).unwrap();
    let err = s.create_team("Red", "", &rotation, anchor()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(s.teams().len(), 1);
}

#[test]
fn referenced_entities_cannot_be_deleted() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let day = s.create_shift("Day", "", seven(), Duration::hours(8)).unwrap();
    let rotation = s.create_rotation("Daily", "").unwrap();
    let seq = s.add_segment(&rotation, &day, 1, 0).unwrap();
    let team = s.create_team("Red", "", &rotation, anchor()).unwrap();

    let err = s.delete_shift(&day).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
    assert_eq!(
        err.to_string(),
        "shift 'Day' is still referenced by rotation 'Daily'"
    );
    let err = s.delete_rotation(&rotation).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
    let err = s.remove_segment(&rotation, seq).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);

    s.delete_team(&team).unwrap();
    s.remove_segment(&rotation, seq).unwrap();
    s.delete_shift(&day).unwrap();
    s.delete_rotation(&rotation).unwrap();
    assert!(s.shifts().is_empty());
    assert!(s.rotations().is_empty());
    s.validate().unwrap();
}

#[test]
fn unknown_ids_are_not_found() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let day = s.create_shift("Day", "", seven(), Duration::hours(8)).unwrap();
    s.delete_shift(&day).unwrap();
    let err = s.delete_shift(&day).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        s.team_view_by_name("Nobody").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn non_working_periods_stay_sorted() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let later = anchor().and_hms_opt(0, 0, 0).unwrap() + Duration::days(10);
    let sooner = anchor().and_hms_opt(0, 0, 0).unwrap();
    s.create_non_working_period("Later", "", later, Duration::hours(24))
        .unwrap();
    let id = s
        .create_non_working_period("Sooner", "", sooner, Duration::hours(2))
        .unwrap();
    let names: Vec<&str> = s
        .non_working_periods()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["Sooner", "Later"]);

    let err = s
        .create_non_working_period("Zero", "", sooner, Duration::zero())
        .unwrap_err();
    assert!(matches!(err, ScheduleError::NonPositiveDuration { .. }));

    let long = s
        .create_non_working_period("Shutdown", "", later, Duration::days(14))
        .unwrap();
    assert_eq!(s.non_working_period(&long).unwrap().duration, Duration::days(14));

    s.delete_non_working_period(&id).unwrap();
    assert_eq!(s.non_working_periods().len(), 2);
}

#[test]
fn rejected_mutation_leaves_schedule_untouched() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let day = s.create_shift("Day", "", seven(), Duration::hours(4)).unwrap();
    s.create_break(&day, "Lunch", "", seven(), Duration::hours(3))
        .unwrap();
    assert!(s
        .create_break(&day, "Tea", "", seven(), Duration::hours(2))
        .is_err());
    assert_eq!(s.shift(&day).unwrap().breaks().len(), 1);
    assert_eq!(s.shift(&day).unwrap().break_time(), Duration::hours(3));
}

#[test]
fn schedule_needs_a_name() {
    let err = WorkSchedule::new("", "").unwrap_err();
    assert!(matches!(err, ScheduleError::EmptyName { entity: "schedule" }));
}

#[test]
fn serialized_graph_round_trips_and_validates() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let day = s.create_shift("Day", "", seven(), Duration::hours(8)).unwrap();
    let rotation = s.create_rotation("Daily", "").unwrap();
    s.add_segment(&rotation, &day, 5, 2).unwrap();
    s.create_team("Red", "", &rotation, anchor()).unwrap();

    let json = serde_json::to_string(&s).unwrap();
    assert!(json.contains("\"duration\":\"PT8H\""));
    assert!(json.contains("\"rotation_start\":\"2026-02-09\""));

    let back: WorkSchedule = serde_json::from_str(&json).unwrap();
    back.validate().unwrap();
    let view = back.team_view_by_name("Red").unwrap();
    assert_eq!(view.rotation().periods().len(), 7);
    assert_eq!(view.rotation_working_time(), Duration::hours(40));

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["shifts"] = serde_json::json!([]);
    let broken: WorkSchedule = serde_json::from_value(value).unwrap();
    assert_eq!(broken.validate().unwrap_err().kind(), ErrorKind::Invariant);
}

#[test]
fn members_follow_their_exceptions() {
    let mut s = WorkSchedule::new("Plant", "").unwrap();
    let day = s.create_shift("Day", "", seven(), Duration::hours(8)).unwrap();
    let rotation = s.create_rotation("Daily", "").unwrap();
    s.add_segment(&rotation, &day, 1, 0).unwrap();
    let team = s.create_team("Red", "", &rotation, anchor()).unwrap();

    let ada = TeamMember::new("Ada", "Operator", "E1").unwrap();
    let bo = TeamMember::new("Bo", "", "E2").unwrap();
    assert!(TeamMember::new(" ", "", "E9").is_err());
    assert!(TeamMember::new("Cy", "", "").is_err());

    s.add_team_member(&team, ada.clone()).unwrap();
    let err = s
        .add_team_member(&team, TeamMember::new("Ada bis", "", "E1").unwrap())
        .unwrap_err();
    assert!(matches!(err, ScheduleError::DuplicateName { entity: "team member", .. }));

    let start = anchor().and_time(seven());
    let err = MemberException::new(start, "nothing", None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    // on ne retire pas quelqu'un qui n'est pas affecté
    let missing = MemberException::new(start, "swap", None, Some(bo.clone())).unwrap();
    assert_eq!(
        s.add_member_exception(&team, missing).unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let training = MemberException::new(start, "training", Some(bo.clone()), Some(ada.clone())).unwrap();
    s.add_member_exception(&team, training).unwrap();

    let red = s.team(&team).unwrap();
    assert_eq!(red.members_at(start), vec![bo.clone()]);
    assert_eq!(red.members_at(start + Duration::days(1)), vec![ada.clone()]);

    let next_day = s.shift_instances_for_day(anchor() + Duration::days(1)).unwrap();
    assert_eq!(s.members_for_instance(&next_day[0]).unwrap(), vec![ada.clone()]);

    assert_eq!(s.remove_team_member(&team, "E1").unwrap(), ada);
    assert_eq!(
        s.remove_team_member(&team, "E1").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
