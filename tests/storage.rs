#![forbid(unsafe_code)]
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use roulement::io::{self, ScheduleDocument, WorkingTime};
use roulement::{JsonStorage, Storage, WorkSchedule};
use std::fs;
use tempfile::tempdir;

const DOCUMENT: &str = r#"{
  "name": "Plant",
  "description": "Two shift plant",
  "shifts": [
    {"name": "Day", "start": "07:00:00", "duration": "PT8H",
     "breaks": [{"name": "Lunch", "start": "11:30:00", "duration": "PT30M"}]},
    {"name": "Night", "description": "Night shift", "start": "22:00:00", "duration": "PT10H"}
  ],
  "rotations": [
    {"name": "DN", "segments": [
      {"shiftName": "Day", "daysOn": 2, "daysOff": 0},
      {"shiftName": "Night", "daysOn": 2, "daysOff": 3}
    ]}
  ],
  "teams": [
    {"name": "Red", "rotationName": "DN", "rotationStart": "2026-02-09"}
  ],
  "nonWorkingPeriods": [
    {"name": "Audit", "startDateTime": "2026-02-12T00:00:00", "duration": "P1D"}
  ]
}"#;

fn sample() -> WorkSchedule {
    let doc: ScheduleDocument = serde_json::from_str(DOCUMENT).unwrap();
    doc.into_schedule().unwrap()
}

#[test]
fn document_builds_a_schedule() {
    let s = sample();
    assert_eq!(s.name(), "Plant");
    assert_eq!(s.shifts().len(), 2);
    assert_eq!(s.shift_by_name("Day").unwrap().description, "Day");
    assert_eq!(s.shift_by_name("Day").unwrap().break_time(), Duration::minutes(30));
    assert_eq!(s.non_working_periods()[0].duration, Duration::hours(24));

    let view = s.team_view_by_name("Red").unwrap();
    assert_eq!(view.rotation().day_count(), 7);
    assert_eq!(view.rotation_working_time(), Duration::hours(36));
}

#[test]
fn document_with_unknown_reference_is_rejected() {
    let broken = DOCUMENT.replace("\"rotationName\": \"DN\"", "\"rotationName\": \"XX\"");
    let doc: ScheduleDocument = serde_json::from_str(&broken).unwrap();
    let err = doc.into_schedule().unwrap_err();
    assert_eq!(err.kind(), roulement::ErrorKind::NotFound);
}

#[test]
fn document_round_trip_keeps_names() {
    let s = sample();
    let doc = ScheduleDocument::from_schedule(&s).unwrap();
    assert_eq!(doc.rotations[0].segments[1].shift_name, "Night");
    assert_eq!(doc.teams[0].rotation_name, "DN");

    let rebuilt = doc.clone().into_schedule().unwrap();
    assert_eq!(ScheduleDocument::from_schedule(&rebuilt).unwrap(), doc);
}

#[test]
fn json_storage_saves_atomically_and_reloads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let storage = JsonStorage::open(&path).unwrap();
    assert!(!storage.exists());

    let s = sample();
    storage.save(&s).unwrap();
    let loaded = storage.load().unwrap();
    assert_eq!(loaded.id, s.id);
    assert_eq!(loaded.teams()[0].id, s.teams()[0].id);

    let from = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let to = from + Duration::days(7);
    assert_eq!(
        loaded.calculate_working_time(from, to).unwrap(),
        s.calculate_working_time(from, to).unwrap()
    );
}

#[test]
fn load_rejects_dangling_graph() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let s = sample();
    let mut value = serde_json::to_value(&s).unwrap();
    value["rotations"] = serde_json::json!([]);
    fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    let err = JsonStorage::open(&path).unwrap().load().unwrap_err();
    assert!(format!("{err:#}").contains("dangling rotation reference"));

    let broken: [(fn(&mut Value), &str); 7] = [
        (
            |v| v["shifts"][0]["duration"] = json!("PT25H"),
            "duration cannot exceed 24 hours",
        ),
        (|v| v["shifts"][1]["duration"] = json!("-PT1H"), "duration must be positive"),
        (
            |v| v["shifts"][0]["breaks"][0]["duration"] = json!("PT9H"),
            "exceed its duration",
        ),
        (
            |v| {
                let lunch = v["shifts"][0]["breaks"][0].clone();
                v["shifts"][0]["breaks"] = json!([lunch.clone(), lunch]);
            },
            "break 'Lunch' already exists",
        ),
        (
            |v| v["rotations"][0]["segments"][1]["sequence"] = json!(1),
            "rotation segment 'DN #1' already exists",
        ),
        (|v| v["rotations"][0]["segments"] = json!([]), "rotation 'DN' has no days"),
        (
            |v| {
                let member = json!({"name": "Ada", "member_id": "E1"});
                v["teams"][0]["members"] = json!([member.clone(), member]);
            },
            "team member 'E1' already exists",
        ),
    ];
    for (edit, expected) in broken {
        let mut value = serde_json::to_value(&s).unwrap();
        edit(&mut value);
        fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
        let err = JsonStorage::open(&path).unwrap().load().unwrap_err();
        assert!(format!("{err:#}").contains(expected), "{err:#} lacks {expected}");
    }
}

#[test]
fn document_carries_team_members() {
    let with_members = DOCUMENT.replace(
        r#""rotationStart": "2026-02-09"}"#,
        r#""rotationStart": "2026-02-09",
     "members": [
       {"name": "Ada", "description": "Operator", "memberID": "E1"},
       {"name": "Bo", "memberID": "E2"}
     ],
     "memberExceptions": [
       {"dateTime": "2026-02-09T07:00:00", "reason": "Sick leave",
        "removal": {"name": "Bo", "memberID": "E2"},
        "addition": {"name": "Cy", "memberID": "E3"}}
     ]}"#,
    );
    let doc: ScheduleDocument = serde_json::from_str(&with_members).unwrap();
    let s = doc.into_schedule().unwrap();

    let red = s.team_by_name("Red").unwrap();
    assert_eq!(red.members().len(), 2);
    assert_eq!(red.members()[1].description, "Bo");

    let monday = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
    let instance = &s.shift_instances_for_day(monday).unwrap()[0];
    let on_shift: Vec<_> = s
        .members_for_instance(instance)
        .unwrap()
        .into_iter()
        .map(|m| m.member_id)
        .collect();
    assert_eq!(on_shift, ["E1", "E3"]);

    let exported = ScheduleDocument::from_schedule(&s).unwrap();
    assert_eq!(exported.teams[0].members[0].member_id, "E1");
    assert_eq!(exported.teams[0].member_exceptions[0].reason.as_deref(), Some("Sick leave"));
    let json = serde_json::to_value(&exported).unwrap();
    assert_eq!(json["teams"][0]["members"][1]["memberID"], "E2");

    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("schedule.json")).unwrap();
    storage.save(&s).unwrap();
    assert_eq!(storage.load().unwrap().team_by_name("Red").unwrap(), red);
}

#[test]
fn working_time_dto_uses_iso_durations() {
    let s = sample();
    let from = NaiveDate::from_ymd_opt(2026, 2, 9).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let to = from + Duration::days(4);
    let dto = WorkingTime::compute(&s, from, to).unwrap();
    // 2 x 8 h de jour, nuit de mercredi complète, nuit de jeudi coupée à minuit
    assert_eq!(dto.working_time, Duration::hours(28));
    assert_eq!(dto.team, None);
    assert_eq!(dto.non_working_time, Some(Duration::hours(24)));

    let json = serde_json::to_value(&dto).unwrap();
    assert_eq!(json["workingTime"], "PT28H");
    assert_eq!(json["nonWorkingTime"], "PT24H");
    assert_eq!(json["from"], "2026-02-09T00:00:00");
}

#[test]
fn shift_instances_export_as_csv() {
    let s = sample();
    let day = NaiveDate::from_ymd_opt(2026, 2, 11).unwrap();
    let days = s.shift_instances_between(day, day).unwrap();

    let mut buf = Vec::new();
    io::write_shift_instances_csv(&mut buf, &days).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(
        text,
        "day,team,shift,start,end,duration_minutes\n\
         2026-02-11,Red,Night,2026-02-11 22:00:00,2026-02-12 08:00:00,600\n"
    );

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.csv");
    io::export_shift_instances_csv(&path, &days).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}
