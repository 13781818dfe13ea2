#![forbid(unsafe_code)]
use chrono::{Duration, NaiveTime};
use roulement::{ErrorKind, ScheduleRepository};
use std::sync::Arc;
use std::thread;

#[test]
fn registry_lifecycle() {
    let repo = ScheduleRepository::new();
    repo.create("Plant", "Main plant").unwrap();
    repo.create("Office", "").unwrap();
    assert_eq!(repo.names(), ["Office", "Plant"]);

    let err = repo.create("Plant", "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert_eq!(repo.get("Plant").unwrap().description, "Main plant");
    assert_eq!(repo.get("Nope").unwrap_err().kind(), ErrorKind::NotFound);

    repo.remove("Office").unwrap();
    assert_eq!(repo.names(), ["Plant"]);
}

#[test]
fn failed_write_is_not_applied() {
    let repo = ScheduleRepository::new();
    repo.create("Plant", "").unwrap();
    let seven = NaiveTime::from_hms_opt(7, 0, 0).unwrap();

    let err = repo
        .write("Plant", |s| {
            s.create_shift("Day", "", seven, Duration::hours(8))?;
            s.create_shift("Day", "", seven, Duration::hours(8))
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(repo.read("Plant", |s| s.shifts().is_empty()).unwrap());
}

#[test]
fn concurrent_writers_on_separate_schedules() {
    let repo = Arc::new(ScheduleRepository::new());
    for name in ["A", "B", "C", "D"] {
        repo.create(name, "").unwrap();
    }

    let handles: Vec<_> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|name| {
            let repo = Arc::clone(&repo);
            thread::spawn(move || {
                for i in 0..25 {
                    repo.write(name, |s| {
                        s.create_shift(
                            format!("S{i}"),
                            "",
                            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                            Duration::hours(8),
                        )
                    })
                    .unwrap();
                    let _ = repo.read(name, |s| s.shifts().len()).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for name in repo.names() {
        assert_eq!(repo.read(&name, |s| s.shifts().len()).unwrap(), 25);
    }
}
