use faresheet::config::Config;
use faresheet::core::aggregate::{duplicate_days, group_by_period, summarize};
use faresheet::core::fare::{claim_mutation, fare_report_rows, load_unified, merge_fares, select_fares};
use faresheet::core::timesheet::{compact_date_lines, load_period_groups};
use faresheet::core::period::PayPeriod;
use faresheet::db::bus_fares::{NewSharedFare, insert_shared_fare};
use faresheet::db::sessions::load_located_sessions;
use faresheet::errors::AppError;
use faresheet::models::unified_fare::FareSource;
use std::collections::BTreeMap;

mod common;
use common::{add_session, approx, day, device};

#[test]
fn test_dashboard_period_filters_are_disjoint() {
    let (pool, user) = device("1001", "Aslam");

    // current period: 2025-10-25 .. 2025-11-24
    add_session(&pool, &user, "2025-10-26", "802", Some(("9:00 AM", "1:00 PM")), (0.5, 0.5));
    add_session(&pool, &user, "2025-11-10", "809", Some(("9:00 AM", "12:00 PM")), (0.0, 0.0));
    // previous period, fare already claimed below
    let prev = add_session(&pool, &user, "2025-10-20", "809", Some(("9:00 AM", "2:00 PM")), (0.25, 0.25));
    // two periods back, still unclaimed
    add_session(&pool, &user, "2025-09-10", "801", Some(("9:00 AM", "10:00 AM")), (0.2, 0.2));

    faresheet::db::sessions::mark_fare_claimed(&pool.conn, &prev.session_id, "1001").unwrap();

    let sessions = load_located_sessions(&pool.conn, "1001", None).unwrap();
    let s = summarize(&sessions, day("2025-11-10"), 285.0);

    assert_eq!(s.current_period.start, day("2025-10-25"));
    assert_eq!(s.previous_period.start, day("2025-09-25"));
    assert_eq!(s.current_hours, 7.0);
    assert_eq!(s.current_stores, 2);
    assert_eq!(s.previous_hours, 5.0);

    // 4h at Fahaheel (0.75) + 3h elsewhere (0.65)
    assert!(approx(s.earnings_kwd, 4.95));
    assert!(approx(s.earnings_converted, 4.95 * 285.0));

    // unclaimed fares of every period
    assert!(approx(s.claimable_travel_cost, 1.4));
    assert_eq!(s.sessions_today, 1);
    assert!(!s.has_multiple_sessions_today());
}

#[test]
fn test_duplicate_days_are_reported_not_merged() {
    let (pool, user) = device("1001", "Aslam");
    add_session(&pool, &user, "2025-11-03", "809", Some(("9:00 AM", "1:00 PM")), (0.0, 0.0));
    add_session(&pool, &user, "2025-11-03", "818", Some(("3:00 PM", "6:00 PM")), (0.0, 0.0));
    add_session(&pool, &user, "2025-11-04", "809", None, (0.0, 0.0));

    let sessions = load_located_sessions(&pool.conn, "1001", None).unwrap();
    assert_eq!(sessions.len(), 3);
    assert_eq!(duplicate_days(&sessions), vec![day("2025-11-03")]);

    let s = summarize(&sessions, day("2025-11-03"), 285.0);
    assert_eq!(s.sessions_today, 2);
    assert!(s.has_multiple_sessions_today());
    assert_eq!(s.current_hours, 7.0);
}

#[test]
fn test_group_by_period_newest_first() {
    let (pool, user) = device("1001", "Aslam");
    add_session(&pool, &user, "2025-09-30", "809", None, (0.0, 0.0));
    add_session(&pool, &user, "2025-10-25", "809", None, (0.0, 0.0));
    add_session(&pool, &user, "2025-11-24", "809", None, (0.0, 0.0));

    let sessions = load_located_sessions(&pool.conn, "1001", None).unwrap();
    let groups = group_by_period(&sessions);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].0.start, day("2025-10-25"));
    assert_eq!(groups[0].1.len(), 2);
    assert_eq!(groups[1].0.start, day("2025-09-25"));
}

#[test]
fn test_unified_fares_merge_own_and_received() {
    let (pool, user) = device("2002", "Anas");
    add_session(&pool, &user, "2025-11-01", "809", None, (0.25, 0.25));
    // no travel cost: not a fare
    add_session(&pool, &user, "2025-11-02", "809", None, (0.0, 0.0));

    let received = NewSharedFare {
        session_id: "abcd1234",
        receiver_emp_id: "2002",
        date: day("2025-11-05"),
        outbound_cost: 0.3,
        return_cost: 0.3,
        sender_emp_id: "1001",
        location_code: "802",
    };
    assert!(insert_shared_fare(&pool.conn, &received).unwrap());
    assert!(!insert_shared_fare(&pool.conn, &received).unwrap());

    let fares = load_unified(&pool.conn, &user).unwrap();
    assert_eq!(fares.len(), 2);
    assert_eq!(fares[0].session_id, "abcd1234");
    assert_eq!(fares[0].source, FareSource::Shared);
    assert_eq!(fares[0].location_name.as_deref(), Some("Fahaheel"));
    assert_eq!(fares[1].source, FareSource::Own);
}

#[test]
fn test_received_entry_overrides_own_with_same_id() {
    let (pool, user) = device("2002", "Anas");
    let own = add_session(&pool, &user, "2025-11-01", "809", None, (0.25, 0.25));
    insert_shared_fare(
        &pool.conn,
        &NewSharedFare {
            session_id: &own.session_id,
            receiver_emp_id: "2002",
            date: day("2025-11-01"),
            outbound_cost: 1.0,
            return_cost: 1.0,
            sender_emp_id: "1001",
            location_code: "809",
        },
    )
    .unwrap();

    let own_rows = load_located_sessions(&pool.conn, "2002", None).unwrap();
    let shared = faresheet::db::bus_fares::load_shared_fares_for(&pool.conn, "2002").unwrap();
    let merged = merge_fares(&own_rows, &shared);

    assert_eq!(merged.len(), 1);
    assert!(merged[0].is_shared());
    assert!(approx(merged[0].total_fare(), 2.0));
}

#[test]
fn test_fare_report_rows_attribute_received_fares_to_sender() {
    let (pool, user) = device("2002", "Anas");
    let own = add_session(&pool, &user, "2025-11-01", "809", None, (0.25, 0.25));
    insert_shared_fare(
        &pool.conn,
        &NewSharedFare {
            session_id: "zzzz9999",
            receiver_emp_id: "2002",
            date: day("2025-11-02"),
            outbound_cost: 0.5,
            return_cost: 0.0,
            sender_emp_id: "1001",
            location_code: "802",
        },
    )
    .unwrap();
    faresheet::db::users::upsert_user(&pool.conn, "1001", "Aslam").unwrap();

    let fares = load_unified(&pool.conn, &user).unwrap();
    let selected = select_fares(&fares, &[own.session_id.clone(), "zzzz9999".into()]).unwrap();
    let rows = fare_report_rows(&pool.conn, &user, &selected).unwrap();

    assert_eq!(rows[0].emp_id, "2002");
    assert_eq!(rows[0].location, "Farwaniya 1");
    assert_eq!(rows[1].emp_id, "1001");
    assert_eq!(rows[1].name, "Aslam");
    assert_eq!(rows[1].location, "Fahaheel");

    let m = claim_mutation(&user, &selected);
    assert_eq!(m.len(), 2);
}

#[test]
fn test_select_fares_rejects_empty_and_unknown() {
    let (pool, user) = device("2002", "Anas");
    add_session(&pool, &user, "2025-11-01", "809", None, (0.25, 0.25));
    let fares = load_unified(&pool.conn, &user).unwrap();

    assert!(matches!(
        select_fares(&fares, &[]),
        Err(AppError::EmptySelection(_))
    ));
    assert!(matches!(
        select_fares(&fares, &["nope".to_string()]),
        Err(AppError::UnknownSession(_))
    ));
}

#[test]
fn test_timesheet_groups_follow_config_mapping() {
    let (pool, user) = device("1001", "Aslam");
    add_session(&pool, &user, "2025-10-26", "809", Some(("9:00 AM", "1:00 PM")), (0.0, 0.0));
    add_session(&pool, &user, "2025-10-27", "822", Some(("9:00 AM", "12:00 PM")), (0.0, 0.0));
    add_session(&pool, &user, "2025-11-03", "818", Some(("9:00 AM", "2:00 PM")), (0.0, 0.0));

    let mut groups = BTreeMap::new();
    groups.insert("Farwaniya 1".to_string(), "Farwaniya".to_string());
    groups.insert("Farwaniya 3".to_string(), "Farwaniya".to_string());
    let cfg = Config {
        location_groups: groups,
        ..Config::default()
    };

    let period = PayPeriod::containing(day("2025-11-01"));
    let out = load_period_groups(&pool.conn, &cfg, &user, &period).unwrap();

    let names: Vec<&str> = out.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Farwaniya", "Shuwaikh"]);

    let card = out[0].card();
    assert_eq!(card.work_days, 2);
    assert_eq!(card.submitted, 0);
    assert_eq!(card.total_hours, 7.0);
    assert_eq!(card.date_lines, vec!["Oct 26,27".to_string()]);

    let rows = out[0].report_rows(&user);
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.location == "Farwaniya"));
}

#[test]
fn test_compact_date_lines_one_line_per_month() {
    let dates = ["2025-11-09", "2025-10-26", "2025-11-03", "2025-11-04", "2025-11-03"]
        .into_iter()
        .map(day);
    assert_eq!(
        compact_date_lines(dates),
        vec!["Oct 26".to_string(), "Nov 3,4,9".to_string()]
    );
}
