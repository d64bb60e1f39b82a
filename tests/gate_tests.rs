use faresheet::core::verify::{Challenge, GatedMutation, apply_gated};
use faresheet::db::sessions::load_session;
use faresheet::errors::AppError;
use rand::SeedableRng;
use rand::rngs::StdRng;

mod common;
use common::{add_session, device};

fn log_count(conn: &rusqlite::Connection, operation: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM log WHERE operation = ?1",
        [operation],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn test_challenge_has_three_distinct_two_digit_options() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let c = Challenge::generate(&mut rng);
        let opts = c.options();

        assert!(opts.contains(&c.code()));
        assert!(opts.iter().all(|o| (10..=99).contains(o)));
        assert!(opts[0] != opts[1] && opts[1] != opts[2] && opts[0] != opts[2]);
        assert!(c.is_correct(c.code()));
        assert_eq!(c.option_at(1), Some(opts[0]));
        assert_eq!(c.option_at(0), None);
        assert_eq!(c.option_at(4), None);
    }
}

#[test]
fn test_same_seed_same_challenge() {
    let a = Challenge::generate(&mut StdRng::seed_from_u64(7));
    let b = Challenge::generate(&mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
}

#[test]
fn test_decoy_leaves_rows_untouched() {
    let (mut pool, user) = device("1001", "Aslam");
    let s1 = add_session(&pool, &user, "2025-11-01", "809", None, (0.25, 0.25));
    let s2 = add_session(&pool, &user, "2025-11-02", "809", None, (0.25, 0.25));

    let challenge = Challenge::generate(&mut StdRng::seed_from_u64(1));
    let decoy = challenge
        .options()
        .into_iter()
        .find(|o| *o != challenge.code())
        .unwrap();

    let mutation = GatedMutation::MarkFareClaimed {
        own_sessions: vec![s1.session_id.clone(), s2.session_id.clone()],
        shared_sessions: vec![],
        claimed_by: "1001".into(),
    };
    let err = apply_gated(&mut pool.conn, &challenge, decoy, &mutation).unwrap_err();
    assert!(matches!(err, AppError::VerificationMismatch));

    for id in [&s1.session_id, &s2.session_id] {
        let s = load_session(&pool.conn, id).unwrap().unwrap();
        assert!(!s.ticket_fare_claimed);
        assert!(s.claimed_by.is_none());
    }
    assert_eq!(log_count(&pool.conn, "gate_cancel"), 1);
}

#[test]
fn test_correct_code_updates_every_row() {
    let (mut pool, user) = device("1001", "Aslam");
    let s1 = add_session(&pool, &user, "2025-11-01", "809", Some(("9:00 AM", "1:00 PM")), (0.0, 0.0));
    let s2 = add_session(&pool, &user, "2025-11-02", "809", Some(("9:00 AM", "1:00 PM")), (0.0, 0.0));

    let challenge = Challenge::generate(&mut StdRng::seed_from_u64(3));
    let mutation = GatedMutation::MarkTimesheetSubmitted {
        sessions: vec![s1.session_id.clone(), s2.session_id.clone()],
    };

    let n = apply_gated(&mut pool.conn, &challenge, challenge.code(), &mutation).unwrap();
    assert_eq!(n, 2);

    for id in [&s1.session_id, &s2.session_id] {
        assert!(load_session(&pool.conn, id).unwrap().unwrap().timesheet_submitted);
    }
    assert_eq!(log_count(&pool.conn, "gate_apply"), 1);
}

#[test]
fn test_store_failure_rolls_back_whole_batch() {
    let (mut pool, user) = device("1001", "Aslam");
    let s1 = add_session(&pool, &user, "2025-11-01", "809", None, (0.25, 0.25));

    // the second update hits a missing table
    pool.conn
        .execute_batch("DROP TABLE bus_fare_details;")
        .unwrap();

    let challenge = Challenge::generate(&mut StdRng::seed_from_u64(5));
    let mutation = GatedMutation::MarkFareClaimed {
        own_sessions: vec![s1.session_id.clone()],
        shared_sessions: vec![("zzzz9999".into(), "1001".into())],
        claimed_by: "1001".into(),
    };

    let err = apply_gated(&mut pool.conn, &challenge, challenge.code(), &mutation).unwrap_err();
    assert!(matches!(err, AppError::Other(_)));
    assert!(!load_session(&pool.conn, &s1.session_id).unwrap().unwrap().ticket_fare_claimed);
    assert_eq!(log_count(&pool.conn, "gate_failed"), 1);
}
