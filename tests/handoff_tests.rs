use faresheet::core::context::UserContext;
use faresheet::core::fare::{load_unified, select_fares};
use faresheet::core::handoff::payload::QrPayload;
use faresheet::core::handoff::share::build_share;
use faresheet::core::handoff::{Handoff, HandoffState, ScanOutcome};
use faresheet::db::bus_fares::load_shared_fares_for;
use faresheet::db::pool::DbPool;
use faresheet::db::sessions::load_session;
use faresheet::errors::AppError;
use rusqlite::Connection;

mod common;
use common::{add_session, device};

fn shared_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM bus_fare_details", [], |r| r.get(0))
        .unwrap()
}

/// `fare_share` JSON of every own fare of the sender.
fn share_json(pool: &DbPool, user: &UserContext) -> String {
    let fares = load_unified(&pool.conn, user).unwrap();
    let ids: Vec<String> = fares.iter().map(|f| f.session_id.clone()).collect();
    let selected = select_fares(&fares, &ids).unwrap();
    let built = build_share(user, &selected).unwrap();
    QrPayload::FareShare(built.payload).to_json().unwrap()
}

#[test]
fn test_full_two_phase_handoff() {
    let (mut sender, aslam) = device("1001", "Aslam");
    let (mut receiver, anas) = device("2002", "Anas");

    let a = add_session(&sender, &aslam, "2025-11-01", "809", None, (0.25, 0.25));
    let b = add_session(&sender, &aslam, "2025-11-02", "802", None, (0.5, 0.0));
    let json = share_json(&sender, &aslam);

    // sender shows the QR, then waits for the confirmation
    let mut sending = Handoff::new();
    sending.start_share(json.clone()).unwrap();
    assert!(matches!(sending.state(), HandoffState::Sending { .. }));
    sending.close();
    assert_eq!(*sending.state(), HandoffState::Receiving);

    // receiver scans the share
    let mut receiving = Handoff::new();
    receiving.start_receive().unwrap();
    let outcome = receiving
        .on_frame(&mut receiver.conn, &anas, &json)
        .unwrap();

    let confirmation_json = match outcome {
        ScanOutcome::Received {
            confirmation,
            confirmation_json,
            inserted,
            already_present,
        } => {
            assert_eq!(inserted, 2);
            assert_eq!(already_present, 0);
            assert_eq!(confirmation.to_user.emp_id, "2002");
            assert_eq!(confirmation.from_user.emp_id, "1001");
            assert_eq!(confirmation.received_sessions.len(), 2);
            confirmation_json
        }
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert!(matches!(receiving.state(), HandoffState::Confirming { .. }));
    receiving.close();
    assert_eq!(*receiving.state(), HandoffState::Idle);

    let stored = load_shared_fares_for(&receiver.conn, "2002").unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|f| f.shared_from_emp_id == "1001"));
    assert!(stored.iter().all(|f| f.shared_from_emp == "Aslam"));

    // sender scans the confirmation
    let outcome = sending
        .on_frame(&mut sender.conn, &aslam, &confirmation_json)
        .unwrap();
    assert_eq!(
        outcome,
        ScanOutcome::Confirmed {
            updated: 2,
            by: "Anas".into()
        }
    );
    assert_eq!(*sending.state(), HandoffState::Idle);

    for id in [&a.session_id, &b.session_id] {
        let s = load_session(&sender.conn, id).unwrap().unwrap();
        assert!(s.ticket_fare_claimed);
        assert_eq!(s.claimed_by.as_deref(), Some("2002"));
    }
}

#[test]
fn test_rescan_does_not_duplicate_rows() {
    let (sender, aslam) = device("1001", "Aslam");
    let (mut receiver, anas) = device("2002", "Anas");
    add_session(&sender, &aslam, "2025-11-01", "809", None, (0.25, 0.25));
    let json = share_json(&sender, &aslam);

    for round in 0..2 {
        let mut h = Handoff::new();
        h.start_receive().unwrap();
        match h.on_frame(&mut receiver.conn, &anas, &json).unwrap() {
            ScanOutcome::Received {
                inserted,
                already_present,
                ..
            } => {
                assert_eq!(inserted, if round == 0 { 1 } else { 0 });
                assert_eq!(already_present, round);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(shared_count(&receiver.conn), 1);
}

#[test]
fn test_missing_location_rejects_whole_payload() {
    let (mut receiver, anas) = device("2002", "Anas");
    let json = r#"{
        "type": "fare_share",
        "from_user": {"emp_id": "1001", "username": "Aslam"},
        "sessions": [
            {"session_id": "aaaa1111", "date": "2025-11-01", "outbound_cost": 0.25,
             "return_cost": 0.25, "total_fare": 0.5, "location_code": "809",
             "location_name": "Farwaniya 1"},
            {"session_id": "bbbb2222", "date": "2025-11-02", "outbound_cost": 0.25,
             "return_cost": 0.25, "total_fare": 0.5, "location_code": "999",
             "location_name": "Nowhere"}
        ]
    }"#;

    let mut h = Handoff::new();
    h.start_receive().unwrap();
    let err = h.on_frame(&mut receiver.conn, &anas, json).unwrap_err();

    match err {
        AppError::MissingLocations(codes) => assert_eq!(codes, vec!["999 (Nowhere)".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*h.state(), HandoffState::Idle);
    assert_eq!(shared_count(&receiver.conn), 0);
    assert!(!h.debounce_mut().is_busy());
}

fn confirmation_for(session_id: &str, from: (&str, &str), to: (&str, &str)) -> String {
    format!(
        r#"{{"type":"fare_confirmation","received_sessions":["{session_id}"],
            "from_user":{{"emp_id":"{}","username":"{}"}},
            "to_user":{{"emp_id":"{}","username":"{}"}}}}"#,
        from.0, from.1, to.0, to.1
    )
}

#[test]
fn test_confirmation_only_claims_the_scanning_senders_sessions() {
    let (mut pool, aslam) = device("1001", "Aslam");
    let s = add_session(&pool, &aslam, "2025-11-01", "809", None, (0.25, 0.25));

    // a second employee on the same device scans a confirmation meant for Aslam
    let bilal = UserContext::register(&pool.conn, "3003", "Bilal").unwrap();
    let json = confirmation_for(&s.session_id, ("1001", "Aslam"), ("2002", "Anas"));

    let mut h = Handoff::new();
    h.start_receive().unwrap();
    let err = h.on_frame(&mut pool.conn, &bilal, &json).unwrap_err();
    assert!(matches!(err, AppError::Handoff(_)));
    assert_eq!(*h.state(), HandoffState::Idle);

    let row = load_session(&pool.conn, &s.session_id).unwrap().unwrap();
    assert!(!row.ticket_fare_claimed);
    assert!(row.claimed_by.is_none());

    // addressed to Bilal, but listing Aslam's session: nothing to claim
    let json = confirmation_for(&s.session_id, ("3003", "Bilal"), ("2002", "Anas"));
    let mut h = Handoff::new();
    h.start_receive().unwrap();
    let outcome = h.on_frame(&mut pool.conn, &bilal, &json).unwrap();
    assert!(matches!(outcome, ScanOutcome::Confirmed { updated: 0, .. }));
    assert!(!load_session(&pool.conn, &s.session_id).unwrap().unwrap().ticket_fare_claimed);
}

#[test]
fn test_unknown_and_malformed_frames_keep_scanning() {
    let (mut receiver, anas) = device("2002", "Anas");
    let mut h = Handoff::new();
    h.start_receive().unwrap();

    let outcome = h
        .on_frame(&mut receiver.conn, &anas, r#"{"type":"hello","data":1}"#)
        .unwrap();
    assert!(matches!(outcome, ScanOutcome::Ignored(_)));
    assert_eq!(*h.state(), HandoffState::Receiving);

    let err = h.on_frame(&mut receiver.conn, &anas, "not json").unwrap_err();
    assert!(matches!(err, AppError::Payload(_)));
    assert_eq!(*h.state(), HandoffState::Receiving);
    assert!(!h.debounce_mut().is_busy());
}

#[test]
fn test_debounce_and_idle_ignore_frames() {
    let (sender, aslam) = device("1001", "Aslam");
    let (mut receiver, anas) = device("2002", "Anas");
    add_session(&sender, &aslam, "2025-11-01", "809", None, (0.25, 0.25));
    let json = share_json(&sender, &aslam);

    let mut idle = Handoff::new();
    let outcome = idle.on_frame(&mut receiver.conn, &anas, &json).unwrap();
    assert!(matches!(outcome, ScanOutcome::Ignored(_)));

    let mut h = Handoff::new();
    h.start_receive().unwrap();
    assert!(h.debounce_mut().try_acquire());
    let outcome = h.on_frame(&mut receiver.conn, &anas, &json).unwrap();
    assert!(matches!(outcome, ScanOutcome::Ignored(_)));
    assert_eq!(shared_count(&receiver.conn), 0);

    h.debounce_mut().release();
    let outcome = h.on_frame(&mut receiver.conn, &anas, &json).unwrap();
    assert!(matches!(outcome, ScanOutcome::Received { .. }));
}

#[test]
fn test_received_fares_cannot_be_shared_again() {
    let (sender, aslam) = device("1001", "Aslam");
    let (mut receiver, anas) = device("2002", "Anas");
    add_session(&sender, &aslam, "2025-11-01", "809", None, (0.25, 0.25));
    let json = share_json(&sender, &aslam);

    let mut h = Handoff::new();
    h.start_receive().unwrap();
    h.on_frame(&mut receiver.conn, &anas, &json).unwrap();

    let fares = load_unified(&receiver.conn, &anas).unwrap();
    assert!(matches!(
        build_share(&anas, &fares),
        Err(AppError::EmptySelection(_))
    ));

    add_session(&receiver, &anas, "2025-11-03", "818", None, (0.1, 0.1));
    let fares = load_unified(&receiver.conn, &anas).unwrap();
    let built = build_share(&anas, &fares).unwrap();
    assert_eq!(built.payload.sessions.len(), 1);
    assert_eq!(built.skipped, 1);
}

#[test]
fn test_share_is_rejected_while_scanning() {
    let mut h = Handoff::new();
    h.start_receive().unwrap();
    assert!(matches!(
        h.start_share("{}".into()),
        Err(AppError::Handoff(_))
    ));
    h.cancel();
    assert_eq!(*h.state(), HandoffState::Idle);
}
