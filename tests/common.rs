#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use faresheet::core::add::{AddLogic, SessionInput};
use faresheet::core::context::UserContext;
use faresheet::db::pool::DbPool;
use faresheet::models::work_session::WorkSession;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn fs_cmd() -> Command {
    cargo_bin_cmd!("faresheet")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_faresheet.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh, empty directory inside the system temp dir
pub fn temp_dir(name: &str) -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_faresheet_out", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create temp dir");
    path
}

/// Temp file path, removed if it already exists
pub fn temp_file(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_faresheet.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB through the CLI and register (log in) one employee
pub fn init_with_user(db_path: &str, emp_id: &str, username: &str) {
    fs_cmd()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    fs_cmd()
        .args(["--db", db_path, "user", "register", emp_id, username])
        .assert()
        .success();
}

/// In-memory device with one logged-in employee
pub fn device(emp_id: &str, username: &str) -> (DbPool, UserContext) {
    let pool = DbPool::in_memory().expect("in-memory db");
    let user = UserContext::register(&pool.conn, emp_id, username).expect("register");
    (pool, user)
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

/// Add one session through the library, taps in `h:mm AM/PM` form
pub fn add_session(
    pool: &DbPool,
    user: &UserContext,
    date: &str,
    code: &str,
    taps: Option<(&str, &str)>,
    fares: (f64, f64),
) -> WorkSession {
    let input = SessionInput {
        date: Some(day(date)),
        location_code: Some(code.to_string()),
        tap_in: taps.map(|(i, _)| i.to_string()),
        tap_out: taps.map(|(_, o)| o.to_string()),
        outbound_cost: Some(fares.0),
        return_cost: Some(fares.1),
    };
    AddLogic::add(&pool.conn, user, &input).expect("add session")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
