use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::context::UserContext;
use crate::db::pool::DbPool;
use crate::db::users::list_users;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::formatting::bold;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        let pool = DbPool::new(&cfg.database)?;
        let conn = &pool.conn;

        match action {
            UserAction::Register { emp_id, username } => {
                let user = UserContext::register(conn, emp_id, username)?;
                success(format!(
                    "Registered {} ({}) and logged in.",
                    user.username, user.emp_id
                ));
            }
            UserAction::Login { emp_id } => {
                let user = UserContext::login(conn, emp_id)?;
                success(format!("Welcome back, {}.", user.username));
            }
            UserAction::Logout => match UserContext::logout(conn)? {
                Some(emp_id) => success(format!("Employee {emp_id} logged out.")),
                None => info("Nobody was logged in."),
            },
            UserAction::Whoami => match UserContext::current(conn)? {
                Some(u) => println!("{} ({})", bold(&u.username), u.emp_id),
                None => info("Not logged in."),
            },
            UserAction::List => {
                let current = UserContext::current(conn)?.map(|u| u.emp_id);
                for u in list_users(conn)? {
                    let marker = if current.as_deref() == Some(u.emp_id.as_str()) {
                        "*"
                    } else {
                        " "
                    };
                    println!("{} {:<10} {}", marker, u.emp_id, u.username);
                }
            }
        }
    }

    Ok(())
}
