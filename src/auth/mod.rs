//! User accounts, password handling and cookie based authentication.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod register_user;
mod token;
mod user;

pub use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use log_in::{SessionUser, post_log_in};
pub use log_out::post_log_out;
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::register_user;
pub(crate) use token::Token;
pub use user::{
    User, UserID, create_user, create_user_table, get_user_by_login, update_password,
    validate_email, validate_username,
};

#[cfg(test)]
pub use middleware::AuthState;
