//! User profiles: display name, theme, default salary and the first tracked month.

mod db;
mod domain;
mod endpoints;

pub use db::{create_profile, create_profile_table, get_profile, update_profile};
pub use domain::{Profile, ProfileUpdate, Theme};
pub use endpoints::{get_profile_endpoint, update_profile_endpoint};
