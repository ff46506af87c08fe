//! Expense categories owned by each user.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    GENERAL_CATEGORY_NAME, create_category, create_category_table, delete_category,
    get_all_categories, get_category, get_or_create_general_category, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryData, CategoryId, CategoryName};
pub use edit::update_category_endpoint;
pub use list::list_categories_endpoint;
