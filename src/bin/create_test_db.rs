use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month};

use household_budget::{
    BudgetMonthUpdate, CategoryName, ExpenseOrigin, MonthKey, NewExpense, NewRecurringExpense,
    PasswordHash, ProfileUpdate, ValidatedPassword, create_category, create_expense,
    create_profile, create_recurring_expense, create_user, get_or_create_budget_month,
    get_year_summary, initialize_db,
    money::{
        DEFAULT_PERCENTAGE_DECIMALS, calculate_percentage, format_cents, format_percentage,
        major_to_cents, parse_amount_to_cents,
    },
    update_budget_month, update_profile,
};

/// A utility for creating a test database for the REST API server of household_budget.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The year to fill with demo data.
    #[arg(long, default_value_t = 2025)]
    year: i32,
}

/// Recurring expenses for the demo user: name, amount and category.
const RECURRING: [(&str, &str, &str); 4] = [
    ("Rent", "2400,00", "Housing"),
    ("Electricity", "185.50", "Bills"),
    ("Internet", "60", "Bills"),
    ("Gym", "139,99", "Health"),
];

/// Ad-hoc expenses added to every demo month: name, amount and category.
const GROCERIES: [(&str, &str, &str); 3] = [
    ("Groceries", "812.40", "Food"),
    ("Pharmacy", "45,10", "Health"),
    ("Cinema", "58", "Fun"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user("test", "test@example.com", password_hash, &conn)?;
    let first_month = MonthKey::new(args.year, Month::January)?;
    create_profile(user.id, "Test User", first_month, &conn)?;
    update_profile(
        user.id,
        &ProfileUpdate {
            default_salary_cents: Some(major_to_cents(7_500.0)),
            ..Default::default()
        },
        &conn,
    )?;

    println!("Creating categories and recurring expenses...");

    let mut categories = Vec::new();
    for name in ["Housing", "Bills", "Health", "Food", "Fun"] {
        categories.push(create_category(user.id, CategoryName::new(name)?, &conn)?);
    }
    let category_id = |name: &str| {
        categories
            .iter()
            .find(|category| category.name.as_ref() == name)
            .map(|category| category.id)
            .ok_or_else(|| format!("unknown category {name}"))
    };

    for (name, amount, category) in RECURRING {
        create_recurring_expense(
            user.id,
            NewRecurringExpense {
                name: name.to_owned(),
                amount_cents: parse_amount(amount)?,
                category_id: category_id(category)?,
                starts_on: Date::from_calendar_date(args.year, Month::January, 1)?,
                ends_on: None,
            },
            &conn,
        )?;
    }

    println!("Creating budget months...");

    for month in MonthKey::months_of_year(args.year)?.into_iter().take(6) {
        let budget_month = get_or_create_budget_month(user.id, month, &conn)?;
        update_budget_month(
            user.id,
            budget_month.id,
            &BudgetMonthUpdate {
                salary_override_cents: None,
                savings_cents: Some(major_to_cents(1_000.0)),
            },
            &conn,
        )?;

        for (name, amount, category) in GROCERIES {
            create_expense(
                user.id,
                NewExpense {
                    month_id: budget_month.id,
                    category_id: category_id(category)?,
                    name: name.to_owned(),
                    amount_cents: parse_amount(amount)?,
                    origin: ExpenseOrigin::Manual,
                    is_paid: true,
                    recurring_expense_id: None,
                },
                &conn,
            )?;
        }
    }

    let summary = get_year_summary(user.id, args.year, &conn)?;
    let total_cents = major_to_cents(summary.total_expenses);
    let savings_cents = major_to_cents(summary.total_savings);

    println!();
    println!("Summary for {}:", summary.year);
    println!("  Expenses: {}", format_cents(total_cents));
    println!("  Savings:  {}", format_cents(savings_cents));
    println!("  By category:");
    for entry in &summary.category_data {
        let share = calculate_percentage(entry.amount, summary.total_expenses);
        println!(
            "    {:<10} {:>14} {:>7}",
            entry.name,
            format_cents(major_to_cents(entry.amount)),
            format_percentage(share, DEFAULT_PERCENTAGE_DECIMALS)
        );
    }

    println!("Success!");

    Ok(())
}

fn parse_amount(amount: &str) -> Result<i64, String> {
    parse_amount_to_cents(amount).ok_or_else(|| format!("invalid amount {amount}"))
}
