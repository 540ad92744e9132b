//! `SeaORM` entity definitions.

pub mod budget_details;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod shared_expenses;
pub mod users;

pub mod prelude {
    //! Entity re-exports.

    pub use super::budget_details::Entity as BudgetDetails;
    pub use super::budgets::Entity as Budgets;
    pub use super::categories::Entity as Categories;
    pub use super::expenses::Entity as Expenses;
    pub use super::shared_expenses::Entity as SharedExpenses;
    pub use super::users::Entity as Users;
}
