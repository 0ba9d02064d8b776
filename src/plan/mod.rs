//! Baseline plan state and file loaders

mod data;
pub mod loader;

pub use data::{Expenses, PersonIncome, PlanState, SpendLine};
pub use loader::{
    load_cards, load_cards_from_reader, load_overrides, load_overrides_from_reader,
    load_plan_state, load_plan_state_from_reader, write_year_inputs,
};
