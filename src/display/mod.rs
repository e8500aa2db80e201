//! Display formatting for terminal output

pub mod dashboard;

pub use dashboard::{
    format_balance, format_classification, format_dashboard, format_greeting, format_statement,
};
