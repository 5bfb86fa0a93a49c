pub mod grade;
pub mod types;
