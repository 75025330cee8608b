pub mod assignments;
pub mod matching;
pub mod requests;
pub mod volunteers;
