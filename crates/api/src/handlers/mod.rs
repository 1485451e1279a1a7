pub mod draw;
pub mod history;
pub mod prizes;
pub mod reset;
