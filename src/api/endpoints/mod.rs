pub mod cases;
pub mod health;
pub mod lab_results;
pub mod users;
