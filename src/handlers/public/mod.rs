pub mod auth;
pub mod engagement;
pub mod payments;
pub mod surveys;
