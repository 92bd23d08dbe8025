pub mod responses;
pub mod surveys;
pub mod users;
