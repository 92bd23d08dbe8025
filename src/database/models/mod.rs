pub mod response;
pub mod survey;
pub mod user;

pub use response::{StoredDocument, SurveyResponse};
pub use survey::{Survey, SurveyStatus};
pub use user::{Role, User};
