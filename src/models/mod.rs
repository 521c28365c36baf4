pub mod dynamic;
pub mod form;

pub use dynamic::{FieldBag, FieldValue, NewSubmission, SubmissionRecord};
pub use form::{FormField, FormSchema};
