/*!
 * Work Item Types
 */

use serde::Deserialize;

/// One person record from the upstream API; parameterizes one worker
///
/// Only `person_id`, `first_name` and `last_name` are used by the supervisor,
/// the rest is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkItem {
    pub address: String,
    pub date_of_birth: String,
    pub email: String,
    pub first_name: String,
    pub gender: Option<String>,
    pub last_name: String,
    pub person_id: String,
    pub phone_number: String,
}

impl WorkItem {
    /// Minimal record with placeholder contact fields
    pub fn new(
        person_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            address: String::new(),
            date_of_birth: String::new(),
            email: String::new(),
            first_name: first_name.into(),
            gender: None,
            last_name: last_name.into(),
            person_id: person_id.into(),
            phone_number: String::new(),
        }
    }
}
