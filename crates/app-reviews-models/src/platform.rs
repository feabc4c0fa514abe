use serde::{Deserialize, Serialize};
use std::fmt;

/// Storefront a review was collected from.
///
/// Serialized with the store's display name (`"Android"`, `"iOS"`), which is also the value
/// written under the `OS` key of the interchange export.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    #[serde(rename = "Android")]
    Android,
    #[serde(rename = "iOS")]
    Ios,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
