use serde::{Deserialize, Serialize};

use crate::domain::types::ShedId;

/// Named storage location that holds items.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shed {
    pub id: ShedId,
    pub name: String,
}
