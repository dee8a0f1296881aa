//! Sparse update helpers shared by the services.
//!
//! Patch structs carry `Option` fields. A text field only counts when it is
//! present and not blank after trimming; numeric references treat `0` as
//! absent.

use serde::{Deserialize, Serialize};

/// A patch addressed to one row, as sent in batch updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyed<P> {
    pub id: i32,
    #[serde(flatten)]
    pub patch: P,
}

/// Who performed a write, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audit {
    pub by: String,
    pub at: i64,
}

impl Audit {
    pub fn now(by: impl Into<String>) -> Self {
        Self {
            by: by.into().trim().to_owned(),
            at: chrono::Utc::now().timestamp(),
        }
    }
}

impl Default for Audit {
    fn default() -> Self {
        Self::now("")
    }
}

pub(crate) fn text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

pub(crate) fn reference(value: Option<i32>) -> Option<i32> {
    value.filter(|id| *id != 0)
}

/// Copies every non-blank text field of a patch onto an active model.
macro_rules! apply_text {
    ($am:ident, $patch:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(v) = $crate::patch::text(&$patch.$field) {
                $am.$field = ::sea_orm::Set(v);
            }
        )+
    };
}

pub(crate) use apply_text;
