//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// A click recorded when a short link is resolved.
///
/// Clicks are append-only. They disappear only when their link (or the link's
/// owner) is deleted. Missing request headers are stored as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub ip_address: String,
    pub referrer: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        link_id: i64,
        ip_address: String,
        referrer: String,
        user_agent: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            link_id,
            ip_address,
            referrer,
            user_agent,
            created_at,
        }
    }

    /// Keyset position of this click in newest-first order.
    pub fn cursor(&self) -> ClickCursor {
        ClickCursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// Input data for recording a new click.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub link_id: i64,
    pub ip_address: String,
    pub referrer: String,
    pub user_agent: String,
    pub created_at: DateTime<Utc>,
}

/// Position in the `(created_at DESC, id DESC)` ordering of a link's clicks.
///
/// Batched reads return clicks strictly after the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickCursor {
    pub created_at: DateTime<Utc>,
    pub id: i64,
}

impl ClickCursor {
    /// Returns true if `click` sorts strictly after this cursor (older, or same
    /// instant with a smaller id).
    pub fn precedes(&self, click: &Click) -> bool {
        (click.created_at, click.id) < (self.created_at, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn click(id: i64, created_at: DateTime<Utc>) -> Click {
        Click::new(
            id,
            1,
            "10.0.0.1".to_string(),
            String::new(),
            "curl/8.0".to_string(),
            created_at,
        )
    }

    #[test]
    fn test_cursor_orders_by_time_then_id() {
        let now = Utc::now();
        let cursor = click(5, now).cursor();

        assert!(cursor.precedes(&click(9, now - Duration::seconds(1))));
        assert!(cursor.precedes(&click(4, now)));
        assert!(!cursor.precedes(&click(5, now)));
        assert!(!cursor.precedes(&click(6, now)));
        assert!(!cursor.precedes(&click(1, now + Duration::seconds(1))));
    }
}
