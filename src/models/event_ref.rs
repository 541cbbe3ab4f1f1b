use std::fmt;

use uuid::Uuid;

/// Reference from a photo to its event.
///
/// Historical records hold the reference either as free text or as a native
/// id; both have to be tried before concluding there is no match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventRef {
    Raw(String),
    Resolved(Uuid),
}

impl EventRef {
    /// Converts a raw reference to its native form when the text parses as an
    /// id. Anything else, including an already resolved reference, is
    /// returned unchanged, so applying this twice is the same as once.
    pub fn normalize(&self) -> EventRef {
        match self {
            EventRef::Raw(raw) => match Uuid::parse_str(raw.trim()) {
                Ok(id) => EventRef::Resolved(id),
                Err(_) => self.clone(),
            },
            EventRef::Resolved(_) => self.clone(),
        }
    }

    pub fn native(&self) -> Option<Uuid> {
        match self.normalize() {
            EventRef::Resolved(id) => Some(id),
            EventRef::Raw(_) => None,
        }
    }
}

impl From<Uuid> for EventRef {
    fn from(id: Uuid) -> Self {
        EventRef::Resolved(id)
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventRef::Raw(raw) => f.write_str(raw),
            EventRef::Resolved(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_uuid_text_normalizes_to_native() {
        let id = Uuid::new_v4();
        let upper = id.to_string().to_uppercase();
        assert_eq!(EventRef::Raw(upper).normalize(), EventRef::Resolved(id));
        assert_eq!(
            EventRef::Raw(id.simple().to_string()).normalize(),
            EventRef::Resolved(id)
        );
    }

    #[test]
    fn malformed_raw_stays_raw() {
        let r = EventRef::Raw("abc".into());
        assert_eq!(r.normalize(), r);
        assert_eq!(r.native(), None);
    }

    #[test]
    fn normalize_is_idempotent() {
        for r in [
            EventRef::Raw("abc".into()),
            EventRef::Raw(Uuid::new_v4().to_string()),
            EventRef::Resolved(Uuid::new_v4()),
        ] {
            assert_eq!(r.normalize().normalize(), r.normalize());
        }
    }
}
