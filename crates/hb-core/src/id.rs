use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for boundary element IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Monotonic counter shared by every generated ID. Never rewinds, so an ID
/// is never handed out twice, even across `reset()` and undo.
static COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_key(prefix: &str) -> Spur {
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    INTERNER.get_or_intern(format!("{prefix}_{n}"))
}

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(Spur);

        impl $name {
            /// Intern an existing string as an ID (e.g. when loading a saved polygon).
            pub fn intern(s: &str) -> Self {
                Self(INTERNER.get_or_intern(s))
            }

            /// Generate a fresh, never-before-issued ID.
            pub fn fresh() -> Self {
                Self(next_key($prefix))
            }

            pub fn as_str(&self) -> &str {
                INTERNER.resolve(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.as_str())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::intern(&s))
            }
        }
    };
}

interned_id!(
    /// Identifier of a boundary vertex. 4 bytes, `Copy`, O(1) `Eq`/`Hash`.
    VertexId,
    "v"
);

interned_id!(
    /// Identifier of a boundary segment.
    SegmentId,
    "s"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_name_gives_same_id() {
        let a = SegmentId::intern("s_edge");
        let b = SegmentId::intern("s_edge");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "s_edge");
    }

    #[test]
    fn fresh_ids_are_unique() {
        let a = VertexId::fresh();
        let b = VertexId::fresh();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("v_"));
    }

    #[test]
    fn vertex_and_segment_ids_never_share_a_name() {
        let v = VertexId::fresh();
        let s = SegmentId::fresh();
        assert_ne!(v.as_str(), s.as_str());
        assert!(s.as_str().starts_with("s_"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = VertexId::intern("v_json");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"v_json\"");
        let back: VertexId = serde_json::from_str("\"v_json\"").unwrap();
        assert_eq!(back, id);
    }
}
