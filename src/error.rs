//! Generation errors.
//!
//! Every variant aborts the top-level document being generated; the caller
//! decides whether to skip that document and carry on with the others.
use crate::schema::NodeId;

pub type Result<T> = std::result::Result<T, GenerationError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// A keyword is present but its value has the wrong shape.
    #[error("malformed schema at {path}: expected {expected}")]
    Malformed { path: NodeId, expected: String },

    /// A node required at the point of use is absent.
    #[error("missing schema node at {path}")]
    MissingNode { path: NodeId },

    /// A derived member name is already taken on the target record.
    #[error(
        "member `{member}` already exists on `{record}` \
         (declared by {existing_origin}, again by {new_origin})"
    )]
    NameCollision {
        record: String,
        member: String,
        existing_origin: NodeId,
        new_origin: NodeId,
    },

    #[error("unsupported keyword `{keyword}` at {path}")]
    UnsupportedKeyword { path: NodeId, keyword: String },

    #[error("cannot resolve reference `{reference}` at {path}")]
    UnresolvedReference { path: NodeId, reference: String },

    /// A cycle that comes back to `path` without any concrete type on the way.
    #[error("reference cycle without a concrete type at {path}: {cycle}")]
    ReferenceCycle { path: NodeId, cycle: String },
}

impl GenerationError {
    pub fn malformed(path: &NodeId, expected: impl Into<String>) -> Self {
        Self::Malformed { path: path.clone(), expected: expected.into() }
    }
}
