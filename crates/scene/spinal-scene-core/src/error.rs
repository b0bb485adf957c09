//! Load-failure taxonomy.

use thiserror::Error;

/// Errors produced while materializing a scene from a document tree.
///
/// Every variant aborts the whole load; callers never observe a partially
/// populated scene. Unrecognized attachment types are deliberately not an
/// error; skin assembly skips them so newer document variants still load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A bone names a parent that has not been declared yet. Parents must
    /// precede their children in the document, which also rules out cycles.
    #[error("the parent bone '{0}' does not exist")]
    UnresolvedParent(String),

    /// A slot, skinned vertex or animation track references a bone that is
    /// not part of the skeleton.
    #[error("the bone '{bone}' referenced by {referrer} does not exist")]
    UnresolvedBone { bone: String, referrer: String },

    /// An animation property name other than translate/rotate/scale.
    #[error("unknown animation property '{0}'")]
    UnknownProperty(String),

    /// Structural or numeric problems in the document itself: missing or
    /// mistyped fields, truncated vertex streams, degenerate scales.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}
