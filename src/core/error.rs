//! Error types surfaced by the effect engine.
//!
//! None of these are fatal to a session. The lenient load path logs them
//! and continues with reduced behavior; the strict APIs hand them back.

/// Errors raised while building or composing effects.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EffectError {
    #[error("unknown effect name `{0}`")]
    UnknownEffect(String),

    #[error("effect `{effect}` could not parse argument `{argument}`: {reason}")]
    InvalidArgument {
        effect: &'static str,
        argument: String,
        reason: String,
    },

    #[error("meta effect `{wrapper}` cannot wrap `{inner}`")]
    IncompatibleInner {
        wrapper: &'static str,
        inner: &'static str,
    },

    #[error("effect `{0}` is not a meta effect and cannot wrap another effect")]
    NotAMetaEffect(&'static str),
}
