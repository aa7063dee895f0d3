//! Model-support checks for pipeline integration.
//!
//! The encoding stages in this crate are model-agnostic, but the add-on as a
//! whole is only meaningful on top of parser models whose tag sets, entity
//! schemes, and dependency labels the upstream rules analysis understands.
//! Integration layers call [`ensure_supported`] before attaching anything to
//! a pipeline, so an unsupported model fails fast with a named error and no
//! partial pipeline state.
//!
//! Model names follow the `{lang}_{genre}_{size}` convention of the upstream
//! parser ecosystem (e.g. `en_core_web_sm`).

use crate::error::{Error, Result};

/// Parser models the add-on is validated against.
const SUPPORTED_MODELS: &[&str] = &[
    "en_core_web_sm",
    "en_core_web_md",
    "en_core_web_lg",
    "en_core_web_trf",
];

/// The parser models the add-on is validated against.
#[must_use]
pub fn supported_models() -> &'static [&'static str] {
    SUPPORTED_MODELS
}

/// Check whether `model` is a supported parser model.
#[must_use]
pub fn is_supported(model: &str) -> bool {
    SUPPORTED_MODELS.contains(&model)
}

/// Fail fast when `model` is not a supported parser model.
///
/// # Errors
///
/// Returns [`Error::ModelNotSupported`] listing the supported models.
pub fn ensure_supported(model: &str) -> Result<()> {
    if is_supported(model) {
        Ok(())
    } else {
        Err(Error::model_not_supported(
            model,
            SUPPORTED_MODELS.join(", "),
        ))
    }
}
