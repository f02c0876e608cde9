// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the cost model.

/// Errors raised while evaluating the cost model.
///
/// Derived values that turn out non-finite are reported through the same
/// variant, naming the derived quantity instead of an input field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// An input (or a value derived from it) is outside its valid domain.
    #[error("invalid parameter '{parameter}': {detail}")]
    InvalidParameter {
        parameter: &'static str,
        detail: String,
    },
}

impl ModelError {
    /// Builds an [`InvalidParameter`](Self::InvalidParameter) error.
    pub fn invalid(parameter: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            detail: detail.into(),
        }
    }

    /// Builds the error reported when a derived quantity is NaN or infinite.
    pub fn non_finite(quantity: &'static str, value: f64) -> Self {
        Self::InvalidParameter {
            parameter: quantity,
            detail: format!("derived value is not finite ({value})"),
        }
    }

    /// Returns the name of the offending parameter or derived quantity.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidParameter { parameter, .. } => parameter,
        }
    }
}

/// Returns `value` unchanged if it is finite.
pub(crate) fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::non_finite(quantity, value))
    }
}
