//! Rotation angles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rotation angle, either bound to a value or still symbolic.
///
/// Ansatz circuits are always built with bound angles. Symbols exist so a
/// template circuit can be described before values are known; simulators
/// reject them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A concrete angle in radians.
    Constant(f64),
    /// A named, unbound angle.
    Symbol(String),
}

impl ParameterExpression {
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Check if this angle is still unbound.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, ParameterExpression::Symbol(_))
    }

    /// The bound value, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
        }
    }

    /// Bind a symbol to a value, returning a new expression.
    #[must_use]
    pub fn bind(&self, name: &str, value: f64) -> Self {
        match self {
            ParameterExpression::Symbol(n) if n == name => ParameterExpression::Constant(value),
            _ => self.clone(),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        let p = ParameterExpression::constant(1.5);
        assert!(!p.is_symbolic());
        assert_eq!(p.as_f64(), Some(1.5));
    }

    #[test]
    fn test_symbol_binding() {
        let theta = ParameterExpression::symbol("theta");
        assert!(theta.is_symbolic());
        assert_eq!(theta.as_f64(), None);

        assert_eq!(theta.bind("phi", 1.0), theta);
        assert_eq!(theta.bind("theta", 0.25).as_f64(), Some(0.25));
    }

    #[test]
    fn test_display() {
        assert_eq!(ParameterExpression::symbol("a").to_string(), "a");
        assert_eq!(ParameterExpression::from(0.5).to_string(), "0.5");
    }
}
