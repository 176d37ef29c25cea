//! The where-expression tree.
//!
//! A descriptor's `where` clause arrives as nested JSON arrays of string
//! tokens. Tokens are classified exactly once, while the tree is built, so
//! rendering never has to re-test string shapes.

use serde_json::Value;

use crate::error::{RelqError, RelqResult};
use crate::path;

/// One node of a where-expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhereNode {
    /// An ordered sequence of child nodes, rendered as a parenthesized group.
    Group(Vec<WhereNode>),
    /// An operator keyword such as `$eq`, resolved through the operator table.
    Operator(String),
    /// A relation/attribute path such as `status` or `profile.city`.
    Path(String),
    /// A parameter reference such as `:active`, rendered verbatim.
    Param(String),
}

impl WhereNode {
    /// Build a tree from raw descriptor JSON.
    ///
    /// Arrays become groups; strings are classified; anything else is a
    /// malformed leaf.
    pub fn parse(value: &Value) -> RelqResult<Self> {
        match value {
            Value::Array(items) => {
                let children = items.iter().map(Self::parse).collect::<RelqResult<_>>()?;
                Ok(WhereNode::Group(children))
            }
            Value::String(token) => Self::classify(token),
            other => Err(RelqError::InvalidToken(other.to_string())),
        }
    }

    /// Classify a string token, in priority order: operator, path, parameter.
    pub fn classify(token: &str) -> RelqResult<Self> {
        if path::is_operator_token(token) {
            Ok(WhereNode::Operator(token.to_string()))
        } else if path::is_dot_path(token) {
            Ok(WhereNode::Path(token.to_string()))
        } else if path::is_param_token(token) {
            Ok(WhereNode::Param(token.to_string()))
        } else {
            Err(RelqError::InvalidToken(token.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_tokens() {
        assert_eq!(
            WhereNode::classify("$eq").unwrap(),
            WhereNode::Operator("$eq".to_string())
        );
        assert_eq!(
            WhereNode::classify("profile.city").unwrap(),
            WhereNode::Path("profile.city".to_string())
        );
        assert_eq!(
            WhereNode::classify(":active").unwrap(),
            WhereNode::Param(":active".to_string())
        );
    }

    #[test]
    fn test_classify_rejects_unknown_shapes() {
        for token in ["", "$", ":", "a..b", "name!", "$op1", ":p2"] {
            match WhereNode::classify(token) {
                Err(RelqError::InvalidToken(t)) => assert_eq!(t, token),
                other => panic!("expected InvalidToken for {token:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_nested_tree() {
        let tree = WhereNode::parse(&json!([["status"], "$eq", ":active"])).unwrap();
        assert_eq!(
            tree,
            WhereNode::Group(vec![
                WhereNode::Group(vec![WhereNode::Path("status".to_string())]),
                WhereNode::Operator("$eq".to_string()),
                WhereNode::Param(":active".to_string()),
            ])
        );
    }

    #[test]
    fn test_parse_rejects_non_string_leaf() {
        let err = WhereNode::parse(&json!(["status", "$eq", 42])).unwrap_err();
        match err {
            RelqError::InvalidToken(t) => assert_eq!(t, "42"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_object_leaf() {
        let err = WhereNode::parse(&json!({"status": 1})).unwrap_err();
        assert!(matches!(err, RelqError::InvalidToken(_)));
    }
}
