// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use async_graphql_parser::types::{BaseType, Type};

/// The declared type of a field, argument, or input field.
///
/// Types are non-null unless wrapped in `Optional`, so `[Post!]!` is
/// `List(Plain("Post"))` and `[Post]` is `Optional(List(Optional(Plain("Post"))))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Plain(String),
    Optional(Box<FieldType>),
    List(Box<FieldType>),
}

impl FieldType {
    pub fn named(name: impl Into<String>) -> Self {
        FieldType::Plain(name.into())
    }

    pub fn list_of(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn optional(self) -> Self {
        match self {
            FieldType::Optional(_) => self,
            _ => FieldType::Optional(Box::new(self)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    /// The innermost named type (`Post` for `[Post!]`)
    pub fn type_name(&self) -> &str {
        match self {
            FieldType::Plain(name) => name,
            FieldType::Optional(underlying) | FieldType::List(underlying) => {
                underlying.type_name()
            }
        }
    }

    /// The type without its outermost nullability.
    pub fn non_null(&self) -> &FieldType {
        match self {
            FieldType::Optional(underlying) => underlying.non_null(),
            _ => self,
        }
    }

    pub fn from_parser_type(typ: &Type) -> Self {
        let base = match &typ.base {
            BaseType::Named(name) => FieldType::Plain(name.to_string()),
            BaseType::List(inner) => FieldType::List(Box::new(Self::from_parser_type(inner))),
        };

        if typ.nullable { base.optional() } else { base }
    }

    fn fmt_with_nullability(&self, f: &mut Formatter<'_>, nullable: bool) -> std::fmt::Result {
        match self {
            FieldType::Plain(name) => f.write_str(name)?,
            FieldType::List(underlying) => {
                f.write_str("[")?;
                underlying.fmt_with_nullability(f, false)?;
                f.write_str("]")?;
            }
            FieldType::Optional(underlying) => return underlying.fmt_with_nullability(f, true),
        }

        if nullable { Ok(()) } else { f.write_str("!") }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_with_nullability(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_graphql_notation() {
        assert_eq!(FieldType::named("Post").to_string(), "Post!");
        assert_eq!(FieldType::named("Post").optional().to_string(), "Post");
        assert_eq!(
            FieldType::list_of(FieldType::named("Post")).to_string(),
            "[Post!]!"
        );
        assert_eq!(
            FieldType::list_of(FieldType::named("Post").optional())
                .optional()
                .to_string(),
            "[Post]"
        );
    }

    #[test]
    fn from_parser_type() {
        let parsed = Type::new("[Post!]").unwrap();
        let typ = FieldType::from_parser_type(&parsed);

        assert_eq!(
            typ,
            FieldType::list_of(FieldType::named("Post")).optional()
        );
        assert!(typ.is_nullable());
        assert_eq!(typ.type_name(), "Post");
        assert_eq!(typ.non_null(), &FieldType::list_of(FieldType::named("Post")));
    }
}
