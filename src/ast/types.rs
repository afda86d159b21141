//! Type nodes and the type-equality relation.
//!
//! Types in the tree are written by the programmer (annotations, parameter
//! lists, struct fields, type declarations) and are never inferred here.
//! Equality between types is not plain structural equality:
//!
//! - `Type::Any` is a wildcard, equal to every type in both directions
//! - tuples compare elementwise and need the same arity
//! - channel types compare their element types and require compatible
//!   directions (`send` and `receive` never match, `both` matches either)
//! - struct types compare field by field with plain structural equality,
//!   so neither the wildcard nor direction compatibility applies inside them
//!
//! The relation lives in [`types_equal`] and backs `PartialEq for Type`, so
//! every typed node that contains a type inherits it. Because of the
//! wildcard the relation is not transitive, which is why `Type` is not `Eq`.

use serde::{Deserialize, Serialize};

use super::ast::{Identifier, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicKind {
    Number,
    Bool,
    String,
}

impl BasicKind {
    pub fn from_name(name: &str) -> Option<BasicKind> {
        match name {
            "number" => Some(BasicKind::Number),
            "bool" => Some(BasicKind::Bool),
            "string" => Some(BasicKind::String),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChanDirection {
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Receive,
    /// `chan T`
    Both,
}

impl ChanDirection {
    pub fn is_compatible_with(&self, other: ChanDirection) -> bool {
        !matches!(
            (self, other),
            (ChanDirection::Send, ChanDirection::Receive)
                | (ChanDirection::Receive, ChanDirection::Send)
        )
    }
}

/// A named, typed field of a struct type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructElement {
    pub name: Identifier,
}

#[derive(Debug, Clone)]
pub enum Type {
    Any,
    Void,
    Basic(BasicKind),
    Tuple(Vec<Type>),
    /// Parameters are always a `Type::Tuple`, one element per parameter.
    Function {
        params: Box<Type>,
        ret: Box<Type>,
    },
    Chan {
        direction: ChanDirection,
        element: Box<Type>,
    },
    Array {
        element: Box<Type>,
        size: usize,
    },
    Slice(Box<Type>),
    Custom(String),
    Struct(Vec<StructElement>),
}

impl Type {
    pub fn kind(&self) -> NodeKind {
        match self {
            Type::Any => NodeKind::AnyType,
            Type::Void => NodeKind::VoidType,
            Type::Basic(_) => NodeKind::BasicType,
            Type::Tuple(_) => NodeKind::TupleType,
            Type::Function { .. } => NodeKind::FunctionType,
            Type::Chan { .. } => NodeKind::ChanType,
            Type::Array { .. } => NodeKind::ArrayType,
            Type::Slice(_) => NodeKind::SliceType,
            Type::Custom(_) => NodeKind::CustomType,
            Type::Struct(_) => NodeKind::StructType,
        }
    }
}

/// The type-equality relation.
pub fn types_equal(left: &Type, right: &Type) -> bool {
    match (left, right) {
        (Type::Any, _) | (_, Type::Any) => true,
        (Type::Void, Type::Void) => true,
        (Type::Basic(a), Type::Basic(b)) => a == b,
        (Type::Tuple(a), Type::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| types_equal(x, y))
        }
        (
            Type::Function { params, ret },
            Type::Function {
                params: other_params,
                ret: other_ret,
            },
        ) => types_equal(params, other_params) && types_equal(ret, other_ret),
        (
            Type::Chan { direction, element },
            Type::Chan {
                direction: other_direction,
                element: other_element,
            },
        ) => direction.is_compatible_with(*other_direction) && types_equal(element, other_element),
        (
            Type::Array { element, size },
            Type::Array {
                element: other_element,
                size: other_size,
            },
        ) => size == other_size && types_equal(element, other_element),
        (Type::Slice(a), Type::Slice(b)) => types_equal(a, b),
        (Type::Custom(a), Type::Custom(b)) => a == b,
        (Type::Struct(a), Type::Struct(b)) => same_fields(a, b),
        _ => false,
    }
}

fn same_fields(left: &[StructElement], right: &[StructElement]) -> bool {
    left.len() == right.len()
        && left.iter().zip(right).all(|(a, b)| {
            a.name.name == b.name.name
                && match (&a.name.val_type, &b.name.val_type) {
                    (Some(x), Some(y)) => same_type(x, y),
                    (None, None) => true,
                    _ => false,
                }
        })
}

/// Plain structural equality: `Any` only equals `Any` and channel
/// directions must match exactly.
fn same_type(left: &Type, right: &Type) -> bool {
    match (left, right) {
        (Type::Any, Type::Any) | (Type::Void, Type::Void) => true,
        (Type::Basic(a), Type::Basic(b)) => a == b,
        (Type::Tuple(a), Type::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_type(x, y))
        }
        (
            Type::Function { params, ret },
            Type::Function {
                params: other_params,
                ret: other_ret,
            },
        ) => same_type(params, other_params) && same_type(ret, other_ret),
        (
            Type::Chan { direction, element },
            Type::Chan {
                direction: other_direction,
                element: other_element,
            },
        ) => direction == other_direction && same_type(element, other_element),
        (
            Type::Array { element, size },
            Type::Array {
                element: other_element,
                size: other_size,
            },
        ) => size == other_size && same_type(element, other_element),
        (Type::Slice(a), Type::Slice(b)) => same_type(a, b),
        (Type::Custom(a), Type::Custom(b)) => a == b,
        (Type::Struct(a), Type::Struct(b)) => same_fields(a, b),
        _ => false,
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        types_equal(self, other)
    }
}
