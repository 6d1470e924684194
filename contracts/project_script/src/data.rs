//! # Structured data
//!
//! Datums and redeemers reach the validator as an untyped [`Data`] tree. The
//! [`FromData`] / [`ToData`] traits convert between that tree and the typed
//! records in [`crate::types`].
//!
//! ## Encoding
//!
//! | Rust shape            | Encoded as                          |
//! |-----------------------|-------------------------------------|
//! | record struct         | `Constr(0, fields)`                 |
//! | enum variant `i`      | `Constr(i, fields)`                 |
//! | `Option<T>`           | `Constr(0, [x])` / `Constr(1, [])`  |
//! | `bool`                | `Constr(1, [])` / `Constr(0, [])`   |
//! | integers              | `Int`                               |
//! | hashes / names / ids  | `Bytes`                             |
//! | maps                  | `Map` (order preserved)             |
//!
//! Decoding is strict: an unexpected shape, constructor tag or field count is
//! a [`DecodeError`], never a default value.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured ledger data.
///
/// JSON form is externally tagged, e.g. `{"constr":[0,[{"int":5}]]}` or
/// `{"bytes":"cafe"}`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Data {
    Constr(u64, Vec<Data>),
    Map(Vec<(Data, Data)>),
    List(Vec<Data>),
    Int(i128),
    Bytes(#[serde(with = "hex::serde")] Vec<u8>),
}

/// Failure to decode a [`Data`] tree into a typed record.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DecodeError {
    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown constructor {tag} for {type_name}")]
    UnknownConstructor { type_name: &'static str, tag: u64 },

    #[error("{type_name} expects {expected} fields, found {found}")]
    Arity {
        type_name: &'static str,
        expected: usize,
        found: usize,
    },
}

pub trait FromData: Sized {
    fn from_data(data: &Data) -> Result<Self, DecodeError>;
}

pub trait ToData {
    fn to_data(&self) -> Data;
}

impl Data {
    fn kind(&self) -> &'static str {
        match self {
            Data::Constr(..) => "constr",
            Data::Map(_) => "map",
            Data::List(_) => "list",
            Data::Int(_) => "int",
            Data::Bytes(_) => "bytes",
        }
    }

    fn unexpected(&self, expected: &'static str) -> DecodeError {
        DecodeError::UnexpectedShape {
            expected,
            found: self.kind(),
        }
    }

    pub fn constr(tag: u64, fields: Vec<Data>) -> Self {
        Data::Constr(tag, fields)
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Data::Bytes(bytes.into())
    }

    pub fn as_constr(&self) -> Result<(u64, &[Data]), DecodeError> {
        match self {
            Data::Constr(tag, fields) => Ok((*tag, fields.as_slice())),
            other => Err(other.unexpected("constr")),
        }
    }

    pub fn as_int(&self) -> Result<i128, DecodeError> {
        match self {
            Data::Int(n) => Ok(*n),
            other => Err(other.unexpected("int")),
        }
    }

    pub fn as_bytes(&self) -> Result<&[u8], DecodeError> {
        match self {
            Data::Bytes(b) => Ok(b.as_slice()),
            other => Err(other.unexpected("bytes")),
        }
    }

    pub fn as_list(&self) -> Result<&[Data], DecodeError> {
        match self {
            Data::List(items) => Ok(items.as_slice()),
            other => Err(other.unexpected("list")),
        }
    }

    pub fn as_map(&self) -> Result<&[(Data, Data)], DecodeError> {
        match self {
            Data::Map(pairs) => Ok(pairs.as_slice()),
            other => Err(other.unexpected("map")),
        }
    }

    /// Decode the fields of a single-constructor record (tag 0) with
    /// exactly `arity` fields.
    pub fn record(&self, type_name: &'static str, arity: usize) -> Result<&[Data], DecodeError> {
        let (tag, fields) = self.as_constr()?;
        if tag != 0 {
            return Err(DecodeError::UnknownConstructor { type_name, tag });
        }
        expect_arity(type_name, fields, arity)
    }
}

/// Check that a constructor carries exactly `arity` fields.
pub fn expect_arity<'a>(
    type_name: &'static str,
    fields: &'a [Data],
    arity: usize,
) -> Result<&'a [Data], DecodeError> {
    if fields.len() != arity {
        return Err(DecodeError::Arity {
            type_name,
            expected: arity,
            found: fields.len(),
        });
    }
    Ok(fields)
}

impl FromData for Data {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        Ok(data.clone())
    }
}

impl ToData for Data {
    fn to_data(&self) -> Data {
        self.clone()
    }
}

impl FromData for i128 {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        data.as_int()
    }
}

impl ToData for i128 {
    fn to_data(&self) -> Data {
        Data::Int(*self)
    }
}

impl FromData for bool {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        let (tag, fields) = data.as_constr()?;
        expect_arity("Bool", fields, 0)?;
        match tag {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(DecodeError::UnknownConstructor {
                type_name: "Bool",
                tag,
            }),
        }
    }
}

impl ToData for bool {
    fn to_data(&self) -> Data {
        Data::Constr(u64::from(*self), Vec::new())
    }
}

impl<T: FromData> FromData for Option<T> {
    fn from_data(data: &Data) -> Result<Self, DecodeError> {
        match data.as_constr()? {
            (0, fields) => {
                let fields = expect_arity("Option", fields, 1)?;
                Ok(Some(T::from_data(&fields[0])?))
            }
            (1, fields) => {
                expect_arity("Option", fields, 0)?;
                Ok(None)
            }
            (tag, _) => Err(DecodeError::UnknownConstructor {
                type_name: "Option",
                tag,
            }),
        }
    }
}

impl<T: ToData> ToData for Option<T> {
    fn to_data(&self) -> Data {
        match self {
            Some(x) => Data::Constr(0, vec![x.to_data()]),
            None => Data::Constr(1, Vec::new()),
        }
    }
}
