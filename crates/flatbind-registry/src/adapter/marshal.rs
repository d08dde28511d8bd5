//! Executable marshalling plan for a synthesized adapter.
//!
//! A [`CallPlan`] interprets an entity's [`AdapterBody`] over concrete
//! values: it rebuilds native arguments from flat ones, hands them to a
//! native callable, and routes the native result into the flat return and
//! out-slots. Generators use it to check that an adapter is
//! behaviour-preserving before they emit code for it.

use std::collections::BTreeMap;

use flatbind_core::{
    AdapterBody, DefaultValue, FunctionEntity, NativeCall, OutputRule, ParamLowering, RouteTarget, ScalarValue,
};
use thiserror::Error;

/// A value as a flat caller passes it.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatArg {
    Scalar(ScalarValue),
    /// `(pointer, length)` over bytes
    Bytes(Vec<u8>),
    /// `(pointer, length)` over primitive elements
    Elements(Vec<ScalarValue>),
    /// Pointer identity: opaque object, raw pointee, or handle
    Address(usize),
    /// Writable out-slot
    Slot,
    /// Writable buffer of `capacity` bytes
    Buffer { capacity: usize },
}

/// A native argument rebuilt by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeArg {
    Scalar(ScalarValue),
    Address(usize),
    StringView(Vec<u8>),
    Span(Vec<ScalarValue>),
    /// Bytes followed by a terminating NUL
    CString(Vec<u8>),
    /// Owning string copied from a view
    String(Vec<u8>),
    /// Native reference bound to the pointee at this address
    Reference(usize),
    /// Native copy of the object at this address
    CopyOf(usize),
    Default(DefaultValue),
}

/// What the native side produced.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Void,
    Scalar(ScalarValue),
    Bytes(Vec<u8>),
    Elements(Vec<ScalarValue>),
    Address(usize),
    /// Pair or aggregate, member by member
    Members(Vec<(String, NativeValue)>),
}

/// A value delivered to the flat caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    Scalar(ScalarValue),
    Bytes(Vec<u8>),
    Elements(Vec<ScalarValue>),
    Address(usize),
}

/// Flat return value plus everything written through out-slots, keyed by
/// flat parameter index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatOutputs {
    pub returned: Option<FlatValue>,
    pub slots: BTreeMap<usize, FlatValue>,
}

impl FlatOutputs {
    pub fn slot(&self, index: usize) -> Option<&FlatValue> {
        self.slots.get(&index)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarshalError {
    #[error("expected {expected} flat arguments, got {found}")]
    Arity { expected: usize, found: usize },

    #[error("flat argument {index}: expected {expected}")]
    Argument { index: usize, expected: &'static str },

    #[error("flat argument {index}: interior NUL in C string")]
    InteriorNul { index: usize },

    #[error("native result: expected {expected}")]
    Result { expected: &'static str },

    #[error("native result has no member '{0}'")]
    MissingMember(String),
}

/// Interprets the adapter of one function entity.
#[derive(Debug, Clone)]
pub struct CallPlan<'e> {
    entity: &'e FunctionEntity,
    body: AdapterBody,
}

impl<'e> CallPlan<'e> {
    /// Entities without an adapter pass every argument and the result through.
    pub fn new(entity: &'e FunctionEntity) -> Self {
        let body = entity.adapter.clone().unwrap_or_else(|| AdapterBody {
            call: NativeCall::Invoke,
            lowerings: (0..entity.params.len()).map(|param| ParamLowering::Direct { param }).collect(),
            output: if entity.returns.is_void() {
                OutputRule::Void
            } else {
                OutputRule::Direct
            },
        });
        Self { entity, body }
    }

    pub fn body(&self) -> &AdapterBody {
        &self.body
    }

    /// Rebuild the native argument list.
    pub fn lower(&self, args: &[FlatArg]) -> Result<Vec<NativeArg>, MarshalError> {
        if args.len() != self.entity.params.len() {
            return Err(MarshalError::Arity {
                expected: self.entity.params.len(),
                found: args.len(),
            });
        }
        self.body
            .lowerings
            .iter()
            .map(|lowering| lower_one(lowering, args))
            .collect()
    }

    /// Route a native result to the flat return and out-slots.
    pub fn lift(&self, args: &[FlatArg], result: NativeValue) -> Result<FlatOutputs, MarshalError> {
        let mut out = FlatOutputs::default();
        match &self.body.output {
            OutputRule::Void => match result {
                NativeValue::Void => {}
                _ => return Err(MarshalError::Result { expected: "void" }),
            },
            OutputRule::Direct
            | OutputRule::AddressOf
            | OutputRule::MoveToHeap
            | OutputRule::WrapSmartPointer { .. }
            | OutputRule::AdoptPointer { .. } => {
                out.returned = Some(flat_value(result)?);
            }
            OutputRule::ViewParts { slot } => {
                out.slots.insert(*slot, flat_value(result)?);
            }
            OutputRule::CopyIntoBuffer { buffer, written } => {
                let bytes = match result {
                    NativeValue::Bytes(bytes) => bytes,
                    _ => return Err(MarshalError::Result { expected: "a string" }),
                };
                copy_into(&mut out, args, *buffer, *written, bytes)?;
            }
            OutputRule::Decompose { fields } => {
                let mut members = match result {
                    NativeValue::Members(members) => members,
                    _ => return Err(MarshalError::Result { expected: "an aggregate" }),
                };
                for field in fields {
                    let index = members
                        .iter()
                        .position(|(name, _)| *name == field.member)
                        .ok_or_else(|| MarshalError::MissingMember(field.member.clone()))?;
                    let (_, value) = members.swap_remove(index);
                    match field.target {
                        RouteTarget::Return => out.returned = Some(flat_value(value)?),
                        RouteTarget::Slot { slot } => {
                            out.slots.insert(slot, flat_value(value)?);
                        }
                        RouteTarget::Buffer { buffer, written } => match value {
                            NativeValue::Bytes(bytes) => copy_into(&mut out, args, buffer, written, bytes)?,
                            _ => return Err(MarshalError::Result { expected: "a string member" }),
                        },
                    }
                }
            }
        }
        Ok(out)
    }

    /// Lower, call, and lift in one step.
    pub fn invoke<F>(&self, args: &[FlatArg], native: F) -> Result<FlatOutputs, MarshalError>
    where
        F: FnOnce(&[NativeArg]) -> NativeValue,
    {
        let lowered = self.lower(args)?;
        let result = native(&lowered);
        self.lift(args, result)
    }
}

fn lower_one(lowering: &ParamLowering, args: &[FlatArg]) -> Result<NativeArg, MarshalError> {
    let arg = |index: usize| {
        args.get(index).ok_or(MarshalError::Arity {
            expected: index + 1,
            found: args.len(),
        })
    };
    match lowering {
        ParamLowering::Direct { param } => match arg(*param)? {
            FlatArg::Scalar(value) => Ok(NativeArg::Scalar(*value)),
            FlatArg::Address(address) => Ok(NativeArg::Address(*address)),
            _ => Err(argument(*param, "a scalar or pointer")),
        },
        ParamLowering::BuildView { param } => match arg(*param)? {
            FlatArg::Bytes(bytes) => Ok(NativeArg::StringView(bytes.clone())),
            FlatArg::Elements(elements) => Ok(NativeArg::Span(elements.clone())),
            _ => Err(argument(*param, "a (pointer, length) view")),
        },
        ParamLowering::MaterializeCString { param } => match arg(*param)? {
            FlatArg::Bytes(bytes) => {
                if bytes.contains(&0) {
                    return Err(MarshalError::InteriorNul { index: *param });
                }
                let mut terminated = Vec::with_capacity(bytes.len() + 1);
                terminated.extend_from_slice(bytes);
                terminated.push(0);
                Ok(NativeArg::CString(terminated))
            }
            _ => Err(argument(*param, "a (pointer, length) string")),
        },
        ParamLowering::MaterializeString { param } => match arg(*param)? {
            FlatArg::Bytes(bytes) => Ok(NativeArg::String(bytes.clone())),
            _ => Err(argument(*param, "a (pointer, length) string")),
        },
        ParamLowering::BindReference { param } => match arg(*param)? {
            FlatArg::Address(address) => Ok(NativeArg::Reference(*address)),
            _ => Err(argument(*param, "a pointer")),
        },
        ParamLowering::CopyFromPointer { param } => match arg(*param)? {
            FlatArg::Address(address) => Ok(NativeArg::CopyOf(*address)),
            _ => Err(argument(*param, "a pointer")),
        },
        ParamLowering::SupplyDefault { value } => Ok(NativeArg::Default(value.clone())),
    }
}

fn copy_into(
    out: &mut FlatOutputs,
    args: &[FlatArg],
    buffer: usize,
    written: usize,
    bytes: Vec<u8>,
) -> Result<(), MarshalError> {
    let capacity = match args.get(buffer) {
        Some(FlatArg::Buffer { capacity }) => *capacity,
        _ => return Err(argument(buffer, "a writable buffer")),
    };
    // full length is reported even when truncated so the caller can retry
    let length = bytes.len();
    let copied = bytes[..length.min(capacity)].to_vec();
    out.slots.insert(buffer, FlatValue::Bytes(copied));
    out.slots
        .insert(written, FlatValue::Scalar(ScalarValue::Usize(length as u64)));
    Ok(())
}

fn flat_value(value: NativeValue) -> Result<FlatValue, MarshalError> {
    match value {
        NativeValue::Scalar(v) => Ok(FlatValue::Scalar(v)),
        NativeValue::Bytes(b) => Ok(FlatValue::Bytes(b)),
        NativeValue::Elements(e) => Ok(FlatValue::Elements(e)),
        NativeValue::Address(a) => Ok(FlatValue::Address(a)),
        NativeValue::Void | NativeValue::Members(_) => Err(MarshalError::Result {
            expected: "a single flat value",
        }),
    }
}

fn argument(index: usize, expected: &'static str) -> MarshalError {
    MarshalError::Argument { index, expected }
}
