//! Declarative adapter bodies.
//!
//! An [`AdapterBody`] describes a shim between a flat signature and a native
//! operation: one [`ParamLowering`] per native parameter, the native call
//! itself, and one [`OutputRule`] for what the native call yields.

use serde::{Deserialize, Serialize};

use crate::type_ref::TypeRef;
use crate::types::DefaultValue;

/// What the shim does on the native side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum NativeCall {
    /// Call the selected function or method
    Invoke,
    /// Run the selected constructor
    Construct,
    ReadField { field: String },
    WriteField { field: String },
    /// Run the destructor and release storage
    Destroy,
    /// Smart pointer to the object it manages
    Dereference,
}

/// How one native parameter is produced from flat parameters.
///
/// `param` indexes the owning function's flat parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ParamLowering {
    /// Passed through unchanged.
    Direct { param: usize },
    /// `(pointer, length)` rebuilt into the native view type.
    BuildView { param: usize },
    /// `(pointer, length)` copied into a null-terminated buffer.
    MaterializeCString { param: usize },
    /// `(pointer, length)` copied into an owning native string.
    MaterializeString { param: usize },
    /// Native reference bound to the pointee of a flat pointer.
    BindReference { param: usize },
    /// Native by-value parameter copied out of a flat pointer.
    CopyFromPointer { param: usize },
    /// Supplied by the shim; there is no flat parameter.
    SupplyDefault { value: DefaultValue },
}

impl ParamLowering {
    /// Flat parameter consumed, if any.
    pub fn param(&self) -> Option<usize> {
        match self {
            ParamLowering::Direct { param }
            | ParamLowering::BuildView { param }
            | ParamLowering::MaterializeCString { param }
            | ParamLowering::MaterializeString { param }
            | ParamLowering::BindReference { param }
            | ParamLowering::CopyFromPointer { param } => Some(*param),
            ParamLowering::SupplyDefault { .. } => None,
        }
    }
}

/// Where a decomposed member ends up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum RouteTarget {
    /// The flat return value
    Return,
    /// Typed out-slot parameter
    Slot { slot: usize },
    /// Caller buffer plus a slot receiving the full length
    Buffer { buffer: usize, written: usize },
}

/// One member of a decomposed aggregate and its destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldRoute {
    pub member: String,
    pub ty: TypeRef,
    pub target: RouteTarget,
}

/// How the native result reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum OutputRule {
    Void,
    /// Already flat; returned as-is.
    Direct,
    /// Address of a returned native reference; the caller borrows it.
    AddressOf,
    /// View or C string split into a `(pointer, length)` out-slot.
    ViewParts { slot: usize },
    /// Owning string copied into a caller buffer; full length written to `written`.
    CopyIntoBuffer { buffer: usize, written: usize },
    /// Non-copyable value moved to the heap; the caller owns the pointer.
    MoveToHeap,
    /// Native smart pointer boxed into a handle.
    WrapSmartPointer { handle: String },
    /// Raw owning pointer adopted into a smart pointer handle.
    AdoptPointer { handle: String },
    /// Aggregate split member by member.
    Decompose { fields: Vec<FieldRoute> },
}

/// A synthesized shim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdapterBody {
    pub call: NativeCall,
    pub lowerings: Vec<ParamLowering>,
    pub output: OutputRule,
}

impl AdapterBody {
    /// Whether the shim is a plain forwarding call.
    pub fn is_trivial(&self) -> bool {
        matches!(self.call, NativeCall::Invoke)
            && matches!(self.output, OutputRule::Direct | OutputRule::Void)
            && self
                .lowerings
                .iter()
                .enumerate()
                .all(|(i, l)| *l == ParamLowering::Direct { param: i })
    }
}

/// Author-supplied destination of one member of a returned aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Return,
    /// Out-slot with the given parameter name
    OutSlot(String),
    /// Caller buffer with the given parameter name
    Buffer(String),
}

/// Author-supplied decomposition of a pair or aggregate return.
///
/// Members are named as the native type names them (`first` and `second`
/// for a pair).
///
/// # Example
///
/// ```ignore
/// // std::pair<string_view, int> decode_compression_metadata(...)
/// let split = Decomposition::new()
///     .to_buffer("first", "compression")
///     .to_return("second");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Decomposition {
    pub routes: Vec<(String, Route)>,
}

impl Decomposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_return(mut self, member: impl Into<String>) -> Self {
        self.routes.push((member.into(), Route::Return));
        self
    }

    pub fn to_slot(mut self, member: impl Into<String>, param: impl Into<String>) -> Self {
        self.routes.push((member.into(), Route::OutSlot(param.into())));
        self
    }

    pub fn to_buffer(mut self, member: impl Into<String>, param: impl Into<String>) -> Self {
        self.routes.push((member.into(), Route::Buffer(param.into())));
        self
    }

    pub fn route_of(&self, member: &str) -> Option<&Route> {
        self.routes.iter().find(|(m, _)| m == member).map(|(_, r)| r)
    }
}
