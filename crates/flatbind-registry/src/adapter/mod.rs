//! Adapter Synthesizer.
//!
//! Turns a selected native signature into a flat [`FunctionEntity`] plus the
//! [`AdapterBody`] that bridges the two. Lowering policy:
//!
//! - views and strings become one `(pointer, length)` parameter; C strings
//!   and owning strings are materialized from it, never assumed terminated
//! - native references bind to flat pointers (or plain values for `const`
//!   primitives)
//! - opaque objects passed by value are copied out of a flat pointer
//! - returned views go to an out-slot, returned owning strings are copied
//!   into a caller buffer, returned opaque objects move to the heap
//! - pairs and unregistered aggregates need an explicit [`Decomposition`]
//! - defaulted parameters stay explicit; a simplified twin supplies them
//!
//! Anything else fails the entity with the offending slot named.

pub mod marshal;

use flatbind_core::{
    AdapterBody, BindingConfig, Decomposition, FactoryOwnership, FieldRoute, FunctionEntity, FunctionKind,
    Mutability, NativeCall, NativeLibrary, NativeParam, NativeType, OutputRule, Ownership, Param, ParamLowering,
    PrimitiveKind, Receiver, RegistrationError, Representation, Route, RouteTarget, Slot, SmartPointerKind, TypePath,
    TypeRef,
};

use rustc_hash::FxHashSet;

use crate::abi;
use crate::classifier::{Classification, ClassTable, ClassifyError, ViewSource};
use crate::decl::{FieldDecl, FunctionDecl};

/// The class a member belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Owner<'a> {
    pub name: &'a str,
    pub native: &'a TypePath,
    pub representation: Representation,
}

/// Flat return shape: type, ownership, and how the native result reaches it.
type ReturnShape = (TypeRef, Ownership, OutputRule);

pub struct Synthesizer<'a> {
    table: &'a ClassTable,
    library: &'a NativeLibrary,
    config: &'a BindingConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(table: &'a ClassTable, library: &'a NativeLibrary, config: &'a BindingConfig) -> Self {
        Self {
            table,
            library,
            config,
        }
    }

    /// Entities for one declaration: the full entity, then the simplified
    /// twin when one was requested. Each succeeds or fails on its own.
    pub fn function(&self, decl: &FunctionDecl, owner: Option<Owner<'_>>) -> Vec<Result<FunctionEntity, RegistrationError>> {
        let mut out = vec![self.build(decl, owner, &decl.name, decl.native.params.len())];
        if let Some(simplified) = &decl.simplified {
            let defaults = decl.native.trailing_defaults();
            let result = if defaults == 0 {
                Err(RegistrationError::InvalidMember {
                    entity: entity_name(owner, simplified),
                    member: simplified.clone(),
                    reason: format!("'{}' has no defaulted parameters to omit", decl.native),
                })
            } else {
                self.build(decl, owner, simplified, decl.native.params.len() - defaults)
            };
            out.push(result);
        }
        out
    }

    fn build(
        &self,
        decl: &FunctionDecl,
        owner: Option<Owner<'_>>,
        name: &str,
        keep: usize,
    ) -> Result<FunctionEntity, RegistrationError> {
        let entity = entity_name(owner, name);
        let native = &decl.native;
        let (mut params, lowerings) = self.lower_params(&entity, &native.params, keep)?;

        let (call, receiver, (returns, ownership, output)) = match decl.kind {
            FunctionKind::Constructor => {
                let owner = owner.ok_or_else(|| RegistrationError::InvalidMember {
                    entity: entity.clone(),
                    member: name.to_string(),
                    reason: "constructor without a class".to_string(),
                })?;
                (NativeCall::Construct, None, self.construct_output(&entity, owner)?)
            }
            _ => {
                let receiver = owner
                    .filter(|_| !native.is_static())
                    .map(|o| Receiver::new(o.name, Mutability::from_const(native.is_const())));
                let shape = self.lower_return(&entity, decl, &mut params)?;
                (NativeCall::Invoke, receiver, shape)
            }
        };
        check_param_names(&entity, &params)?;

        let selector = match owner {
            Some(o) => format!("{}::{native}", o.native),
            None => native.to_string(),
        };
        let mut function = FunctionEntity::new(name, decl.kind, selector).with_return(returns, ownership);
        function.owner = owner.map(|o| o.name.to_string());
        function.receiver = receiver;
        function.params = params;
        let adapter = AdapterBody {
            call,
            lowerings,
            output,
        };
        if !adapter.is_trivial() {
            tracing::trace!(entity = %entity, ?adapter, "synthesized adapter");
            function.adapter = Some(adapter);
        }
        Ok(function)
    }

    // ========================================================================
    // Parameters
    // ========================================================================

    fn lower_params(
        &self,
        entity: &str,
        params: &[NativeParam],
        keep: usize,
    ) -> Result<(Vec<Param>, Vec<ParamLowering>), RegistrationError> {
        let mut flat = Vec::with_capacity(keep);
        let mut lowerings = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            if i >= keep {
                let value = param.default.clone().ok_or_else(|| RegistrationError::UnsupportedAdaptation {
                    entity: entity.to_string(),
                    slot: Slot::Param(param.name.clone()),
                    reason: "omitted parameter has no native default".to_string(),
                })?;
                lowerings.push(ParamLowering::SupplyDefault { value });
                continue;
            }
            let (flat_param, lowering) = self.lower_param(entity, param, flat.len())?;
            flat.push(flat_param);
            lowerings.push(lowering);
        }
        Ok((flat, lowerings))
    }

    fn lower_param(
        &self,
        entity: &str,
        param: &NativeParam,
        index: usize,
    ) -> Result<(Param, ParamLowering), RegistrationError> {
        let slot = || Slot::Param(param.name.clone());
        let name = param.name.as_str();
        let classification = self
            .table
            .classify(&param.ty)
            .map_err(|e| classify_error(entity, slot(), &param.ty, e))?;

        match classification {
            Classification::Flat(TypeRef::Void) => Err(unsupported(entity, slot(), "void parameter")),
            Classification::Flat(ty) => Ok((Param::input(name, ty), ParamLowering::Direct { param: index })),
            Classification::View { view, source } => Ok((Param::input(name, view), view_lowering(source, index))),
            Classification::Opaque {
                representation: Representation::Incomplete,
                ..
            } => Err(unsupported(entity, slot(), "incomplete type passed by value")),
            Classification::Opaque { class, .. } => Ok((
                Param::input(name, TypeRef::opaque(class, Mutability::Const)),
                ParamLowering::CopyFromPointer { param: index },
            )),
            Classification::SmartPointer {
                handle,
                kind: SmartPointerKind::Shared,
            } => Ok((Param::input(name, TypeRef::handle(handle)), ParamLowering::Direct { param: index })),
            Classification::SmartPointer { .. } => Err(unsupported(
                entity,
                slot(),
                "unique pointer parameter would transfer ownership",
            )),
            Classification::Reference { referent, mutability } => {
                self.lower_reference_param(entity, name, *referent, mutability, index)
            }
            Classification::Aggregate { .. } => Err(unsupported(entity, slot(), "aggregate parameter has no flat encoding")),
        }
    }

    fn lower_reference_param(
        &self,
        entity: &str,
        name: &str,
        referent: Classification,
        mutability: Mutability,
        index: usize,
    ) -> Result<(Param, ParamLowering), RegistrationError> {
        let slot = || Slot::Param(name.to_string());
        let bind = ParamLowering::BindReference { param: index };
        match (referent, mutability) {
            (Classification::Flat(ty @ (TypeRef::Primitive { .. } | TypeRef::Enum { .. })), Mutability::Const) => {
                Ok((Param::input(name, ty), ParamLowering::Direct { param: index }))
            }
            (Classification::Flat(ty @ TypeRef::Value { .. }), Mutability::Const) => {
                Ok((Param::input(name, TypeRef::raw(ty, Mutability::Const)), bind))
            }
            (
                Classification::Flat(ty @ (TypeRef::Primitive { .. } | TypeRef::Enum { .. } | TypeRef::Value { .. })),
                Mutability::Mut,
            ) => Ok((Param::in_out(name, TypeRef::raw(ty, Mutability::Mut)), bind)),
            (Classification::Flat(_), _) => Err(unsupported(entity, slot(), "reference to a pointer")),
            (Classification::View { view, source }, Mutability::Const) => {
                Ok((Param::input(name, view), view_lowering(source, index)))
            }
            (Classification::View { .. }, Mutability::Mut) => Err(unsupported(
                entity,
                slot(),
                "mutable reference to a string or view",
            )),
            (Classification::Opaque { class, .. }, m) => Ok((Param::input(name, TypeRef::opaque(class, m)), bind)),
            (Classification::SmartPointer { handle, .. }, Mutability::Const) => {
                Ok((Param::input(name, TypeRef::handle(handle)), bind))
            }
            (Classification::SmartPointer { .. }, Mutability::Mut) => {
                Err(unsupported(entity, slot(), "mutable reference to a smart pointer"))
            }
            (Classification::Aggregate { .. } | Classification::Reference { .. }, _) => {
                Err(unsupported(entity, slot(), "reference to an aggregate"))
            }
        }
    }

    // ========================================================================
    // Returns
    // ========================================================================

    fn construct_output(&self, entity: &str, owner: Owner<'_>) -> Result<ReturnShape, RegistrationError> {
        match owner.representation {
            Representation::Value => Ok((TypeRef::value(owner.name), Ownership::Copied, OutputRule::Direct)),
            Representation::OpaqueReference => Ok((
                TypeRef::opaque(owner.name, Mutability::Mut),
                Ownership::CallerOwned,
                OutputRule::MoveToHeap,
            )),
            other => Err(RegistrationError::InvalidMember {
                entity: entity.to_string(),
                member: "constructor".to_string(),
                reason: format!("{other:?} classes cannot be constructed"),
            }),
        }
    }

    fn lower_return(
        &self,
        entity: &str,
        decl: &FunctionDecl,
        params: &mut Vec<Param>,
    ) -> Result<ReturnShape, RegistrationError> {
        let ret = &decl.native.return_type;
        if let Some(decomposition) = &decl.decomposition {
            return self.decompose(entity, ret, decomposition, params);
        }
        let classification = self
            .table
            .classify(ret)
            .map_err(|e| classify_error(entity, Slot::Return, ret, e))?;

        if decl.factory {
            return self.factory_output(entity, ret, classification);
        }

        match classification {
            Classification::Flat(TypeRef::Void) => Ok((TypeRef::Void, Ownership::Copied, OutputRule::Void)),
            Classification::Flat(ty @ (TypeRef::RawPointer { .. } | TypeRef::OpaquePointer { .. })) => {
                Ok((ty, Ownership::Borrowed, OutputRule::Direct))
            }
            Classification::Flat(ty) => Ok((ty, Ownership::Copied, OutputRule::Direct)),
            Classification::View {
                source: ViewSource::OwnedString,
                ..
            } => self.copy_into_buffer(entity, params),
            Classification::View { view, .. } => self.view_parts(entity, view, params),
            Classification::Opaque {
                class,
                representation: Representation::OpaqueReference,
            } => Ok((
                TypeRef::opaque(class, Mutability::Mut),
                Ownership::CallerOwned,
                OutputRule::MoveToHeap,
            )),
            Classification::Opaque { .. } => Err(unsupported(entity, Slot::Return, "incomplete type returned by value")),
            Classification::SmartPointer { handle, .. } => Ok((
                TypeRef::handle(handle.clone()),
                Ownership::CallerOwned,
                OutputRule::WrapSmartPointer { handle },
            )),
            Classification::Reference { referent, mutability } => {
                self.reference_output(entity, *referent, mutability, params)
            }
            Classification::Aggregate { .. } => Err(unsupported(
                entity,
                Slot::Return,
                "pair return needs a decomposition",
            )),
        }
    }

    fn reference_output(
        &self,
        entity: &str,
        referent: Classification,
        mutability: Mutability,
        params: &mut Vec<Param>,
    ) -> Result<ReturnShape, RegistrationError> {
        match (referent, mutability) {
            (
                Classification::Flat(ty @ (TypeRef::Primitive { .. } | TypeRef::Enum { .. } | TypeRef::Value { .. })),
                Mutability::Const,
            ) => Ok((ty, Ownership::Copied, OutputRule::Direct)),
            (
                Classification::Flat(ty @ (TypeRef::Primitive { .. } | TypeRef::Enum { .. } | TypeRef::Value { .. })),
                Mutability::Mut,
            ) => Ok((TypeRef::raw(ty, Mutability::Mut), Ownership::Borrowed, OutputRule::AddressOf)),
            (Classification::Opaque { class, .. }, m) => {
                Ok((TypeRef::opaque(class, m), Ownership::Borrowed, OutputRule::AddressOf))
            }
            (Classification::View { view, .. }, Mutability::Const) => self.view_parts(entity, view, params),
            _ => Err(unsupported(entity, Slot::Return, "returned reference has no flat encoding")),
        }
    }

    /// Factories hand ownership to the caller.
    fn factory_output(
        &self,
        entity: &str,
        ret: &NativeType,
        classification: Classification,
    ) -> Result<ReturnShape, RegistrationError> {
        let (class, target, rule) = match classification {
            Classification::SmartPointer { handle, .. } => {
                return Ok((
                    TypeRef::handle(handle.clone()),
                    Ownership::CallerOwned,
                    OutputRule::WrapSmartPointer { handle },
                ));
            }
            Classification::Flat(TypeRef::OpaquePointer { class, .. }) => (class, record_path(ret), OutputRule::Direct),
            Classification::Opaque {
                class,
                representation: Representation::OpaqueReference,
            } => (class, record_path(ret), OutputRule::MoveToHeap),
            _ => {
                return Err(unsupported(
                    entity,
                    Slot::Return,
                    "factory must return an opaque object, a pointer to one, or a smart pointer",
                ));
            }
        };
        match self.config.factory_ownership {
            FactoryOwnership::Raw => Ok((TypeRef::opaque(class, Mutability::Mut), Ownership::CallerOwned, rule)),
            FactoryOwnership::SmartPointer => {
                let handle = target
                    .and_then(|path| self.table.handle_for(path))
                    .map(|(handle, _)| handle.to_string())
                    .ok_or_else(|| {
                        unsupported(
                            entity,
                            Slot::Return,
                            format!("factory result '{class}' has no registered smart pointer class"),
                        )
                    })?;
                Ok((
                    TypeRef::handle(handle.clone()),
                    Ownership::CallerOwned,
                    OutputRule::AdoptPointer { handle },
                ))
            }
        }
    }

    fn view_parts(&self, entity: &str, view: TypeRef, params: &mut Vec<Param>) -> Result<ReturnShape, RegistrationError> {
        let slot = self.push_param(entity, params, Param::output(self.config.result_slot.as_str(), TypeRef::out_slot(view)))?;
        Ok((TypeRef::Void, Ownership::Borrowed, OutputRule::ViewParts { slot }))
    }

    fn copy_into_buffer(&self, entity: &str, params: &mut Vec<Param>) -> Result<ReturnShape, RegistrationError> {
        let (buffer, written) = self.push_buffer(entity, params, self.config.result_slot.as_str())?;
        Ok((TypeRef::Void, Ownership::Copied, OutputRule::CopyIntoBuffer { buffer, written }))
    }

    fn push_buffer(&self, entity: &str, params: &mut Vec<Param>, name: &str) -> Result<(usize, usize), RegistrationError> {
        let buffer = self.push_param(
            entity,
            params,
            Param::output(name, TypeRef::span(PrimitiveKind::Char, Mutability::Mut)),
        )?;
        let written = self.push_param(
            entity,
            params,
            Param::output(format!("{name}_written"), TypeRef::out_slot(TypeRef::primitive(PrimitiveKind::Usize))),
        )?;
        Ok((buffer, written))
    }

    fn push_param(&self, entity: &str, params: &mut Vec<Param>, param: Param) -> Result<usize, RegistrationError> {
        if params.iter().any(|p| p.name == param.name) {
            return Err(unsupported(
                entity,
                Slot::Param(param.name.clone()),
                "output slot collides with a parameter of the same name",
            ));
        }
        params.push(param);
        Ok(params.len() - 1)
    }

    fn decompose(
        &self,
        entity: &str,
        ret: &NativeType,
        decomposition: &Decomposition,
        params: &mut Vec<Param>,
    ) -> Result<ReturnShape, RegistrationError> {
        let members = self.table.aggregate_members(ret, self.library).ok_or_else(|| {
            unsupported(
                entity,
                Slot::Return,
                format!("'{ret}' is not a pair or an unregistered aggregate"),
            )
        })?;
        if let Some((member, _)) = decomposition
            .routes
            .iter()
            .find(|(member, _)| !members.iter().any(|(m, _)| m == member))
        {
            return Err(unsupported(entity, Slot::Member(member.clone()), "no such member"));
        }
        for (i, (member, _)) in decomposition.routes.iter().enumerate() {
            if decomposition.routes[..i].iter().any(|(m, _)| m == member) {
                return Err(unsupported(entity, Slot::Member(member.clone()), "member is routed more than once"));
            }
        }

        let mut returns = TypeRef::Void;
        let mut fields = Vec::with_capacity(members.len());
        for (member, ty) in members {
            let slot = || Slot::Member(member.clone());
            let route = decomposition
                .route_of(&member)
                .ok_or_else(|| unsupported(entity, slot(), "member is not routed"))?;
            let classification = self
                .table
                .classify(&ty)
                .map_err(|e| classify_error(entity, slot(), &ty, e))?;
            let field = match (route, classification) {
                (
                    Route::Return,
                    Classification::Flat(t @ (TypeRef::Primitive { .. } | TypeRef::Enum { .. } | TypeRef::Value { .. })),
                ) => {
                    if !returns.is_void() {
                        return Err(unsupported(entity, slot(), "only one member can be returned directly"));
                    }
                    returns = t.clone();
                    FieldRoute {
                        member: member.clone(),
                        ty: t,
                        target: RouteTarget::Return,
                    }
                }
                (Route::Return, _) => {
                    return Err(unsupported(
                        entity,
                        slot(),
                        "only primitives, enums, and value classes can be returned directly",
                    ));
                }
                (Route::OutSlot(name), classification) => {
                    let t = match classification {
                        Classification::Flat(t) if !t.is_void() => t,
                        Classification::View { view, source } if source != ViewSource::OwnedString => view,
                        _ => {
                            return Err(unsupported(
                                entity,
                                slot(),
                                "member cannot be written to an out-slot; route it to a buffer",
                            ));
                        }
                    };
                    let index = self.push_param(entity, params, Param::output(name.as_str(), TypeRef::out_slot(t.clone())))?;
                    FieldRoute {
                        member: member.clone(),
                        ty: t,
                        target: RouteTarget::Slot { slot: index },
                    }
                }
                (Route::Buffer(name), Classification::View { view: TypeRef::StringView, .. }) => {
                    let (buffer, written) = self.push_buffer(entity, params, name)?;
                    FieldRoute {
                        member: member.clone(),
                        ty: TypeRef::StringView,
                        target: RouteTarget::Buffer { buffer, written },
                    }
                }
                (Route::Buffer(_), _) => {
                    return Err(unsupported(entity, slot(), "only strings can be copied into a buffer"));
                }
            };
            fields.push(field);
        }
        Ok((returns, Ownership::Copied, OutputRule::Decompose { fields }))
    }

    // ========================================================================
    // Synthesized members
    // ========================================================================

    /// Getter and (unless the native field is `const`) setter for a field of
    /// an opaque class.
    pub fn field_accessors(&self, owner: Owner<'_>, field: &FieldDecl) -> Vec<Result<FunctionEntity, RegistrationError>> {
        let mut out = vec![self.getter(owner, field)];
        if !field.native.is_const {
            out.push(self.setter(owner, field));
        }
        out
    }

    fn getter(&self, owner: Owner<'_>, field: &FieldDecl) -> Result<FunctionEntity, RegistrationError> {
        let name = format!("get_{}", field.name);
        let entity = entity_name(Some(owner), &name);
        let slot = || Slot::Field(field.name.clone());
        let ty = &field.native.ty;
        let classification = self
            .table
            .classify(ty)
            .map_err(|e| classify_error(&entity, slot(), ty, e))?;
        let mut params = Vec::new();
        let (returns, ownership, output) = match classification {
            Classification::Flat(TypeRef::Void) => return Err(unsupported(&entity, slot(), "void field")),
            Classification::Flat(t @ (TypeRef::RawPointer { .. } | TypeRef::OpaquePointer { .. })) => {
                (t, Ownership::Borrowed, OutputRule::Direct)
            }
            Classification::Flat(t) => (t, Ownership::Copied, OutputRule::Direct),
            Classification::View { view, .. } => self.view_parts(&entity, view, &mut params)?,
            Classification::Opaque { class, .. } => (
                TypeRef::opaque(class, Mutability::Const),
                Ownership::Borrowed,
                OutputRule::AddressOf,
            ),
            _ => return Err(unsupported(&entity, slot(), "field has no flat accessor")),
        };
        let mut getter = FunctionEntity::new(
            name,
            FunctionKind::FieldGetter,
            format!("{}::{}", owner.native, field.native.name),
        )
        .with_owner(owner.name)
        .with_receiver(Receiver::new(owner.name, Mutability::Const))
        .with_return(returns, ownership)
        .with_adapter(AdapterBody {
            call: NativeCall::ReadField {
                field: field.native.name.clone(),
            },
            lowerings: Vec::new(),
            output,
        });
        getter.params = params;
        Ok(getter)
    }

    fn setter(&self, owner: Owner<'_>, field: &FieldDecl) -> Result<FunctionEntity, RegistrationError> {
        let name = format!("set_{}", field.name);
        let entity = entity_name(Some(owner), &name);
        let value = NativeParam::new("value", field.native.ty.clone());
        let (param, lowering) = self
            .lower_param(&entity, &value, 0)
            .map_err(|e| match e {
                RegistrationError::UnsupportedAdaptation { entity, reason, .. } => {
                    RegistrationError::UnsupportedAdaptation {
                        entity,
                        slot: Slot::Field(field.name.clone()),
                        reason,
                    }
                }
                other => other,
            })?;
        Ok(FunctionEntity::new(
            name,
            FunctionKind::FieldSetter,
            format!("{}::{}", owner.native, field.native.name),
        )
        .with_owner(owner.name)
        .with_receiver(Receiver::new(owner.name, Mutability::Mut))
        .with_param(param)
        .with_adapter(AdapterBody {
            call: NativeCall::WriteField {
                field: field.native.name.clone(),
            },
            lowerings: vec![lowering],
            output: OutputRule::Void,
        }))
    }

    /// `Class_delete` for opaque and smart pointer classes.
    pub fn destructor(&self, owner: Owner<'_>) -> FunctionEntity {
        FunctionEntity::new("delete", FunctionKind::Destructor, format!("~{}", owner.native))
            .with_owner(owner.name)
            .with_receiver(Receiver::new(owner.name, Mutability::Mut))
            .with_adapter(AdapterBody {
                call: NativeCall::Destroy,
                lowerings: Vec::new(),
                output: OutputRule::Void,
            })
    }

    /// `Class_get` for a smart pointer class: the managed object.
    pub fn dereference(&self, owner: Owner<'_>, target: &TypePath) -> Result<FunctionEntity, RegistrationError> {
        let entity = entity_name(Some(owner), "get");
        let target_ty = NativeType::Record(target.clone());
        let returns = match self.table.classify(&target_ty) {
            Ok(Classification::Flat(value @ TypeRef::Value { .. })) => TypeRef::raw(value, Mutability::Mut),
            Ok(Classification::Opaque { class, .. }) => TypeRef::opaque(class, Mutability::Mut),
            Ok(_) => return Err(unsupported(&entity, Slot::Return, "smart pointer target is not a class")),
            Err(e) => return Err(classify_error(owner.name, Slot::Return, &target_ty, e)),
        };
        Ok(FunctionEntity::new("get", FunctionKind::Dereference, format!("{}::get() const", owner.native))
            .with_owner(owner.name)
            .with_receiver(Receiver::new(owner.name, Mutability::Const))
            .with_return(returns, Ownership::Borrowed)
            .with_adapter(AdapterBody {
                call: NativeCall::Dereference,
                lowerings: Vec::new(),
                output: OutputRule::AddressOf,
            }))
    }
}

fn entity_name(owner: Option<Owner<'_>>, name: &str) -> String {
    match owner {
        Some(o) => format!("{}_{name}", o.name),
        None => name.to_string(),
    }
}

fn view_lowering(source: ViewSource, param: usize) -> ParamLowering {
    match source {
        ViewSource::Span | ViewSource::StringView => ParamLowering::BuildView { param },
        ViewSource::CString => ParamLowering::MaterializeCString { param },
        ViewSource::OwnedString => ParamLowering::MaterializeString { param },
    }
}

/// Record path behind a by-value record or a pointer to one.
fn record_path(ty: &NativeType) -> Option<&TypePath> {
    match ty {
        NativeType::Record(path) => Some(path),
        NativeType::Pointer { pointee, .. } => record_path(pointee),
        _ => None,
    }
}

/// Every C slot a parameter expands to (`x` and `x_len` for views) must be
/// unique, with `_this` reserved for the receiver.
fn check_param_names(entity: &str, params: &[Param]) -> Result<(), RegistrationError> {
    let mut taken = FxHashSet::default();
    taken.insert("_this".to_string());
    for param in params {
        for name in abi::slot_names(&param.name, &param.ty) {
            if taken.contains(&name) {
                return Err(unsupported(
                    entity,
                    Slot::Param(param.name.clone()),
                    format!("C slot '{name}' is already taken"),
                ));
            }
            taken.insert(name);
        }
    }
    Ok(())
}

fn unsupported(entity: &str, slot: Slot, reason: impl Into<String>) -> RegistrationError {
    RegistrationError::UnsupportedAdaptation {
        entity: entity.to_string(),
        slot,
        reason: reason.into(),
    }
}

fn classify_error(entity: &str, slot: Slot, ty: &NativeType, error: ClassifyError) -> RegistrationError {
    match error {
        ClassifyError::Unclassifiable { reason } => RegistrationError::UnclassifiableType {
            entity: entity.to_string(),
            slot,
            ty: format!("{ty}: {reason}"),
        },
        ClassifyError::Unresolved { reference } => RegistrationError::UnresolvedReference {
            entity: entity.to_string(),
            reference,
        },
    }
}
