//! Entity Registry.
//!
//! [`EntityRegistry`] is the `Open` state: it accepts declarations, checks
//! what can be checked locally, and tracks exported names. [`finalize`]
//! consumes it and produces a [`FinalizedModule`]; there is no way back.
//!
//! Everything that depends on the complete set of registrations happens in
//! finalize, so the order of `register_*` calls does not change the result:
//!
//! 1. the const overload policy drops disfavoured const/non-const twins
//! 2. every claimant of a duplicated name is excluded, and so is every
//!    class or enum wrapping a native type another one also wraps, and a
//!    lone overload that kept its native name
//! 3. classes are validated to a fixpoint (value class fields and layout,
//!    smart pointer targets); an invalid class makes everything that
//!    mentions it unresolved
//! 4. adapters are synthesized, symbols and ABI hashes assigned
//! 5. entities are sorted by name
//!
//! [`finalize`]: EntityRegistry::finalize

use flatbind_core::{
    BindingConfig, ClassEntity, ConstOverloadPolicy, Diagnostics, EnumEntity, FieldEntity, FunctionEntity,
    NativeFunction, NativeLibrary, NativeType, QualifiedName, RegistrationError, Representation, Slot,
    SmartPointerTarget, TypeRef,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use crate::abi;
use crate::adapter::{Owner, Synthesizer};
use crate::classifier::{ClassTable, ClassifyError};
use crate::decl::{ClassDecl, EnumDecl, FunctionDecl};
use crate::descriptor::{FinalizedModule, ModuleDescriptor, SmartPointerEntry};
use crate::instantiation::InstantiationTable;
use crate::layout::{ComputedLayout, LayoutEngine, LayoutError};
use crate::overload::{are_const_twins, is_identifier};

/// Who holds an exported name. Methods remember their native overload so
/// const twins can share a name when the policy drops one of them.
#[derive(Debug, Clone)]
struct Claim {
    description: String,
    method: Option<(String, NativeFunction)>,
}

/// The open registry of one module.
pub struct EntityRegistry<'lib> {
    module: String,
    library: &'lib NativeLibrary,
    config: BindingConfig,
    classes: Vec<ClassDecl>,
    enums: Vec<EnumDecl>,
    functions: Vec<FunctionDecl>,
    instantiations: InstantiationTable,
    claimed: FxHashMap<String, Claim>,
    diagnostics: Diagnostics,
}

impl<'lib> EntityRegistry<'lib> {
    pub fn new(module: impl Into<String>, library: &'lib NativeLibrary, config: BindingConfig) -> Self {
        Self {
            module: module.into(),
            library,
            config,
            classes: Vec::new(),
            enums: Vec::new(),
            functions: Vec::new(),
            instantiations: InstantiationTable::new(),
            claimed: FxHashMap::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn library(&self) -> &'lib NativeLibrary {
        self.library
    }

    pub fn config(&self) -> &BindingConfig {
        &self.config
    }

    pub fn module_name(&self) -> &str {
        &self.module
    }

    /// Failures recorded so far. Name collisions are only recorded at finalize.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Record a failure raised outside the registry (e.g. overload selection).
    pub fn record(&mut self, error: RegistrationError) {
        debug!(entity = error.entity(), kind = %error.kind(), "registration failed");
        self.diagnostics.push(error);
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains_key(name)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a class with its members.
    ///
    /// Local failures are recorded and the class is dropped. A name collision
    /// is returned but the class is kept: finalize excludes every claimant of
    /// the name and records the collision once.
    pub fn register_class(&mut self, decl: ClassDecl) -> Result<(), RegistrationError> {
        if let Err(error) = self.check_class(&decl) {
            self.record(error.clone());
            return Err(error);
        }
        trace!(class = %decl.name, native = %decl.native, representation = ?decl.representation, "class registered");
        let claims = class_claims(&decl);
        self.classes.push(decl);
        self.claim_all(claims)
    }

    pub fn register_enum(&mut self, decl: EnumDecl) -> Result<(), RegistrationError> {
        if let Err(error) = check_enum(&decl) {
            self.record(error.clone());
            return Err(error);
        }
        let claim = Claim {
            description: decl.native.name.to_string(),
            method: None,
        };
        let name = decl.name.clone();
        self.enums.push(decl);
        self.claim_all(vec![(name, claim)])
    }

    /// Register a free function (and its simplified twin, if any).
    pub fn register_function(&mut self, decl: FunctionDecl) -> Result<(), RegistrationError> {
        if let Err(error) = self.check_function(&decl) {
            self.record(error.clone());
            return Err(error);
        }
        let claims = decl
            .claimed_names()
            .map(|name| {
                (
                    name.to_string(),
                    Claim {
                        description: decl.native.to_string(),
                        method: None,
                    },
                )
            })
            .collect();
        self.functions.push(decl);
        self.claim_all(claims)
    }

    fn check_class(&mut self, decl: &ClassDecl) -> Result<(), RegistrationError> {
        let entity = decl.name.as_str();
        check_name(entity, entity)?;
        if decl.native.has_template_params() {
            return Err(RegistrationError::UnclassifiableType {
                entity: entity.to_string(),
                slot: Slot::Layout,
                ty: format!("{}: templates are exported per instantiation", decl.native),
            });
        }
        match decl.representation {
            Representation::Value | Representation::OpaqueReference => {
                if self.library.class(&decl.native).is_none() {
                    return Err(RegistrationError::UnresolvedReference {
                        entity: entity.to_string(),
                        reference: decl.native.to_string(),
                    });
                }
            }
            Representation::SmartPointer if decl.smart_pointer.is_none() => {
                return Err(RegistrationError::InvalidMember {
                    entity: entity.to_string(),
                    member: "target".to_string(),
                    reason: "smart pointer class without a target".to_string(),
                });
            }
            Representation::SmartPointer | Representation::Incomplete => {}
        }
        if !decl.representation.accepts_members() {
            let member = decl
                .constructors
                .iter()
                .chain(&decl.methods)
                .map(|m| m.name.as_str())
                .chain(decl.fields.iter().map(|f| f.name.as_str()))
                .next();
            if let Some(member) = member {
                return Err(invalid_member_on(entity, member, decl.representation));
            }
        }
        for member in decl.constructors.iter().chain(&decl.methods) {
            for name in member.claimed_names() {
                check_name(&format!("{entity}_{name}"), name)?;
            }
        }
        let mut field_names = FxHashSet::default();
        for field in &decl.fields {
            check_name(&format!("{entity}_{}", field.name), &field.name)?;
            if !field_names.insert(field.name.as_str()) {
                return Err(RegistrationError::InvalidMember {
                    entity: entity.to_string(),
                    member: field.name.clone(),
                    reason: "field declared twice".to_string(),
                });
            }
        }

        // class instance, then method template instances
        let mut instances: Vec<(QualifiedName, Vec<NativeType>, String)> = Vec::new();
        if decl.native.is_instance() && decl.representation != Representation::SmartPointer {
            instances.push((decl.native.name.clone(), decl.native.args.clone(), entity.to_string()));
        }
        for method in &decl.methods {
            if !method.native.template_args.is_empty() {
                instances.push((
                    decl.native.name.child(method.native.name.clone()),
                    method.native.template_args.clone(),
                    format!("{entity}_{}", method.name),
                ));
            }
        }
        self.claim_instances(instances)
    }

    fn check_function(&mut self, decl: &FunctionDecl) -> Result<(), RegistrationError> {
        for name in decl.claimed_names() {
            check_name(name, name)?;
        }
        if decl.native.template_args.is_empty() {
            return Ok(());
        }
        self.claim_instances(vec![(
            decl.native.qualified_name(),
            decl.native.template_args.clone(),
            decl.name.clone(),
        )])
    }

    /// All-or-nothing: nothing is claimed unless every instance is new.
    fn claim_instances(&mut self, instances: Vec<(QualifiedName, Vec<NativeType>, String)>) -> Result<(), RegistrationError> {
        let mut scratch = self.instantiations.clone();
        for (template, args, name) in &instances {
            scratch.claim(template, args, name)?;
        }
        self.instantiations = scratch;
        Ok(())
    }

    fn claim_all(&mut self, claims: Vec<(String, Claim)>) -> Result<(), RegistrationError> {
        let mut collision = None;
        for (name, claim) in claims {
            match self.claimed.get(&name) {
                Some(existing) if !self.shares_name(existing, &claim) => {
                    collision.get_or_insert_with(|| RegistrationError::DuplicateExportedName {
                        name: name.clone(),
                        first: existing.description.clone(),
                        second: claim.description.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    self.claimed.insert(name, claim);
                }
            }
        }
        collision.map_or(Ok(()), Err)
    }

    /// Const twins of one class may share a name when the policy keeps one.
    fn shares_name(&self, existing: &Claim, incoming: &Claim) -> bool {
        if self.config.const_overloads == ConstOverloadPolicy::ExposeBoth {
            return false;
        }
        match (&existing.method, &incoming.method) {
            (Some((a_class, a)), Some((b_class, b))) => a_class == b_class && are_const_twins(a, b),
            _ => false,
        }
    }

    // ========================================================================
    // Finalize
    // ========================================================================

    /// Close the registry and build the descriptor.
    pub fn finalize(self) -> FinalizedModule {
        #[cfg(feature = "profiling")]
        profiling::scope!("EntityRegistry::finalize");

        let EntityRegistry {
            module,
            library,
            config,
            mut classes,
            enums,
            functions,
            mut diagnostics,
            ..
        } = self;
        let prefix = config.prefix_for(&module).to_string();

        if config.const_overloads != ConstOverloadPolicy::ExposeBoth {
            for class in &mut classes {
                drop_const_twins(class, config.const_overloads);
            }
        }

        let duplicated = find_duplicates(&classes, &enums, &functions, &mut diagnostics);
        let rewrapped = find_rewrapped(&classes, &enums, &duplicated, &mut diagnostics);
        let excluded = |name: &String| duplicated.contains(name) || rewrapped.contains(name);
        let enums: Vec<&EnumDecl> = enums.iter().filter(|e| !excluded(&e.name)).collect();
        let mut valid: Vec<usize> = (0..classes.len()).filter(|&i| !excluded(&classes[i].name)).collect();

        let (table, value_fields, layouts) = loop {
            let table = ClassTable::from_decls(valid.iter().map(|&i| &classes[i]), enums.iter().copied());
            let mut invalid: Vec<(usize, RegistrationError)> = Vec::new();
            let mut value_fields: FxHashMap<String, Vec<(String, TypeRef)>> = FxHashMap::default();
            for &i in &valid {
                let class = &classes[i];
                let check = match class.representation {
                    Representation::Value => {
                        resolve_value_fields(class, library, &table).map(|fields| {
                            value_fields.insert(class.name.clone(), fields);
                        })
                    }
                    Representation::SmartPointer => check_smart_pointer_target(class, &table),
                    Representation::OpaqueReference | Representation::Incomplete => Ok(()),
                };
                if let Err(error) = check {
                    invalid.push((i, error));
                }
            }

            let mut layouts: FxHashMap<String, ComputedLayout> = FxHashMap::default();
            if invalid.is_empty() {
                let mut engine = LayoutEngine::new(&value_fields);
                for &i in &valid {
                    let class = &classes[i];
                    if class.representation != Representation::Value {
                        continue;
                    }
                    match engine.layout(&class.name) {
                        Ok(computed) => {
                            layouts.insert(class.name.clone(), computed);
                        }
                        Err(error) => invalid.push((i, layout_error(&class.name, error))),
                    }
                }
            }

            if invalid.is_empty() {
                break (table, value_fields, layouts);
            }
            for (i, error) in invalid {
                trace!(class = %classes[i].name, "class invalidated");
                valid.retain(|&v| v != i);
                diagnostics.push(error);
            }
        };

        let synth = Synthesizer::new(&table, library, &config);
        let mut out_classes = Vec::with_capacity(valid.len());
        let mut manifest = Vec::new();
        for &i in &valid {
            let decl = &classes[i];
            let owner = Owner {
                name: &decl.name,
                native: &decl.native,
                representation: decl.representation,
            };
            let mut entity = ClassEntity::new(decl.name.clone(), decl.native.to_string(), decl.representation);
            for ctor in &decl.constructors {
                for result in synth.function(ctor, Some(owner)) {
                    admit(result, &duplicated, &mut diagnostics, &mut entity.constructors);
                }
            }
            for method in &decl.methods {
                if let Some(error) = unnamed_overload(method, &format!("{}_{}", decl.name, method.name), &duplicated) {
                    diagnostics.push(error);
                    continue;
                }
                for result in synth.function(method, Some(owner)) {
                    admit(result, &duplicated, &mut diagnostics, &mut entity.methods);
                }
            }
            match decl.representation {
                Representation::Value => {
                    if let (Some(fields), Some(computed)) = (value_fields.get(&decl.name), layouts.get(&decl.name)) {
                        entity.fields = fields
                            .iter()
                            .zip(&computed.offsets)
                            .map(|((name, ty), offset)| FieldEntity {
                                name: name.clone(),
                                ty: ty.clone(),
                                offset: *offset,
                            })
                            .collect();
                        entity.layout = Some(computed.layout);
                    }
                }
                Representation::OpaqueReference => {
                    for field in &decl.fields {
                        for result in synth.field_accessors(owner, field) {
                            admit(result, &duplicated, &mut diagnostics, &mut entity.methods);
                        }
                    }
                    admit(Ok(synth.destructor(owner)), &duplicated, &mut diagnostics, &mut entity.methods);
                }
                Representation::SmartPointer => {
                    admit(Ok(synth.destructor(owner)), &duplicated, &mut diagnostics, &mut entity.methods);
                    if let Some(sp) = &decl.smart_pointer {
                        admit(synth.dereference(owner, &sp.target), &duplicated, &mut diagnostics, &mut entity.methods);
                        if let Some((target, _)) = table.class(&sp.target) {
                            entity.smart_pointer = Some(SmartPointerTarget {
                                class: target.to_string(),
                                kind: sp.kind,
                            });
                            manifest.push(SmartPointerEntry {
                                handle: decl.name.clone(),
                                target: target.to_string(),
                                kind: sp.kind,
                            });
                        }
                    }
                }
                Representation::Incomplete => {}
            }
            entity.constructors.sort_by(|a, b| a.name.cmp(&b.name));
            entity.methods.sort_by(|a, b| a.name.cmp(&b.name));
            out_classes.push(entity);
        }

        let mut out_functions = Vec::with_capacity(functions.len());
        for decl in &functions {
            if let Some(error) = unnamed_overload(decl, &decl.name, &duplicated) {
                diagnostics.push(error);
                continue;
            }
            for result in synth.function(decl, None) {
                admit(result, &duplicated, &mut diagnostics, &mut out_functions);
            }
        }

        let mut out_enums: Vec<EnumEntity> = enums
            .iter()
            .map(|decl| {
                decl.native.variants.iter().fold(
                    EnumEntity::new(decl.name.clone(), decl.native.name.to_string(), decl.native.repr),
                    |e, (name, value)| e.with_variant(name.clone(), *value),
                )
            })
            .collect();

        for function in out_classes
            .iter_mut()
            .flat_map(|c| c.constructors.iter_mut().chain(c.methods.iter_mut()))
            .chain(out_functions.iter_mut())
        {
            function.symbol = format!("{prefix}_{}", function.export_key());
            function.abi_hash = abi::signature_hash(function);
        }

        out_classes.sort_by(|a, b| a.name.cmp(&b.name));
        out_enums.sort_by(|a, b| a.name.cmp(&b.name));
        out_functions.sort_by(|a, b| a.name.cmp(&b.name));
        manifest.sort();
        diagnostics.sort();

        for error in &diagnostics {
            warn!(entity = error.entity(), kind = %error.kind(), "{error}");
        }
        debug!(
            module = %module,
            classes = out_classes.len(),
            enums = out_enums.len(),
            functions = out_functions.len(),
            diagnostics = diagnostics.len(),
            "finalized module"
        );

        let descriptor = ModuleDescriptor {
            module,
            symbol_prefix: prefix,
            classes: out_classes,
            enums: out_enums,
            functions: out_functions,
            smart_pointers: manifest,
        };
        FinalizedModule::new(descriptor, diagnostics)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn check_name(entity: &str, name: &str) -> Result<(), RegistrationError> {
    if is_identifier(name) {
        return Ok(());
    }
    Err(RegistrationError::MissingExportedName {
        entity: entity.to_string(),
        reason: format!("'{name}' is not a valid identifier"),
    })
}

fn check_enum(decl: &EnumDecl) -> Result<(), RegistrationError> {
    check_name(&decl.name, &decl.name)?;
    let repr = decl.native.repr;
    let mut seen = FxHashSet::default();
    for (variant, value) in &decl.native.variants {
        check_name(&format!("{}_{variant}", decl.name), variant)?;
        if !seen.insert(variant.as_str()) {
            return Err(RegistrationError::InvalidMember {
                entity: decl.name.clone(),
                member: variant.clone(),
                reason: "variant declared twice".to_string(),
            });
        }
        if !repr.contains(*value) {
            return Err(RegistrationError::InvalidMember {
                entity: decl.name.clone(),
                member: variant.clone(),
                reason: format!("value {value} does not fit {}", repr.primitive()),
            });
        }
    }
    Ok(())
}

fn invalid_member_on(entity: &str, member: &str, representation: Representation) -> RegistrationError {
    let reason = match representation {
        Representation::Incomplete => "an incomplete class accepts no members",
        _ => "a smart pointer class exposes only lifetime and dereference",
    };
    RegistrationError::InvalidMember {
        entity: entity.to_string(),
        member: member.to_string(),
        reason: reason.to_string(),
    }
}

fn class_claims(decl: &ClassDecl) -> Vec<(String, Claim)> {
    // claims() lists the class, constructors, methods, then synthesized members
    let natives = std::iter::once(None)
        .chain(decl.constructors.iter().flat_map(|c| c.claimed_names().map(|_| None)))
        .chain(decl.methods.iter().flat_map(|m| m.claimed_names().map(move |_| Some(&m.native))))
        .chain(std::iter::repeat(None));
    decl.claims()
        .into_iter()
        .zip(natives)
        .map(|((key, description), native)| {
            let method = native.map(|n| (decl.name.clone(), n.clone()));
            (key, Claim { description, method })
        })
        .collect()
}

fn drop_const_twins(class: &mut ClassDecl, policy: ConstOverloadPolicy) {
    let keep_const = policy == ConstOverloadPolicy::PreferConst;
    let methods = std::mem::take(&mut class.methods);
    let mut kept = Vec::with_capacity(methods.len());
    for (i, method) in methods.iter().enumerate() {
        let disfavoured = method.native.is_const() != keep_const;
        let has_twin = methods
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && are_const_twins(&method.native, &other.native));
        if disfavoured && has_twin {
            trace!(class = %class.name, method = %method.native, "dropped const twin");
            continue;
        }
        kept.push(method.clone());
    }
    class.methods = kept;
}

/// Names claimed more than once, each recorded as one diagnostic naming the
/// two smallest claimant descriptions.
fn find_duplicates(
    classes: &[ClassDecl],
    enums: &[EnumDecl],
    functions: &[FunctionDecl],
    diagnostics: &mut Diagnostics,
) -> FxHashSet<String> {
    let mut claims: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for class in classes {
        for (key, description) in class.claims() {
            claims.entry(key).or_default().push(description);
        }
    }
    for e in enums {
        claims.entry(e.name.clone()).or_default().push(e.native.name.to_string());
    }
    for f in functions {
        for name in f.claimed_names() {
            claims.entry(name.to_string()).or_default().push(f.native.to_string());
        }
    }

    let mut duplicated = FxHashSet::default();
    for (name, mut descriptions) in claims {
        if descriptions.len() < 2 {
            continue;
        }
        descriptions.sort();
        diagnostics.push(RegistrationError::DuplicateExportedName {
            name: name.clone(),
            first: descriptions[0].clone(),
            second: descriptions[1].clone(),
        });
        duplicated.insert(name);
    }
    duplicated
}

/// Classes and enums wrapping a native type that another registration also
/// wraps. None of them wins; each is reported and excluded.
fn find_rewrapped(
    classes: &[ClassDecl],
    enums: &[EnumDecl],
    duplicated: &FxHashSet<String>,
    diagnostics: &mut Diagnostics,
) -> FxHashSet<String> {
    let mut class_wrappers: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for class in classes.iter().filter(|c| !duplicated.contains(&c.name)) {
        class_wrappers.entry(class.native.to_string()).or_default().push(class.name.clone());
    }
    let mut enum_wrappers: FxHashMap<String, Vec<String>> = FxHashMap::default();
    for e in enums.iter().filter(|e| !duplicated.contains(&e.name)) {
        enum_wrappers.entry(e.native.name.to_string()).or_default().push(e.name.clone());
    }

    let mut excluded = FxHashSet::default();
    for (native, mut names) in class_wrappers.into_iter().chain(enum_wrappers) {
        if names.len() < 2 {
            continue;
        }
        names.sort();
        for name in &names {
            let other = names.iter().find(|n| *n != name).unwrap_or(name);
            diagnostics.push(RegistrationError::InvalidMember {
                entity: name.clone(),
                member: native.clone(),
                reason: format!("'{native}' is also registered as '{other}'"),
            });
            excluded.insert(name.clone());
        }
    }
    excluded
}

/// Flat fields of a value class in native order, under their exported names.
fn resolve_value_fields(
    class: &ClassDecl,
    library: &NativeLibrary,
    table: &ClassTable,
) -> Result<Vec<(String, TypeRef)>, RegistrationError> {
    let entity = class.name.as_str();
    let native = library
        .class(&class.native)
        .ok_or_else(|| RegistrationError::UnresolvedReference {
            entity: entity.to_string(),
            reference: class.native.to_string(),
        })?;
    if !native.traits.is_flat_candidate() {
        return Err(RegistrationError::UnsupportedAdaptation {
            entity: entity.to_string(),
            slot: Slot::Layout,
            reason: "value classes need trivially copyable storage with no virtual functions".to_string(),
        });
    }
    if let Some(unknown) = class.fields.iter().find(|d| native.field(&d.native.name).is_none()) {
        return Err(RegistrationError::InvalidMember {
            entity: entity.to_string(),
            member: unknown.name.clone(),
            reason: format!("'{}' has no field '{}'", class.native, unknown.native.name),
        });
    }

    let mut fields = Vec::with_capacity(native.fields.len());
    for field in &native.fields {
        let exported = if class.fields.is_empty() {
            field.name.clone()
        } else {
            class
                .fields
                .iter()
                .find(|d| d.native.name == field.name)
                .map(|d| d.name.clone())
                .ok_or_else(|| RegistrationError::InvalidMember {
                    entity: entity.to_string(),
                    member: field.name.clone(),
                    reason: "a value class must expose every native field".to_string(),
                })?
        };
        let ty = table.classify_flat(&field.ty).map_err(|e| match e {
            ClassifyError::Unresolved { reference } => RegistrationError::UnresolvedReference {
                entity: entity.to_string(),
                reference,
            },
            ClassifyError::Unclassifiable { reason } => RegistrationError::UnclassifiableType {
                entity: entity.to_string(),
                slot: Slot::Field(exported.clone()),
                ty: format!("{}: {reason}", field.ty),
            },
        })?;
        match ty {
            TypeRef::Primitive { .. } | TypeRef::Enum { .. } | TypeRef::Value { .. } => fields.push((exported, ty)),
            other => {
                return Err(RegistrationError::UnclassifiableType {
                    entity: entity.to_string(),
                    slot: Slot::Field(exported),
                    ty: format!("{}: '{other}' cannot be stored in a value class", field.ty),
                });
            }
        }
    }
    Ok(fields)
}

fn check_smart_pointer_target(class: &ClassDecl, table: &ClassTable) -> Result<(), RegistrationError> {
    match &class.smart_pointer {
        Some(sp) if table.class(&sp.target).is_some() => Ok(()),
        Some(sp) => Err(RegistrationError::UnresolvedReference {
            entity: class.name.clone(),
            reference: sp.target.to_string(),
        }),
        None => Err(RegistrationError::InvalidMember {
            entity: class.name.clone(),
            member: "target".to_string(),
            reason: "smart pointer class without a target".to_string(),
        }),
    }
}

fn layout_error(class: &str, error: LayoutError) -> RegistrationError {
    match error {
        LayoutError::UnknownClass(reference) => RegistrationError::UnresolvedReference {
            entity: class.to_string(),
            reference,
        },
        LayoutError::NotFlat { field, ty, .. } => RegistrationError::UnclassifiableType {
            entity: class.to_string(),
            slot: Slot::Field(field),
            ty,
        },
        other => RegistrationError::UnsupportedAdaptation {
            entity: class.to_string(),
            slot: Slot::Layout,
            reason: other.to_string(),
        },
    }
}

/// An overload that kept its native name needs one unless a duplicate was
/// already reported for that name.
fn unnamed_overload(decl: &FunctionDecl, key: &str, duplicated: &FxHashSet<String>) -> Option<RegistrationError> {
    if !decl.unnamed_overload || duplicated.contains(key) {
        return None;
    }
    Some(RegistrationError::MissingExportedName {
        entity: key.to_string(),
        reason: format!("'{}' is one of several native overloads", decl.native),
    })
}

/// Keep a synthesized entity, or record why it failed. Entities under a
/// duplicated name were already reported and are dropped silently.
fn admit(
    result: Result<FunctionEntity, RegistrationError>,
    duplicated: &FxHashSet<String>,
    diagnostics: &mut Diagnostics,
    into: &mut Vec<FunctionEntity>,
) {
    match result {
        Ok(entity) if duplicated.contains(&entity.export_key()) => {}
        Ok(entity) => into.push(entity),
        Err(error) if duplicated.contains(error.entity()) => {}
        Err(error) => diagnostics.push(error),
    }
}
