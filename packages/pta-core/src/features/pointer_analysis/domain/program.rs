//! Program Model
//!
//! Read-only view of the analyzed program: class hierarchy, methods with their
//! statement lists, variables and fields. Built once by a front end (or a test)
//! and injected into the solver, which never mutates it.
//!
//! Statements form a tagged union matched exhaustively by the solver; there is
//! no visitor indirection. Dispatch follows Java semantics: virtual lookup
//! walks the receiver's superclass chain, static/special resolution walks the
//! declared class chain and never consults points-to information.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class identifier (arena index)
pub type ClassId = u32;

/// Method identifier (arena index)
pub type MethodId = u32;

/// Variable identifier, unique across the whole program
pub type VarId = u32;

/// Field identifier (arena index)
pub type FieldId = u32;

/// Abstract object identifier, owned by the heap model
pub type ObjId = u32;

/// Stable reference to a statement: (method, position in its body)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtRef {
    pub method: MethodId,
    pub index: u32,
}

impl fmt::Display for StmtRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}#{}", self.method, self.index)
    }
}

/// Invocation kind, matching Java bytecode call semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    /// Static method call, resolved by declared class alone
    Static,
    /// Constructor/private/super call, resolved by declared class alone
    Special,
    /// Instance call dispatched on the receiver's runtime class
    Virtual,
    /// Instance call through an interface signature
    Interface,
}

impl CallKind {
    /// Whether resolution requires a receiver object
    #[inline]
    pub fn is_dispatched(&self) -> bool {
        matches!(self, CallKind::Virtual | CallKind::Interface)
    }
}

/// An invocation statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoke {
    pub kind: CallKind,
    /// Receiver variable; `None` for static calls
    pub recv: Option<VarId>,
    /// Class declaring the target signature (an interface for Interface calls)
    pub class: ClassId,
    /// Target signature within the declared class
    pub signature: String,
    /// Actual arguments, positionally matched to formal parameters
    pub args: Vec<VarId>,
    /// Variable receiving the call result; `None` when discarded
    pub result: Option<VarId>,
}

/// Statement shapes relevant to points-to analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `x = new T()`
    New { lhs: VarId, class: ClassId },
    /// `x = y`
    Copy { lhs: VarId, rhs: VarId },
    /// `x = C.f`
    LoadStatic { lhs: VarId, field: FieldId },
    /// `C.f = x`
    StoreStatic { field: FieldId, rhs: VarId },
    /// `x = y.f`
    LoadField {
        lhs: VarId,
        base: VarId,
        field: FieldId,
    },
    /// `y.f = x`
    StoreField {
        base: VarId,
        field: FieldId,
        rhs: VarId,
    },
    /// `x = a[*]` (array elements modeled uniformly)
    LoadArray { lhs: VarId, base: VarId },
    /// `a[*] = x`
    StoreArray { base: VarId, rhs: VarId },
    /// Any call site
    Invoke(Invoke),
}

/// A class or interface declaration
#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    pub superclass: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    pub is_interface: bool,
    /// Methods declared directly in this class, keyed by signature
    declared: FxHashMap<String, MethodId>,
}

/// A field declaration
#[derive(Debug, Clone)]
pub struct Field {
    pub class: ClassId,
    pub name: String,
    pub is_static: bool,
}

/// A method with its analyzable body
#[derive(Debug, Clone)]
pub struct Method {
    pub class: ClassId,
    pub signature: String,
    pub is_static: bool,
    pub is_abstract: bool,
    /// Implicit receiver parameter; `None` for static methods
    pub this: Option<VarId>,
    /// Formal parameters in declaration order
    pub params: Vec<VarId>,
    /// Variables returned by this method (a body may have several returns)
    pub ret_vars: Vec<VarId>,
    pub stmts: Vec<Stmt>,
}

/// A local variable
#[derive(Debug, Clone)]
pub struct Var {
    pub method: MethodId,
    pub name: String,
}

/// The whole-program model handle
#[derive(Debug, Default)]
pub struct Program {
    classes: Vec<Class>,
    methods: Vec<Method>,
    vars: Vec<Var>,
    fields: Vec<Field>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Construction (front-end / test builder API)
    // ═══════════════════════════════════════════════════════════════════════

    /// Declare a class with an optional superclass
    pub fn add_class(&mut self, name: impl Into<String>, superclass: Option<ClassId>) -> ClassId {
        let id = self.classes.len() as ClassId;
        self.classes.push(Class {
            name: name.into(),
            superclass,
            interfaces: Vec::new(),
            is_interface: false,
            declared: FxHashMap::default(),
        });
        id
    }

    /// Declare an interface
    pub fn add_interface(&mut self, name: impl Into<String>) -> ClassId {
        let id = self.add_class(name, None);
        self.classes[id as usize].is_interface = true;
        id
    }

    /// Record that `class` implements `iface`
    pub fn add_implements(&mut self, class: ClassId, iface: ClassId) {
        self.classes[class as usize].interfaces.push(iface);
    }

    /// Declare a field on `class`
    pub fn add_field(&mut self, class: ClassId, name: impl Into<String>, is_static: bool) -> FieldId {
        let id = self.fields.len() as FieldId;
        self.fields.push(Field {
            class,
            name: name.into(),
            is_static,
        });
        id
    }

    /// Declare a method; instance methods get an implicit `this` variable
    pub fn add_method(
        &mut self,
        class: ClassId,
        signature: impl Into<String>,
        is_static: bool,
    ) -> MethodId {
        let id = self.methods.len() as MethodId;
        let signature = signature.into();
        self.methods.push(Method {
            class,
            signature: signature.clone(),
            is_static,
            is_abstract: false,
            this: None,
            params: Vec::new(),
            ret_vars: Vec::new(),
            stmts: Vec::new(),
        });
        if !is_static {
            let this = self.add_var(id, "this");
            self.methods[id as usize].this = Some(this);
        }
        self.classes[class as usize].declared.insert(signature, id);
        id
    }

    /// Declare an abstract method (no body, never a dispatch target)
    pub fn add_abstract_method(&mut self, class: ClassId, signature: impl Into<String>) -> MethodId {
        let id = self.add_method(class, signature, false);
        self.methods[id as usize].is_abstract = true;
        id
    }

    /// Declare a local variable in `method`
    pub fn add_var(&mut self, method: MethodId, name: impl Into<String>) -> VarId {
        let id = self.vars.len() as VarId;
        self.vars.push(Var {
            method,
            name: name.into(),
        });
        id
    }

    /// Declare a formal parameter on `method`
    pub fn add_param(&mut self, method: MethodId, name: impl Into<String>) -> VarId {
        let var = self.add_var(method, name);
        self.methods[method as usize].params.push(var);
        var
    }

    /// Mark `var` as a return variable of `method`
    pub fn add_ret(&mut self, method: MethodId, var: VarId) {
        self.methods[method as usize].ret_vars.push(var);
    }

    /// Append a statement to `method`'s body
    pub fn push_stmt(&mut self, method: MethodId, stmt: Stmt) -> StmtRef {
        let body = &mut self.methods[method as usize].stmts;
        let index = body.len() as u32;
        body.push(stmt);
        StmtRef { method, index }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Read-only accessors
    // ═══════════════════════════════════════════════════════════════════════

    #[inline]
    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id as usize]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id as usize]
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id as usize]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id as usize]
    }

    #[inline]
    pub fn stmt(&self, site: StmtRef) -> &Stmt {
        &self.methods[site.method as usize].stmts[site.index as usize]
    }

    #[inline]
    pub fn num_methods(&self) -> usize {
        self.methods.len()
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &Method)> {
        self.methods.iter().enumerate().map(|(i, m)| (i as MethodId, m))
    }

    /// Fully qualified method name, for diagnostics
    pub fn method_name(&self, id: MethodId) -> String {
        let m = self.method(id);
        format!("{}.{}", self.class(m.class).name, m.signature)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Dispatch and hierarchy capabilities
    // ═══════════════════════════════════════════════════════════════════════

    /// Virtual dispatch: the first non-abstract declaration of `signature`
    /// found walking up from the runtime class. `None` if nothing matches.
    pub fn dispatch(&self, runtime_class: ClassId, signature: &str) -> Option<MethodId> {
        let mut current = Some(runtime_class);
        while let Some(c) = current {
            let class = self.class(c);
            if let Some(&m) = class.declared.get(signature) {
                let method = self.method(m);
                if !method.is_abstract && !method.is_static {
                    return Some(m);
                }
            }
            current = class.superclass;
        }
        None
    }

    /// Resolve the unique callee of a STATIC or SPECIAL call. Dispatched
    /// kinds return `None`: their callee depends on the receiver object.
    pub fn resolve_static_call(&self, invoke: &Invoke) -> Option<MethodId> {
        match invoke.kind {
            CallKind::Static => self
                .lookup(invoke.class, &invoke.signature)
                .filter(|&m| self.method(m).is_static),
            CallKind::Special => self
                .lookup(invoke.class, &invoke.signature)
                .filter(|&m| !self.method(m).is_static && !self.method(m).is_abstract),
            CallKind::Virtual | CallKind::Interface => None,
        }
    }

    /// Declared-class lookup walking the superclass chain
    fn lookup(&self, class: ClassId, signature: &str) -> Option<MethodId> {
        let mut current = Some(class);
        while let Some(c) = current {
            let class = self.class(c);
            if let Some(&m) = class.declared.get(signature) {
                return Some(m);
            }
            current = class.superclass;
        }
        None
    }

    /// Subtype test over the superclass chain and implemented interfaces
    pub fn is_subclass(&self, sub: ClassId, sup: ClassId) -> bool {
        if sub == sup {
            return true;
        }
        let class = self.class(sub);
        if class.interfaces.iter().any(|&i| self.is_subclass(i, sup)) {
            return true;
        }
        match class.superclass {
            Some(parent) => self.is_subclass(parent, sup),
            None => false,
        }
    }
}
