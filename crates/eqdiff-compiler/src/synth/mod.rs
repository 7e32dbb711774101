//! Equality and diff synthesis.
//!
//! One walker serves both families. Per descriptor node it decides whether
//! the node opens its own destination unit, gets a helper in the enclosing
//! unit, or folds into its parent, and how the parent invokes it (the
//! node's [`Delegate`]). The family renderers only produce function text.

mod diff;
mod equal;

#[cfg(test)]
mod diff_tests;

use std::collections::BTreeSet;
use std::path::PathBuf;

use eqdiff_core::TypeKind;
use serde::Serialize;

use crate::codegen::{Code, Expr};
use crate::descriptor::{Import, TypeDescriptor};
use crate::naming::{Family, function_name};
use crate::overrides::{FuncRef, OverrideTable};

pub use diff::{DIFF_KEY_JOIN, diff_key_join};

/// How a parent compares two values of a child's type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Delegate {
    /// Go `==`.
    Inline,
    /// `l.Equal(r)` / `l.Diff(r)`.
    Method,
    /// Free function: a generated helper or an override.
    Call(String),
    /// Must be skipped by the parent.
    Unsupported,
}

impl Delegate {
    /// `l` equals `r`; `None` when the values cannot be compared.
    pub fn equal_expr(&self, l: Expr, r: Expr) -> Option<Expr> {
        match self {
            Delegate::Inline => Some(l.eq(r)),
            Delegate::Method => Some(l.method(Family::Equal.method_name(), vec![r])),
            Delegate::Call(name) => Some(Expr::call(name, vec![l, r])),
            Delegate::Unsupported => None,
        }
    }

    /// Diff map of `l` against `r`; `None` for inline and unsupported values.
    pub fn diff_expr(&self, l: Expr, r: Expr) -> Option<Expr> {
        match self {
            Delegate::Method => Some(l.method(Family::Diff.method_name(), vec![r])),
            Delegate::Call(name) => Some(Expr::call(name, vec![l, r])),
            Delegate::Inline | Delegate::Unsupported => None,
        }
    }
}

/// A destination unit: one generated file per family for one defined type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub package_path: String,
    pub package_name: String,
    pub type_name: String,
}

impl Unit {
    /// `<package path>/<lowercased type>_<family>_generated.go`
    pub fn relative_path(&self, family: Family) -> PathBuf {
        PathBuf::from(&self.package_path).join(format!(
            "{}_{}_generated.go",
            self.type_name.to_lowercase(),
            family.file_suffix()
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedFunction {
    pub name: String,
    /// Methods are never deduplicated by name; their unit is.
    pub method: bool,
    pub text: String,
    /// Imports this function's own text needs.
    pub imports: BTreeSet<Import>,
}

/// Synthesis state for one descriptor node in one family.
#[derive(Clone, Debug, Serialize)]
pub struct GenContext {
    pub field_name: String,
    pub type_text: String,
    pub left: String,
    pub right: String,
    pub delegate: Delegate,
    /// Set when this context opens its own destination unit.
    pub unit: Option<Unit>,
    pub functions: Vec<GeneratedFunction>,
    /// Own functions' imports plus those of supported children.
    pub imports: BTreeSet<Import>,
    /// Imports the parent's function needs to invoke `delegate`.
    pub delegate_imports: BTreeSet<Import>,
    pub unsupported: Option<String>,
    pub children: Vec<GenContext>,
}

impl GenContext {
    fn new(d: &TypeDescriptor, delegate: Delegate) -> Self {
        Self {
            field_name: d.name.clone(),
            type_text: d.type_text.clone(),
            left: String::from("x"),
            right: String::from("y"),
            delegate,
            unit: None,
            functions: Vec::new(),
            imports: BTreeSet::new(),
            delegate_imports: BTreeSet::new(),
            unsupported: None,
            children: Vec::new(),
        }
    }

    fn unsupported(d: &TypeDescriptor) -> Self {
        let mut ctx = Self::new(d, Delegate::Unsupported);
        ctx.unsupported = Some(
            d.unsupported_reason
                .clone()
                .unwrap_or_else(|| format!("`{}` cannot be compared", d.type_text)),
        );
        ctx
    }

    fn with_operands(mut self, left: &str, right: &str) -> Self {
        self.left = left.to_string();
        self.right = right.to_string();
        self
    }

    fn push_function(&mut self, function: GeneratedFunction) {
        self.imports.extend(function.imports.iter().cloned());
        self.functions.push(function);
    }

    /// Imports a parent needs to call into this context, if it is called at all.
    fn call_imports(&self) -> impl Iterator<Item = &Import> {
        self.delegate_imports
            .iter()
            .filter(|_| self.unsupported.is_none())
    }

    fn push_child(&mut self, child: GenContext) {
        if child.unsupported.is_none() {
            self.imports.extend(child.imports.iter().cloned());
        }
        self.children.push(child);
    }

    /// Whether this context defines at least one named function.
    pub fn is_defined(&self) -> bool {
        !self.functions.is_empty()
    }

    /// First function named `name` in this subtree, in traversal order.
    pub fn find_function(&self, name: &str) -> Option<&GeneratedFunction> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.children.iter().find_map(|c| c.find_function(name)))
    }
}

/// Synthesize `family` for one root descriptor.
///
/// Roots that are not unit owners, are unsupported, or already implement
/// the family's method yield a context without functions.
pub fn synthesize(family: Family, root: &TypeDescriptor, overrides: &OverrideTable) -> GenContext {
    Walker { family, overrides }.root(root)
}

pub fn synthesize_equal(root: &TypeDescriptor, overrides: &OverrideTable) -> GenContext {
    synthesize(Family::Equal, root, overrides)
}

pub fn synthesize_diff(root: &TypeDescriptor, overrides: &OverrideTable) -> GenContext {
    synthesize(Family::Diff, root, overrides)
}

// ============================================================================
// Rendering
// ============================================================================

/// A struct field as the renderers see it.
pub(crate) struct FieldPart<'a> {
    pub name: &'a str,
    pub delegate: &'a Delegate,
    pub unsupported: Option<&'a str>,
}

impl FieldPart<'_> {
    fn omission_comment(&self) -> String {
        format!(
            "{} is not compared: {}",
            self.name,
            self.unsupported.unwrap_or("unsupported type")
        )
    }
}

pub(crate) struct Rendered {
    pub text: String,
    pub imports: BTreeSet<Import>,
}

impl Rendered {
    fn new(code: Code) -> Self {
        Self {
            text: code.finish(),
            imports: BTreeSet::new(),
        }
    }

    fn with_fmt(mut self) -> Self {
        self.imports.insert(Import::fmt());
        self
    }
}

/// Function text for one family.
trait Render {
    fn struct_method(&self, ty: &str, fields: &[FieldPart<'_>]) -> Rendered;
    fn array_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered;
    fn slice_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered;
    fn map_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered;
    fn pointer_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered;
    /// Helper for a defined type over a predeclared one.
    fn value_helper(&self, name: &str, ty: &str) -> Rendered;
}

fn method_signature(family: Family, left: &str, right: &str, ty: &str) -> String {
    format!(
        "func ({left} {ty}) {}({right} {ty}) {}",
        family.method_name(),
        family.result_type()
    )
}

fn helper_signature(family: Family, name: &str, ty: &str) -> String {
    format!("func {name}(x, y {ty}) {}", family.result_type())
}

/// Method whose whole body is `return <call>`.
fn forwarding_method(family: Family, left: &str, right: &str, ty: &str, call: Expr) -> Rendered {
    let mut code = Code::new();
    code.block(method_signature(family, left, right, ty), |code| {
        code.line(format_args!("return {call}"));
    });
    Rendered::new(code)
}

// ============================================================================
// Walker
// ============================================================================

struct Walker<'a> {
    family: Family,
    overrides: &'a OverrideTable,
}

impl Walker<'_> {
    fn render(&self) -> &'static dyn Render {
        match self.family {
            Family::Equal => &equal::EqualRender,
            Family::Diff => &diff::DiffRender,
        }
    }

    fn override_for(&self, d: &TypeDescriptor) -> Option<&FuncRef> {
        let full = d.full_name.as_deref()?;
        self.overrides.lookup(full, self.family)
    }

    fn root(&self, d: &TypeDescriptor) -> GenContext {
        if d.unsupported {
            return GenContext::unsupported(d);
        }
        if !d.owns_unit() {
            tracing::debug!(type_text = %d.type_text, kind = %d.kind, "root has no unit of its own");
            return GenContext::new(d, Delegate::Inline);
        }
        if d.has_preexisting(self.family) {
            return GenContext::new(d, Delegate::Method);
        }
        if let Some(func) = self.override_for(d) {
            return self.overridden_unit(d, func);
        }
        self.unit(d)
    }

    fn node(&self, d: &TypeDescriptor) -> GenContext {
        if d.unsupported {
            return GenContext::unsupported(d);
        }
        if let Some(func) = self.override_for(d) {
            let mut ctx = GenContext::new(d, Delegate::Call(func.callee(&d.referrer_package)));
            if func.pkg != d.referrer_package {
                ctx.delegate_imports.insert(func.import());
                ctx.imports.insert(func.import());
            }
            return ctx;
        }
        if d.revisit {
            let delegate = if d.is_named_pointer() {
                Delegate::Call(function_name(self.family, &d.type_text))
            } else {
                Delegate::Method
            };
            return GenContext::new(d, delegate);
        }
        if d.is_defined() && d.has_preexisting(self.family) {
            return GenContext::new(d, Delegate::Method);
        }

        match d.kind {
            TypeKind::Builtin if d.owns_unit() => self.unit(d),
            TypeKind::Builtin => GenContext::new(d, Delegate::Inline),
            TypeKind::Struct if !d.is_defined() => GenContext::new(d, Delegate::Inline),
            TypeKind::Struct => self.unit(d),
            TypeKind::Array | TypeKind::Slice | TypeKind::Map if d.owns_unit() => self.unit(d),
            TypeKind::Array | TypeKind::Slice | TypeKind::Map | TypeKind::Pointer => {
                self.helper(d)
            }
            TypeKind::Interface | TypeKind::Func | TypeKind::Unknown => GenContext::unsupported(d),
        }
    }

    fn unit_context(&self, d: &TypeDescriptor) -> GenContext {
        let mut ctx = GenContext::new(d, Delegate::Method);
        ctx.unit = Some(Unit {
            package_path: d.defining_package.clone(),
            package_name: d.package_name.clone(),
            type_name: d.declared_type_name.clone(),
        });
        if d.kind == TypeKind::Struct {
            ctx = ctx.with_operands("rec", "obj");
        }
        ctx
    }

    fn method(&self, rendered: Rendered) -> GeneratedFunction {
        GeneratedFunction {
            name: self.family.method_name().to_string(),
            method: true,
            text: rendered.text,
            imports: rendered.imports,
        }
    }

    fn free_function(&self, name: &str, rendered: Rendered) -> GeneratedFunction {
        GeneratedFunction {
            name: name.to_string(),
            method: false,
            text: rendered.text,
            imports: rendered.imports,
        }
    }

    /// Root unit whose method forwards to an override.
    fn overridden_unit(&self, d: &TypeDescriptor, func: &FuncRef) -> GenContext {
        let mut ctx = self.unit_context(d);
        let call = Expr::call(
            func.callee(&d.defining_package),
            vec![Expr::ident(&ctx.left), Expr::ident(&ctx.right)],
        );
        let mut rendered = forwarding_method(
            self.family,
            &ctx.left,
            &ctx.right,
            &d.declared_type_name,
            call,
        );
        if func.pkg != d.defining_package {
            rendered.imports.insert(func.import());
        }
        let method = self.method(rendered);
        ctx.push_function(method);
        ctx
    }

    fn unit(&self, d: &TypeDescriptor) -> GenContext {
        let mut ctx = self.unit_context(d);
        let ty = d.declared_type_name.as_str();

        if d.kind == TypeKind::Struct {
            let children: Vec<GenContext> = d.fields.iter().map(|f| self.node(f)).collect();
            let rendered = {
                let parts: Vec<FieldPart<'_>> = children
                    .iter()
                    .map(|c| FieldPart {
                        name: &c.field_name,
                        delegate: &c.delegate,
                        unsupported: c.unsupported.as_deref(),
                    })
                    .collect();
                self.render().struct_method(ty, &parts)
            };
            let mut method = self.method(rendered);
            for child in &children {
                method.imports.extend(child.call_imports().cloned());
            }
            ctx.push_function(method);
            for child in children {
                ctx.push_child(child);
            }
            return ctx;
        }

        let helper = function_name(self.family, ty);
        let call = Expr::call(&helper, vec![Expr::ident("x"), Expr::ident("y")]);
        let method = self.method(forwarding_method(self.family, "x", "y", ty, call));
        ctx.push_function(method);

        if d.kind == TypeKind::Builtin {
            let function = self.free_function(&helper, self.render().value_helper(&helper, ty));
            ctx.push_function(function);
            return ctx;
        }

        let (function, child) = self.container(d, &helper, ty);
        ctx.push_function(function);
        ctx.push_child(child);
        ctx
    }

    /// Helper in the enclosing unit for an anonymous container or a named
    /// pointer.
    fn helper(&self, d: &TypeDescriptor) -> GenContext {
        let name = function_name(self.family, &d.type_text);
        let mut ctx = GenContext::new(d, Delegate::Call(name.clone()));

        let (mut function, child) = self.container(d, &name, &d.type_text);
        function.imports.extend(d.required_imports.iter().cloned());
        ctx.push_function(function);
        ctx.push_child(child);
        ctx
    }

    /// Helper function `name` over values of type `ty`, plus the element's
    /// context.
    fn container(&self, d: &TypeDescriptor, name: &str, ty: &str) -> (GeneratedFunction, GenContext) {
        let child = match d.sub_node.as_deref() {
            Some(sub) => self.node(sub),
            None => GenContext::unsupported(d),
        };
        let render = self.render();
        let (rendered, child) = match d.kind {
            TypeKind::Array => (
                render.array_helper(name, ty, &child.delegate),
                child.with_operands("x[i]", "y[i]"),
            ),
            TypeKind::Slice => (
                render.slice_helper(name, ty, &child.delegate),
                child.with_operands("vx", "vy"),
            ),
            TypeKind::Map => (
                render.map_helper(name, ty, &child.delegate),
                child.with_operands("vx", "vy"),
            ),
            _ => (
                render.pointer_helper(name, ty, &child.delegate),
                child.with_operands("*x", "*y"),
            ),
        };

        let mut function = self.free_function(name, rendered);
        function.imports.extend(child.call_imports().cloned());
        (function, child)
    }
}
