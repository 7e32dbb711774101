//! `Equal` bodies.

use super::{Delegate, FieldPart, Render, Rendered, helper_signature, method_signature};
use crate::codegen::{BinOp, Code, Expr};
use crate::naming::Family;

pub(super) struct EqualRender;

impl Render for EqualRender {
    fn struct_method(&self, ty: &str, fields: &[FieldPart<'_>]) -> Rendered {
        let mut code = Code::new();
        code.open(method_signature(Family::Equal, "rec", "obj", ty));

        let mut terms = Vec::new();
        for field in fields {
            let lhs = Expr::ident("rec").field(field.name);
            let rhs = Expr::ident("obj").field(field.name);
            match field.delegate.equal_expr(lhs, rhs) {
                Some(term) => terms.push(term.operand_of(BinOp::And)),
                None => {
                    code.comment(field.omission_comment());
                }
            }
        }

        match terms.split_first() {
            None => {
                code.line("return true");
            }
            Some((first, [])) => {
                code.line(format_args!("return {first}"));
            }
            Some((first, rest)) => {
                code.line(format_args!("return {first} &&"));
                code.indented(|code| {
                    let last = rest.len() - 1;
                    for (i, term) in rest.iter().enumerate() {
                        if i < last {
                            code.line(format_args!("{term} &&"));
                        } else {
                            code.line(term);
                        }
                    }
                });
            }
        }

        code.close();
        Rendered::new(code)
    }

    fn array_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Equal, name, ty), |code| {
            code.block("for i := range x", |code| {
                let i = Expr::ident("i");
                mismatch(
                    code,
                    elem,
                    Expr::ident("x").index(i.clone()),
                    Expr::ident("y").index(i),
                );
            });
            code.line("return true");
        });
        Rendered::new(code)
    }

    fn slice_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Equal, name, ty), |code| {
            length_guard(code);
            code.block("for i, vx := range x", |code| {
                code.line("vy := y[i]");
                mismatch(code, elem, Expr::ident("vx"), Expr::ident("vy"));
            });
            code.line("return true");
        });
        Rendered::new(code)
    }

    fn map_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Equal, name, ty), |code| {
            length_guard(code);
            code.block("for k, vx := range x", |code| {
                code.line("vy, ok := y[k]");
                let missing = Expr::ident("ok").negate();
                let cond = match elem.equal_expr(Expr::ident("vx"), Expr::ident("vy")) {
                    Some(eq) => missing.or(eq.negate()),
                    None => missing,
                };
                code.block(format_args!("if {cond}"), |code| {
                    code.line("return false");
                });
            });
            code.line("return true");
        });
        Rendered::new(code)
    }

    fn pointer_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Equal, name, ty), |code| {
            code.block("if x == nil || y == nil", |code| {
                code.line("return x == y");
            });
            let pointees = elem.equal_expr(Expr::ident("x").deref(), Expr::ident("y").deref());
            match pointees {
                Some(eq) => code.line(format_args!("return {eq}")),
                None => code.line("return true"),
            };
        });
        Rendered::new(code)
    }

    fn value_helper(&self, name: &str, ty: &str) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Equal, name, ty), |code| {
            code.line(format_args!("return {}", Expr::ident("x").eq(Expr::ident("y"))));
        });
        Rendered::new(code)
    }
}

fn length_guard(code: &mut Code) {
    code.block("if len(x) != len(y)", |code| {
        code.line("return false");
    });
}

/// `if <l differs from r> { return false }`
fn mismatch(code: &mut Code, elem: &Delegate, l: Expr, r: Expr) {
    match elem.equal_expr(l, r) {
        Some(eq) => {
            code.block(format_args!("if {}", eq.negate()), |code| {
                code.line("return false");
            });
        }
        None => {
            code.comment("elements are not compared");
        }
    }
}
