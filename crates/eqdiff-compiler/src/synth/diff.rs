//! `Diff` bodies.
//!
//! Every function builds `diff := make(map[string][]interface{})` and
//! returns it. Keys are paths below the compared value: `Name`,
//! `Servers[2].Port`, `Options[primary]`. The empty key means the compared
//! values themselves differ. Nested maps are merged under the parent's key
//! with `diffKeyJoin`, emitted once per output directory.

use super::{Delegate, FieldPart, GeneratedFunction, Render, Rendered, helper_signature, method_signature};
use crate::codegen::{Code, Expr};
use crate::naming::Family;

/// Name of the key-joining helper shared by all diff units in a directory.
pub const DIFF_KEY_JOIN: &str = "diffKeyJoin";

const NEW_DIFF: &str = "diff := make(map[string][]interface{})";

pub(super) struct DiffRender;

impl Render for DiffRender {
    fn struct_method(&self, ty: &str, fields: &[FieldPart<'_>]) -> Rendered {
        let mut code = Code::new();
        code.block(method_signature(Family::Diff, "rec", "obj", ty), |code| {
            code.line(NEW_DIFF);
            for field in fields {
                if field.unsupported.is_some() || *field.delegate == Delegate::Unsupported {
                    code.comment(field.omission_comment());
                    continue;
                }
                compare(
                    code,
                    field.delegate,
                    Expr::string(field.name),
                    Expr::ident("rec").field(field.name),
                    Expr::ident("obj").field(field.name),
                );
            }
            code.line("return diff");
        });
        Rendered::new(code)
    }

    fn array_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Diff, name, ty), |code| {
            code.line(NEW_DIFF);
            code.block("for i := range x", |code| {
                let i = Expr::ident("i");
                compare(
                    code,
                    elem,
                    index_key(),
                    Expr::ident("x").index(i.clone()),
                    Expr::ident("y").index(i),
                );
            });
            code.line("return diff");
        });
        Rendered::new(code).with_fmt()
    }

    fn slice_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Diff, name, ty), |code| {
            code.line(NEW_DIFF);
            nil_guards(code);
            code.block("for i := 0; i < len(x) && i < len(y); i++", |code| {
                let i = Expr::ident("i");
                compare(
                    code,
                    elem,
                    index_key(),
                    Expr::ident("x").index(i.clone()),
                    Expr::ident("y").index(i),
                );
            });
            code.block("for i := len(y); i < len(x); i++", |code| {
                record(code, &index_key(), &Expr::raw("x[i]"), &Expr::nil());
            });
            code.block("for i := len(x); i < len(y); i++", |code| {
                record(code, &index_key(), &Expr::nil(), &Expr::raw("y[i]"));
            });
            code.line("return diff");
        });
        Rendered::new(code).with_fmt()
    }

    fn map_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Diff, name, ty), |code| {
            code.line(NEW_DIFF);
            nil_guards(code);
            code.block("for k, vx := range x", |code| {
                code.line("vy, ok := y[k]");
                code.block("if !ok", |code| {
                    record(code, &map_key(), &Expr::ident("vx"), &Expr::nil());
                    code.line("continue");
                });
                compare(code, elem, map_key(), Expr::ident("vx"), Expr::ident("vy"));
            });
            code.block("for k, vy := range y", |code| {
                code.block("if _, ok := x[k]; !ok", |code| {
                    record(code, &map_key(), &Expr::nil(), &Expr::ident("vy"));
                });
            });
            code.line("return diff");
        });
        Rendered::new(code).with_fmt()
    }

    fn pointer_helper(&self, name: &str, ty: &str, elem: &Delegate) -> Rendered {
        let mut code = Code::new();
        let x = Expr::ident("x").deref();
        let y = Expr::ident("y").deref();
        let whole = Expr::string("");

        code.block(helper_signature(Family::Diff, name, ty), |code| {
            code.line(NEW_DIFF);
            code.block("if x == nil && y == nil", |code| {
                code.line("return diff");
            });
            code.block("if x == nil", |code| {
                record(code, &whole, &Expr::nil(), &y);
                code.line("return diff");
            });
            code.block("if y == nil", |code| {
                record(code, &whole, &x, &Expr::nil());
                code.line("return diff");
            });
            match elem.diff_expr(x.clone(), y.clone()) {
                Some(call) => {
                    code.line(format_args!("return {call}"));
                }
                None => {
                    compare(code, elem, whole.clone(), x.clone(), y.clone());
                    code.line("return diff");
                }
            }
        });
        Rendered::new(code)
    }

    fn value_helper(&self, name: &str, ty: &str) -> Rendered {
        let mut code = Code::new();
        code.block(helper_signature(Family::Diff, name, ty), |code| {
            code.line(NEW_DIFF);
            compare(code, &Delegate::Inline, Expr::string(""), Expr::ident("x"), Expr::ident("y"));
            code.line("return diff");
        });
        Rendered::new(code)
    }
}

/// `diff[key] = []interface{}{l, r}`
fn record(code: &mut Code, key: &Expr, l: &Expr, r: &Expr) {
    code.line(format_args!("diff[{key}] = []interface{{}}{{{l}, {r}}}"));
}

/// Record `l` against `r` under `key`, inline or by merging a nested diff.
fn compare(code: &mut Code, delegate: &Delegate, key: Expr, l: Expr, r: Expr) {
    match delegate {
        Delegate::Inline => {
            code.block(format_args!("if {}", l.clone().ne(r.clone())), |code| {
                record(code, &key, &l, &r);
            });
        }
        Delegate::Unsupported => {
            code.comment("elements are not compared");
        }
        Delegate::Method | Delegate::Call(_) => {
            if let Some(nested) = delegate.diff_expr(l, r) {
                code.block(format_args!("for diffKey, diffValue := range {nested}"), |code| {
                    code.line(format_args!(
                        "diff[{DIFF_KEY_JOIN}({key}, diffKey)] = diffValue"
                    ));
                });
            }
        }
    }
}

fn nil_guards(code: &mut Code) {
    code.block("if len(x) == 0 && len(y) == 0", |code| {
        code.line("return diff");
    });
    let whole = Expr::string("");
    code.block("if x == nil", |code| {
        record(code, &whole, &Expr::nil(), &Expr::ident("y"));
        code.line("return diff");
    });
    code.block("if y == nil", |code| {
        record(code, &whole, &Expr::ident("x"), &Expr::nil());
        code.line("return diff");
    });
}

fn index_key() -> Expr {
    Expr::call("fmt.Sprintf", vec![Expr::string("[%d]"), Expr::ident("i")])
}

fn map_key() -> Expr {
    Expr::call("fmt.Sprintf", vec![Expr::string("[%v]"), Expr::ident("k")])
}

/// `diffKeyJoin(prefix, key string) string`.
///
/// Bracketed keys (`[3]`) attach without a dot; empty parts vanish.
pub fn diff_key_join() -> GeneratedFunction {
    let mut code = Code::new();
    code.block(format_args!("func {DIFF_KEY_JOIN}(prefix, key string) string"), |code| {
        code.block("if key == \"\"", |code| {
            code.line("return prefix");
        });
        code.block("if prefix == \"\"", |code| {
            code.line("return key");
        });
        code.block("if key[0] == '['", |code| {
            code.line("return prefix + key");
        });
        code.line("return prefix + \".\" + key");
    });
    GeneratedFunction {
        name: DIFF_KEY_JOIN.to_string(),
        method: false,
        text: code.finish(),
        imports: Default::default(),
    }
}
