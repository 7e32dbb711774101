//! Shared fixture universes.

use eqdiff_core::{
    FieldDef, PackageBuilder, TypeDef, TypeExpr, Universe, UniverseBuilder, UniverseType,
};

use crate::descriptor::{BuilderConfig, DescriptorBuilder, TypeDescriptor};

pub const MODELS: &str = "example.com/app/models";
pub const SHARED: &str = "example.com/app/shared-types";
pub const META: &str = "k8s.io/apimachinery/pkg/apis/meta/v1";

fn string() -> TypeExpr {
    TypeExpr::builtin("string")
}

fn int() -> TypeExpr {
    TypeExpr::builtin("int")
}

/// A small application model: structs, defined containers, cross-package
/// references, a self-referential type and a deny-listed envelope.
pub fn models_universe() -> Universe {
    UniverseBuilder::new()
        .package(
            PackageBuilder::new(MODELS)
                .structure(
                    "Backend",
                    [
                        ("Name", string()),
                        ("Servers", TypeExpr::slice(TypeExpr::named(MODELS, "Server"))),
                        ("Tags", TypeExpr::named(MODELS, "Tags")),
                        ("Labels", TypeExpr::named(SHARED, "Labels")),
                        ("Weight", TypeExpr::pointer(int())),
                        ("Hook", TypeExpr::Func),
                    ],
                )
                .structure("Server", [("Address", string()), ("Port", int())])
                .defined("Tags", TypeExpr::slice(string()))
                .structure(
                    "Node",
                    [
                        ("Value", int()),
                        ("Next", TypeExpr::pointer(TypeExpr::named(MODELS, "Node"))),
                        ("Children", TypeExpr::slice(TypeExpr::named(MODELS, "Node"))),
                    ],
                )
                .structure(
                    "Frontend",
                    [
                        ("Name", string()),
                        ("Aliases", TypeExpr::slice(string())),
                        ("Meta", TypeExpr::named(META, "ObjectMeta")),
                    ],
                )
                .structure(
                    "Listener",
                    [
                        ("Ports", TypeExpr::array(2, int())),
                        ("Options", TypeExpr::map(string(), TypeExpr::named(MODELS, "Server"))),
                        ("Point", TypeExpr::structure([FieldDef::new("X", int())])),
                    ],
                )
                .structure(
                    "Plugin",
                    [("Run", TypeExpr::Func), ("Config", TypeExpr::Interface)],
                )
                .type_def(
                    TypeDef::new("Timeout", TypeExpr::structure([FieldDef::new("Ms", int())]))
                        .with_equal(),
                )
                .type_def(
                    TypeDef::new("Opaque", TypeExpr::structure([FieldDef::new("Raw", string())]))
                        .with_equal()
                        .with_diff(),
                )
                .structure(
                    "Policy",
                    [
                        ("Timeout", TypeExpr::named(MODELS, "Timeout")),
                        ("Opaque", TypeExpr::named(MODELS, "Opaque")),
                    ],
                )
                .structure("Empty", []),
        )
        .package(
            PackageBuilder::new(SHARED)
                .name("shared")
                .defined("Labels", TypeExpr::map(string(), string()))
                .defined("Ref", TypeExpr::pointer(TypeExpr::named(SHARED, "Labels"))),
        )
        .package(
            PackageBuilder::new(META).structure("ObjectMeta", [("Name", string())]),
        )
        .build()
        .unwrap()
}

/// A defined string type and a struct that holds one uncomparable struct
/// type twice.
pub fn job_universe() -> Universe {
    UniverseBuilder::new()
        .package(
            PackageBuilder::new(MODELS)
                .defined("Mode", string())
                .structure("Job", [("Name", string()), ("Mode", TypeExpr::named(MODELS, "Mode"))])
                .structure("Plugin", [("Run", TypeExpr::Func)])
                .structure(
                    "Host",
                    [
                        ("A", TypeExpr::named(MODELS, "Plugin")),
                        ("B", TypeExpr::named(MODELS, "Plugin")),
                        ("Name", string()),
                    ],
                ),
        )
        .build()
        .unwrap()
}

pub fn lookup<'u>(universe: &'u Universe, name: &str) -> UniverseType<'u> {
    universe
        .lookup(&format!("{MODELS}.{name}"))
        .unwrap_or_else(|| panic!("fixture type {name} not found"))
}

/// Descriptor for a `models` type with the default deny-list.
pub fn describe(universe: &Universe, name: &str) -> TypeDescriptor {
    let config = BuilderConfig::default();
    DescriptorBuilder::new(&config).build_root(&lookup(universe, name))
}

/// Generated Go text with tabs expanded, for comparison against `indoc!`.
pub fn untab(text: &str) -> String {
    text.replace('\t', "    ")
}
