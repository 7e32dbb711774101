use indoc::indoc;

use crate::{
    FieldDef, PackageBuilder, TypeDef, TypeExpr, TypeHandle, Universe, UniverseBuilder,
    UniverseError, parse_universe,
};

const MODELS_JSON: &str = indoc! {r#"
    {
        "packages": [
            {
                "path": "example.com/app/models",
                "functions": ["EqualBackend"],
                "types": [
                    {
                        "name": "Backend",
                        "type": {"kind": "struct", "fields": [
                            {"name": "Name", "type": {"kind": "builtin", "name": "string"}},
                            {"name": "Servers", "type": {"kind": "slice", "elem": {"kind": "named", "package": "example.com/app/models", "name": "Server"}}}
                        ]},
                        "methods": [{"name": "Equal", "params": ["Backend"], "results": ["bool"]}]
                    },
                    {
                        "name": "Server",
                        "type": {"kind": "struct", "fields": [
                            {"name": "Port", "type": {"kind": "builtin", "name": "int"}}
                        ]}
                    }
                ]
            },
            {
                "path": "example.com/go-utils",
                "types": []
            }
        ]
    }
"#};

#[test]
fn parse_raw_layer() {
    let raw = parse_universe(MODELS_JSON).unwrap();

    assert_eq!(raw.packages.len(), 2);
    assert_eq!(raw.packages[0].types[0].name, "Backend");
    assert_eq!(raw.packages[0].types[0].methods.len(), 1);
    assert_eq!(raw.packages[1].functions, None);
    assert!(matches!(
        &raw.packages[0].types[1].ty,
        TypeExpr::Struct { fields } if fields.len() == 1
    ));
}

#[test]
fn from_json_indexes_types() {
    let universe = Universe::from_json(MODELS_JSON).unwrap();

    assert_eq!(universe.len(), 2);
    assert!(universe.named("example.com/app/models.Server").is_some());
    assert_eq!(universe.package("example.com/app/models").unwrap().name, "models");
    assert_eq!(universe.package("example.com/go-utils").unwrap().name, "go_utils");
}

#[test]
fn package_function_listing() {
    let universe = Universe::from_json(MODELS_JSON).unwrap();

    let models = universe.package("example.com/app/models").unwrap();
    assert_eq!(models.has_function("EqualBackend"), Some(true));
    assert_eq!(models.has_function("DiffBackend"), Some(false));

    let utils = universe.package("example.com/go-utils").unwrap();
    assert_eq!(utils.has_function("Anything"), None);
}

#[test]
fn lookup_and_resolve() {
    let universe = Universe::from_json(MODELS_JSON).unwrap();

    let backend = universe.lookup("example.com/app/models.Backend").unwrap();
    assert_eq!(backend.name(), "Backend");
    assert!(universe.lookup("example.com/app/models.Missing").is_none());

    assert!(matches!(
        universe.resolve("Backend"),
        Err(UniverseError::InvalidTypeSpec(_))
    ));
    assert!(matches!(
        universe.resolve("example.com/app/models.Missing"),
        Err(UniverseError::UnknownType(_))
    ));
}

#[test]
fn package_types_in_declaration_order() {
    let universe = Universe::from_json(MODELS_JSON).unwrap();

    let names: Vec<String> = universe
        .package_types("example.com/app/models")
        .unwrap()
        .iter()
        .map(|t| t.name().to_string())
        .collect();
    assert_eq!(names, ["Backend", "Server"]);

    assert!(universe.package_types("example.com/go-utils").unwrap().is_empty());
    assert!(matches!(
        universe.package_types("example.com/nope"),
        Err(UniverseError::UnknownPackage(_))
    ));
}

#[test]
fn rejects_malformed_json() {
    let err = Universe::from_json("{\"packages\": [{}]}").unwrap_err();
    assert!(matches!(err, UniverseError::Json(_)));
}

#[test]
fn rejects_unresolved_reference() {
    let err = UniverseBuilder::new()
        .package(PackageBuilder::new("example.com/a").structure(
            "A",
            [("B", TypeExpr::named("example.com/b", "B"))],
        ))
        .build()
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "`example.com/a.A` refers to unknown type `example.com/b.B`"
    );
}

#[test]
fn rejects_unknown_builtin() {
    let err = UniverseBuilder::new()
        .package(PackageBuilder::new("example.com/a").defined("A", TypeExpr::builtin("integer")))
        .build()
        .unwrap_err();

    assert!(matches!(err, UniverseError::UnknownBuiltin { name, .. } if name == "integer"));
}

#[test]
fn rejects_duplicates() {
    let err = UniverseBuilder::new()
        .package(PackageBuilder::new("example.com/a"))
        .package(PackageBuilder::new("example.com/a"))
        .build()
        .unwrap_err();
    assert!(matches!(err, UniverseError::DuplicatePackage(_)));

    let err = UniverseBuilder::new()
        .package(
            PackageBuilder::new("example.com/a")
                .defined("A", TypeExpr::builtin("int"))
                .defined("A", TypeExpr::builtin("string")),
        )
        .build()
        .unwrap_err();
    assert!(matches!(err, UniverseError::DuplicateType(full) if full == "example.com/a.A"));
}

#[test]
fn rejects_invalid_type_name() {
    let err = UniverseBuilder::new()
        .package(PackageBuilder::new("example.com/a").defined("my-type", TypeExpr::builtin("int")))
        .build()
        .unwrap_err();

    assert!(matches!(err, UniverseError::InvalidTypeName { .. }));
}

#[test]
fn rejects_underlying_cycle() {
    let err = UniverseBuilder::new()
        .package(
            PackageBuilder::new("example.com/a")
                .defined("A", TypeExpr::named("example.com/a", "B"))
                .defined("B", TypeExpr::named("example.com/a", "A")),
        )
        .build()
        .unwrap_err();

    assert!(matches!(err, UniverseError::UnderlyingCycle(_)));
}

#[test]
fn self_reference_through_pointer_is_valid() {
    let universe = UniverseBuilder::new()
        .package(PackageBuilder::new("example.com/list").type_def(TypeDef::new(
            "Node",
            TypeExpr::structure([
                FieldDef::new("Value", TypeExpr::builtin("int")),
                FieldDef::new(
                    "Next",
                    TypeExpr::pointer(TypeExpr::named("example.com/list", "Node")),
                ),
            ]),
        )))
        .build();

    assert!(universe.is_ok());
}

#[test]
fn spell_expressions() {
    let universe = Universe::from_json(MODELS_JSON).unwrap();

    let expr = TypeExpr::map(
        TypeExpr::builtin("string"),
        TypeExpr::pointer(TypeExpr::named("example.com/app/models", "Server")),
    );
    assert_eq!(universe.spell(&expr), "map[string]*models.Server");

    let expr = TypeExpr::array(4, TypeExpr::slice(TypeExpr::builtin("byte")));
    assert_eq!(universe.spell(&expr), "[4][]byte");

    let expr = TypeExpr::structure([
        FieldDef::new("A", TypeExpr::builtin("int")),
        FieldDef::new("B", TypeExpr::Interface),
    ]);
    assert_eq!(universe.spell(&expr), "struct { A int; B interface {} }");
    assert_eq!(universe.spell(&TypeExpr::structure([])), "struct {}");
}

#[test]
fn builder_round_trips_to_json() {
    let raw = UniverseBuilder::new()
        .package(
            PackageBuilder::new("example.com/a")
                .name("alpha")
                .function("EqualA")
                .type_def(TypeDef::new("A", TypeExpr::builtin("int")).with_equal().with_diff()),
        )
        .into_raw();

    let json = serde_json::to_string(&raw).unwrap();
    assert_eq!(parse_universe(&json).unwrap(), raw);
}
