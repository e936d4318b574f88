//! The default filter catalog and a representative engine class hierarchy.
//!
//! Filters are resolved against the classes registered at the time they are
//! built. A class name that is not registered is skipped with a warning and
//! the filter keeps the rest of its classes.

use object_outliner_core::logging::targets;
use object_outliner_core::{ClassId, ObjectFlags, ObjectId, ObjectRegistry, ObjectResult};

use crate::error::OutlinerResult;
use crate::model::{Filter, FilterSet};

/// Name of the package holding transient objects.
pub const TRANSIENT_PACKAGE: &str = "/Engine/Transient";

/// Base class of every engine class.
pub const OBJECT_CLASS: &str = "Object";
/// Class of packages.
pub const PACKAGE_CLASS: &str = "Package";

/// `(class, super class)` pairs, parents before children.
const ENGINE_CLASSES: &[(&str, Option<&str>)] = &[
    (OBJECT_CLASS, None),
    (PACKAGE_CLASS, Some(OBJECT_CLASS)),
    ("Field", Some(OBJECT_CLASS)),
    ("Struct", Some("Field")),
    ("Class", Some("Struct")),
    ("ScriptStruct", Some("Struct")),
    ("Function", Some("Struct")),
    ("DelegateFunction", Some("Function")),
    ("Enum", Some("Field")),
    ("MetaData", Some(OBJECT_CLASS)),
    ("AssetImportData", Some(OBJECT_CLASS)),
    ("MeshDescriptionBaseBulkData", Some(OBJECT_CLASS)),
    ("ThumbnailInfo", Some(OBJECT_CLASS)),
    ("MeshDescriptionBase", Some(OBJECT_CLASS)),
    ("World", Some(OBJECT_CLASS)),
    ("Level", Some(OBJECT_CLASS)),
    ("Actor", Some(OBJECT_CLASS)),
    ("Pawn", Some("Actor")),
    ("Character", Some("Pawn")),
    ("StaticMeshActor", Some("Actor")),
    ("ActorComponent", Some(OBJECT_CLASS)),
    ("SceneComponent", Some("ActorComponent")),
    ("StaticMeshComponent", Some("SceneComponent")),
    ("StaticMesh", Some(OBJECT_CLASS)),
    ("Texture", Some(OBJECT_CLASS)),
    ("Texture2D", Some("Texture")),
    ("TextureCube", Some("Texture")),
    ("MaterialInterface", Some(OBJECT_CLASS)),
    ("Material", Some("MaterialInterface")),
    ("MaterialInstance", Some("MaterialInterface")),
    ("MaterialInstanceConstant", Some("MaterialInstance")),
    ("MaterialExpression", Some(OBJECT_CLASS)),
    ("MaterialFunctionInterface", Some(OBJECT_CLASS)),
    ("MaterialFunction", Some("MaterialFunctionInterface")),
    ("Subsystem", Some(OBJECT_CLASS)),
    ("EngineSubsystem", Some("Subsystem")),
    ("WorldSubsystem", Some("Subsystem")),
    ("NiagaraScriptVariable", Some(OBJECT_CLASS)),
    ("NiagaraParameterDefinitions", Some(OBJECT_CLASS)),
];

/// Registers the engine class hierarchy. Classes already registered by name
/// are left alone.
pub fn register_engine_classes(registry: &mut ObjectRegistry) -> ObjectResult<()> {
    for &(name, super_name) in ENGINE_CLASSES {
        if registry.find_class(name).is_some() {
            continue;
        }
        let super_class = super_name.and_then(|s| registry.find_class(s));
        registry.register_class(name, super_class)?;
    }
    tracing::debug!(target: targets::OBJECT, classes = registry.class_count(), "registered engine classes");
    Ok(())
}

/// Spawns the transient package, registering the package class if needed.
pub fn spawn_transient_package(registry: &mut ObjectRegistry) -> ObjectResult<ObjectId> {
    let package = match registry.find_class(PACKAGE_CLASS) {
        Some(class) => class,
        None => {
            let object = registry.find_class(OBJECT_CLASS);
            registry.register_class(PACKAGE_CLASS, object)?
        }
    };
    registry.spawn(package, TRANSIENT_PACKAGE, None)
}

/// Always-visible toggle filters.
pub fn imperative_filters() -> OutlinerResult<FilterSet> {
    FilterSet::from_filters([Filter::custom(
        "Filter_CDO",
        "CDO",
        "Class Default Objects",
        |object| object.has_any_flags(ObjectFlags::CLASS_DEFAULT),
    )])
}

/// Filters shown in the drop-down menu, in menu order.
pub fn drop_down_filters(registry: &ObjectRegistry) -> OutlinerResult<FilterSet> {
    let for_classes = |name: &str, title: &str, classes: &[&str]| {
        Filter::for_classes(name, title, resolve_classes(registry, name, classes), registry)
    };

    FilterSet::from_filters([
        for_classes("Filter_Package", "Package", &[PACKAGE_CLASS]),
        for_classes("Filter_Fields", "Fields", &["Field"])
            .with_tooltip("Filter for structs, classes, functions, delegates etc"),
        for_classes(
            "Filter_Meta",
            "Meta",
            &[
                "MetaData",
                "AssetImportData",
                "MeshDescriptionBaseBulkData",
                "ThumbnailInfo",
                "MeshDescriptionBase",
            ],
        ),
        Filter::custom(
            "Filter_Transient",
            "Transient",
            "Objects contained in transient package",
            |object| {
                let package = object.outermost();
                package.name() == TRANSIENT_PACKAGE || package.has_any_flags(ObjectFlags::TRANSIENT)
            },
        ),
        for_classes(
            "Filter_Materials",
            "Materials",
            &["MaterialExpression", "MaterialInterface", "MaterialFunctionInterface"],
        ),
        for_classes("Filter_Textures", "Textures", &["Texture"]),
        Filter::for_class_names(
            "Filter_Niagara",
            "Niagara",
            ["NiagaraScriptVariable", "NiagaraParameterDefinitions"],
        ),
        for_classes("Filter_Subsystem", "Subsystem", &["Subsystem"]),
        for_classes("Filter_Actor", "Actors", &["Actor"]).with_enabled(true),
    ])
}

fn resolve_classes(registry: &ObjectRegistry, filter: &str, names: &[&str]) -> Vec<ClassId> {
    names
        .iter()
        .filter_map(|&name| {
            let class = registry.find_class(name);
            if class.is_none() {
                tracing::warn!(target: targets::FILTER, filter, class = name, "class not registered, skipping");
            }
            class
        })
        .collect()
}
