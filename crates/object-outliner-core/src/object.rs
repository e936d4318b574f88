//! Live object population for the outliner.
//!
//! Provides the object system the outliner scans:
//! - Stable object identifiers via arena-based storage
//! - A single-inheritance class hierarchy with `is_a` queries
//! - Outer/inner ownership relationships with automatic destroy cascade
//! - Object naming, flags and a resource-size metric
//!
//! # Key Types
//!
//! - [`ObjectId`] - Stable identity; also the weak reference to an object
//! - [`ClassId`] - Identifier of a registered class
//! - [`ObjectRegistry`] - Central registry owning every class and object
//! - [`ObjectRef`] - Borrowed view of a live object
//! - [`SharedObjectRegistry`] - Thread-safe wrapper around [`ObjectRegistry`]
//!
//! # Weak references
//!
//! Slots are versioned: once an object is destroyed its [`ObjectId`] never
//! resolves again, even if the slot is reused. Holding an `ObjectId` never
//! keeps an object alive, and [`ObjectRegistry::get`] returning `None` means
//! "the object no longer exists".

use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for an object in the registry.
    ///
    /// `ObjectId`s are stable handles that remain comparable and hashable after
    /// the object is destroyed, but stop resolving through
    /// [`ObjectRegistry::get`].
    pub struct ObjectId;
}

new_key_type! {
    /// A unique identifier for a registered class.
    pub struct ClassId;
}

impl ObjectId {
    /// Convert the ObjectId to a raw u64 value.
    ///
    /// The raw value can be converted back using [`ObjectId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        use slotmap::Key;
        self.data().as_ffi()
    }

    /// Create an ObjectId from a raw u64 value.
    ///
    /// Note: This does not check if the ObjectId exists in the registry.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}

/// Errors that can occur during object operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// The object ID is invalid or has been destroyed.
    InvalidObjectId,
    /// The class ID is invalid.
    InvalidClassId,
    /// A class with this name is already registered.
    DuplicateClassName(String),
    /// Attempted to set an object as its own outer/ancestor.
    CircularOuter,
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidObjectId => write!(f, "Invalid or destroyed object ID"),
            Self::InvalidClassId => write!(f, "Invalid class ID"),
            Self::DuplicateClassName(name) => {
                write!(f, "A class named '{name}' is already registered")
            }
            Self::CircularOuter => {
                write!(f, "Cannot set an object as its own outer or ancestor")
            }
        }
    }
}

impl std::error::Error for ObjectError {}

/// Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// Per-object flags.
///
/// Flags can be combined with [`ObjectFlags::union`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ObjectFlags {
    /// The object is the default object (template) of its class.
    pub class_default: bool,
    /// The object is not meant to be saved.
    pub transient: bool,
}

impl ObjectFlags {
    /// No flags.
    pub const NONE: Self = Self::empty();

    /// Class default object.
    pub const CLASS_DEFAULT: Self = Self {
        class_default: true,
        ..Self::empty()
    };

    /// Transient object.
    pub const TRANSIENT: Self = Self {
        transient: true,
        ..Self::empty()
    };

    /// Creates an empty flag set.
    pub const fn empty() -> Self {
        Self {
            class_default: false,
            transient: false,
        }
    }

    /// Combines two flag sets.
    pub const fn union(self, other: Self) -> Self {
        Self {
            class_default: self.class_default || other.class_default,
            transient: self.transient || other.transient,
        }
    }

    /// Returns `true` if any flag set in `other` is also set in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        (self.class_default && other.class_default) || (self.transient && other.transient)
    }

    /// Returns `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        !self.class_default && !self.transient
    }
}

/// Internal data stored for each class.
struct ClassData {
    name: String,
    super_class: Option<ClassId>,
}

/// Internal data stored in the registry for each object.
struct ObjectData {
    /// Human-readable name.
    name: String,
    /// Exact runtime class.
    class: ClassId,
    /// Owning object (if any).
    outer: Option<ObjectId>,
    /// Objects owned by this one.
    inners: Vec<ObjectId>,
    flags: ObjectFlags,
    /// Exclusive resource size in bytes.
    resource_size: u64,
}

/// The central registry that manages all classes, objects and their ownership.
///
/// Uses arena-based storage via SlotMap for stable identities and efficient
/// outer/inner relationship management.
pub struct ObjectRegistry {
    classes: SlotMap<ClassId, ClassData>,
    class_by_name: HashMap<String, ClassId>,
    objects: SlotMap<ObjectId, ObjectData>,
}

impl ObjectRegistry {
    /// Create a new empty object registry.
    pub fn new() -> Self {
        Self {
            classes: SlotMap::with_key(),
            class_by_name: HashMap::new(),
            objects: SlotMap::with_key(),
        }
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Register a class, optionally derived from `super_class`.
    pub fn register_class(
        &mut self,
        name: impl Into<String>,
        super_class: Option<ClassId>,
    ) -> ObjectResult<ClassId> {
        let name = name.into();
        if self.class_by_name.contains_key(&name) {
            return Err(ObjectError::DuplicateClassName(name));
        }
        if let Some(super_id) = super_class {
            if !self.classes.contains_key(super_id) {
                return Err(ObjectError::InvalidClassId);
            }
        }

        let id = self.classes.insert(ClassData {
            name: name.clone(),
            super_class,
        });
        tracing::trace!(target: targets::OBJECT, ?id, class = %name, "registered class");
        self.class_by_name.insert(name, id);
        Ok(id)
    }

    /// Look up a class by its exact name.
    pub fn find_class(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    /// Get the name of a class.
    pub fn class_name(&self, class: ClassId) -> ObjectResult<&str> {
        self.classes
            .get(class)
            .map(|c| c.name.as_str())
            .ok_or(ObjectError::InvalidClassId)
    }

    /// Get the direct super class of a class.
    pub fn super_class(&self, class: ClassId) -> ObjectResult<Option<ClassId>> {
        self.classes
            .get(class)
            .map(|c| c.super_class)
            .ok_or(ObjectError::InvalidClassId)
    }

    /// Check if a class ID refers to a registered class.
    pub fn contains_class(&self, class: ClassId) -> bool {
        self.classes.contains_key(class)
    }

    /// Check if `class` is `ancestor` or derives from it.
    pub fn is_child_of(&self, class: ClassId, ancestor: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.classes.get(current_id).and_then(|c| c.super_class);
        }
        false
    }

    // =========================================================================
    // Objects
    // =========================================================================

    /// Create a new object of `class` inside `outer` and return its ID.
    pub fn spawn(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        outer: Option<ObjectId>,
    ) -> ObjectResult<ObjectId> {
        if !self.classes.contains_key(class) {
            return Err(ObjectError::InvalidClassId);
        }
        if let Some(outer_id) = outer {
            if !self.objects.contains_key(outer_id) {
                return Err(ObjectError::InvalidObjectId);
            }
        }

        let id = self.objects.insert(ObjectData {
            name: name.into(),
            class,
            outer,
            inners: Vec::new(),
            flags: ObjectFlags::NONE,
            resource_size: 0,
        });
        if let Some(outer_id) = outer {
            if let Some(outer_data) = self.objects.get_mut(outer_id) {
                outer_data.inners.push(id);
            }
        }
        tracing::trace!(target: targets::OBJECT, ?id, ?outer, "spawned object");
        Ok(id)
    }

    /// Remove an object and every object it (transitively) owns.
    #[tracing::instrument(skip(self), target = "object_outliner::object", level = "trace")]
    pub fn destroy(&mut self, id: ObjectId) -> ObjectResult<()> {
        let inners_to_destroy = self.collect_inners(id)?;
        tracing::trace!(target: targets::OBJECT, ?id, inner_count = inners_to_destroy.len(), "destroying object");

        if let Some(outer_id) = self.objects.get(id).and_then(|d| d.outer) {
            if let Some(outer_data) = self.objects.get_mut(outer_id) {
                outer_data.inners.retain(|&inner| inner != id);
            }
        }

        for inner_id in inners_to_destroy {
            self.objects.remove(inner_id);
        }
        self.objects.remove(id);

        Ok(())
    }

    /// Collect all transitively owned IDs, deepest first.
    fn collect_inners(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        let mut result = Vec::new();
        self.collect_inners_recursive(id, &mut result)?;
        Ok(result)
    }

    fn collect_inners_recursive(&self, id: ObjectId, result: &mut Vec<ObjectId>) -> ObjectResult<()> {
        let data = self.objects.get(id).ok_or(ObjectError::InvalidObjectId)?;
        for &inner_id in &data.inners {
            self.collect_inners_recursive(inner_id, result)?;
            result.push(inner_id);
        }
        Ok(())
    }

    /// Check if an object exists in the registry.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Resolve an identity to a live object.
    ///
    /// Returns `None` if the object has been destroyed.
    pub fn get(&self, id: ObjectId) -> Option<ObjectRef<'_>> {
        self.objects.get(id).map(|data| ObjectRef {
            registry: self,
            id,
            data,
        })
    }

    /// Move an object to a new outer.
    ///
    /// Passing `None` makes the object a root object.
    pub fn set_outer(&mut self, id: ObjectId, new_outer: Option<ObjectId>) -> ObjectResult<()> {
        if !self.objects.contains_key(id) {
            return Err(ObjectError::InvalidObjectId);
        }

        if let Some(outer_id) = new_outer {
            if !self.objects.contains_key(outer_id) {
                return Err(ObjectError::InvalidObjectId);
            }
            if self.is_ancestor_of(id, outer_id) {
                return Err(ObjectError::CircularOuter);
            }
        }

        if let Some(old_outer_id) = self.objects.get(id).and_then(|d| d.outer) {
            if let Some(outer_data) = self.objects.get_mut(old_outer_id) {
                outer_data.inners.retain(|&inner| inner != id);
            }
        }

        if let Some(data) = self.objects.get_mut(id) {
            data.outer = new_outer;
        }

        if let Some(outer_id) = new_outer {
            if let Some(outer_data) = self.objects.get_mut(outer_id) {
                outer_data.inners.push(id);
            }
        }

        Ok(())
    }

    /// Check if `potential_ancestor` is `id` or one of its outers.
    fn is_ancestor_of(&self, potential_ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == potential_ancestor {
                return true;
            }
            current = self.objects.get(current_id).and_then(|d| d.outer);
        }
        false
    }

    /// Get the outer of an object.
    pub fn outer(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.objects
            .get(id)
            .map(|d| d.outer)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Get the objects directly owned by an object.
    pub fn inners(&self, id: ObjectId) -> ObjectResult<&[ObjectId]> {
        self.objects
            .get(id)
            .map(|d| d.inners.as_slice())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the object's name.
    pub fn rename(&mut self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        self.objects
            .get_mut(id)
            .map(|d| d.name = name.into())
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Replace the object's flags.
    pub fn set_flags(&mut self, id: ObjectId, flags: ObjectFlags) -> ObjectResult<()> {
        self.objects
            .get_mut(id)
            .map(|d| d.flags = flags)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Set the exclusive resource size (bytes) reported for the object.
    pub fn set_resource_size(&mut self, id: ObjectId, bytes: u64) -> ObjectResult<()> {
        self.objects
            .get_mut(id)
            .map(|d| d.resource_size = bytes)
            .ok_or(ObjectError::InvalidObjectId)
    }

    /// Full path of an object: outer chain names joined by `.`, outermost first.
    pub fn path_name(&self, id: ObjectId) -> ObjectResult<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(current_id) = current {
            let data = self.objects.get(current_id).ok_or(ObjectError::InvalidObjectId)?;
            names.push(data.name.as_str());
            current = data.outer;
        }
        names.reverse();
        Ok(names.join("."))
    }

    /// Get the number of live objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get the number of registered classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Iterate over every live object exactly once.
    ///
    /// The order is the storage order and carries no meaning.
    pub fn iter(&self) -> impl Iterator<Item = ObjectRef<'_>> {
        self.objects.iter().map(move |(id, data)| ObjectRef {
            registry: self,
            id,
            data,
        })
    }

    /// Iterate over all root objects (objects with no outer).
    pub fn root_objects(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects
            .iter()
            .filter(|(_, data)| data.outer.is_none())
            .map(|(id, _)| id)
    }
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed view of a live object.
///
/// Obtained from [`ObjectRegistry::get`] or [`ObjectRegistry::iter`]; it can
/// only exist while the object is alive.
#[derive(Clone, Copy)]
pub struct ObjectRef<'a> {
    registry: &'a ObjectRegistry,
    id: ObjectId,
    data: &'a ObjectData,
}

impl<'a> ObjectRef<'a> {
    /// The object's identity.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The object's name.
    pub fn name(&self) -> &'a str {
        &self.data.name
    }

    /// The object's exact runtime class.
    pub fn class(&self) -> ClassId {
        self.data.class
    }

    /// Name of the object's exact runtime class.
    pub fn class_name(&self) -> &'a str {
        self.registry.class_name(self.data.class).unwrap_or_default()
    }

    /// Check if the object is an instance of `class` or of a class derived from it.
    pub fn is_a(&self, class: ClassId) -> bool {
        self.registry.is_child_of(self.data.class, class)
    }

    /// The owning object's identity, if any.
    pub fn outer(&self) -> Option<ObjectId> {
        self.data.outer
    }

    /// The owning object, if any.
    pub fn outer_ref(&self) -> Option<ObjectRef<'a>> {
        self.data.outer.and_then(|outer| self.registry.get(outer))
    }

    /// The top of the outer chain (the object itself for root objects).
    pub fn outermost(&self) -> ObjectRef<'a> {
        let mut current = *self;
        while let Some(outer) = current.outer_ref() {
            current = outer;
        }
        current
    }

    /// The object's flags.
    pub fn flags(&self) -> ObjectFlags {
        self.data.flags
    }

    /// Check if any of `flags` is set on the object.
    pub fn has_any_flags(&self, flags: ObjectFlags) -> bool {
        self.data.flags.intersects(flags)
    }

    /// Exclusive resource size in bytes.
    pub fn resource_size(&self) -> u64 {
        self.data.resource_size
    }

    /// Full path of the object.
    pub fn path_name(&self) -> String {
        self.registry.path_name(self.id).unwrap_or_default()
    }

    /// The registry the object lives in.
    pub fn registry(&self) -> &'a ObjectRegistry {
        self.registry
    }
}

impl fmt::Debug for ObjectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.id)
            .field("name", &self.data.name)
            .field("class", &self.class_name())
            .finish()
    }
}

/// A thread-safe wrapper around [`ObjectRegistry`].
///
/// Provides concurrent read access with exclusive write access via `RwLock`.
pub struct SharedObjectRegistry {
    inner: RwLock<ObjectRegistry>,
}

impl SharedObjectRegistry {
    /// Create a new shared object registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ObjectRegistry::new()),
        }
    }

    /// Wrap an existing registry.
    pub fn from_registry(registry: ObjectRegistry) -> Self {
        Self {
            inner: RwLock::new(registry),
        }
    }

    /// Create a new object.
    pub fn spawn(
        &self,
        class: ClassId,
        name: impl Into<String>,
        outer: Option<ObjectId>,
    ) -> ObjectResult<ObjectId> {
        self.inner.write().spawn(class, name, outer)
    }

    /// Destroy an object and everything it owns.
    pub fn destroy(&self, id: ObjectId) -> ObjectResult<()> {
        self.inner.write().destroy(id)
    }

    /// Check if an object exists.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.inner.read().contains(id)
    }

    /// Get the number of live objects.
    pub fn object_count(&self) -> usize {
        self.inner.read().object_count()
    }

    /// Get the object's path name.
    pub fn path_name(&self, id: ObjectId) -> ObjectResult<String> {
        self.inner.read().path_name(id)
    }

    /// Access the registry with a read lock for complex operations.
    pub fn with_read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ObjectRegistry) -> R,
    {
        f(&self.inner.read())
    }

    /// Access the registry with a write lock for complex operations.
    pub fn with_write<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ObjectRegistry) -> R,
    {
        f(&mut self.inner.write())
    }
}

impl Default for SharedObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static_assertions::assert_impl_all!(SharedObjectRegistry: Send, Sync);
