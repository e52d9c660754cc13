/// Version tag carried by every current-shape schema (`"version": 3`).
pub const SCHEMA_VERSION: u32 = 3;

/// Version of the persistence envelope wrapping a schema.
pub const STORAGE_VERSION: u32 = 2;
