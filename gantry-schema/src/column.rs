/// A normalized column description, as reported by the backend.
///
/// Ordinal order is preserved by the introspector; generated field order
/// must match it for readable, diff-stable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub native_type: String,
    pub nullable: bool,
    pub comment: Option<String>,
    pub default_value: Option<String>,
}
