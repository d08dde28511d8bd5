//! C-compatible layout of value classes.
//!
//! Fields are laid out in native declaration order with natural alignment,
//! the way a C compiler lays out a plain struct. Nested value classes are
//! laid out first; a class that contains itself has no layout.

use flatbind_core::{ClassEntity, PrimitiveKind, ScalarValue, TypeRef, ValueLayout};
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LayoutError {
    #[error("field '{field}' of '{class}' has non-flat type '{ty}'")]
    NotFlat { class: String, field: String, ty: String },

    #[error("value class '{0}' contains itself")]
    Recursive(String),

    #[error("unknown value class '{0}'")]
    UnknownClass(String),

    #[error("'{class}' has {expected} fields, got {found} values")]
    FieldCount { class: String, expected: usize, found: usize },

    #[error("field '{field}' of '{class}': expected {expected}")]
    FieldValue {
        class: String,
        field: String,
        expected: String,
    },

    #[error("'{class}' needs {expected} bytes, got {found}")]
    Truncated { class: String, expected: usize, found: usize },
}

/// Layout plus per-field offsets, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedLayout {
    pub layout: ValueLayout,
    pub offsets: Vec<usize>,
}

/// Lays out a set of value classes given their field types.
pub struct LayoutEngine<'a> {
    classes: &'a FxHashMap<String, Vec<(String, TypeRef)>>,
    done: FxHashMap<String, ComputedLayout>,
    visiting: FxHashSet<String>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(classes: &'a FxHashMap<String, Vec<(String, TypeRef)>>) -> Self {
        Self {
            classes,
            done: FxHashMap::default(),
            visiting: FxHashSet::default(),
        }
    }

    /// Layout of `class`, computing nested classes on the way.
    pub fn layout(&mut self, class: &str) -> Result<ComputedLayout, LayoutError> {
        if let Some(done) = self.done.get(class) {
            return Ok(done.clone());
        }
        let fields = self
            .classes
            .get(class)
            .ok_or_else(|| LayoutError::UnknownClass(class.to_string()))?;
        if !self.visiting.insert(class.to_string()) {
            return Err(LayoutError::Recursive(class.to_string()));
        }
        let result = self.place(class, fields);
        self.visiting.remove(class);
        let computed = result?;
        self.done.insert(class.to_string(), computed.clone());
        Ok(computed)
    }

    fn place(&mut self, class: &str, fields: &[(String, TypeRef)]) -> Result<ComputedLayout, LayoutError> {
        let mut cursor = 0;
        let mut align = 1;
        let mut offsets = Vec::with_capacity(fields.len());
        for (name, ty) in fields {
            let field = match ty {
                TypeRef::Primitive { primitive } => primitive_layout(*primitive),
                TypeRef::Enum { repr, .. } => primitive_layout(repr.primitive()),
                TypeRef::Value { class: nested } => self.layout(nested)?.layout,
                other => {
                    return Err(LayoutError::NotFlat {
                        class: class.to_string(),
                        field: name.clone(),
                        ty: other.to_string(),
                    });
                }
            };
            cursor = round_up(cursor, field.align);
            offsets.push(cursor);
            cursor += field.size;
            align = align.max(field.align);
        }
        Ok(ComputedLayout {
            layout: ValueLayout {
                size: round_up(cursor, align),
                align,
            },
            offsets,
        })
    }
}

fn primitive_layout(kind: PrimitiveKind) -> ValueLayout {
    ValueLayout {
        size: kind.size(),
        align: kind.align(),
    }
}

fn round_up(n: usize, align: usize) -> usize {
    n.div_ceil(align) * align
}

// ============================================================================
// Encoding
// ============================================================================

/// A value of one field: a scalar, or a nested value class field by field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(ScalarValue),
    Record(Vec<FieldValue>),
}

/// Encode a value of `class` into its C layout. Padding bytes are zero.
pub fn encode<'c, F>(class: &ClassEntity, values: &[FieldValue], lookup: &F) -> Result<Vec<u8>, LayoutError>
where
    F: Fn(&str) -> Option<&'c ClassEntity>,
{
    let size = class
        .layout
        .ok_or_else(|| LayoutError::UnknownClass(class.name.clone()))?
        .size;
    let mut out = vec![0u8; size];
    encode_into(&mut out, 0, class, values, lookup)?;
    Ok(out)
}

fn encode_into<'c, F>(
    out: &mut [u8],
    base: usize,
    class: &ClassEntity,
    values: &[FieldValue],
    lookup: &F,
) -> Result<(), LayoutError>
where
    F: Fn(&str) -> Option<&'c ClassEntity>,
{
    if values.len() != class.fields.len() {
        return Err(LayoutError::FieldCount {
            class: class.name.clone(),
            expected: class.fields.len(),
            found: values.len(),
        });
    }
    for (field, value) in class.fields.iter().zip(values) {
        let at = base + field.offset;
        let mismatch = |expected: String| LayoutError::FieldValue {
            class: class.name.clone(),
            field: field.name.clone(),
            expected,
        };
        match (&field.ty, value) {
            (TypeRef::Value { class: nested }, FieldValue::Record(inner)) => {
                let nested = lookup(nested.as_str()).ok_or_else(|| LayoutError::UnknownClass(nested.clone()))?;
                encode_into(out, at, nested, inner, lookup)?;
            }
            (ty, FieldValue::Scalar(scalar)) => {
                let kind = scalar_kind(ty).ok_or_else(|| mismatch("a nested value".to_string()))?;
                if scalar.kind() != kind {
                    return Err(mismatch(kind.name().to_string()));
                }
                let bytes = scalar.to_le_bytes();
                out[at..at + bytes.len()].copy_from_slice(&bytes);
            }
            (ty, FieldValue::Record(_)) => return Err(mismatch(ty.to_string())),
        }
    }
    Ok(())
}

/// Decode a value of `class` from its C layout.
pub fn decode<'c, F>(class: &ClassEntity, bytes: &[u8], lookup: &F) -> Result<Vec<FieldValue>, LayoutError>
where
    F: Fn(&str) -> Option<&'c ClassEntity>,
{
    let size = class
        .layout
        .ok_or_else(|| LayoutError::UnknownClass(class.name.clone()))?
        .size;
    if bytes.len() < size {
        return Err(LayoutError::Truncated {
            class: class.name.clone(),
            expected: size,
            found: bytes.len(),
        });
    }
    decode_at(bytes, 0, class, lookup)
}

fn decode_at<'c, F>(bytes: &[u8], base: usize, class: &ClassEntity, lookup: &F) -> Result<Vec<FieldValue>, LayoutError>
where
    F: Fn(&str) -> Option<&'c ClassEntity>,
{
    let mut values = Vec::with_capacity(class.fields.len());
    for field in &class.fields {
        let at = base + field.offset;
        let value = match &field.ty {
            TypeRef::Value { class: nested } => {
                let nested = lookup(nested.as_str()).ok_or_else(|| LayoutError::UnknownClass(nested.clone()))?;
                FieldValue::Record(decode_at(bytes, at, nested, lookup)?)
            }
            ty => {
                let kind = scalar_kind(ty).ok_or_else(|| LayoutError::NotFlat {
                    class: class.name.clone(),
                    field: field.name.clone(),
                    ty: ty.to_string(),
                })?;
                let scalar = bytes
                    .get(at..)
                    .and_then(|rest| ScalarValue::from_le_bytes(kind, rest))
                    .ok_or_else(|| LayoutError::Truncated {
                        class: class.name.clone(),
                        expected: at + kind.size(),
                        found: bytes.len(),
                    })?;
                FieldValue::Scalar(scalar)
            }
        };
        values.push(value);
    }
    Ok(values)
}

fn scalar_kind(ty: &TypeRef) -> Option<PrimitiveKind> {
    match ty {
        TypeRef::Primitive { primitive } => Some(*primitive),
        TypeRef::Enum { repr, .. } => Some(repr.primitive()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flatbind_core::{EnumRepr, FieldEntity, Representation};
    use ordered_float::OrderedFloat;

    fn int() -> TypeRef {
        TypeRef::primitive(PrimitiveKind::Int32)
    }

    fn classes(entries: Vec<(&str, Vec<(&str, TypeRef)>)>) -> FxHashMap<String, Vec<(String, TypeRef)>> {
        entries
            .into_iter()
            .map(|(name, fields)| {
                (
                    name.to_string(),
                    fields.into_iter().map(|(f, t)| (f.to_string(), t)).collect(),
                )
            })
            .collect()
    }

    fn no_nested(_: &str) -> Option<&'static ClassEntity> {
        None
    }

    #[test]
    fn roi_layout() {
        let fields: Vec<(&str, TypeRef)> = ["xbegin", "xend", "ybegin", "yend", "zbegin", "zend", "chbegin", "chend"]
            .into_iter()
            .map(|f| (f, int()))
            .collect();
        let map = classes(vec![("ROI", fields)]);
        let computed = LayoutEngine::new(&map).layout("ROI").unwrap();
        assert_eq!(computed.layout, ValueLayout { size: 32, align: 4 });
        assert_eq!(computed.offsets, vec![0, 4, 8, 12, 16, 20, 24, 28]);
    }

    #[test]
    fn padding_follows_alignment() {
        let map = classes(vec![(
            "Mixed",
            vec![
                ("flag", TypeRef::primitive(PrimitiveKind::Bool)),
                ("value", TypeRef::primitive(PrimitiveKind::Double)),
                ("tag", TypeRef::Enum {
                    name: "Tag".into(),
                    repr: EnumRepr::U8,
                }),
            ],
        )]);
        let computed = LayoutEngine::new(&map).layout("Mixed").unwrap();
        assert_eq!(computed.offsets, vec![0, 8, 16]);
        assert_eq!(computed.layout, ValueLayout { size: 24, align: 8 });
    }

    #[test]
    fn nested_value_class() {
        let map = classes(vec![
            ("Point", vec![("x", int()), ("y", int())]),
            (
                "Rect",
                vec![
                    ("origin", TypeRef::value("Point")),
                    ("scale", TypeRef::primitive(PrimitiveKind::Float)),
                ],
            ),
        ]);
        let computed = LayoutEngine::new(&map).layout("Rect").unwrap();
        assert_eq!(computed.offsets, vec![0, 8]);
        assert_eq!(computed.layout.size, 12);
    }

    #[test]
    fn recursion_is_rejected() {
        let map = classes(vec![
            ("A", vec![("b", TypeRef::value("B"))]),
            ("B", vec![("a", TypeRef::value("A"))]),
        ]);
        let err = LayoutEngine::new(&map).layout("A").unwrap_err();
        assert!(matches!(err, LayoutError::Recursive(_)));
    }

    #[test]
    fn empty_class() {
        let map = classes(vec![("Tag", vec![])]);
        let computed = LayoutEngine::new(&map).layout("Tag").unwrap();
        assert_eq!(computed.layout, ValueLayout { size: 0, align: 1 });
    }

    #[test]
    fn non_flat_field() {
        let map = classes(vec![("Bad", vec![("name", TypeRef::StringView)])]);
        assert!(matches!(
            LayoutEngine::new(&map).layout("Bad"),
            Err(LayoutError::NotFlat { .. })
        ));
    }

    fn point_entity() -> ClassEntity {
        let mut point = ClassEntity::new("Point", "geo::Point", Representation::Value);
        point.fields = vec![
            FieldEntity {
                name: "x".into(),
                ty: TypeRef::primitive(PrimitiveKind::Uint8),
                offset: 0,
            },
            FieldEntity {
                name: "y".into(),
                ty: TypeRef::primitive(PrimitiveKind::Float),
                offset: 4,
            },
        ];
        point.layout = Some(ValueLayout { size: 8, align: 4 });
        point
    }

    #[test]
    fn encode_zeroes_padding() {
        let point = point_entity();
        let bytes = encode(
            &point,
            &[
                FieldValue::Scalar(ScalarValue::Uint8(7)),
                FieldValue::Scalar(ScalarValue::Float(OrderedFloat(1.5))),
            ],
            &no_nested,
        )
        .unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &[7, 0, 0, 0]);
        assert_eq!(&bytes[4..], &1.5f32.to_le_bytes());
        assert_eq!(decode(&point, &bytes, &no_nested).unwrap()[0], FieldValue::Scalar(ScalarValue::Uint8(7)));
    }

    #[test]
    fn encode_checks_field_kinds() {
        let point = point_entity();
        let err = encode(
            &point,
            &[
                FieldValue::Scalar(ScalarValue::Int32(7)),
                FieldValue::Scalar(ScalarValue::Float(OrderedFloat(1.5))),
            ],
            &no_nested,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::FieldValue { ref field, .. } if field == "x"));
    }

    #[test]
    fn decode_rejects_short_input() {
        let point = point_entity();
        assert!(matches!(
            decode(&point, &[0; 4], &no_nested),
            Err(LayoutError::Truncated { expected: 8, found: 4, .. })
        ));
    }
}
