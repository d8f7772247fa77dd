//! `serde::Deserializer` reading TLV bytes.

use serde::de::{
    self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess,
    Visitor,
};
use serde::Deserialize;

use super::{
    TlvError, HEADER_LEN, MAX_DEPTH, TAG_BOOL, TAG_BYTES, TAG_FLOAT, TAG_INT, TAG_MAP, TAG_NULL,
    TAG_SEQ, TAG_SOME, TAG_UINT, TAG_UTF8, TAG_VARIANT,
};

/// Reads TLV elements from a borrowed byte slice.
#[derive(Debug)]
pub struct TlvDeserializer<'de> {
    input: &'de [u8],
    remaining_depth: u8,
}

impl<'de> TlvDeserializer<'de> {
    pub fn new(input: &'de [u8]) -> Self {
        Self {
            input,
            remaining_depth: MAX_DEPTH,
        }
    }

    /// Fails unless every byte has been consumed.
    pub fn end(&self) -> Result<(), TlvError> {
        if self.input.is_empty() {
            Ok(())
        } else {
            Err(TlvError::TrailingBytes(self.input.len()))
        }
    }

    fn peek_tag(&self) -> Result<u8, TlvError> {
        self.input.first().copied().ok_or(TlvError::UnexpectedEof)
    }

    /// Split off the next element, returning its tag and value bytes.
    fn next_element(&mut self) -> Result<(u8, &'de [u8]), TlvError> {
        let header = self.input.get(..HEADER_LEN).ok_or(TlvError::UnexpectedEof)?;
        let tag = header[0];
        let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;
        let rest = &self.input[HEADER_LEN..];
        if rest.len() < len {
            return Err(TlvError::UnexpectedEof);
        }
        let (value, remaining) = rest.split_at(len);
        self.input = remaining;
        Ok((tag, value))
    }

    fn expect_element(&mut self, tag: u8, expected: &'static str) -> Result<&'de [u8], TlvError> {
        let found = self.peek_tag()?;
        if found != tag {
            return Err(TlvError::UnexpectedTag { expected, found });
        }
        let (_, value) = self.next_element()?;
        Ok(value)
    }
}

fn fixed8(what: &'static str, value: &[u8]) -> Result<[u8; 8], TlvError> {
    value.try_into().map_err(|_| TlvError::InvalidLength {
        what,
        len: value.len(),
    })
}

fn expect_empty(what: &'static str, value: &[u8]) -> Result<(), TlvError> {
    if value.is_empty() {
        Ok(())
    } else {
        Err(TlvError::InvalidLength {
            what,
            len: value.len(),
        })
    }
}

/// Run `f` over the contents of a container one level below `depth`, then
/// require it to be fully consumed.
fn within<'de, T>(
    depth: u8,
    value: &'de [u8],
    f: impl FnOnce(&mut TlvDeserializer<'de>) -> Result<T, TlvError>,
) -> Result<T, TlvError> {
    let remaining_depth = depth.checked_sub(1).ok_or(TlvError::RecursionLimit)?;
    let mut inner = TlvDeserializer {
        input: value,
        remaining_depth,
    };
    let out = f(&mut inner)?;
    inner.end()?;
    Ok(out)
}

impl<'de> de::Deserializer<'de> for &mut TlvDeserializer<'de> {
    type Error = TlvError;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, TlvError> {
        let depth = self.remaining_depth;
        let (tag, value) = self.next_element()?;
        match tag {
            TAG_BOOL => match value {
                [0] => visitor.visit_bool(false),
                [1] => visitor.visit_bool(true),
                [b] => Err(TlvError::InvalidBool(*b)),
                _ => Err(TlvError::InvalidLength {
                    what: "bool",
                    len: value.len(),
                }),
            },
            TAG_INT => visitor.visit_i64(i64::from_be_bytes(fixed8("signed integer", value)?)),
            TAG_UINT => visitor.visit_u64(u64::from_be_bytes(fixed8("unsigned integer", value)?)),
            TAG_FLOAT => visitor.visit_f64(f64::from_bits(u64::from_be_bytes(fixed8(
                "float", value,
            )?))),
            TAG_UTF8 => {
                let s = std::str::from_utf8(value).map_err(|_| TlvError::InvalidUtf8)?;
                visitor.visit_borrowed_str(s)
            }
            TAG_BYTES => visitor.visit_borrowed_bytes(value),
            TAG_NULL => {
                expect_empty("null", value)?;
                visitor.visit_unit()
            }
            TAG_SOME => within(depth, value, |inner| visitor.visit_some(inner)),
            TAG_SEQ => within(depth, value, |inner| visitor.visit_seq(Elements { de: inner })),
            TAG_MAP => within(depth, value, |inner| visitor.visit_map(Elements { de: inner })),
            TAG_VARIANT => within(depth, value, |inner| {
                visitor.visit_enum(Variant { de: inner })
            }),
            other => Err(TlvError::UnknownTag(other)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, TlvError> {
        match self.peek_tag()? {
            TAG_NULL => {
                let (_, value) = self.next_element()?;
                expect_empty("null", value)?;
                visitor.visit_none()
            }
            TAG_SOME => {
                let depth = self.remaining_depth;
                let (_, value) = self.next_element()?;
                within(depth, value, |inner| visitor.visit_some(inner))
            }
            found => Err(TlvError::UnexpectedTag {
                expected: "option",
                found,
            }),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, TlvError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, TlvError> {
        let depth = self.remaining_depth;
        let value = self.expect_element(TAG_VARIANT, "enum variant")?;
        within(depth, value, |inner| visitor.visit_enum(Variant { de: inner }))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

/// Element access for sequences and maps: runs until the container is empty.
struct Elements<'a, 'de> {
    de: &'a mut TlvDeserializer<'de>,
}

impl<'de> SeqAccess<'de> for Elements<'_, 'de> {
    type Error = TlvError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, TlvError> {
        if self.de.input.is_empty() {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }
}

impl<'de> MapAccess<'de> for Elements<'_, 'de> {
    type Error = TlvError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, TlvError> {
        if self.de.input.is_empty() {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, TlvError> {
        seed.deserialize(&mut *self.de)
    }
}

/// Variant index followed by the payload element.
struct Variant<'a, 'de> {
    de: &'a mut TlvDeserializer<'de>,
}

impl<'a, 'de> EnumAccess<'de> for Variant<'a, 'de> {
    type Error = TlvError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self), TlvError> {
        let index = u32::deserialize(&mut *self.de)?;
        let index: de::value::U32Deserializer<TlvError> = index.into_deserializer();
        let value = seed.deserialize(index)?;
        Ok((value, self))
    }
}

impl<'de> VariantAccess<'de> for Variant<'_, 'de> {
    type Error = TlvError;

    fn unit_variant(self) -> Result<(), TlvError> {
        <()>::deserialize(&mut *self.de)
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, TlvError> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, TlvError> {
        de::Deserializer::deserialize_tuple(&mut *self.de, len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, TlvError> {
        de::Deserializer::deserialize_struct(&mut *self.de, "", fields, visitor)
    }
}
