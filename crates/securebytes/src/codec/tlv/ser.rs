//! `serde::Serializer` producing TLV bytes.

use serde::ser::{self, Serialize, Serializer as _};

use super::{
    TlvError, TAG_BOOL, TAG_BYTES, TAG_FLOAT, TAG_INT, TAG_MAP, TAG_NULL, TAG_SEQ, TAG_SOME,
    TAG_UINT, TAG_UTF8, TAG_VARIANT,
};

/// Writes TLV elements into an in-memory buffer.
///
/// Containers are written with a placeholder length that is patched once the
/// container is closed.
#[derive(Debug, Default)]
pub struct TlvSerializer {
    out: Vec<u8>,
}

impl TlvSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.out
    }

    fn put(&mut self, tag: u8, value: &[u8]) -> Result<(), TlvError> {
        let len = u32::try_from(value.len()).map_err(|_| TlvError::TooLarge(value.len()))?;
        self.out.push(tag);
        self.out.extend_from_slice(&len.to_be_bytes());
        self.out.extend_from_slice(value);
        Ok(())
    }

    /// Start a container and return the offset of its length field.
    fn open(&mut self, tag: u8) -> usize {
        self.out.push(tag);
        let at = self.out.len();
        self.out.extend_from_slice(&[0u8; 4]);
        at
    }

    fn close(&mut self, at: usize) -> Result<(), TlvError> {
        let body = self.out.len() - at - 4;
        let len = u32::try_from(body).map_err(|_| TlvError::TooLarge(body))?;
        self.out[at..at + 4].copy_from_slice(&len.to_be_bytes());
        Ok(())
    }

    fn open_variant(&mut self, index: u32) -> Result<usize, TlvError> {
        let at = self.open(TAG_VARIANT);
        self.put(TAG_UINT, &u64::from(index).to_be_bytes())?;
        Ok(at)
    }
}

impl<'a> ser::Serializer for &'a mut TlvSerializer {
    type Ok = ();
    type Error = TlvError;

    type SerializeSeq = Compound<'a>;
    type SerializeTuple = Compound<'a>;
    type SerializeTupleStruct = Compound<'a>;
    type SerializeTupleVariant = Compound<'a>;
    type SerializeMap = Compound<'a>;
    type SerializeStruct = Compound<'a>;
    type SerializeStructVariant = Compound<'a>;

    fn is_human_readable(&self) -> bool {
        false
    }

    fn serialize_bool(self, v: bool) -> Result<(), TlvError> {
        self.put(TAG_BOOL, &[u8::from(v)])
    }

    fn serialize_i8(self, v: i8) -> Result<(), TlvError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<(), TlvError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<(), TlvError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<(), TlvError> {
        self.put(TAG_INT, &v.to_be_bytes())
    }

    fn serialize_i128(self, _v: i128) -> Result<(), TlvError> {
        Err(TlvError::Unsupported("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<(), TlvError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<(), TlvError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<(), TlvError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<(), TlvError> {
        self.put(TAG_UINT, &v.to_be_bytes())
    }

    fn serialize_u128(self, _v: u128) -> Result<(), TlvError> {
        Err(TlvError::Unsupported("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<(), TlvError> {
        self.serialize_f64(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), TlvError> {
        self.put(TAG_FLOAT, &v.to_bits().to_be_bytes())
    }

    fn serialize_char(self, v: char) -> Result<(), TlvError> {
        let mut buf = [0u8; 4];
        self.serialize_str(v.encode_utf8(&mut buf))
    }

    fn serialize_str(self, v: &str) -> Result<(), TlvError> {
        self.put(TAG_UTF8, v.as_bytes())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), TlvError> {
        self.put(TAG_BYTES, v)
    }

    fn serialize_none(self) -> Result<(), TlvError> {
        self.put(TAG_NULL, &[])
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<(), TlvError> {
        let at = self.open(TAG_SOME);
        value.serialize(&mut *self)?;
        self.close(at)
    }

    fn serialize_unit(self) -> Result<(), TlvError> {
        self.put(TAG_NULL, &[])
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), TlvError> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
    ) -> Result<(), TlvError> {
        let at = self.open_variant(variant_index)?;
        self.put(TAG_NULL, &[])?;
        self.close(at)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), TlvError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), TlvError> {
        let at = self.open_variant(variant_index)?;
        value.serialize(&mut *self)?;
        self.close(at)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Compound<'a>, TlvError> {
        let start = self.open(TAG_SEQ);
        Ok(Compound::new(self, start, None))
    }

    fn serialize_tuple(self, len: usize) -> Result<Compound<'a>, TlvError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Compound<'a>, TlvError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Compound<'a>, TlvError> {
        let variant = self.open_variant(variant_index)?;
        let start = self.open(TAG_SEQ);
        Ok(Compound::new(self, start, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Compound<'a>, TlvError> {
        let start = self.open(TAG_MAP);
        Ok(Compound::new(self, start, None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Compound<'a>, TlvError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Compound<'a>, TlvError> {
        self.serialize_tuple_variant(name, variant_index, variant, len)
    }
}

/// An open container: the serializer plus the length offsets to patch.
pub struct Compound<'a> {
    ser: &'a mut TlvSerializer,
    start: usize,
    variant: Option<usize>,
}

impl<'a> Compound<'a> {
    fn new(ser: &'a mut TlvSerializer, start: usize, variant: Option<usize>) -> Self {
        Self {
            ser,
            start,
            variant,
        }
    }

    fn element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), TlvError> {
        value.serialize(&mut *self.ser)
    }

    fn finish(self) -> Result<(), TlvError> {
        self.ser.close(self.start)?;
        if let Some(variant) = self.variant {
            self.ser.close(variant)?;
        }
        Ok(())
    }
}

impl ser::SerializeSeq for Compound<'_> {
    type Ok = ();
    type Error = TlvError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), TlvError> {
        self.element(value)
    }

    fn end(self) -> Result<(), TlvError> {
        self.finish()
    }
}

impl ser::SerializeTuple for Compound<'_> {
    type Ok = ();
    type Error = TlvError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), TlvError> {
        self.element(value)
    }

    fn end(self) -> Result<(), TlvError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for Compound<'_> {
    type Ok = ();
    type Error = TlvError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), TlvError> {
        self.element(value)
    }

    fn end(self) -> Result<(), TlvError> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for Compound<'_> {
    type Ok = ();
    type Error = TlvError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), TlvError> {
        self.element(value)
    }

    fn end(self) -> Result<(), TlvError> {
        self.finish()
    }
}

impl ser::SerializeMap for Compound<'_> {
    type Ok = ();
    type Error = TlvError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), TlvError> {
        self.element(key)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), TlvError> {
        self.element(value)
    }

    fn end(self) -> Result<(), TlvError> {
        self.finish()
    }
}

impl ser::SerializeStruct for Compound<'_> {
    type Ok = ();
    type Error = TlvError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), TlvError> {
        self.element(value)
    }

    fn end(self) -> Result<(), TlvError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for Compound<'_> {
    type Ok = ();
    type Error = TlvError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), TlvError> {
        self.element(value)
    }

    fn end(self) -> Result<(), TlvError> {
        self.finish()
    }
}
