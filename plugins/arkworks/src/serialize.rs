//! Arkworks Canonical Serialization and Deserialization

#[doc(inline)]
pub use ::serialize::*;

/// Serializes `data` into its compressed canonical byte representation.
#[inline]
pub fn to_bytes<T>(data: &T) -> Result<Vec<u8>, SerializationError>
where
    T: CanonicalSerialize,
{
    let mut bytes = Vec::with_capacity(data.compressed_size());
    data.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

/// Deserializes a value of type `T` from its compressed canonical byte representation, checking
/// that it is well formed.
#[inline]
pub fn from_bytes<T>(bytes: &[u8]) -> Result<T, SerializationError>
where
    T: CanonicalDeserialize,
{
    T::deserialize_compressed(bytes)
}
